use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const SIDEBAR_WIDTH: u16 = 32;
pub const TIMELINE_HEIGHT: u16 = 3;
pub const LOG_PANE_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub sidebar: Rect,
    pub main: Rect,
    pub timeline: Rect,
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (area, logs) = Self::split_logs(area, show_logs);

        if full_screen {
            let [main] = Layout::vertical([Constraint::Fill(1)]).areas(area);
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                sidebar: Rect::ZERO,
                main,
                timeline: Rect::ZERO,
                logs,
            };
        }

        let [tab, body, timeline] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(TIMELINE_HEIGHT),
        ])
        .areas(area);
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)]).areas(body);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            sidebar,
            main,
            timeline,
            logs,
        }
    }

    fn split_logs(area: Rect, show_logs: bool) -> (Rect, Rect) {
        if !show_logs {
            return (area, Rect::ZERO);
        }
        let [rest, logs] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_PANE_HEIGHT)]).areas(area);
        (rest, logs)
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_sits_left_of_the_charts() {
        let layout = LayoutAreas::new(Size::new(120, 40));
        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(layout.main.x, SIDEBAR_WIDTH);
        assert_eq!(layout.timeline.height, TIMELINE_HEIGHT);
        assert_eq!(layout.logs, Rect::ZERO);
    }

    #[test]
    fn full_screen_keeps_the_log_pane() {
        let mut layout = LayoutAreas::new(Size::new(120, 40));
        layout.update(Rect::new(0, 0, 120, 40), true, true);
        assert_eq!(layout.sidebar, Rect::ZERO);
        assert_eq!(layout.logs.height, LOG_PANE_HEIGHT);
        assert_eq!(layout.main.height, 40 - LOG_PANE_HEIGHT);
    }
}
