use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::Widget;

/// One-line edition strip: every valid year as a tick with the selected
/// year highlighted, and the first and last years at the ends.
pub struct TimelineBar<'a> {
    pub years: &'a [u16],
    /// `None` in all-years mode.
    pub selected: Option<u16>,
    pub playing: bool,
}

impl Widget for TimelineBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 12 || area.height == 0 {
            return;
        }
        let (Some(first), Some(last)) = (self.years.first(), self.years.last()) else {
            return;
        };

        let start = format!("{first} ");
        let end = format!(" {last}");
        let track_width = area
            .width
            .saturating_sub(start.len() as u16 + end.len() as u16);
        if track_width == 0 {
            return;
        }

        let track_style = if self.playing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut track: Vec<char> = vec!['─'; track_width as usize];
        for (index, _) in self.years.iter().enumerate() {
            let column = tick_column(index, self.years.len(), track_width) as usize;
            track[column] = '┼';
        }

        let cursor = self
            .selected
            .and_then(|year| cursor_column(self.years, year, track_width));

        let mut spans = vec![Span::styled(start, Style::default().fg(Color::Gray))];
        for (column, c) in track.into_iter().enumerate() {
            if cursor == Some(column as u16) {
                spans.push(Span::styled(
                    "●",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(c.to_string(), track_style));
            }
        }
        spans.push(Span::styled(end, Style::default().fg(Color::Gray)));

        Line::from(spans).render(area, buf);
    }
}

fn tick_column(index: usize, count: usize, width: u16) -> u16 {
    if count <= 1 || width <= 1 {
        return 0;
    }
    let span = (width - 1) as usize;
    (index * span / (count - 1)) as u16
}

/// Column of `year` on a track `width` cells wide, or `None` if the year is
/// not in the list.
pub fn cursor_column(years: &[u16], year: u16, width: u16) -> Option<u16> {
    let index = years.iter().position(|&y| y == year)?;
    Some(tick_column(index, years.len(), width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_spans_the_whole_track() {
        let years = [1896, 1900, 1904, 1908, 1912];
        assert_eq!(cursor_column(&years, 1896, 41), Some(0));
        assert_eq!(cursor_column(&years, 1904, 41), Some(20));
        assert_eq!(cursor_column(&years, 1912, 41), Some(40));
        assert_eq!(cursor_column(&years, 1916, 41), None);
    }

    #[test]
    fn single_year_sits_at_the_start() {
        assert_eq!(cursor_column(&[2016], 2016, 30), Some(0));
    }

    #[test]
    fn renders_end_labels() {
        let years = [2000, 2004, 2008];
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        TimelineBar { years: &years, selected: Some(2004), playing: false }.render(area, &mut buf);

        let rendered: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(rendered.starts_with("2000 "));
        assert!(rendered.ends_with(" 2008"));
        assert!(rendered.contains('●'));
    }
}
