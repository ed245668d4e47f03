use olympics_api::GenderStat;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::text::{Line, Span};
use tui::widgets::Widget;

const MALE_COLOR: Color = Color::Blue;
const FEMALE_COLOR: Color = Color::Magenta;

/// Male / female participation as one proportional bar with a legend line.
pub struct GenderSplit<'a> {
    pub stats: &'a [GenderStat],
    pub male_label: &'a str,
    pub female_label: &'a str,
}

/// Percentage of male and female entries. Other sex codes are ignored.
pub fn shares(stats: &[GenderStat]) -> Option<(f64, f64)> {
    let count = |sex: &str| -> u64 {
        stats.iter().filter(|s| s.sex == sex).map(|s| s.count).sum()
    };
    let (male, female) = (count("M"), count("F"));
    let total = male + female;
    if total == 0 {
        return None;
    }
    let male_share = male as f64 * 100.0 / total as f64;
    Some((male_share, 100.0 - male_share))
}

impl Widget for GenderSplit<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 || area.width < 10 {
            return;
        }
        let Some((male, female)) = shares(self.stats) else {
            return;
        };

        let male_cells = ((area.width as f64) * male / 100.0).round() as u16;
        let female_cells = area.width.saturating_sub(male_cells);
        Line::from(vec![
            Span::styled("█".repeat(male_cells as usize), Style::default().fg(MALE_COLOR)),
            Span::styled("█".repeat(female_cells as usize), Style::default().fg(FEMALE_COLOR)),
        ])
        .render(Rect { height: 1, ..area }, buf);

        Line::from(vec![
            Span::styled(format!("■ {} {male:.1}%", self.male_label), Style::default().fg(MALE_COLOR)),
            Span::raw("   "),
            Span::styled(
                format!("■ {} {female:.1}%", self.female_label),
                Style::default().fg(FEMALE_COLOR),
            ),
        ])
        .render(Rect { y: area.y + 1, height: 1, ..area }, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(sex: &str, count: u64) -> GenderStat {
        GenderStat { sex: sex.into(), count }
    }

    #[test]
    fn shares_add_up_to_one_hundred() {
        let (male, female) = shares(&[stat("M", 3), stat("F", 1)]).unwrap();
        assert!((male - 75.0).abs() < f64::EPSILON);
        assert!((female - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_or_unknown_stats_have_no_shares() {
        assert_eq!(shares(&[]), None);
        assert_eq!(shares(&[stat("X", 4)]), None);
    }
}
