use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::symbols::Marker;
use tui::text::{Line, Span};
use tui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Clear, Dataset, GraphType,
    List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::gender_split::GenderSplit;
use crate::components::timeline::TimelineBar;
use crate::i18n::{self, Language, Text, t};
use crate::state::app_state::{PickerKind, SortColumn};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::orchestrator::SeriesBundle;
use crate::state::playback::PlaybackSpeed;
use crate::ui::layout::LayoutAreas;
use olympics_api::{FilterState, MapStat, MedalType, Sex};

static TABS: &[Text; 5] = &[Text::Overview, Text::Athletes, Text::Biometrics, Text::Evolution, Text::Search];

const SERIES_COLORS: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::LightRed,
    Color::LightBlue,
    Color::LightGreen,
    Color::White,
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_sidebar(f, layout.sidebar, app);
            draw_timeline(f, layout.timeline, app);
        }

        let main = draw_error_banner(f, layout.main, app);
        match app.state.active_tab {
            MenuItem::Overview => draw_overview(f, main, app),
            MenuItem::Athletes => draw_athletes(f, main, app),
            MenuItem::Biometrics => draw_biometrics(f, main, app),
            MenuItem::Evolution => draw_evolution(f, main, app),
            MenuItem::Search => draw_search(f, main, app),
            MenuItem::Help => draw_help(f, main, app),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }
        if app.state.picker.is_open() {
            draw_picker(f, f.area(), app);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn titled<'a>(color: Color, title: &str) -> Block<'a> {
    default_border(color).title(format!(" {title} "))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;
    let language = app.state.language;

    let tab_index = match app.state.active_tab {
        MenuItem::Overview => 0,
        MenuItem::Athletes => 1,
        MenuItem::Biometrics => 2,
        MenuItem::Evolution => 3,
        MenuItem::Search => 4,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS
        .iter()
        .enumerate()
        .map(|(i, text)| Line::from(format!("{} {}", i + 1, t(language, *text))))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new(format!("{} | {}: ? ", language.code(), t(language, Text::Help)))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Sidebar: current filters and pipeline status
// ---------------------------------------------------------------------------

fn draw_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let language = app.state.language;
    let block = titled(Color::White, t(language, Text::Filters));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let filters = app.state.filters.state();
    let seasons = filters.year.specific().and_then(|y| app.state.filters.seasons_of(y));
    let country_backend_label = app
        .state
        .filters
        .countries()
        .iter()
        .find(|c| c.code == filters.country)
        .map(|c| c.label.as_str())
        .unwrap_or_default();

    let row = |key: &'static str, label: Text, value: String| {
        Line::from(vec![
            Span::styled(format!("{key} {:<10}", t(language, label)), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    };

    let mut lines = vec![
        row("s", Text::Season, i18n::season_label(language, filters.season).to_string()),
        row("x", Text::Sex, sex_label(language, filters.sex).to_string()),
        row("p", Text::Sport, i18n::sport_label(language, &filters.sport)),
        row("c", Text::Country, i18n::country_label(language, &filters.country, country_backend_label)),
        row("m", Text::MedalType, medal_label(language, filters.medal_type).to_string()),
        row("h/l", Text::Year, i18n::year_label(language, filters.year, filters.season, seasons)),
        Line::from(""),
    ];

    let (status, color) = if app.state.series_loading {
        (format!("◌ {}", t(language, Text::Loading)), Color::Yellow)
    } else if app.state.init_error.is_some() {
        ("✗".to_string(), Color::Red)
    } else {
        (format!("● {}", t(language, Text::Online)), Color::Green)
    };
    lines.push(Line::from(Span::styled(status, Style::default().fg(color))));

    let playback = &app.state.playback;
    let (icon, state) = if playback.is_playing() {
        ("▶", t(language, Text::Playing))
    } else {
        ("⏸", t(language, Text::Paused))
    };
    lines.push(Line::from(format!(
        "{icon} {state} ({} {})",
        t(language, Text::Speed),
        speed_label(language, playback.speed())
    )));

    if let Some(updated_at) = app.state.dashboard.updated_at.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("⟳ {updated_at}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_timeline(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        TimelineBar {
            years: app.state.filters.valid_years(),
            selected: app.state.filters.state().year.specific(),
            playing: app.state.playback.is_playing(),
        },
        inner,
    );
}

/// Draws the startup and series errors above `area` and returns what is left.
fn draw_error_banner(f: &mut Frame, area: Rect, app: &App) -> Rect {
    let messages: Vec<&str> = [app.state.init_error.as_deref(), app.state.last_error.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if messages.is_empty() || area.height < 8 {
        return area;
    }

    let [banner, rest] =
        Layout::vertical([Constraint::Length(messages.len() as u16 + 2), Constraint::Fill(1)]).areas(area);
    f.render_widget(
        Paragraph::new(messages.join("\n"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(default_border(Color::Red)),
        banner,
    );
    rest
}

// ---------------------------------------------------------------------------
// Overview: medals by country and the medal table
// ---------------------------------------------------------------------------

fn draw_overview(f: &mut Frame, area: Rect, app: &App) {
    let language = app.state.language;
    let Some(bundle) = app.state.dashboard.bundle.as_deref() else {
        draw_placeholder(f, area, waiting_text(app));
        return;
    };
    let medal_type = shown_filters(app).medal_type;

    let [map_area, table_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);

    let block = titled(Color::White, t(language, Text::MedalMap));
    let inner = block.inner(map_area);
    f.render_widget(block, map_area);
    let ranked = rank_countries(&bundle.map, medal_type, inner.height as usize);
    if ranked.is_empty() {
        draw_no_data(f, inner, language);
    } else {
        let bars: Vec<Bar> = ranked
            .iter()
            .map(|(code, count)| {
                Bar::default()
                    .value(*count as u64)
                    .label(Line::from(code.to_string()))
                    .style(Style::default().fg(medal_color(medal_type)))
                    .value_style(Style::default().fg(Color::Black).bg(medal_color(medal_type)))
            })
            .collect();
        let chart = BarChart::default()
            .direction(Direction::Horizontal)
            .data(BarGroup::default().bars(&bars))
            .bar_width(1)
            .bar_gap(0);
        f.render_widget(chart, inner);
    }

    draw_medal_table(f, table_area, app, bundle);
}

/// Countries with the most medals of `medal_type`, largest first.
fn rank_countries(map: &[MapStat], medal_type: MedalType, limit: usize) -> Vec<(&str, u32)> {
    let mut ranked: Vec<(&str, u32)> = map
        .iter()
        .map(|m| (m.id.as_str(), medal_type.count(m.gold, m.silver, m.bronze, m.total)))
        .filter(|(_, count)| *count > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);
    ranked
}

fn draw_medal_table(f: &mut Frame, area: Rect, app: &App, bundle: &SeriesBundle) {
    let language = app.state.language;
    let table_state = &app.state.medal_table;
    let arrow = if table_state.descending { "▼" } else { "▲" };
    let header_cell = |column: SortColumn, text: Text| {
        if table_state.column == column {
            format!("{}{arrow}", t(language, text))
        } else {
            t(language, text).to_string()
        }
    };

    let block = titled(Color::White, &format!("{} (o/O)", t(language, Text::MedalTable)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if bundle.medals.is_empty() {
        draw_no_data(f, inner, language);
        return;
    }

    let header = Row::new(vec![
        header_cell(SortColumn::Name, Text::Country),
        header_cell(SortColumn::Gold, Text::Gold),
        header_cell(SortColumn::Silver, Text::Silver),
        header_cell(SortColumn::Bronze, Text::Bronze),
        header_cell(SortColumn::Total, Text::Total),
    ])
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = table_state
        .sorted(&bundle.medals)
        .into_iter()
        .skip(table_state.scroll_offset as usize)
        .map(|m| {
            Row::new(vec![
                i18n::country_label(language, &m.code, &m.name),
                m.gold.to_string(),
                m.silver.to_string(),
                m.bronze.to_string(),
                m.total.to_string(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .column_spacing(1);
    f.render_widget(table, inner);
}

// ---------------------------------------------------------------------------
// Athletes: top medallists and the gender split
// ---------------------------------------------------------------------------

fn draw_athletes(f: &mut Frame, area: Rect, app: &App) {
    let language = app.state.language;
    let Some(bundle) = app.state.dashboard.bundle.as_deref() else {
        draw_placeholder(f, area, waiting_text(app));
        return;
    };

    let [list_area, gender_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(4)]).areas(area);

    let block = titled(Color::White, &format!("{} (Enter)", t(language, Text::TopAthletes)));
    if bundle.top_athletes.is_empty() {
        let inner = block.inner(list_area);
        f.render_widget(block, list_area);
        draw_no_data(f, inner, language);
    } else {
        let items: Vec<ListItem> = bundle
            .top_athletes
            .iter()
            .enumerate()
            .map(|(rank, a)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>2}. ", rank + 1), Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("{} ({}) ", a.name, a.noc)),
                    Span::styled(format!("{}G ", a.gold), Style::default().fg(medal_color(MedalType::Gold))),
                    Span::styled(format!("{}S ", a.silver), Style::default().fg(medal_color(MedalType::Silver))),
                    Span::styled(format!("{}B ", a.bronze), Style::default().fg(medal_color(MedalType::Bronze))),
                    Span::styled(format!("= {}", a.total), Style::default().add_modifier(Modifier::BOLD)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(app.state.top_athlete_selected));
        f.render_stateful_widget(list, list_area, &mut list_state);
    }

    let block = titled(Color::White, t(language, Text::GenderSplit));
    let inner = block.inner(gender_area);
    f.render_widget(block, gender_area);
    if bundle.gender.is_empty() {
        draw_no_data(f, inner, language);
    } else {
        f.render_widget(
            GenderSplit {
                stats: &bundle.gender,
                male_label: t(language, Text::Male),
                female_label: t(language, Text::Female),
            },
            inner,
        );
    }
}

// ---------------------------------------------------------------------------
// Biometrics scatter and evolution lines
// ---------------------------------------------------------------------------

fn draw_biometrics(f: &mut Frame, area: Rect, app: &App) {
    let language = app.state.language;
    let block = titled(Color::White, t(language, Text::Biometrics));
    let Some(bundle) = app.state.dashboard.bundle.as_deref() else {
        draw_placeholder(f, area, waiting_text(app));
        return;
    };

    let groups: [(Option<MedalType>, Text); 4] = [
        (None, Text::Total),
        (Some(MedalType::Bronze), Text::Bronze),
        (Some(MedalType::Silver), Text::Silver),
        (Some(MedalType::Gold), Text::Gold),
    ];
    let points: Vec<Vec<(f64, f64)>> = groups
        .iter()
        .map(|(medal, _)| {
            bundle
                .biometrics
                .iter()
                .filter(|p| p.medal() == *medal)
                .map(|p| (p.height, p.weight))
                .collect()
        })
        .collect();

    let (Some(x_bounds), Some(y_bounds)) = (
        axis_bounds(bundle.biometrics.iter().map(|p| p.height)),
        axis_bounds(bundle.biometrics.iter().map(|p| p.weight)),
    ) else {
        let inner = block.inner(area);
        f.render_widget(block, area);
        draw_no_data(f, inner, language);
        return;
    };

    let datasets: Vec<Dataset> = groups
        .iter()
        .zip(points.iter())
        .filter(|(_, data)| !data.is_empty())
        .map(|((medal, text), data)| {
            let name = if medal.is_some() { t(language, *text) } else { "-" };
            let color = medal.map(medal_color).unwrap_or(Color::DarkGray);
            Dataset::default()
                .name(name)
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(axis(format!("{} (cm)", t(language, Text::Height)), x_bounds))
        .y_axis(axis(format!("{} (kg)", t(language, Text::Weight)), y_bounds));
    f.render_widget(chart, area);
}

fn draw_evolution(f: &mut Frame, area: Rect, app: &App) {
    let language = app.state.language;
    let block = titled(Color::White, t(language, Text::Evolution));
    let Some(bundle) = app.state.dashboard.bundle.as_deref() else {
        draw_placeholder(f, area, waiting_text(app));
        return;
    };

    let series = evolution_series(bundle);
    let (Some(x_bounds), Some(y_bounds)) = (
        axis_bounds(bundle.evolution.iter().map(|p| p.year as f64)),
        axis_bounds(series.iter().flat_map(|(_, data)| data.iter().map(|(_, y)| *y))),
    ) else {
        let inner = block.inner(area);
        f.render_widget(block, area);
        draw_no_data(f, inner, language);
        return;
    };

    let datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, (code, data))| {
            Dataset::default()
                .name(code.as_str())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(axis(t(language, Text::Year).to_string(), x_bounds))
        .y_axis(axis(medal_label(language, shown_filters(app).medal_type).to_string(), y_bounds));
    f.render_widget(chart, area);
}

/// One line per country code found in the evolution rows.
fn evolution_series(bundle: &SeriesBundle) -> Vec<(String, Vec<(f64, f64)>)> {
    let mut series: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for point in bundle.evolution.iter() {
        for (code, count) in &point.counts {
            let position = match series.iter().position(|(c, _)| c == code) {
                Some(position) => position,
                None => {
                    series.push((code.clone(), Vec::new()));
                    series.len() - 1
                }
            };
            series[position].1.push((point.year as f64, *count));
        }
    }
    series
}

fn axis<'a>(title: String, bounds: [f64; 2]) -> Axis<'a> {
    Axis::default()
        .title(Span::styled(title, Style::default().fg(Color::Gray)))
        .style(Style::default().fg(Color::DarkGray))
        .bounds(bounds)
        .labels(vec![format!("{:.0}", bounds[0]), format!("{:.0}", (bounds[0] + bounds[1]) / 2.0), format!("{:.0}", bounds[1])])
}

/// `[min, max]` of the values, widened when they are all equal.
fn axis_bounds(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if min == max {
        return Some([min - 1.0, max + 1.0]);
    }
    Some([min, max])
}

// ---------------------------------------------------------------------------
// Search and athlete profile
// ---------------------------------------------------------------------------

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let language = app.state.language;
    let search = &app.state.search;

    let [left, right] = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);
    let [input_area, results_area] = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(left);

    let input_color = if search.composing { Color::Cyan } else { Color::White };
    let cursor = if search.composing { "_" } else { "" };
    f.render_widget(
        Paragraph::new(format!("{}{cursor}", search.input))
            .block(titled(input_color, &format!("{} (/)", t(language, Text::Search)))),
        input_area,
    );

    let block = default_border(Color::White);
    if let Some(err) = search.error.as_deref() {
        let inner = block.inner(results_area);
        f.render_widget(block, results_area);
        f.render_widget(
            Paragraph::new(err).style(Style::default().fg(Color::Red)).wrap(Wrap { trim: true }),
            inner,
        );
    } else if search.results.is_empty() {
        let text = if search.input.trim().chars().count() >= olympics_api::client::MIN_SEARCH_CHARS {
            t(language, Text::NoResults)
        } else {
            t(language, Text::SearchPrompt)
        };
        let inner = block.inner(results_area);
        f.render_widget(block, results_area);
        f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::DarkGray)), inner);
    } else {
        let items: Vec<ListItem> = search
            .results
            .iter()
            .map(|r| {
                ListItem::new(Line::from(vec![
                    Span::raw(r.name.clone()),
                    Span::styled(
                        format!(" {} {}", r.noc, i18n::sport_label(language, &r.sport)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(search.selected));
        f.render_stateful_widget(list, results_area, &mut list_state);
    }

    draw_profile(f, right, app);
}

fn draw_profile(f: &mut Frame, area: Rect, app: &App) {
    let language = app.state.language;
    let panel = &app.state.athlete;
    let block = titled(Color::White, &format!("{} (PgUp/PgDn)", t(language, Text::Profile)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if panel.loading {
        f.render_widget(Paragraph::new(format!("{}…", t(language, Text::Loading))), inner);
        return;
    }
    if let Some(err) = panel.error.as_deref() {
        f.render_widget(
            Paragraph::new(err).style(Style::default().fg(Color::Red)).wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }
    let Some(profile) = panel.profile.as_ref() else {
        return;
    };

    let heading = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(profile.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(format!(
            "{} · {} · {}: {}",
            profile.sex,
            i18n::country_label(language, &profile.noc, &profile.noc),
            t(language, Text::Team),
            profile.team
        )),
        Line::from(format!(
            "{}: {}  {}: {}  {}: {}",
            t(language, Text::Height),
            optional_measure(profile.height, "cm"),
            t(language, Text::Weight),
            optional_measure(profile.weight, "kg"),
            t(language, Text::Age),
            age_range(profile.age_range.min, profile.age_range.max),
        )),
        Line::from(
            profile
                .sports
                .iter()
                .map(|s| i18n::sport_label(language, s))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Line::from(vec![
            Span::styled(format!("{}G ", profile.medals.gold), Style::default().fg(medal_color(MedalType::Gold))),
            Span::styled(format!("{}S ", profile.medals.silver), Style::default().fg(medal_color(MedalType::Silver))),
            Span::styled(format!("{}B ", profile.medals.bronze), Style::default().fg(medal_color(MedalType::Bronze))),
            Span::raw(format!("= {}", profile.medals.total)),
        ]),
        Line::from(""),
        Line::from(Span::styled(t(language, Text::Participations), heading)),
    ];

    for p in &profile.participations {
        let city = p.city.as_deref().unwrap_or_default();
        let medal = p.medal.as_deref().unwrap_or("-");
        lines.push(Line::from(format!(
            "{} {} {city}  {}  {medal}",
            p.year,
            i18n::season_label(language, p.season),
            p.event
        )));
    }

    if let Some(stats) = panel.stats.as_ref() {
        if !stats.medals_by_sport.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(t(language, Text::MedalsBySport), heading)));
            for m in &stats.medals_by_sport {
                lines.push(Line::from(format!(
                    "{}: {}G {}S {}B",
                    i18n::sport_label(language, &m.name),
                    m.gold,
                    m.silver,
                    m.bronze
                )));
            }
        }
        if !stats.evolution.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(t(language, Text::Evolution), heading)));
            for y in &stats.evolution {
                lines.push(Line::from(format!("{}: {} / {}", y.year, y.total, y.events)));
            }
        }
    }

    f.render_widget(Paragraph::new(lines).scroll((panel.scroll_offset, 0)), inner);
}

fn optional_measure(value: Option<f64>, unit: &str) -> String {
    value.map(|v| format!("{v:.0} {unit}")).unwrap_or_else(|| "-".to_string())
}

fn age_range(min: Option<u8>, max: Option<u8>) -> String {
    match (min, max) {
        (Some(min), Some(max)) if min != max => format!("{min}-{max}"),
        (Some(age), _) | (_, Some(age)) => age.to_string(),
        (None, None) => "-".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn draw_picker(f: &mut Frame, area: Rect, app: &App) {
    let language = app.state.language;
    let picker = &app.state.picker;
    let title = match picker.kind {
        Some(PickerKind::Sport) => t(language, Text::SelectSport),
        _ => t(language, Text::SelectCountry),
    };

    let popup = centered(area, 50, 60);
    f.render_widget(Clear, popup);
    let block = titled(Color::Cyan, title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [query_area, list_area] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new(format!("> {}_", picker.query)).style(Style::default().fg(Color::Cyan)),
        query_area,
    );

    let items: Vec<ListItem> = picker.matches().into_iter().map(|o| ListItem::new(o.label.clone())).collect();
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(picker.selected));
    f.render_stateful_widget(list, list_area, &mut list_state);
}

fn centered(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(middle);
    center
}

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let block = titled(Color::White, t(app.state.language, Text::Help));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let help = [
        ("1-5", "switch tab"),
        ("?/Esc", "open / close help"),
        ("s x m", "cycle season, sex, medal type"),
        ("c p", "pick country, sport"),
        ("h l ← →", "previous / next year"),
        ("a", "toggle all years"),
        ("space", "play / pause the timeline"),
        (">", "cycle playback speed"),
        ("o O", "sort medal table, flip order"),
        ("j k ↑ ↓", "move selection"),
        ("Enter", "open athlete profile"),
        ("/", "search athletes"),
        ("L", "switch language"),
        ("f", "full screen"),
        ("\"", "show logs"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = help
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>10}  "), Style::default().fg(Color::Cyan)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_no_data(f: &mut Frame, area: Rect, language: Language) {
    f.render_widget(
        Paragraph::new(t(language, Text::NoData))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(14), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Filters of the bundle on screen, falling back to the live selection.
fn shown_filters(app: &App) -> &FilterState {
    app.state
        .dashboard
        .filters
        .as_ref()
        .unwrap_or_else(|| app.state.filters.state())
}

fn waiting_text(app: &App) -> &'static str {
    let language = app.state.language;
    if app.state.series_loading {
        t(language, Text::Loading)
    } else {
        t(language, Text::NoData)
    }
}

fn sex_label(language: Language, sex: Sex) -> &'static str {
    match sex {
        Sex::M => t(language, Text::Male),
        Sex::F => t(language, Text::Female),
        Sex::Both => t(language, Text::All),
    }
}

fn medal_label(language: Language, medal_type: MedalType) -> &'static str {
    match medal_type {
        MedalType::Total => t(language, Text::Total),
        MedalType::Gold => t(language, Text::Gold),
        MedalType::Silver => t(language, Text::Silver),
        MedalType::Bronze => t(language, Text::Bronze),
    }
}

fn speed_label(language: Language, speed: PlaybackSpeed) -> &'static str {
    match speed {
        PlaybackSpeed::Slow => t(language, Text::Slow),
        PlaybackSpeed::Normal => t(language, Text::Normal),
        PlaybackSpeed::Fast => t(language, Text::Fast),
    }
}

fn medal_color(medal_type: MedalType) -> Color {
    match medal_type {
        MedalType::Gold => Color::Yellow,
        MedalType::Silver => Color::Gray,
        MedalType::Bronze => Color::Rgb(205, 127, 50),
        MedalType::Total => Color::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olympics_api::EvolutionPoint;
    use std::sync::Arc;

    fn map_stat(id: &str, gold: u32, total: u32) -> MapStat {
        MapStat { id: id.into(), gold, total, ..Default::default() }
    }

    #[test]
    fn countries_rank_by_the_selected_medal() {
        let map = vec![map_stat("USA", 10, 20), map_stat("CHN", 12, 15), map_stat("BRA", 0, 3)];
        assert_eq!(rank_countries(&map, MedalType::Total, 10), vec![("USA", 20), ("CHN", 15), ("BRA", 3)]);
        assert_eq!(rank_countries(&map, MedalType::Gold, 10), vec![("CHN", 12), ("USA", 10)]);
        assert_eq!(rank_countries(&map, MedalType::Total, 1), vec![("USA", 20)]);
    }

    #[test]
    fn axis_bounds_widen_a_single_value() {
        assert_eq!(axis_bounds([170.0, 182.5, 165.0].into_iter()), Some([165.0, 182.5]));
        assert_eq!(axis_bounds([70.0].into_iter()), Some([69.0, 71.0]));
        assert_eq!(axis_bounds(std::iter::empty()), None);
    }

    #[test]
    fn evolution_splits_rows_into_country_lines() {
        let point = |year: u16, counts: &[(&str, f64)]| EvolutionPoint {
            year,
            counts: counts.iter().map(|(c, n)| (c.to_string(), *n)).collect(),
        };
        let bundle = SeriesBundle {
            evolution: Arc::new(vec![
                point(1980, &[("URS", 195.0), ("GDR", 126.0)]),
                point(1984, &[("USA", 174.0)]),
            ]),
            ..Default::default()
        };

        let series = evolution_series(&bundle);
        let codes: Vec<&str> = series.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["GDR", "URS", "USA"]);
        assert_eq!(series[2].1, vec![(1984.0, 174.0)]);
    }

    #[test]
    fn age_range_collapses_equal_bounds() {
        assert_eq!(age_range(Some(19), Some(31)), "19-31");
        assert_eq!(age_range(Some(24), Some(24)), "24");
        assert_eq!(age_range(None, None), "-");
    }
}
