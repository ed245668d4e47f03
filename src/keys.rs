use crate::app::{App, MenuItem};
use crate::state::app_state::PickerKind;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut load_athlete = None;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        quit(&guard);
    }

    // Picker and search input capture every key while open.
    if guard.state.picker.is_open() {
        match key_event.code {
            KeyCode::Esc => guard.state.picker.close(),
            KeyCode::Enter => guard.confirm_picker(),
            KeyCode::Down => guard.state.picker.move_down(),
            KeyCode::Up => guard.state.picker.move_up(),
            KeyCode::Backspace => guard.state.picker.pop_char(),
            Char(c) => guard.state.picker.push_char(c),
            _ => {}
        }
        return;
    }

    if guard.state.search.composing {
        match key_event.code {
            KeyCode::Esc => guard.state.search.composing = false,
            KeyCode::Enter => load_athlete = guard.select_search_result(),
            KeyCode::Down => guard.state.search.select_next(),
            KeyCode::Up => guard.state.search.select_prev(),
            KeyCode::Backspace => guard.search_pop(),
            Char(c) => guard.search_push(c),
            _ => {}
        }
    } else {
        match (guard.state.active_tab, key_event.code) {
            (_, Char('q')) => quit(&guard),

            // Tab switching
            (_, Char('1')) => guard.update_tab(MenuItem::Overview),
            (_, Char('2')) => guard.update_tab(MenuItem::Athletes),
            (_, Char('3')) => guard.update_tab(MenuItem::Biometrics),
            (_, Char('4')) => guard.update_tab(MenuItem::Evolution),
            (_, Char('5')) => guard.update_tab(MenuItem::Search),
            (_, Char('?')) => guard.update_tab(MenuItem::Help),
            (MenuItem::Help, KeyCode::Esc) => guard.exit_help(),

            // Filters
            (_, Char('s')) => guard.cycle_season(),
            (_, Char('x')) => guard.cycle_sex(),
            (_, Char('m')) => guard.cycle_medal_type(),
            (_, Char('c')) => guard.open_picker(PickerKind::Country),
            (_, Char('p')) => guard.open_picker(PickerKind::Sport),
            (_, Char('h') | KeyCode::Left) => guard.step_year(-1),
            (_, Char('l') | KeyCode::Right) => guard.step_year(1),
            (_, Char('a')) => guard.toggle_all_years(),

            // Playback
            (_, Char(' ')) => {
                guard.toggle_playback();
            }
            (_, Char('>')) => guard.cycle_playback_speed(),

            // Medal table
            (MenuItem::Overview, Char('o')) => guard.state.medal_table.cycle_column(),
            (MenuItem::Overview, Char('O')) => guard.state.medal_table.flip_direction(),
            (MenuItem::Overview, Char('j') | KeyCode::Down) => guard.medal_table_down(),
            (MenuItem::Overview, Char('k') | KeyCode::Up) => guard.state.medal_table.scroll_up(),

            // Top athletes
            (MenuItem::Athletes, Char('j') | KeyCode::Down) => guard.top_athlete_down(),
            (MenuItem::Athletes, Char('k') | KeyCode::Up) => guard.top_athlete_up(),
            (MenuItem::Athletes, KeyCode::Enter) => load_athlete = guard.select_top_athlete(),

            // Search / profile
            (_, Char('/')) => guard.start_search(),
            (MenuItem::Search, Char('j') | KeyCode::Down) => guard.state.search.select_next(),
            (MenuItem::Search, Char('k') | KeyCode::Up) => guard.state.search.select_prev(),
            (MenuItem::Search, KeyCode::Enter) => load_athlete = guard.select_search_result(),
            (MenuItem::Search, KeyCode::PageDown) => {
                guard.state.athlete.scroll_offset = guard.state.athlete.scroll_offset.saturating_add(1);
            }
            (MenuItem::Search, KeyCode::PageUp) => {
                guard.state.athlete.scroll_offset = guard.state.athlete.scroll_offset.saturating_sub(1);
            }

            // Global
            (_, Char('L')) => guard.toggle_language(),
            (_, Char('f')) => guard.toggle_full_screen(),
            (_, Char('"')) => guard.toggle_show_logs(),

            _ => {}
        }
    }

    if let Some(id) = load_athlete {
        drop(guard);
        let _ = network_requests.send(NetworkRequest::LoadAthlete { id }).await;
    }
}

fn quit(app: &App) -> ! {
    app.save_preferences();
    crate::cleanup_terminal();
    std::process::exit(0);
}
