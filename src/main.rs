mod app;
mod components;
mod draw;
mod i18n;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{API_URL_VAR, LOG_LEVEL_VAR};
use crate::state::cache::SeriesCache;
use crate::state::debounce::{Debouncer, FILTER_DEBOUNCE, SEARCH_DEBOUNCE};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::orchestrator::{DataOrchestrator, Resolution, Settled};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{debug, error};
use olympics_api::FilterState;
use olympics_api::client::OlympicsApi;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (settled_filters_tx, settled_filters_rx) = mpsc::channel::<FilterState>(16);
    let (settled_query_tx, settled_query_rx) = mpsc::channel::<String>(16);

    let app = App::new(ui_event_tx.clone());
    let client = Arc::new(OlympicsApi::with_base_url(app.settings.api_url.clone()));
    debug!("using stats backend at {}", client.base_url());
    let app = Arc::new(Mutex::new(app));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread: metadata, search and athlete profiles
    let network_worker = NetworkWorker::new(client.clone(), network_req_rx, network_resp_tx.clone());
    let network_task = tokio::spawn(network_worker.run());

    // Series pipeline: debounced filters feed the orchestrator
    let pipeline = Pipeline {
        orchestrator: DataOrchestrator::new(client, SeriesCache::default(), network_resp_tx),
        filters: Debouncer::spawn(FILTER_DEBOUNCE, settled_filters_tx),
        search: Debouncer::spawn(SEARCH_DEBOUNCE, settled_query_tx),
        last_filters: None,
        last_query: String::new(),
    };

    // Trigger filter metadata load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        pipeline,
        Channels {
            ui_events: ui_event_rx,
            network_requests: network_req_tx,
            network_responses: network_resp_rx,
            settled_filters: settled_filters_rx,
            settled_queries: settled_query_rx,
        },
    )
    .await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("olytui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> String {
    format!(
        "olytui - Olympic Games history in the terminal

Usage:
  olytui
  olytui --help
  olytui --version

Environment:
  {API_URL_VAR:<16} Stats backend base URL (default http://localhost:8000/api)
  {LOG_LEVEL_VAR:<16} Log level: error, warn, info, debug or trace (default info)

Preferences (language, playback speed) are stored in
$XDG_CONFIG_HOME/olytui/preferences.json or ~/.config/olytui/preferences.json"
    )
}

struct Channels {
    ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    network_responses: mpsc::Receiver<NetworkResponse>,
    settled_filters: mpsc::Receiver<FilterState>,
    settled_queries: mpsc::Receiver<String>,
}

/// Everything between a filter edit and the charts.
struct Pipeline {
    orchestrator: DataOrchestrator<OlympicsApi>,
    filters: Debouncer<FilterState>,
    search: Debouncer<String>,
    last_filters: Option<FilterState>,
    last_query: String,
}

impl Pipeline {
    /// Feed changed filters and search input to their debouncers.
    fn sync(&mut self, app: &App) {
        if app.state.filters.is_loaded() {
            let current = app.state.filters.state();
            if self.last_filters.as_ref() != Some(current) {
                self.last_filters = Some(current.clone());
                self.filters.push(current.clone());
            }
        }

        let query = app.state.search.input.trim();
        if query != self.last_query {
            self.last_query = query.to_string();
            self.search.push(query.to_string());
        }
    }
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut pipeline: Pipeline,
    mut channels: Channels,
) {
    let mut loading = LoadingState::default();

    loop {
        let should_redraw = tokio::select! {
            Some(ui_event) = channels.ui_events.recv() => {
                handle_ui_event(ui_event, &app, &channels.network_requests).await
            }

            Some(response) = channels.network_responses.recv() => {
                handle_network_response(response, &app, &mut pipeline, &mut loading).await
            }

            Some(filters) = channels.settled_filters.recv() => {
                request_series(filters, &app, &mut pipeline).await
            }

            Some(query) = channels.settled_queries.recv() => {
                let query = app.lock().await.on_search_settled(query);
                if let Some(query) = query {
                    let _ = channels
                        .network_requests
                        .send(NetworkRequest::SearchAthletes { query })
                        .await;
                }
                true
            }

            else => break,
        };

        let mut app_guard = app.lock().await;
        pipeline.sync(&app_guard);
        if should_redraw {
            draw::draw(&mut terminal, &mut app_guard, loading);
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadFilters).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::PlaybackTick { generation } => {
            let outcome = app.lock().await.on_playback_tick(generation);
            debug!("playback tick {generation}: {outcome:?}");
            true
        }
    }
}

/// Run one orchestration cycle for a settled filter state.
async fn request_series(filters: FilterState, app: &Arc<Mutex<App>>, pipeline: &mut Pipeline) -> bool {
    let mut guard = app.lock().await;
    let playback = guard.playback_context(&filters);
    match pipeline.orchestrator.request(filters.clone(), playback) {
        Resolution::Cached(bundle) => guard.on_series_settled(filters, Settled::Applied(bundle)),
        Resolution::Fetching { generation } => debug!("series request {generation} in flight"),
    }
    guard.set_series_loading(pipeline.orchestrator.is_loading());
    true
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    pipeline: &mut Pipeline,
    loading: &mut LoadingState,
) -> bool {
    let mut guard = app.lock().await;
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::FiltersLoaded { options } => guard.on_filters_loaded(options),
        NetworkResponse::FiltersFailed { message } => guard.on_filters_failed(message),
        NetworkResponse::SeriesLoaded { generation, filters, result } => {
            let playing = guard.state.playback.is_playing();
            let settled = pipeline.orchestrator.on_settled(generation, result, playing);
            guard.on_series_settled(filters, settled);
            guard.set_series_loading(pipeline.orchestrator.is_loading());
        }
        NetworkResponse::SearchResults { query, results } => guard.on_search_results(query, results),
        NetworkResponse::SearchFailed { query, message } => {
            error!("Network error: {message}");
            guard.on_search_failed(query, message);
        }
        NetworkResponse::AthleteLoaded { profile, stats } => guard.on_athlete_loaded(profile, stats),
        NetworkResponse::AthleteFailed { id, message } => guard.on_athlete_failed(id, message),
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
