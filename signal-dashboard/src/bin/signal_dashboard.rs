/// Signal Dashboard TUI
///
/// Market signal + token risk panels fed by on-demand REST lookups, with a
/// live log fed by the backend push stream.
use std::{
    error::Error,
    fs::File,
    io,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rustls::crypto::ring::default_provider;
use signal_dashboard::{
    render_dashboard, ApiClient, Dashboard, DashboardConfig, DashboardEvent, Focus, LogLine,
    StreamFeed, WebSocketClient,
};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = default_provider().install_default();

    let config = DashboardConfig::from_env()?;
    init_logging(&config.log_file)?;
    info!(origin = %config.origin, market = %config.market_id, "Starting signal dashboard");

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

/// Initialise an INFO `Subscriber` for `Tracing` logs, written to a file so
/// the terminal stays clean
fn init_logging(path: &str) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: DashboardConfig,
) -> Result<(), Box<dyn Error>> {
    let api = Arc::new(
        ApiClient::new(config.origin.clone()).with_market_query(config.market_query.clone()),
    );
    let (event_tx, mut event_rx) = mpsc::channel::<DashboardEvent>(1024);

    let mut dashboard = config.dashboard();
    dashboard.handle(DashboardEvent::Log(LogLine::info(
        "UI ready. Load market + paste CA to scan token.",
    )));

    let feed = WebSocketClient::with_config(config.websocket_config()?).start();
    spawn_stream_forwarders(feed, event_tx.clone());

    load_market(&mut dashboard, &api, &event_tx);

    let mut focus: Option<Focus> = None;
    let mut last_draw = Instant::now() - config.tick_rate;

    loop {
        // Apply every pending event before drawing; last write wins
        while let Ok(event) = event_rx.try_recv() {
            dashboard.handle(event);
        }

        if last_draw.elapsed() >= config.tick_rate {
            terminal.draw(|f| render_dashboard(f, &dashboard, focus))?;
            last_draw = Instant::now();
        }

        let timeout = config
            .tick_rate
            .checked_sub(last_draw.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if !event::poll(timeout)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match focus {
            Some(field) => match key.code {
                KeyCode::Esc => focus = None,
                KeyCode::Tab => focus = next_focus(focus),
                KeyCode::Enter => {
                    focus = None;
                    match field {
                        Focus::MarketId => load_market(&mut dashboard, &api, &event_tx),
                        Focus::TokenCa => check_token(&mut dashboard, &api, &event_tx),
                    }
                }
                KeyCode::Backspace => {
                    input_mut(&mut dashboard, field).pop();
                }
                KeyCode::Char(c) => input_mut(&mut dashboard, field).push(c),
                _ => {}
            },
            None => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Tab => focus = next_focus(focus),
                KeyCode::Char('m') => load_market(&mut dashboard, &api, &event_tx),
                KeyCode::Char('t') => check_token(&mut dashboard, &api, &event_tx),
                KeyCode::Char('r') => {
                    load_market(&mut dashboard, &api, &event_tx);
                    check_token(&mut dashboard, &api, &event_tx);
                }
                KeyCode::Char('c') => dashboard.clear_logs(),
                _ => {}
            },
        }
        // Force a redraw after input
        last_draw = Instant::now() - config.tick_rate;
    }

    info!("Signal dashboard shutting down");
    Ok(())
}

fn next_focus(focus: Option<Focus>) -> Option<Focus> {
    match focus {
        None => Some(Focus::MarketId),
        Some(Focus::MarketId) => Some(Focus::TokenCa),
        Some(Focus::TokenCa) => None,
    }
}

fn input_mut(dashboard: &mut Dashboard, field: Focus) -> &mut String {
    match field {
        Focus::MarketId => &mut dashboard.market_id,
        Focus::TokenCa => &mut dashboard.token_ca,
    }
}

/// Forward stream output into the dashboard event channel
fn spawn_stream_forwarders(feed: StreamFeed, event_tx: mpsc::Sender<DashboardEvent>) {
    let StreamFeed {
        mut logs,
        mut states,
        task: _,
    } = feed;

    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(line) = logs.recv().await {
                if tx.send(DashboardEvent::Log(line)).await.is_err() {
                    break;
                }
            }
        });
    }

    tokio::spawn(async move {
        while let Some(state) = states.recv().await {
            if event_tx.send(DashboardEvent::Connection(state)).await.is_err() {
                break;
            }
        }
    });
}

/// Issue a market request; the response lands on the event channel
fn load_market(
    dashboard: &mut Dashboard,
    api: &Arc<ApiClient>,
    event_tx: &mpsc::Sender<DashboardEvent>,
) {
    let id = dashboard.request_market();
    let api = Arc::clone(api);
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api.market(&id).await;
        let _ = tx.send(DashboardEvent::Market { id, result }).await;
    });
}

/// Issue a token check when a contract address is entered
fn check_token(
    dashboard: &mut Dashboard,
    api: &Arc<ApiClient>,
    event_tx: &mpsc::Sender<DashboardEvent>,
) {
    let Some(ca) = dashboard.request_token() else {
        return;
    };
    let api = Arc::clone(api);
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api.token(&ca).await;
        let _ = tx.send(DashboardEvent::Token { ca, result }).await;
    });
}
