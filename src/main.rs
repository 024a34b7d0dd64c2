// ============================================================================
// LazySwap - Convertisseur fiat → crypto en temps réel
// ============================================================================
// Programme TUI : saisie d'un montant fiat, liste des cryptos classées,
// conversion instantanée et tendance sur 7 jours (CoinGecko)
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : Render → Input → Update
// 3. Worker thread + channels : les appels réseau ne bloquent jamais l'UI
// 4. État possédé par la boucle : pas de Arc<Mutex<App>>, le worker ne
//    voit que des commandes et renvoie des résultats
// ============================================================================

use std::io;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use lazyswap::api::CoinGeckoClient;
use lazyswap::app::{App, AppCommand, AppResult};
use lazyswap::config::Config;
use lazyswap::handler::handle_event;
use lazyswap::ui::{render, EventHandler};
use lazyswap::worker::spawn_background_worker;

// ============================================================================
// Logging
// ============================================================================
// Le TUI occupe stdout : les logs vont dans un fichier à rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Répertoire : LAZYSWAP_LOG_DIR, sinon le répertoire de données local
/// (ex : ~/.local/share/lazyswap/logs sous Linux).
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/lazyswap/logs/lazyswap.log.*
/// RUST_LOG=lazyswap=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyswap.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Distingue l'UI du worker
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazyswap, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyswap=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::from_env();

    // Logging avant tout le reste ; un échec n'empêche pas de démarrer
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(
        api = %config.api_base_url,
        timeout = ?config.request_timeout,
        fiat = %config.default_fiat,
        "LazySwap starting up"
    );

    let client = CoinGeckoClient::new(&config)?;

    // command_tx/rx : UI → worker ; result_tx/rx : worker → UI
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    let worker = spawn_background_worker(client, command_rx, result_tx)?;

    let mut app = App::new(config.default_fiat);
    command_tx
        .send(app.start())
        .context("Le worker s'est arrêté avant le premier fetch")?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Fermer le channel arrête la boucle du worker
    drop(command_tx);
    if worker.join().is_err() {
        warn!("Worker thread panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event loop
// ============================================================================

/// Boucle principale
///
/// 1. Applique les résultats du worker (try_recv, non bloquant)
/// 2. Dessine
/// 3. Attend un événement (poll 250ms) et le traduit en transition
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    while app.is_running() {
        while let Ok(result) = result_rx.try_recv() {
            if let Some(command) = app.apply_result(result) {
                dispatch(command_tx, command)?;
            }
        }

        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        if let Some(command) = handle_event(app, event) {
            dispatch(command_tx, command)?;
        }
    }

    Ok(())
}

fn dispatch(command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) -> Result<()> {
    debug!(?command, "Dispatching command");
    command_tx
        .send(command)
        .context("Le worker ne répond plus (channel fermé)")
}

// ============================================================================
// Terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
