// ============================================================================
// LazyFx - Convertisseur de devises dans le terminal
// ============================================================================
// Formulaire TUI : deux sélecteurs de devises, un montant, un résultat.
// Le taux est récupéré en direct depuis ExchangeRate-API.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Worker thread + channels : l'appel réseau ne bloque jamais l'UI
// 4. RAII : restauration du terminal même en cas d'erreur
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use lazyfx::api::{ExchangeRateApi, RateError};
use lazyfx::app::App;
use lazyfx::converter::{ConversionError, Converter};
use lazyfx::models::{ConversionRequest, ConversionResult};
use lazyfx::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand / AppResult : messages entre l'UI et le worker
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker exécute la conversion (appel réseau async)
// - Le résultat revient par un second channel, relevé à chaque tick
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Convertir une demande déjà validée
    /// - id : identifiant de la demande (pour ignorer les résultats périmés)
    Convert { id: u64, request: ConversionRequest },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Issue d'une conversion (succès ou erreur typée)
    Converted {
        id: u64,
        outcome: Result<ConversionResult, ConversionError>,
    },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Répertoire des logs
///
/// - Linux : ~/.local/share/lazyfx/logs
/// - macOS : ~/Library/Application Support/lazyfx/logs
/// - Windows : C:\Users\<user>\AppData\Local\lazyfx\logs
/// - Sinon : ./logs
fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazyfx").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyfx/logs/lazyfx.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=trace cargo run
/// ```
fn init_logging() -> Result<PathBuf> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyfx.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true) // utile pour distinguer UI et worker
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazyfx, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyfx=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(log_dir)
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Si le logging échoue, on prévient et on continue sans
    if let Err(e) = init_logging() {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    }

    info!("LazyFx starting up");

    // Le runtime et le client HTTP sont créés ici : une erreur remonte
    // proprement avant de passer le terminal en raw mode
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    let converter = Converter::new(ExchangeRateApi::new()?);

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(runtime, converter, command_rx, result_tx);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new();
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Thread + async runtime
// - std::thread::spawn() : crée un thread OS
// - runtime.block_on() bloque le worker, jamais l'UI
// - Les commandes sont traitées une par une : une seule requête en vol
// ============================================================================

/// Worker thread qui exécute les conversions en arrière-plan
///
/// # Arguments
/// * `runtime` - Runtime tokio possédé par le worker
/// * `converter` - Convertisseur branché sur le vrai fournisseur
/// * `command_rx` - Receiver pour recevoir les commandes
/// * `result_tx` - Sender pour envoyer les résultats
fn spawn_background_worker(
    runtime: tokio::runtime::Runtime,
    converter: Converter<ExchangeRateApi>,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) {
    std::thread::spawn(move || {
        // recv() échoue quand l'UI a lâché son Sender : fin du worker
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            match command {
                AppCommand::Convert { id, request } => {
                    let outcome = runtime.block_on(converter.convert(request));

                    match &outcome {
                        Ok(result) => info!(id, value = %result.display(), "Conversion succeeded"),
                        Err(e) => error!(id, error = %e, detail = %e.detail(), "Conversion failed"),
                    }

                    if result_tx.send(AppResult::Converted { id, outcome }).is_err() {
                        debug!("UI closed before result delivery");
                        break;
                    }
                }
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Relever les résultats du worker (non bloquant)
//   1. Dessiner l'interface
//   2. Traiter un événement clavier (ou un tick après 250ms)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    while app.is_running() {
        // CONCEPT : Non-blocking receive avec try_recv
        // - Ok(result) : applique le résultat
        // - Empty : rien à faire
        // - Disconnected : le worker est mort
        match result_rx.try_recv() {
            Ok(AppResult::Converted { id, outcome }) => {
                app.finish_conversion(id, outcome);
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                if app.is_loading_data() {
                    error!("Worker thread disconnected during a conversion");
                    abort_conversion(app);
                }
            }
        }

        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        handle_event(app, event, &command_tx);
    }

    Ok(())
}

/// Termine une conversion qui n'aura jamais de réponse (worker indisponible)
fn abort_conversion(app: &mut App) {
    // L'identifiant courant est celui de la demande en vol
    let id = app.current_request_id();
    app.finish_conversion(
        id,
        Err(ConversionError::RateUnavailable(RateError::NetworkFailure(
            "background worker unavailable".to_string(),
        ))),
    );
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - La popup modale capture les touches en priorité
/// - Puis les actions globales (quit, convert, clear)
/// - Puis l'édition du champ qui a le focus
fn handle_event(
    app: &mut App,
    event: lazyfx::ui::events::Event,
    command_tx: &mpsc::Sender<AppCommand>,
) {
    use lazyfx::ui::events::{
        get_char_from_event, is_amount_char_event, is_backspace_event, is_clear_event,
        is_enter_event, is_escape_event, is_force_quit_event, is_next_currency_event,
        is_next_field_event, is_previous_currency_event, is_previous_field_event, is_quit_event,
        is_space_event, Event,
    };

    if matches!(event, Event::Tick) {
        return;
    }

    if is_force_quit_event(&event) {
        info!("User forced quit (Ctrl+C)");
        app.quit();
        return;
    }

    // Popup ouverte : Enter / Esc / Space la ferment, le reste est ignoré
    if app.is_showing_popup() {
        if is_enter_event(&event) || is_escape_event(&event) || is_space_event(&event) {
            debug!("User dismissed popup");
            app.dismiss_popup();
        }
        return;
    }

    if is_quit_event(&event) {
        // Two-step : première pression = demande, seconde = quit réel
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return;
    }

    // Toute autre touche annule la confirmation de quit
    app.cancel_quit();

    if is_enter_event(&event) {
        if let Some((id, request)) = app.start_conversion() {
            info!(id, from = %request.from, to = %request.to, amount = request.amount(), "User requested conversion");
            if command_tx.send(AppCommand::Convert { id, request }).is_err() {
                error!("Worker thread unavailable, cannot convert");
                abort_conversion(app);
            }
        }
    } else if is_clear_event(&event) {
        info!("User cleared the form");
        app.clear();
    } else if is_next_field_event(&event) {
        app.focus_next();
    } else if is_previous_field_event(&event) {
        app.focus_previous();
    } else if is_next_currency_event(&event) {
        app.next_currency();
        debug!(from = %app.from, to = %app.to, "Currency changed");
    } else if is_previous_currency_event(&event) {
        app.previous_currency();
        debug!(from = %app.from, to = %app.to, "Currency changed");
    } else if is_backspace_event(&event) {
        app.backspace();
    } else if is_amount_char_event(&event) {
        if let Some(c) = get_char_from_event(&event) {
            app.append_char(c);
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Échec de la création du terminal")
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
