// ============================================================================
// Lumenboard - Tableau de bord analytique en terminal
// ============================================================================
// Affiche ventes, prévisions, sentiment et corrélations, annotés et narrés.
// Les données viennent du générateur mock ou de l'API d'analyse.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : un worker thread possède le runtime tokio
// 4. Channels mpsc : commandes vers le worker, résultats vers l'UI
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use lumenboard::api::mock::{mock_correlation, mock_dashboard, mock_scatter, MOCK_SCATTER_POINTS};
use lumenboard::api::{AnalysisClient, ApiError, TokenStatus};
use lumenboard::app::{App, Tab};
use lumenboard::config::{Config, DataSource};
use lumenboard::models::{AnalysisReport, DashboardData};
use lumenboard::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand / AppResult : protocole avec le worker thread
// ============================================================================

/// Commandes envoyées au worker thread pour exécuter des tâches async
#[derive(Debug, Clone)]
enum AppCommand {
    /// (Re)charge le tableau de bord depuis la source configurée
    LoadDashboard,

    /// Envoie un CSV à l'API puis charge le tableau de bord de cette analyse
    AnalyzeFile { path: PathBuf },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Données prêtes à afficher
    DashboardLoaded(DashboardData),

    /// Solde de crédits reçu
    TokensLoaded(TokenStatus),

    /// Analyse créée par l'upload d'un CSV, avec ses conclusions
    Analyzed {
        analysis_id: String,
        report: AnalysisReport,
    },

    /// Erreur lors d'un chargement
    /// CONCEPT : api_error conserve le statut typé (401, 402, 429) pour que
    /// l'UI ajuste la bannière et le badge
    LoadError {
        error: String,
        api_error: Option<ApiError>,
    },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans `Config::log_dir()` :
/// - Linux/WSL : ~/.local/share/lumenboard/logs/lumenboard.log
/// - macOS : ~/Library/Application Support/lumenboard/logs/lumenboard.log
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/lumenboard/logs/lumenboard.log
/// RUST_LOG=lumenboard=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lumenboard.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG prioritaire, sinon debug pour lumenboard et info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumenboard=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // La configuration passe avant le logging : elle choisit le répertoire des logs
    let config = Config::from_env().context("Configuration invalide")?;

    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(source = config.data_source.label(), "Lumenboard starting up");

    // Argument optionnel : CSV à analyser (mode API uniquement)
    let csv_path = std::env::args().nth(1).map(PathBuf::from);
    if csv_path.is_some() && config.data_source == DataSource::Mock {
        warn!("CSV argument ignored in mock mode");
        eprintln!("⚠️  Un fichier CSV n'est analysé qu'avec LUMENBOARD_DATA_SOURCE=api");
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
    // - Le worker active l'indicateur de chargement, l'UI lit l'état
    let app = Arc::new(Mutex::new(App::with_config(&config)));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(config.clone(), command_rx, result_tx, app.clone());

    // Premier chargement
    let first = match (config.data_source, csv_path) {
        (DataSource::Api, Some(path)) => AppCommand::AnalyzeFile { path },
        _ => AppCommand::LoadDashboard,
    };
    let _ = command_tx.send(first);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app.clone(), &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Chargement des données (mode API)
// ============================================================================

/// Construit le tableau de bord d'une analyse
///
/// Sans identifiant, prend la plus récente de l'historique. Le nuage et la
/// heatmap ne sont pas servis par l'API : ils restent simulés. `report`
/// accompagne l'analyse issue d'un upload de ce poste.
async fn load_api_dashboard(
    client: &AnalysisClient,
    config: &Config,
    analysis_id: Option<&str>,
    report: Option<AnalysisReport>,
) -> Result<DashboardData> {
    let analysis_id = match analysis_id {
        Some(id) => id.to_string(),
        None => client
            .history()
            .await?
            .into_iter()
            .find_map(|record| record.id)
            .context("Aucune analyse disponible : lancez `lumenboard ventes.csv`")?,
    };
    info!(analysis_id = %analysis_id, "Loading analysis dashboard");

    let forecast = client.forecast(&analysis_id, config.forecast_days).await?;
    let explain = client.explain(&analysis_id).await?;

    let series = forecast.forecast.to_time_series()?;
    let projection = forecast.forecast.projection()?;
    let summary = forecast
        .forecast
        .trend
        .as_ref()
        .map(|trend| format!("Trend {} (confidence {:.2})", trend.direction, trend.confidence));

    let mut rng = rand::thread_rng();
    Ok(DashboardData {
        series,
        projection,
        explanations: explain.explanations.feature_importance,
        summary,
        report,
        scatter: mock_scatter(&mut rng, MOCK_SCATTER_POINTS),
        correlation: mock_correlation(&mut rng),
    })
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui traite les commandes async
// - Reçoit des AppCommand, envoie des AppResult
// - Les appels API ne bloquent jamais l'UI
// ============================================================================

/// Envoie une erreur à l'UI en conservant son statut HTTP typé
///
/// CONCEPT RUST : downcast_ref
/// - anyhow::Error retrouve l'ApiError d'origine, même sous un .context()
fn send_error(result_tx: &mpsc::Sender<AppResult>, what: &str, err: anyhow::Error) {
    let api_error = err.downcast_ref::<ApiError>().cloned();
    error!(error = ?err, "{}", what);
    let _ = result_tx.send(AppResult::LoadError {
        error: format!("{} : {:#}", what, err),
        api_error,
    });
}

/// Worker thread qui exécute les tâches async en arrière-plan
///
/// # Arguments
/// * `config` - Source des données et paramètres de l'API
/// * `command_rx` - Receiver pour recevoir les commandes
/// * `result_tx` - Sender pour envoyer les résultats
/// * `app` - Arc<Mutex<App>> pour l'indicateur de chargement
fn spawn_background_worker(
    config: Config,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                send_error(&result_tx, "Échec de la création du runtime tokio", e.into());
                return;
            }
        };

        // Client HTTP créé une seule fois (mode API uniquement)
        let client = match config.data_source {
            DataSource::Api => match AnalysisClient::from_config(&config) {
                Ok(client) => Some(client),
                Err(e) => {
                    send_error(&result_tx, "Client API indisponible", e);
                    None
                }
            },
            DataSource::Mock => None,
        };

        // Analyse courante : configurée, ou issue du dernier upload
        let mut analysis_id = config.analysis_id.clone();
        let mut report: Option<AnalysisReport> = None;

        // CONCEPT : Command processing loop
        // - recv() bloque jusqu'à la prochaine commande
        // - Err = channel fermé (l'UI a quitté)
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            match command {
                AppCommand::LoadDashboard => {
                    {
                        let mut app_lock = app.lock().unwrap();
                        app_lock.start_loading(Some(format!(
                            "Chargement des données ({})...",
                            config.data_source.label()
                        )));
                    }

                    match &client {
                        None if config.data_source == DataSource::Mock => {
                            let data = mock_dashboard(&mut rand::thread_rng());
                            let _ = result_tx.send(AppResult::DashboardLoaded(data));
                        }
                        None => {
                            let _ = result_tx.send(AppResult::LoadError {
                                error: "Client API indisponible".to_string(),
                                api_error: None,
                            });
                        }
                        Some(client) => {
                            let result = runtime.block_on(load_api_dashboard(
                                client,
                                &config,
                                analysis_id.as_deref(),
                                report.clone(),
                            ));
                            match result {
                                Ok(data) => {
                                    let _ = result_tx.send(AppResult::DashboardLoaded(data));
                                }
                                Err(e) => send_error(&result_tx, "Échec du chargement", e),
                            }

                            // Chaque appel consomme des crédits : on rafraîchit le badge
                            match runtime.block_on(client.token_status()) {
                                Ok(status) => {
                                    let _ = result_tx.send(AppResult::TokensLoaded(status));
                                }
                                Err(e) => warn!(error = ?e, "Failed to refresh token status"),
                            }
                        }
                    }

                    {
                        let mut app_lock = app.lock().unwrap();
                        app_lock.stop_loading();
                    }
                }

                AppCommand::AnalyzeFile { path } => {
                    let Some(client) = &client else {
                        continue;
                    };

                    {
                        let mut app_lock = app.lock().unwrap();
                        app_lock.start_loading(Some(format!("Analyse de {}...", path.display())));
                    }

                    match runtime.block_on(client.analyze(&path)) {
                        Ok(response) => match response.analysis_id {
                            Some(id) => {
                                let analysis_report = response
                                    .insights
                                    .as_ref()
                                    .map(|insights| insights.to_report())
                                    .unwrap_or_default();
                                analysis_id = Some(id.clone());
                                report = Some(analysis_report.clone());
                                let _ = result_tx.send(AppResult::Analyzed {
                                    analysis_id: id,
                                    report: analysis_report,
                                });
                            }
                            None => {
                                let _ = result_tx.send(AppResult::LoadError {
                                    error: "L'API n'a pas renvoyé d'identifiant d'analyse".to_string(),
                                    api_error: None,
                                });
                            }
                        },
                        Err(e) => send_error(&result_tx, "Échec de l'analyse", e),
                    }

                    {
                        let mut app_lock = app.lock().unwrap();
                        app_lock.stop_loading();
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
//   0. Résultats du worker
//   1. Render
//   2. Input
//   3. Update (tick : mode live)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // ========================================
        // 0. RÉSULTATS : try_recv ne bloque pas
        // ========================================
        match result_rx.try_recv() {
            Ok(result) => {
                let mut app_lock = app.lock().unwrap();
                match result {
                    AppResult::DashboardLoaded(data) => app_lock.set_data(data),
                    AppResult::TokensLoaded(status) => {
                        debug!(badge = %status.badge(), "Token status updated");
                        app_lock.set_token_status(status);
                    }
                    AppResult::Analyzed { analysis_id, report } => {
                        info!(analysis_id = %analysis_id, "CSV analysed, loading its dashboard");
                        app_lock.set_report(report);
                        let _ = command_tx.send(AppCommand::LoadDashboard);
                    }
                    AppResult::LoadError { error, api_error } => {
                        app_lock.report_error(error, api_error.as_ref());
                    }
                }
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        // ========================================
        // 1. RENDER
        // ========================================
        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        // ========================================
        // 2. INPUT
        // ========================================
        match events.next() {
            Ok(event) => {
                let mut app_lock = app.lock().unwrap();
                handle_event(&mut app_lock, event, &command_tx);
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read terminal event");
            }
        }

        // ========================================
        // 3. UPDATE
        // ========================================
        {
            let mut app_lock = app.lock().unwrap();
            app_lock.tick();
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Chaque bras teste une touche via un helper is_*_event
/// - Toute touche autre que 'q' annule une confirmation de sortie en cours
fn handle_event(app: &mut App, event: lumenboard::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lumenboard::ui::events::{
        is_annotations_event, is_escape_event, is_insights_event, is_left_event, is_next_tab_event,
        is_previous_tab_event, is_quit_event, is_reload_event, is_right_event, is_space_event,
        tab_number_from_event, Event,
    };

    if let Event::Key(_) = event {
        if !is_quit_event(&event) {
            app.cancel_quit();
        }
    }

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step quit
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_escape_event(&event) => {
            app.clear_error();
        }

        Event::Key(_) if is_next_tab_event(&event) => app.next_tab(),
        Event::Key(_) if is_previous_tab_event(&event) => app.previous_tab(),
        Event::Key(_) if tab_number_from_event(&event).is_some() => {
            if let Some(tab) = tab_number_from_event(&event).and_then(Tab::from_index) {
                app.select_tab(tab);
            }
        }

        Event::Key(_) if is_left_event(&event) => app.cursor_left(),
        Event::Key(_) if is_right_event(&event) => app.cursor_right(),

        Event::Key(_) if is_annotations_event(&event) => {
            app.toggle_annotations();
            debug!(visible = app.show_annotations, "Annotations toggled");
        }
        Event::Key(_) if is_insights_event(&event) => {
            app.toggle_insights();
            debug!(visible = app.show_insights, "Insights panel toggled");
        }
        Event::Key(_) if is_space_event(&event) => app.toggle_live_mode(),

        Event::Key(_) if is_reload_event(&event) => {
            if app.is_loading_data() {
                debug!("Reload ignored, already loading");
            } else {
                info!("User requested reload");
                app.clear_error();
                let _ = command_tx.send(AppCommand::LoadDashboard);
            }
        }

        Event::Key(_) | Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
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
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

// ============================================================================
// Notes pédagogiques
// ============================================================================
//
// 1. Worker thread + runtime tokio
//    - L'UI reste synchrone, le worker fait block_on sur les appels HTTP
//
// 2. Erreurs typées à travers anyhow
//    - thiserror définit ApiError, anyhow la transporte, downcast_ref la
//      retrouve côté worker
//
// 3. Lock scope minimisé
//    - Chaque accès à App prend le Mutex dans un bloc { } court
//
// ============================================================================
