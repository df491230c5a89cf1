mod app;
mod cli;
mod commands;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod ui;

use app::{App, HistoryState, Screen};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::OpenMeteoClient;
use error::Result;
use logic::{ForecastRequest, ForecastService};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{
    AccuracyScreen, DashboardScreen, ForecastScreen, HistoryScreen, ScheduleScreen, SettingsScreen,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.command.is_none());

    match &cli.command {
        Some(Commands::Init) => {
            Config::setup_interactive()?;
            return Ok(());
        }
        Some(Commands::Accuracy { file }) => return commands::accuracy(file),
        _ => {}
    }

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `irrigops init` to create a config, or pass --config PATH");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Check) => commands::check(&config).await,
        Some(Commands::Schedule) => commands::schedule(&config).await,
        Some(Commands::Export { output }) => commands::export(&config, &output).await,
        Some(Commands::Init) | Some(Commands::Accuracy { .. }) => Ok(()),
        None => run_tui(config).await,
    }
}

/// `-v` debug, `-vv` trace; RUST_LOG wins. The TUI stays silent unless RUST_LOG is set.
fn init_logging(verbose: u8, tui: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if tui => return,
        Err(_) => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "irrigops=debug",
            _ => "irrigops=trace",
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_tui(config: Config) -> anyhow::Result<()> {
    let client = OpenMeteoClient::new(&config.forecast)?;
    let mut forecast_service = ForecastService::new(client, config.forecast.cache_ttl());
    let request = config.forecast_request();

    let mut app = App::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &mut forecast_service, &request).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    forecast_service: &mut ForecastService<OpenMeteoClient>,
    request: &ForecastRequest,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        // Fetch after drawing so the "Fetching" state is visible
        if app.needs_refresh {
            app.needs_refresh = false;
            if app.force_refresh {
                app.force_refresh = false;
                forecast_service.invalidate(request);
            }
            let acquired = forecast_service.fetch(request).await;
            app.update_forecast(acquired);
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let editing = app.settings_state.editing;
                match key.code {
                    KeyCode::Char('q') if !editing => app.quit(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Esc if !editing => app.switch_screen(Screen::Dashboard),
                    KeyCode::Char('r') if !editing => app.request_refresh(),
                    KeyCode::Char(c) if !editing => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.switch_screen(screen);
                        } else {
                            handle_screen_input(app, key.code);
                        }
                    }
                    _ => handle_screen_input(app, key.code),
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(f: &mut ratatui::Frame, app: &App) {
    let area = f.area();

    match app.screen {
        Screen::Dashboard => {
            let screen = DashboardScreen::new(
                &app.config.location.name,
                &app.block,
                app.acquired.as_ref(),
                app.plan.as_ref(),
            )
            .with_r2(app.accuracy.display_r2())
            .with_status(app.status_message.as_deref());
            f.render_widget(screen, area);
        }
        Screen::Forecast => {
            let screen = ForecastScreen::new(app.acquired.as_ref(), app.plan.as_ref());
            f.render_widget(screen, area);
        }
        Screen::Schedule => {
            let export_dir = app.export_dir();
            let screen = ScheduleScreen::new(app.plan.as_ref(), &app.block, &export_dir)
                .with_selection(app.schedule_state.selected_index)
                .with_status(app.status_message.as_deref());
            f.render_widget(screen, area);
        }
        Screen::History => {
            let screen = match &app.history {
                HistoryState::Loaded(summary) => HistoryScreen::new(Some(summary)),
                HistoryState::Failed(err) => HistoryScreen::new(None).with_error(Some(err)),
                HistoryState::NotConfigured => HistoryScreen::new(None),
            };
            f.render_widget(screen, area);
        }
        Screen::Accuracy => {
            f.render_widget(AccuracyScreen::new(&app.accuracy), area);
        }
        Screen::Settings => {
            let screen = SettingsScreen::new(&app.block)
                .with_focus(app.settings_state.focused_field)
                .editing(app.settings_state.editing, &app.settings_state.edit_buffer);
            f.render_widget(screen, area);
        }
    }
}

fn handle_screen_input(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::Schedule => handle_schedule_input(app, code),
        Screen::Settings => handle_settings_input(app, code),
        _ => {}
    }
}

fn handle_schedule_input(app: &mut App, code: KeyCode) {
    let count = app.plan.as_ref().map_or(0, |p| p.events.len());
    match code {
        KeyCode::Up => app.schedule_state.prev(),
        KeyCode::Down => app.schedule_state.next(count),
        KeyCode::Char('e') => app.export_schedule(),
        _ => {}
    }
}

fn handle_settings_input(app: &mut App, code: KeyCode) {
    if app.settings_state.editing {
        match code {
            KeyCode::Esc => app.settings_state.cancel_editing(),
            KeyCode::Enter => {
                let value = app.settings_state.finish_editing();
                let field = app.settings_state.focused_field;
                app.apply_setting(field, &value);
            }
            KeyCode::Backspace => {
                app.settings_state.edit_buffer.pop();
            }
            KeyCode::Char(c) => app.settings_state.edit_buffer.push(c),
            _ => {}
        }
    } else {
        match code {
            KeyCode::Up => app.settings_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => app.settings_state.next_field(),
            KeyCode::Left => app.cycle_setting(false),
            KeyCode::Right => app.cycle_setting(true),
            KeyCode::Enter => {
                let current = app.settings_state.focused_field.value_of(&app.block);
                app.settings_state.start_editing(&current);
            }
            _ => {}
        }
    }
}
