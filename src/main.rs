mod animation;
mod app;
mod config;
mod context;
mod error;
mod event;
mod guard;
mod menu;
mod notify;
mod platform;
mod profile;
mod switch;
mod ui;

#[cfg(test)]
mod testing;

use std::io;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Handle;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::app::App;
use crate::config::{CliArgs, Config};
use crate::context::Subsystems;
use crate::error::SwitcherError;
use crate::event::EventHandler;
use crate::menu::SwitcherMenu;
use crate::notify::{Notifications, ToastBoard};
use crate::platform::JsonNetConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    if cli.print_default_config {
        print!("{}", config::default_config_toml());
        return Ok(());
    }

    // Initialize color-eyre with custom panic hook that restores terminal
    install_panic_hook();

    let config = config::load(&cli)?;

    // Must outlive the event loop or buffered log lines are lost
    let _log_guard = init_logging(&config)?;

    info!("net-switcher starting");

    // Subsystems shared by the menu and its switch workers
    let toasts = ToastBoard::new();
    let notifications = Notifications::new(
        &config.general.notification_prefix,
        config.notifications.duration_secs,
        toasts.clone(),
    );
    let store = JsonNetConfig::new(config.store_path(), config.latency());
    let store_label = store.path().display().to_string();
    info!("Using profile store {}", store_label);
    let subsystems = Subsystems::new(notifications, store);

    // Create event handler
    let mut event_handler = EventHandler::new(config.tick_rate());

    // Create app and open the menu
    let menu = SwitcherMenu::new(subsystems, Handle::current(), event_handler.sender());
    let mut app = App::new(menu, toasts, store_label);
    app.open_menu();

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| SwitcherError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // ── Main event loop ───────────────────────────────────────────────
    let result = run(&mut terminal, &mut app, &mut event_handler).await;

    // Close the menu even if drawing failed
    app.quit();
    event_handler.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("net-switcher exiting");
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match events.next().await {
            Some(event) => app.handle_event(event),
            None => break,
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call default handler
        default_hook(panic_info);
    }));
    color_eyre::install().ok();
}

/// Initialize tracing to a file in the log directory (the TUI owns stdout).
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    use tracing_subscriber::EnvFilter;

    let dir = Config::log_dir();
    std::fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, "net-switcher.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.general.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
