//! esimstore - Browse countries and their eSIM data plans
//!
//! A terminal UI application that lists the countries an eSIM storefront
//! sells plans for, priced in the user's preferred currency and language.

use std::io::{self, Stdout};
use std::panic;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use esimstore::api::EsimClient;
use esimstore::app::App;
use esimstore::cache::CacheManager;
use esimstore::catalog::Catalog;
use esimstore::cli::{Cli, StartupConfig};
use esimstore::logging;
use esimstore::prefs::PreferencesStore;
use esimstore::storage::{FileStore, KeyValueStore};
use esimstore::ui;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Main event loop: draw, run pending loads, handle one key
async fn run(terminal: &mut Tui, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Show the loading state before waiting on cache or network
        if app.start_pending_loads() {
            terminal.draw(|f| ui::render(f, app))?;
            app.load_pending().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let data_dir = config.resolve_data_dir()?;
    match logging::init(&data_dir, &config.log_level) {
        Ok(log_path) => tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            api_url = %config.api_url,
            log = %log_path.display(),
            "starting esimstore"
        ),
        Err(e) => eprintln!("Warning: logging disabled: {}", e),
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::with_dir(data_dir));
    let preferences = PreferencesStore::open(store.clone());
    let catalog = Catalog::new(
        CacheManager::new(store),
        EsimClient::with_base_url(config.api_url.as_str()),
    );
    let mut app = App::with_startup_config(&config, preferences.clone(), catalog);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    // Let queued preference writes reach the disk
    preferences.flush().await;
    tracing::info!("exiting");

    result
}
