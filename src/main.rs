//! Weather dashboard - current weather, forecast and map in the terminal
//!
//! Shows conditions for the current location (looked up from the public IP)
//! or for a city searched by name.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use wxdash::app::App;
use wxdash::cli::{Cli, InitialAction, StartupConfig};
use wxdash::config::{self, Config, API_KEY_ENV};
use wxdash::controller::WeatherViewController;
use wxdash::data::{TemperatureUnit, WeatherClient};
use wxdash::location::{DisabledLocator, IpGeolocator, LocationSource};
use wxdash::logging;
use wxdash::map::{MapView, OverlaySettings};
use wxdash::ui;

/// Everything resolved before the terminal is taken over
struct Startup {
    startup: StartupConfig,
    config: Config,
    api_key: String,
}

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn prepare(cli: &Cli) -> Result<Startup, Box<dyn std::error::Error>> {
    let startup = StartupConfig::from_cli(cli)?;
    let config = Config::load(cli.config.as_deref())?;

    let env_key = std::env::var(API_KEY_ENV).ok();
    let api_key = config::resolve_api_key(
        cli.api_key.as_deref(),
        env_key.as_deref(),
        config.api_key.as_deref(),
    )?;

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;
    tracing::debug!(
        config = ?cli.config,
        log_file = %log_path.display(),
        "configuration loaded"
    );

    Ok(Startup {
        startup,
        config,
        api_key,
    })
}

fn build_app(startup: &Startup) -> Result<App, Box<dyn std::error::Error>> {
    let config = &startup.config;

    let locator: Arc<dyn LocationSource> = if config.geolocate && !startup.startup.no_geolocate {
        Arc::new(IpGeolocator::new(
            config.geolocation_url.clone(),
            Duration::from_secs(config.geolocation_timeout_secs),
        )?)
    } else {
        Arc::new(DisabledLocator)
    };

    let map = MapView::new(
        OverlaySettings {
            tile_base_url: config.tile_base_url.clone(),
            layer: config.overlay_layer.clone(),
            api_key: startup.api_key.clone(),
        },
        config.map_zoom,
    );

    let unit = if config.fahrenheit || startup.startup.fahrenheit {
        TemperatureUnit::Fahrenheit
    } else {
        TemperatureUnit::Celsius
    };

    let client = WeatherClient::with_base_url(startup.api_key.clone(), config.api_base_url.clone());
    Ok(App::new(WeatherViewController::new(client, locator, map, unit)))
}

async fn run(mut app: App, initial_action: &InitialAction) -> io::Result<()> {
    setup_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start(initial_action);

    loop {
        app.tick();

        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let startup = match prepare(&cli) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(2);
        }
    };

    let app = match build_app(&startup) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(2);
        }
    };

    tracing::info!(action = ?startup.startup.initial_action, "starting dashboard");

    if let Err(err) = run(app, &startup.startup.initial_action).await {
        tracing::error!(error = %err, "terminal error");
        eprintln!("error: {}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
