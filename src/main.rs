use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use dreamreel::playlist::{CatalogPlaylistProvider, FileCatalogStore};
use dreamreel::terminal::{LogRenderer, SimulatedSurface, TerminalInput};
use dreamreel::{ReelConfig, ReelOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "dreamreel")]
#[command(about = "Full-screen crossfading video loop with gesture controls")]
#[command(version)]
#[command(long_about = "Plays a catalog of short videos one at a time, crossfading between two \
video slots. Double-click (or double-tap) advances, a single click toggles sound, a modifier \
click toggles fullscreen and a three-finger tap shows diagnostics. The terminal host simulates \
the video layer and logs the overlay.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "dreamreel.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the session")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Dry run mode - build the session but don't play anything
    #[arg(long, help = "Perform dry run - build all components but don't start them")]
    dry_run: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,

    /// Simulated load latency of the headless video surface
    #[arg(long, default_value_t = 400, value_name = "MS")]
    load_latency_ms: u64,

    /// Probability that a simulated load fails
    #[arg(long, default_value_t = 0.0, value_name = "RATE", value_parser = parse_rate)]
    failure_rate: f64,

    /// Seed for video selection
    #[arg(long)]
    seed: Option<u64>,

    /// Run without terminal input (stop with SIGINT/SIGTERM)
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    let log_guard = init_logging(&args)?;

    info!("Starting dreamreel v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match ReelConfig::load_from_file(&args.config) {
        Ok(config) => {
            info!("Configuration loaded successfully from: {}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    let store = FileCatalogStore::new(&config.catalog.store_path);
    let provider = CatalogPlaylistProvider::new(config.catalog.clone(), Box::new(store));
    let surface = SimulatedSurface::new(
        Duration::from_millis(args.load_latency_ms),
        args.failure_rate,
    );

    let mut builder = ReelOrchestrator::builder()
        .with_config(config)
        .with_surface(Arc::new(surface))
        .with_renderer(Box::new(LogRenderer::new()))
        .with_provider(Box::new(provider));
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }

    let mut orchestrator = builder.build().map_err(|e| {
        error!("Failed to create orchestrator: {}", e);
        e
    })?;

    orchestrator.initialize();

    if args.dry_run {
        info!("Dry run mode - components built but not started");
        println!("✓ Dry run completed successfully - all components built");
        return Ok(());
    }

    orchestrator.start();

    let mut terminal = None;
    if !args.headless {
        let mut input = TerminalInput::new(orchestrator.host_handle());
        match input.start() {
            Ok(()) => terminal = Some(input),
            Err(e) => warn!("Terminal input unavailable, running headless: {}", e),
        }
    }

    let result = orchestrator.run().await;

    if let Some(mut input) = terminal {
        if let Err(e) = input.stop().await {
            warn!("Failed to restore terminal: {}", e);
        }
    }

    let exit_code = result.map_err(|e| {
        error!("Session error during execution: {}", e);
        e
    })?;

    info!("dreamreel exited with code: {}", exit_code);
    drop(log_guard);
    std::process::exit(exit_code);
}

fn parse_rate(value: &str) -> std::result::Result<f64, String> {
    let rate: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if rate.is_finite() && (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("{} is not a probability between 0 and 1", value))
    }
}

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dreamreel={}", log_level)));

    // The terminal host owns stdout, so console logs go to stderr
    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    let (file_layer, guard) = match args.log_dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dreamreel.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# dreamreel configuration file");
    println!("# This is the default configuration with all available options");
    println!();

    let rendered = toml::to_string_pretty(&ReelConfig::default())
        .context("Failed to render default configuration")?;
    println!("{}", rendered);
    Ok(())
}
