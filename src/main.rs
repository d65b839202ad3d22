use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use scale_stream::{App, AppConfig, ServerError};
use scale_stream_render::RendererKind;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// scale-stream - Live scale weight display served as an MJPEG stream
#[derive(Parser, Debug, Clone)]
#[command(name = "scale-stream")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Address to bind (e.g. 0.0.0.0 or 127.0.0.1)
    #[arg(long = "bind", value_name = "ADDR")]
    bind: Option<String>,

    /// Directory holding the scale service's daily logs
    #[arg(long = "data-dir", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Scale service settings file (provides the scale id)
    #[arg(long = "settings", value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Frames per second on each stream
    #[arg(long = "fps", value_parser = clap::value_parser!(u32).range(1..=60))]
    fps: Option<u32>,

    /// Maximum simultaneous stream clients
    #[arg(long = "max-streams", value_name = "N")]
    max_streams: Option<usize>,

    /// Renderer: auto, full or placeholder
    #[arg(long = "renderer", value_name = "KIND")]
    renderer: Option<RendererKind>,

    /// Config file to load instead of the default location
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

impl Cli {
    /// Load the config file and apply command line overrides
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load()?,
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.source.data_dir = dir.clone();
        }
        if let Some(path) = &self.settings {
            config.source.settings_path = path.clone();
        }
        if let Some(fps) = self.fps {
            config.server.fps = fps;
        }
        if let Some(max) = self.max_streams {
            config.server.max_streams = max;
        }
        if let Some(renderer) = self.renderer {
            config.renderer = renderer;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    warn!("Starting scale-stream v{}", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("scale-stream: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(ServerError::Bind { addr, .. }) = e.downcast_ref::<ServerError>() {
                error!("Cannot listen on {}", addr);
            }
            eprintln!("scale-stream: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config().context("loading configuration")?;
    info!("Log directory: {}", config.source.data_dir.display());

    let shutdown = CancellationToken::new();
    let app = App::start(&config, shutdown.clone()).await?;
    app.log_banner();

    tokio::spawn(wait_for_signal(shutdown));

    app.run().await
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM
async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    warn!("Shutting down");
    shutdown.cancel();
}
