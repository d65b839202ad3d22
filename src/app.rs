//! Application wiring: store, poller, renderer and server

use anyhow::{Context, Result};
use log::{error, info};
use scale_stream_core::{Poller, StatusStore};
use scale_stream_render::{select_renderer, SharedRenderer};
use scale_stream_sources::LogTailSource;
use scale_stream_types::StatusRecord;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{resolve_scale_id, AppConfig};
use crate::server::{self, ServerState, StreamOptions};

/// A bound, running instance: the poller is live and the socket is listening.
///
/// Call [`App::run`] to start answering requests.
pub struct App {
    listener: TcpListener,
    state: ServerState,
    poller: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl App {
    /// Start with the renderer chosen by `config.renderer`
    pub async fn start(config: &AppConfig, shutdown: CancellationToken) -> Result<Self> {
        Self::start_with_renderer(config, select_renderer(config.renderer), shutdown).await
    }

    /// Start with an explicit renderer
    pub async fn start_with_renderer(
        config: &AppConfig,
        renderer: SharedRenderer,
        shutdown: CancellationToken,
    ) -> Result<Self> {
        let addr = config.socket_addr()?;
        // Bind before spawning anything so a busy port fails fast
        let listener = server::bind(addr).await?;

        let scale_id = resolve_scale_id(&config.source.settings_path, &config.default_scale_id);
        info!("Scale id: {}", scale_id);
        let store = Arc::new(StatusStore::new(StatusRecord::initial(scale_id)));

        let source = Arc::new(LogTailSource::new(config.source.data_dir.clone()));
        let poller = Poller::new(source, store.clone())
            .with_interval(config.poll_interval())
            .spawn(shutdown.clone());

        let local = listener.local_addr().context("reading bound address")?;
        let options = StreamOptions {
            port: local.port(),
            fps: config.server.fps,
            max_streams: config.server.max_streams,
        };
        let state = ServerState::new(store, renderer, options, shutdown.clone());

        Ok(Self {
            listener,
            state,
            poller,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn store(&self) -> Arc<StatusStore> {
        self.state.store().clone()
    }

    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Log the reachable URLs
    pub fn log_banner(&self) {
        let port = self.state.options().port;
        info!("Landing page:   http://<host>:{}/", port);
        info!("MJPEG stream:   http://<host>:{}/stream", port);
        info!("Snapshot:       http://<host>:{}/snapshot", port);
        info!(
            "Streaming at {} fps, up to {} clients",
            self.state.options().fps,
            self.state.options().max_streams
        );
    }

    /// Serve until shutdown, then stop the poller
    pub async fn run(self) -> Result<()> {
        let result = server::serve(self.listener, self.state).await;

        self.shutdown.cancel();
        if let Err(e) = self.poller.await {
            error!("Poller task failed: {}", e);
        }

        result.map_err(Into::into)
    }
}
