//! Process lifecycle
//!
//! Binds the liveness responder, then runs it and the dispatcher as two
//! tasks tied together only by one cancellation token.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::config::{Configuration, Settings};
use crate::dispatch::{DispatchExit, Dispatcher};
use crate::error::{AppError, AppResult};
use crate::events::EventSink;
use crate::liveness::LivenessResponder;
use crate::transport::{HttpTransport, Transport};

/// How the process ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Interrupted by a signal, or a check that passed
    Clean,
    /// The message list was empty
    NoMessages,
    /// The dispatcher failed unexpectedly
    Fatal,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Clean => 0,
            Exit::NoMessages | Exit::Fatal => 1,
        }
    }
}

pub struct App {
    settings: Settings,
    configuration: Arc<Configuration>,
    sink: Arc<dyn EventSink>,
}

impl App {
    pub fn new(settings: Settings, configuration: Configuration, sink: Arc<dyn EventSink>) -> Self {
        Self {
            settings,
            configuration: Arc::new(configuration),
            sink,
        }
    }

    /// Address the responder binds to
    pub fn liveness_address(&self) -> AppResult<SocketAddr> {
        Self::liveness_address_for(&self.settings, &self.configuration)
    }

    /// Host from the settings file, port from `server_port.txt`
    pub fn liveness_address_for(
        settings: &Settings,
        configuration: &Configuration,
    ) -> AppResult<SocketAddr> {
        let host: IpAddr = settings.liveness.host.parse().map_err(|_| {
            AppError::configuration(
                "liveness.host",
                format!("Host must be an IP address, got '{}'", settings.liveness.host),
            )
        })?;
        Ok(SocketAddr::new(host, configuration.port))
    }

    /// Run until SIGINT/SIGTERM
    pub async fn run(self) -> AppResult<Exit> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `signal` completes or the dispatcher stops on its own.
    ///
    /// # Errors
    /// - Invalid clock or transport settings
    /// - The liveness port cannot be bound (nothing is sent in that case)
    pub async fn run_until<F>(self, signal: F) -> AppResult<Exit>
    where
        F: Future<Output = ()>,
    {
        let clock = self.settings.clock.build()?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&self.settings.transport)?);

        tracing::info!(
            endpoint = %self.settings.transport.endpoint,
            delay_secs = %self.configuration.delay.as_secs(),
            timezone = %self.settings.clock.timezone,
            "Configuration loaded"
        );

        let address = self.liveness_address()?;
        let responder = LivenessResponder::bind(
            address,
            self.configuration.health_response.as_str(),
            Arc::clone(&self.sink),
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, address = %address, "Failed to bind"))?;

        let shutdown = CancellationToken::new();
        let responder_task = tokio::spawn(responder.serve(shutdown.clone()));

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.configuration),
            transport,
            clock,
            Arc::clone(&self.sink),
        );
        let mut dispatch_task = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { dispatcher.run(shutdown).await })
        };

        let exit = tokio::select! {
            joined = &mut dispatch_task => Self::dispatch_finished(joined),
            _ = signal => {
                tracing::info!("Stopping by user request");
                shutdown.cancel();
                Self::dispatch_finished(dispatch_task.await)
            }
        };

        shutdown.cancel();
        match responder_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Liveness responder failed"),
            Err(e) => tracing::error!(error = %e, "Liveness responder task failed"),
        }

        Ok(exit)
    }

    fn dispatch_finished(joined: Result<AppResult<DispatchExit>, JoinError>) -> Exit {
        match joined {
            Ok(Ok(DispatchExit::NoMessages)) => Exit::NoMessages,
            Ok(Ok(DispatchExit::Cancelled)) => Exit::Clean,
            Ok(Err(e)) => {
                tracing::error!(error = %format!("{:#}", anyhow::Error::from(e)), "Fatal error");
                Exit::Fatal
            }
            Err(e) => {
                tracing::error!(error = %e, "Fatal error");
                Exit::Fatal
            }
        }
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed that branch never fires, so the process
/// still stops on the other one.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
