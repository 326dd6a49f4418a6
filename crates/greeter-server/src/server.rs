//! HTTP server and its supervised lifecycle.
//!
//! The server answers every request, any method and any path, with a
//! greeting derived from the URL path. The interesting part is the
//! lifecycle: the accept loop runs on one background task, a shared
//! [`ShutdownSignal`] ends it, in-flight connections drain before the
//! task finishes, and the foreground path joins the task and returns the
//! first error the serve path produced.
//!
//! Per invocation the lifecycle moves through
//! `Serving → CancellationObserved → ShuttingDown → Terminated` exactly
//! once; a run is single-shot.
//!
//! # Example
//!
//! ```rust,ignore
//! use greeter_server::{Server, ShutdownSignal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shutdown = ShutdownSignal::new();
//!     let server = Server::builder().port(18080).build();
//!
//!     // Elsewhere: shutdown.trigger() ends the run.
//!     server.run_with_shutdown(shutdown).await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::listener;
use crate::shutdown::ShutdownSignal;

/// Type alias for the HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be created for the configured address.
    ///
    /// Fatal to the invocation; there are no retries.
    #[error("failed to bind {addr}")]
    Bind {
        /// The address that could not be bound.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The serving loop failed for a reason other than orderly shutdown.
    #[error("failed to accept connection")]
    Serve(#[source] std::io::Error),

    /// The background serving task terminated abnormally.
    #[error("serving task terminated abnormally")]
    Join(#[source] tokio::task::JoinError),
}

/// The greeting HTTP server.
///
/// Owns its configuration; one instance drives exactly one run.
///
/// # Example
///
/// ```rust
/// use greeter_server::Server;
///
/// let server = Server::builder()
///     .host("127.0.0.1")
///     .port(8080)
///     .build();
///
/// assert_eq!(server.config().listen_addr(), "127.0.0.1:8080");
/// ```
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Creates a new server with the given configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Creates a new server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs the server until a SIGTERM or SIGINT arrives.
    ///
    /// Binds the configured address, then behaves like
    /// [`run_with_shutdown`](Self::run_with_shutdown).
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the serve
    /// path fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs the server until the given signal is triggered.
    ///
    /// Binds the configured address first; a bind failure propagates
    /// directly, before any serving concurrency exists.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the listener cannot be bound,
    /// otherwise whatever [`serve_with_shutdown`](Self::serve_with_shutdown)
    /// returns.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let listener = listener::bind(&self.config).await?;
        self.serve_with_shutdown(listener, shutdown).await
    }

    /// Serves on a pre-bound listener until the given signal is triggered.
    ///
    /// The serving loop runs on a background task; this call blocks on
    /// the signal, then waits for the task, including the drain of
    /// in-flight connections, to fully finish. No server activity
    /// outlives the call.
    ///
    /// The returned outcome is the first error raised on the serve path,
    /// or `Ok(())` after an orderly shutdown. A serve failure triggers
    /// the shared signal itself, so internal failure and external
    /// cancellation release waiters the same way. A drain that exceeds
    /// the configured [`shutdown_timeout`](ServerConfig::shutdown_timeout)
    /// is logged but never becomes the outcome on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] if the accept loop failed, or
    /// [`ServerError::Join`] if the serving task panicked.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "server listening");
        }

        let task = tokio::spawn(self.accept_loop(listener, shutdown.clone()));
        supervise(&shutdown, task).await
    }

    /// Accepts connections until the signal fires or accepting fails,
    /// then stops listening and drains in-flight connections.
    async fn accept_loop(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let graceful = GracefulShutdown::new();

        let outcome = loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        serve_connection(stream, remote_addr, &graceful);
                    }
                    Err(source) => {
                        tracing::error!(error = %source, "failed to accept connection");
                        // Release everyone blocked on the shared signal.
                        shutdown.trigger();
                        break Err(ServerError::Serve(source));
                    }
                },

                () = shutdown.recv() => {
                    tracing::info!("shutdown requested, no longer accepting connections");
                    break Ok(());
                }
            }
        };

        // Close the socket before draining so no new connection sneaks in.
        drop(listener);
        self.drain(graceful).await;

        tracing::info!("server stopped");
        outcome
    }

    /// Waits for in-flight connections to complete.
    ///
    /// The wait is independent of the signal that initiated shutdown; a
    /// slow drain is not aborted by it. Exceeding a configured bound is
    /// diagnostic only and never overrides a pending serve error.
    async fn drain(&self, graceful: GracefulShutdown) {
        match self.config.shutdown_timeout() {
            Some(limit) => {
                if tokio::time::timeout(limit, graceful.shutdown()).await.is_err() {
                    tracing::warn!(
                        ?limit,
                        "shutdown timeout reached with connections still active"
                    );
                }
            }
            None => graceful.shutdown().await,
        }
    }
}

/// Blocks on the shared signal, then joins the serving task.
///
/// The task's result is the outcome of the run; a panicked task
/// surfaces as [`ServerError::Join`].
async fn supervise(
    shutdown: &ShutdownSignal,
    task: JoinHandle<Result<(), ServerError>>,
) -> Result<(), ServerError> {
    shutdown.recv().await;

    match task.await {
        Ok(outcome) => outcome,
        Err(source) => Err(ServerError::Join(source)),
    }
}

/// Spawns a task serving HTTP/1 on one accepted connection.
///
/// The connection is watched by `graceful`, so shutdown lets an
/// in-flight exchange finish instead of cutting it off.
fn serve_connection(stream: TcpStream, remote_addr: SocketAddr, graceful: &GracefulShutdown) {
    tracing::debug!(%remote_addr, "accepted connection");

    let io = TokioIo::new(stream);
    let service = service_fn(|req: Request<Incoming>| async move {
        Ok::<_, Infallible>(greet(&req))
    });

    let conn = graceful.watch(http1::Builder::new().serve_connection(io, service));

    tokio::spawn(async move {
        if let Err(error) = conn.await {
            tracing::debug!(%remote_addr, %error, "connection closed with error");
        }
    });
}

/// Builds the greeting response for a request.
///
/// Never fails; every request gets a `200 OK` with a plain-text body.
fn greet(req: &Request<Incoming>) -> HttpResponse {
    let body = greeting(req.uri().path());

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// Formats the greeting for a URL path, leading slash stripped.
fn greeting(path: &str) -> String {
    format!("Hello, {}!", path.strip_prefix('/').unwrap_or(path))
}

/// Builder for configuring and creating a [`Server`].
///
/// # Example
///
/// ```rust
/// use greeter_server::Server;
/// use std::time::Duration;
///
/// let server = Server::builder()
///     .host("0.0.0.0")
///     .port(9090)
///     .shutdown_timeout(Duration::from_secs(60))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config_builder: crate::config::ServerConfigBuilder,
}

impl ServerBuilder {
    /// Creates a new server builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host to bind to.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.host(host);
        self
    }

    /// Sets the port to bind to.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config_builder = self.config_builder.port(port);
        self
    }

    /// Bounds the graceful shutdown wait.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.shutdown_timeout(timeout);
        self
    }

    /// Builds the server with the configured settings.
    #[must_use]
    pub fn build(self) -> Server {
        Server::new(self.config_builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_greeting_strips_leading_slash() {
        assert_eq!(greeting("/message"), "Hello, message!");
    }

    #[test]
    fn test_greeting_root_path() {
        assert_eq!(greeting("/"), "Hello, !");
    }

    #[test]
    fn test_greeting_keeps_inner_separators() {
        assert_eq!(greeting("/team/alice"), "Hello, team/alice!");
    }

    #[test]
    fn test_server_builder() {
        let server = Server::builder()
            .host("127.0.0.1")
            .port(9090)
            .shutdown_timeout(Duration::from_secs(60))
            .build();

        assert_eq!(server.config().listen_addr(), "127.0.0.1:9090");
        assert_eq!(
            server.config().shutdown_timeout(),
            Some(Duration::from_secs(60))
        );
    }

    #[tokio::test]
    async fn test_run_with_shutdown_propagates_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let port = taken.local_addr().expect("local addr").port();

        let server = Server::builder().host("127.0.0.1").port(port).build();
        let result = server.run_with_shutdown(ShutdownSignal::new()).await;

        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_pre_triggered_shutdown_returns_promptly() {
        let server = Server::builder().host("127.0.0.1").port(0).build();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");

        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            server.serve_with_shutdown(listener, shutdown),
        )
        .await;

        assert!(result.expect("run should not hang").is_ok());
    }

    #[tokio::test]
    async fn test_supervise_returns_serve_error() {
        let shutdown = ShutdownSignal::new();
        let task_signal = shutdown.clone();

        // A serving task that fails releases waiters through the shared
        // signal before reporting its error.
        let task: JoinHandle<Result<(), ServerError>> = tokio::spawn(async move {
            task_signal.trigger();
            Err(ServerError::Serve(std::io::Error::other("socket dropped")))
        });

        let outcome = tokio::time::timeout(Duration::from_secs(1), supervise(&shutdown, task))
            .await
            .expect("supervise should wake on the task's own trigger");

        assert!(matches!(outcome, Err(ServerError::Serve(_))));
    }

    #[tokio::test]
    async fn test_supervise_reports_panicked_task() {
        let shutdown = ShutdownSignal::new();
        let task_signal = shutdown.clone();

        let task: JoinHandle<Result<(), ServerError>> = tokio::spawn(async move {
            task_signal.trigger();
            panic!("serving task blew up");
        });

        let outcome = tokio::time::timeout(Duration::from_secs(1), supervise(&shutdown, task))
            .await
            .expect("supervise should wake on the task's own trigger");

        assert!(matches!(outcome, Err(ServerError::Join(_))));
    }

    #[tokio::test]
    async fn test_clean_shutdown_has_no_error() {
        let shutdown = ShutdownSignal::new();
        let task_signal = shutdown.clone();

        let task: JoinHandle<Result<(), ServerError>> = tokio::spawn(async move {
            task_signal.recv().await;
            Ok(())
        });

        shutdown.trigger();

        let outcome = tokio::time::timeout(Duration::from_secs(1), supervise(&shutdown, task))
            .await
            .expect("supervise should return after external cancellation");

        assert!(outcome.is_ok());
    }
}
