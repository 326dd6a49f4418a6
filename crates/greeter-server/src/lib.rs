//! # Greeter Server
//!
//! A minimal HTTP/1.1 server that answers every request with a greeting
//! derived from the URL path, supervised for graceful shutdown.
//!
//! This crate provides:
//!
//! - Listener acquisition bound from a [`ServerConfig`]
//! - A shared [`ShutdownSignal`] observed by every party of a server run
//! - A lifecycle coordinator that runs the serving loop on a background
//!   task, drains in-flight connections on shutdown, and surfaces the
//!   first error encountered
//!
//! ## Example
//!
//! ```rust,ignore
//! use greeter_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::builder()
//!         .host("0.0.0.0")
//!         .port(18080)
//!         .build();
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod listener;
pub mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use server::{Server, ServerBuilder, ServerError};
pub use shutdown::ShutdownSignal;
