//! Listener acquisition.
//!
//! Binding happens before any serving concurrency exists, so a failure
//! here propagates synchronously to the caller and is never mixed into
//! the lifecycle's error aggregation. There are no retries: an
//! unavailable address is fatal to the invocation.

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::server::ServerError;

/// Binds a TCP listener for the configured address.
///
/// Host names are resolved; an unresolvable or unavailable address
/// (port in use, permission denied) is reported as
/// [`ServerError::Bind`].
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the listener cannot be created.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr = config.listen_addr();
    let listener = TcpListener::bind((config.host(), config.port()))
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::debug!(%addr, "listener bound");
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let config = ServerConfig::builder().host("127.0.0.1").port(0).build();
        let listener = bind(&config).await.expect("bind should succeed");

        let addr = listener.local_addr().expect("listener has a local addr");
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_address_in_use() {
        let config = ServerConfig::builder().host("127.0.0.1").port(0).build();
        let first = bind(&config).await.expect("first bind should succeed");
        let taken = first.local_addr().expect("local addr").port();

        let config = ServerConfig::builder()
            .host("127.0.0.1")
            .port(taken)
            .build();
        let second = bind(&config).await;

        assert!(matches!(second, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_bind_unresolvable_host() {
        let config = ServerConfig::builder()
            .host("host.invalid")
            .port(18080)
            .build();
        let result = bind(&config).await;

        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }
}
