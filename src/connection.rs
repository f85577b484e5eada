//! Shared Redis connection handle.
//!
//! One [`SharedRedis`] owns the single multiplexed command connection that
//! every namespace wrapper forwards to. The handle is cheap to clone; all
//! clones share the same underlying socket, so dropping a wrapper (or a
//! clone) never closes the connection. Pub/sub subscriptions open their own
//! dedicated connection, see [`crate::Subscription`].

use std::sync::Arc;

use redis::aio::ConnectionManager;
use redis::{Client, ErrorKind, RedisError, RedisResult};
use tracing::debug;

use crate::config::RedisConfig;
use crate::namespace::Namespace;
use crate::namespaced::NamespacedRedis;

/// The shared command connection to Redis.
///
/// Construct once, then derive any number of [`NamespacedRedis`] views over
/// it via [`SharedRedis::namespaced`]. The handle never closes itself; the
/// socket is released when the last clone is dropped.
#[derive(Clone)]
pub struct SharedRedis {
    client: Arc<Client>,
    conn: ConnectionManager,
}

impl SharedRedis {
    /// Connect with default configuration.
    pub async fn connect(url: impl Into<String>) -> RedisResult<Self> {
        Self::with_config(RedisConfig::new(url)).await
    }

    /// Connect with custom configuration.
    ///
    /// Establishes the multiplexed command connection and verifies it with a
    /// PING before returning.
    pub async fn with_config(config: RedisConfig) -> RedisResult<Self> {
        let client = Arc::new(Client::open(config.url.as_str())?);

        let conn = tokio::time::timeout(config.connect_timeout, client.get_connection_manager())
            .await
            .map_err(|_| {
                RedisError::from((ErrorKind::IoError, "connection attempt timed out"))
            })??;

        let mut ping_conn = conn.clone();
        tokio::time::timeout(
            config.command_timeout,
            redis::cmd("PING").query_async::<String>(&mut ping_conn),
        )
        .await
        .map_err(|_| RedisError::from((ErrorKind::IoError, "PING timed out")))??;

        debug!("Connected to Redis at {}", config.url);

        Ok(Self { client, conn })
    }

    /// Create a namespaced view over this connection.
    ///
    /// No I/O is performed; any number of views may coexist over the same
    /// handle, each scoped to its own namespace.
    pub fn namespaced(&self, namespace: impl Into<String>) -> NamespacedRedis {
        NamespacedRedis::new(self.clone(), Namespace::new(namespace))
    }

    /// Get a handle to the shared command connection.
    ///
    /// Commands issued here bypass namespacing entirely, which is useful for
    /// administrative access to physical keys.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Open a dedicated pub/sub connection.
    ///
    /// A connection blocked waiting for pushed messages cannot serve ordinary
    /// commands, so each subscription gets its own.
    pub(crate) async fn pubsub(&self) -> RedisResult<redis::aio::PubSub> {
        self.client.get_async_pubsub().await
    }
}
