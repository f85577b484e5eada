//! # Keyspaced
//!
//! Namespace isolation for applications sharing one Redis connection.
//!
//! Multiple logical applications or tenants can safely share a single
//! physical connection: each one gets a [`NamespacedRedis`] view that
//! transparently prefixes every key and channel name on the way in and
//! strips prefixes from scan results on the way out. A tenant can never
//! observe another tenant's keys, even under wildcard queries.
//!
//! ## Components
//!
//! - **[`SharedRedis`]**: the one shared command connection; cheap to clone
//! - **[`NamespacedRedis`]**: per-tenant view with the full operation surface
//!   (scalar, JSON, multi, hash, counter, TTL, scan, list, set, pub/sub)
//! - **[`Subscription`]**: pub/sub handle owning its dedicated connection
//! - **[`clear_namespace`]**: bulk teardown of everything under a namespace
//!
//! ## Example
//!
//! ```rust,no_run
//! use keyspaced::SharedRedis;
//!
//! # async fn demo() -> redis::RedisResult<()> {
//! let redis = SharedRedis::connect("redis://127.0.0.1/").await?;
//!
//! let auth = redis.namespaced("auth");
//! let billing = redis.namespaced("billing");
//!
//! // Same logical key, disjoint physical keys ("auth:user:1", "billing:user:1").
//! auth.set("user:1", "alice").await?;
//! billing.set("user:1", "bob").await?;
//! assert_eq!(auth.get("user:1").await?, Some("alice".into()));
//! # Ok(())
//! # }
//! ```

mod admin;
mod config;
mod connection;
mod namespace;
mod namespaced;
mod scan;
mod subscription;

pub use admin::clear_namespace;
pub use config::RedisConfig;
pub use connection::SharedRedis;
pub use namespace::{Namespace, SEPARATOR};
pub use namespaced::NamespacedRedis;
pub use subscription::Subscription;

// The wrapper adds no error kinds of its own; store failures surface as-is.
pub use redis::{RedisError, RedisResult};
