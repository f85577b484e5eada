//! Namespaced view over the shared Redis connection.
//!
//! [`NamespacedRedis`] exposes the operation surface of the raw client but
//! rewrites every key and channel argument with its namespace prefix on the
//! way in, and strips the prefix from scan results on the way out. Values,
//! hash field names, and message payloads are opaque and pass through
//! untouched.
//!
//! The wrapper is a stateless per-call transform: no locks, no caching, no
//! connection of its own. It introduces no error kinds either; every failure
//! from the underlying connection surfaces unmodified as [`redis::RedisError`].

use std::collections::HashMap;
use std::num::NonZeroUsize;

use redis::{AsyncCommands, ErrorKind, RedisError, RedisResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::connection::SharedRedis;
use crate::namespace::Namespace;
use crate::scan::scan_matching;
use crate::subscription::Subscription;

/// A view of the shared connection scoped to one namespace.
///
/// Create via [`SharedRedis::namespaced`]. Any number of views may coexist
/// over the same connection; operations from different namespaces address
/// disjoint physical key spaces and never interact. Dropping a view never
/// affects the shared connection.
#[derive(Clone)]
pub struct NamespacedRedis {
    shared: SharedRedis,
    namespace: Namespace,
}

impl NamespacedRedis {
    pub(crate) fn new(shared: SharedRedis, namespace: Namespace) -> Self {
        Self { shared, namespace }
    }

    /// The namespace this view is scoped to.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Access the underlying shared handle, bypassing the namespace.
    pub fn shared(&self) -> &SharedRedis {
        &self.shared
    }

    /// Release this view.
    ///
    /// Deliberately does nothing to the shared connection: other views (or
    /// the caller directly) may still be using it. The one real resource is
    /// the [`SharedRedis`] handle, released when its last clone is dropped.
    pub fn release(self) {}

    fn key(&self, logical: &str) -> String {
        self.namespace.key(logical)
    }

    // --- scalar ---

    /// Get the value of a logical key.
    pub async fn get(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.shared.connection();
        conn.get(self.key(key)).await
    }

    /// Set a logical key to a value.
    pub async fn set(&self, key: &str, value: &str) -> RedisResult<()> {
        let mut conn = self.shared.connection();
        conn.set::<_, _, ()>(self.key(key), value).await
    }

    /// Set a logical key with a time-to-live in seconds.
    pub async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> RedisResult<()> {
        let mut conn = self.shared.connection();
        conn.set_ex::<_, _, ()>(self.key(key), value, ttl_secs).await
    }

    /// Delete logical keys, returning how many existed.
    pub async fn del(&self, keys: &[&str]) -> RedisResult<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        let physical: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        let mut conn = self.shared.connection();
        conn.del(&physical).await
    }

    /// Count how many of the given logical keys exist.
    ///
    /// Multi-key EXISTS returns the count of existing keys (duplicates
    /// counted), not an all-exist boolean. That store semantic is preserved
    /// as-is here, scoped to this namespace.
    pub async fn exists(&self, keys: &[&str]) -> RedisResult<i64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let physical: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        let mut conn = self.shared.connection();
        conn.exists(&physical).await
    }

    // --- JSON ---

    /// Get and deserialize a JSON value.
    ///
    /// A missing key and a malformed stored payload both yield `None`; parse
    /// failures are treated as "no value", never an error.
    pub async fn json_get<T: DeserializeOwned>(&self, key: &str) -> RedisResult<Option<T>> {
        let raw = self.get(key).await?;
        Ok(raw.and_then(|s| serde_json::from_str(&s).ok()))
    }

    /// Serialize a value to JSON and store it.
    pub async fn json_set<T: Serialize>(&self, key: &str, value: &T) -> RedisResult<()> {
        self.set(key, &to_json(value)?).await
    }

    /// Serialize a value to JSON and store it with a time-to-live in seconds.
    pub async fn json_set_ex<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> RedisResult<()> {
        self.set_ex(key, &to_json(value)?, ttl_secs).await
    }

    // --- multi ---

    /// Get multiple logical keys at once; missing keys yield `None` in place.
    pub async fn mget(&self, keys: &[&str]) -> RedisResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let physical: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        let mut conn = self.shared.connection();
        redis::cmd("MGET")
            .arg(physical.as_slice())
            .query_async(&mut conn)
            .await
    }

    /// Set multiple logical key/value pairs in one call.
    pub async fn mset(&self, entries: &[(&str, &str)]) -> RedisResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let physical: Vec<(String, &str)> =
            entries.iter().map(|(k, v)| (self.key(k), *v)).collect();
        let mut conn = self.shared.connection();
        redis::cmd("MSET")
            .arg(physical.as_slice())
            .query_async::<()>(&mut conn)
            .await
    }

    // --- hashes ---
    //
    // Only the hash key is a store-level key. Field names live inside the
    // hash and are never prefixed.

    /// Get one field of a hash.
    pub async fn hget(&self, key: &str, field: &str) -> RedisResult<Option<String>> {
        let mut conn = self.shared.connection();
        conn.hget(self.key(key), field).await
    }

    /// Set one field of a hash.
    pub async fn hset(&self, key: &str, field: &str, value: &str) -> RedisResult<()> {
        let mut conn = self.shared.connection();
        conn.hset::<_, _, _, ()>(self.key(key), field, value).await
    }

    /// Get multiple fields of a hash; missing fields yield `None` in place.
    pub async fn hmget(&self, key: &str, fields: &[&str]) -> RedisResult<Vec<Option<String>>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.shared.connection();
        redis::cmd("HMGET")
            .arg(self.key(key))
            .arg(fields)
            .query_async(&mut conn)
            .await
    }

    /// Set multiple fields of a hash in one call.
    pub async fn hset_multiple(&self, key: &str, entries: &[(&str, &str)]) -> RedisResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut conn = self.shared.connection();
        conn.hset_multiple::<_, _, _, ()>(self.key(key), entries)
            .await
    }

    /// Get every field and value of a hash.
    pub async fn hgetall(&self, key: &str) -> RedisResult<HashMap<String, String>> {
        let mut conn = self.shared.connection();
        conn.hgetall(self.key(key)).await
    }

    // --- counters ---

    /// Increment a counter by `delta`, returning the new value.
    pub async fn incr(&self, key: &str, delta: i64) -> RedisResult<i64> {
        let mut conn = self.shared.connection();
        conn.incr(self.key(key), delta).await
    }

    /// Decrement a counter by `delta`, returning the new value.
    pub async fn decr(&self, key: &str, delta: i64) -> RedisResult<i64> {
        let mut conn = self.shared.connection();
        conn.decr(self.key(key), delta).await
    }

    // --- TTL ---

    /// Remaining time-to-live of a key in seconds.
    ///
    /// Store sentinels pass through verbatim: -2 when the key does not
    /// exist, -1 when it exists without an expiry.
    pub async fn ttl(&self, key: &str) -> RedisResult<i64> {
        let mut conn = self.shared.connection();
        conn.ttl(self.key(key)).await
    }

    /// Set a key's time-to-live in seconds; `false` if the key does not exist.
    pub async fn expire(&self, key: &str, seconds: i64) -> RedisResult<bool> {
        let mut conn = self.shared.connection();
        conn.expire(self.key(key), seconds).await
    }

    // --- scan ---

    /// Collect every logical key in this namespace matching a glob pattern.
    ///
    /// The pattern is prefixed literally and never interpreted; glob syntax
    /// is whatever the store defines. The cursor loop runs to completion
    /// before anything is returned, then prefixes are stripped, so the result
    /// is exactly the set of logical keys matching the pattern. Keys from
    /// other namespaces can never appear, even under wildcards. An empty
    /// match is an empty `Vec`.
    pub async fn scan_all(&self, pattern: &str) -> RedisResult<Vec<String>> {
        let mut conn = self.shared.connection();
        let physical = scan_matching(&mut conn, &self.namespace.pattern(pattern)).await?;
        Ok(physical
            .iter()
            .filter_map(|k| self.namespace.strip(k))
            .map(String::from)
            .collect())
    }

    // --- lists ---

    /// Push a value onto the head of a list, returning the new length.
    pub async fn lpush(&self, key: &str, value: &str) -> RedisResult<i64> {
        let mut conn = self.shared.connection();
        conn.lpush(self.key(key), value).await
    }

    /// Push a value onto the tail of a list, returning the new length.
    pub async fn rpush(&self, key: &str, value: &str) -> RedisResult<i64> {
        let mut conn = self.shared.connection();
        conn.rpush(self.key(key), value).await
    }

    /// Pop a value from the head of a list.
    pub async fn lpop(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.shared.connection();
        conn.lpop(self.key(key), None::<NonZeroUsize>).await
    }

    /// Pop a value from the tail of a list.
    pub async fn rpop(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.shared.connection();
        conn.rpop(self.key(key), None::<NonZeroUsize>).await
    }

    /// Get the elements of a list between `start` and `stop`, inclusive.
    ///
    /// Negative indices count from the tail, per the store's convention.
    pub async fn lrange(&self, key: &str, start: isize, stop: isize) -> RedisResult<Vec<String>> {
        let mut conn = self.shared.connection();
        conn.lrange(self.key(key), start, stop).await
    }

    // --- sets ---

    /// Add members to a set, returning how many were genuinely new.
    pub async fn sadd(&self, key: &str, members: &[&str]) -> RedisResult<i64> {
        if members.is_empty() {
            return Ok(0);
        }
        let mut conn = self.shared.connection();
        conn.sadd(self.key(key), members).await
    }

    /// Remove members from a set, returning how many were removed.
    pub async fn srem(&self, key: &str, members: &[&str]) -> RedisResult<i64> {
        if members.is_empty() {
            return Ok(0);
        }
        let mut conn = self.shared.connection();
        conn.srem(self.key(key), members).await
    }

    /// Get all members of a set. No ordering guarantee.
    pub async fn smembers(&self, key: &str) -> RedisResult<Vec<String>> {
        let mut conn = self.shared.connection();
        conn.smembers(self.key(key)).await
    }

    // --- pub/sub ---

    /// Publish a payload to a logical channel, returning the receiver count.
    ///
    /// The channel name is prefixed like a key, so subscribers in other
    /// namespaces listening on the same logical channel never receive it.
    pub async fn publish(&self, channel: &str, payload: &str) -> RedisResult<i64> {
        let mut conn = self.shared.connection();
        conn.publish(self.namespace.key(channel), payload).await
    }

    /// Subscribe to a logical channel.
    ///
    /// Opens a dedicated pub/sub connection for this subscription; the
    /// shared command connection is never blocked on pushed messages. The
    /// returned [`Subscription`] owns that connection; call
    /// [`Subscription::unsubscribe`] to release it, or it stays open for as
    /// long as the handle lives.
    pub async fn subscribe(&self, channel: &str) -> RedisResult<Subscription> {
        let physical = self.namespace.key(channel);
        let mut pubsub = self.shared.pubsub().await?;
        pubsub.subscribe(&physical).await?;
        debug!("Subscribed to channel {}", physical);
        Ok(Subscription::new(pubsub, physical))
    }
}

fn to_json<T: Serialize>(value: &T) -> RedisResult<String> {
    serde_json::to_string(value).map_err(|e| {
        RedisError::from((
            ErrorKind::ClientError,
            "failed to serialize JSON payload",
            e.to_string(),
        ))
    })
}
