//! Administrative namespace teardown.

use redis::{AsyncCommands, RedisResult};
use tracing::debug;

use crate::connection::SharedRedis;
use crate::namespace::Namespace;
use crate::scan::scan_matching;

/// Delete every physical key under a namespace, returning how many were
/// removed.
///
/// Scans the full keyspace for `prefix*` to completion, then issues a single
/// bulk DEL of the found keys. A namespace with no keys returns 0 without
/// issuing a delete. Keys expiring between the scan and the delete are
/// benign; the returned count reflects what was actually deleted, which may
/// be less than what was scanned.
///
/// Other namespaces are untouched by construction: only prefix-matched keys
/// are ever deleted.
pub async fn clear_namespace(
    redis: &SharedRedis,
    namespace: impl Into<String>,
) -> RedisResult<usize> {
    let namespace = Namespace::new(namespace);
    let mut conn = redis.connection();

    let keys = scan_matching(&mut conn, &namespace.pattern("*")).await?;
    if keys.is_empty() {
        return Ok(0);
    }

    let deleted: usize = conn.del(&keys).await?;
    debug!("Cleared {} keys under namespace {}", deleted, namespace);
    Ok(deleted)
}
