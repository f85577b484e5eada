//! Cursor-based keyspace scanning.

use redis::RedisResult;
use redis::aio::ConnectionManager;

/// COUNT hint passed to SCAN; a page-size suggestion, not a limit.
pub(crate) const SCAN_PAGE_SIZE: usize = 100;

/// Collect every physical key matching `pattern`.
///
/// SCAN may return any number of partial pages before the cursor comes back
/// to 0, so the loop runs to completion and accumulates client-side. A
/// failure on any round trip aborts the whole scan; no partial result
/// escapes.
pub(crate) async fn scan_matching(
    conn: &mut ConnectionManager,
    pattern: &str,
) -> RedisResult<Vec<String>> {
    let mut keys = Vec::new();
    let mut cursor: u64 = 0;

    loop {
        let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_PAGE_SIZE)
            .query_async(conn)
            .await?;

        keys.extend(batch);

        if next == 0 {
            break;
        }
        cursor = next;
    }

    Ok(keys)
}
