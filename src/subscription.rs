//! Live pub/sub subscription handles.

use futures::StreamExt;
use redis::RedisResult;
use redis::aio::PubSub;
use tracing::debug;

/// A live registration of interest in one physical channel.
///
/// Each subscription owns a dedicated pub/sub connection, separate from the
/// shared command connection: a connection waiting for pushed messages
/// cannot simultaneously serve ordinary commands. Subscriptions are not
/// reference-counted; every `subscribe` call allocates its own delivery
/// path.
///
/// Call [`Subscription::unsubscribe`] when done. Dropping the handle also
/// closes the dedicated connection, but leaving it live keeps one connection
/// open per subscription: releasing it is the caller's obligation, not
/// reclaimed by dropping the namespace view that created it.
pub struct Subscription {
    pubsub: PubSub,
    channel: String,
}

impl Subscription {
    pub(crate) fn new(pubsub: PubSub, channel: String) -> Self {
        Self { pubsub, channel }
    }

    /// The physical (namespace-prefixed) channel name.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Wait for the next published payload.
    ///
    /// Returns `None` once the delivery stream ends (connection closed).
    /// There is no internal timeout; callers wanting a time bound race this
    /// future against a deadline.
    pub async fn next_message(&mut self) -> RedisResult<Option<String>> {
        let msg = {
            let mut stream = self.pubsub.on_message();
            stream.next().await
        };
        match msg {
            Some(msg) => msg.get_payload().map(Some),
            None => Ok(None),
        }
    }

    /// Deregister the channel interest and close the dedicated connection.
    pub async fn unsubscribe(mut self) -> RedisResult<()> {
        self.pubsub.unsubscribe(&self.channel).await?;
        debug!("Unsubscribed from channel {}", self.channel);
        Ok(())
    }
}
