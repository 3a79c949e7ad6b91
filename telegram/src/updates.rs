use crate::{messages::Message, Client, Result, Stream};
use futures::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

/// Seconds the server holds an empty long poll open before returning.
/// The client request timeout must exceed this.
pub const LONG_POLL_TIMEOUT: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetUpdates {
    pub offset: i64,
    pub timeout: u32,
}

pub async fn poll(client: &Client, offset: i64, timeout: u32) -> Result<Vec<Update>> {
    client.fetch("getUpdates", &GetUpdates { offset, timeout }).await
}

/// An endless stream of inbound updates. Each received batch is
/// acknowledged by advancing the poll offset past its last update id, so
/// a dropped and re-created stream never replays handled updates.
pub fn stream(client: &Client, timeout: u32) -> Stream<Update> {
    let client = client.clone();
    stream::try_unfold((client, 0i64), move |(client, offset)| async move {
        loop {
            let batch = poll(&client, offset, timeout).await?;
            if let Some(last) = batch.last() {
                let next_offset = last.update_id + 1;
                return Ok::<_, crate::Error>(Some((batch, (client, next_offset))));
            }
            // empty poll, long poll timed out with nothing pending
        }
    })
    .map_ok(|batch| stream::iter(batch.into_iter().map(Ok)))
    .try_flatten()
    .boxed()
}
