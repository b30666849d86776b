//! Reconnecting subscription to the server's change stream
//!
//! The feed owns the retry policy so drivers stay a plain loop:
//!
//! ```ignore
//! let mut feed = ChangeFeed::new("http://127.0.0.1:8420");
//! loop {
//!     match feed.next().await {
//!         FeedItem::Resync => sync.load().await?,
//!         FeedItem::Change(event) => sync.apply_event(event),
//!     }
//! }
//! ```

use crate::error::StoreError;
use crate::sse::SseParser;
use morel_core::wire::ChangeRow;
use morel_core::ChangeEvent;
use std::collections::VecDeque;
use std::time::Duration;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// One pull from the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    /// The subscription (re)connected. Changes may have been missed while
    /// disconnected, so the catalog must be reloaded.
    Resync,
    /// One change committed by some writer.
    Change(ChangeEvent),
}

struct Connected {
    response: reqwest::Response,
    parser: SseParser,
    pending: VecDeque<ChangeEvent>,
}

/// Subscription to `GET /api/events` that survives connection loss.
///
/// `next` yields [`FeedItem::Resync`] after every successful (re)connect,
/// then decoded changes as they arrive. Reconnects back off exponentially
/// from 500ms to 30s; a successful connect resets the backoff.
pub struct ChangeFeed {
    client: reqwest::Client,
    events_url: String,
    backoff: Duration,
    connection: Option<Connected>,
}

impl ChangeFeed {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            events_url: format!("{}/api/events", base_url.trim_end_matches('/')),
            backoff: INITIAL_BACKOFF,
            connection: None,
        }
    }

    /// Wait for the next feed item, reconnecting as needed.
    pub async fn next(&mut self) -> FeedItem {
        loop {
            let Some(conn) = self.connection.as_mut() else {
                match self.connect().await {
                    Ok(conn) => {
                        self.connection = Some(conn);
                        self.backoff = INITIAL_BACKOFF;
                        return FeedItem::Resync;
                    }
                    Err(_) => {
                        tokio::time::sleep(self.backoff).await;
                        self.backoff = next_backoff(self.backoff);
                        continue;
                    }
                }
            };

            if let Some(event) = conn.pending.pop_front() {
                return FeedItem::Change(event);
            }

            match conn.response.chunk().await {
                Ok(Some(bytes)) => {
                    for frame in conn.parser.push(&bytes) {
                        if let Some(event) = decode(&frame.data) {
                            conn.pending.push_back(event);
                        }
                    }
                }
                // Server closed the stream or the connection broke.
                Ok(None) | Err(_) => {
                    self.connection = None;
                }
            }
        }
    }

    async fn connect(&self) -> Result<Connected, StoreError> {
        let response = self
            .client
            .get(&self.events_url)
            .header("Accept", "text/event-stream")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::Rejected {
                status: response.status().as_u16(),
                message: "event stream refused".to_string(),
            });
        }
        Ok(Connected {
            response,
            parser: SseParser::new(),
            pending: VecDeque::new(),
        })
    }
}

// Payloads that do not parse are skipped; the wire may grow new kinds.
fn decode(data: &str) -> Option<ChangeEvent> {
    serde_json::from_str::<ChangeRow>(data)
        .ok()
        .and_then(|row| row.into_event().ok())
}

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}
