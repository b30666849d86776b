//! The change feed endpoint

use crate::routes::ResponseBody;
use crate::state::ServerState;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::{Response, StatusCode};
use morel_core::wire::ChangeRow;
use morel_core::ChangeEvent;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};
use tokio_stream::StreamExt;

const KEEP_ALIVE_PERIOD: Duration = Duration::from_secs(15);

/// Open one subscriber stream over server-sent events.
///
/// Data frames carry the change-row JSON; comment frames keep idle
/// connections alive. A subscriber that falls behind the broadcast buffer
/// is cut off so it reconnects and resyncs instead of silently missing
/// changes; the marker appended behind the change stream is what ends the
/// merged body, since the keep-alive ticker alone never would.
pub fn stream(state: &ServerState) -> Response<ResponseBody> {
    let changes = BroadcastStream::new(state.subscribe())
        .take_while(|result| result.is_ok())
        .filter_map(|result| result.ok())
        .map(|event| Some(data_frame(&event)))
        .chain(tokio_stream::once(None));

    let keep_alive = IntervalStream::new(tokio::time::interval(KEEP_ALIVE_PERIOD))
        .map(|_| Some(": keep-alive\n\n".to_string()));

    let frames = changes
        .merge(keep_alive)
        .take_while(|text| text.is_some())
        .filter_map(|text| text)
        .map(|text| Ok::<_, Infallible>(Frame::data(Bytes::from(text))));

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/event-stream")
        .header("Cache-Control", "no-cache")
        .body(StreamBody::new(frames).boxed())
        .unwrap()
}

fn data_frame(event: &ChangeEvent) -> String {
    let row = ChangeRow::from_event(event);
    format!(
        "data: {}\n\n",
        serde_json::to_string(&row).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use morel_core::ItemId;
    use morel_store::ItemDb;
    use morel_sync::{SseFrame, SseParser};

    fn test_state(event_buffer: usize) -> ServerState {
        let config: Config = ron::from_str(&format!(
            "(admin_username: \"admin\", admin_password: \"secret\", event_buffer: {event_buffer})"
        ))
        .unwrap();
        ServerState::new(ItemDb::in_memory().unwrap(), config)
    }

    fn delete_event(id: &str) -> ChangeEvent {
        ChangeEvent::Delete {
            id: ItemId::new(id),
        }
    }

    #[test]
    fn test_data_frame_parses_back_through_the_client_parser() {
        let frame = data_frame(&delete_event("id-1"));

        let mut parser = SseParser::new();
        let parsed = parser.push(frame.as_bytes());
        assert_eq!(
            parsed,
            vec![SseFrame {
                event: None,
                data: "{\"kind\":\"delete\",\"row\":{\"id\":\"id-1\"}}".to_string()
            }]
        );
    }

    #[test]
    fn test_keep_alive_is_invisible_to_the_client_parser() {
        let mut parser = SseParser::new();
        assert!(parser.push(b": keep-alive\n\n").is_empty());
    }

    #[tokio::test]
    async fn test_stream_response_headers() {
        let state = test_state(16);
        let response = stream(&state);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/event-stream"
        );
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-cache");
    }

    #[tokio::test]
    async fn test_lagging_subscriber_stream_terminates() {
        let state = test_state(1);
        let response = stream(&state);

        // Overrun the one-slot buffer before the subscriber reads anything.
        state.publish(delete_event("id-1"));
        state.publish(delete_event("id-2"));
        state.publish(delete_event("id-3"));

        let collected = tokio::time::timeout(
            Duration::from_secs(5),
            response.into_body().collect(),
        )
        .await
        .expect("lagged stream should end instead of idling");
        assert!(collected.is_ok());
    }
}
