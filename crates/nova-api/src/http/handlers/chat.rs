//! SSE streaming chat endpoint.
//!
//! POST /api/v1/chat/stream
//!
//! SSE event types:
//! - `reply` -- short-circuit answer: `{ "text": "...", "action": ... }`
//! - `notice` -- shown before a generation: `{ "text": "..." }`
//! - `text_delta` -- incremental text: `{ "text": "..." }`
//! - `error` -- error fragment: `{ "message": "...", "kind": "..." }`
//! - `done` -- stream complete: `{ "ok": bool }`

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tokio_stream::Stream;

use nova_core::dispatch::{Reply, Response};
use nova_types::chat::Utterance;
use nova_types::error::DispatchError;
use nova_types::llm::{Fragment, FragmentKind};

use crate::http::handlers::process::EMPTY_INPUT_REPLY;
use crate::state::AppState;

/// Request body for the streaming chat endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamChatRequest {
    pub message: String,
    #[serde(default)]
    pub use_remote: bool,
}

fn reply_event(reply: &Reply) -> (&'static str, serde_json::Value) {
    ("reply", json!({ "text": reply.text, "action": reply.action }))
}

fn fragment_event(fragment: &Fragment) -> (&'static str, serde_json::Value) {
    match fragment.kind {
        FragmentKind::Content => ("text_delta", json!({ "text": fragment.text })),
        FragmentKind::Error(kind) => (
            "error",
            json!({ "message": fragment.text, "kind": kind.to_string() }),
        ),
    }
}

fn sse((name, data): (&'static str, serde_json::Value)) -> Result<Event, Infallible> {
    Ok(Event::default().event(name).data(data.to_string()))
}

/// POST /api/v1/chat/stream -- route one message and stream the result.
pub async fn stream_chat(
    State(state): State<AppState>,
    Json(body): Json<StreamChatRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let utterance = Utterance::new(&body.message);
    let routed = state
        .dispatcher
        .route_and_respond(&utterance, body.use_remote)
        .await;

    let sse_stream = async_stream::stream! {
        match routed {
            Err(DispatchError::InputEmpty) => {
                yield sse(("reply", json!({ "text": EMPTY_INPUT_REPLY, "action": null })));
                yield sse(("done", json!({ "ok": true })));
            }
            Ok(Response::Reply(reply)) => {
                yield sse(reply_event(&reply));
                yield sse(("done", json!({ "ok": true })));
            }
            Ok(Response::Stream { notice, mut stream }) => {
                if let Some(notice) = notice {
                    yield sse(("notice", json!({ "text": notice })));
                }
                while let Some(fragment) = stream.next().await {
                    yield sse(fragment_event(&fragment));
                }
                let ok = stream.outcome().is_some_and(|outcome| outcome.is_success());
                yield sse(("done", json!({ "ok": ok })));
            }
        }
    };

    Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
