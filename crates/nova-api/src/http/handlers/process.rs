//! POST /process -- the original web endpoint.
//!
//! Short-circuit answers come back as JSON `{"response": ...}`; generations
//! come back as a `text/plain` body streamed fragment by fragment.

use std::convert::Infallible;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use nova_core::dispatch::{FrontEndAction, Response as DispatchResponse};
use nova_types::chat::Utterance;
use nova_types::error::DispatchError;

use crate::state::AppState;

pub const EMPTY_INPUT_REPLY: &str = "I didn't hear anything.";

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub query: String,
    /// Route generations to the remote backend.
    #[serde(default)]
    pub use_cloud: bool,
}

#[derive(Debug, Serialize)]
pub struct ProcessReply {
    pub response: String,
    #[serde(flatten)]
    pub action: Option<FrontEndAction>,
}

pub async fn process(State(state): State<AppState>, Json(body): Json<ProcessRequest>) -> Response {
    let utterance = Utterance::new(&body.query);

    match state
        .dispatcher
        .route_and_respond(&utterance, body.use_cloud)
        .await
    {
        Err(DispatchError::InputEmpty) => Json(ProcessReply {
            response: EMPTY_INPUT_REPLY.to_string(),
            action: None,
        })
        .into_response(),
        Ok(DispatchResponse::Reply(reply)) => Json(ProcessReply {
            response: reply.text,
            action: reply.action,
        })
        .into_response(),
        Ok(DispatchResponse::Stream { notice, stream }) => {
            let notice = notice.map(|n| format!("{n}\n"));
            let fragments = stream.map(|fragment| fragment.text);
            let body = futures_util::stream::iter(notice)
                .chain(fragments)
                .map(Ok::<_, Infallible>);

            (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                Body::from_stream(body),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use nova_core::brain::BACKEND_UNAVAILABLE_WARNING;

    use crate::state::offline_state;

    async fn call(query: &str) -> (StatusCode, Option<String>, String) {
        let response = process(
            State(offline_state()),
            Json(ProcessRequest {
                query: query.to_string(),
                use_cloud: false,
            }),
        )
        .await;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn empty_query_gets_fixed_reply() {
        let (status, _, body) = call("   ").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["response"], EMPTY_INPUT_REPLY);
    }

    #[tokio::test]
    async fn mode_switch_is_json_with_action() {
        let (_, content_type, body) = call("switch to voice mode").await;
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["response"], "Switched to Voice Mode. I'm listening.");
        assert_eq!(json["action"], "switch_mode");
        assert_eq!(json["mode"], "voice");
    }

    #[tokio::test]
    async fn generation_streams_plain_text() {
        let (_, content_type, body) = call("tell me a joke").await;
        assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(body, BACKEND_UNAVAILABLE_WARNING);
    }

    #[test]
    fn use_cloud_defaults_to_false() {
        let request: ProcessRequest = serde_json::from_str(r#"{"query":"hi"}"#).unwrap();
        assert!(!request.use_cloud);
    }
}
