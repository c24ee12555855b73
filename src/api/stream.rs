//! Chunked word-by-word completion delivery
//!
//! The completion is computed in full before the first chunk goes out;
//! this endpoint chunks delivery, it does not stream generation. Chunks
//! are newline-delimited JSON; a disconnecting client drops the stream
//! and nothing further is produced.

use actix_web::{HttpResponse, post, web};
use futures::stream;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::app::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct StreamCompletionRequest {
    #[serde(default)]
    pub text: String,
}

/// Stream a completion word by word
///
/// Emits `{"word": ..., "completed": false}` per word, then a final
/// `{"completed": true, "total_words": N}` chunk.
#[utoipa::path(
    post,
    path = "/api/v1/ai/stream-completion",
    request_body = StreamCompletionRequest,
    responses(
        (status = 200, description = "NDJSON stream of completion words")
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/stream-completion")]
pub async fn stream_completion(
    state: web::Data<AppState>,
    request: web::Json<StreamCompletionRequest>,
) -> HttpResponse {
    let outcome = state.assist.stream_words(&request.text).await;
    let total_words = outcome.value.len();

    tracing::debug!(
        total_words = total_words,
        fallback = outcome.fallback,
        "Streaming completion"
    );

    let chunks = outcome
        .value
        .into_iter()
        .map(|word| {
            serde_json::json!({
                "word": word,
                "completed": false,
            })
        })
        .chain(std::iter::once(serde_json::json!({
            "completed": true,
            "total_words": total_words,
        })))
        .map(|chunk| {
            Ok::<_, actix_web::Error>(web::Bytes::from(format!("{}\n", chunk)))
        });

    HttpResponse::Ok()
        .content_type("application/x-ndjson")
        .streaming(stream::iter(chunks))
}

/// Configure streaming routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(stream_completion);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use crate::app::AppState;
    use crate::service::ModelState;

    #[actix_web::test]
    async fn stream_ends_with_completion_marker() {
        let state = web::Data::new(AppState::with_model(ModelState::Disabled));
        let app = test::init_service(App::new().app_data(state).configure(super::configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/v1/ai/stream-completion")
            .set_json(serde_json::json!({"text": "The evidence log"}))
            .to_request();

        let body = test::call_and_read_body(&app, request).await;
        let lines: Vec<&str> = std::str::from_utf8(&body)
            .unwrap()
            .lines()
            .filter(|line| !line.is_empty())
            .collect();

        assert!(!lines.is_empty());

        let last: serde_json::Value = serde_json::from_str(lines.last().unwrap()).unwrap();
        assert_eq!(last["completed"], true);
        assert_eq!(last["total_words"], (lines.len() - 1) as u64);

        for line in &lines[..lines.len() - 1] {
            let chunk: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(chunk["completed"], false);
            assert!(chunk["word"].is_string());
        }
    }
}
