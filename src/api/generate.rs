//! Raw generation endpoint
//!
//! The one endpoint that surfaces adapter failures to the caller instead
//! of degrading to a fallback payload.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::app::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Maximum number of generated tokens; endpoint default when absent
    pub max_length: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub text: String,
}

/// Generate raw text from a prompt
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "Empty prompt"),
        (status = 502, description = "Generation failed"),
        (status = 503, description = "Model not loaded")
    ),
    tag = "generate"
)]
#[post("/generate")]
pub async fn generate(
    state: web::Data<AppState>,
    request: web::Json<GenerateRequest>,
) -> Result<HttpResponse, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt is required".to_string()));
    }

    let text = state
        .assist
        .generate_raw(&request.prompt, request.max_length)
        .await?;

    Ok(HttpResponse::Ok().json(GenerateResponse { text }))
}

/// Configure generation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};

    use crate::app::AppState;
    use crate::service::ModelState;

    fn degraded_state() -> web::Data<AppState> {
        web::Data::new(AppState::with_model(ModelState::Failed(
            "runtime offline".to_string(),
        )))
    }

    #[actix_web::test]
    async fn rejects_empty_prompt() {
        let app = test::init_service(
            App::new()
                .app_data(degraded_state())
                .configure(super::configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/generate")
            .set_json(serde_json::json!({"prompt": "   "}))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn surfaces_model_unavailable_as_503() {
        let app = test::init_service(
            App::new()
                .app_data(degraded_state())
                .configure(super::configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/generate")
            .set_json(serde_json::json!({"prompt": "Write a summary"}))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
