//! Health check endpoint

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    /// "healthy" when the model adapter is ready, "degraded" otherwise
    pub status: String,
    /// Name of the loaded model, absent while degraded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Service health
///
/// Always returns 200; a degraded status means assist endpoints are
/// serving fallback responses only.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let status = if state.assist.is_ready() {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthStatus {
        status: status.to_string(),
        model: state.assist.model_name().map(|name| name.to_string()),
    })
}

/// Configure health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use crate::app::AppState;
    use crate::service::ModelState;

    #[actix_web::test]
    async fn reports_degraded_without_model() {
        let state = web::Data::new(AppState::with_model(ModelState::Failed(
            "runtime offline".to_string(),
        )));
        let app = test::init_service(App::new().app_data(state).configure(super::configure)).await;

        let request = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(body["status"], "degraded");
        assert!(body.get("model").is_none());
    }
}
