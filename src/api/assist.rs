//! REST API endpoints for AI assistance
//!
//! Every endpoint here answers 200 with `success` and `fallback` flags;
//! the model being down never surfaces as an HTTP failure. The single
//! exception is correlate-evidence, which rejects missing required fields
//! with a 400.

use actix_web::{HttpResponse, Responder, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::model::{CorrelatedEvidence, EventAnalysis, IocMatch, Severity};

/// Default cap for completion endpoints when the caller sends none
const DEFAULT_MAX_COMPLETIONS: usize = 5;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub case_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DescriptionRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeEventRequest {
    #[serde(default)]
    pub event_text: String,
    #[serde(default)]
    pub case_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendationsRequest {
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IocsRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CorrelateEvidenceRequest {
    pub case_id: Option<String>,
    pub event_description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteWordRequest {
    #[serde(default)]
    pub text: String,
    pub max_suggestions: Option<usize>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteSentenceRequest {
    #[serde(default)]
    pub text: String,
    pub max_completions: Option<usize>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub suggestion_id: String,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionsResponse {
    pub success: bool,
    pub suggestions: Vec<String>,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeverityResponse {
    pub success: bool,
    pub recommended_severity: Severity,
    pub confidence: f64,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagsResponse {
    pub success: bool,
    pub tags: Vec<String>,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeEventResponse {
    pub success: bool,
    pub analysis: EventAnalysis,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub recommendations: Vec<String>,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IocsResponse {
    pub success: bool,
    pub iocs: Vec<IocMatch>,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CorrelateEvidenceResponse {
    pub success: bool,
    pub correlated_evidence: CorrelatedEvidence,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteWordResponse {
    pub success: bool,
    pub suggestions: Vec<String>,
    pub original_text: String,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteSentenceResponse {
    pub success: bool,
    pub completions: Vec<String>,
    pub original_text: String,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub success: bool,
}

/// Completion suggestions for a partial event description
#[utoipa::path(
    post,
    path = "/api/v1/ai/suggestions",
    request_body = SuggestionsRequest,
    responses(
        (status = 200, description = "Suggestions, from model or fallback", body = SuggestionsResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/suggestions")]
pub async fn suggestions(
    state: web::Data<AppState>,
    request: web::Json<SuggestionsRequest>,
) -> impl Responder {
    let outcome = state
        .assist
        .suggestions(&request.input_text, &request.case_id)
        .await;

    HttpResponse::Ok().json(SuggestionsResponse {
        success: true,
        suggestions: outcome.value,
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Severity recommendation for an event description
#[utoipa::path(
    post,
    path = "/api/v1/ai/severity",
    request_body = DescriptionRequest,
    responses(
        (status = 200, description = "Recommended severity", body = SeverityResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/severity")]
pub async fn severity(
    state: web::Data<AppState>,
    request: web::Json<DescriptionRequest>,
) -> impl Responder {
    let outcome = state.assist.severity(&request.description).await;
    let confidence = outcome.confidence();

    HttpResponse::Ok().json(SeverityResponse {
        success: true,
        recommended_severity: outcome.value,
        confidence,
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Tag suggestions for an event description
#[utoipa::path(
    post,
    path = "/api/v1/ai/tags",
    request_body = DescriptionRequest,
    responses(
        (status = 200, description = "Suggested tags", body = TagsResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/tags")]
pub async fn suggest_tags(
    state: web::Data<AppState>,
    request: web::Json<DescriptionRequest>,
) -> impl Responder {
    let outcome = state.assist.tags(&request.description).await;

    HttpResponse::Ok().json(TagsResponse {
        success: true,
        tags: outcome.value,
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Combined severity/tag/IOC analysis of a timeline event
#[utoipa::path(
    post,
    path = "/api/v1/ai/analyze-event",
    request_body = AnalyzeEventRequest,
    responses(
        (status = 200, description = "Event analysis", body = AnalyzeEventResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/analyze-event")]
pub async fn analyze_event(
    state: web::Data<AppState>,
    request: web::Json<AnalyzeEventRequest>,
) -> impl Responder {
    let outcome = state.assist.analyze_event(&request.event_text).await;

    HttpResponse::Ok().json(AnalyzeEventResponse {
        success: true,
        analysis: outcome.value,
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Next investigation steps for a case
#[utoipa::path(
    get,
    path = "/api/v1/ai/cases/{case_id}/next-steps",
    params(
        ("case_id" = String, Path, description = "Case identifier")
    ),
    responses(
        (status = 200, description = "Suggested next steps", body = SuggestionsResponse)
    ),
    tag = "ai"
)]
#[get("/api/v1/ai/cases/{case_id}/next-steps")]
pub async fn next_steps(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let case_id = path.into_inner();
    let outcome = state.assist.next_steps(&case_id).await;

    HttpResponse::Ok().json(SuggestionsResponse {
        success: true,
        suggestions: outcome.value,
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Recommendations derived from recent event history
#[utoipa::path(
    post,
    path = "/api/v1/ai/recommendations",
    request_body = RecommendationsRequest,
    responses(
        (status = 200, description = "Recommended actions", body = RecommendationsResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/recommendations")]
pub async fn recommendations(
    state: web::Data<AppState>,
    request: web::Json<RecommendationsRequest>,
) -> impl Responder {
    let outcome = state.assist.recommendations(&request.history).await;

    HttpResponse::Ok().json(RecommendationsResponse {
        success: true,
        recommendations: outcome.value,
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Indicator extraction from free text
#[utoipa::path(
    post,
    path = "/api/v1/ai/iocs",
    request_body = IocsRequest,
    responses(
        (status = 200, description = "Extracted indicators", body = IocsResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/iocs")]
pub async fn iocs(state: web::Data<AppState>, request: web::Json<IocsRequest>) -> impl Responder {
    let outcome = state.assist.iocs(&request.text).await;

    HttpResponse::Ok().json(IocsResponse {
        success: true,
        iocs: outcome.value,
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Evidence correlation for a case event
///
/// The only assist endpoint with hard field validation.
#[utoipa::path(
    post,
    path = "/api/v1/ai/correlate-evidence",
    request_body = CorrelateEvidenceRequest,
    responses(
        (status = 200, description = "Correlated evidence", body = CorrelateEvidenceResponse),
        (status = 400, description = "Missing case_id or event_description")
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/correlate-evidence")]
pub async fn correlate_evidence(
    state: web::Data<AppState>,
    request: web::Json<CorrelateEvidenceRequest>,
) -> Result<HttpResponse, ApiError> {
    let case_id = request
        .case_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("case_id is required".to_string()))?;

    let event_description = request
        .event_description
        .as_deref()
        .map(str::trim)
        .filter(|description| !description.is_empty())
        .ok_or_else(|| ApiError::BadRequest("event_description is required".to_string()))?;

    let outcome = state.assist.correlate(case_id, event_description).await;

    Ok(HttpResponse::Ok().json(CorrelateEvidenceResponse {
        success: true,
        correlated_evidence: outcome.value,
        fallback: outcome.fallback,
        error: outcome.error,
    }))
}

/// Word continuations for the text being typed
#[utoipa::path(
    post,
    path = "/api/v1/ai/complete-word",
    request_body = CompleteWordRequest,
    responses(
        (status = 200, description = "Word suggestions", body = CompleteWordResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/complete-word")]
pub async fn complete_word(
    state: web::Data<AppState>,
    request: web::Json<CompleteWordRequest>,
) -> impl Responder {
    let max = request.max_suggestions.unwrap_or(DEFAULT_MAX_COMPLETIONS);
    let outcome = state.assist.complete_word(&request.text, max).await;

    HttpResponse::Ok().json(CompleteWordResponse {
        success: true,
        suggestions: outcome.value,
        original_text: request.text.clone(),
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Sentence completions for the text being typed
#[utoipa::path(
    post,
    path = "/api/v1/ai/complete-sentence",
    request_body = CompleteSentenceRequest,
    responses(
        (status = 200, description = "Sentence completions", body = CompleteSentenceResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/complete-sentence")]
pub async fn complete_sentence(
    state: web::Data<AppState>,
    request: web::Json<CompleteSentenceRequest>,
) -> impl Responder {
    let max = request.max_completions.unwrap_or(DEFAULT_MAX_COMPLETIONS);
    let outcome = state.assist.complete_sentence(&request.text, max).await;

    HttpResponse::Ok().json(CompleteSentenceResponse {
        success: true,
        completions: outcome.value,
        original_text: request.text.clone(),
        fallback: outcome.fallback,
        error: outcome.error,
    })
}

/// Record analyst feedback on a suggestion
#[utoipa::path(
    post,
    path = "/api/v1/ai/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback acknowledged", body = FeedbackResponse)
    ),
    tag = "ai"
)]
#[post("/api/v1/ai/feedback")]
pub async fn feedback(request: web::Json<FeedbackRequest>) -> impl Responder {
    tracing::info!(
        suggestion_id = %request.suggestion_id,
        feedback = %request.feedback,
        "Suggestion feedback received"
    );

    HttpResponse::Ok().json(FeedbackResponse { success: true })
}

/// OpenAPI document for the service
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health,
        crate::api::generate::generate,
        suggestions,
        severity,
        suggest_tags,
        analyze_event,
        next_steps,
        recommendations,
        iocs,
        correlate_evidence,
        complete_word,
        complete_sentence,
        feedback,
        crate::api::stream::stream_completion,
    ),
    components(schemas(
        crate::api::health::HealthStatus,
        crate::api::generate::GenerateRequest,
        crate::api::generate::GenerateResponse,
        SuggestionsRequest,
        DescriptionRequest,
        AnalyzeEventRequest,
        RecommendationsRequest,
        IocsRequest,
        CorrelateEvidenceRequest,
        CompleteWordRequest,
        CompleteSentenceRequest,
        FeedbackRequest,
        crate::api::stream::StreamCompletionRequest,
        SuggestionsResponse,
        SeverityResponse,
        TagsResponse,
        AnalyzeEventResponse,
        RecommendationsResponse,
        IocsResponse,
        CorrelateEvidenceResponse,
        CompleteWordResponse,
        CompleteSentenceResponse,
        FeedbackResponse,
        Severity,
        crate::model::IocType,
        IocMatch,
        EventAnalysis,
        CorrelatedEvidence,
    )),
    tags(
        (name = "ai", description = "AI assistance for DFIR report writing"),
        (name = "generate", description = "Raw text generation"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Configure assist routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(suggestions)
        .service(severity)
        .service(suggest_tags)
        .service(analyze_event)
        .service(next_steps)
        .service(recommendations)
        .service(iocs)
        .service(correlate_evidence)
        .service(complete_word)
        .service(complete_sentence)
        .service(feedback);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use crate::app::AppState;
    use crate::service::ModelState;

    fn degraded_state() -> web::Data<AppState> {
        web::Data::new(AppState::with_model(ModelState::Failed(
            "runtime offline".to_string(),
        )))
    }

    #[actix_web::test]
    async fn suggestions_serve_fallback_when_model_is_down() {
        let app = test::init_service(
            App::new()
                .app_data(degraded_state())
                .configure(super::configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/ai/suggestions")
            .set_json(serde_json::json!({"input_text": "found malware", "case_id": "CASE-7"}))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["fallback"], true);
        assert!(!body["suggestions"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn severity_serves_medium_fallback_when_model_is_down() {
        let app = test::init_service(
            App::new()
                .app_data(degraded_state())
                .configure(super::configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/ai/severity")
            .set_json(serde_json::json!({"description": "suspicious login"}))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["fallback"], true);
        assert_eq!(body["recommended_severity"], "medium");
    }

    #[actix_web::test]
    async fn correlate_evidence_rejects_missing_case_id() {
        let app = test::init_service(
            App::new()
                .app_data(degraded_state())
                .configure(super::configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/ai/correlate-evidence")
            .set_json(serde_json::json!({"event_description": "lateral movement"}))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn complete_word_echoes_original_text() {
        let app = test::init_service(
            App::new()
                .app_data(degraded_state())
                .configure(super::configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/ai/complete-word")
            .set_json(serde_json::json!({"text": "The attacker", "max_suggestions": 2}))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["original_text"], "The attacker");
        assert_eq!(body["fallback"], true);
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 2);
    }
}
