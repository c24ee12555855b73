//! AI-assist orchestration
//!
//! One method per endpoint, all following the same policy: build the
//! endpoint's prompt, call the generator, run the matching extractor, and
//! substitute the static fallback when the adapter is missing, fails, or
//! returns too little. Assist methods never return errors; degradation is
//! reported through the `fallback` flag and an optional error string.

pub mod completion;
pub mod extract;
pub mod fallback;
pub mod ioc;
pub mod prompts;

use std::sync::Arc;

use chrono::Utc;

use crate::model::{CorrelatedEvidence, EventAnalysis, IocMatch, Severity};
use crate::service::generator::{GenerateOptions, GeneratorError, ModelState, TextGenerator};

use extract::Extraction;

/// Confidence reported when a value came from real model output
pub const MODEL_CONFIDENCE: f64 = 0.8;

/// Confidence reported when a value came from a fallback table
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

/// At most this many history events feed the recommendations prompt
const MAX_HISTORY_EVENTS: usize = 5;

/// Result of an assist operation
#[derive(Debug, Clone)]
pub struct AssistOutcome<T> {
    pub value: T,
    pub fallback: bool,
    pub error: Option<String>,
}

impl<T> AssistOutcome<T> {
    fn from_model(value: T) -> Self {
        Self {
            value,
            fallback: false,
            error: None,
        }
    }

    fn from_fallback(value: T) -> Self {
        Self {
            value,
            fallback: true,
            error: None,
        }
    }

    fn degraded(value: T, error: &GeneratorError) -> Self {
        Self {
            value,
            fallback: true,
            error: Some(error.to_string()),
        }
    }

    pub fn confidence(&self) -> f64 {
        if self.fallback {
            FALLBACK_CONFIDENCE
        } else {
            MODEL_CONFIDENCE
        }
    }
}

/// Shared assist service, constructed once at startup
pub struct AssistService {
    model: ModelState,
}

impl AssistService {
    pub fn new(model: ModelState) -> Self {
        Self { model }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_ready()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.model_name()
    }

    /// Raw generation for `/generate`; the one path that surfaces errors
    pub async fn generate_raw(
        &self,
        prompt: &str,
        max_length: Option<u32>,
    ) -> Result<String, GeneratorError> {
        let generator = self.model.generator().ok_or_else(|| {
            GeneratorError::Unavailable("model adapter is not initialized".to_string())
        })?;

        let options = GenerateOptions {
            max_length: max_length.unwrap_or(GenerateOptions::default().max_length),
            ..GenerateOptions::default()
        };

        let candidates = generator.generate(prompt, &options).await?;
        Ok(candidates.into_iter().next().unwrap_or_default())
    }

    /// Completion suggestions for a partial event description
    pub async fn suggestions(
        &self,
        input_text: &str,
        case_id: &str,
    ) -> AssistOutcome<Vec<String>> {
        let input_text = extract::normalize_whitespace(input_text);

        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(fallback::completion_suggestions(&input_text));
        };

        let prompt = prompts::suggestions(&input_text, case_id);
        match self
            .first_candidate(generator, &prompt, &prompts::SUGGESTIONS_OPTIONS)
            .await
        {
            Ok(text) => match extract::suggestions(&text) {
                Extraction::Extracted(lines) => AssistOutcome::from_model(lines),
                Extraction::Insufficient => {
                    tracing::debug!(case_id = %case_id, "Model suggestions too thin, using fallback");
                    AssistOutcome::from_fallback(fallback::completion_suggestions(&input_text))
                }
            },
            Err(e) => {
                tracing::error!(error = %e, case_id = %case_id, "Suggestion generation failed");
                AssistOutcome::degraded(fallback::completion_suggestions(&input_text), &e)
            }
        }
    }

    /// Severity recommendation for an event description
    pub async fn severity(&self, description: &str) -> AssistOutcome<Severity> {
        let description = extract::normalize_whitespace(description);

        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(fallback::DEFAULT_SEVERITY);
        };

        let prompt = prompts::severity(&description);
        match self
            .first_candidate(generator, &prompt, &prompts::SEVERITY_OPTIONS)
            .await
        {
            Ok(text) => AssistOutcome::from_model(extract::severity(&text)),
            Err(e) => {
                tracing::error!(error = %e, "Severity generation failed");
                AssistOutcome::degraded(fallback::DEFAULT_SEVERITY, &e)
            }
        }
    }

    /// Tag suggestions for an event description
    pub async fn tags(&self, description: &str) -> AssistOutcome<Vec<String>> {
        let description = extract::normalize_whitespace(description);

        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(fallback::tags());
        };

        let prompt = prompts::tags(&description);
        match self
            .first_candidate(generator, &prompt, &prompts::TAGS_OPTIONS)
            .await
        {
            Ok(text) => match extract::tags(&text) {
                Extraction::Extracted(tags) => AssistOutcome::from_model(tags),
                Extraction::Insufficient => AssistOutcome::from_fallback(fallback::tags()),
            },
            Err(e) => {
                tracing::error!(error = %e, "Tag generation failed");
                AssistOutcome::degraded(fallback::tags(), &e)
            }
        }
    }

    /// Combined analysis of a timeline event
    ///
    /// Indicators always come from pattern matching over the event text;
    /// severity and tags come from the model when it is usable.
    pub async fn analyze_event(&self, event_text: &str) -> AssistOutcome<EventAnalysis> {
        let event_text = extract::normalize_whitespace(event_text);
        let iocs = ioc::extract_with_patterns(&event_text);

        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(Self::fallback_analysis(iocs));
        };

        let prompt = prompts::analyze_event(&event_text);
        match self
            .first_candidate(generator, &prompt, &prompts::ANALYZE_OPTIONS)
            .await
        {
            Ok(text) => {
                let severity = extract::severity(&text);
                let tags = extract::tags(&text)
                    .into_option()
                    .unwrap_or_else(fallback::tags);
                AssistOutcome::from_model(EventAnalysis {
                    severity,
                    confidence: MODEL_CONFIDENCE,
                    tags,
                    iocs,
                    analyzed_at: Utc::now(),
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Event analysis failed");
                AssistOutcome::degraded(Self::fallback_analysis(iocs), &e)
            }
        }
    }

    /// Next investigation steps for a case
    pub async fn next_steps(&self, case_id: &str) -> AssistOutcome<Vec<String>> {
        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(fallback::next_steps());
        };

        let prompt = prompts::next_steps(case_id);
        match self
            .first_candidate(generator, &prompt, &prompts::NEXT_STEPS_OPTIONS)
            .await
        {
            Ok(text) => match extract::suggestions(&text) {
                Extraction::Extracted(steps) => AssistOutcome::from_model(steps),
                Extraction::Insufficient => AssistOutcome::from_fallback(fallback::next_steps()),
            },
            Err(e) => {
                tracing::error!(error = %e, case_id = %case_id, "Next-step generation failed");
                AssistOutcome::degraded(fallback::next_steps(), &e)
            }
        }
    }

    /// Recommendations derived from recent event history
    pub async fn recommendations(&self, history: &[String]) -> AssistOutcome<Vec<String>> {
        let recent: Vec<String> = history
            .iter()
            .take(MAX_HISTORY_EVENTS)
            .map(|event| extract::normalize_whitespace(event))
            .collect();

        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(fallback::recommendations());
        };

        let prompt = prompts::recommendations(&recent);
        match self
            .first_candidate(generator, &prompt, &prompts::RECOMMENDATIONS_OPTIONS)
            .await
        {
            Ok(text) => match extract::suggestions(&text) {
                Extraction::Extracted(recs) => AssistOutcome::from_model(recs),
                Extraction::Insufficient => {
                    AssistOutcome::from_fallback(fallback::recommendations())
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Recommendation generation failed");
                AssistOutcome::degraded(fallback::recommendations(), &e)
            }
        }
    }

    /// Indicator extraction from free text
    pub async fn iocs(&self, text: &str) -> AssistOutcome<Vec<IocMatch>> {
        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(ioc::extract_with_patterns(text));
        };

        let prompt = prompts::iocs(text);
        match self
            .first_candidate(generator, &prompt, &prompts::IOC_OPTIONS)
            .await
        {
            Ok(generated) => {
                let found = ioc::extract(&generated);
                if found.is_empty() {
                    AssistOutcome::from_fallback(ioc::extract_with_patterns(text))
                } else {
                    AssistOutcome::from_model(found)
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "IOC generation failed");
                AssistOutcome::degraded(ioc::extract_with_patterns(text), &e)
            }
        }
    }

    /// Evidence correlation for a case event
    pub async fn correlate(
        &self,
        case_id: &str,
        event_description: &str,
    ) -> AssistOutcome<CorrelatedEvidence> {
        let event_description = extract::normalize_whitespace(event_description);
        let iocs = ioc::extract_with_patterns(&event_description);

        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(Self::correlation(
                case_id,
                fallback::next_steps(),
                iocs,
            ));
        };

        let prompt = prompts::correlate(case_id, &event_description);
        match self
            .first_candidate(generator, &prompt, &prompts::CORRELATE_OPTIONS)
            .await
        {
            Ok(text) => match extract::suggestions(&text) {
                Extraction::Extracted(leads) => {
                    AssistOutcome::from_model(Self::correlation(case_id, leads, iocs))
                }
                Extraction::Insufficient => AssistOutcome::from_fallback(Self::correlation(
                    case_id,
                    fallback::next_steps(),
                    iocs,
                )),
            },
            Err(e) => {
                tracing::error!(error = %e, case_id = %case_id, "Evidence correlation failed");
                AssistOutcome::degraded(
                    Self::correlation(case_id, fallback::next_steps(), iocs),
                    &e,
                )
            }
        }
    }

    /// Word continuations for the text being typed
    pub async fn complete_word(&self, text: &str, max: usize) -> AssistOutcome<Vec<String>> {
        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(fallback::word_suggestions(max));
        };

        let prompt = prompts::completion(text);
        match self
            .first_candidate(generator, &prompt, &prompts::COMPLETE_WORD_OPTIONS)
            .await
        {
            Ok(continuation) => {
                let words = completion::word_suggestions(&continuation, max);
                if words.is_empty() {
                    AssistOutcome::from_fallback(fallback::word_suggestions(max))
                } else {
                    AssistOutcome::from_model(words)
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Word completion failed");
                AssistOutcome::degraded(fallback::word_suggestions(max), &e)
            }
        }
    }

    /// Sentence completions for the text being typed
    pub async fn complete_sentence(&self, text: &str, max: usize) -> AssistOutcome<Vec<String>> {
        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(fallback::sentence_completions(text, max));
        };

        let prompt = prompts::completion(text);
        match generator
            .generate(&prompt, &prompts::COMPLETE_SENTENCE_OPTIONS)
            .await
        {
            Ok(candidates) => {
                let completions = completion::sentence_completions(&candidates, text, max);
                if completions.is_empty() {
                    AssistOutcome::from_fallback(fallback::sentence_completions(text, max))
                } else {
                    AssistOutcome::from_model(completions)
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Sentence completion failed");
                AssistOutcome::degraded(fallback::sentence_completions(text, max), &e)
            }
        }
    }

    /// Words of a single completion, for chunked streaming delivery
    ///
    /// The full completion is computed before the first chunk is emitted;
    /// streaming is post-hoc delivery, not incremental generation.
    pub async fn stream_words(&self, text: &str) -> AssistOutcome<Vec<String>> {
        let Some(generator) = self.model.generator() else {
            return AssistOutcome::from_fallback(Self::fallback_stream_words(text));
        };

        let prompt = prompts::completion(text);
        match self
            .first_candidate(generator, &prompt, &prompts::STREAM_OPTIONS)
            .await
        {
            Ok(continuation) => {
                let words: Vec<String> = continuation
                    .split_whitespace()
                    .map(|word| word.to_string())
                    .collect();
                if words.is_empty() {
                    AssistOutcome::from_fallback(Self::fallback_stream_words(text))
                } else {
                    AssistOutcome::from_model(words)
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Streaming completion failed");
                AssistOutcome::degraded(Self::fallback_stream_words(text), &e)
            }
        }
    }

    /// Generate one candidate and strip any echoed prompt
    async fn first_candidate(
        &self,
        generator: &Arc<dyn TextGenerator>,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, GeneratorError> {
        let candidates = generator.generate(prompt, options).await?;
        let text = candidates.into_iter().next().unwrap_or_default();
        Ok(extract::strip_prompt_echo(&text, prompt).to_string())
    }

    fn fallback_analysis(iocs: Vec<IocMatch>) -> EventAnalysis {
        EventAnalysis {
            severity: fallback::DEFAULT_SEVERITY,
            confidence: FALLBACK_CONFIDENCE,
            tags: fallback::tags(),
            iocs,
            analyzed_at: Utc::now(),
        }
    }

    fn correlation(case_id: &str, leads: Vec<String>, iocs: Vec<IocMatch>) -> CorrelatedEvidence {
        CorrelatedEvidence {
            case_id: case_id.to_string(),
            related_leads: leads,
            iocs,
            correlated_at: Utc::now(),
        }
    }

    fn fallback_stream_words(text: &str) -> Vec<String> {
        fallback::sentence_completions(text, 1)
            .first()
            .map(|sentence| {
                sentence
                    .split_whitespace()
                    .map(|word| word.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Generator stub returning a fixed candidate list or an error
    struct StubGenerator {
        candidates: Result<Vec<String>, ()>,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _options: &GenerateOptions,
        ) -> Result<Vec<String>, GeneratorError> {
            match &self.candidates {
                Ok(candidates) => Ok(candidates.clone()),
                Err(()) => Err(GeneratorError::Unavailable("stub failure".to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    fn ready(candidates: Vec<&str>) -> AssistService {
        AssistService::new(ModelState::Ready(Arc::new(StubGenerator {
            candidates: Ok(candidates.into_iter().map(String::from).collect()),
        })))
    }

    fn failing() -> AssistService {
        AssistService::new(ModelState::Ready(Arc::new(StubGenerator {
            candidates: Err(()),
        })))
    }

    fn unavailable() -> AssistService {
        AssistService::new(ModelState::Failed("runtime offline".to_string()))
    }

    #[tokio::test]
    async fn severity_uses_model_output() {
        let service = ready(vec!["This looks critical to me"]);
        let outcome = service.severity("ransomware spotted").await;
        assert_eq!(outcome.value, Severity::Critical);
        assert!(!outcome.fallback);
        assert_eq!(outcome.confidence(), MODEL_CONFIDENCE);
    }

    #[tokio::test]
    async fn severity_falls_back_when_model_unavailable() {
        let outcome = unavailable().severity("anything").await;
        assert_eq!(outcome.value, Severity::Medium);
        assert!(outcome.fallback);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn severity_degrades_with_error_string_on_failure() {
        let outcome = failing().severity("anything").await;
        assert!(outcome.fallback);
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn suggestions_fall_back_on_thin_output() {
        let service = ready(vec!["- too short\nnope"]);
        let outcome = service.suggestions("found malware on host", "CASE-1").await;
        assert!(outcome.fallback);
        assert!(!outcome.value.is_empty());
        // Thin output is not an error
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn tags_fall_back_to_investigation_default() {
        let service = ready(vec!["completely unrelated words"]);
        let outcome = service.tags("event description").await;
        assert!(outcome.fallback);
        assert_eq!(outcome.value, vec!["investigation"]);
    }

    #[tokio::test]
    async fn iocs_fall_back_to_patterns_over_input() {
        let outcome = unavailable()
            .iocs("beacon to 10.0.0.5 observed")
            .await;
        assert!(outcome.fallback);
        assert_eq!(outcome.value.len(), 1);
        assert_eq!(outcome.value[0].value, "10.0.0.5");
    }

    #[tokio::test]
    async fn generate_raw_reports_unavailable_adapter() {
        let result = unavailable().generate_raw("prompt", None).await;
        assert!(matches!(result, Err(GeneratorError::Unavailable(_))));
    }

    #[tokio::test]
    async fn recommendations_use_at_most_five_history_events() {
        // The prompt only ever sees five events; with a failing generator we
        // still get the fallback list.
        let history: Vec<String> = (0..8).map(|i| format!("event number {}", i)).collect();
        let outcome = failing().recommendations(&history).await;
        assert!(outcome.fallback);
        assert_eq!(outcome.value.len(), fallback::DEFAULT_RECOMMENDATIONS.len());
    }

    #[tokio::test]
    async fn complete_sentence_shapes_model_candidates() {
        let service = ready(vec![
            "The host was isolated from the network. Extra trailing text",
        ]);
        let outcome = service.complete_sentence("The host", 5).await;
        assert!(!outcome.fallback);
        assert_eq!(outcome.value, vec!["was isolated from the network."]);
    }

    #[tokio::test]
    async fn stream_words_split_the_completion() {
        let service = ready(vec!["The host was quarantined"]);
        let outcome = service.stream_words("The host").await;
        assert!(!outcome.fallback);
        assert_eq!(outcome.value, vec!["was", "quarantined"]);
    }
}
