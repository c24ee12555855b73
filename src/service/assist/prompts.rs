//! Prompt templates and sampling constants, one set per endpoint
//!
//! Templates are deterministic: a fixed framing sentence plus interpolated
//! request fields. Sampling parameters are constants, never user-supplied.

use crate::service::generator::GenerateOptions;

pub const SUGGESTIONS_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 150,
    num_return_sequences: 1,
    temperature: 0.8,
    top_p: 0.9,
    repetition_penalty: 1.3,
    no_repeat_ngram_size: 3,
    do_sample: true,
};

pub const SEVERITY_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 40,
    num_return_sequences: 1,
    temperature: 0.3,
    top_p: 0.9,
    repetition_penalty: 1.1,
    no_repeat_ngram_size: 2,
    do_sample: true,
};

pub const TAGS_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 60,
    num_return_sequences: 1,
    temperature: 0.5,
    top_p: 0.9,
    repetition_penalty: 1.2,
    no_repeat_ngram_size: 2,
    do_sample: true,
};

pub const ANALYZE_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 200,
    num_return_sequences: 1,
    temperature: 0.7,
    top_p: 0.9,
    repetition_penalty: 1.3,
    no_repeat_ngram_size: 3,
    do_sample: true,
};

pub const NEXT_STEPS_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 150,
    num_return_sequences: 1,
    temperature: 0.8,
    top_p: 0.9,
    repetition_penalty: 1.3,
    no_repeat_ngram_size: 3,
    do_sample: true,
};

pub const RECOMMENDATIONS_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 150,
    num_return_sequences: 1,
    temperature: 0.8,
    top_p: 0.9,
    repetition_penalty: 1.3,
    no_repeat_ngram_size: 3,
    do_sample: true,
};

pub const IOC_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 150,
    num_return_sequences: 1,
    temperature: 0.2,
    top_p: 0.9,
    repetition_penalty: 1.1,
    no_repeat_ngram_size: 2,
    do_sample: true,
};

pub const CORRELATE_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 150,
    num_return_sequences: 1,
    temperature: 0.7,
    top_p: 0.9,
    repetition_penalty: 1.3,
    no_repeat_ngram_size: 3,
    do_sample: true,
};

pub const COMPLETE_WORD_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 30,
    num_return_sequences: 1,
    temperature: 0.8,
    top_p: 0.9,
    repetition_penalty: 1.3,
    no_repeat_ngram_size: 3,
    do_sample: true,
};

pub const COMPLETE_SENTENCE_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 60,
    num_return_sequences: 3,
    temperature: 0.9,
    top_p: 0.95,
    repetition_penalty: 1.3,
    no_repeat_ngram_size: 3,
    do_sample: true,
};

pub const STREAM_OPTIONS: GenerateOptions = GenerateOptions {
    max_length: 60,
    num_return_sequences: 1,
    temperature: 0.9,
    top_p: 0.95,
    repetition_penalty: 1.3,
    no_repeat_ngram_size: 3,
    do_sample: true,
};

pub fn suggestions(input_text: &str, case_id: &str) -> String {
    format!(
        "You are a DFIR analyst assistant working case {case_id}. Complete this investigation event description with 3-5 specific, actionable suggestions, one per line starting with \"-\".\n\nPartial description: {input_text}\n\nSuggestions:\n"
    )
}

pub fn severity(description: &str) -> String {
    format!(
        "Classify the severity of this security event as critical, high, medium, or low.\n\nEvent: {description}\n\nSeverity:"
    )
}

pub fn tags(description: &str) -> String {
    format!(
        "List short classification tags for this digital forensics event, separated by commas.\n\nEvent: {description}\n\nTags:"
    )
}

pub fn analyze_event(event_text: &str) -> String {
    format!(
        "Analyze this investigation timeline event. State its severity (critical, high, medium, or low) and the forensic categories it belongs to.\n\nEvent: {event_text}\n\nAnalysis:"
    )
}

pub fn next_steps(case_id: &str) -> String {
    format!(
        "You are a DFIR analyst working case {case_id}. Suggest 3-5 logical next investigation steps focused on evidence collection, analysis, containment, or remediation, one per line starting with \"-\".\n\nNext steps:\n"
    )
}

pub fn recommendations(history: &[String]) -> String {
    let events = history
        .iter()
        .map(|event| format!("- {event}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Based on these investigation events, recommend follow-up actions, one per line starting with \"-\".\n\nEvents:\n{events}\n\nRecommendations:\n"
    )
}

pub fn iocs(text: &str) -> String {
    format!(
        "Extract indicators of compromise from this text as a JSON array of objects with \"type\" (ip, domain, or hash), \"value\", and \"confidence\" fields.\n\nText: {text}\n\nIndicators:"
    )
}

pub fn correlate(case_id: &str, event_description: &str) -> String {
    format!(
        "You are a DFIR analyst working case {case_id}. Suggest evidence sources and artifacts likely related to this event, one per line starting with \"-\".\n\nEvent: {event_description}\n\nRelated evidence:\n"
    )
}

/// Completion endpoints feed the analyst's partial text to the model
/// verbatim; the model continues it.
pub fn completion(text: &str) -> String {
    text.to_string()
}
