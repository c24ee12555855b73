//! Domain types for AI-assistance results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Severity level recommended for a timeline event or case finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Detection priority used when scanning generated text. A text that
    /// mentions several levels is classified by the highest one listed here.
    pub const DETECTION_ORDER: &'static [Severity] = &[
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of an indicator of compromise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IocType {
    Ip,
    Domain,
    Hash,
}

impl IocType {
    /// Fixed confidence assigned to pattern-matched indicators of this type
    pub fn base_confidence(&self) -> f64 {
        match self {
            IocType::Ip => 0.7,
            IocType::Domain => 0.6,
            IocType::Hash => 0.8,
        }
    }
}

/// A single extracted indicator of compromise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IocMatch {
    #[serde(rename = "type")]
    pub ioc_type: IocType,
    pub value: String,
    pub confidence: f64,
}

impl IocMatch {
    pub fn new(ioc_type: IocType, value: impl Into<String>) -> Self {
        Self {
            ioc_type,
            value: value.into(),
            confidence: ioc_type.base_confidence(),
        }
    }
}

/// Combined analysis of a timeline event
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventAnalysis {
    pub severity: Severity,
    pub confidence: f64,
    pub tags: Vec<String>,
    pub iocs: Vec<IocMatch>,
    pub analyzed_at: DateTime<Utc>,
}

/// Evidence correlation result for a case event
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CorrelatedEvidence {
    pub case_id: String,
    /// Investigation leads that may connect this event to existing evidence
    pub related_leads: Vec<String>,
    /// Indicators pulled from the event description
    pub iocs: Vec<IocMatch>,
    pub correlated_at: DateTime<Utc>,
}
