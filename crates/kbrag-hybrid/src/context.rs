//! Rendering a ranking as grounding text and grading how well it covers
//! the query.

use serde::Serialize;
use std::fmt;

use kbrag_core::types::Ranked;

/// Returned by [`format_context`] when no result clears the threshold.
pub const NO_CONTEXT: &str = "No encontré información específica para esta consulta en mi base de conocimiento.";

const SEPARATOR: &str = "\n\n---\n\n";

/// Results scoring at least `min_score`, rendered as
/// `[Relevancia: 0.87]\nP: question\nR: answer` blocks.
pub fn format_context(results: &[Ranked<'_>], min_score: f32) -> String {
    let parts: Vec<String> = results
        .iter()
        .filter(|r| r.score >= min_score)
        .map(|r| format!("[Relevancia: {:.2}]\nP: {}\nR: {}", r.score, r.entry.question, r.entry.answer))
        .collect();
    if parts.is_empty() {
        return NO_CONTEXT.to_string();
    }
    parts.join(SEPARATOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for CoverageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoverageLevel::Low => "low",
            CoverageLevel::Medium => "medium",
            CoverageLevel::High => "high",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coverage {
    pub level: CoverageLevel,
    /// Results at or above the relevance threshold.
    pub relevant: usize,
    pub strong: usize,
    pub max_score: f32,
}

impl Coverage {
    /// High with two or more strong results, medium with at least one
    /// relevant result, low otherwise.
    pub fn assess(results: &[Ranked<'_>], min_score: f32, strong_score: f32) -> Self {
        let relevant = results.iter().filter(|r| r.score >= min_score).count();
        let strong = results.iter().filter(|r| r.score >= strong_score).count();
        let max_score = results.iter().map(|r| r.score).reduce(f32::max).unwrap_or(0.0);
        let level = if strong >= 2 {
            CoverageLevel::High
        } else if relevant >= 1 {
            CoverageLevel::Medium
        } else {
            CoverageLevel::Low
        };
        Self { level, relevant, strong, max_score }
    }
}
