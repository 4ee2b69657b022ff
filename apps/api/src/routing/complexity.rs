//! Coarse complexity estimate for a generation prompt.
//!
//! Heuristic only: prompt length plus a handful of signal words. Cheap and
//! deterministic, which is all the selector needs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Prompts longer than this (in chars) are always High.
const HIGH_LENGTH_CHARS: usize = 2000;
/// Prompts longer than this (in chars) are at least Medium.
const MEDIUM_LENGTH_CHARS: usize = 600;

const HIGH_SIGNALS: &[&str] = &[
    "comprehensive",
    "in-depth",
    "advanced",
    "expert",
    "multi-week",
    "multi-phase",
    "certification",
    "leadership",
    "strategy",
    "enterprise",
    "compliance",
];

const MEDIUM_SIGNALS: &[&str] = &[
    "detailed",
    "intermediate",
    "curriculum",
    "module",
    "assessment",
    "framework",
    "senior",
    "technical",
];

/// Estimates how demanding `prompt` is.
///
/// - High: longer than 2000 chars, or two or more high signals
/// - Medium: longer than 600 chars, one high signal, or two or more medium signals
/// - Low: everything else
pub fn estimate_complexity(prompt: &str) -> Complexity {
    let length = prompt.chars().count();
    let lower = prompt.to_lowercase();
    let hits = |signals: &[&str]| signals.iter().filter(|s| lower.contains(**s)).count();

    let high_hits = hits(HIGH_SIGNALS);
    if length > HIGH_LENGTH_CHARS || high_hits >= 2 {
        return Complexity::High;
    }

    let medium_hits = hits(MEDIUM_SIGNALS);
    if length > MEDIUM_LENGTH_CHARS || high_hits == 1 || medium_hits >= 2 {
        return Complexity::Medium;
    }

    Complexity::Low
}
