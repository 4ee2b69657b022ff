//! Model Selector — maps a request's shape onto one concrete backend.
//!
//! Biased toward cost: the cheapest model that can plausibly handle the
//! request wins, and only complexity or output length escalate the choice.

use crate::llm_client::{CostTier, ModelChoice, Provider};
use crate::routing::complexity::Complexity;
use crate::routing::task::TaskType;

pub const GROQ_LLAMA_INSTANT: ModelChoice = ModelChoice {
    provider: Provider::Groq,
    model: "llama-3.1-8b-instant",
    cost_tier: CostTier::Free,
};

pub const OPENROUTER_LLAMA_SMALL: ModelChoice = ModelChoice {
    provider: Provider::OpenRouter,
    model: "meta-llama/llama-3.1-8b-instruct",
    cost_tier: CostTier::Low,
};

pub const OPENROUTER_LLAMA_LARGE: ModelChoice = ModelChoice {
    provider: Provider::OpenRouter,
    model: "meta-llama/llama-3.3-70b-instruct",
    cost_tier: CostTier::Standard,
};

pub const GEMINI_FLASH: ModelChoice = ModelChoice {
    provider: Provider::Gemini,
    model: "gemini-1.5-flash",
    cost_tier: CostTier::Standard,
};

pub const GEMINI_PRO: ModelChoice = ModelChoice {
    provider: Provider::Gemini,
    model: "gemini-1.5-pro",
    cost_tier: CostTier::Premium,
};

/// Outputs up to this many words may go to the free tier.
const CHEAP_LENGTH_LIMIT: u32 = 1000;
/// Outputs longer than this many words need a large-context model.
const STANDARD_LENGTH_LIMIT: u32 = 2500;

pub const DEFAULT_LANGUAGE: &str = "English";

/// Everything the selector looks at. Missing fields take per-task defaults.
#[derive(Debug, Clone, Copy)]
pub struct SelectionCriteria<'a> {
    pub task_type: TaskType,
    pub complexity: Option<Complexity>,
    /// Expected output size in words.
    pub content_length: Option<u32>,
    pub language: Option<&'a str>,
    pub prioritize_cost: bool,
}

impl<'a> SelectionCriteria<'a> {
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            complexity: None,
            content_length: None,
            language: None,
            prioritize_cost: false,
        }
    }
}

/// Picks a backend for the request. Pure: identical criteria always give the
/// identical choice.
///
/// Rules, first match wins:
/// 1. Non-English → Gemini (Pro only for High complexity without cost priority)
/// 2. Cost priority + Low + short output → Groq free tier
/// 3. Low → small Llama on OpenRouter
/// 4. Medium + output within the standard limit → large Llama on OpenRouter
/// 5. Otherwise → Gemini Pro, or Gemini Flash with cost priority
///
/// Outputs longer than the standard limit lift Low complexity to Medium first.
pub fn select_model(criteria: &SelectionCriteria<'_>) -> ModelChoice {
    let content_length = criteria
        .content_length
        .unwrap_or_else(|| criteria.task_type.default_content_length());
    let mut complexity = criteria.complexity.unwrap_or(Complexity::Medium);
    if content_length > STANDARD_LENGTH_LIMIT {
        complexity = complexity.max(Complexity::Medium);
    }

    if !is_english(criteria.language.unwrap_or(DEFAULT_LANGUAGE)) {
        return if complexity == Complexity::High && !criteria.prioritize_cost {
            GEMINI_PRO
        } else {
            GEMINI_FLASH
        };
    }

    match complexity {
        Complexity::Low if criteria.prioritize_cost && content_length <= CHEAP_LENGTH_LIMIT => {
            GROQ_LLAMA_INSTANT
        }
        Complexity::Low => OPENROUTER_LLAMA_SMALL,
        Complexity::Medium if content_length <= STANDARD_LENGTH_LIMIT => OPENROUTER_LLAMA_LARGE,
        Complexity::Medium | Complexity::High => {
            if criteria.prioritize_cost {
                GEMINI_FLASH
            } else {
                GEMINI_PRO
            }
        }
    }
}

fn is_english(language: &str) -> bool {
    let language = language.trim();
    language.is_empty()
        || language.eq_ignore_ascii_case("english")
        || language.eq_ignore_ascii_case("en")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(complexity: Complexity, length: u32, cost: bool) -> SelectionCriteria<'static> {
        SelectionCriteria {
            task_type: TaskType::LearningContent,
            complexity: Some(complexity),
            content_length: Some(length),
            language: Some("English"),
            prioritize_cost: cost,
        }
    }

    #[test]
    fn test_cheap_low_request_goes_to_free_tier() {
        assert_eq!(
            select_model(&criteria(Complexity::Low, 500, true)),
            GROQ_LLAMA_INSTANT
        );
    }

    #[test]
    fn test_low_without_cost_priority_uses_small_llama() {
        assert_eq!(
            select_model(&criteria(Complexity::Low, 500, false)),
            OPENROUTER_LLAMA_SMALL
        );
    }

    #[test]
    fn test_low_but_longer_than_cheap_limit_skips_free_tier() {
        assert_eq!(
            select_model(&criteria(Complexity::Low, 1500, true)),
            OPENROUTER_LLAMA_SMALL
        );
    }

    #[test]
    fn test_medium_uses_large_llama() {
        assert_eq!(
            select_model(&criteria(Complexity::Medium, 2000, false)),
            OPENROUTER_LLAMA_LARGE
        );
    }

    #[test]
    fn test_long_output_escalates_low_to_gemini() {
        assert_eq!(
            select_model(&criteria(Complexity::Low, 4000, false)),
            GEMINI_PRO
        );
        assert_eq!(
            select_model(&criteria(Complexity::Low, 4000, true)),
            GEMINI_FLASH
        );
    }

    #[test]
    fn test_high_complexity_uses_premium_unless_cost_prioritized() {
        assert_eq!(
            select_model(&criteria(Complexity::High, 800, false)),
            GEMINI_PRO
        );
        assert_eq!(
            select_model(&criteria(Complexity::High, 800, true)),
            GEMINI_FLASH
        );
    }

    #[test]
    fn test_non_english_goes_to_gemini() {
        let mut c = criteria(Complexity::Low, 300, true);
        c.language = Some("Spanish");
        assert_eq!(select_model(&c), GEMINI_FLASH);

        let mut c = criteria(Complexity::High, 300, false);
        c.language = Some("German");
        assert_eq!(select_model(&c), GEMINI_PRO);
    }

    #[test]
    fn test_missing_inputs_fall_back_to_defaults() {
        // Medium complexity, 800-word default for job descriptions, English.
        let choice = select_model(&SelectionCriteria::new(TaskType::JobDescription));
        assert_eq!(choice, OPENROUTER_LLAMA_LARGE);
    }

    #[test]
    fn test_selection_is_deterministic() {
        for task in TaskType::ALL {
            for complexity in [Complexity::Low, Complexity::Medium, Complexity::High] {
                for cost in [false, true] {
                    let c = SelectionCriteria {
                        task_type: task,
                        complexity: Some(complexity),
                        content_length: None,
                        language: Some("english"),
                        prioritize_cost: cost,
                    };
                    assert_eq!(select_model(&c), select_model(&c));
                }
            }
        }
    }

    #[test]
    fn test_cost_tier_never_increases_with_cost_priority() {
        for complexity in [Complexity::Low, Complexity::Medium, Complexity::High] {
            for length in [200, 1000, 2000, 5000] {
                let expensive = select_model(&criteria(complexity, length, false));
                let cheap = select_model(&criteria(complexity, length, true));
                assert!(cheap.cost_tier <= expensive.cost_tier);
            }
        }
    }
}
