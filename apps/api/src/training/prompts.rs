// All LLM prompt constants for training plan generation.
// Shared output/language rules come from llm_client::prompts.

/// System prompt for training plan generation.
pub const TRAINING_PLAN_SYSTEM: &str = "You are a senior learning & development \
    specialist who designs corporate training programs. \
    Your plans are practical, sequenced, and measurable. \
    Every module must map back to at least one stated learning objective.";

/// Training plan prompt template.
/// Replace: {title}, {objectives}, {duration}, {audience}, {level}
pub const TRAINING_PLAN_PROMPT_TEMPLATE: &str = r#"Design a complete training plan.

PROGRAM TITLE: {title}

LEARNING OBJECTIVES:
{objectives}

DURATION: {duration}
TARGET AUDIENCE: {audience}
PROFICIENCY LEVEL: {level}

The plan MUST contain these sections, in this order:
1. Overview — purpose of the program and expected outcomes
2. Learning Objectives — restate and sharpen each objective so it is measurable
3. Schedule — modules laid out across the duration, each with a time estimate
4. Modules — for each module: goals, key topics, activities, and materials
5. Assessment — how progress against each objective is measured
6. Resources — recommended reading, tools, or courses

HARD RULES:
1. Fit the whole schedule inside the stated duration
2. Tailor depth and vocabulary to the stated audience and level
3. Every module names the objective(s) it serves
4. Do NOT invent company names, statistics, or URLs"#;

/// Fills the template. Missing optional fields get neutral defaults so the
/// model is never shown an empty placeholder.
pub fn build_training_plan_prompt(
    title: &str,
    objectives: &[String],
    duration: Option<&str>,
    audience: Option<&str>,
    level: Option<&str>,
) -> String {
    let objectives = if objectives.is_empty() {
        "- (none provided — infer sensible objectives from the title)".to_string()
    } else {
        objectives
            .iter()
            .map(|o| format!("- {o}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    TRAINING_PLAN_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{objectives}", &objectives)
        .replace("{duration}", duration.unwrap_or("4 weeks"))
        .replace("{audience}", audience.unwrap_or("General employees"))
        .replace("{level}", level.unwrap_or("Beginner"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_objectives() {
        let prompt = build_training_plan_prompt(
            "Data Literacy",
            &["Read dashboards".into(), "Question metrics".into()],
            Some("2 weeks"),
            Some("Sales team"),
            None,
        );
        assert!(prompt.contains("PROGRAM TITLE: Data Literacy"));
        assert!(prompt.contains("- Read dashboards\n- Question metrics"));
        assert!(prompt.contains("DURATION: 2 weeks"));
        assert!(prompt.contains("TARGET AUDIENCE: Sales team"));
        assert!(prompt.contains("PROFICIENCY LEVEL: Beginner"));
    }

    #[test]
    fn test_prompt_has_no_unfilled_placeholders() {
        let prompt = build_training_plan_prompt("X", &[], None, None, None);
        for placeholder in ["{title}", "{objectives}", "{duration}", "{audience}", "{level}"] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
        assert!(prompt.contains("none provided"));
    }
}
