// Shared prompt fragments and prompt-building utilities.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting pieces.

/// Appended to every system prompt: CareerKit renders plain Markdown, not JSON.
pub const MARKDOWN_OUTPUT_INSTRUCTION: &str = "\
    Respond in well-structured Markdown using headings and bullet lists. \
    Do NOT wrap the answer in code fences. \
    Do NOT include preambles such as 'Sure, here is' or closing apologies.";

/// Instruction telling the model which language to write in.
/// English needs no instruction.
pub fn language_instruction(language: &str) -> Option<String> {
    let language = language.trim();
    if language.is_empty() || language.eq_ignore_ascii_case("english") {
        None
    } else {
        Some(format!(
            "Write the entire response in {language}. Keep proper nouns and product names unchanged."
        ))
    }
}

/// Joins a feature system prompt with the shared output and language rules.
pub fn build_system_prompt(base: &str, language: &str) -> String {
    let mut system = format!("{base}\n\n{MARKDOWN_OUTPUT_INSTRUCTION}");
    if let Some(instruction) = language_instruction(language) {
        system.push_str("\n\n");
        system.push_str(&instruction);
    }
    system
}
