// Training plan generation with provider fallback.
// Primary (OpenRouter/Llama) → Secondary (Gemini) → static template.
// All LLM calls go through llm_client.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod template;
