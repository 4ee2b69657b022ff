// Single-shot career tools: job descriptions, interview prep, resume
// transformation, learning content. Routed through the model selector,
// no provider fallback.

pub mod generator;
pub mod handlers;
pub mod prompts;
