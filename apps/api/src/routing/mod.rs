// Model routing: decides which provider/model serves a request.
// Pure and deterministic — no network calls, no learned state.

pub mod complexity;
pub mod selector;
pub mod task;

pub use complexity::{estimate_complexity, Complexity};
pub use selector::{select_model, SelectionCriteria};
pub use task::TaskType;
