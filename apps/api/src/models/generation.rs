use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::routing::TaskType;

/// A persisted generation, as stored in `generated_contents`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRow {
    pub id: Uuid,
    pub task_type: String,
    pub title: Option<String>,
    pub prompt: String,
    pub content: String,
    /// "primary" | "secondary" | "template" for training plans, provider name otherwise.
    pub source: String,
    pub model: Option<String>,
    pub language: String,
    pub is_premium_user: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `GenerationRepository::insert`.
#[derive(Debug, Clone)]
pub struct NewGeneration {
    pub task_type: TaskType,
    pub title: Option<String>,
    pub prompt: String,
    pub content: String,
    pub source: String,
    pub model: Option<String>,
    pub language: String,
    pub is_premium_user: bool,
}
