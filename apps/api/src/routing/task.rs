use serde::{Deserialize, Serialize};

/// The generation tasks CareerKit offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    TrainingPlan,
    JobDescription,
    InterviewPrep,
    ResumeTransformation,
    LearningContent,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::TrainingPlan,
        TaskType::JobDescription,
        TaskType::InterviewPrep,
        TaskType::ResumeTransformation,
        TaskType::LearningContent,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            TaskType::TrainingPlan => "training-plan",
            TaskType::JobDescription => "job-description",
            TaskType::InterviewPrep => "interview-prep",
            TaskType::ResumeTransformation => "resume-transformation",
            TaskType::LearningContent => "learning-content",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    /// Expected output size in words when the caller gives none.
    pub fn default_content_length(&self) -> u32 {
        match self {
            TaskType::TrainingPlan => 2000,
            TaskType::JobDescription => 800,
            TaskType::InterviewPrep => 1200,
            TaskType::ResumeTransformation => 1500,
            TaskType::LearningContent => 2200,
        }
    }

    /// Sampling temperature. Lower for tasks that must stay close to the input.
    pub fn temperature(&self) -> f32 {
        match self {
            TaskType::ResumeTransformation => 0.4,
            TaskType::TrainingPlan => 0.5,
            TaskType::JobDescription | TaskType::LearningContent => 0.6,
            TaskType::InterviewPrep => 0.7,
        }
    }
}

/// Token budget for an answer of `words` words (~4/3 tokens per word plus
/// headroom for Markdown structure), capped at 8192.
pub fn max_tokens_for(words: u32) -> u32 {
    (words.saturating_mul(4) / 3 + 256).min(8192)
}
