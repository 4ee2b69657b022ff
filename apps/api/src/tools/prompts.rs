// Prompt constants for the single-shot career tools.
// Each user template has one placeholder: {input}.

use crate::routing::TaskType;
use crate::training::prompts::TRAINING_PLAN_SYSTEM;

pub const JOB_DESCRIPTION_SYSTEM: &str = "You are an experienced HR business partner \
    who writes clear, inclusive, and accurate job descriptions. \
    Avoid gendered language, jargon, and unnecessary requirements.";

pub const JOB_DESCRIPTION_TEMPLATE: &str = r#"Write a job description from these details:

{input}

Include, in order: Role Summary, Key Responsibilities, Required Qualifications,
Preferred Qualifications, and What We Offer. Do NOT invent salary figures or benefits
that are not in the details."#;

pub const INTERVIEW_PREP_SYSTEM: &str = "You are an interview coach who has run \
    hundreds of structured interviews. You prepare candidates honestly and concretely.";

pub const INTERVIEW_PREP_TEMPLATE: &str = r#"Prepare interview practice material for:

{input}

Group likely questions into Behavioral, Technical, and Role-Specific. For each question,
list what a strong answer covers and one good follow-up question an interviewer may ask."#;

pub const RESUME_TRANSFORMATION_SYSTEM: &str = "You are an expert resume writer. \
    You rewrite content to be concise and results-oriented. \
    You NEVER invent employers, dates, titles, or metrics.";

pub const RESUME_TRANSFORMATION_TEMPLATE: &str = r#"Rewrite the following resume content:

{input}

Use strong action verbs, one idea per bullet, and quantify impact ONLY where the source
already contains numbers. Keep every employer, title, and date exactly as given."#;

pub const LEARNING_CONTENT_SYSTEM: &str = "You are an instructional designer who turns \
    topics into engaging, self-paced learning material.";

pub const LEARNING_CONTENT_TEMPLATE: &str = r#"Create learning content on:

{input}

Include: a short introduction, core concepts with examples, two practice exercises with
answers, and a summary of key takeaways."#;

pub const TRAINING_PLAN_TEMPLATE: &str = r#"Design a training plan for:

{input}

Include an overview, measurable objectives, a module-by-module schedule, assessment,
and resources."#;

/// Returns `(system prompt, user template)` for a task.
pub fn prompts_for(task: TaskType) -> (&'static str, &'static str) {
    match task {
        TaskType::JobDescription => (JOB_DESCRIPTION_SYSTEM, JOB_DESCRIPTION_TEMPLATE),
        TaskType::InterviewPrep => (INTERVIEW_PREP_SYSTEM, INTERVIEW_PREP_TEMPLATE),
        TaskType::ResumeTransformation => {
            (RESUME_TRANSFORMATION_SYSTEM, RESUME_TRANSFORMATION_TEMPLATE)
        }
        TaskType::LearningContent => (LEARNING_CONTENT_SYSTEM, LEARNING_CONTENT_TEMPLATE),
        TaskType::TrainingPlan => (TRAINING_PLAN_SYSTEM, TRAINING_PLAN_TEMPLATE),
    }
}
