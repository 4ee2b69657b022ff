//! Typed persistence for generated content.
//!
//! Handlers depend on `GenerationRepository`, never on the pool directly, so
//! tests can swap in an in-memory store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::generation::{GenerationRow, NewGeneration};

#[async_trait]
pub trait GenerationRepository: Send + Sync {
    async fn insert(&self, generation: &NewGeneration) -> Result<Uuid, sqlx::Error>;

    async fn find(&self, id: Uuid) -> Result<Option<GenerationRow>, sqlx::Error>;
}

pub struct PgGenerationRepository {
    pool: PgPool,
}

impl PgGenerationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenerationRepository for PgGenerationRepository {
    async fn insert(&self, generation: &NewGeneration) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO generated_contents
                (id, task_type, title, prompt, content, source, model, language, is_premium_user)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(generation.task_type.slug())
        .bind(&generation.title)
        .bind(&generation.prompt)
        .bind(&generation.content)
        .bind(&generation.source)
        .bind(&generation.model)
        .bind(&generation.language)
        .bind(generation.is_premium_user)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find(&self, id: Uuid) -> Result<Option<GenerationRow>, sqlx::Error> {
        sqlx::query_as::<_, GenerationRow>("SELECT * FROM generated_contents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    /// Vec-backed repository. `failing()` makes every call error out.
    #[derive(Default)]
    pub struct InMemoryGenerationRepository {
        rows: Mutex<Vec<GenerationRow>>,
        fail: bool,
    }

    impl InMemoryGenerationRepository {
        pub fn failing() -> Self {
            Self {
                rows: Mutex::default(),
                fail: true,
            }
        }

        pub fn rows(&self) -> Vec<GenerationRow> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationRepository for InMemoryGenerationRepository {
        async fn insert(&self, generation: &NewGeneration) -> Result<Uuid, sqlx::Error> {
            if self.fail {
                return Err(sqlx::Error::PoolTimedOut);
            }
            let id = Uuid::new_v4();
            self.rows.lock().unwrap().push(GenerationRow {
                id,
                task_type: generation.task_type.slug().to_string(),
                title: generation.title.clone(),
                prompt: generation.prompt.clone(),
                content: generation.content.clone(),
                source: generation.source.clone(),
                model: generation.model.clone(),
                language: generation.language.clone(),
                is_premium_user: generation.is_premium_user,
                created_at: Utc::now(),
            });
            Ok(id)
        }

        async fn find(&self, id: Uuid) -> Result<Option<GenerationRow>, sqlx::Error> {
            if self.fail {
                return Err(sqlx::Error::PoolTimedOut);
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.id == id).cloned())
        }
    }
}
