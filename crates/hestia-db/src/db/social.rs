use hestia_core::{
    models::{LogLevelTag, NewSocialPost, ScheduleStatus, SocialPost, SocialSchedule},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::transaction::TransactionGuard;

#[derive(Clone)]
pub struct SocialRepository {
    pool: PgPool,
}

impl SocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the post, one schedule per platform and one log row per schedule, atomically.
    #[tracing::instrument(
        skip(self, post),
        fields(db.table = "social_post", db.operation = "insert", platforms = post.platforms.len())
    )]
    pub async fn create_post_with_schedules(
        &self,
        post: NewSocialPost,
    ) -> Result<(SocialPost, Vec<SocialSchedule>), AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let created = sqlx::query_as::<Postgres, SocialPost>(
            r#"
            INSERT INTO social_post (user_id, content_text, media_url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, content_text, media_url, created_at
            "#,
        )
        .bind(&post.user_id)
        .bind(&post.content_text)
        .bind(&post.media_url)
        .fetch_one(&mut **tx)
        .await?;

        let mut schedules = Vec::with_capacity(post.platforms.len());
        for platform in &post.platforms {
            let schedule = sqlx::query_as::<Postgres, SocialSchedule>(
                r#"
                INSERT INTO social_schedule (user_id, post_id, platform, scheduled_at, status)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, user_id, post_id, platform, scheduled_at, status, publish_result, created_at, updated_at
                "#,
            )
            .bind(&post.user_id)
            .bind(created.id)
            .bind(platform)
            .bind(post.scheduled_at)
            .bind(post.status)
            .fetch_one(&mut **tx)
            .await?;

            sqlx::query("INSERT INTO social_log (schedule_id, level, message) VALUES ($1, $2, $3)")
                .bind(schedule.id)
                .bind(LogLevelTag::Info)
                .bind(schedule.status.log_message())
                .execute(&mut **tx)
                .await?;

            schedules.push(schedule);
        }

        tx.commit().await?;
        Ok((created, schedules))
    }

    /// Store the publishing API's answer on a schedule and log it.
    #[tracing::instrument(skip(self, result), fields(db.table = "social_schedule", db.operation = "update", db.record_id = %schedule_id))]
    pub async fn record_publish_result(
        &self,
        schedule_id: Uuid,
        result: &str,
        failed: bool,
    ) -> Result<(), AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let (status, level) = if failed {
            (ScheduleStatus::Failed, LogLevelTag::Error)
        } else {
            (ScheduleStatus::Published, LogLevelTag::Info)
        };

        sqlx::query(
            "UPDATE social_schedule SET status = $2, publish_result = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(schedule_id)
        .bind(status)
        .bind(result)
        .execute(&mut **tx)
        .await?;

        sqlx::query("INSERT INTO social_log (schedule_id, level, message) VALUES ($1, $2, $3)")
            .bind(schedule_id)
            .bind(level)
            .bind(result)
            .execute(&mut **tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
