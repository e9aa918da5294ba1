use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{ChatMessage, ChatRole};

#[derive(Debug, FromRow)]
struct ChatMessageRow {
    id: Uuid,
    user_id: Uuid,
    job_id: Uuid,
    role: String,
    content: String,
    timestamp: DateTime<Utc>,
}

impl TryFrom<ChatMessageRow> for ChatMessage {
    type Error = anyhow::Error;

    fn try_from(row: ChatMessageRow) -> Result<Self> {
        let role = ChatRole::parse(&row.role)
            .ok_or_else(|| anyhow!("chat message {} has unknown role '{}'", row.id, row.role))?;
        Ok(ChatMessage {
            id: row.id,
            user_id: row.user_id,
            job_id: row.job_id,
            role,
            content: row.content,
            timestamp: row.timestamp,
        })
    }
}

/// Stores a whole chat turn atomically: either every message lands or none.
pub async fn insert_messages(pool: &PgPool, messages: &[&ChatMessage]) -> Result<()> {
    let mut tx = pool.begin().await?;
    for message in messages {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, user_id, job_id, role, content, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(message.user_id)
        .bind(message.job_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.timestamp)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Oldest first.
pub async fn history(pool: &PgPool, user_id: Uuid, job_id: Uuid) -> Result<Vec<ChatMessage>> {
    let rows: Vec<ChatMessageRow> = sqlx::query_as(
        "SELECT * FROM chat_messages WHERE user_id = $1 AND job_id = $2 ORDER BY timestamp ASC",
    )
    .bind(user_id)
    .bind(job_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ChatMessage::try_from).collect()
}
