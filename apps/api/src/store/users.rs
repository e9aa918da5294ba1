use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::User;

pub struct UpsertUser<'a> {
    pub external_id: &'a str,
    pub email: &'a str,
    pub display_name: &'a str,
    pub photo_url: Option<&'a str>,
}

/// Creates the user on first sign-in; afterwards refreshes the contact fields.
pub async fn upsert_user(pool: &PgPool, params: UpsertUser<'_>) -> Result<User> {
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, external_id, email, display_name, photo_url)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (external_id) DO UPDATE
            SET email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                photo_url = EXCLUDED.photo_url,
                updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(params.external_id)
    .bind(params.email)
    .bind(params.display_name)
    .bind(params.photo_url)
    .fetch_one(pool)
    .await?;

    info!("Upserted user {} ({})", user.id, user.email);
    Ok(user)
}

pub async fn find_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}
