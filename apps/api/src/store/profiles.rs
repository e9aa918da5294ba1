use anyhow::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Profile;

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>> {
    let row: Option<Json<Profile>> =
        sqlx::query_scalar("SELECT data FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|Json(profile)| profile))
}

pub async fn save_profile(pool: &PgPool, user_id: Uuid, profile: &Profile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, data)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE
            SET data = EXCLUDED.data, updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(Json(profile))
    .execute(pool)
    .await?;
    Ok(())
}
