use sqlx::PgPool;

use crate::db::models::User;

const COLUMNS: &str = "id, email, full_name, phone, role, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
pub(crate) async fn create(pool: &PgPool, user: &User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users ({COLUMNS})
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {COLUMNS}"
    ))
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.full_name)
    .bind(&user.phone)
    .bind(user.role)
    .bind(user.created_at)
    .fetch_one(pool)
    .await
}

#[cfg(test)]
pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}
