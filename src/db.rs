use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, PgPool};

use crate::error::AppError;

/// Connection pool for the application database. Queries borrow a
/// connection for one logical operation; nothing is pinned between
/// menu turns.
pub async fn create_pool(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Create the application database when it does not exist yet. Runs
/// against the administrative `postgres` database, not the app pool.
pub async fn ensure_database(admin_url: &str, name: &str) -> Result<(), AppError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::InvalidDatabaseName(name.to_string()));
    }

    let mut conn = PgConnection::connect(admin_url).await?;
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(name)
        .fetch_optional(&mut conn)
        .await?;

    if exists.is_none() {
        // CREATE DATABASE cannot take a bound parameter; the name is
        // validated above before interpolation.
        sqlx::query(&format!(r#"CREATE DATABASE "{name}""#))
            .execute(&mut conn)
            .await?;
        tracing::info!("Created database '{name}'");
    } else {
        tracing::info!("Database '{name}' already exists");
    }

    conn.close().await?;
    Ok(())
}

/// Create both tables if absent; safe to run on every startup.
pub async fn create_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS employers (
             id BIGINT PRIMARY KEY,
             name VARCHAR(255) NOT NULL,
             url TEXT,
             alternate_url TEXT,
             description TEXT
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS vacancies (
             id BIGINT PRIMARY KEY,
             name VARCHAR(255) NOT NULL,
             url TEXT,
             alternate_url TEXT,
             employer_id BIGINT REFERENCES employers(id) ON DELETE CASCADE,
             salary_from INTEGER,
             salary_to INTEGER,
             currency VARCHAR(10),
             salary_gross BOOLEAN,
             description TEXT,
             experience VARCHAR(100),
             employment VARCHAR(100)
         )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_database_names_that_need_quoting() {
        let err = ensure_database("postgres://localhost/postgres", "bad-name; DROP")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDatabaseName(_)));
    }

    #[tokio::test]
    async fn rejects_empty_database_name() {
        let err = ensure_database("postgres://localhost/postgres", "")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDatabaseName(_)));
    }
}
