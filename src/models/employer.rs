use serde_json::Value;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{opt_str, require_id, require_str, str_or_empty};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employer {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub alternate_url: String,
    pub description: Option<String>,
}

impl Employer {
    /// Map an employers API payload into a typed record.
    /// `id` and `name` are required; everything else has an explicit default.
    pub fn from_json(data: &Value) -> Result<Employer, AppError> {
        Ok(Employer {
            id: require_id(data.get("id"), "employer", "id")?,
            name: require_str(data, "employer", "name")?,
            url: str_or_empty(data, "url"),
            alternate_url: str_or_empty(data, "alternate_url"),
            description: opt_str(data, "description"),
        })
    }

    /// Insert the employer, overwriting every mutable column when the row
    /// already exists. The statement commits on its own.
    pub async fn upsert(&self, pool: &PgPool) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO employers (id, name, url, alternate_url, description)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                 name = EXCLUDED.name,
                 url = EXCLUDED.url,
                 alternate_url = EXCLUDED.alternate_url,
                 description = EXCLUDED.description",
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.url)
        .bind(&self.alternate_url)
        .bind(&self.description)
        .execute(pool)
        .await?;
        Ok(())
    }
}
