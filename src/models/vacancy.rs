use serde_json::Value;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{nested_name, opt_str, require_id, require_str, str_or_empty};

/// Salary bounds as listed on the vacancy; either bound may be absent.
/// Flattened into the vacancies table, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Salary {
    pub from: Option<i32>,
    pub to: Option<i32>,
    pub currency: Option<String>,
    pub gross: Option<bool>,
}

impl Salary {
    pub fn from_json(data: &Value) -> Salary {
        Salary {
            from: data.get("from").and_then(Value::as_i64).map(|v| v as i32),
            to: data.get("to").and_then(Value::as_i64).map(|v| v as i32),
            currency: opt_str(data, "currency"),
            gross: data.get("gross").and_then(Value::as_bool),
        }
    }

    /// Midpoint of the listed bounds; a single bound is its own average,
    /// no bounds means no average (never zero).
    pub fn average(&self) -> Option<f64> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((f64::from(from) + f64::from(to)) / 2.0),
            (Some(from), None) => Some(f64::from(from)),
            (None, Some(to)) => Some(f64::from(to)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vacancy {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub alternate_url: String,
    pub employer_id: i64,
    pub salary: Option<Salary>,
    pub description: Option<String>,
    pub experience: Option<String>,
    pub employment: Option<String>,
}

impl Vacancy {
    /// Map a vacancies API item into a typed record. `id`, `name` and the
    /// nested `employer.id` are required; `experience`/`employment` are
    /// unwrapped from their `{name}` wrappers.
    pub fn from_json(data: &Value) -> Result<Vacancy, AppError> {
        let salary = data
            .get("salary")
            .filter(|v| !v.is_null())
            .map(Salary::from_json);

        Ok(Vacancy {
            id: require_id(data.get("id"), "vacancy", "id")?,
            name: require_str(data, "vacancy", "name")?,
            url: str_or_empty(data, "url"),
            alternate_url: str_or_empty(data, "alternate_url"),
            employer_id: require_id(
                data.get("employer").and_then(|e| e.get("id")),
                "vacancy",
                "employer.id",
            )?,
            salary,
            description: opt_str(data, "description"),
            experience: nested_name(data, "experience"),
            employment: nested_name(data, "employment"),
        })
    }

    /// Insert the vacancy, overwriting every mutable column on conflict.
    /// An absent salary writes NULL into all four salary columns, so a
    /// vacancy that lost its salary on re-fetch is cleared, not left stale.
    pub async fn upsert(&self, pool: &PgPool) -> Result<(), AppError> {
        let salary = self.salary.as_ref();
        sqlx::query(
            "INSERT INTO vacancies (
                 id, name, url, alternate_url, employer_id,
                 salary_from, salary_to, currency, salary_gross,
                 description, experience, employment
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             ON CONFLICT (id) DO UPDATE SET
                 name = EXCLUDED.name,
                 url = EXCLUDED.url,
                 alternate_url = EXCLUDED.alternate_url,
                 employer_id = EXCLUDED.employer_id,
                 salary_from = EXCLUDED.salary_from,
                 salary_to = EXCLUDED.salary_to,
                 currency = EXCLUDED.currency,
                 salary_gross = EXCLUDED.salary_gross,
                 description = EXCLUDED.description,
                 experience = EXCLUDED.experience,
                 employment = EXCLUDED.employment",
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.url)
        .bind(&self.alternate_url)
        .bind(self.employer_id)
        .bind(salary.and_then(|s| s.from))
        .bind(salary.and_then(|s| s.to))
        .bind(salary.and_then(|s| s.currency.as_deref()))
        .bind(salary.and_then(|s| s.gross))
        .bind(&self.description)
        .bind(&self.experience)
        .bind(&self.employment)
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_payload() -> Value {
        json!({
            "id": "93353083",
            "name": "Python Developer",
            "url": "https://api.hh.ru/vacancies/93353083",
            "alternate_url": "https://hh.ru/vacancy/93353083",
            "employer": {"id": "1740", "name": "Яндекс"},
            "salary": {"from": 100000, "to": 150000, "currency": "RUR", "gross": false},
            "description": "Backend role",
            "experience": {"id": "between1And3", "name": "От 1 года до 3 лет"},
            "employment": {"id": "full", "name": "Полная занятость"}
        })
    }

    #[test]
    fn maps_full_payload() {
        let vacancy = Vacancy::from_json(&full_payload()).unwrap();

        assert_eq!(vacancy.id, 93353083);
        assert_eq!(vacancy.employer_id, 1740);
        assert_eq!(
            vacancy.salary,
            Some(Salary {
                from: Some(100000),
                to: Some(150000),
                currency: Some("RUR".to_string()),
                gross: Some(false),
            })
        );
        assert_eq!(vacancy.experience.as_deref(), Some("От 1 года до 3 лет"));
        assert_eq!(vacancy.employment.as_deref(), Some("Полная занятость"));
    }

    #[test]
    fn absent_optionals_default() {
        let data = json!({
            "id": 1,
            "name": "Rust Developer",
            "employer": {"id": 2}
        });

        let vacancy = Vacancy::from_json(&data).unwrap();
        assert_eq!(vacancy.url, "");
        assert_eq!(vacancy.salary, None);
        assert_eq!(vacancy.experience, None);
        assert_eq!(vacancy.employment, None);
    }

    #[test]
    fn null_salary_maps_to_none() {
        let data = json!({
            "id": 1,
            "name": "Rust Developer",
            "employer": {"id": 2},
            "salary": null
        });

        assert_eq!(Vacancy::from_json(&data).unwrap().salary, None);
    }

    #[test]
    fn missing_employer_id_is_an_error() {
        let data = json!({"id": 1, "name": "Rust Developer"});

        let err = Vacancy::from_json(&data).unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingField { entity: "vacancy", field: "employer.id" }
        ));
    }

    #[test]
    fn salary_subfields_default_independently() {
        let salary = Salary::from_json(&json!({"to": 200000}));

        assert_eq!(salary.from, None);
        assert_eq!(salary.to, Some(200000));
        assert_eq!(salary.currency, None);
        assert_eq!(salary.gross, None);
    }

    #[test]
    fn average_of_both_bounds_is_the_midpoint() {
        let salary = Salary {
            from: Some(100000),
            to: Some(150000),
            ..Salary::default()
        };
        assert_eq!(salary.average(), Some(125000.0));
    }

    #[test]
    fn average_of_a_single_bound_is_that_bound() {
        let from_only = Salary { from: Some(100000), ..Salary::default() };
        let to_only = Salary { to: Some(200000), ..Salary::default() };

        assert_eq!(from_only.average(), Some(100000.0));
        assert_eq!(to_only.average(), Some(200000.0));
    }

    #[test]
    fn average_without_bounds_is_none() {
        assert_eq!(Salary::default().average(), None);
    }
}
