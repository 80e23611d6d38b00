use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct CompanyVacancyCount {
    pub company: String,
    pub vacancy_count: i64,
}

/// Presentation-ready listing row shared by the listing queries.
#[derive(Debug, PartialEq, Eq)]
pub struct VacancyListing {
    pub company: String,
    pub vacancy: String,
    pub salary: String,
    pub url: String,
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    company: String,
    vacancy: String,
    salary_from: Option<i32>,
    salary_to: Option<i32>,
    currency: Option<String>,
    url: Option<String>,
}

impl From<ListingRow> for VacancyListing {
    fn from(row: ListingRow) -> VacancyListing {
        VacancyListing {
            salary: format_salary(row.salary_from, row.salary_to, row.currency.as_deref()),
            company: row.company,
            vacancy: row.vacancy,
            url: row.url.unwrap_or_default(),
        }
    }
}

/// Every company with its vacancy count, busiest first. Employers with
/// no vacancies still appear, with a count of zero.
pub async fn company_vacancy_counts(pool: &PgPool) -> Result<Vec<CompanyVacancyCount>, AppError> {
    let counts = sqlx::query_as::<_, CompanyVacancyCount>(
        "SELECT e.name AS company, COUNT(v.id) AS vacancy_count
         FROM employers e
         LEFT JOIN vacancies v ON e.id = v.employer_id
         GROUP BY e.id, e.name
         ORDER BY vacancy_count DESC, company",
    )
    .fetch_all(pool)
    .await?;
    Ok(counts)
}

pub async fn all_vacancies(pool: &PgPool) -> Result<Vec<VacancyListing>, AppError> {
    let rows = sqlx::query_as::<_, ListingRow>(
        "SELECT e.name AS company, v.name AS vacancy,
                v.salary_from, v.salary_to, v.currency,
                v.alternate_url AS url
         FROM vacancies v
         JOIN employers e ON v.employer_id = e.id
         ORDER BY e.name, v.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Average midpoint salary over vacancies carrying at least one bound.
/// None when no vacancy has salary data, which is distinct from an
/// actual average of zero.
pub async fn average_salary(pool: &PgPool) -> Result<Option<f64>, AppError> {
    let average = sqlx::query_scalar(
        "SELECT CAST(AVG((COALESCE(salary_from, 0) + COALESCE(salary_to, 0)) / 2)
                AS DOUBLE PRECISION)
         FROM vacancies
         WHERE salary_from IS NOT NULL OR salary_to IS NOT NULL",
    )
    .fetch_one(pool)
    .await?;
    Ok(average)
}

/// Vacancies whose midpoint salary exceeds the current average, highest
/// first. Empty when there is no salary data to average.
pub async fn vacancies_above_average(pool: &PgPool) -> Result<Vec<VacancyListing>, AppError> {
    let Some(average) = average_salary(pool).await? else {
        return Ok(Vec::new());
    };

    let rows = sqlx::query_as::<_, ListingRow>(
        "SELECT e.name AS company, v.name AS vacancy,
                v.salary_from, v.salary_to, v.currency,
                v.alternate_url AS url
         FROM vacancies v
         JOIN employers e ON v.employer_id = e.id
         WHERE (COALESCE(v.salary_from, 0) + COALESCE(v.salary_to, 0)) / 2 > $1
         ORDER BY (COALESCE(v.salary_from, 0) + COALESCE(v.salary_to, 0)) / 2 DESC",
    )
    .bind(average)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Case-insensitive substring match on the vacancy title only.
pub async fn vacancies_matching_keyword(
    pool: &PgPool,
    keyword: &str,
) -> Result<Vec<VacancyListing>, AppError> {
    let rows = sqlx::query_as::<_, ListingRow>(
        "SELECT e.name AS company, v.name AS vacancy,
                v.salary_from, v.salary_to, v.currency,
                v.alternate_url AS url
         FROM vacancies v
         JOIN employers e ON v.employer_id = e.id
         WHERE LOWER(v.name) LIKE $1
         ORDER BY e.name, v.name",
    )
    .bind(format!("%{}%", keyword.to_lowercase()))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Salary text rule shared by the listing queries. The от/до wording
/// follows the hh.ru convention for open-ended ranges; no bounds at all
/// renders as an empty string for the caller to substitute a label.
pub fn format_salary(from: Option<i32>, to: Option<i32>, currency: Option<&str>) -> String {
    let currency = currency.unwrap_or_default();
    let text = match (from, to) {
        (Some(from), Some(to)) => format!("{from} - {to} {currency}"),
        (Some(from), None) => format!("от {from} {currency}"),
        (None, Some(to)) => format!("до {to} {currency}"),
        (None, None) => String::new(),
    };
    text.trim_end().to_string()
}
