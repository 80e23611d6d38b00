use sqlx::PgPool;

use crate::hh::{HhClient, fetch_employer_batch, fetch_vacancy_batch};
use crate::models::{Employer, Vacancy};

#[derive(Debug, Default)]
pub struct LoadStats {
    pub employers: usize,
    pub vacancies: usize,
    pub failed: usize,
}

/// Fetch the whole batch from hh.ru and land it in the database.
pub async fn run(pool: &PgPool, client: &HhClient, employer_ids: &[i64]) -> LoadStats {
    let employer_map = fetch_employer_batch(client, employer_ids).await;
    let vacancy_map = fetch_vacancy_batch(client, employer_ids).await;

    // Flatten in input order so upserts stay deterministic.
    let mut employers = Vec::new();
    let mut vacancies = Vec::new();
    for id in employer_ids {
        if let Some(employer) = employer_map.get(id) {
            employers.push(employer.clone());
        }
        if let Some(list) = vacancy_map.get(id) {
            vacancies.extend(list.iter().cloned());
        }
    }

    tracing::info!(
        "Fetched {} employers and {} vacancies",
        employers.len(),
        vacancies.len()
    );
    load_batch(pool, &employers, &vacancies).await
}

/// Upsert every employer before any dependent vacancy, preserving list
/// order within each phase. Each upsert is a single statement that
/// commits on its own, so a failing row is logged and skipped without
/// touching its neighbours.
pub async fn load_batch(pool: &PgPool, employers: &[Employer], vacancies: &[Vacancy]) -> LoadStats {
    let mut stats = LoadStats::default();

    for employer in employers {
        match employer.upsert(pool).await {
            Ok(()) => stats.employers += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::warn!("Failed to upsert employer {}: {e}", employer.id);
            }
        }
    }

    for vacancy in vacancies {
        match vacancy.upsert(pool).await {
            Ok(()) => stats.vacancies += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::warn!("Failed to upsert vacancy {}: {e}", vacancy.id);
            }
        }
    }

    stats
}
