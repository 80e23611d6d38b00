use std::collections::HashMap;

use crate::hh::client::{HhClient, fetch_all_vacancies};
use crate::models::{Employer, Vacancy};

/// Fetch and map employers one at a time, in input order. IDs whose
/// fetch or mapping fails are simply absent from the result.
pub async fn fetch_employer_batch(client: &HhClient, ids: &[i64]) -> HashMap<i64, Employer> {
    let mut employers = HashMap::new();
    for &id in ids {
        let Some(data) = client.employer(id).await else {
            continue;
        };
        match Employer::from_json(&data) {
            Ok(employer) => {
                employers.insert(id, employer);
            }
            Err(e) => tracing::warn!("Skipping employer {id}: {e}"),
        }
    }
    employers
}

/// Fetch every salaried vacancy for each employer, sequentially. An ID
/// with no vacancies maps to an empty list, not an absent key; malformed
/// items are skipped with a warning while the rest of the page survives.
pub async fn fetch_vacancy_batch(client: &HhClient, ids: &[i64]) -> HashMap<i64, Vec<Vacancy>> {
    let mut vacancies = HashMap::new();
    for &id in ids {
        let items = fetch_all_vacancies(client, id).await;
        let mut mapped = Vec::with_capacity(items.len());
        for item in &items {
            match Vacancy::from_json(item) {
                Ok(vacancy) => mapped.push(vacancy),
                Err(e) => tracing::warn!("Skipping vacancy for employer {id}: {e}"),
            }
        }
        tracing::info!("Fetched {} vacancies for employer {id}", mapped.len());
        vacancies.insert(id, mapped);
    }
    vacancies
}
