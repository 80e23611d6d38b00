use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

const BASE_URL: &str = "https://api.hh.ru";
const PAGE_SIZE: u32 = 100;
const USER_AGENT: &str = "hhsync/0.1 (hhsync@example.com)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of a paged vacancies response.
#[derive(Debug, Deserialize)]
pub struct VacancyPage {
    pub items: Vec<Value>,
    pub pages: i64,
    pub found: i64,
}

/// Source of paged vacancy listings. Implemented by [`HhClient`];
/// pagination logic is written against the trait so it can be driven
/// by a scripted source in tests.
#[async_trait]
pub trait VacancySource: Send + Sync {
    /// Fetch one zero-based page of an employer's salaried vacancies.
    /// A fetch failure yields None, logged at the point of occurrence.
    async fn vacancy_page(&self, employer_id: i64, page: i64) -> Option<VacancyPage>;
}

/// Client for the hh.ru public API: a reusable HTTP session with a fixed
/// identifying User-Agent and a bounded request timeout.
pub struct HhClient {
    http: reqwest::Client,
    base_url: String,
}

impl HhClient {
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(HhClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a single employer. Non-2xx and transport failures are logged
    /// and yield None so a batch fetch can skip a bad ID without aborting.
    pub async fn employer(&self, id: i64) -> Option<Value> {
        match self.try_employer(id).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("Failed to fetch employer {id}: {e}");
                None
            }
        }
    }

    async fn try_employer(&self, id: i64) -> Result<Value, AppError> {
        let url = format!("{}/employers/{id}", self.base_url);
        let data = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(data)
    }

    async fn try_vacancy_page(&self, employer_id: i64, page: i64) -> Result<VacancyPage, AppError> {
        let url = format!("{}/vacancies", self.base_url);
        let data = self
            .http
            .get(&url)
            .query(&[
                ("employer_id", employer_id.to_string()),
                ("page", page.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
                ("only_with_salary", "true".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(data)
    }
}

#[async_trait]
impl VacancySource for HhClient {
    async fn vacancy_page(&self, employer_id: i64, page: i64) -> Option<VacancyPage> {
        match self.try_vacancy_page(employer_id, page).await {
            Ok(page_data) => Some(page_data),
            Err(e) => {
                tracing::warn!("Failed to fetch vacancies page {page} for employer {employer_id}: {e}");
                None
            }
        }
    }
}

/// Collect every salaried vacancy of one employer, page by page from
/// page 0. Stops on an empty page, on the last page, or on a fetch
/// failure; in every case the items accumulated so far are returned,
/// so a mid-pagination failure degrades to a partial result.
pub async fn fetch_all_vacancies<S>(source: &S, employer_id: i64) -> Vec<Value>
where
    S: VacancySource + ?Sized,
{
    let mut all_items = Vec::new();
    let mut page = 0;

    loop {
        let Some(data) = source.vacancy_page(employer_id, page).await else {
            break;
        };
        if page == 0 {
            tracing::debug!("Employer {employer_id}: {} salaried vacancies listed", data.found);
        }
        if data.items.is_empty() {
            break;
        }
        all_items.extend(data.items);
        if page >= data.pages - 1 {
            break;
        }
        page += 1;
    }

    all_items
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    /// Scripted source that hands out pages in order and counts requests.
    struct ScriptedSource {
        pages: Mutex<VecDeque<Option<VacancyPage>>>,
        requests: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Option<VacancyPage>>) -> ScriptedSource {
            ScriptedSource {
                pages: Mutex::new(pages.into()),
                requests: AtomicUsize::new(0),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VacancySource for ScriptedSource {
        async fn vacancy_page(&self, _employer_id: i64, _page: i64) -> Option<VacancyPage> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.pages.lock().unwrap().pop_front().flatten()
        }
    }

    fn page(ids: &[i64], pages: i64) -> Option<VacancyPage> {
        Some(VacancyPage {
            items: ids.iter().map(|id| json!({"id": id})).collect(),
            pages,
            found: ids.len() as i64,
        })
    }

    #[tokio::test]
    async fn concatenates_all_pages_with_one_request_each() {
        let source = ScriptedSource::new(vec![
            page(&[1, 2], 3),
            page(&[3, 4], 3),
            page(&[5], 3),
        ]);

        let items = fetch_all_vacancies(&source, 1740).await;

        assert_eq!(items.len(), 5);
        assert_eq!(source.request_count(), 3);
        assert_eq!(items[4], json!({"id": 5}));
    }

    #[tokio::test]
    async fn stops_on_empty_page_before_the_last() {
        let source = ScriptedSource::new(vec![
            page(&[1], 5),
            page(&[], 5),
            page(&[2], 5),
        ]);

        let items = fetch_all_vacancies(&source, 1740).await;

        assert_eq!(items.len(), 1);
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_yields_the_partial_accumulation() {
        let source = ScriptedSource::new(vec![page(&[1, 2], 4), None, page(&[3], 4)]);

        let items = fetch_all_vacancies(&source, 1740).await;

        assert_eq!(items.len(), 2);
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn single_page_makes_a_single_request() {
        let source = ScriptedSource::new(vec![page(&[1], 1), page(&[2], 1)]);

        let items = fetch_all_vacancies(&source, 1740).await;

        assert_eq!(items.len(), 1);
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn no_vacancies_at_all_is_an_empty_list() {
        let source = ScriptedSource::new(vec![page(&[], 0)]);

        assert!(fetch_all_vacancies(&source, 1740).await.is_empty());
    }
}
