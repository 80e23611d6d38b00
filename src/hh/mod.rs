pub mod batch;
pub mod client;

pub use batch::{fetch_employer_batch, fetch_vacancy_batch};
pub use client::{HhClient, VacancyPage, VacancySource, fetch_all_vacancies};
