use std::io::{self, Write};

use sqlx::PgPool;

use crate::queries::{self, VacancyListing};

/// Interactive query menu over the loaded data. Each selection runs one
/// read query; connections come from the pool for that query only.
pub async fn run(pool: &PgPool) -> anyhow::Result<()> {
    loop {
        print_menu();
        let choice = prompt("Select an option: ")?;

        match choice.as_str() {
            "1" => {
                for row in queries::company_vacancy_counts(pool).await? {
                    println!("{}: {} vacancies", row.company, row.vacancy_count);
                }
            }
            "2" => print_listings(&queries::all_vacancies(pool).await?),
            "3" => match queries::average_salary(pool).await? {
                Some(average) => println!("Average salary: {average:.2}"),
                None => println!("No salary data loaded yet"),
            },
            "4" => print_listings(&queries::vacancies_above_average(pool).await?),
            "5" => {
                let keyword = prompt("Keyword: ")?;
                if keyword.is_empty() {
                    println!("Keyword must not be empty");
                    continue;
                }
                print_listings(&queries::vacancies_matching_keyword(pool, &keyword).await?);
            }
            "0" => break,
            _ => println!("Unknown option, try again"),
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("==============================");
    println!("  hh.ru vacancy database");
    println!("==============================");
    println!("1. Companies and vacancy counts");
    println!("2. All vacancies");
    println!("3. Average salary");
    println!("4. Vacancies above average salary");
    println!("5. Search vacancies by keyword");
    println!("0. Exit");
}

fn print_listings(rows: &[VacancyListing]) {
    if rows.is_empty() {
        println!("Nothing found");
        return;
    }
    for row in rows {
        let salary = if row.salary.is_empty() {
            "not specified"
        } else {
            &row.salary
        };
        println!("{} | {} | {} | {}", row.company, row.vacancy, salary, row.url);
    }
    println!("{} rows", rows.len());
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
