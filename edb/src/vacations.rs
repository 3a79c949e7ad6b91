use crate::Result;
use chrono::NaiveDate;
use sqlx::{postgres::PgExecutor, Postgres};

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Vacation {
    pub full_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub const FETCH_VACATIONS_QUERY: &str = r#"
    SELECT
        full_name,
        start_date,
        end_date
    FROM
        vacations
    WHERE
        end_date >= start_date
"#;

fn fetch_vacations_query<'builder>() -> sqlx::QueryBuilder<'builder, Postgres> {
    sqlx::QueryBuilder::new(FETCH_VACATIONS_QUERY)
}

/// Vacations still relevant on `today`: not yet finished and starting
/// within `window_days`. Phase classification happens downstream.
pub async fn upcoming<'c, E>(exec: E, today: NaiveDate, window_days: i64) -> Result<Vec<Vacation>>
where
    E: PgExecutor<'c>,
{
    let horizon = today + chrono::Duration::days(window_days);
    let vacations = fetch_vacations_query()
        .push(" AND end_date >= ")
        .push_bind(today)
        .push(" AND start_date <= ")
        .push_bind(horizon)
        .push(" ORDER BY start_date, full_name ")
        .build_query_as::<Vacation>()
        .fetch_all(exec)
        .await?;
    Ok(vacations)
}
