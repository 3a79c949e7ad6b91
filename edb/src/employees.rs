use crate::Result;
use sqlx::{postgres::PgExecutor, Postgres};

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Employee {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    pub department: String,
    pub status: bool,
}

/// One row per employee from the most recent sync snapshot. Rows with
/// no birthday on file are not useful to any reminder view and are
/// filtered here rather than downstream.
pub const FETCH_BIRTHDAYS_QUERY: &str = r#"
    SELECT DISTINCT ON (full_name)
        full_name,
        birthday,
        department,
        status
    FROM
        employees
    WHERE
        status IS TRUE
        AND synced_at = (SELECT max(synced_at) FROM employees)
        AND birthday IS NOT NULL
"#;

fn fetch_birthdays_query<'builder>() -> sqlx::QueryBuilder<'builder, Postgres> {
    sqlx::QueryBuilder::new(FETCH_BIRTHDAYS_QUERY)
}

pub async fn birthdays<'c, E>(
    exec: E,
    departments: &[String],
    all_employees: bool,
) -> Result<Vec<Employee>>
where
    E: PgExecutor<'c>,
{
    let mut builder = fetch_birthdays_query();
    if !all_employees && !departments.is_empty() {
        builder
            .push(" AND department ILIKE ANY(")
            .push_bind(departments.to_vec())
            .push(") ");
    }
    let employees = builder
        .push(" ORDER BY full_name ")
        .build_query_as::<Employee>()
        .fetch_all(exec)
        .await?;
    Ok(employees)
}

/// Timestamp of the most recent sync snapshot, reported to recipients
/// as data freshness
pub async fn last_sync<'c, E>(exec: E) -> Result<Option<chrono::NaiveDateTime>>
where
    E: PgExecutor<'c>,
{
    let row: (Option<chrono::NaiveDateTime>,) =
        sqlx::query_as("SELECT max(synced_at) FROM employees")
            .fetch_one(exec)
            .await?;
    Ok(row.0)
}
