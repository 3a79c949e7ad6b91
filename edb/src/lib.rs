mod error;
pub use error::{Error, Result};

pub mod employees;
pub mod vacations;

pub use employees::Employee;
pub use vacations::Vacation;

use sqlx::PgPool;

pub async fn connect(url: &str) -> Result<PgPool> {
    let pool = PgPool::connect(url).await?;
    Ok(pool)
}
