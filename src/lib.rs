pub type Result<T = ()> = anyhow::Result<T>;
pub type Error = anyhow::Error;
pub use anyhow::Context;

pub mod cron;
pub mod dispatch;
pub mod listener;
pub mod server;
pub mod settings;

pub mod birthday;
pub mod report;
pub mod topk;
pub mod vacation;
