use crate::{Context, Result};
use anyhow::bail;
use chrono::NaiveTime;
use config::{Config, Environment, File};
use serde::Deserialize;
use sqlx::PgPool;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_log")]
    pub log: String,
    pub db: DatabaseSettings,
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

impl Settings {
    /// Settings are loaded from the optional file at the given path,
    /// with REMIND__ prefixed environment variables layered on top
    pub fn new(path: &Path) -> Result<Self> {
        Ok(Config::builder()
            .add_source(File::with_name(path.to_str().expect("file name")).required(false))
            .add_source(
                Environment::with_prefix("REMIND")
                    .separator("_")
                    .prefix_separator("__"),
            )
            .build()
            .and_then(|config| config.try_deserialize())?)
    }
}

fn default_log() -> String {
    "remind_server=info,remind_edb=info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

impl DatabaseSettings {
    pub async fn connect(&self) -> Result<PgPool> {
        edb::connect(&self.url).await.context("opening database")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramSettings {
    pub token: String,
    /// Admin user (and private chat) id the gated commands compare
    /// the sender against
    pub admin_chat: i64,
    /// Primary chat the scheduled reports are delivered to
    pub chat: i64,
}

impl TelegramSettings {
    pub fn client(&self) -> Result<telegram::Client> {
        Ok(telegram::client::from_bot_token(&self.token)?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleSettings {
    /// Daily wall-clock fire times, "HH:MM"
    #[serde(default = "default_times")]
    pub times: Vec<String>,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            times: default_times(),
        }
    }
}

fn default_times() -> Vec<String> {
    vec!["03:30".to_string()]
}

impl ScheduleSettings {
    /// Parsed fire targets. An empty or malformed list is a startup
    /// error, not something to limp along with.
    pub fn targets(&self) -> Result<Vec<NaiveTime>> {
        if self.times.is_empty() {
            bail!("no schedule times configured");
        }
        self.times
            .iter()
            .map(|time| {
                NaiveTime::parse_from_str(time, "%H:%M")
                    .context(format!("invalid schedule time {time:?}"))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    /// Skip the department filter entirely
    #[serde(default)]
    pub all_employees: bool,
    /// Department ILIKE patterns applied when all_employees is off
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default = "default_name_width")]
    pub name_width: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_vacation_soon_days")]
    pub vacation_soon_days: i64,
    #[serde(default = "default_vacation_window_days")]
    pub vacation_window_days: i64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            all_employees: false,
            departments: Vec::new(),
            name_width: default_name_width(),
            top_k: default_top_k(),
            vacation_soon_days: default_vacation_soon_days(),
            vacation_window_days: default_vacation_window_days(),
        }
    }
}

fn default_name_width() -> usize {
    50
}

fn default_top_k() -> usize {
    5
}

fn default_vacation_soon_days() -> i64 {
    3
}

fn default_vacation_window_days() -> i64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_schedule_targets() {
        let schedule = ScheduleSettings {
            times: vec!["03:30".to_string(), "15:00".to_string()],
        };
        let targets = schedule.targets().expect("targets");
        assert_eq!(
            targets,
            vec![
                NaiveTime::from_hms_opt(3, 30, 0).unwrap(),
                NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn rejects_empty_and_malformed_schedules() {
        assert!(ScheduleSettings { times: vec![] }.targets().is_err());
        assert!(ScheduleSettings {
            times: vec!["25:00".to_string()]
        }
        .targets()
        .is_err());
    }
}
