use crate::{
    birthday::{Birthday, TableCategory},
    report::{self, TableRow},
    settings::Settings,
    topk,
    vacation::{self, Phase},
    Result,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::Serialize;
use telegram::messages::{self, ParseMode};

/// One scheduled slot: the full report chain to the primary chat. A
/// failed report is logged and the chain moves on, so one broken view
/// never silences the others.
pub async fn daily(settings: &Settings) -> Result<()> {
    let client = settings.telegram.client()?;
    let chat = settings.telegram.chat;
    if let Err(err) = birthday_table(settings, &client, chat).await {
        tracing::error!(?err, "birthday table dispatch failed");
    }
    if let Err(err) = next_birthdays(settings, &client, chat).await {
        tracing::error!(?err, "upcoming birthdays dispatch failed");
    }
    if let Err(err) = vacations(settings, &client, chat).await {
        tracing::error!(?err, "vacations dispatch failed");
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct BirthdayTableEntry {
    pub category: TableCategory,
    pub full_name: String,
    pub birthday: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingEntry {
    pub full_name: String,
    pub birthday: String,
    pub days_until: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VacationEntry {
    pub phase: Phase,
    pub full_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
}

#[tracing::instrument(skip_all)]
pub async fn birthday_table(
    settings: &Settings,
    client: &telegram::Client,
    chat: i64,
) -> Result<()> {
    let today = Local::now().date_naive();
    let (employees, last_sync) = fetch_birthdays(settings).await;
    let entries = categorize_employees(&employees, today);
    tracing::info!(count = entries.len(), "categorized birthdays");

    let body = if entries.is_empty() {
        "No upcoming birthdays.".to_string()
    } else {
        let rows = entries
            .iter()
            .map(|entry| TableRow {
                category: entry.category.title().to_string(),
                name: entry.full_name.clone(),
                date: entry.birthday.clone(),
            })
            .collect_vec();
        let table = report::table(&rows, settings.report.name_width);
        format!("<pre>{}</pre>", report::escape_html(&table))
    };
    let text = format!(
        "🎂 Birthdays\n\n{body}\n\n📊 Data as of: {}",
        report::format_sync(last_sync)
    );
    messages::send(client, chat, &text, Some(ParseMode::Html)).await?;
    tracing::info!(chat, "sent birthday table");
    Ok(())
}

#[tracing::instrument(skip_all)]
pub async fn next_birthdays(
    settings: &Settings,
    client: &telegram::Client,
    chat: i64,
) -> Result<()> {
    let today = Local::now().date_naive();
    let (employees, last_sync) = fetch_birthdays(settings).await;
    let entries = upcoming_birthdays(&employees, today, settings.report.top_k);
    tracing::info!(count = entries.len(), "selected upcoming birthdays");

    let labeled = entries
        .iter()
        .map(|entry| {
            let bucket = match entry.days_until {
                0 => UpcomingBucket::Today,
                1 => UpcomingBucket::Tomorrow,
                _ => UpcomingBucket::Soon,
            };
            let line = match bucket {
                UpcomingBucket::Soon => format!(
                    "{} ({}) - in {} days",
                    entry.full_name, entry.birthday, entry.days_until
                ),
                _ => format!("{} ({})", entry.full_name, entry.birthday),
            };
            (bucket, line)
        })
        .collect_vec();
    let sections = report::sections(
        &labeled,
        &[
            (UpcomingBucket::Today, "🎉 Today"),
            (UpcomingBucket::Tomorrow, "🎈 Tomorrow"),
            (UpcomingBucket::Soon, "📅 Coming up"),
        ],
    );
    let text = report::render(
        &format!("🎂 Next {} birthdays", settings.report.top_k),
        &sections,
        "No upcoming birthday data.",
        last_sync,
    );
    messages::send(client, chat, &text, None).await?;
    tracing::info!(chat, "sent upcoming birthdays");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpcomingBucket {
    Today,
    Tomorrow,
    Soon,
}

#[tracing::instrument(skip_all)]
pub async fn vacations(settings: &Settings, client: &telegram::Client, chat: i64) -> Result<()> {
    let today = Local::now().date_naive();
    let (vacations, last_sync) = fetch_vacations(settings, today).await;
    let entries = bucket_vacations(&vacations, today, &settings.report);
    tracing::info!(count = entries.len(), "bucketed vacations");

    let labeled = entries
        .iter()
        .map(|entry| {
            let name = report::compact_name(&entry.full_name);
            let line = match entry.phase {
                Phase::Current => format!(
                    "{name} (until {}, {} days left)",
                    entry.end_date.format("%d.%m"),
                    entry.days
                ),
                _ => format!(
                    "{name} (from {}, in {} days)",
                    entry.start_date.format("%d.%m"),
                    entry.days
                ),
            };
            (entry.phase, line)
        })
        .collect_vec();
    let sections = report::sections(
        &labeled,
        &[
            (Phase::Current, "🌴 On vacation"),
            (Phase::StartingSoon, "🧳 Starting soon"),
            (Phase::Upcoming, "📅 Upcoming"),
        ],
    );
    let text = report::render("🌴 Vacations", &sections, "No vacation data.", last_sync);
    messages::send(client, chat, &text, None).await?;
    tracing::info!(chat, "sent vacations");
    Ok(())
}

/// Table-view data for the JSON CLI; fetch failures propagate here
/// instead of degrading to an empty report
pub async fn birthday_table_data(settings: &Settings) -> Result<Vec<BirthdayTableEntry>> {
    let today = Local::now().date_naive();
    let (employees, _) = try_fetch_birthdays(settings).await?;
    Ok(categorize_employees(&employees, today))
}

pub async fn next_birthdays_data(settings: &Settings, k: usize) -> Result<Vec<UpcomingEntry>> {
    let today = Local::now().date_naive();
    let (employees, _) = try_fetch_birthdays(settings).await?;
    Ok(upcoming_birthdays(&employees, today, k))
}

pub async fn vacations_data(settings: &Settings) -> Result<Vec<VacationEntry>> {
    let today = Local::now().date_naive();
    let (vacations, _) = try_fetch_vacations(settings, today).await?;
    Ok(bucket_vacations(&vacations, today, &settings.report))
}

/// Fetch boundary: a failed query degrades to an empty record set so
/// the report renders an explicit no-data body instead of going silent
async fn fetch_birthdays(settings: &Settings) -> (Vec<edb::Employee>, Option<NaiveDateTime>) {
    match try_fetch_birthdays(settings).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(?err, "fetching birthday records failed");
            (Vec::new(), None)
        }
    }
}

async fn try_fetch_birthdays(
    settings: &Settings,
) -> Result<(Vec<edb::Employee>, Option<NaiveDateTime>)> {
    let db = settings.db.connect().await?;
    let employees = edb::employees::birthdays(
        &db,
        &settings.report.departments,
        settings.report.all_employees,
    )
    .await?;
    let last_sync = edb::employees::last_sync(&db).await.unwrap_or_else(|err| {
        tracing::error!(?err, "fetching sync timestamp failed");
        None
    });
    tracing::info!(count = employees.len(), "fetched birthday records");
    Ok((employees, last_sync))
}

async fn fetch_vacations(
    settings: &Settings,
    today: NaiveDate,
) -> (Vec<edb::Vacation>, Option<NaiveDateTime>) {
    match try_fetch_vacations(settings, today).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(?err, "fetching vacation records failed");
            (Vec::new(), None)
        }
    }
}

async fn try_fetch_vacations(
    settings: &Settings,
    today: NaiveDate,
) -> Result<(Vec<edb::Vacation>, Option<NaiveDateTime>)> {
    let db = settings.db.connect().await?;
    let vacations =
        edb::vacations::upcoming(&db, today, settings.report.vacation_window_days).await?;
    let last_sync = edb::employees::last_sync(&db).await.unwrap_or_else(|err| {
        tracing::error!(?err, "fetching sync timestamp failed");
        None
    });
    tracing::info!(count = vacations.len(), "fetched vacation records");
    Ok((vacations, last_sync))
}

fn parse_birthday<'a>(employee: &'a edb::Employee) -> Option<(Birthday, &'a str)> {
    let raw = employee.birthday.as_deref()?;
    match Birthday::parse(raw) {
        Ok(birthday) => Some((birthday, raw)),
        Err(err) => {
            tracing::warn!(%err, full_name = %employee.full_name, "skipping malformed birthday");
            None
        }
    }
}

/// Categorized table-view entries in category order. Inactive rows and
/// malformed or impossible dates are skipped, never fatal.
pub fn categorize_employees(
    employees: &[edb::Employee],
    today: NaiveDate,
) -> Vec<BirthdayTableEntry> {
    employees
        .iter()
        .filter(|employee| employee.status)
        .filter_map(|employee| {
            let (birthday, raw) = parse_birthday(employee)?;
            let category = birthday.categorize(today)?;
            Some(BirthdayTableEntry {
                category,
                full_name: employee.full_name.clone(),
                birthday: raw.to_string(),
            })
        })
        .sorted_by_key(|entry| entry.category)
        .collect_vec()
}

/// The tie-inclusive top-k nearest birthdays
pub fn upcoming_birthdays(
    employees: &[edb::Employee],
    today: NaiveDate,
    k: usize,
) -> Vec<UpcomingEntry> {
    let items = employees
        .iter()
        .filter(|employee| employee.status)
        .filter_map(|employee| {
            let (birthday, raw) = parse_birthday(employee)?;
            let days_until = birthday.days_until(today)?;
            Some((
                UpcomingEntry {
                    full_name: employee.full_name.clone(),
                    birthday: raw.to_string(),
                    days_until,
                },
                days_until,
            ))
        })
        .collect_vec();
    topk::select_top_k(items, k)
        .into_iter()
        .map(|(entry, _)| entry)
        .collect_vec()
}

/// Phase-bucketed vacation entries in phase order
pub fn bucket_vacations(
    vacations: &[edb::Vacation],
    today: NaiveDate,
    report: &crate::settings::ReportSettings,
) -> Vec<VacationEntry> {
    vacations
        .iter()
        .filter_map(|entry| {
            let (phase, days) = vacation::phase(
                entry.start_date,
                entry.end_date,
                today,
                report.vacation_soon_days,
                report.vacation_window_days,
            )?;
            Some(VacationEntry {
                phase,
                full_name: entry.full_name.clone(),
                start_date: entry.start_date,
                end_date: entry.end_date,
                days,
            })
        })
        .sorted_by_key(|entry| entry.phase)
        .collect_vec()
}
