use crate::{dispatch, settings::Settings, Result};
use chrono::{Local, NaiveDateTime, NaiveTime};
use tokio_graceful_shutdown::SubsystemHandle;

pub async fn subsystem(settings: Settings, handle: SubsystemHandle) -> Result<()> {
    let targets = settings.schedule.targets()?;
    tracing::info!(?targets, "started scheduler");
    loop {
        let now = Local::now().naive_local();
        let Some(next) = next_fire(now, &targets) else {
            // targets() rejects empty schedules at startup
            break;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!(%next, wait_secs = wait.as_secs(), "waiting for next dispatch");
        tokio::select! {
            _ = handle.on_shutdown_requested() => break,
            _ = tokio::time::sleep(wait) => {
                if let Err(err) = dispatch::daily(&settings).await {
                    tracing::error!(?err, "daily dispatch failed");
                }
            }
        }
    }
    tracing::info!("stopped scheduler");
    Ok(())
}

/// The next wall-clock fire time: the earliest of today's
/// strictly-future targets, else the earliest target tomorrow.
/// Recomputed from `now` on every cycle, so a restarted process lands
/// on the correct slot with no persisted cursor.
pub fn next_fire(now: NaiveDateTime, targets: &[NaiveTime]) -> Option<NaiveDateTime> {
    let today = now.date();
    targets
        .iter()
        .map(|target| today.and_time(*target))
        .filter(|at| *at > now)
        .min()
        .or_else(|| {
            let earliest = targets.iter().min()?;
            Some((today + chrono::Duration::days(1)).and_time(*earliest))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn on(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_time(at(hour, minute))
    }

    #[test]
    fn fires_today_when_target_is_still_ahead() {
        let next = next_fire(on(7, 3, 0), &[at(3, 30)]);
        assert_eq!(next, Some(on(7, 3, 30)));
    }

    #[test]
    fn rolls_to_tomorrow_when_target_has_passed() {
        let next = next_fire(on(7, 4, 0), &[at(3, 30)]);
        assert_eq!(next, Some(on(8, 3, 30)));
    }

    #[test]
    fn target_equal_to_now_counts_as_passed() {
        let next = next_fire(on(7, 3, 30), &[at(3, 30)]);
        assert_eq!(next, Some(on(8, 3, 30)));
    }

    #[test]
    fn picks_nearest_of_several_targets() {
        let targets = [at(15, 0), at(9, 30), at(3, 30)];
        assert_eq!(next_fire(on(7, 4, 0), &targets), Some(on(7, 9, 30)));
        // past the last slot, tomorrow's earliest wins regardless of
        // configuration order
        assert_eq!(next_fire(on(7, 16, 0), &targets), Some(on(8, 3, 30)));
    }

    #[test]
    fn duplicate_targets_are_tolerated() {
        let targets = [at(3, 30), at(3, 30)];
        assert_eq!(next_fire(on(7, 3, 0), &targets), Some(on(7, 3, 30)));
    }

    #[test]
    fn no_targets_yields_none() {
        assert_eq!(next_fire(on(7, 3, 0), &[]), None);
    }
}
