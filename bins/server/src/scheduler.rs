//! Background job scheduling.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use covenant_api::AppState;
use covenant_core::cleanup::ReceiptCleanup;
use covenant_core::notification::MedicationReminder;
use covenant_shared::config::ScheduleConfig;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::{error, info};

/// Spawns the medication check loop and, when storage is configured, the
/// daily receipt cleanup.
pub fn spawn(state: &AppState, schedule: &ScheduleConfig, timezone: Tz) {
    let every = Duration::from_secs(schedule.medication_interval_secs.max(1));
    tokio::spawn(medication_loop(state.reminder.clone(), every));
    info!(interval_secs = every.as_secs(), "Medication check scheduled");

    if let Some(cleanup) = &state.cleanup {
        tokio::spawn(cleanup_loop(cleanup.clone(), schedule.cleanup_hour, timezone));
        info!(hour = schedule.cleanup_hour, timezone = %timezone, "Receipt cleanup scheduled");
    }
}

async fn medication_loop(reminder: Arc<MedicationReminder>, every: Duration) {
    let now = Utc::now();
    let delay = (next_boundary(now, every) - now).to_std().unwrap_or_default();
    let mut ticker = interval_at(Instant::now() + delay, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if let Err(e) = reminder.run(Utc::now()).await {
            error!(error = %e, "Medication check failed");
        }
    }
}

async fn cleanup_loop(cleanup: Arc<ReceiptCleanup>, hour: u32, timezone: Tz) {
    loop {
        let now = Utc::now();
        let Some(next) = next_daily_run(now, hour, timezone) else {
            error!(hour, "Invalid cleanup hour, receipt cleanup stopped");
            return;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        sleep(wait).await;

        if let Err(e) = cleanup.run(Utc::now()).await {
            error!(error = %e, "Receipt cleanup failed");
        }
    }
}

/// The first instant at or after `now` that is a whole multiple of `every`
/// since the Unix epoch, so a 10 minute period ticks at `:00`, `:10`, ...
pub fn next_boundary(now: DateTime<Utc>, every: Duration) -> DateTime<Utc> {
    let period = i64::try_from(every.as_secs()).unwrap_or(i64::MAX).max(1);
    let secs = now.timestamp();
    let rem = secs.rem_euclid(period);
    if rem == 0 && now.timestamp_subsec_nanos() == 0 {
        return now;
    }
    secs.checked_sub(rem)
        .and_then(|start| start.checked_add(period))
        .and_then(|next| DateTime::from_timestamp(next, 0))
        .unwrap_or(now)
}

/// The first instant after `now` at which the local clock in `timezone`
/// reads `hour:00`. Days where that time does not exist are skipped.
pub fn next_daily_run(now: DateTime<Utc>, hour: u32, timezone: Tz) -> Option<DateTime<Utc>> {
    let today = now.with_timezone(&timezone).date_naive();

    (0..3)
        .filter_map(|offset| today.checked_add_days(chrono::Days::new(offset)))
        .filter_map(|date| local_instant(date, hour, timezone))
        .find(|candidate| *candidate > now)
}

fn local_instant(date: NaiveDate, hour: u32, timezone: Tz) -> Option<DateTime<Utc>> {
    let local = date.and_hms_opt(hour, 0, 0)?;
    timezone
        .from_local_datetime(&local)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Sao_Paulo;
    use covenant_core::notification::MedicatedRegistration;
    use covenant_core::testing::{RecordingPushSender, StaticRegistrationDirectory};

    const TEN_MINUTES: Duration = Duration::from_secs(600);

    #[test]
    fn test_next_run_later_today() {
        // 02:00 in São Paulo
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 5, 0, 0).unwrap();

        let next = next_daily_run(now, 3, Sao_Paulo).unwrap();

        assert_eq!(next, Utc.with_ymd_and_hms(2026, 10, 18, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_next_run_tomorrow_when_hour_passed() {
        // 10:00 in São Paulo
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 13, 0, 0).unwrap();

        let next = next_daily_run(now, 0, Sao_Paulo).unwrap();

        assert_eq!(next, Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_exact_hour_schedules_next_day() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap();

        let next = next_daily_run(now, 0, Sao_Paulo).unwrap();

        assert_eq!(next, Utc.with_ymd_and_hms(2026, 10, 20, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_hour() {
        assert!(next_daily_run(Utc::now(), 24, Sao_Paulo).is_none());
    }

    #[test]
    fn test_boundary_rounds_up_to_next_ten_minutes() {
        // 00:03:17 in São Paulo
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 3, 3, 17).unwrap();

        let next = next_boundary(now, TEN_MINUTES);

        assert_eq!(next, Utc.with_ymd_and_hms(2026, 10, 18, 3, 10, 0).unwrap());
        assert_eq!(next.with_timezone(&Sao_Paulo).format("%H:%M").to_string(), "00:10");
    }

    #[test]
    fn test_boundary_on_exact_multiple_is_now() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 11, 0, 0).unwrap();

        assert_eq!(next_boundary(now, TEN_MINUTES), now);
    }

    #[test]
    fn test_boundary_ignores_subsecond_offset() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 11, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);

        assert_eq!(
            next_boundary(now, TEN_MINUTES),
            Utc.with_ymd_and_hms(2026, 10, 18, 11, 10, 0).unwrap()
        );
    }

    #[test]
    fn test_boundary_with_zero_period_is_next_second() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 11, 0, 0).unwrap()
            + chrono::Duration::milliseconds(1);

        assert_eq!(
            next_boundary(now, Duration::ZERO),
            Utc.with_ymd_and_hms(2026, 10, 18, 11, 0, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_aligned_ticks_hit_every_dose_in_a_day() {
        let registration = MedicatedRegistration {
            id: "reg-1".to_string(),
            name: "Ana".to_string(),
            medication: "Rivotril 2mg".to_string(),
            schedule: vec!["08:00".to_string(), "14:00".to_string(), "20:00".to_string()],
        };
        let sender = Arc::new(RecordingPushSender::default());
        let reminder = MedicationReminder::new(
            Arc::new(StaticRegistrationDirectory::new(
                vec![registration],
                vec!["team-token".to_string()],
            )),
            sender.clone(),
            Sao_Paulo,
        );
        // Started at 00:03:17 local time
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 3, 3, 17).unwrap();
        let first = next_boundary(start, TEN_MINUTES);
        let step = chrono::Duration::from_std(TEN_MINUTES).unwrap();

        let mut due = 0;
        for tick in 0..144 {
            let report = reminder.run(first + step * tick).await.unwrap();
            due += report.due;
        }

        assert_eq!(due, 3);
        assert_eq!(sender.messages().len(), 3);
    }
}
