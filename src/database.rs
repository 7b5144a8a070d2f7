//! # Redis
//!
//! RAM database.
//!
//! One instance holds everything the service touches: confirmed records,
//! parked wizard drafts, admin sessions.
//!
//! ## Key layout
//!
//! - Hash `submissions` mapping share id (**string**) to record (**flat JSON**):
//!   append-only, written once per completed flow, read back whole by the
//!   admin panel. Mirrors a hosted push-collection, the hash field plays the
//!   push key.
//! - `wizard:<token>` (**JSON**): the parked two-step state, 1 hour TTL so
//!   abandoned forms clean themselves up.
//! - `admin:<token>` (**flag**): admin session marker, 12 hour TTL, deleted
//!   on logout.
//!
//! ## Sizing
//!
//! A record is well under 1 KB of JSON. Even a few thousand submissions stay
//! in the single-digit MB range, so a full `HVALS` snapshot per feed event
//! is fine at this volume.
use std::{cmp::Reverse, time::Duration};

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::warn;

use crate::{error::AppError, state::AppState, submission::Submission, wizard::Wizard};

const SUBMISSIONS_KEY: &str = "submissions";

const WIZARD_TTL_SECS: u64 = 60 * 60;
const ADMIN_SESSION_TTL_SECS: u64 = 60 * 60 * 12;

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

pub async fn append_submission(
    state: &AppState,
    submission: &Submission,
) -> Result<(), AppError> {
    let mut connection = state.redis_connection.clone();

    let record = serde_json::to_string(submission)?;
    let _: () = connection
        .hset(SUBMISSIONS_KEY, &submission.id, record)
        .await?;

    Ok(())
}

/// Full snapshot, newest first. A record that fails to decode is skipped
/// with a warning rather than taking the whole panel down.
pub async fn fetch_submissions(state: &AppState) -> Result<Vec<Submission>, AppError> {
    let mut connection = state.redis_connection.clone();

    let records: Vec<String> = connection.hvals(SUBMISSIONS_KEY).await?;

    let mut submissions: Vec<Submission> = records
        .iter()
        .filter_map(|record| match serde_json::from_str(record) {
            Ok(submission) => Some(submission),
            Err(e) => {
                warn!("Skipping corrupt submission record: {e}");
                None
            }
        })
        .collect();

    sort_newest_first(&mut submissions);

    Ok(submissions)
}

pub async fn fetch_submission(
    state: &AppState,
    id: &str,
) -> Result<Option<Submission>, AppError> {
    let mut connection = state.redis_connection.clone();

    let record: Option<String> = connection.hget(SUBMISSIONS_KEY, id).await?;

    match record {
        Some(record) => Ok(Some(serde_json::from_str(&record)?)),
        None => Ok(None),
    }
}

/// Timestamp descending; records without one count as 0 and land at the end.
pub fn sort_newest_first(submissions: &mut [Submission]) {
    submissions.sort_by_key(|s| Reverse(s.timestamp.unwrap_or(0)));
}

pub async fn put_wizard(state: &AppState, token: &str, wizard: &Wizard) -> Result<(), AppError> {
    let mut connection = state.redis_connection.clone();

    let value = serde_json::to_string(wizard)?;
    let _: () = connection
        .set_ex(wizard_key(token), value, WIZARD_TTL_SECS)
        .await?;

    Ok(())
}

pub async fn get_wizard(state: &AppState, token: &str) -> Result<Option<Wizard>, AppError> {
    let mut connection = state.redis_connection.clone();

    let value: Option<String> = connection.get(wizard_key(token)).await?;

    match value {
        Some(value) => Ok(Some(serde_json::from_str(&value)?)),
        None => Ok(None),
    }
}

pub async fn clear_wizard(state: &AppState, token: &str) -> Result<(), AppError> {
    let mut connection = state.redis_connection.clone();

    let _: () = connection.del(wizard_key(token)).await?;

    Ok(())
}

pub async fn put_admin_session(state: &AppState, token: &str) -> Result<(), AppError> {
    let mut connection = state.redis_connection.clone();

    let _: () = connection
        .set_ex(admin_key(token), "1", ADMIN_SESSION_TTL_SECS)
        .await?;

    Ok(())
}

pub async fn admin_session_active(state: &AppState, token: &str) -> Result<bool, AppError> {
    let mut connection = state.redis_connection.clone();

    let active: bool = connection.exists(admin_key(token)).await?;

    Ok(active)
}

pub async fn clear_admin_session(state: &AppState, token: &str) -> Result<(), AppError> {
    let mut connection = state.redis_connection.clone();

    let _: () = connection.del(admin_key(token)).await?;

    Ok(())
}

fn wizard_key(token: &str) -> String {
    format!("wizard:{token}")
}

fn admin_key(token: &str) -> String {
    format!("admin:{token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::Draft;

    fn record(id: &str, timestamp: Option<i64>) -> Submission {
        Submission {
            id: id.to_string(),
            draft: Draft::default(),
            timestamp,
        }
    }

    #[test]
    fn newest_first_with_missing_timestamps_last() {
        let mut submissions = vec![
            record("A", Some(5)),
            record("B", None),
            record("C", Some(10)),
        ];

        sort_newest_first(&mut submissions);

        let order: Vec<&str> = submissions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, ["C", "A", "B"]);
    }

    #[test]
    fn session_keys_are_namespaced() {
        assert_eq!(wizard_key("t0k"), "wizard:t0k");
        assert_eq!(admin_key("t0k"), "admin:t0k");
    }
}
