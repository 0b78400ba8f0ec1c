//! Project number allocation.
//!
//! Numbers look like `P_2401_003`: the sequence restarts every calendar
//! month and is one past the highest sequence already stored for that
//! month.
//!
//! Stored numbers whose trailing segment is not numeric are handled by
//! [`MalformedPolicy`]. With the default `Reset` they are logged and
//! skipped, so a month that only holds malformed numbers starts again at
//! `001`. That keeps old stores usable but can hand out a number that was
//! meant to be taken; `Fail` refuses to allocate instead.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use dossier_models::{MonthScope, ProjectNumber, MAX_SEQUENCE};
use sqlx::SqliteExecutor;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::db::{self, DbPool};
use crate::error::{Error, Result};

/// How to treat stored numbers that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Ignore them with a warning.
    #[default]
    Reset,
    /// Refuse to allocate a number for the month.
    Fail,
}

/// Numeric trailing segment of a stored number, after the last `_`.
fn trailing_sequence(raw: &str) -> Option<u32> {
    let segment = raw.rsplit('_').next()?;
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Compute the next free project number for the month containing `today`.
///
/// Run this on the same transaction that inserts the project so the read
/// and the write cannot interleave with another writer.
pub async fn next_project_number<'e, E>(
    executor: E,
    today: NaiveDate,
    policy: MalformedPolicy,
) -> Result<ProjectNumber>
where
    E: SqliteExecutor<'e>,
{
    let scope = MonthScope::of(&today);
    let prefix = scope.prefix();
    let stored = db::list_project_numbers_with_prefix(executor, &prefix).await?;

    let mut highest: u32 = 0;
    for raw in &stored {
        match trailing_sequence(raw) {
            Some(sequence) => highest = highest.max(sequence),
            None => match policy {
                MalformedPolicy::Reset => {
                    warn!(project_number = %raw, "Ignoring malformed project number");
                }
                MalformedPolicy::Fail => {
                    return Err(Error::MalformedProjectNumber(raw.clone()));
                }
            },
        }
    }

    let next = highest + 1;
    if next > u32::from(MAX_SEQUENCE) {
        return Err(Error::SequenceExhausted(prefix.trim_end_matches('_').to_string()));
    }

    let number = ProjectNumber::new(scope, next as u16)
        .map_err(|e| Error::Internal(e.to_string()))?;
    debug!(project_number = %number, existing = stored.len(), "Computed next project number");

    Ok(number)
}

/// Hands out project numbers, one reservation at a time.
#[derive(Clone)]
pub struct NumberingService {
    db: DbPool,
    policy: MalformedPolicy,
    lock: Arc<Mutex<()>>,
}

impl NumberingService {
    pub fn new(db: DbPool, policy: MalformedPolicy) -> Self {
        Self {
            db,
            policy,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// The number the next project created on `today` would get.
    ///
    /// This is a preview only; nothing is reserved.
    pub async fn peek_next(&self, today: NaiveDate) -> Result<ProjectNumber> {
        next_project_number(&self.db, today, self.policy).await
    }

    /// Preview using the local calendar date.
    pub async fn peek_next_today(&self) -> Result<ProjectNumber> {
        self.peek_next(Local::now().date_naive()).await
    }

    /// Exclusive access to allocation within this process. Hold the guard
    /// until the transaction that stores the new project has committed.
    pub async fn reserve(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CreateClient, CreateProject, CreateStructure};
    use dossier_models::ClientType;
    use dossier_storage::FolderTemplate;

    async fn setup() -> (DbPool, i64) {
        let pool = db::init_pool(":memory:").await.unwrap();
        db::initialize_schema(&pool).await.unwrap();
        let structure = db::create_structure(
            &pool,
            CreateStructure {
                name: "Main".to_string(),
                base_path: "/org".to_string(),
                template: FolderTemplate::new().folder("Inbox"),
            },
        )
        .await
        .unwrap();
        let client = db::create_client(
            &pool,
            CreateClient {
                name: "Acme".to_string(),
                client_type: ClientType::FreelanceClient,
                folder_path: "/org/Acme".to_string(),
                structure_id: structure.id,
            },
        )
        .await
        .unwrap();
        (pool, client.id)
    }

    async fn insert(pool: &DbPool, client_id: i64, number: &str) {
        db::create_project(
            pool,
            CreateProject {
                name: format!("Project {}", number),
                project_number: number.to_string(),
                client_id,
                folder_path: format!("/org/Acme/{}", number),
                description: None,
            },
        )
        .await
        .unwrap();
    }

    fn jan_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_trailing_sequence() {
        assert_eq!(trailing_sequence("P_2401_003"), Some(3));
        assert_eq!(trailing_sequence("P_2401_1000"), Some(1000));
        assert_eq!(trailing_sequence("P_2401_abc"), None);
        assert_eq!(trailing_sequence("P_2401_"), None);
        assert_eq!(trailing_sequence("P_2401_+5"), None);
    }

    #[tokio::test]
    async fn test_first_number_in_month() {
        let (pool, _) = setup().await;
        let number = next_project_number(&pool, jan_2024(), MalformedPolicy::Reset)
            .await
            .unwrap();
        assert_eq!(number.to_string(), "P_2401_001");
    }

    #[tokio::test]
    async fn test_sequence_is_gap_free() {
        let (pool, client_id) = setup().await;
        let mut issued = Vec::new();
        for _ in 0..5 {
            let number = next_project_number(&pool, jan_2024(), MalformedPolicy::Reset)
                .await
                .unwrap();
            insert(&pool, client_id, &number.to_string()).await;
            issued.push(number.to_string());
        }
        assert_eq!(
            issued,
            vec!["P_2401_001", "P_2401_002", "P_2401_003", "P_2401_004", "P_2401_005"]
        );
    }

    #[tokio::test]
    async fn test_other_months_do_not_count() {
        let (pool, client_id) = setup().await;
        insert(&pool, client_id, "P_2312_007").await;
        insert(&pool, client_id, "P_2402_004").await;
        // `_` must not act as a wildcard
        insert(&pool, client_id, "P_2401X009").await;

        let number = next_project_number(&pool, jan_2024(), MalformedPolicy::Reset)
            .await
            .unwrap();
        assert_eq!(number.to_string(), "P_2401_001");

        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let number = next_project_number(&pool, feb, MalformedPolicy::Reset)
            .await
            .unwrap();
        assert_eq!(number.to_string(), "P_2402_005");
    }

    #[tokio::test]
    async fn test_malformed_numbers_are_skipped_by_default() {
        let (pool, client_id) = setup().await;
        insert(&pool, client_id, "P_2401_abc").await;

        let number = next_project_number(&pool, jan_2024(), MalformedPolicy::Reset)
            .await
            .unwrap();
        assert_eq!(number.to_string(), "P_2401_001");

        insert(&pool, client_id, "P_2401_003").await;
        let number = next_project_number(&pool, jan_2024(), MalformedPolicy::Reset)
            .await
            .unwrap();
        assert_eq!(number.to_string(), "P_2401_004");
    }

    #[tokio::test]
    async fn test_malformed_numbers_fail_in_strict_mode() {
        let (pool, client_id) = setup().await;
        insert(&pool, client_id, "P_2401_003").await;
        insert(&pool, client_id, "P_2401_x7").await;

        let err = next_project_number(&pool, jan_2024(), MalformedPolicy::Fail)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedProjectNumber(ref n) if n == "P_2401_x7"));
    }

    #[tokio::test]
    async fn test_exhausted_month_fails_loudly() {
        let (pool, client_id) = setup().await;
        insert(&pool, client_id, "P_2401_999").await;

        let err = next_project_number(&pool, jan_2024(), MalformedPolicy::Reset)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SequenceExhausted(ref scope) if scope == "P_2401"));
    }

    #[tokio::test]
    async fn test_service_peek_does_not_reserve() {
        let (pool, _) = setup().await;
        let service = NumberingService::new(pool, MalformedPolicy::Reset);
        let first = service.peek_next(jan_2024()).await.unwrap();
        let second = service.peek_next(jan_2024()).await.unwrap();
        assert_eq!(first, second);
    }
}
