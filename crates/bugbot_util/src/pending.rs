use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serenity::all::UserId;

use crate::report::Report;

pub const DEFAULT_CAPACITY: usize = 512;
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Outcome of trying to consume a pending report.
#[derive(Debug)]
pub enum Claim {
    /// The report was present and is now removed from the store.
    Claimed(Report),
    /// Someone other than the submitter tried to act on the report.
    /// The entry stays in the store.
    NotYours,
    /// Unknown id, expired entry, or a duplicate click that lost the race.
    Expired,
}

/// Reports waiting for the submitter to decide whether they want a ticket
/// channel. Bounded in size and entry lifetime so abandoned reports are
/// reclaimed instead of accumulating for the lifetime of the process.
#[derive(Debug)]
pub struct PendingReports {
    entries: Mutex<HashMap<String, PendingEntry>>,
    capacity: usize,
    ttl: Duration,
}

#[derive(Debug)]
struct PendingEntry {
    report: Report,
    inserted_at: Instant,
}

impl Default for PendingReports {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl PendingReports {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { entries: Mutex::new(HashMap::new()), capacity, ttl }
    }

    /// Store a report under its id, evicting expired entries and, at
    /// capacity, the oldest entry.
    pub fn insert(&self, report: Report) {
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        if entries.len() >= self.capacity {
            let oldest =
                entries.iter().min_by_key(|(_, entry)| entry.inserted_at).map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                tracing::debug!(report.id = %oldest, "Pending report store full, evicting oldest entry");
                entries.remove(&oldest);
            }
        }
        entries.insert(report.id.clone(), PendingEntry { report, inserted_at: Instant::now() });
    }

    /// Atomically remove and return the report, but only for its submitter.
    /// A concurrent duplicate click sees [Claim::Expired] rather than a
    /// second [Claim::Claimed].
    pub fn claim(&self, report_id: &str, user: UserId) -> Claim {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get(report_id) else {
            return Claim::Expired;
        };
        if entry.inserted_at.elapsed() >= self.ttl {
            entries.remove(report_id);
            return Claim::Expired;
        }
        if entry.report.user != user {
            return Claim::NotYours;
        }
        match entries.remove(report_id) {
            Some(entry) => Claim::Claimed(entry.report),
            None => Claim::Expired,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::make_report;

    #[test]
    fn insert_then_claim_consumes_the_entry() {
        let pending = PendingReports::default();
        pending.insert(make_report("BR-1111", 1));
        assert_eq!(pending.len(), 1);

        assert!(matches!(pending.claim("BR-1111", UserId::new(1)), Claim::Claimed(_)));
        assert!(pending.is_empty());
        // Idempotence: a second identical claim behaves like an expired one.
        assert!(matches!(pending.claim("BR-1111", UserId::new(1)), Claim::Expired));
    }

    #[test]
    fn reports_reinserted_after_a_failure_can_be_claimed_again() {
        let pending = PendingReports::default();
        pending.insert(make_report("BR-1111", 1));
        let report = match pending.claim("BR-1111", UserId::new(1)) {
            Claim::Claimed(report) => report,
            other => panic!("expected a claim, got {other:?}"),
        };
        // A failed ticket creation puts the report back for another click.
        pending.insert(report);
        assert!(matches!(pending.claim("BR-1111", UserId::new(1)), Claim::Claimed(_)));
    }

    #[test]
    fn unknown_ids_are_expired() {
        let pending = PendingReports::default();
        assert!(matches!(pending.claim("BR-0000", UserId::new(1)), Claim::Expired));
    }

    #[test]
    fn foreign_users_cannot_claim_and_do_not_consume() {
        let pending = PendingReports::default();
        pending.insert(make_report("BR-1111", 1));

        assert!(matches!(pending.claim("BR-1111", UserId::new(2)), Claim::NotYours));
        // The submitter can still claim afterwards.
        assert!(matches!(pending.claim("BR-1111", UserId::new(1)), Claim::Claimed(_)));
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        let pending = PendingReports::new(8, Duration::from_millis(5));
        pending.insert(make_report("BR-1111", 1));
        std::thread::sleep(Duration::from_millis(20));
        assert!(matches!(pending.claim("BR-1111", UserId::new(1)), Claim::Expired));
        assert!(pending.is_empty());
    }

    #[test]
    fn at_capacity_the_oldest_entry_is_evicted() {
        let pending = PendingReports::new(2, Duration::from_secs(60));
        pending.insert(make_report("BR-1111", 1));
        std::thread::sleep(Duration::from_millis(2));
        pending.insert(make_report("BR-2222", 1));
        std::thread::sleep(Duration::from_millis(2));
        pending.insert(make_report("BR-3333", 1));

        assert_eq!(pending.len(), 2);
        assert!(matches!(pending.claim("BR-1111", UserId::new(1)), Claim::Expired));
        assert!(matches!(pending.claim("BR-2222", UserId::new(1)), Claim::Claimed(_)));
        assert!(matches!(pending.claim("BR-3333", UserId::new(1)), Claim::Claimed(_)));
    }
}
