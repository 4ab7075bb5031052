use crate::clock::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

/// An entity the record store can hold.
///
/// Implementors decide how an input becomes a fresh record (initial
/// status, empty engagement) and which fields a patch may overwrite.
pub trait Record: Clone {
    /// Prefix for generated ids, e.g. `complaint`.
    const KIND: &'static str;
    type Input;
    type Patch;

    fn id(&self) -> &str;
    fn created_at(&self) -> OffsetDateTime;
    fn updated_at(&self) -> OffsetDateTime;
    fn from_input(id: String, input: Self::Input, now: OffsetDateTime) -> Self;
    fn apply_patch(&mut self, patch: Self::Patch);
    fn touch(&mut self, at: OffsetDateTime);
}

/// In-session collection of records, newest first by `created_at`.
pub struct RecordStore<R> {
    records: Vec<R>,
    clock: Arc<dyn Clock>,
    next_seq: u64,
}

impl<R: Record> RecordStore<R> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            clock,
            next_seq: 0,
        }
    }

    /// Starts from existing records, sorted newest first (stable for equal
    /// timestamps). Later duplicates of an id are dropped, and an
    /// `updated_at` earlier than `created_at` is raised to it.
    pub fn with_records(clock: Arc<dyn Clock>, records: Vec<R>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(records.len());
        for mut record in records {
            if !seen.insert(record.id().to_string()) {
                warn!(kind = R::KIND, id = record.id(), "duplicate seed record dropped");
                continue;
            }
            if record.updated_at() < record.created_at() {
                warn!(kind = R::KIND, id = record.id(), "seed record updated before created; clamped");
                let created_at = record.created_at();
                record.touch(created_at);
            }
            kept.push(record);
        }
        kept.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Self {
            records: kept,
            clock,
            next_seq: 0,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    pub fn create(&mut self, input: R::Input) -> R {
        let now = self.clock.now();
        let id = self.fresh_id(now);
        let record = R::from_input(id, input, now);
        debug!(kind = R::KIND, id = record.id(), "record created");
        self.records.insert(0, record.clone());
        record
    }

    /// Merges `patch` over the record and refreshes `updated_at`.
    /// Returns `None` and leaves the collection alone if `id` is unknown.
    pub fn update(&mut self, id: &str, patch: R::Patch) -> Option<R> {
        self.modify(id, |record| record.apply_patch(patch))
    }

    /// Applies `change` to a copy of the record, stamps it and swaps it in.
    pub fn modify(&mut self, id: &str, change: impl FnOnce(&mut R)) -> Option<R> {
        let now = self.clock.now();
        let Some(slot) = self.records.iter_mut().find(|record| record.id() == id) else {
            warn!(kind = R::KIND, id, "update on unknown record");
            return None;
        };
        let mut next = slot.clone();
        change(&mut next);
        next.touch(advance_past(slot.updated_at(), now));
        *slot = next;
        debug!(kind = R::KIND, id, "record updated");
        Some(slot.clone())
    }

    /// Mutates a record in place without touching `updated_at`.
    pub(crate) fn with_record_mut<T>(&mut self, id: &str, f: impl FnOnce(&mut R) -> T) -> Option<T> {
        match self.records.iter_mut().find(|record| record.id() == id) {
            Some(record) => Some(f(record)),
            None => {
                warn!(kind = R::KIND, id, "engagement on unknown record");
                None
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.records.iter().position(|record| record.id() == id) {
            Some(index) => {
                self.records.remove(index);
                debug!(kind = R::KIND, id, "record deleted");
                true
            }
            None => {
                warn!(kind = R::KIND, id, "delete on unknown record");
                false
            }
        }
    }

    /// Next value of the store-local sequence, also used for comment ids.
    pub(crate) fn next_token(&mut self) -> String {
        self.next_seq += 1;
        to_base36(self.next_seq)
    }

    fn fresh_id(&mut self, now: OffsetDateTime) -> String {
        let millis = now.unix_timestamp_nanos() / 1_000_000;
        loop {
            let id = format!("{}-{}-{}", R::KIND, millis, self.next_token());
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// `now` if it is later than `previous`, otherwise one millisecond past it.
fn advance_past(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
