//! Record filtering shared by the complaint list, the map and the
//! transparency board.
//!
//! A record is shown when the fixed visibility policy lets the viewer see
//! it and every configured filter dimension accepts it. Empty dimensions
//! accept everything.

use crate::schema::{
    Complaint, ComplaintCategory, ComplaintStatus, Location, Priority, Project, ProjectCategory,
    ProjectStatus,
};
use crate::store::Record;
use std::collections::BTreeSet;
use time::{Date, OffsetDateTime, UtcOffset};

/// Inclusive day range. Only in effect when both ends are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Start of the first day and the last millisecond of the last day,
    /// both in `offset`.
    /// Built without date arithmetic so the outermost representable days
    /// are usable as ends.
    pub fn bounds(&self, offset: UtcOffset) -> Option<(OffsetDateTime, OffsetDateTime)> {
        let (start, end) = (self.start?, self.end?);
        let lower = start.midnight().assume_offset(offset);
        let upper = end.with_hms_milli(23, 59, 59, 999).ok()?.assume_offset(offset);
        Some((lower, upper))
    }

    /// An end before the start contains nothing.
    pub fn contains(&self, at: OffsetDateTime, offset: UtcOffset) -> bool {
        match self.bounds(offset) {
            Some((lower, upper)) => lower <= at && at <= upper,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter<S: Ord, C: Ord> {
    pub status: BTreeSet<S>,
    pub category: BTreeSet<C>,
    pub priority: BTreeSet<Priority>,
    pub date_range: Option<DateRange>,
    pub mine_only: bool,
}

pub type ComplaintFilter = RecordFilter<ComplaintStatus, ComplaintCategory>;
pub type ProjectFilter = RecordFilter<ProjectStatus, ProjectCategory>;

impl<S: Ord, C: Ord> Default for RecordFilter<S, C> {
    fn default() -> Self {
        Self {
            status: BTreeSet::new(),
            category: BTreeSet::new(),
            priority: BTreeSet::new(),
            date_range: None,
            mine_only: false,
        }
    }
}

impl<S: Ord, C: Ord> RecordFilter<S, C> {
    /// Number of dimensions that are constraining anything, for the
    /// filter badge.
    pub fn active_count(&self) -> usize {
        let sets = [
            !self.status.is_empty(),
            !self.category.is_empty(),
            !self.priority.is_empty(),
        ];
        let mut count = sets.iter().filter(|active| **active).count();
        if self.date_range.is_some_and(|range| range.is_complete()) {
            count += 1;
        }
        if self.mine_only {
            count += 1;
        }
        count
    }

    pub fn is_default(&self) -> bool {
        self.active_count() == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn toggle_status(&mut self, status: S) {
        toggle(&mut self.status, status);
    }

    pub fn toggle_category(&mut self, category: C) {
        toggle(&mut self.category, category);
    }

    pub fn toggle_priority(&mut self, priority: Priority) {
        toggle(&mut self.priority, priority);
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

/// Who is looking, and in which UTC offset their calendar days fall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Option<String>,
    pub utc_offset: UtcOffset,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            utc_offset: UtcOffset::UTC,
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            user_id: Some(id.into()),
            utc_offset: UtcOffset::UTC,
        }
    }

    pub fn with_offset(mut self, utc_offset: UtcOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    fn owns(&self, owner: Option<&str>) -> bool {
        matches!((self.user_id.as_deref(), owner), (Some(me), Some(owner)) if me == owner)
    }
}

/// The per-record view the evaluator needs.
pub trait Filterable: Record {
    type Status: Ord + Copy;
    type Category: Ord + Copy;

    fn status(&self) -> Self::Status;
    fn category(&self) -> Self::Category;
    /// `None` exempts the record from priority filtering.
    fn priority(&self) -> Option<Priority>;
    /// Timestamp the date range is checked against.
    fn filter_timestamp(&self) -> OffsetDateTime;
    fn owner_id(&self) -> Option<&str>;
    /// Hidden from everyone but the owner regardless of filters.
    fn restricted(&self) -> bool;
    fn location(&self) -> Option<&Location>;
}

impl Filterable for Complaint {
    type Status = ComplaintStatus;
    type Category = ComplaintCategory;

    fn status(&self) -> ComplaintStatus {
        self.status
    }

    fn category(&self) -> ComplaintCategory {
        self.category
    }

    fn priority(&self) -> Option<Priority> {
        self.priority
    }

    fn filter_timestamp(&self) -> OffsetDateTime {
        self.created_at
    }

    fn owner_id(&self) -> Option<&str> {
        Some(&self.submitter.id)
    }

    fn restricted(&self) -> bool {
        self.status.is_restricted()
    }

    fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

impl Filterable for Project {
    type Status = ProjectStatus;
    type Category = ProjectCategory;

    fn status(&self) -> ProjectStatus {
        self.status
    }

    fn category(&self) -> ProjectCategory {
        self.category
    }

    fn priority(&self) -> Option<Priority> {
        None
    }

    fn filter_timestamp(&self) -> OffsetDateTime {
        self.start_date
    }

    fn owner_id(&self) -> Option<&str> {
        None
    }

    fn restricted(&self) -> bool {
        false
    }

    fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

pub fn is_visible<R: Filterable>(record: &R, viewer: &Viewer) -> bool {
    !record.restricted() || viewer.owns(record.owner_id())
}

pub fn matches<R: Filterable>(
    record: &R,
    filter: &RecordFilter<R::Status, R::Category>,
    viewer: &Viewer,
) -> bool {
    if !is_visible(record, viewer) {
        return false;
    }
    if !filter.status.is_empty() && !filter.status.contains(&record.status()) {
        return false;
    }
    if !filter.category.is_empty() && !filter.category.contains(&record.category()) {
        return false;
    }
    if let Some(priority) = record.priority() {
        if !filter.priority.is_empty() && !filter.priority.contains(&priority) {
            return false;
        }
    }
    if let Some(range) = &filter.date_range {
        if !range.contains(record.filter_timestamp(), viewer.utc_offset) {
            return false;
        }
    }
    if filter.mine_only && !viewer.owns(record.owner_id()) {
        return false;
    }
    true
}

/// Stable newest-first ordering by creation time.
pub fn newest_first<R: Record>(records: &mut [&R]) {
    records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// Records to list for `viewer`, newest first.
pub fn select<'a, R: Filterable + 'a>(
    records: impl IntoIterator<Item = &'a R>,
    filter: &RecordFilter<R::Status, R::Category>,
    viewer: &Viewer,
) -> Vec<&'a R> {
    let mut selected: Vec<&R> = records
        .into_iter()
        .filter(|record| matches(*record, filter, viewer))
        .collect();
    newest_first(&mut selected);
    selected
}

/// Like [`select`], minus records that have nowhere to be pinned.
pub fn select_for_map<'a, R: Filterable + 'a>(
    records: impl IntoIterator<Item = &'a R>,
    filter: &RecordFilter<R::Status, R::Category>,
    viewer: &Viewer,
) -> Vec<&'a R> {
    select(
        records
            .into_iter()
            .filter(|record| record.location().is_some()),
        filter,
        viewer,
    )
}
