use crate::schema::{ProgressUpdate, Project};
use crate::store::RecordStore;

impl Project {
    pub fn latest_progress(&self) -> Option<&ProgressUpdate> {
        self.progress_updates.last()
    }
}

impl RecordStore<Project> {
    /// Logs a progress report on a project. Percentages above 100 are
    /// recorded as 100. Status is left for staff to change.
    pub fn record_progress(
        &mut self,
        id: &str,
        percent: u8,
        note: Option<String>,
    ) -> Option<Project> {
        let percent = percent.min(100);
        let recorded_at = self.now();
        self.modify(id, |project| {
            project.progress = Some(percent);
            project.progress_updates.push(ProgressUpdate {
                percent,
                note,
                recorded_at,
            });
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::{Clock, ManualClock};
    use crate::schema::{NewProject, Project, ProjectCategory, ProjectStatus};
    use crate::store::RecordStore;
    use std::sync::Arc;
    use time::Duration;
    use time::macros::datetime;

    #[test]
    fn progress_is_logged_and_clamped() {
        let clock = Arc::new(ManualClock::new(datetime!(2025-11-01 08:00 UTC)));
        let mut store: RecordStore<Project> = RecordStore::new(clock.clone() as Arc<dyn Clock>);
        let project = store.create(NewProject {
            title: "Multi-Purpose Community Center Construction".to_string(),
            description: "New venue for events and meetings.".to_string(),
            category: ProjectCategory::Infrastructure,
            start_date: datetime!(2025-11-01 00:00 UTC),
            end_date: Some(datetime!(2026-06-30 00:00 UTC)),
            budget: Some(5_000_000.0),
            contractor: None,
            funding_source: None,
            location: None,
            images: Vec::new(),
        });

        clock.advance(Duration::days(30));
        let first = store
            .record_progress(&project.id, 35, Some("Foundation poured".to_string()))
            .unwrap();
        assert_eq!(first.progress, Some(35));
        assert!(first.updated_at > project.updated_at);

        let second = store.record_progress(&project.id, 140, None).unwrap();
        assert_eq!(second.progress, Some(100));
        assert_eq!(second.progress_updates.len(), 2);
        assert_eq!(second.latest_progress().map(|update| update.percent), Some(100));
        assert_eq!(second.status, ProjectStatus::Planned);
    }

    #[test]
    fn unknown_project_is_not_found() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(datetime!(2025-11-01 08:00 UTC)));
        let mut store: RecordStore<Project> = RecordStore::new(clock);
        assert!(store.record_progress("project-missing", 10, None).is_none());
        assert!(store.is_empty());
    }
}
