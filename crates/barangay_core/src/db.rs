use crate::clock::Clock;
use crate::schema::{
    Complaint, ComplaintPatch, ComplaintStatus, Engagement, Forum, ForumPatch, NewComplaint,
    NewForum, NewProject, Project, ProjectPatch, ProjectStatus,
};
use crate::store::{Record, RecordStore};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

/// Initial collections for a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub complaints: Vec<Complaint>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub forums: Vec<Forum>,
}

impl Seed {
    /// Every record must have been created no later than its last update.
    pub fn validate(&self) -> Result<()> {
        check_timestamps(&self.complaints)?;
        check_timestamps(&self.projects)?;
        check_timestamps(&self.forums)
    }
}

fn check_timestamps<R: Record>(records: &[R]) -> Result<()> {
    for record in records {
        if record.updated_at() < record.created_at() {
            bail!(
                "{} {} has updated_at {} before created_at {}",
                R::KIND,
                record.id(),
                record.updated_at(),
                record.created_at()
            );
        }
    }
    Ok(())
}

/// The session database. Passed by reference to whatever reads or
/// mutates records; nothing here is global.
pub struct Db {
    pub complaints: RecordStore<Complaint>,
    pub projects: RecordStore<Project>,
    pub forums: RecordStore<Forum>,
}

impl Db {
    pub fn open(clock: Arc<dyn Clock>) -> Self {
        Self {
            complaints: RecordStore::new(clock.clone()),
            projects: RecordStore::new(clock.clone()),
            forums: RecordStore::new(clock),
        }
    }

    pub fn seeded(clock: Arc<dyn Clock>, seed: Seed) -> Self {
        info!(
            complaints = seed.complaints.len(),
            projects = seed.projects.len(),
            forums = seed.forums.len(),
            "seeding session database"
        );
        Self {
            complaints: RecordStore::with_records(clock.clone(), seed.complaints),
            projects: RecordStore::with_records(clock.clone(), seed.projects),
            forums: RecordStore::with_records(clock, seed.forums),
        }
    }
}

impl Record for Complaint {
    const KIND: &'static str = "complaint";
    type Input = NewComplaint;
    type Patch = ComplaintPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    fn from_input(id: String, input: NewComplaint, now: OffsetDateTime) -> Self {
        Complaint {
            id,
            title: input.title,
            description: input.description,
            category: input.category,
            status: ComplaintStatus::Submitted,
            priority: None,
            submitter: input.submitter,
            location: input.location,
            images: input.images,
            engagement: Engagement::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ComplaintPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = Some(priority);
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
    }

    fn touch(&mut self, at: OffsetDateTime) {
        self.updated_at = at;
    }
}

impl Record for Project {
    const KIND: &'static str = "project";
    type Input = NewProject;
    type Patch = ProjectPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    fn from_input(id: String, input: NewProject, now: OffsetDateTime) -> Self {
        Project {
            id,
            title: input.title,
            description: input.description,
            category: input.category,
            status: ProjectStatus::Planned,
            start_date: input.start_date,
            end_date: input.end_date,
            budget: input.budget,
            contractor: input.contractor,
            funding_source: input.funding_source,
            location: input.location,
            images: input.images,
            engagement: Engagement::default(),
            progress: None,
            progress_updates: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if patch.end_date.is_some() {
            self.end_date = patch.end_date;
        }
        if patch.budget.is_some() {
            self.budget = patch.budget;
        }
        if patch.contractor.is_some() {
            self.contractor = patch.contractor;
        }
        if patch.funding_source.is_some() {
            self.funding_source = patch.funding_source;
        }
        if patch.location.is_some() {
            self.location = patch.location;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
    }

    fn touch(&mut self, at: OffsetDateTime) {
        self.updated_at = at;
    }
}

impl Record for Forum {
    const KIND: &'static str = "forum";
    type Input = NewForum;
    type Patch = ForumPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    fn from_input(id: String, input: NewForum, now: OffsetDateTime) -> Self {
        Forum {
            id,
            title: input.title,
            description: input.description,
            author: input.author,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ForumPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn touch(&mut self, at: OffsetDateTime) {
        self.updated_at = at;
    }
}
