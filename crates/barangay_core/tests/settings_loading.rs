use barangay_core::clock::{Clock, ManualClock};
use barangay_core::filter::{select, select_for_map};
use barangay_core::schema::{ComplaintStatus, ProjectStatus};
use barangay_core::{ComplaintFilter, Db, ProjectFilter, Settings};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use time::macros::{datetime, offset};

fn shipped_config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config")
}

#[test]
fn shipped_config_loads_the_demo_data() {
    let settings = Settings::load_from_dir(&shipped_config_dir()).expect("shipped config");
    assert_eq!(settings.seed.complaints.len(), 5);
    assert_eq!(settings.seed.projects.len(), 8);
    assert_eq!(settings.seed.forums.len(), 5);
    assert_eq!(settings.general.viewer_id.as_deref(), Some("user-001"));
    assert_eq!(settings.viewer().unwrap().utc_offset, offset!(+8));
    assert_eq!(settings.map.zoom, 14);
    let center = settings.map.default_center();
    assert_eq!((center.latitude, center.longitude), (14.318828, 121.102873));
}

#[test]
fn seeded_session_applies_visibility_and_filters() {
    let settings = Settings::load_from_dir(&shipped_config_dir()).expect("shipped config");
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(datetime!(2025-12-20 09:00 UTC)));
    let db = Db::seeded(clock, settings.seed.clone());

    // complaint-5 is still "submitted" and belongs to user-005.
    let viewer = settings.viewer().unwrap();
    let listed = select(db.complaints.records(), &ComplaintFilter::default(), &viewer);
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[0].id, "complaint-1");
    assert!(listed.iter().all(|complaint| complaint.status != ComplaintStatus::Submitted));

    let mut ongoing = ProjectFilter::default();
    ongoing.toggle_status(ProjectStatus::Ongoing);
    let projects = select(db.projects.records(), &ongoing, &viewer);
    assert_eq!(projects.len(), 4);

    let pinned = select_for_map(db.projects.records(), &ProjectFilter::default(), &viewer);
    let ids: Vec<&str> = pinned.iter().map(|project| project.id.as_str()).collect();
    assert_eq!(ids, vec!["project-8", "project-1", "project-5"]);
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::load_from_dir(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("barangay.toml"));

    fs::write(dir.path().join("barangay.toml"), "[general]\nutc_offset_hours = 8\n").unwrap();
    let err = Settings::load_from_dir(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("seed.yaml"));
}

#[test]
fn minimal_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("barangay.toml"), "").unwrap();
    fs::write(dir.path().join("seed.yaml"), "forums: []\n").unwrap();

    let settings = Settings::load_from_dir(dir.path()).unwrap();
    assert!(settings.seed.complaints.is_empty());
    assert_eq!(settings.map.width, 400);
    assert_eq!(settings.map.maptype, "roadmap");
    assert!(settings.general.viewer_id.is_none());
}

#[test]
fn unknown_enum_values_in_seed_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("barangay.toml"), "").unwrap();
    fs::write(
        dir.path().join("seed.yaml"),
        r#"
complaints:
  - id: complaint-x
    title: Bad status
    description: Uses a status outside the lifecycle.
    category: noise
    status: archived
    submitter: { id: u1, name: Someone }
    created_at: "2025-12-15T00:00:00Z"
    updated_at: "2025-12-15T00:00:00Z"
"#,
    )
    .unwrap();

    assert!(Settings::load_from_dir(dir.path()).is_err());
}

#[test]
fn seed_record_updated_before_created_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("barangay.toml"), "").unwrap();
    fs::write(
        dir.path().join("seed.yaml"),
        r#"
complaints:
  - id: complaint-late
    title: Broken streetlight
    description: Streetlight on Rizal Street has been out for a week.
    category: public_safety
    status: under_review
    submitter: { id: user-003, name: Pedro Reyes }
    created_at: "2025-12-10T12:00:00Z"
    updated_at: "2025-12-01T00:00:00Z"
"#,
    )
    .unwrap();

    let err = Settings::load_from_dir(dir.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("complaint-late"), "{message}");
    assert!(message.contains("seed.yaml"), "{message}");
}

#[test]
fn shipped_seed_is_newest_first_once_loaded() {
    let settings = Settings::load_from_dir(&shipped_config_dir()).expect("shipped config");
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(datetime!(2025-12-20 09:00 UTC)));
    let db = Db::seeded(clock, settings.seed);

    assert_eq!(db.complaints.records()[0].id, "complaint-5");
    assert!(db
        .complaints
        .records()
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
    assert!(db
        .projects
        .records()
        .iter()
        .all(|project| project.created_at <= project.updated_at));
}
