use anyhow::{anyhow, Result};
use barangay_core::clock::SystemClock;
use barangay_core::display::{format_long_date, format_peso};
use barangay_core::filter::{newest_first, select, select_for_map};
use barangay_core::geo::{format_coordinates, map_preview_url};
use barangay_core::schema::{
    Complaint, ComplaintCategory, ComplaintPatch, ComplaintStatus, Forum, NewComplaint, NewProject,
    Priority, Project, ProjectCategory, ProjectPatch, ProjectStatus,
};
use barangay_core::{ComplaintFilter, DateRange, Db, ProjectFilter, Settings, Viewer};
use clap::{Args, Parser, Subcommand};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::Date;
use time::macros::format_description;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "barangay")]
#[command(about = "Barangay civic reporting CLI", long_about = None)]
struct Cli {
    /// Directory holding barangay.toml and seed.yaml
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    /// Act as this resident instead of the configured viewer
    #[arg(long, global = true)]
    viewer: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export canonical JSON Schemas to the ./schemas directory
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
    /// Resident complaints
    Complaints {
        #[command(subcommand)]
        command: ComplaintCommands,
    },
    /// Barangay projects (transparency board)
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Community board posts
    Forums {
        #[command(subcommand)]
        command: ForumCommands,
    },
    /// Filter badge helpers
    Filters {
        #[command(subcommand)]
        command: FilterCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for canonical types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum ComplaintCommands {
    /// List complaints visible to the viewer, newest first
    List {
        #[command(flatten)]
        filter: ComplaintFilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// List complaints that can be pinned on the map
    Map {
        #[command(flatten)]
        filter: ComplaintFilterArgs,
    },
    /// Show one complaint with its engagement
    Show { id: String },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List projects, newest first
    List {
        #[command(flatten)]
        filter: ProjectFilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// List projects that can be pinned on the map
    Map {
        #[command(flatten)]
        filter: ProjectFilterArgs,
    },
    /// Show one project with its progress log
    Show { id: String },
}

#[derive(Subcommand)]
enum ForumCommands {
    /// List community board posts
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FilterCommands {
    /// Print the number of active complaint filter dimensions
    Count {
        #[command(flatten)]
        filter: ComplaintFilterArgs,
    },
}

#[derive(Args)]
struct ComplaintFilterArgs {
    #[arg(long)]
    status: Vec<ComplaintStatus>,
    #[arg(long)]
    category: Vec<ComplaintCategory>,
    #[arg(long)]
    priority: Vec<Priority>,
    /// First day of the range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    from: Option<Date>,
    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    to: Option<Date>,
    /// Only complaints submitted by the viewer
    #[arg(long)]
    mine: bool,
}

impl ComplaintFilterArgs {
    fn to_filter(&self) -> ComplaintFilter {
        ComplaintFilter {
            status: self.status.iter().copied().collect(),
            category: self.category.iter().copied().collect(),
            priority: self.priority.iter().copied().collect(),
            date_range: date_range(self.from, self.to),
            mine_only: self.mine,
        }
    }
}

#[derive(Args)]
struct ProjectFilterArgs {
    #[arg(long)]
    status: Vec<ProjectStatus>,
    #[arg(long)]
    category: Vec<ProjectCategory>,
    /// First start day of the range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    from: Option<Date>,
    /// Last start day of the range, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    to: Option<Date>,
}

impl ProjectFilterArgs {
    fn to_filter(&self) -> ProjectFilter {
        ProjectFilter {
            status: self.status.iter().copied().collect(),
            category: self.category.iter().copied().collect(),
            date_range: date_range(self.from, self.to),
            ..ProjectFilter::default()
        }
    }
}

fn date_range(start: Option<Date>, end: Option<Date>) -> Option<DateRange> {
    (start.is_some() || end.is_some()).then_some(DateRange { start, end })
}

fn parse_day(value: &str) -> Result<Date, String> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

struct Session {
    settings: Settings,
    viewer: Viewer,
    db: Db,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self> {
        let settings = Settings::load_from_dir(&cli.config_dir)?;
        let mut viewer = settings.viewer()?;
        if let Some(id) = &cli.viewer {
            viewer.user_id = Some(id.clone());
        }
        let db = Db::seeded(Arc::new(SystemClock), settings.seed.clone());
        debug!(viewer = ?viewer.user_id, offset = %viewer.utc_offset, "session opened");
        Ok(Self {
            settings,
            viewer,
            db,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
        Commands::Complaints { command } => {
            let session = Session::open(&cli)?;
            match command {
                ComplaintCommands::List { filter, json } => {
                    complaints_list(&session, &filter.to_filter(), *json)
                }
                ComplaintCommands::Map { filter } => complaints_map(&session, &filter.to_filter()),
                ComplaintCommands::Show { id } => complaint_show(&session, id),
            }
        }
        Commands::Projects { command } => {
            let session = Session::open(&cli)?;
            match command {
                ProjectCommands::List { filter, json } => {
                    projects_list(&session, &filter.to_filter(), *json)
                }
                ProjectCommands::Map { filter } => projects_map(&session, &filter.to_filter()),
                ProjectCommands::Show { id } => project_show(&session, id),
            }
        }
        Commands::Forums { command } => {
            let session = Session::open(&cli)?;
            match command {
                ForumCommands::List { json } => forums_list(&session, *json),
            }
        }
        Commands::Filters { command } => match command {
            FilterCommands::Count { filter } => {
                println!("{}", filter.to_filter().active_count());
                Ok(())
            }
        },
    }
}

fn schema_export(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    write_schema(out_dir, "Complaint", &schema_for!(Complaint))?;
    write_schema(out_dir, "NewComplaint", &schema_for!(NewComplaint))?;
    write_schema(out_dir, "ComplaintPatch", &schema_for!(ComplaintPatch))?;
    write_schema(out_dir, "Project", &schema_for!(Project))?;
    write_schema(out_dir, "NewProject", &schema_for!(NewProject))?;
    write_schema(out_dir, "ProjectPatch", &schema_for!(ProjectPatch))?;
    write_schema(out_dir, "Forum", &schema_for!(Forum))?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}

fn write_schema(out_dir: &Path, name: &str, schema: &schemars::schema::RootSchema) -> Result<()> {
    let json = serde_json::to_string_pretty(schema)?;
    fs::write(out_dir.join(format!("{name}.schema.json")), json)?;
    Ok(())
}

fn complaints_list(session: &Session, filter: &ComplaintFilter, json: bool) -> Result<()> {
    let complaints = select(session.db.complaints.records(), filter, &session.viewer);
    if json {
        println!("{}", serde_json::to_string_pretty(&complaints)?);
        return Ok(());
    }
    if complaints.is_empty() {
        println!("No complaints yet");
    }
    for complaint in complaints {
        println!("{}", complaint_line(complaint));
    }
    Ok(())
}

fn complaint_line(complaint: &Complaint) -> String {
    let priority = complaint
        .priority
        .map(|priority| format!(" !{}", priority.label()))
        .unwrap_or_default();
    format!(
        "{}  [{}]{}  {}: {}  ({})",
        complaint.id,
        complaint.status.label(),
        priority,
        complaint.category.label(),
        complaint.title,
        format_long_date(complaint.created_at),
    )
}

fn complaints_map(session: &Session, filter: &ComplaintFilter) -> Result<()> {
    let pinned = select_for_map(session.db.complaints.records(), filter, &session.viewer);
    print_map_center(session);
    for complaint in pinned {
        if let Some(location) = &complaint.location {
            println!(
                "{}  {}  @ {}\n    {}",
                complaint.id,
                complaint.title,
                format_coordinates(location.coordinates()),
                map_preview_url(&session.settings.map, location.coordinates()),
            );
        }
    }
    Ok(())
}

fn print_map_center(session: &Session) {
    println!(
        "Map center {}",
        format_coordinates(session.settings.map.default_center())
    );
}

fn complaint_show(session: &Session, id: &str) -> Result<()> {
    let complaint = session
        .db
        .complaints
        .get(id)
        .filter(|complaint| barangay_core::filter::is_visible(*complaint, &session.viewer))
        .ok_or_else(|| anyhow!("Complaint not found: {id}"))?;

    println!("{}", complaint_line(complaint));
    println!("{}", complaint.description);
    println!("Submitted by {}", complaint.submitter.name);
    if let Some(location) = &complaint.location {
        let place = location
            .address
            .clone()
            .unwrap_or_else(|| format_coordinates(location.coordinates()));
        println!("Location: {place}");
    }
    println!(
        "Likes: {}  Dislikes: {}  Comments: {}",
        complaint.engagement.likes.len(),
        complaint.engagement.dislikes.len(),
        complaint.engagement.comment_count(),
    );
    println!("Last updated {}", format_long_date(complaint.updated_at));
    Ok(())
}

fn projects_list(session: &Session, filter: &ProjectFilter, json: bool) -> Result<()> {
    let projects = select(session.db.projects.records(), filter, &session.viewer);
    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }
    if projects.is_empty() {
        println!("No projects yet");
    }
    for project in projects {
        println!("{}", project_line(project));
    }
    Ok(())
}

fn project_line(project: &Project) -> String {
    let budget = project
        .budget
        .map(|budget| format!("  {}", format_peso(budget)))
        .unwrap_or_default();
    format!(
        "{}  [{}]  {}: {}{}  (starts {})",
        project.id,
        project.status.label(),
        project.category.label(),
        project.title,
        budget,
        format_long_date(project.start_date),
    )
}

fn projects_map(session: &Session, filter: &ProjectFilter) -> Result<()> {
    let pinned = select_for_map(session.db.projects.records(), filter, &session.viewer);
    print_map_center(session);
    for project in pinned {
        if let Some(location) = &project.location {
            let place = location
                .address
                .clone()
                .unwrap_or_else(|| format_coordinates(location.coordinates()));
            println!(
                "{}  {}  @ {}\n    {}",
                project.id,
                project.title,
                place,
                map_preview_url(&session.settings.map, location.coordinates()),
            );
        }
    }
    Ok(())
}

fn project_show(session: &Session, id: &str) -> Result<()> {
    let project = session
        .db
        .projects
        .get(id)
        .ok_or_else(|| anyhow!("Project not found: {id}"))?;

    println!("{}", project_line(project));
    println!("{}", project.description);
    if let Some(end) = project.end_date {
        println!("Target completion: {}", format_long_date(end));
    }
    if let Some(contractor) = &project.contractor {
        println!("Contractor: {contractor}");
    }
    if let Some(source) = &project.funding_source {
        println!("Funding source: {source}");
    }
    if let Some(progress) = project.progress {
        println!("Progress: {progress}%");
    }
    for update in &project.progress_updates {
        println!(
            "  {}  {}%  {}",
            format_long_date(update.recorded_at),
            update.percent,
            update.note.as_deref().unwrap_or_default(),
        );
    }
    Ok(())
}

fn forums_list(session: &Session, json: bool) -> Result<()> {
    let forums = session.db.forums.records();
    if json {
        println!("{}", serde_json::to_string_pretty(forums)?);
        return Ok(());
    }
    let mut ordered: Vec<&Forum> = forums.iter().collect();
    newest_first(&mut ordered);
    for forum in ordered {
        println!(
            "{}  {}  by {}  ({})",
            forum.id,
            forum.title,
            forum.author.name,
            format_long_date(forum.created_at),
        );
    }
    Ok(())
}
