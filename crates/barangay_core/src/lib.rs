pub mod clock;
pub mod db;
pub mod display;
pub mod engagement;
pub mod filter;
pub mod geo;
pub mod progress;
pub mod schema;
pub mod settings;
pub mod store;

pub use db::{Db, Seed};
pub use filter::{ComplaintFilter, DateRange, ProjectFilter, Viewer};
pub use settings::Settings;
pub use store::{Record, RecordStore};
