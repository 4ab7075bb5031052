use anyhow::{anyhow, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Declares a closed enumeration with its snake_case wire value and a
/// human-readable label.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(value: &str) -> Result<Self> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(anyhow!("Unknown {}: {value}", stringify!($name))),
                }
            }
        }
    };
}

closed_enum! {
    ComplaintCategory {
        Noise => ("noise", "Noise"),
        Sanitation => ("sanitation", "Sanitation"),
        PublicSafety => ("public_safety", "Public Safety"),
        Traffic => ("traffic", "Traffic"),
        Infrastructure => ("infrastructure", "Infrastructure"),
        WaterElectricity => ("water_electricity", "Water & Electricity"),
        Domestic => ("domestic", "Domestic"),
        Environment => ("environment", "Environment"),
        Others => ("others", "Others"),
    }
}

closed_enum! {
    /// Complaint lifecycle. `Submitted` is the initial state; `Dismissed`
    /// can be reached from any state before `Resolved`.
    ComplaintStatus {
        Submitted => ("submitted", "Submitted"),
        UnderReview => ("under_review", "Under Review"),
        Scheduled => ("scheduled", "Scheduled"),
        InProgress => ("in_progress", "In Progress"),
        Resolved => ("resolved", "Resolved"),
        Dismissed => ("dismissed", "Dismissed"),
    }
}

impl ComplaintStatus {
    /// Statuses whose complaints are only shown to their submitter.
    pub fn is_restricted(self) -> bool {
        matches!(self, ComplaintStatus::Submitted | ComplaintStatus::Dismissed)
    }
}

closed_enum! {
    Priority {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
        Urgent => ("urgent", "Urgent"),
    }
}

closed_enum! {
    ProjectCategory {
        Infrastructure => ("infrastructure", "Infrastructure"),
        Health => ("health", "Health"),
        Education => ("education", "Education"),
        Environment => ("environment", "Environment"),
        Livelihood => ("livelihood", "Livelihood"),
        DisasterPreparedness => ("disaster_preparedness", "Disaster Preparedness"),
        SocialServices => ("social_services", "Social Services"),
        SportsCulture => ("sports_culture", "Sports & Culture"),
        Others => ("others", "Others"),
    }
}

closed_enum! {
    /// Project lifecycle: planned -> approved -> ongoing, then one of
    /// on_hold, completed or cancelled.
    ProjectStatus {
        Planned => ("planned", "Planned"),
        Approved => ("approved", "Approved"),
        Ongoing => ("ongoing", "Ongoing"),
        OnHold => ("on_hold", "On Hold"),
        Completed => ("completed", "Completed"),
        Cancelled => ("cancelled", "Cancelled"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageRef {
    pub uri: String,
}

/// Identity of a submitter, author or commenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Reply {
    pub id: String,
    pub author: Person,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    pub id: String,
    pub author: Person,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// Likes, dislikes and threaded comments attached to a complaint or project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Engagement {
    #[serde(default)]
    pub likes: BTreeSet<String>,
    #[serde(default)]
    pub dislikes: BTreeSet<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Complaint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub submitter: Person,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub engagement: Engagement,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub submitter: Person,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// Fields an update may touch. Anything else on a complaint (id,
/// submitter, engagement, timestamps) is owned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ComplaintPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ComplaintCategory>,
    pub status: Option<ComplaintStatus>,
    pub priority: Option<Priority>,
    pub location: Option<Location>,
    pub images: Option<Vec<ImageRef>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressUpdate {
    pub percent: u8,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub start_date: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schemars(with = "Option<String>")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub contractor: Option<String>,
    #[serde(default)]
    pub funding_source: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub engagement: Engagement,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub progress_updates: Vec<ProgressUpdate>,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub start_date: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schemars(with = "Option<String>")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub contractor: Option<String>,
    #[serde(default)]
    pub funding_source: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schemars(with = "Option<String>")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schemars(with = "Option<String>")]
    pub end_date: Option<OffsetDateTime>,
    pub budget: Option<f64>,
    pub contractor: Option<String>,
    pub funding_source: Option<String>,
    pub location: Option<Location>,
    pub images: Option<Vec<ImageRef>>,
}

/// Community board post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Forum {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: Person,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NewForum {
    pub title: String,
    pub description: String,
    pub author: Person,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ForumPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}
