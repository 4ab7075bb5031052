use crate::db::Seed;
use crate::filter::Viewer;
use crate::schema::Coordinates;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use time::UtcOffset;
use tracing::info;

pub const MAPS_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub map: MapSettings,
    pub seed: Seed,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Signed-in resident the session acts as, if any.
    pub viewer_id: Option<String>,
    /// Whole hours east of UTC that calendar days are counted in.
    pub utc_offset_hours: i8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub api_key: Option<String>,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub maptype: String,
    pub default_latitude: f64,
    pub default_longitude: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            zoom: 14,
            width: 400,
            height: 200,
            maptype: "roadmap".to_string(),
            default_latitude: 14.318828,
            default_longitude: 121.102873,
        }
    }
}

impl MapSettings {
    /// Where the map opens when the device position is unknown.
    pub fn default_center(&self) -> Coordinates {
        Coordinates {
            latitude: self.default_latitude,
            longitude: self.default_longitude,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    general: GeneralSettings,
    #[serde(default)]
    map: MapSettings,
}

impl Settings {
    /// Reads `barangay.toml` and `seed.yaml` from `path`. The maps API key
    /// may also come from the environment, which wins over the file.
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join("barangay.toml");
        let config_str = fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: ConfigFile = toml::from_str(&config_str)
            .with_context(|| format!("parsing {}", config_path.display()))?;

        let seed_path = path.join("seed.yaml");
        let seed_str = fs::read_to_string(&seed_path)
            .with_context(|| format!("reading {}", seed_path.display()))?;
        let seed: Seed = serde_yaml::from_str(&seed_str)
            .with_context(|| format!("parsing {}", seed_path.display()))?;
        seed.validate()
            .with_context(|| format!("validating {}", seed_path.display()))?;

        let settings = Self {
            general: config.general,
            map: config.map,
            seed,
        }
        .with_api_key_override(env::var(MAPS_API_KEY_VAR).ok());
        settings.general.utc_offset()?;

        info!(
            dir = %path.display(),
            complaints = settings.seed.complaints.len(),
            projects = settings.seed.projects.len(),
            forums = settings.seed.forums.len(),
            "settings loaded"
        );
        Ok(settings)
    }

    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|key| !key.trim().is_empty()) {
            self.map.api_key = Some(key);
        }
        self
    }

    /// The configured resident, or an anonymous viewer.
    pub fn viewer(&self) -> Result<Viewer> {
        let viewer = match &self.general.viewer_id {
            Some(id) => Viewer::user(id.clone()),
            None => Viewer::anonymous(),
        };
        Ok(viewer.with_offset(self.general.utc_offset()?))
    }
}

impl GeneralSettings {
    pub fn utc_offset(&self) -> Result<UtcOffset> {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0)
            .map_err(|_| anyhow!("utc_offset_hours out of range: {}", self.utc_offset_hours))
    }
}
