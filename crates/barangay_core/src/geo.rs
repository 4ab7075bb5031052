//! Contracts with the device location service, the reverse geocoder and
//! the static map renderer. Failures here never block record creation:
//! they degrade to `None` or a coordinate string.

use crate::schema::Coordinates;
use crate::settings::MapSettings;
use anyhow::Result;
use tracing::warn;

pub trait LocationProvider {
    /// Fails when permission is denied or no fix is available.
    fn current_position(&self) -> Result<Coordinates>;
}

/// Address components as returned by a reverse geocoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceParts {
    pub street: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

pub trait ReverseGeocoder {
    fn lookup(&self, at: Coordinates) -> Result<Option<PlaceParts>>;
}

/// Position for a new report, or `None` if the device won't say.
pub fn locate(provider: &dyn LocationProvider) -> Option<Coordinates> {
    match provider.current_position() {
        Ok(position) => Some(position),
        Err(err) => {
            warn!(error = %err, "location unavailable; leaving it unset");
            None
        }
    }
}

/// Device position, or the configured map center when there is none.
pub fn locate_or_default(provider: &dyn LocationProvider, map: &MapSettings) -> Coordinates {
    locate(provider).unwrap_or_else(|| map.default_center())
}

pub fn format_coordinates(at: Coordinates) -> String {
    format!("{:.6}, {:.6}", at.latitude, at.longitude)
}

/// Best-effort street address for `at`.
pub fn resolve_address(geocoder: &dyn ReverseGeocoder, at: Coordinates) -> String {
    let parts = match geocoder.lookup(at) {
        Ok(parts) => parts,
        Err(err) => {
            warn!(error = %err, "reverse geocoding failed; using coordinates");
            None
        }
    };

    let joined = parts
        .map(|parts| {
            [parts.street, parts.district, parts.city, parts.region]
                .into_iter()
                .flatten()
                .filter(|part| !part.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    if joined.is_empty() {
        format_coordinates(at)
    } else {
        joined
    }
}

/// Static preview image URL for a pin at `at`.
pub fn map_preview_url(map: &MapSettings, at: Coordinates) -> String {
    let center = format!("{},{}", at.latitude, at.longitude);
    format!(
        "https://maps.googleapis.com/maps/api/staticmap?center={center}&zoom={zoom}&size={width}x{height}&maptype={maptype}&markers=color:red%7Clabel:S%7C{center}&key={key}",
        zoom = map.zoom,
        width = map.width,
        height = map.height,
        maptype = map.maptype,
        key = map.api_key.as_deref().unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    const HALL: Coordinates = Coordinates {
        latitude: 14.5995,
        longitude: 120.9842,
    };

    struct Denied;

    impl LocationProvider for Denied {
        fn current_position(&self) -> Result<Coordinates> {
            Err(anyhow!("permission denied"))
        }
    }

    struct Fixed(Coordinates);

    impl LocationProvider for Fixed {
        fn current_position(&self) -> Result<Coordinates> {
            Ok(self.0)
        }
    }

    struct Canned(Result<Option<PlaceParts>, &'static str>);

    impl ReverseGeocoder for Canned {
        fn lookup(&self, _at: Coordinates) -> Result<Option<PlaceParts>> {
            self.0.clone().map_err(|msg| anyhow!(msg))
        }
    }

    #[test]
    fn denied_location_stays_unset() {
        assert_eq!(locate(&Denied), None);
        assert_eq!(locate(&Fixed(HALL)), Some(HALL));
    }

    #[test]
    fn denied_location_falls_back_to_map_center() {
        let map = MapSettings::default();
        let center = locate_or_default(&Denied, &map);
        assert_eq!(center.latitude, 14.318828);
        assert_eq!(center.longitude, 121.102873);
        assert_eq!(locate_or_default(&Fixed(HALL), &map), HALL);
    }

    #[test]
    fn address_joins_present_parts() {
        let geocoder = Canned(Ok(Some(PlaceParts {
            street: Some("Main Street".to_string()),
            district: None,
            city: Some("Manila".to_string()),
            region: Some("Metro Manila".to_string()),
        })));
        assert_eq!(
            resolve_address(&geocoder, HALL),
            "Main Street, Manila, Metro Manila"
        );
    }

    #[test]
    fn address_falls_back_to_coordinates() {
        let empty = Canned(Ok(Some(PlaceParts::default())));
        assert_eq!(resolve_address(&empty, HALL), "14.599500, 120.984200");
        let none = Canned(Ok(None));
        assert_eq!(resolve_address(&none, HALL), "14.599500, 120.984200");
        let failing = Canned(Err("quota exceeded"));
        assert_eq!(resolve_address(&failing, HALL), "14.599500, 120.984200");
    }

    #[test]
    fn preview_url_carries_center_and_key() {
        let map = MapSettings {
            api_key: Some("test-key".to_string()),
            ..MapSettings::default()
        };
        let url = map_preview_url(&map, HALL);
        assert!(url.starts_with("https://maps.googleapis.com/maps/api/staticmap?"));
        assert!(url.contains("center=14.5995,120.9842"));
        assert!(url.contains("zoom=14&size=400x200&maptype=roadmap"));
        assert!(url.contains("markers=color:red%7Clabel:S%7C14.5995,120.9842"));
        assert!(url.ends_with("key=test-key"));
    }
}
