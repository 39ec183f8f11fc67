use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors raised for out-of-range coordinates.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    /// Latitude outside -90..=90.
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    /// Longitude outside -180..=180.
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
}

/// A site that companies and departments operate from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geolocation {
    /// Unique identifier.
    pub id: Uuid,
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// City name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// The main language spoken on site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_language: Option<String>,
}

impl Geolocation {
    /// Checks that both coordinates are in range.
    ///
    /// # Errors
    ///
    /// Returns the first coordinate found out of range.
    pub fn check(&self) -> Result<(), CoordinateError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoordinateError::Latitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoordinateError::Longitude(self.longitude));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(latitude: f64, longitude: f64) -> Geolocation {
        Geolocation {
            id: Uuid::new_v4(),
            latitude,
            longitude,
            city: Some("Stockholm".to_string()),
            primary_language: None,
        }
    }

    #[test]
    fn accepts_coordinates_in_range() {
        assert_eq!(site(59.33, 18.07).check(), Ok(()));
        assert_eq!(site(-90.0, 180.0).check(), Ok(()));
    }

    #[test]
    fn rejects_coordinates_out_of_range() {
        assert_eq!(site(91.0, 0.0).check(), Err(CoordinateError::Latitude(91.0)));
        assert_eq!(
            site(0.0, -180.5).check(),
            Err(CoordinateError::Longitude(-180.5))
        );
    }
}
