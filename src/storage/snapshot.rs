use serde::{Deserialize, Serialize};

use crate::domain::{Company, Department, Geolocation, User};

/// The full contents of an organisation directory, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Snapshot {
    /// All companies, in stored order.
    pub companies: Vec<Company>,
    /// All departments, in stored order.
    pub departments: Vec<Department>,
    /// All users, in stored order.
    pub users: Vec<User>,
    /// All geolocations, in stored order.
    pub geolocations: Vec<Geolocation>,
}

/// The serialized versions of the snapshot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        companies: Vec<Company>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        departments: Vec<Department>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        users: Vec<User>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        geolocations: Vec<Geolocation>,
    },
}

impl From<Versions> for Snapshot {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                companies,
                departments,
                users,
                geolocations,
            } => Self {
                companies,
                departments,
                users,
                geolocations,
            },
        }
    }
}

impl From<Snapshot> for Versions {
    fn from(snapshot: Snapshot) -> Self {
        Self::V1 {
            companies: snapshot.companies,
            departments: snapshot.departments,
            users: snapshot.users,
            geolocations: snapshot.geolocations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_an_empty_snapshot() {
        let snapshot: Snapshot = serde_yaml::from_str("_version: '1'\n").unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn unknown_version_is_rejected() {
        assert!(serde_yaml::from_str::<Snapshot>("_version: '2'\n").is_err());
    }

    #[test]
    fn reads_all_collections() {
        let yaml = r"
_version: '1'
companies:
  - id: 00000000-0000-0000-0000-000000000001
    name: Arveti
    code: '1'
    status: active
departments:
  - id: 00000000-0000-0000-0000-000000000010
    company: 00000000-0000-0000-0000-000000000001
    name: Finance
users:
  - id: 00000000-0000-0000-0000-000000000100
    givenName: Karin
    surname: Holm
    department: 00000000-0000-0000-0000-000000000010
geolocations:
  - id: 00000000-0000-0000-0000-000000001000
    latitude: 59.33
    longitude: 18.07
    city: Stockholm
";
        let snapshot: Snapshot = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(snapshot.companies[0].code.as_str(), "0001");
        assert_eq!(snapshot.departments[0].name.as_str(), "Finance");
        assert_eq!(snapshot.users[0].full_name(), "Karin Holm");
        assert_eq!(snapshot.geolocations[0].city.as_deref(), Some("Stockholm"));
    }
}
