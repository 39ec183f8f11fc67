//! Organisational directory with org charts
//!
//! Companies, departments, users and geolocations are kept in a YAML snapshot.
//! Org charts are assembled from flat record sets by a single-pass
//! [`Hierarchy`] builder.

pub mod domain;
pub use domain::{
    BuildError, Company, Config, Department, Geolocation, Hierarchy, HierarchyBuilder, Node,
    NodeId, User,
};

/// Snapshot storage and directory queries.
pub mod storage;
pub use storage::{Directory, LoadError, Snapshot, ValidationError};

/// Free-text user search.
pub mod search;
pub use search::{SearchError, SearchHit, SearchQuery, search_users};
