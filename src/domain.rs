//! Domain models for the organisation directory.
//!
//! This module contains the hierarchy builder at the heart of the org charts,
//! the entities it is fed with, and configuration.

/// Single-pass hierarchy construction.
pub mod hierarchy;
pub use hierarchy::{BuildError, Entity, Hierarchy, HierarchyBuilder, Node, NodeId, Record};

/// Companies and their codes.
pub mod company;
pub use company::{Company, CompanyCode, CompanyStatus};

/// Departments within companies.
pub mod department;
pub use department::{Department, DepartmentName, DepartmentStatus};

mod geolocation;
pub use geolocation::{CoordinateError, Geolocation};

pub mod collation;

/// Users and how they are labelled.
pub mod user;
pub use user::{PersonName, User, UserLabel};

/// Populated records for building org charts.
pub mod records;
pub use records::{CompanyRecord, EntityRef, UserRecord};

mod config;
pub use config::Config;
