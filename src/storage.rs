pub mod directory;
mod snapshot;
mod summary;
mod validation;

pub use directory::{Directory, LoadError, SaveError};
pub use snapshot::Snapshot;
pub use summary::Summary;
pub use validation::ValidationError;
