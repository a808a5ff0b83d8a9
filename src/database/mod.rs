pub mod directory;
pub mod manager;
pub mod models;
pub mod profile_store;

pub use directory::{PgUserDirectory, UserDirectory};
pub use manager::{DatabaseError, DatabaseManager, ServicePool, UserPool};
pub use models::{ProfileChanges, ProfileField, ProfileUpdate, UserRecord};
pub use profile_store::{PgProfileStore, ProfileStore};
