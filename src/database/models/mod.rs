pub mod profile;
pub mod user;

pub use profile::{ProfileChanges, ProfileField, ProfileUpdate};
pub use user::{UserRecord, USER_COLUMNS};
