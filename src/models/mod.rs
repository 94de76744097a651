//! Request/response models and domain types.

pub mod actor;
pub mod defect;
pub mod execution;
pub mod status;
pub mod task;
pub mod team;
pub mod test_case;
pub mod test_run;

pub use actor::{Actor, Role};
pub use status::StatusCategory;

use uuid::Uuid;

/// Extract short ID from UUIDv7 (timestamp portion: first 13 chars).
/// Example: "019bcad1-9368-7abc-9def-123456789abc" -> "019bcad1-9368"
pub fn short_id(uuid: &Uuid) -> String {
    let s = uuid.to_string();
    s[..13].to_string()
}
