//! Business logic services.
//!
//! Services sit on top of the repositories and are the public entry points:
//! they validate before writing and turn a repository absence into
//! [`crate::Error::NotFound`].

mod call_up;
mod personnel;

pub use call_up::{CallUpService, is_valid_call_up};
pub use personnel::PersonnelService;
