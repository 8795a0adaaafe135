//! Storage backend traits.

mod call_up;
mod personnel;

pub use call_up::CallUpStore;
pub use personnel::PersonnelStore;
