//! Cache-aside repositories.
//!
//! Repositories sit between the services and the relational store. Point
//! lookups are served from an [`ExpiringCache`](crate::storage::ExpiringCache)
//! when possible; every mutation writes through to the store and then
//! invalidates the affected entry. Absence is reported as `None`, the services
//! decide when it is an error.

mod call_up;
mod personnel;

pub use call_up::CallUpRepository;
pub use personnel::PersonnelRepository;
