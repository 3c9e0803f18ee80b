//! Launch mutation services.
//!
//! Each service receives its [`Database`](crate::db::Database) handle
//! explicitly; none of them holds cached state across calls, so the store
//! stays the single source of truth.

mod allocator;
mod lifecycle;
mod scheduling;

pub use allocator::FlightNumberAllocator;
pub use lifecycle::{AbortError, LifecycleManager};
pub use scheduling::{ScheduleError, SchedulingService};
