//! Domain models for Mission Control.
//!
//! Two durable entity kinds:
//!
//! - [`Launch`]: a mission launch keyed by its flight number. Launches are
//!   never deleted; aborting marks them `upcoming=false`, `success=false`.
//! - [`Planet`]: a habitable planet candidate keyed by its Kepler name,
//!   produced by the CSV classification pipeline.

mod launch;
mod planet;

pub use launch::*;
pub use planet::*;
