//! Backend abstraction layer
//!
//! [`GlBackend`] is the seam to the graphics context: shader reflection,
//! uniform uploads and texture binding. The dummy backend records calls
//! instead of issuing them and backs the tests and benches.

pub mod traits;
pub mod types;

#[cfg(feature = "dummy")]
pub mod dummy;

pub use traits::*;
pub use types::*;

#[cfg(feature = "dummy")]
pub use dummy::{DummyBackend, DummyLocation, DummyProgram, GlCall};
