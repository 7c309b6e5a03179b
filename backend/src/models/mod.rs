//! Domain types for capacity planning.

pub mod capacity;
pub mod iteration;

pub use capacity::*;
pub use iteration::*;
