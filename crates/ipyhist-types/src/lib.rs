//! Shared types for the iPython history parser.

mod artifact;
mod cell;
mod record;

pub use artifact::*;
pub use cell::*;
pub use record::*;
