//! Command-line front end for the iPython history parser.

pub mod cli;
pub mod logging;
