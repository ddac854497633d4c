//! TRACESCOPE Replay
//!
//! Reads the newline-delimited network and DOM logs of a recorded trace and
//! replays them, in file order, into a [`tracescope_index::TraceStorage`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod loader;
pub mod trace;

pub use error::LoadError;
pub use loader::{LoadReport, LoaderConfig, TraceLoader, load_trace};
pub use trace::{TraceLog, parse_lines};
