//! Output assembly for requirecat

pub mod writer;

pub use writer::{LINE_ENDING, OutputWriter, WriteError, WriteSummary};
