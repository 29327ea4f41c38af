//! Filesystem layout and output writing

pub mod paths;
pub mod writer;

pub use paths::PortfolioPaths;
pub use writer::write_json_atomic;
