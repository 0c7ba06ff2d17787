//! compath-similarity
//!
//! Overlap and name scoring, the exhaustive pairwise engine, and the TSV
//! report writer.

pub mod engine;
pub mod progress;
pub mod report;
pub mod scoring;

pub use engine::{make_similarity_matrices, SimilarityEngine};
pub use progress::ProgressBarObserver;
pub use report::{write_report, TsvReportWriter};
pub use scoring::{overlap, string_similarity};
