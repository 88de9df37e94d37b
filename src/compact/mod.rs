//! Scene compaction: folds static subtrees into pre-transformed vertex batches.

/// The compaction pass and its output tree.
pub mod optimizer;
