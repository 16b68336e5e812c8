// Matching engine: label normalization, similarity scoring, best-match
// selection. Pure functions with no I/O and no shared state; safe to call
// from any number of threads or tasks at once.

pub mod normalize;
pub mod selector;
pub mod similarity;
