// saltmatch: find an inexpensive generic equivalent for a branded medicine
//
// This is the library root. `matching` is the pure engine; the other
// modules are the plumbing around it.

pub mod catalog;
pub mod config;
pub mod identify;
pub mod matching;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod status;
