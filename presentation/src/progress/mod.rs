//! Progress reporters for the dispatch phase

pub mod reporter;
