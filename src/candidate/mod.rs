//! Candidate ordering and non-overlap selection.

pub(crate) mod peak;
pub(crate) mod select;
