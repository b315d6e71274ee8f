//! Data models for the CodeHunt backend.
//!
//! Field names serialize in camelCase to match the existing frontend.

mod requests;
mod responses;
mod team;

pub use requests::*;
pub use responses::*;
pub use team::*;

#[cfg(test)]
pub(crate) use team::fixtures;
