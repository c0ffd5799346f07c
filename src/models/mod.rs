//! Data models for the SAGE survey backend.
//!
//! Field names are the snake_case wire format consumed by the dashboard.

mod analysis;
mod response;
mod survey;

pub use analysis::*;
pub use response::*;
pub use survey::*;
