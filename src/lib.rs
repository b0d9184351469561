//! Compare long-run wealth, salary and passive income under four lifestyle
//! strategies using a deterministic year-by-year projection.

pub mod api;
pub mod core;
pub mod logging;
pub mod report;
