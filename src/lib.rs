//! Terminal dashboard for a delivery service's `/json` server metrics endpoint.
//!
//! The view pulls one snapshot per refresh, maps it to display values and
//! draws it with ratatui. Missing fields degrade to placeholders; fetch
//! failures surface as an error panel with a retry key.

pub mod app;
pub mod cli;
pub mod core;
pub mod screens;
pub mod utils;
