//! Terminal presentation and command handlers

pub mod charts;
pub mod convert;
pub mod market;
pub mod picker;
pub mod session;
pub mod setup;
pub mod ui;
