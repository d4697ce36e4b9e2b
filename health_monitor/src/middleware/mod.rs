//! Middleware layers applied to the router

pub mod cors;
pub mod logging;
