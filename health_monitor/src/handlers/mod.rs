//! HTTP handlers exposing the monitor

pub mod health;
pub mod routes;
