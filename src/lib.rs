//! Folio - a small blog and project portfolio site
//!
//! This library provides the core functionality served by the `folio` binary.

pub mod api;
pub mod config;
pub mod db;
pub mod forms;
pub mod models;
pub mod services;
pub mod theme;
