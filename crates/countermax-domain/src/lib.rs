//! Domain layer for countermax
//!
//! Holds the configuration tree that the editing UI mutates (catalogs,
//! shortcut sheets, templates, surveys, sites, users) and the services that
//! derive a consistent per-site counting configuration from it.

pub mod model;
pub mod repository;
pub mod service;
