//! Transcoding job and preset persistence over a hash-oriented key/value
//! store, with a thin REST surface on top.

pub mod app;
pub mod common;
pub mod config;
pub mod docs;
pub mod infrastructure;
pub mod marshal;
pub mod modules;
pub mod repository;
pub mod routes;
pub mod state;
