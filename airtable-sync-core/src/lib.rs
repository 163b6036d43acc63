#![doc = "airtable-sync-core: core logic library for airtable-sync."]

//! This crate holds everything that is not CLI glue: the record model, the
//! field normaliser, the Airtable client, the CSV writer and the pipeline that
//! ties them together.
//!
//! # Usage
//! Build a [`config::SyncJob`] (or take one from [`presets`]), pick a
//! [`contract::RecordSource`] and call [`synchronise::synchronise`].

pub mod config;
pub mod contract;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod presets;
pub mod schema;
pub mod summary;
pub mod synchronise;
pub mod value;
pub mod write;

pub use error::SyncError;
