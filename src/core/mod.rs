//! Core types, configuration and remote plumbing

pub mod adapter;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod errors;
pub mod models;
pub mod providers;
pub mod script;
