//! HTTP proxy server

pub mod api;
