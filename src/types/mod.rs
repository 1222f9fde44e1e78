//! Shared types.

pub mod config;
pub mod errors;
pub mod models;
pub mod requests;
pub mod responses;
