//! Shortleak - URL shortener with user accounts and visit analytics
//!
//! Users register and sign in, submit long URLs and receive short tokens.
//! Every redirect is logged as an append-only event, and per-link statistics
//! (total visits, unique visitors) are aggregated from that log.
//!
//! # Architecture
//! - `storage`: store traits, domain models and the SeaORM backend
//! - `services`: token generation, link allocation, visit logging, stats, auth
//! - `api`: HTTP handlers, middleware and session tokens
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and server mode
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
