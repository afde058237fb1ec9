//! # Demand Forecast Backend
//!
//! Heuristic sales-demand forecasting served to a web dashboard.
//!
//! The crate stores a daily sales history and a single active model profile,
//! projects demand forward with a seasonal/weekly/trend heuristic, and
//! simulates model training. Nothing here fits a real model; the training
//! flow exists so the dashboard can exercise it.
//!
//! ## Architecture
//!
//! - [`models`]: observations, hyperparameter profiles and date helpers
//! - [`services`]: the forecasting engine, CSV import, training simulator and
//!   background jobs
//! - [`db`]: repository traits, in-memory and SQLite backends
//! - [`routes`]: JSON wire types and paths
//! - [`http`]: Axum router and handlers (feature `http-server`)
//! - [`config`]: environment-driven server settings

// RepositoryError carries context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
