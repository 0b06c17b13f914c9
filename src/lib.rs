//! FTTH planner backend
//!
//! Resamples route geometry at fixed distance steps, stores routes and
//! deployment configurations, fetches elevation profiles from ArcGIS and asks
//! Cohere for deployment recommendations.

pub mod actions;
pub mod analysis;
pub mod config;
pub mod configs;
pub mod configs_repo;
pub mod db;
pub mod elevation;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod recommendations;
pub mod route_records;
pub mod route_records_repo;
pub mod schema;
pub mod web;

pub use error::{AnalysisError, AppError, ValidationError};
