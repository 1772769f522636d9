//! ServicePulse library exports

pub mod aggregation;
pub mod buffer;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod tasks;
