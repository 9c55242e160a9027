//! trip-planner core
//!
//! Plans a closed multi-stop ride loop greedily by quoted cost, then walks
//! the plan one booked ride at a time.

pub mod api;
pub mod config;
pub mod directory;
pub mod error;
pub mod haversine;
pub mod planner;
pub mod progression;
pub mod service;
pub mod store;
pub mod traits;
pub mod trip;
pub mod uber;
