//! Core engine for a map-first food discovery app: visitor session identity,
//! debounced event tracking with background delivery, geo distance helpers,
//! list/map view composition, and the HTTP collector the tracker posts to.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
