//! Solarscope - rooftop photo analysis for solar panel siting
//!
//! Web server and CLI around the `solar_analysis` pipeline: uploads,
//! result pages, a JSON API and demonstration charts.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
