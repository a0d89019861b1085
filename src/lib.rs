//! Photovoltaic energy yield estimation from monthly climate data.

#[cfg(feature = "api")]
pub mod api;
pub mod climate;
pub mod config;
/// CSV export of results and import templates.
pub mod io;
/// Solar geometry, irradiance decomposition, thermal and PR models.
pub mod model;
