/// Liu & Jordan hourly decomposition of daily irradiance.
pub mod decompose;
pub mod engine;
/// Solar declination and sunset hour angle.
pub mod geometry;
pub mod performance;
/// NOCT cell temperature and thermal derating.
pub mod thermal;
pub mod types;
