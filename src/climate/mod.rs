//! Climate data owned by the caller: records, the versioned store, and
//! tabular imports of climate and measured production.

/// Measured production import.
pub mod actual;
/// Tabular climate import and merge.
pub mod import;
pub mod record;

pub use actual::{ActualRow, actual_series};
pub use import::{ClimateRow, ImportError, ImportReport};
pub use record::{ClimateRecord, ClimateStore, MonthlyClimate};
