// src/classify/mod.rs
//
// Pure classification core: GPS -> state, branch -> territory,
// supervision date -> CAS period. Everything here is total and allocation-free
// apart from trend aggregation.

pub mod geo;
pub mod performance;
pub mod period;
pub mod territory;

pub use geo::GeoClassifier;
pub use period::{period_trends, resolve_period, PeriodLabel, PeriodTrend};
pub use territory::{classify_group, classify_territory, GroupTerritory, TerritoryClass};
