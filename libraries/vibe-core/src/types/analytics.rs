/// Aggregation result shapes
use std::collections::BTreeMap;

/// hour of day (0-23, UTC) -> emotion -> count
pub type HourlyBreakdown = BTreeMap<u32, BTreeMap<String, i64>>;

/// weekday (0 = Monday .. 6 = Sunday) -> emotion -> count
pub type DailyBreakdown = BTreeMap<u32, BTreeMap<String, i64>>;

/// emotion -> percentage share of all observations
pub type Distribution = BTreeMap<String, f64>;
