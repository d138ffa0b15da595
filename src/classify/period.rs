// src/classify/period.rs

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::territory::TerritoryClass;

pub const OTHER_PERIOD: &str = "OTRO";

/// `NaiveDate` literal usable in `static` tables.
const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

/// Evaluation window. Both ends inclusive; `end: None` never closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub label: &'static str,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl PeriodWindow {
    const fn closed(label: &'static str, start: NaiveDate, end: NaiveDate) -> Self {
        Self { label, start, end: Some(end) }
    }

    const fn open(label: &'static str, start: NaiveDate) -> Self {
        Self { label, start, end: None }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.map_or(true, |end| date <= end)
    }
}

// ───────────────────────────────────────
// CAS calendars, in chronological order.
// Windows are literal and leave gaps; new quarters get new rows.
// ───────────────────────────────────────
pub static LOCAL_PERIODS: [PeriodWindow; 4] = [
    PeriodWindow::closed("NL-T1-2025", ymd(2025, 3, 12), ymd(2025, 4, 16)),
    PeriodWindow::closed("NL-T2-2025", ymd(2025, 6, 11), ymd(2025, 8, 18)),
    PeriodWindow::closed("NL-T3-2025", ymd(2025, 8, 19), ymd(2025, 10, 9)),
    PeriodWindow::open("NL-T4-2025", ymd(2025, 10, 30)),
];

pub static FOREIGN_PERIODS: [PeriodWindow; 2] = [
    PeriodWindow::closed("FOR-S1-2025", ymd(2025, 4, 10), ymd(2025, 6, 9)),
    PeriodWindow::closed("FOR-S2-2025", ymd(2025, 7, 30), ymd(2025, 11, 7)),
];

pub fn catalog(territory: TerritoryClass) -> &'static [PeriodWindow] {
    match territory {
        TerritoryClass::Local => &LOCAL_PERIODS,
        TerritoryClass::Foreign => &FOREIGN_PERIODS,
    }
}

/// A resolved period. `order` is the window's position in its catalog and
/// is what trends sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodLabel {
    Cas { label: &'static str, order: usize },
    Other,
}

impl PeriodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodLabel::Cas { label, .. } => *label,
            PeriodLabel::Other => OTHER_PERIOD,
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, PeriodLabel::Other)
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PeriodLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn resolve_period(date: NaiveDate, territory: TerritoryClass) -> PeriodLabel {
    catalog(territory)
        .iter()
        .enumerate()
        .find(|(_, window)| window.contains(date))
        .map(|(order, window)| PeriodLabel::Cas { label: window.label, order })
        .unwrap_or(PeriodLabel::Other)
}

// ───────────────────────────────────────
// Trends per period
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTrend {
    pub periodo: &'static str,
    pub evaluaciones: usize,
    pub promedio: f64,
    pub minimo: f64,
    pub maximo: f64,
}

#[derive(Debug, Default)]
struct ScoreAcc {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl ScoreAcc {
    fn push(&mut self, score: f64) {
        if self.count == 0 {
            self.min = score;
            self.max = score;
        } else {
            self.min = self.min.min(score);
            self.max = self.max.max(score);
        }
        self.count += 1;
        self.sum += score;
    }
}

/// Same rounding as `ROUND(x, 2)` in the dashboard queries.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Buckets one branch's supervisions by CAS period. Records outside every
/// window (`OTRO`) and non-finite scores are dropped. Output follows catalog
/// order, not label order.
pub fn period_trends<I>(records: I, territory: TerritoryClass) -> Vec<PeriodTrend>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut buckets: BTreeMap<usize, (&'static str, ScoreAcc)> = BTreeMap::new();

    for (date, score) in records {
        if !score.is_finite() {
            continue;
        }
        if let PeriodLabel::Cas { label, order } = resolve_period(date, territory) {
            buckets
                .entry(order)
                .or_insert_with(|| (label, ScoreAcc::default()))
                .1
                .push(score);
        }
    }

    buckets
        .into_values()
        .map(|(label, acc)| PeriodTrend {
            periodo: label,
            evaluaciones: acc.count,
            promedio: round2(acc.sum / acc.count as f64),
            minimo: acc.min,
            maximo: acc.max,
        })
        .collect()
}
