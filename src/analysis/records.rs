//! Result records
//!
//! Each record summarises one query on one monitored location. Records are
//! handed to writers through a small contract: a header, a data row, a free
//! text rendering, a filename-safe identifier and a severity comparison.
//!
//! # Severity
//!
//! - **Maximum**, **MaxPercentExceedance**: a higher value is worse
//! - **Exceedance**, **PercentExceedance**: an earlier time index is worse
//!
//! A valid record is always worse than an invalid one. Records of different
//! geometry classes or of different shapes cannot be compared.

use std::cmp::Ordering;
use std::fmt;

use crate::analysis::Geometry;
use crate::error::RecordError;

/// Quantity a record was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Concentration,
    Exposure,
}

impl Quantity {
    pub const fn name(self) -> &'static str {
        match self {
            Quantity::Concentration => "concentration",
            Quantity::Exposure => "exposure",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape-specific content of a record
///
/// `time` is the simulated time of the time index, `None` when the index is
/// absent.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordDetail {
    Maximum {
        index: Option<Vec<usize>>,
        value: f64,
        time: Option<f64>,
    },
    Exceedance {
        index: Option<Vec<usize>>,
        threshold: f64,
        time: Option<f64>,
    },
    PercentExceedance {
        time_index: Option<usize>,
        threshold: f64,
        required_percent: f64,
        time: Option<f64>,
    },
    MaxPercentExceedance {
        time_index: Option<usize>,
        achieved_percent: f64,
        threshold: f64,
        time: Option<f64>,
    },
}

/// One derived summary of a monitored location
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub geometry: Geometry,
    pub location_id: String,
    pub quantity: Quantity,
    pub detail: RecordDetail,
}

impl ResultRecord {
    pub fn new(geometry: Geometry, location_id: impl Into<String>, quantity: Quantity, detail: RecordDetail) -> Self {
        Self {
            geometry,
            location_id: location_id.into(),
            quantity,
            detail,
        }
    }

    /// Record shape name
    pub fn kind(&self) -> &'static str {
        match self.detail {
            RecordDetail::Maximum { .. } => "maximum",
            RecordDetail::Exceedance { .. } => "exceedance",
            RecordDetail::PercentExceedance { .. } => "percent_exceedance",
            RecordDetail::MaxPercentExceedance { .. } => "max_percent_exceedance",
        }
    }

    /// Time index of the record, if present
    pub fn time_index(&self) -> Option<usize> {
        match &self.detail {
            RecordDetail::Maximum { index, .. } | RecordDetail::Exceedance { index, .. } => {
                index.as_ref().and_then(|i| i.first().copied())
            }
            RecordDetail::PercentExceedance { time_index, .. }
            | RecordDetail::MaxPercentExceedance { time_index, .. } => *time_index,
        }
    }

    /// Simulated time of the record \[s\], if present
    pub fn time(&self) -> Option<f64> {
        match self.detail {
            RecordDetail::Maximum { time, .. }
            | RecordDetail::Exceedance { time, .. }
            | RecordDetail::PercentExceedance { time, .. }
            | RecordDetail::MaxPercentExceedance { time, .. } => time,
        }
    }

    /// True when the record's index is present
    pub fn is_valid(&self) -> bool {
        self.time_index().is_some()
    }

    /// Column names of [`row`](Self::row)
    pub fn header(&self) -> Vec<String> {
        let specific: &[&str] = match self.detail {
            RecordDetail::Maximum { .. } => &["index", "time", "value"],
            RecordDetail::Exceedance { .. } => &["threshold", "index", "time"],
            RecordDetail::PercentExceedance { .. } => &["threshold", "required_percent", "time_index", "time"],
            RecordDetail::MaxPercentExceedance { .. } => &["threshold", "time_index", "time", "achieved_percent"],
        };

        ["geometry", "location", "quantity"]
            .iter()
            .chain(specific)
            .map(|column| column.to_string())
            .collect()
    }

    /// Values matching [`header`](Self::header); derived columns read
    /// `"None"` when the record is invalid
    pub fn row(&self) -> Vec<String> {
        let valid = self.is_valid();
        let derived = |value: String| if valid { value } else { "None".to_string() };
        let time = || derived(self.time().map_or_else(String::new, |t| t.to_string()));

        let mut row = vec![
            self.geometry.to_string(),
            self.location_id.clone(),
            self.quantity.to_string(),
        ];

        match &self.detail {
            RecordDetail::Maximum { index, value, .. } => {
                row.push(derived(format_index(index)));
                row.push(time());
                row.push(derived(value.to_string()));
            }
            RecordDetail::Exceedance { index, threshold, .. } => {
                row.push(threshold.to_string());
                row.push(derived(format_index(index)));
                row.push(time());
            }
            RecordDetail::PercentExceedance {
                time_index,
                threshold,
                required_percent,
                ..
            } => {
                row.push(threshold.to_string());
                row.push(required_percent.to_string());
                row.push(derived(time_index.map_or_else(String::new, |t| t.to_string())));
                row.push(time());
            }
            RecordDetail::MaxPercentExceedance {
                time_index,
                achieved_percent,
                threshold,
                ..
            } => {
                row.push(threshold.to_string());
                row.push(derived(time_index.map_or_else(String::new, |t| t.to_string())));
                row.push(time());
                row.push(derived(achieved_percent.to_string()));
            }
        }
        row
    }

    /// Filename-safe name: `[A-Za-z0-9_-]` only
    pub fn identifier(&self) -> String {
        let mut raw = format!("{}_{}_{}_{}", self.quantity, self.geometry, self.location_id, self.kind());
        match self.detail {
            RecordDetail::Maximum { .. } => {}
            RecordDetail::Exceedance { threshold, .. } | RecordDetail::MaxPercentExceedance { threshold, .. } => {
                raw.push_str(&format!("_{}", threshold));
            }
            RecordDetail::PercentExceedance {
                threshold,
                required_percent,
                ..
            } => raw.push_str(&format!("_{}_{}pct", threshold, required_percent)),
        }

        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect()
    }

    /// Compare severity; `Greater` means `self` is worse than `other`
    ///
    /// # Example
    ///
    /// ```rust
    /// use disperse_rs::analysis::{Geometry, Quantity, RecordDetail, ResultRecord};
    /// use std::cmp::Ordering;
    ///
    /// let at = |t: usize| ResultRecord::new(
    ///     Geometry::Point,
    ///     "desk",
    ///     Quantity::Concentration,
    ///     RecordDetail::Exceedance { index: Some(vec![t]), threshold: 1.0, time: Some(t as f64) },
    /// );
    ///
    /// // Reaching the threshold sooner is worse
    /// assert_eq!(at(2).severity_cmp(&at(5)), Ok(Ordering::Greater));
    /// ```
    pub fn severity_cmp(&self, other: &ResultRecord) -> Result<Ordering, RecordError> {
        if self.geometry != other.geometry {
            return Err(RecordError::GeometryMismatch {
                left: self.geometry,
                right: other.geometry,
            });
        }
        if self.kind() != other.kind() {
            return Err(RecordError::KindMismatch {
                left: self.kind(),
                right: other.kind(),
            });
        }

        let ordering = match (self.is_valid(), other.is_valid()) {
            (false, false) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => match (&self.detail, &other.detail) {
                (RecordDetail::Maximum { value: a, .. }, RecordDetail::Maximum { value: b, .. }) => a.total_cmp(b),
                (
                    RecordDetail::MaxPercentExceedance { achieved_percent: a, .. },
                    RecordDetail::MaxPercentExceedance { achieved_percent: b, .. },
                ) => a.total_cmp(b),
                // Exceedance shapes: sooner is worse
                _ => other.time_index().cmp(&self.time_index()),
            },
        };
        Ok(ordering)
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = format!("{} '{}'", self.geometry, self.location_id);
        let when = self.time().map_or_else(String::new, |t| format!(" at t = {} s", t));

        match &self.detail {
            RecordDetail::Maximum { index, value, .. } => match index {
                Some(_) => write!(
                    f,
                    "maximum {} at {}: {}{} (index {})",
                    self.quantity,
                    location,
                    value,
                    when,
                    format_index(index)
                ),
                None => write!(f, "maximum {} at {}: no data", self.quantity, location),
            },
            RecordDetail::Exceedance { index, threshold, .. } => match index {
                Some(_) => write!(
                    f,
                    "{} at {} reaches {}{} (index {})",
                    self.quantity,
                    location,
                    threshold,
                    when,
                    format_index(index)
                ),
                None => write!(f, "{} at {} never reaches {}", self.quantity, location, threshold),
            },
            RecordDetail::PercentExceedance {
                time_index,
                threshold,
                required_percent,
                ..
            } => match time_index {
                Some(_) => write!(
                    f,
                    "{}% of {} reaches {} {}{}",
                    required_percent, location, self.quantity, threshold, when
                ),
                None => write!(
                    f,
                    "{}% of {} never reaches {} {}",
                    required_percent, location, self.quantity, threshold
                ),
            },
            RecordDetail::MaxPercentExceedance {
                time_index,
                achieved_percent,
                threshold,
                ..
            } => match time_index {
                Some(_) => write!(
                    f,
                    "at most {}% of {} reaches {} {}{}",
                    achieved_percent, location, self.quantity, threshold, when
                ),
                None => write!(
                    f,
                    "no part of {} reaches {} {}",
                    location, self.quantity, threshold
                ),
            },
        }
    }
}

/// Most severe record of a slice; the first one wins ties
///
/// Fails when the records do not share geometry class and shape.
pub fn worst_case(records: &[ResultRecord]) -> Result<Option<&ResultRecord>, RecordError> {
    let mut worst: Option<&ResultRecord> = None;
    for record in records {
        let replace = match worst {
            Some(current) => record.severity_cmp(current)? == Ordering::Greater,
            None => true,
        };
        if replace {
            worst = Some(record);
        }
    }
    Ok(worst)
}

fn format_index(index: &Option<Vec<usize>>) -> String {
    match index {
        Some(index) => format!("{:?}", index),
        None => "None".to_string(),
    }
}

// =================================================================================================
// Tests
// =================================================================================================
