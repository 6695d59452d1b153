//! Record extraction
//!
//! Runs the [`DataStore`] queries over every monitored location and turns
//! their answers into [`ResultRecord`]s.
//!
//! Per quantity, per geometry class in table order and per location id in
//! sorted order:
//!
//! - one **Maximum** record
//! - per threshold, one **Exceedance** record
//! - for lines, planes and domains, per threshold, one **PercentExceedance**
//!   and one **MaxPercentExceedance** record

use log::debug;

use crate::analysis::records::{Quantity, RecordDetail, ResultRecord};
use crate::analysis::{DataStore, Geometry};
use crate::error::StoreError;

/// Query runner for one time axis and one set of thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct Analyzer {
    dt: f64,
    percent_target: f64,
}

impl Analyzer {
    /// # Arguments
    ///
    /// * `dt` - Time step of the grids \[s\]
    /// * `percent_target` - Required percentage for PercentExceedance records
    pub fn new(dt: f64, percent_target: f64) -> Self {
        Self { dt, percent_target }
    }

    /// Records of one store
    pub fn analyze(&self, store: &DataStore, quantity: Quantity, thresholds: &[f64]) -> Result<Vec<ResultRecord>, StoreError> {
        let mut records = Vec::new();

        for geometry in Geometry::ALL {
            for id in store.ids(geometry) {
                debug!("analysing {} {} '{}'", quantity, geometry, id);
                records.extend(self.location(store, geometry, id, quantity, thresholds)?);
            }
        }
        Ok(records)
    }

    fn location(
        &self,
        store: &DataStore,
        geometry: Geometry,
        id: &str,
        quantity: Quantity,
        thresholds: &[f64],
    ) -> Result<Vec<ResultRecord>, StoreError> {
        let record = |detail| ResultRecord::new(geometry, id, quantity, detail);
        let mut records = Vec::with_capacity(1 + 3 * thresholds.len());

        let (index, value) = store.maximum(geometry, id)?;
        records.push(record(RecordDetail::Maximum {
            time: self.time_of(&index),
            index,
            value,
        }));

        for &threshold in thresholds {
            let index = store.exceeds(geometry, id, threshold)?;
            records.push(record(RecordDetail::Exceedance {
                time: self.time_of(&index),
                index,
                threshold,
            }));
        }

        if geometry.is_spatial() {
            for &threshold in thresholds {
                let time_index = store.percentage_exceeds(geometry, id, threshold, self.percent_target)?;
                records.push(record(RecordDetail::PercentExceedance {
                    time_index,
                    threshold,
                    required_percent: self.percent_target,
                    time: time_index.map(|t| t as f64 * self.dt),
                }));

                let (time_index, achieved_percent) = store.percentage_exceeds_max(geometry, id, threshold)?;
                records.push(record(RecordDetail::MaxPercentExceedance {
                    time_index,
                    achieved_percent,
                    threshold,
                    time: time_index.map(|t| t as f64 * self.dt),
                }));
            }
        }

        Ok(records)
    }

    fn time_of(&self, index: &Option<Vec<usize>>) -> Option<f64> {
        index.as_ref().and_then(|i| i.first()).map(|&t| t as f64 * self.dt)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
