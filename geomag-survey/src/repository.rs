//! Persistence seam for station records

use crate::errors::{SurveyError, SurveyResult};
use crate::station::{StationCorrection, StationRecord};
use std::collections::BTreeMap;

/// Source of pending stations and sink for their corrections
pub trait StationRepository {
    /// All stations that have no model value yet
    fn pending_stations(&self) -> SurveyResult<Vec<StationRecord>>;

    /// Persist the model value and residual for one station
    fn store_correction(&mut self, correction: &StationCorrection) -> SurveyResult<()>;
}

/// Station repository held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStations {
    stations: BTreeMap<String, StationRecord>,
    residuals: BTreeMap<String, StationCorrection>,
}

impl InMemoryStations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = StationRecord>) -> Self {
        let mut repository = Self::new();
        for record in records {
            repository.insert(record);
        }
        repository
    }

    pub fn insert(&mut self, record: StationRecord) {
        self.stations.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<&StationRecord> {
        self.stations.get(id)
    }

    /// The correction stored for `id`, if any
    pub fn correction(&self, id: &str) -> Option<&StationCorrection> {
        self.residuals.get(id)
    }
}

impl StationRepository for InMemoryStations {
    fn pending_stations(&self) -> SurveyResult<Vec<StationRecord>> {
        Ok(self
            .stations
            .values()
            .filter(|s| s.is_pending())
            .cloned()
            .collect())
    }

    fn store_correction(&mut self, correction: &StationCorrection) -> SurveyResult<()> {
        let station = self
            .stations
            .get_mut(&correction.station_id)
            .ok_or_else(|| {
                SurveyError::Storage(format!("unknown station {}", correction.station_id))
            })?;
        station.model_total = Some(correction.model_total);
        self.residuals
            .insert(correction.station_id.clone(), correction.clone());
        Ok(())
    }
}
