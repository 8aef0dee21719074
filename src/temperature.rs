/// Per-location temperature lookups.
///
/// The temperature service answers with every sensor at once. The first
/// lookup in an operation fetches that list and indexes it by location; all
/// later lookups, for any location, are served from the index. A failed
/// fetch is remembered too, so a dead service costs one request per page,
/// not one per tile.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::{RestConfig, options};
use crate::ingest::cache::Query;
use crate::ingest::rest::{Payload, RestBackend};
use crate::ingest::transport::Transport;
use crate::model::{Outcome, TemperatureDailyStatistics, TemperatureReading};
use crate::sensors;

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// The decoded temperature list of one operation, or why it is missing.
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureIndex {
    Readings(HashMap<String, TemperatureReading>),
    Failed(Outcome<TemperatureReading>),
}

impl TemperatureIndex {
    pub fn from_outcome(outcome: Outcome<Payload<TemperatureReading>>) -> Self {
        match outcome {
            Outcome::Reading(payload) => TemperatureIndex::Readings(
                payload
                    .into_vec()
                    .into_iter()
                    .map(|reading| (reading.location.clone(), reading))
                    .collect(),
            ),
            Outcome::Error(message) => TemperatureIndex::Failed(Outcome::Error(message)),
            Outcome::NotAvailable => TemperatureIndex::Failed(Outcome::NotAvailable),
        }
    }

    /// A location absent from a good list is `NotAvailable`.
    pub fn lookup(&self, location: &str) -> Outcome<TemperatureReading> {
        match self {
            TemperatureIndex::Readings(readings) => readings
                .get(location)
                .cloned()
                .map(Outcome::Reading)
                .unwrap_or(Outcome::NotAvailable),
            TemperatureIndex::Failed(failure) => failure.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-operation accessors
// ---------------------------------------------------------------------------

pub struct TemperatureInfo<'a, T: Transport> {
    backend: RestBackend<'a, T>,
    index: Option<TemperatureIndex>,
}

impl<'a, T: Transport> TemperatureInfo<'a, T> {
    pub fn new(config: &'a RestConfig, transport: T) -> Self {
        Self::from_backend(RestBackend::new(config, transport))
    }

    pub fn from_backend(backend: RestBackend<'a, T>) -> Self {
        Self {
            backend,
            index: None,
        }
    }

    pub(crate) fn backend(&mut self) -> &mut RestBackend<'a, T> {
        &mut self.backend
    }

    /// Reading of one sensor location; the list is fetched at most once.
    pub fn temperature(&mut self, location: &str) -> Outcome<TemperatureReading> {
        let backend = &mut self.backend;
        self.index
            .get_or_insert_with(|| {
                TemperatureIndex::from_outcome(
                    backend.get_payload(options::CURRENT_TEMPERATURE, &Query::new()),
                )
            })
            .lookup(location)
    }

    /// First location in `locations` that has a reading; otherwise the
    /// failure of the last one tried.
    pub fn best_available(&mut self, locations: &[&str]) -> Outcome<TemperatureReading> {
        let mut last = Outcome::NotAvailable;
        for location in locations {
            let reading = self.temperature(location);
            if reading.succeeded() {
                return reading;
            }
            last = reading;
        }
        last
    }

    pub fn external(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::EXTERNAL)
    }

    pub fn external_best_available(&mut self) -> Outcome<TemperatureReading> {
        self.best_available(sensors::EXTERNAL_PREFERENCE)
    }

    /// The indoor tile shows the office sensor.
    pub fn internal(&mut self) -> Outcome<TemperatureReading> {
        self.office()
    }

    pub fn office(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::OFFICE)
    }

    pub fn bunker(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::BUNKER)
    }

    pub fn garage(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::SYSTEM)
    }

    pub fn attic(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::ATTIC)
    }

    pub fn chimney(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::CHIMNEY)
    }

    pub fn roof(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::ROOF)
    }

    pub fn weather_station(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::WEATHER_STATION)
    }

    pub fn garden(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::GARDEN)
    }

    pub fn grass(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::GRASS)
    }

    pub fn rpi_red(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::RPI_RED)
    }

    pub fn rpi_copper(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::RPI_COPPER)
    }

    pub fn rpi_violet(&mut self) -> Outcome<TemperatureReading> {
        self.temperature(sensors::RPI_VIOLET)
    }

    /// Min/max/mean of one sensor over `date`.
    pub fn daily_statistics(
        &mut self,
        sensor_location: &str,
        date: NaiveDate,
    ) -> Outcome<TemperatureDailyStatistics> {
        let query = Query::new()
            .with("sensor_location", sensor_location)
            .with("date", date.format("%Y-%m-%d"));
        self.backend.get(options::HISTORY_TEMPERATURE_DAILY, &query)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
