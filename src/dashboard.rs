/// Everything the main page and the cesspit page show, for one render.
///
/// Construct a `MainPageInfo` at the start of a page render and drop it when
/// the page is done; the cache it owns is what keeps the render to one
/// request per endpoint.

use crate::config::{RestConfig, options};
use crate::ingest::cache::Query;
use crate::ingest::transport::Transport;
use crate::model::{
    AirQuality, CesspitLevel, CesspitPrediction, Daylight, Outcome, Precipitation, ServiceLog,
    SolarPlant, SystemStatus, ValueTendency, WaterLevel, Wind,
};
use crate::temperature::TemperatureInfo;

pub struct MainPageInfo<'a, T: Transport> {
    temperatures: TemperatureInfo<'a, T>,
}

impl<'a, T: Transport> MainPageInfo<'a, T> {
    pub fn new(config: &'a RestConfig, transport: T) -> Self {
        Self {
            temperatures: TemperatureInfo::new(config, transport),
        }
    }

    /// Temperature accessors share this page's cache.
    pub fn temperatures(&mut self) -> &mut TemperatureInfo<'a, T> {
        &mut self.temperatures
    }

    fn current<R: serde::de::DeserializeOwned>(&mut self, option: &str) -> Outcome<R> {
        self.temperatures.backend().get(option, &Query::new())
    }

    pub fn cesspit_level(&mut self) -> Outcome<CesspitLevel> {
        self.current(options::CURRENT_CESSPIT_LEVEL)
    }

    pub fn humidity_in(&mut self) -> Outcome<ValueTendency> {
        self.current(options::CURRENT_HUMIDITY_IN)
    }

    pub fn pressure(&mut self) -> Outcome<ValueTendency> {
        self.current(options::CURRENT_PRESSURE)
    }

    pub fn air_quality(&mut self) -> Outcome<AirQuality> {
        self.current(options::CURRENT_AIR_QUALITY)
    }

    pub fn daylight(&mut self) -> Outcome<Daylight> {
        self.current(options::CURRENT_DAYLIGHT)
    }

    /// One entry per soil-moisture sensor.
    pub fn soil_moisture(&mut self) -> Outcome<Vec<ValueTendency>> {
        self.current(options::CURRENT_SOIL_MOISTURE)
    }

    pub fn solar_plant(&mut self) -> Outcome<SolarPlant> {
        self.current(options::CURRENT_SOLAR_PLANT)
    }

    pub fn precipitation(&mut self) -> Outcome<Precipitation> {
        self.current(options::CURRENT_PRECIPITATION)
    }

    pub fn wind(&mut self) -> Outcome<Wind> {
        self.current(options::CURRENT_WIND)
    }

    pub fn water_tank(&mut self) -> Outcome<WaterLevel> {
        self.current(options::CURRENT_WATER_TANK)
    }

    pub fn cesspit_prediction(&mut self) -> Outcome<CesspitPrediction> {
        self.current(options::CURRENT_CESSPIT_PREDICTION)
    }

    pub fn system_status(&mut self) -> Outcome<SystemStatus> {
        self.current(options::SYSTEM_STATUS)
    }

    pub fn cesspit_log(&mut self) -> Outcome<ServiceLog> {
        self.current(options::CURRENT_CESSPIT_LOG)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
