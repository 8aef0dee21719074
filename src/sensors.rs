/// Sensor location registry.
///
/// Defines the canonical names under which the temperature service reports
/// its sensors, along with where each one sits. This is the single source
/// of truth for location names; other modules reference them from here
/// rather than hardcoding strings.

pub const EXTERNAL: &str = "External";
pub const BUNKER: &str = "Bunker";
pub const OFFICE: &str = "Office";
pub const SYSTEM: &str = "System";
pub const RPI_RED: &str = "RPiRed";
pub const ATTIC: &str = "Attic";
pub const ROOF: &str = "Roof";
pub const CHIMNEY: &str = "Chiminey"; // spelled as the sensor service reports it
pub const WEATHER_STATION: &str = "Weather-Station";
pub const RPI_VIOLET: &str = "RPiViolet";
pub const RPI_COPPER: &str = "RPiCopper";
pub const GARDEN: &str = "Garden";
pub const GRASS: &str = "Grass";

/// Outdoor sensors tried, in order, for the "outside temperature" tile.
/// The dedicated external sensor is best; the others read slightly off
/// (garden in shade, chimney and roof warmed by the house).
pub const EXTERNAL_PREFERENCE: &[&str] = &[EXTERNAL, GARDEN, CHIMNEY, ROOF];

/// Metadata for a single temperature sensor.
pub struct SensorLocation {
    /// Name as it appears in the `location` field of the payload.
    pub name: &'static str,
    pub description: &'static str,
    pub outdoor: bool,
}

pub static SENSOR_REGISTRY: &[SensorLocation] = &[
    SensorLocation {
        name: EXTERNAL,
        description: "Dedicated outdoor probe on the north wall.",
        outdoor: true,
    },
    SensorLocation {
        name: GARDEN,
        description: "Garden probe, shaded most of the day.",
        outdoor: true,
    },
    SensorLocation {
        name: GRASS,
        description: "Ground-level probe just above the lawn.",
        outdoor: true,
    },
    SensorLocation {
        name: CHIMNEY,
        description: "Probe near the chimney outlet.",
        outdoor: true,
    },
    SensorLocation {
        name: ROOF,
        description: "Probe under the roof ridge.",
        outdoor: true,
    },
    SensorLocation {
        name: WEATHER_STATION,
        description: "Weather station enclosure.",
        outdoor: true,
    },
    SensorLocation {
        name: OFFICE,
        description: "Office; shown as the indoor temperature.",
        outdoor: false,
    },
    SensorLocation {
        name: BUNKER,
        description: "Basement bunker.",
        outdoor: false,
    },
    SensorLocation {
        name: SYSTEM,
        description: "Garage, next to the main server.",
        outdoor: false,
    },
    SensorLocation {
        name: ATTIC,
        description: "Attic.",
        outdoor: false,
    },
    SensorLocation {
        name: RPI_RED,
        description: "CPU of the red Raspberry Pi.",
        outdoor: false,
    },
    SensorLocation {
        name: RPI_VIOLET,
        description: "CPU of the violet Raspberry Pi.",
        outdoor: false,
    },
    SensorLocation {
        name: RPI_COPPER,
        description: "CPU of the copper Raspberry Pi.",
        outdoor: false,
    },
];

/// Looks up a location by name. Returns `None` if not found.
pub fn find_location(name: &str) -> Option<&'static SensorLocation> {
    SENSOR_REGISTRY.iter().find(|s| s.name == name)
}

pub fn outdoor_locations() -> Vec<&'static str> {
    SENSOR_REGISTRY
        .iter()
        .filter(|s| s.outdoor)
        .map(|s| s.name)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
