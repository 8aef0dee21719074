pub mod config;
pub mod dashboard;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod sensors;
pub mod temperature;
pub mod verify;
