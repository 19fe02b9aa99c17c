//! Client for the service monitor's HTTP API.

pub mod client;

pub use client::{
    CycleReport, CycleStarted, DatabaseEntry, HealthRecord, MonitorClient, ServiceEntry, SystemStatus,
};
