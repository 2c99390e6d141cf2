//! Host telemetry: a narrow provider trait plus pure report formatting.
//!
//! The provider is one method per metrics subsystem so a failing subsystem
//! yields its own fixed error reply without affecting the others.

pub mod format;
pub mod probe;

pub use probe::SystemProbe;

use thiserror::Error;

/// A metrics subsystem failed to answer.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("host probe failed: {0}")]
    Host(String),
    #[error("process enumeration failed: {0}")]
    Processes(String),
    #[error("disk enumeration failed: {0}")]
    Disks(String),
    #[error("network enumeration failed: {0}")]
    Network(String),
}

#[derive(Debug, Clone)]
pub struct HostInfo {
    pub platform: String,
    pub os_version: String,
    pub arch: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CpuInfo {
    pub model: String,
    pub cores: usize,
    pub frequency_mhz: u64,
}

/// RAM or swap snapshot. Byte counts, percent precomputed by the provider.
#[derive(Debug, Clone)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub mem_percent: f32,
}

#[derive(Debug, Clone)]
pub struct DiskInfo {
    pub mount_point: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone)]
pub struct NetInterface {
    pub name: String,
    pub addrs: Vec<String>,
    pub mac: String,
    pub mtu: u64,
}

#[derive(Debug, Clone)]
pub struct NetCounters {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    /// Interfaces carrying at least one address.
    pub interfaces: Vec<NetInterface>,
    /// Cumulative I/O counters for every interface.
    pub counters: Vec<NetCounters>,
}

/// What the command handlers need from the host.
pub trait TelemetryProvider: Send + Sync {
    fn host(&self) -> Result<HostInfo, TelemetryError>;
    fn cpu(&self) -> Result<CpuInfo, TelemetryError>;
    fn memory(&self) -> Result<MemoryInfo, TelemetryError>;
    fn swap(&self) -> Result<MemoryInfo, TelemetryError>;
    fn processes(&self) -> Result<Vec<ProcessInfo>, TelemetryError>;
    fn disks(&self) -> Result<Vec<DiskInfo>, TelemetryError>;
    fn network(&self) -> Result<NetworkSnapshot, TelemetryError>;
}
