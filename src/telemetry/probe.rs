//! `sysinfo`-backed [`TelemetryProvider`].

use super::{
    CpuInfo, DiskInfo, HostInfo, MemoryInfo, NetCounters, NetInterface, NetworkSnapshot,
    ProcessInfo, TelemetryError, TelemetryProvider,
};
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};

/// Probes the local host on every call. Snapshots are cheap enough for a
/// chat-paced command stream; nothing is cached between commands.
pub struct SystemProbe;

impl SystemProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

impl TelemetryProvider for SystemProbe {
    fn host(&self) -> Result<HostInfo, TelemetryError> {
        Ok(HostInfo {
            platform: System::name().unwrap_or_else(|| "desconhecido".into()),
            os_version: System::os_version().unwrap_or_default(),
            arch: System::cpu_arch(),
            uptime_secs: System::uptime(),
        })
    }

    fn cpu(&self) -> Result<CpuInfo, TelemetryError> {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        let cpu = sys
            .cpus()
            .first()
            .ok_or_else(|| TelemetryError::Host("no CPU reported".into()))?;
        Ok(CpuInfo {
            model: cpu.brand().trim().to_string(),
            cores: sys.cpus().len(),
            frequency_mhz: cpu.frequency(),
        })
    }

    fn memory(&self) -> Result<MemoryInfo, TelemetryError> {
        let mut sys = System::new();
        sys.refresh_memory();
        Ok(MemoryInfo {
            total: sys.total_memory(),
            used: sys.used_memory(),
            free: sys.free_memory(),
            used_percent: percent(sys.used_memory(), sys.total_memory()),
        })
    }

    fn swap(&self) -> Result<MemoryInfo, TelemetryError> {
        let mut sys = System::new();
        sys.refresh_memory();
        Ok(MemoryInfo {
            total: sys.total_swap(),
            used: sys.used_swap(),
            free: sys.free_swap(),
            used_percent: percent(sys.used_swap(), sys.total_swap()),
        })
    }

    fn processes(&self) -> Result<Vec<ProcessInfo>, TelemetryError> {
        let mut sys = System::new();
        sys.refresh_memory();
        // Two refreshes a tick apart, or every cpu_usage() reads zero.
        sys.refresh_processes(ProcessesToUpdate::All, true);
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let total = sys.total_memory();
        Ok(sys
            .processes()
            .values()
            .map(|p| ProcessInfo {
                pid: p.pid().as_u32(),
                name: p.name().to_string_lossy().into_owned(),
                cpu_percent: p.cpu_usage(),
                mem_percent: percent(p.memory(), total) as f32,
            })
            .collect())
    }

    fn disks(&self) -> Result<Vec<DiskInfo>, TelemetryError> {
        let disks = Disks::new_with_refreshed_list();
        // Partitions whose usage probe failed surface as zero totals; skip
        // them silently rather than reporting garbage.
        Ok(disks
            .iter()
            .filter_map(|d| {
                let total = d.total_space();
                if total == 0 {
                    return None;
                }
                let free = d.available_space();
                let used = total.saturating_sub(free);
                Some(DiskInfo {
                    mount_point: d.mount_point().display().to_string(),
                    total,
                    used,
                    free,
                    used_percent: percent(used, total),
                })
            })
            .collect())
    }

    fn network(&self) -> Result<NetworkSnapshot, TelemetryError> {
        let networks = Networks::new_with_refreshed_list();
        let mut interfaces = Vec::new();
        let mut counters = Vec::new();

        for (name, data) in &networks {
            let addrs: Vec<String> = data
                .ip_networks()
                .iter()
                .map(ToString::to_string)
                .collect();
            if !addrs.is_empty() {
                interfaces.push(NetInterface {
                    name: name.clone(),
                    addrs,
                    mac: data.mac_address().to_string(),
                    mtu: data.mtu(),
                });
            }
            counters.push(NetCounters {
                name: name.clone(),
                rx_bytes: data.total_received(),
                tx_bytes: data.total_transmitted(),
            });
        }

        Ok(NetworkSnapshot {
            interfaces,
            counters,
        })
    }
}
