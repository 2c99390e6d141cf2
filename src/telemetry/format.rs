//! Pure report rendering. No I/O: every function takes literal snapshots so
//! the output contract is testable against numeric fixtures.

use super::{CpuInfo, DiskInfo, HostInfo, MemoryInfo, NetworkSnapshot, ProcessInfo};
use std::fmt::Write;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

fn gb(bytes: u64) -> f64 {
    bytes as f64 / GIB
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / MIB
}

pub fn status_report(host: &HostInfo, cpu: &CpuInfo, mem: &MemoryInfo) -> String {
    format!(
        "📊 *Status do Servidor*\n\n\
         *Sistema:*\n\
         • OS: {} {}\n\
         • Arch: {}\n\
         • Uptime: {} horas\n\n\
         *CPU:*\n\
         • Modelo: {}\n\
         • Cores: {}\n\
         • Velocidade: {:.2} GHz\n\n\
         *Memória:*\n\
         • Total: {:.2} GB\n\
         • Livre: {:.2} GB\n\
         • Uso: {:.2}%",
        host.platform,
        host.os_version,
        host.arch,
        host.uptime_secs / 3600,
        cpu.model,
        cpu.cores,
        cpu.frequency_mhz as f64 / 1000.0,
        gb(mem.total),
        gb(mem.free),
        mem.used_percent,
    )
}

/// Top 10 by CPU, descending. Tie order is whatever the sort leaves.
pub fn process_report(processes: &[ProcessInfo]) -> String {
    let mut ranked: Vec<&ProcessInfo> = processes.iter().collect();
    ranked.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));

    let mut out = String::from("📋 *Top 10 Processos:*\n\n");
    for p in ranked.into_iter().take(10) {
        let _ = write!(
            out,
            "• {} (PID: {})\n  CPU: {:.1}% | RAM: {:.1}%\n\n",
            p.name, p.pid, p.cpu_percent, p.mem_percent
        );
    }
    out
}

pub fn memory_report(ram: &MemoryInfo, swap: &MemoryInfo) -> String {
    format!(
        "💾 *Uso de Memória*\n\n\
         *RAM:*\n\
         • Total: {:.2} GB\n\
         • Usado: {:.2} GB\n\
         • Livre: {:.2} GB\n\
         • Uso: {:.2}%\n\n\
         *Swap:*\n\
         • Total: {:.2} GB\n\
         • Usado: {:.2} GB\n\
         • Livre: {:.2} GB\n\
         • Uso: {:.2}%",
        gb(ram.total),
        gb(ram.used),
        gb(ram.free),
        ram.used_percent,
        gb(swap.total),
        gb(swap.used),
        gb(swap.free),
        swap.used_percent,
    )
}

pub fn disk_report(disks: &[DiskInfo]) -> String {
    let mut out = String::from("💽 *Uso de Disco*\n\n");
    for d in disks {
        let _ = write!(
            out,
            "*{}:*\n\
             • Total: {:.2} GB\n\
             • Usado: {:.2} GB\n\
             • Livre: {:.2} GB\n\
             • Uso: {:.2}%\n\n",
            d.mount_point,
            gb(d.total),
            gb(d.used),
            gb(d.free),
            d.used_percent
        );
    }
    out
}

pub fn network_report(net: &NetworkSnapshot) -> String {
    let mut out = String::from("🌐 *Informações de Rede*\n\n");
    for iface in &net.interfaces {
        let _ = writeln!(out, "*{}:*", iface.name);
        for addr in &iface.addrs {
            let _ = writeln!(out, "• IP: {addr}");
        }
        let _ = write!(out, "• MAC: {}\n• MTU: {}\n\n", iface.mac, iface.mtu);
    }
    for c in &net.counters {
        let _ = write!(
            out,
            "*{} (Stats):*\n• RX: {:.2} MB\n• TX: {:.2} MB\n\n",
            c.name,
            mb(c.rx_bytes),
            mb(c.tx_bytes)
        );
    }
    out
}
