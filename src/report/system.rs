// Host context lines - load averages and memory usage for the report

use sysinfo::System;

/// Point-in-time host statistics, captured once per run.
///
/// Capturing is separated from rendering so report composition stays
/// deterministic under test.
#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    /// 1/5/15-minute load averages
    pub load: (f64, f64, f64),
    pub memory: MemoryUsage,
    pub swap: MemoryUsage,
}

#[derive(Debug, Clone)]
pub struct MemoryUsage {
    pub total: u64,
    pub available: Option<u64>,
    pub free: u64,
    pub used: u64,
}

impl MemoryUsage {
    fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64 * 100.0
        }
    }

    fn render(&self) -> String {
        let mut parts = vec![format!("`total: {}`", format_bytes(self.total))];
        if let Some(available) = self.available {
            parts.push(format!("`available: {}`", format_bytes(available)));
        }
        parts.push(format!("`percent: {:.1}`", self.percent()));
        parts.push(format!("`free: {}`", format_bytes(self.free)));
        parts.join(", ")
    }
}

impl SystemSnapshot {
    /// Capture load averages and memory usage from the running host
    pub fn capture() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        let load = System::load_average();

        Self {
            load: (load.one, load.five, load.fifteen),
            memory: MemoryUsage {
                total: sys.total_memory(),
                available: Some(sys.available_memory()),
                free: sys.free_memory(),
                used: sys.used_memory(),
            },
            swap: MemoryUsage {
                total: sys.total_swap(),
                available: None,
                free: sys.free_swap(),
                used: sys.used_swap(),
            },
        }
    }

    /// Render the host context section of the report
    pub fn render(&self) -> Vec<String> {
        vec![
            format!(
                "Current loads: `{:.2}`, `{:.2}`, `{:.2}`",
                self.load.0, self.load.1, self.load.2
            ),
            format!("Virtual memory usage: {}", self.memory.render()),
            format!("Swap memory usage: {}", self.swap.render()),
        ]
    }
}

/// Format a byte count with one decimal digit and a G/M/K unit
fn format_bytes(n: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * 1024 * 1024;

    if n >= GIB {
        format!("{}.{} G", n / GIB, (n % GIB) * 10 / GIB)
    } else if n >= MIB {
        format!("{}.{} M", n / MIB, (n % MIB) * 10 / MIB)
    } else if n >= KIB {
        format!("{}.{} K", n / KIB, (n % KIB) * 10 / KIB)
    } else {
        n.to_string()
    }
}
