//! Processor summary.
//!
//! Rich path first (lscpu on Linux, wmic on Windows), sysinfo fallback,
//! placeholder string last. The parsers are pure functions over captured
//! command output so the degradation paths are testable.

use std::process::Command;
use sysinfo::System;

pub const UNAVAILABLE: &str = "Informações do processador não disponíveis";

/// Human-readable one-line processor description.
pub fn summary() -> String {
    let utilization = current_utilization();

    #[cfg(target_os = "linux")]
    {
        if let Ok(output) = Command::new("lscpu").output() {
            if output.status.success() {
                let text = String::from_utf8_lossy(&output.stdout);
                if let Some(line) = parse_lscpu(&text) {
                    return append_utilization(line, utilization);
                }
            }
        }
        tracing::debug!("lscpu unavailable, falling back to sysinfo");
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(output) = Command::new("wmic")
            .args([
                "cpu",
                "get",
                "Manufacturer,MaxClockSpeed,Name,NumberOfCores,NumberOfLogicalProcessors",
                "/format:csv",
            ])
            .output()
        {
            if output.status.success() {
                let text = String::from_utf8_lossy(&output.stdout);
                if let Some(line) = parse_wmic_cpu(&text) {
                    return append_utilization(line, utilization);
                }
            }
        }
        tracing::debug!("wmic cpu query unavailable, falling back to sysinfo");
    }

    match sysinfo_summary() {
        Some(line) => append_utilization(line, utilization),
        None => UNAVAILABLE.to_string(),
    }
}

fn append_utilization(line: String, utilization: Option<f32>) -> String {
    match utilization {
        Some(pct) => format!("{line}, {pct:.2}% utilização"),
        None => line,
    }
}

/// Instantaneous CPU utilization. Needs two refreshes a short interval apart.
fn current_utilization() -> Option<f32> {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    if sys.cpus().is_empty() {
        None
    } else {
        Some(sys.global_cpu_usage())
    }
}

/// Cross-platform fallback built from sysinfo alone.
fn sysinfo_summary() -> Option<String> {
    let mut sys = System::new();
    sys.refresh_cpu_all();

    let cpus = sys.cpus();
    let first = cpus.first()?;

    let threads = cpus.len();
    let cores = sys.physical_core_count().unwrap_or(threads);

    Some(format!(
        "{} {}, {} núcleos, {} threads",
        first.vendor_id().trim(),
        first.brand().trim(),
        cores,
        threads
    ))
}

/// Build the summary line from `lscpu` output.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_lscpu(output: &str) -> Option<String> {
    let mut model = None;
    let mut vendor = None;
    let mut cpu_count: Option<u32> = None;
    let mut threads_per_core: Option<u32> = None;
    let mut freq_mhz: Option<f64> = None;

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "Model name" => model = Some(value.to_string()),
            "Vendor ID" => vendor = Some(value.to_string()),
            // "CPU(s)" also appears inside "NUMA node0 CPU(s)"; exact key
            // comparison avoids reading the NUMA line as the count.
            "CPU(s)" => cpu_count = value.parse().ok(),
            "Thread(s) per core" => threads_per_core = value.parse().ok(),
            "CPU MHz" | "CPU max MHz" => {
                if freq_mhz.is_none() {
                    freq_mhz = value.parse().ok();
                }
            }
            _ => {}
        }
    }

    let model = model?;
    let mut parts = Vec::new();
    match vendor {
        Some(vendor) => parts.push(format!("{vendor} {model}")),
        None => parts.push(model),
    }
    if let Some(count) = cpu_count {
        parts.push(format!("{count} núcleos"));
        if let Some(tpc) = threads_per_core {
            parts.push(format!("{} threads", count * tpc));
        }
    }
    if let Some(mhz) = freq_mhz {
        parts.push(format!("{:.2} GHz", mhz / 1000.0));
    }

    Some(parts.join(", "))
}

/// Parse `wmic cpu ... /format:csv` output (header line then data line).
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_wmic_cpu(output: &str) -> Option<String> {
    let mut lines = output.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = lines.next()?.split(',').map(str::trim).collect();
    let row: Vec<&str> = lines.next()?.split(',').map(str::trim).collect();

    let field = |name: &str| -> Option<&str> {
        let idx = header.iter().position(|h| h.eq_ignore_ascii_case(name))?;
        row.get(idx).copied().filter(|v| !v.is_empty())
    };

    let name = field("Name")?;
    let mut parts = Vec::new();
    match field("Manufacturer") {
        Some(vendor) => parts.push(format!("{vendor} {name}")),
        None => parts.push(name.to_string()),
    }
    if let Some(cores) = field("NumberOfCores") {
        parts.push(format!("{cores} núcleos"));
    }
    if let Some(threads) = field("NumberOfLogicalProcessors") {
        parts.push(format!("{threads} threads"));
    }
    if let Some(mhz) = field("MaxClockSpeed").and_then(|v| v.parse::<f64>().ok()) {
        parts.push(format!("{:.2} GHz", mhz / 1000.0));
    }

    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSCPU_SAMPLE: &str = "\
Architecture:            x86_64
CPU(s):                  8
Thread(s) per core:      2
Core(s) per socket:      4
Vendor ID:               GenuineIntel
Model name:              Intel(R) Core(TM) i7-8565U CPU @ 1.80GHz
CPU MHz:                 1800.000
NUMA node0 CPU(s):       0-7
";

    #[test]
    fn test_parse_lscpu() {
        let line = parse_lscpu(LSCPU_SAMPLE).unwrap();
        assert_eq!(
            line,
            "GenuineIntel Intel(R) Core(TM) i7-8565U CPU @ 1.80GHz, 8 núcleos, 16 threads, 1.80 GHz"
        );
    }

    #[test]
    fn test_parse_lscpu_without_model_falls_back() {
        assert!(parse_lscpu("Architecture: x86_64\nCPU(s): 4\n").is_none());
        assert!(parse_lscpu("").is_none());
    }

    #[test]
    fn test_parse_lscpu_ignores_numa_cpu_lines() {
        let line = parse_lscpu("Model name: X\nNUMA node0 CPU(s): 0-7\n").unwrap();
        assert_eq!(line, "X");
    }

    #[test]
    fn test_parse_wmic_cpu() {
        let sample = "Node,Manufacturer,MaxClockSpeed,Name,NumberOfCores,NumberOfLogicalProcessors\r\n\
PC-042,AuthenticAMD,3600,AMD Ryzen 5 3600 6-Core Processor,6,12\r\n";
        let line = parse_wmic_cpu(sample).unwrap();
        assert_eq!(
            line,
            "AuthenticAMD AMD Ryzen 5 3600 6-Core Processor, 6 núcleos, 12 threads, 3.60 GHz"
        );
    }

    #[test]
    fn test_parse_wmic_cpu_garbage() {
        assert!(parse_wmic_cpu("").is_none());
        assert!(parse_wmic_cpu("not,a,header\n").is_none());
    }

    #[test]
    fn test_append_utilization() {
        assert_eq!(
            append_utilization("X".to_string(), Some(12.345)),
            "X, 12.35% utilização"
        );
        assert_eq!(append_utilization("X".to_string(), None), "X");
    }
}
