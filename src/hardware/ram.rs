//! RAM summary.
//!
//! Usage line always comes from sysinfo. Module detail (size, type, speed
//! per stick) is best-effort: `sudo -n dmidecode -t 17` on Linux, `wmic
//! memorychip` on Windows. Detail failure degrades to the usage line alone.

use std::process::Command;
use sysinfo::System;

pub const UNAVAILABLE: &str = "Informações de memória RAM não disponíveis";

/// Human-readable RAM description: usage line, then one line per module
/// when the platform tooling allows it.
pub fn summary() -> String {
    let mut sys = System::new();
    sys.refresh_memory();

    let total = sys.total_memory();
    if total == 0 {
        return UNAVAILABLE.to_string();
    }
    let used = sys.used_memory();
    let usage = format_usage(used, total);

    let modules = module_detail();
    if modules.is_empty() {
        usage
    } else {
        format!("{usage}\n\n{}", modules.join("\n"))
    }
}

/// "used GB / total GB (pct usado)" from byte counts.
fn format_usage(used_bytes: u64, total_bytes: u64) -> String {
    let total_gb = total_bytes as f64 / 1_073_741_824.0;
    let used_gb = used_bytes as f64 / 1_073_741_824.0;
    let pct = used_bytes as f64 / total_bytes as f64 * 100.0;
    format!("{used_gb:.2} GB / {total_gb:.2} GB ({pct:.1}% usado)")
}

fn module_detail() -> Vec<String> {
    #[cfg(target_os = "linux")]
    {
        // -n: never prompt for a password; detail is skipped without sudo.
        if let Ok(output) = Command::new("sudo")
            .args(["-n", "dmidecode", "-t", "17"])
            .output()
        {
            if output.status.success() {
                let text = String::from_utf8_lossy(&output.stdout);
                return parse_dmidecode_memory(&text);
            }
        }
        tracing::debug!("dmidecode unavailable, RAM module detail skipped");
        return Vec::new();
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(output) = Command::new("wmic")
            .args(["memorychip", "get", "Capacity,MemoryType,Speed", "/format:csv"])
            .output()
        {
            if output.status.success() {
                let text = String::from_utf8_lossy(&output.stdout);
                return parse_wmic_memorychip(&text);
            }
        }
        tracing::debug!("wmic memorychip query unavailable, RAM module detail skipped");
        return Vec::new();
    }

    #[allow(unreachable_code)]
    Vec::new()
}

/// Parse `dmidecode -t 17` output into one line per installed module,
/// e.g. "8192 MB DDR4 2667 MT/s". Empty slots are skipped.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_dmidecode_memory(output: &str) -> Vec<String> {
    let mut modules = Vec::new();
    let mut current: Option<MemoryModule> = None;

    for raw in output.lines() {
        let line = raw.trim();

        if line == "Memory Device" {
            if let Some(module) = current.take() {
                modules.extend(module.describe());
            }
            current = Some(MemoryModule::default());
            continue;
        }

        let Some(module) = current.as_mut() else {
            continue;
        };
        if let Some(value) = line.strip_prefix("Size:") {
            module.size = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Type:") {
            module.kind = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Speed:") {
            module.speed = Some(value.trim().to_string());
        }
    }

    if let Some(module) = current.take() {
        modules.extend(module.describe());
    }

    modules
}

#[derive(Debug, Default)]
struct MemoryModule {
    size: Option<String>,
    kind: Option<String>,
    speed: Option<String>,
}

impl MemoryModule {
    /// Format the module line, or nothing for an empty slot.
    fn describe(self) -> Option<String> {
        let size = self.size.filter(|s| s != "No Module Installed")?;
        let mut line = size;
        if let Some(kind) = self.kind.filter(|k| k != "Unknown") {
            line.push(' ');
            line.push_str(&kind);
        }
        if let Some(speed) = self.speed.filter(|s| s != "Unknown") {
            line.push(' ');
            line.push_str(&speed);
        }
        Some(line)
    }
}

/// Parse `wmic memorychip ... /format:csv` output into one line per module.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_wmic_memorychip(output: &str) -> Vec<String> {
    let mut lines = output.lines().filter(|l| !l.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let header: Vec<&str> = header_line.split(',').map(str::trim).collect();
    let capacity_idx = header.iter().position(|h| h.eq_ignore_ascii_case("Capacity"));
    let speed_idx = header.iter().position(|h| h.eq_ignore_ascii_case("Speed"));

    let mut modules = Vec::new();
    for line in lines {
        let row: Vec<&str> = line.split(',').map(str::trim).collect();
        let Some(bytes) = capacity_idx
            .and_then(|i| row.get(i))
            .and_then(|v| v.parse::<u64>().ok())
        else {
            continue;
        };
        let mut entry = format!("{} MB", bytes / 1_048_576);
        if let Some(speed) = speed_idx.and_then(|i| row.get(i)).filter(|v| !v.is_empty()) {
            entry.push_str(&format!(" {speed} MHz"));
        }
        modules.push(entry);
    }

    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    const DMIDECODE_SAMPLE: &str = "\
# dmidecode 3.3
Handle 0x0040, DMI type 17, 40 bytes
Memory Device
\tSize: 8192 MB
\tForm Factor: SODIMM
\tType: DDR4
\tSpeed: 2667 MT/s

Handle 0x0041, DMI type 17, 40 bytes
Memory Device
\tSize: No Module Installed
\tType: Unknown
\tSpeed: Unknown

Handle 0x0042, DMI type 17, 40 bytes
Memory Device
\tSize: 8192 MB
\tType: DDR4
\tSpeed: 2667 MT/s
";

    #[test]
    fn test_parse_dmidecode_memory() {
        let modules = parse_dmidecode_memory(DMIDECODE_SAMPLE);
        assert_eq!(
            modules,
            vec!["8192 MB DDR4 2667 MT/s", "8192 MB DDR4 2667 MT/s"]
        );
    }

    #[test]
    fn test_parse_dmidecode_empty_output() {
        assert!(parse_dmidecode_memory("").is_empty());
        assert!(parse_dmidecode_memory("garbage\nlines\n").is_empty());
    }

    #[test]
    fn test_module_without_type_keeps_size() {
        let modules = parse_dmidecode_memory("Memory Device\n\tSize: 4096 MB\n\tType: Unknown\n");
        assert_eq!(modules, vec!["4096 MB"]);
    }

    #[test]
    fn test_format_usage() {
        let total = 16 * 1_073_741_824u64;
        let used = 4 * 1_073_741_824u64;
        assert_eq!(format_usage(used, total), "4.00 GB / 16.00 GB (25.0% usado)");
    }

    #[test]
    fn test_parse_wmic_memorychip() {
        let sample = "Node,Capacity,MemoryType,Speed\r\n\
PC-042,8589934592,26,2667\r\n\
PC-042,8589934592,26,2667\r\n";
        let modules = parse_wmic_memorychip(sample);
        assert_eq!(modules, vec!["8192 MB 2667 MHz", "8192 MB 2667 MHz"]);
    }
}
