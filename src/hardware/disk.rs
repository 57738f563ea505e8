//! Disk summary.
//!
//! Linux: `lsblk` for the device list, `smartctl -i` to tag each device as
//! SSD or HDD. Windows: `wmic diskdrive`. Fallback: sysinfo disk totals.

use std::process::Command;
use sysinfo::Disks;

pub const UNAVAILABLE: &str = "Informações de disco não disponíveis";

/// Human-readable one-line disk description, one entry per physical device.
pub fn summary() -> String {
    #[cfg(target_os = "linux")]
    {
        if let Ok(output) = Command::new("lsblk")
            .args(["-d", "-o", "NAME,SIZE,MODEL"])
            .output()
        {
            if output.status.success() {
                let text = String::from_utf8_lossy(&output.stdout);
                let disks = parse_lsblk(&text);
                if !disks.is_empty() {
                    let described: Vec<String> = disks
                        .into_iter()
                        .map(|d| {
                            let kind = probe_disk_kind(&d.name);
                            d.describe(kind)
                        })
                        .collect();
                    return described.join(", ");
                }
            }
        }
        tracing::debug!("lsblk unavailable, falling back to sysinfo");
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(output) = Command::new("wmic")
            .args(["diskdrive", "get", "Model,Size", "/format:csv"])
            .output()
        {
            if output.status.success() {
                let text = String::from_utf8_lossy(&output.stdout);
                if let Some(line) = parse_wmic_diskdrive(&text) {
                    return line;
                }
            }
        }
        tracing::debug!("wmic diskdrive query unavailable, falling back to sysinfo");
    }

    sysinfo_summary().unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Cross-platform fallback: mounted filesystems with used/total space.
fn sysinfo_summary() -> Option<String> {
    let disks = Disks::new_with_refreshed_list();
    let mut entries = Vec::new();

    for disk in disks.list() {
        let total = disk.total_space();
        if total == 0 {
            continue;
        }
        let used = total.saturating_sub(disk.available_space());
        let total_gb = total as f64 / 1_073_741_824.0;
        let used_gb = used as f64 / 1_073_741_824.0;
        let pct = used as f64 / total as f64 * 100.0;
        entries.push(format!(
            "Disco {}: {:.2} GB / {:.2} GB ({:.1}% usado)",
            disk.name().to_string_lossy(),
            used_gb,
            total_gb,
            pct
        ));
    }

    (!entries.is_empty()).then(|| entries.join("\n"))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
#[derive(Debug, PartialEq, Eq)]
struct BlockDevice {
    name: String,
    size: String,
    model: String,
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
impl BlockDevice {
    fn describe(&self, kind: Option<DiskKind>) -> String {
        match kind {
            Some(kind) => format!("{}: {} ({}, {})", self.name, self.model, self.size, kind),
            None => format!("{}: {} ({})", self.name, self.model, self.size),
        }
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiskKind {
    Ssd,
    Hdd,
}

impl std::fmt::Display for DiskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiskKind::Ssd => write!(f, "SSD"),
            DiskKind::Hdd => write!(f, "HDD"),
        }
    }
}

/// Parse `lsblk -d -o NAME,SIZE,MODEL` output; header row skipped.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_lsblk(output: &str) -> Vec<BlockDevice> {
    let mut devices = Vec::new();

    for line in output.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            continue;
        }
        let model = if fields.len() > 2 {
            fields[2..].join(" ")
        } else {
            "Desconhecido".to_string()
        };
        devices.push(BlockDevice {
            name: fields[0].to_string(),
            size: fields[1].to_string(),
            model,
        });
    }

    devices
}

/// Ask smartctl whether a device is solid state. Needs the tool installed
/// and readable device nodes; answers `None` otherwise.
#[cfg(target_os = "linux")]
fn probe_disk_kind(device: &str) -> Option<DiskKind> {
    let output = Command::new("smartctl")
        .args(["-i", &format!("/dev/{device}")])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    Some(classify_smartctl(&text))
}

/// `Rotation Rate: Solid State Device` marks SSDs; anything else with a
/// rotation rate is spinning rust.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn classify_smartctl(output: &str) -> DiskKind {
    if output.contains("Solid State Device") {
        DiskKind::Ssd
    } else {
        DiskKind::Hdd
    }
}

/// Parse `wmic diskdrive get Model,Size /format:csv` output.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_wmic_diskdrive(output: &str) -> Option<String> {
    let mut lines = output.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = lines.next()?.split(',').map(str::trim).collect();
    let model_idx = header.iter().position(|h| h.eq_ignore_ascii_case("Model"))?;
    let size_idx = header.iter().position(|h| h.eq_ignore_ascii_case("Size"))?;

    let mut entries = Vec::new();
    for line in lines {
        let row: Vec<&str> = line.split(',').map(str::trim).collect();
        let Some(model) = row.get(model_idx).copied().filter(|v| !v.is_empty()) else {
            continue;
        };
        match row
            .get(size_idx)
            .and_then(|v| v.parse::<u64>().ok())
            .map(|bytes| bytes as f64 / 1_073_741_824.0)
        {
            Some(gb) => entries.push(format!("{model} ({gb:.0} GB)")),
            None => entries.push(model.to_string()),
        }
    }

    (!entries.is_empty()).then(|| entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSBLK_SAMPLE: &str = "\
NAME SIZE MODEL
sda  223.6G KINGSTON SA400S37240G
sdb  931.5G ST1000DM010-2EP102
";

    #[test]
    fn test_parse_lsblk() {
        let disks = parse_lsblk(LSBLK_SAMPLE);
        assert_eq!(disks.len(), 2);
        assert_eq!(disks[0].name, "sda");
        assert_eq!(disks[0].size, "223.6G");
        assert_eq!(disks[0].model, "KINGSTON SA400S37240G");
    }

    #[test]
    fn test_parse_lsblk_header_only() {
        assert!(parse_lsblk("NAME SIZE MODEL\n").is_empty());
        assert!(parse_lsblk("").is_empty());
    }

    #[test]
    fn test_describe_with_kind() {
        let disk = BlockDevice {
            name: "sda".to_string(),
            size: "223.6G".to_string(),
            model: "KINGSTON SA400S37240G".to_string(),
        };
        assert_eq!(
            disk.describe(Some(DiskKind::Ssd)),
            "sda: KINGSTON SA400S37240G (223.6G, SSD)"
        );
        assert_eq!(
            disk.describe(None),
            "sda: KINGSTON SA400S37240G (223.6G)"
        );
    }

    #[test]
    fn test_classify_smartctl() {
        assert_eq!(
            classify_smartctl("Rotation Rate:    Solid State Device\n"),
            DiskKind::Ssd
        );
        assert_eq!(
            classify_smartctl("Rotation Rate:    7200 rpm\n"),
            DiskKind::Hdd
        );
    }

    #[test]
    fn test_parse_wmic_diskdrive() {
        let sample = "Node,Model,Size\r\n\
PC-042,Samsung SSD 860 EVO 500GB,500105249280\r\n\
PC-042,WDC WD10EZEX-08WN4A0,1000202273280\r\n";
        let line = parse_wmic_diskdrive(sample).unwrap();
        assert_eq!(
            line,
            "Samsung SSD 860 EVO 500GB (466 GB), WDC WD10EZEX-08WN4A0 (932 GB)"
        );
    }

    #[test]
    fn test_parse_wmic_diskdrive_garbage() {
        assert!(parse_wmic_diskdrive("").is_none());
        assert!(parse_wmic_diskdrive("x\ny\n").is_none());
    }
}
