//! Connected monitor descriptions.
//!
//! Linux: parse `xrandr --verbose` connected outputs (name, resolution,
//! physical size). Windows: inline PowerShell `WmiMonitorID` query — the
//! query string is passed with `-Command`, no script file touches disk.
//! Placeholder list when nothing can be read.

use std::process::Command;

pub const UNAVAILABLE: &str = "Informações de monitores não disponíveis";

/// Ordered list of monitor descriptions, one entry per connected output.
pub fn list() -> Vec<String> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(output) = Command::new("xrandr").arg("--verbose").output() {
            if output.status.success() {
                let text = String::from_utf8_lossy(&output.stdout);
                let monitors = parse_xrandr(&text);
                if !monitors.is_empty() {
                    return monitors;
                }
            }
        }
        tracing::debug!("xrandr unavailable, no monitor info");
    }

    #[cfg(target_os = "windows")]
    {
        const QUERY: &str = "Get-CimInstance -Namespace root/wmi -ClassName WmiMonitorID | \
ForEach-Object { ($_.UserFriendlyName | Where-Object { $_ -ne 0 } | \
ForEach-Object { [char]$_ }) -join '' }";

        if let Ok(output) = Command::new("powershell")
            .args(["-NoProfile", "-Command", QUERY])
            .output()
        {
            if output.status.success() {
                let text = String::from_utf8_lossy(&output.stdout);
                let monitors = parse_monitor_names(&text);
                if !monitors.is_empty() {
                    return monitors;
                }
            }
        }
        tracing::debug!("WmiMonitorID query unavailable, no monitor info");
    }

    vec![UNAVAILABLE.to_string()]
}

/// Parse `xrandr --verbose`, keeping connected outputs only. Each entry
/// carries the output name plus resolution and diagonal size when present.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_xrandr(output: &str) -> Vec<String> {
    let mut monitors = Vec::new();

    for line in output.lines() {
        if !line.contains(" connected ") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some(name) = fields.first() else {
            continue;
        };

        let mut entry = format!("Monitor: {name}");
        if let Some(resolution) = fields.iter().find_map(|f| geometry_resolution(f)) {
            entry.push_str(&format!(", Resolução: {resolution}"));
        }
        if let Some(inches) = diagonal_inches(line) {
            entry.push_str(&format!(", Tamanho: {inches:.1}\""));
        }
        monitors.push(entry);
    }

    monitors
}

/// "1920x1080+0+0" → "1920x1080".
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn geometry_resolution(field: &str) -> Option<String> {
    let (resolution, _offsets) = field.split_once('+')?;
    let (width, height) = resolution.split_once('x')?;
    if width.chars().all(|c| c.is_ascii_digit())
        && height.chars().all(|c| c.is_ascii_digit())
        && !width.is_empty()
        && !height.is_empty()
    {
        Some(resolution.to_string())
    } else {
        None
    }
}

/// Diagonal in inches from the "527mm x 296mm" tail of a connected line.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn diagonal_inches(line: &str) -> Option<f64> {
    let mut dims = line
        .split_whitespace()
        .filter_map(|f| f.strip_suffix("mm"))
        .filter_map(|v| v.parse::<f64>().ok());
    let width = dims.next()?;
    let height = dims.next()?;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((width * width + height * height).sqrt() / 25.4)
}

/// One monitor name per non-empty output line from the PowerShell query.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_monitor_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|name| format!("Monitor: {name}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const XRANDR_SAMPLE: &str = "\
Screen 0: minimum 320 x 200, current 1920 x 1080, maximum 16384 x 16384
HDMI-1 connected primary 1920x1080+0+0 (0x47) normal (normal left inverted right x axis y axis) 527mm x 296mm
\tIdentifier: 0x42
\tEDID:
\t\t00ffffffffffff004c2d0e0c33353255
eDP-1 connected 1366x768+1920+0 (0x48) normal (normal left inverted right x axis y axis) 309mm x 173mm
VGA-1 disconnected (normal left inverted right x axis y axis)
";

    #[test]
    fn test_parse_xrandr() {
        let monitors = parse_xrandr(XRANDR_SAMPLE);
        assert_eq!(monitors.len(), 2);
        assert_eq!(
            monitors[0],
            "Monitor: HDMI-1, Resolução: 1920x1080, Tamanho: 23.8\""
        );
        assert_eq!(
            monitors[1],
            "Monitor: eDP-1, Resolução: 1366x768, Tamanho: 13.9\""
        );
    }

    #[test]
    fn test_parse_xrandr_skips_disconnected() {
        let monitors = parse_xrandr("VGA-1 disconnected (normal)\n");
        assert!(monitors.is_empty());
        assert!(parse_xrandr("").is_empty());
    }

    #[test]
    fn test_parse_xrandr_without_dimensions() {
        let monitors = parse_xrandr("HDMI-1 connected (normal)\n");
        assert_eq!(monitors, vec!["Monitor: HDMI-1"]);
    }

    #[test]
    fn test_geometry_resolution() {
        assert_eq!(
            geometry_resolution("1920x1080+0+0").as_deref(),
            Some("1920x1080")
        );
        assert!(geometry_resolution("primary").is_none());
        assert!(geometry_resolution("(0x47)").is_none());
    }

    #[test]
    fn test_diagonal_inches() {
        let inches = diagonal_inches("HDMI-1 connected 527mm x 296mm").unwrap();
        assert!((inches - 23.8).abs() < 0.1);
        assert!(diagonal_inches("HDMI-1 connected").is_none());
    }

    #[test]
    fn test_parse_monitor_names() {
        let monitors = parse_monitor_names("S24F350\r\nLG ULTRAWIDE\r\n\r\n");
        assert_eq!(
            monitors,
            vec!["Monitor: S24F350", "Monitor: LG ULTRAWIDE"]
        );
    }
}
