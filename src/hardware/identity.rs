//! Logged-in user, hostname, and OS identification.
//!
//! Best-effort accessors: environment first, shell-out second, Portuguese
//! placeholder last. Never fails the caller.

use std::process::Command;
use sysinfo::System;

pub const UNKNOWN_USER: &str = "Usuário desconhecido";
pub const UNKNOWN_DEVICE: &str = "Dispositivo desconhecido";

/// Name of the logged-in user.
pub fn logged_user() -> String {
    let env_key = if cfg!(target_os = "windows") {
        "USERNAME"
    } else {
        "USER"
    };

    if let Ok(user) = std::env::var(env_key) {
        let user = user.trim();
        if !user.is_empty() {
            return strip_domain(user).to_string();
        }
    }

    if let Ok(output) = Command::new("whoami").output() {
        if output.status.success() {
            let user = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !user.is_empty() {
                return strip_domain(&user).to_string();
            }
        }
    }

    tracing::debug!("could not determine logged user");
    UNKNOWN_USER.to_string()
}

/// Windows reports `DOMAIN\user`; keep only the user part.
fn strip_domain(user: &str) -> &str {
    match user.rsplit_once('\\') {
        Some((_, name)) if !name.is_empty() => name,
        _ => user,
    }
}

/// Device hostname.
pub fn device_name() -> String {
    if let Some(host) = System::host_name() {
        let host = host.trim().to_string();
        if !host.is_empty() {
            return host;
        }
    }

    if let Ok(output) = Command::new("hostname").output() {
        if output.status.success() {
            let host = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !host.is_empty() {
                return host;
            }
        }
    }

    tracing::debug!("could not determine hostname");
    UNKNOWN_DEVICE.to_string()
}

/// OS name plus architecture, e.g. "linux x86_64".
pub fn operating_system() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_domain() {
        assert_eq!(strip_domain("PREFEITURA\\maria"), "maria");
        assert_eq!(strip_domain("maria"), "maria");
        assert_eq!(strip_domain("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_operating_system_has_os_and_arch() {
        let os = operating_system();
        let parts: Vec<&str> = os.split_whitespace().collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], std::env::consts::OS);
    }

    #[test]
    fn test_logged_user_never_empty() {
        assert!(!logged_user().is_empty());
    }
}
