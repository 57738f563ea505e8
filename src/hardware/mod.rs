//! Platform hardware reader.
//!
//! Best-effort accessors for user, hostname, CPU, disk, RAM, and monitors.
//! Every accessor returns a descriptive string (or string list) and never
//! fails the caller: internal errors degrade to a Portuguese placeholder.

pub mod cpu;
pub mod disk;
pub mod identity;
pub mod monitor;
pub mod ram;

use crate::record::InventoryRecord;

/// Collect every hardware fact into a fresh record. Operator fields and the
/// collection timestamp stay empty; they are filled later in the flow.
pub fn collect() -> InventoryRecord {
    tracing::info!("collecting hardware data");

    let record = InventoryRecord {
        logged_user: identity::logged_user(),
        device_name: identity::device_name(),
        processor: cpu::summary(),
        disk: disk::summary(),
        ram: ram::summary(),
        monitors: monitor::list(),
        operating_system: identity::operating_system(),
        department: None,
        sector: None,
        employee_id: None,
        operator_name: None,
        notes: None,
        collected_at: None,
    };

    tracing::info!(device = %record.device_name, "hardware data collected");
    record
}

/// Render the collected facts for `coletor detectar` and the CLI flow.
pub fn display(record: &InventoryRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("Usuário logado:       {}\n", record.logged_user));
    out.push_str(&format!("Nome do dispositivo:  {}\n", record.device_name));
    out.push_str(&format!("Sistema operacional:  {}\n", record.operating_system));
    out.push_str(&format!("Processador:          {}\n", record.processor));
    out.push_str(&format!("Disco:                {}\n", record.disk));
    out.push_str(&format!("RAM:                  {}\n", record.ram));
    // Monitor entries already carry their own "Monitor:" label.
    for monitor in &record.monitors {
        out.push_str(monitor);
        out.push('\n');
    }
    out
}
