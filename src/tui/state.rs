//! TUI application state types.

use std::sync::mpsc;
use std::time::Instant;

use crate::flow::Outcome;
use crate::record::{InventoryRecord, OperatorInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Form,
    Submitting,
    Result,
}

/// How the blocking form call ended, returned to `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TuiExit {
    /// Operator cancelled; nothing was sent.
    Cancelled,
    /// Flow ran to completion with this outcome.
    Finished(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Department,
    Sector,
    EmployeeId,
    Name,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Department,
        FormField::Sector,
        FormField::EmployeeId,
        FormField::Name,
        FormField::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Department => "Secretaria",
            FormField::Sector => "Setor",
            FormField::EmployeeId => "Matrícula",
            FormField::Name => "Nome",
            FormField::Notes => "Observações",
        }
    }

    pub fn required(&self) -> bool {
        !matches!(self, FormField::Notes)
    }

    pub fn next(&self) -> FormField {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> FormField {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Editable operator form state.
#[derive(Debug, Clone, Default)]
pub(crate) struct OperatorForm {
    pub department: String,
    pub sector: String,
    pub employee_id: String,
    pub name: String,
    pub notes: String,
}

impl OperatorForm {
    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Department => &mut self.department,
            FormField::Sector => &mut self.sector,
            FormField::EmployeeId => &mut self.employee_id,
            FormField::Name => &mut self.name,
            FormField::Notes => &mut self.notes,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Department => &self.department,
            FormField::Sector => &self.sector,
            FormField::EmployeeId => &self.employee_id,
            FormField::Name => &self.name,
            FormField::Notes => &self.notes,
        }
    }

    pub fn to_operator_info(&self) -> OperatorInfo {
        OperatorInfo {
            department: self.department.trim().to_string(),
            sector: self.sector.trim().to_string(),
            employee_id: self.employee_id.trim().to_string(),
            name: self.name.trim().to_string(),
            notes: self.notes.trim().to_string(),
        }
    }
}

/// Handle to the submit worker thread; the outcome arrives over `rx`.
#[derive(Debug)]
pub(crate) struct SubmitState {
    pub started_at: Instant,
    pub rx: mpsc::Receiver<Outcome>,
}

pub(crate) struct App {
    pub screen: Screen,
    /// Collected hardware record; taken by the submit worker.
    pub record: Option<InventoryRecord>,
    /// Snapshot of the hardware facts for the read-only panel.
    pub hardware_lines: Vec<(String, String)>,
    pub form: OperatorForm,
    pub field: FormField,
    /// Inline validation messages; cleared on the next edit.
    pub issues: Vec<String>,
    pub submit: Option<SubmitState>,
    pub outcome: Option<Outcome>,
    pub exit: Option<TuiExit>,
    pub last_tick: Instant,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(record: InventoryRecord) -> Self {
        let mut hardware_lines = vec![
            ("Usuário".to_string(), record.logged_user.clone()),
            ("Dispositivo".to_string(), record.device_name.clone()),
            ("Sistema".to_string(), record.operating_system.clone()),
            ("Processador".to_string(), record.processor.clone()),
            ("Disco".to_string(), record.disk.clone()),
            (
                "RAM".to_string(),
                record.ram.lines().next().unwrap_or_default().to_string(),
            ),
        ];
        for monitor in &record.monitors {
            hardware_lines.push(("Monitor".to_string(), monitor.clone()));
        }

        Self {
            screen: Screen::Form,
            record: Some(record),
            hardware_lines,
            form: OperatorForm::default(),
            field: FormField::Department,
            issues: Vec::new(),
            submit: None,
            outcome: None,
            exit: None,
            last_tick: Instant::now(),
            spinner_frame: 0,
        }
    }

    pub fn spinner_char(&self) -> char {
        const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
        FRAMES[self.spinner_frame % FRAMES.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_cycle_wraps() {
        assert_eq!(FormField::Notes.next(), FormField::Department);
        assert_eq!(FormField::Department.prev(), FormField::Notes);
        assert_eq!(FormField::Sector.next(), FormField::EmployeeId);
    }

    #[test]
    fn test_to_operator_info_trims() {
        let mut form = OperatorForm::default();
        *form.value_mut(FormField::Name) = "  Maria  ".to_string();
        assert_eq!(form.to_operator_info().name, "Maria");
    }

    #[test]
    fn test_required_fields() {
        assert!(FormField::Department.required());
        assert!(!FormField::Notes.required());
    }
}
