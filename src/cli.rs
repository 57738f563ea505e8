//! Line-by-line fallback form for non-TTY environments.
//!
//! Mirrors the terminal form: required fields re-prompt while empty, notes
//! are optional, and a final S/N confirmation gates the submission. An
//! exhausted stdin (EOF on a pipe) counts as cancellation.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use crate::api::ApiClient;
use crate::flow::{self, Outcome};
use crate::hardware;
use crate::record::{InventoryRecord, OperatorInfo};

/// Outcome of the blocking form: either complete operator data or a cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormExit {
    Submitted(OperatorInfo),
    Cancelled,
}

/// Run the whole collect → form → check → submit flow on plain stdin/stdout.
pub fn run_flow(rt: &tokio::runtime::Runtime, record: InventoryRecord) -> Result<()> {
    println!();
    println!("{}", "=== DADOS DE HARDWARE COLETADOS ===".bright_cyan().bold());
    print!("{}", hardware::display(&record));

    let operator = match prompt_form()? {
        FormExit::Submitted(operator) => operator,
        FormExit::Cancelled => {
            println!("{}", "Operação cancelada pelo usuário.".bright_yellow());
            return Ok(());
        }
    };

    println!();
    println!("{}", "Enviando dados...".bright_cyan());

    let config = crate::config::Config::load().unwrap_or_default();
    let api = ApiClient::new(&config);
    let outcome = rt.block_on(flow::run_submission(&api, record, &operator, Local::now()));
    print_outcome(&outcome);
    Ok(())
}

/// Line-by-line operator form on stdin. Blocks until complete or cancelled.
pub fn prompt_form() -> Result<FormExit> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    prompt_form_from(&mut reader)
}

fn prompt_form_from(reader: &mut impl BufRead) -> Result<FormExit> {
    println!();
    println!("{}", "=== FORMULÁRIO DE COLETA DE DADOS ===".bright_cyan().bold());
    println!("{}", "PREENCHA AS INFORMAÇÕES ABAIXO:".bright_white());

    let Some(department) = prompt_required(reader, "Secretaria")? else {
        return Ok(FormExit::Cancelled);
    };
    let Some(sector) = prompt_required(reader, "Setor")? else {
        return Ok(FormExit::Cancelled);
    };
    let Some(employee_id) = prompt_required(reader, "Matrícula")? else {
        return Ok(FormExit::Cancelled);
    };
    let Some(name) = prompt_required(reader, "Nome")? else {
        return Ok(FormExit::Cancelled);
    };
    let Some(notes) = prompt_line(reader, "Observações")? else {
        return Ok(FormExit::Cancelled);
    };

    print!("\n{} ", "Deseja enviar os dados? (S/N):".bright_yellow());
    let _ = io::stdout().flush();
    let Some(confirmation) = read_line(reader)? else {
        return Ok(FormExit::Cancelled);
    };
    let confirmation = confirmation.trim().to_uppercase();
    if confirmation != "S" && confirmation != "SIM" {
        return Ok(FormExit::Cancelled);
    }

    Ok(FormExit::Submitted(OperatorInfo {
        department,
        sector,
        employee_id,
        name,
        notes,
    }))
}

pub fn print_outcome(outcome: &Outcome) {
    println!();
    if outcome.is_success() {
        println!("{}", format!("=== {} ===", outcome.title()).bright_green().bold());
    } else {
        println!("{}", format!("=== {} ===", outcome.title()).bright_red().bold());
    }
    println!("{}", outcome.message());
    println!();
}

/// Re-prompt until the operator enters a non-empty value. `None` means
/// stdin is exhausted and the form should be treated as cancelled.
fn prompt_required(reader: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    loop {
        let Some(value) = prompt_line(reader, label)? else {
            return Ok(None);
        };
        if !value.is_empty() {
            return Ok(Some(value));
        }
        println!(
            "{}",
            format!("Erro: {label} é um campo obrigatório.").bright_red()
        );
    }
}

fn prompt_line(reader: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    print!("{} ", format!("{label}:").bright_white());
    let _ = io::stdout().flush();
    Ok(read_line(reader)?.map(|line| line.trim().to_string()))
}

/// One line from the reader, `None` at end of input (0 bytes read).
fn read_line(reader: &mut impl BufRead) -> Result<Option<String>> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_stdin_cancels_instead_of_looping() {
        let mut input = Cursor::new("");
        let exit = prompt_form_from(&mut input).unwrap();
        assert_eq!(exit, FormExit::Cancelled);
    }

    #[test]
    fn test_eof_mid_form_cancels() {
        let mut input = Cursor::new("Educação\nTI\n");
        let exit = prompt_form_from(&mut input).unwrap();
        assert_eq!(exit, FormExit::Cancelled);
    }

    #[test]
    fn test_complete_form_submits() {
        let mut input = Cursor::new("Educação\nTI\n12345\nMaria Silva\nsala 3\nS\n");
        let exit = prompt_form_from(&mut input).unwrap();
        match exit {
            FormExit::Submitted(operator) => {
                assert_eq!(operator.department, "Educação");
                assert_eq!(operator.employee_id, "12345");
                assert_eq!(operator.notes, "sala 3");
            }
            other => panic!("expected Submitted, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_required_field_reprompts() {
        // Blank Secretaria re-prompts once, then the form completes.
        let mut input = Cursor::new("\nEducação\nTI\n12345\nMaria\n\nSIM\n");
        let exit = prompt_form_from(&mut input).unwrap();
        match exit {
            FormExit::Submitted(operator) => {
                assert_eq!(operator.department, "Educação");
                assert_eq!(operator.notes, "");
            }
            other => panic!("expected Submitted, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_confirmation_cancels() {
        let mut input = Cursor::new("Educação\nTI\n12345\nMaria\n\nN\n");
        let exit = prompt_form_from(&mut input).unwrap();
        assert_eq!(exit, FormExit::Cancelled);
    }
}
