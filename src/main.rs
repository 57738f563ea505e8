//! Coletor - workstation inventory registration
//!
//! Collects hardware facts (CPU, disk, RAM, monitors, user, hostname),
//! asks the operator for the registration metadata, checks the inventory
//! service for an existing registration, and submits the combined record.

mod api;
mod cli;
mod config;
mod flow;
mod hardware;
mod record;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

#[cfg(target_os = "windows")]
use windows_sys::Win32::Foundation::INVALID_HANDLE_VALUE;
#[cfg(target_os = "windows")]
use windows_sys::Win32::System::Console::{
    GetConsoleMode, GetStdHandle, SetConsoleCP, SetConsoleMode, SetConsoleOutputCP,
    ENABLE_PROCESSED_OUTPUT, ENABLE_VIRTUAL_TERMINAL_PROCESSING, ENABLE_WRAP_AT_EOL_OUTPUT,
    STD_ERROR_HANDLE, STD_OUTPUT_HANDLE,
};

/// Coletor de inventário - registra esta máquina no serviço de patrimônio
#[derive(Parser)]
#[command(name = "coletor")]
#[command(version)]
#[command(about = "Coleta dados de hardware e envia ao serviço de inventário")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fluxo guiado de coleta e envio (padrão)
    Coletar {
        /// Usa o formulário linha a linha mesmo em terminais interativos
        #[arg(long, default_value_t = false)]
        no_tui: bool,
    },

    /// Coleta e exibe os dados de hardware, sem envio
    Detectar,

    /// Exibe o caminho e os valores da configuração
    Config,
}

fn main() -> Result<()> {
    #[cfg(target_os = "windows")]
    init_windows_console();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Coletar { no_tui }) => run_guided_flow(no_tui)?,
        None => run_guided_flow(false)?,
        Some(Commands::Detectar) => {
            let record = hardware::collect();
            print!("{}", hardware::display(&record));
        }
        Some(Commands::Config) => {
            let path = config::Config::config_path()?;
            let config = if path.exists() {
                config::Config::load()?
            } else {
                let config = config::Config::default();
                config.save()?;
                println!("{}", "Arquivo de configuração padrão criado.".bright_green());
                config
            };
            println!("Arquivo de configuração: {}", config::get_config_path()?);
            println!("URL base da API:         {}", config.resolved_base_url());
            println!(
                "Timeout das requisições: {}s",
                config.resolved_timeout_seconds()
            );
        }
    }

    Ok(())
}

fn run_guided_flow(no_tui: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let record = hardware::collect();
    if let Err(err) = record.maybe_debug_dump() {
        tracing::warn!(error = %err, "debug dump failed");
    }

    // Fullscreen form when running interactively; line-by-line prompts for
    // redirected stdin/stdout or when explicitly requested.
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    if interactive && !no_tui {
        match tui::run_tui(&rt, record.clone()) {
            Ok(tui::TuiExit::Cancelled) => {
                println!("{}", "Operação cancelada pelo usuário.".bright_yellow());
            }
            Ok(tui::TuiExit::Finished(outcome)) => {
                // The alternate screen is gone; leave the outcome in the
                // scrollback as well.
                cli::print_outcome(&outcome);
            }
            Err(err) => {
                println!(
                    "{} {}",
                    "Não foi possível iniciar a interface:".bright_red(),
                    err.to_string().bright_red()
                );
                println!("{}", "Usando o formulário linha a linha...".bright_yellow());
                cli::run_flow(&rt, record)?;
            }
        }
    } else {
        cli::run_flow(&rt, record)?;
    }

    Ok(())
}

#[cfg(target_os = "windows")]
fn init_windows_console() {
    // Best-effort enabling of UTF-8 output and ANSI/VT sequences so the
    // accented Portuguese strings render in legacy hosts. If the handle
    // isn't a console (e.g., redirected), these calls fail harmlessly.
    unsafe {
        let _ = SetConsoleOutputCP(65001);
        let _ = SetConsoleCP(65001);

        for handle_id in [STD_OUTPUT_HANDLE, STD_ERROR_HANDLE] {
            let handle = GetStdHandle(handle_id);
            if handle.is_null() || handle == INVALID_HANDLE_VALUE {
                continue;
            }

            let mut mode: u32 = 0;
            if GetConsoleMode(handle, &mut mode) == 0 {
                continue;
            }

            let desired = mode
                | ENABLE_PROCESSED_OUTPUT
                | ENABLE_WRAP_AT_EOL_OUTPUT
                | ENABLE_VIRTUAL_TERMINAL_PROCESSING;
            let _ = SetConsoleMode(handle, desired);
        }
    }
}
