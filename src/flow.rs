//! Submission orchestration.
//!
//! Stamp the collection timestamp, run the duplicate-registration check,
//! and only then submit. The API sits behind a trait so the sequencing
//! rules are testable without a server.

use chrono::{DateTime, Local};

use crate::api::{ApiClient, ApiError, RegistrationStatus};
use crate::record::{InventoryRecord, OperatorInfo};

/// Final user-visible outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Record accepted by the service (HTTP 201).
    Submitted(String),
    /// Device and/or employee id already registered; nothing was sent.
    AlreadyRegistered(String),
    /// Check or submit failed; message carries the underlying error.
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Submitted(_))
    }

    pub fn title(&self) -> &'static str {
        match self {
            Outcome::Submitted(_) => "Sucesso",
            Outcome::AlreadyRegistered(_) => "Cadastro existente",
            Outcome::Failed(_) => "Erro",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Submitted(msg) | Outcome::AlreadyRegistered(msg) | Outcome::Failed(msg) => msg,
        }
    }
}

/// The two service calls the orchestrator depends on.
pub trait InventoryApi {
    fn check_existing(
        &self,
        device_name: &str,
        employee_id: &str,
    ) -> impl std::future::Future<Output = Result<RegistrationStatus, ApiError>> + Send;

    fn submit(
        &self,
        record: &InventoryRecord,
    ) -> impl std::future::Future<Output = Result<String, ApiError>> + Send;
}

impl InventoryApi for ApiClient {
    async fn check_existing(
        &self,
        device_name: &str,
        employee_id: &str,
    ) -> Result<RegistrationStatus, ApiError> {
        ApiClient::check_existing(self, device_name, employee_id).await
    }

    async fn submit(&self, record: &InventoryRecord) -> Result<String, ApiError> {
        ApiClient::submit(self, record).await
    }
}

/// Enrich the record with operator data and the submission timestamp, then
/// check for an existing registration and submit when clear.
pub async fn run_submission<A: InventoryApi>(
    api: &A,
    mut record: InventoryRecord,
    operator: &OperatorInfo,
    now: DateTime<Local>,
) -> Outcome {
    record.apply_operator(operator);
    record.stamp_collected_at(now);

    let employee_id = record.employee_id.clone().unwrap_or_default();
    let status = match api.check_existing(&record.device_name, &employee_id).await {
        Ok(status) => status,
        Err(err) => {
            tracing::warn!(error = %err, "duplicate check failed");
            return Outcome::Failed(format!(
                "Não foi possível verificar se o cadastro já existe: {err}"
            ));
        }
    };

    if let Some(message) = conflict_message(&status) {
        tracing::info!("registration already exists, skipping submit");
        return Outcome::AlreadyRegistered(message);
    }

    match api.submit(&record).await {
        Ok(message) => {
            tracing::info!(device = %record.device_name, "record submitted");
            Outcome::Submitted(message)
        }
        Err(err) => {
            tracing::warn!(error = %err, "submit failed");
            Outcome::Failed(err.to_string())
        }
    }
}

/// Conflict message for an already-registered device/employee id, `None`
/// when submission may proceed.
fn conflict_message(status: &RegistrationStatus) -> Option<String> {
    if !status.already_exists {
        return None;
    }
    let base = if status.device_exists && status.employee_id_exists {
        "Esta máquina e esta matrícula já estão registradas no sistema."
    } else if status.device_exists {
        "Esta máquina já está registrada no sistema."
    } else if status.employee_id_exists {
        "Esta matrícula já está registrada no sistema."
    } else {
        "Este cadastro já existe no sistema."
    };
    Some(format!("{base} Não é possível cadastrar novamente."))
}
