// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ARMAZENAMENTO DAS COMISSÕES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Interface consumida pela importação: apagar por competência e inserir
// linhas. Duas tabelas lógicas:
//   - resumo: uma linha por mecânico na competência
//   - detalhe: uma linha por OS
// O backend real (banco) fica fora do crate; `InMemoryStore` atende testes
// e o servidor embutido.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{MechanicRecord, ReportPeriod, WorkOrderRecord};

/// Erros do armazenamento
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Armazenamento indisponível")]
    Unavailable,

    #[error("Erro no armazenamento: {0}")]
    Backend(String),
}

/// Linha de resumo: um mecânico numa competência.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRow {
    pub import_id: Uuid,
    pub imported_at: DateTime<Utc>,
    pub year: i32,
    pub month: u32,
    pub mechanic_name: String,
    pub service_value_total: f64,
    pub commission_total: f64,
    pub commission_percent: f64,
    pub order_count: usize,
}

impl CommissionRow {
    /// Linha de resumo de um mecânico importado.
    pub fn from_record(
        import_id: Uuid,
        imported_at: DateTime<Utc>,
        period: ReportPeriod,
        mechanic: &MechanicRecord,
    ) -> Self {
        Self {
            import_id,
            imported_at,
            year: period.year,
            month: period.month,
            mechanic_name: mechanic.name.clone(),
            service_value_total: mechanic.service_value_total,
            commission_total: mechanic.commission_total,
            commission_percent: mechanic.commission_percent,
            order_count: mechanic.order_count,
        }
    }

    /// Competência da linha
    pub fn period(&self) -> ReportPeriod {
        ReportPeriod::new(self.year, self.month)
    }
}

/// Linha de detalhe: uma OS de um mecânico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionDetailRow {
    pub import_id: Uuid,
    pub imported_at: DateTime<Utc>,
    pub year: i32,
    pub month: u32,
    pub mechanic_name: String,
    pub order_number: String,
    pub client_name: String,
    pub service_value: f64,
    pub commission: f64,
}

impl CommissionDetailRow {
    /// Linha de detalhe de uma OS importada.
    pub fn from_order(
        import_id: Uuid,
        imported_at: DateTime<Utc>,
        period: ReportPeriod,
        mechanic_name: &str,
        order: &WorkOrderRecord,
    ) -> Self {
        Self {
            import_id,
            imported_at,
            year: period.year,
            month: period.month,
            mechanic_name: mechanic_name.to_string(),
            order_number: order.order_number.clone(),
            client_name: order.client_name.clone(),
            service_value: order.service_value,
            commission: order.commission,
        }
    }

    /// Competência da linha
    pub fn period(&self) -> ReportPeriod {
        ReportPeriod::new(self.year, self.month)
    }
}

/// Trait principal de armazenamento
///
/// Operações de apagar retornam o número de linhas removidas; as de inserir,
/// o número de linhas gravadas.
#[async_trait]
pub trait CommissionStore: Send + Sync {
    /// Remove os resumos da competência
    async fn delete_summaries(&self, period: ReportPeriod) -> Result<usize, StoreError>;

    /// Insere resumos
    async fn insert_summaries(&self, rows: &[CommissionRow]) -> Result<usize, StoreError>;

    /// Remove os detalhes da competência
    async fn delete_details(&self, period: ReportPeriod) -> Result<usize, StoreError>;

    /// Insere detalhes
    async fn insert_details(&self, rows: &[CommissionDetailRow]) -> Result<usize, StoreError>;

    /// Resumos de um ano (ou de um mês), do maior valor de serviços para o menor
    async fn list_summaries(
        &self,
        year: i32,
        month: Option<u32>,
    ) -> Result<Vec<CommissionRow>, StoreError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO EM MEMÓRIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Store em memória, thread-safe.
///
/// Lock envenenado vira `StoreError::Unavailable`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    summaries: RwLock<Vec<CommissionRow>>,
    details: RwLock<Vec<CommissionDetailRow>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantidade de resumos gravados
    pub fn summary_count(&self) -> usize {
        self.summaries.read().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Quantidade de detalhes gravados
    pub fn detail_count(&self) -> usize {
        self.details.read().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Cópia dos detalhes de uma competência
    pub fn details_for(&self, period: ReportPeriod) -> Vec<CommissionDetailRow> {
        self.details
            .read()
            .map(|rows| rows.iter().filter(|r| r.period() == period).cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommissionStore for InMemoryStore {
    async fn delete_summaries(&self, period: ReportPeriod) -> Result<usize, StoreError> {
        let mut rows = self.summaries.write().map_err(|_| StoreError::Unavailable)?;
        let before = rows.len();
        rows.retain(|r| r.period() != period);
        Ok(before - rows.len())
    }

    async fn insert_summaries(&self, new_rows: &[CommissionRow]) -> Result<usize, StoreError> {
        let mut rows = self.summaries.write().map_err(|_| StoreError::Unavailable)?;
        rows.extend_from_slice(new_rows);
        Ok(new_rows.len())
    }

    async fn delete_details(&self, period: ReportPeriod) -> Result<usize, StoreError> {
        let mut rows = self.details.write().map_err(|_| StoreError::Unavailable)?;
        let before = rows.len();
        rows.retain(|r| r.period() != period);
        Ok(before - rows.len())
    }

    async fn insert_details(&self, new_rows: &[CommissionDetailRow]) -> Result<usize, StoreError> {
        let mut rows = self.details.write().map_err(|_| StoreError::Unavailable)?;
        rows.extend_from_slice(new_rows);
        Ok(new_rows.len())
    }

    async fn list_summaries(
        &self,
        year: i32,
        month: Option<u32>,
    ) -> Result<Vec<CommissionRow>, StoreError> {
        let rows = self.summaries.read().map_err(|_| StoreError::Unavailable)?;

        let mut selected: Vec<CommissionRow> = rows
            .iter()
            .filter(|r| r.year == year && month.map_or(true, |m| r.month == m))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.service_value_total.total_cmp(&a.service_value_total));

        Ok(selected)
    }
}
