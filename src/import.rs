// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPORTAÇÃO DE RELATÓRIOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Texto do relatório → parse → substituição por competência no store.
//
//   1. parse; nenhum mecânico → erro, store intocado
//   2. resumos: apaga a competência e insere (falha aqui é fatal)
//   3. detalhes: apaga a competência e insere em lotes (falha é tolerada)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{ImportConfig, DEFAULT_BATCH_SIZE};
use crate::parser::{ParseError, ReportParser};
use crate::store::{CommissionDetailRow, CommissionRow, CommissionStore, StoreError};
use crate::types::{ParseResult, ReportPeriod};
use crate::utils::{FileReader, FileReaderError};

/// Erros da importação
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Reader(#[from] FileReaderError),

    #[error("Nenhum mecanico encontrado no PDF")]
    NoMechanics,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resultado de uma importação bem-sucedida.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub import_id: Uuid,
    pub imported_at: DateTime<Utc>,
    pub period: ReportPeriod,
    /// Mecânicos gravados
    pub mechanics: usize,
    /// OS detalhadas encontradas
    pub orders: usize,
    /// `false` quando a gravação dos detalhes falhou
    pub details_stored: bool,
    /// Resumos da mesma competência removidos antes da inserção
    pub replaced_rows: usize,
    /// Soma dos valores de serviço dos mecânicos
    pub total_service_value: f64,
    /// Soma das comissões dos mecânicos
    pub total_commission: f64,
    pub grand_total_service_value: f64,
    pub grand_total_commission: f64,
}

/// Serviço de importação sobre um [`CommissionStore`].
pub struct CommissionImporter {
    store: Arc<dyn CommissionStore>,
    parser: ReportParser,
    reader: FileReader,
    batch_size: usize,
}

impl CommissionImporter {
    /// Importador com parser e leitor padrão.
    pub fn new(store: Arc<dyn CommissionStore>) -> Self {
        Self {
            store,
            parser: ReportParser::new(),
            reader: FileReader::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Importador configurado (prefixos extras, limite de arquivo, lotes).
    pub fn from_config(store: Arc<dyn CommissionStore>, config: &ImportConfig) -> Self {
        Self {
            store,
            parser: ReportParser::from_config(config),
            reader: FileReader::from_config(config),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Define o tamanho dos lotes de detalhe.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Store em uso
    pub fn store(&self) -> &Arc<dyn CommissionStore> {
        &self.store
    }

    /// Leitor de arquivos em uso
    pub fn reader(&self) -> &FileReader {
        &self.reader
    }

    /// Lê um arquivo local (PDF ou texto) e importa.
    ///
    /// A extração de PDF é síncrona; em contexto async prefira extrair em
    /// `spawn_blocking` e chamar [`import_text`](Self::import_text).
    pub async fn import_file(&self, path: &str) -> Result<ImportSummary, ImportError> {
        let content = self.reader.read_file(path)?;
        self.import_text(&content.text).await
    }

    /// Importa o texto já extraído de um relatório.
    pub async fn import_text(&self, text: &str) -> Result<ImportSummary, ImportError> {
        let result = self.parser.parse(text)?;
        if result.mechanics.is_empty() {
            log::warn!("⚠️ Relatório {} sem mecânicos; nada gravado", result.period);
            return Err(ImportError::NoMechanics);
        }

        let import_id = Uuid::new_v4();
        let imported_at = Utc::now();
        let period = result.period;

        let summaries: Vec<CommissionRow> = result
            .mechanics
            .iter()
            .map(|m| CommissionRow::from_record(import_id, imported_at, period, m))
            .collect();

        let replaced_rows = self.store.delete_summaries(period).await?;
        self.store.insert_summaries(&summaries).await?;
        log::info!(
            "💾 Competência {}: {} resumos substituídos, {} inseridos",
            period,
            replaced_rows,
            summaries.len()
        );

        let details_stored = match self.store_details(import_id, imported_at, &result).await {
            Ok(inserted) => {
                log::info!("💾 Competência {}: {} OS detalhadas", period, inserted);
                true
            }
            Err(e) => {
                log::warn!("⚠️ Falha ao gravar detalhes de {}: {}", period, e);
                false
            }
        };

        Ok(ImportSummary {
            import_id,
            imported_at,
            period,
            mechanics: result.mechanics.len(),
            orders: result.detail_count(),
            details_stored,
            replaced_rows,
            total_service_value: result.mechanics.iter().map(|m| m.service_value_total).sum(),
            total_commission: result.mechanics.iter().map(|m| m.commission_total).sum(),
            grand_total_service_value: result.grand_total_service_value,
            grand_total_commission: result.grand_total_commission,
        })
    }

    async fn store_details(
        &self,
        import_id: Uuid,
        imported_at: DateTime<Utc>,
        result: &ParseResult,
    ) -> Result<usize, StoreError> {
        let rows: Vec<CommissionDetailRow> = result
            .mechanics
            .iter()
            .flat_map(|m| {
                m.orders.iter().map(move |order| {
                    CommissionDetailRow::from_order(import_id, imported_at, result.period, &m.name, order)
                })
            })
            .collect();

        self.store.delete_details(result.period).await?;

        let mut inserted = 0;
        for batch in rows.chunks(self.batch_size) {
            inserted += self.store.insert_details(batch).await?;
        }
        Ok(inserted)
    }
}
