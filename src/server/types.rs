// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SCHEMAS API - Comissão dos mecânicos
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::store::CommissionRow;

// ─────────────────────────────────────────────────
// Upload
// ─────────────────────────────────────────────────

/// Query de POST /api/mecanicos/upload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    /// Nome original do arquivo enviado
    pub arquivo: Option<String>,
}

/// Resposta de sucesso do upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Competência no formato "M/AAAA"
    pub periodo: String,
    pub mecanicos: usize,
    pub total_servicos: f64,
    pub total_comissao: f64,
}

// ─────────────────────────────────────────────────
// Consulta
// ─────────────────────────────────────────────────

/// Query de GET /api/mecanicos
///
/// Os valores chegam como texto para que a validação devolva a mensagem
/// da API em vez da rejeição padrão do extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub ano: Option<String>,
    pub mes: Option<String>,
}

/// Resposta de GET /api/mecanicos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<CommissionRow>,
}

// ─────────────────────────────────────────────────
// Erro
// ─────────────────────────────────────────────────

/// Corpo de erro: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}
