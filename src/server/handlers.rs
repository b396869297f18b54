// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ENDPOINT HANDLERS - upload e consulta de comissões
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::types::*;
use super::AppState;
use crate::import::{ImportError, ImportSummary};
use crate::utils::FileType;

// ── GET /health ─────────────────────────────────

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ── POST /api/mecanicos/upload ──────────────────

/// Recebe o PDF no corpo, extrai, faz o parse e grava por competência.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Response {
    let file_name = query.arquivo.unwrap_or_default();
    if body.is_empty() || file_name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Nenhum arquivo enviado");
    }
    if !file_name.to_lowercase().ends_with(".pdf") {
        return error_response(StatusCode::BAD_REQUEST, "Apenas arquivos PDF sao aceitos");
    }

    log::info!("[upload] {} ({} bytes)", file_name, body.len());

    // pdf_extract é síncrono e pesado: fora do executor async
    let reader = state.importer.reader().clone();
    let source = file_name.clone();
    let extracted =
        tokio::task::spawn_blocking(move || reader.read_bytes(&source, &body, FileType::Pdf)).await;

    let content = match extracted {
        Ok(Ok(content)) => content,
        Ok(Err(e)) => return import_error_response(&file_name, e.into()),
        Err(e) => {
            log::error!("[upload] Extração de {} abortou: {}", file_name, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Erro ao processar PDF: {}", e),
            );
        }
    };

    match state.importer.import_text(&content.text).await {
        Ok(summary) => upload_response(&summary).into_response(),
        Err(e) => import_error_response(&file_name, e),
    }
}

// ── GET /api/mecanicos ──────────────────────────

/// Resumos gravados de um ano, opcionalmente filtrados por mês.
pub async fn list(State(state): State<Arc<AppState>>, Query(query): Query<ListQuery>) -> Response {
    let Some(year) = query.ano.as_deref().and_then(|v| v.trim().parse::<i32>().ok()) else {
        return error_response(StatusCode::BAD_REQUEST, "Parametro 'ano' obrigatorio");
    };
    let month = query
        .mes
        .as_deref()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m));

    match state.store.list_summaries(year, month).await {
        Ok(data) => Json(ListResponse { data }).into_response(),
        Err(e) => {
            log::error!("[mecanicos] Falha na consulta: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

// ── Helpers ─────────────────────────────────────

/// Totais do "TOTAL GERAL:" do relatório, não a soma dos mecânicos.
fn upload_response(summary: &ImportSummary) -> Json<UploadResponse> {
    Json(UploadResponse {
        success: true,
        periodo: summary.period.label(),
        mecanicos: summary.mechanics,
        total_servicos: summary.grand_total_service_value,
        total_comissao: summary.grand_total_commission,
    })
}

fn import_error_response(file_name: &str, err: ImportError) -> Response {
    if matches!(err, ImportError::NoMechanics) {
        return error_response(StatusCode::BAD_REQUEST, &err.to_string());
    }

    log::error!("[upload] Falha ao importar {}: {}", file_name, err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &format!("Erro ao processar PDF: {}", err),
    )
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportConfig;
    use crate::store::InMemoryStore;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(InMemoryStore::new()), &ImportConfig::default()))
    }

    async fn error_of(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiError = serde_json::from_slice(&bytes).unwrap();
        (status, body.error)
    }

    fn upload_query(name: &str) -> Query<UploadQuery> {
        Query(UploadQuery {
            arquivo: Some(name.to_string()),
        })
    }

    #[tokio::test]
    async fn test_upload_without_body() {
        let response = upload(State(state()), upload_query("comissao.pdf"), Bytes::new()).await;
        assert_eq!(
            error_of(response).await,
            (StatusCode::BAD_REQUEST, "Nenhum arquivo enviado".to_string())
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let response = upload(
            State(state()),
            upload_query("comissao.xlsx"),
            Bytes::from_static(b"conteudo"),
        )
        .await;
        assert_eq!(
            error_of(response).await,
            (StatusCode::BAD_REQUEST, "Apenas arquivos PDF sao aceitos".to_string())
        );
    }

    #[tokio::test]
    async fn test_upload_invalid_pdf_is_server_error() {
        let response = upload(
            State(state()),
            upload_query("comissao.pdf"),
            Bytes::from_static(b"nao e pdf"),
        )
        .await;
        let (status, message) = error_of(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.starts_with("Erro ao processar PDF"));
    }

    #[tokio::test]
    async fn test_upload_response_carries_grand_totals() {
        let state = state();
        let summary = state
            .importer
            .import_text(
                "De 01/01/2026 até 31/01/2026\nMecânico:  ANA\n68146\n10,0025,00\nCLIENTE\n10,0025,00\nTOTAL MECÂNICO:\n10,00\n99,00999,00TOTAL GERAL:99,00",
            )
            .await
            .unwrap();

        let response = upload_response(&summary).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: UploadResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.success);
        assert_eq!(body.periodo, "1/2026");
        assert_eq!(body.mecanicos, 1);
        assert_eq!(body.total_servicos, 999.0);
        assert_eq!(body.total_comissao, 99.0);
    }

    #[tokio::test]
    async fn test_list_requires_year() {
        let response = list(State(state()), Query(ListQuery::default())).await;
        assert_eq!(
            error_of(response).await,
            (StatusCode::BAD_REQUEST, "Parametro 'ano' obrigatorio".to_string())
        );
    }

    #[tokio::test]
    async fn test_list_returns_imported_rows() {
        let state = state();
        state
            .importer
            .import_text(
                "De 01/01/2026 até 31/01/2026\nMecânico:  ANA\n68146\n10,0025,00\nCLIENTE\n10,0025,00\nTOTAL MECÂNICO:\n10,00",
            )
            .await
            .unwrap();

        let response = list(
            State(state),
            Query(ListQuery {
                ano: Some("2026".into()),
                mes: Some("1".into()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ListResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].mechanic_name, "ANA");
        assert_eq!(body.data[0].service_value_total, 25.0);
    }
}
