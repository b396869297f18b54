// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP SERVER - Upload e consulta de comissões
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! Servidor HTTP para importar relatórios e consultar os resumos gravados.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/mecanicos/upload?arquivo=relatorio.pdf` - PDF no corpo
//! - `GET /api/mecanicos?ano=2026&mes=1` - Resumos da competência
//!
//! ## Uso
//!
//! ```bash
//! cargo run --features server -- --server --port=3000
//! ```

#[allow(missing_docs)]
pub mod types;
#[allow(missing_docs)]
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

use crate::config::ImportConfig;
use crate::import::CommissionImporter;
use crate::store::CommissionStore;

pub use types::*;

/// Estado compartilhado entre todos os handlers
pub struct AppState {
    /// Importador (parser + leitor + store)
    pub importer: CommissionImporter,
    /// Store consultado pela listagem
    pub store: Arc<dyn CommissionStore>,
    /// Limite do corpo do upload, igual ao `max_file_size` do leitor
    pub max_upload_size: usize,
}

impl AppState {
    /// Estado com importador configurado sobre o store.
    pub fn new(store: Arc<dyn CommissionStore>, config: &ImportConfig) -> Self {
        Self {
            importer: CommissionImporter::from_config(store.clone(), config),
            store,
            max_upload_size: usize::try_from(config.max_file_size).unwrap_or(usize::MAX),
        }
    }
}

/// Monta o router com todas as rotas e o CORS.
///
/// O limite padrão de corpo do axum (2MB) é substituído pelo limite de
/// tamanho configurado, para que o leitor decida sobre arquivos grandes.
pub fn router(state: Arc<AppState>) -> Router {
    use axum::extract::DefaultBodyLimit;
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/mecanicos/upload", post(handlers::upload))
        .route("/api/mecanicos", get(handlers::list))
        .layer(DefaultBodyLimit::max(state.max_upload_size))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Inicia o servidor HTTP no endereço especificado.
///
/// Entry point chamado de main.rs quando `--server` é passado.
pub async fn start_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Servidor de comissões ouvindo em http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
