//! # Comissão dos Mecânicos
//!
//! Este crate importa o **Relatório de Comissão dos Mecânicos** exportado em PDF
//! pelo sistema da concessionária e o transforma em registros estruturados:
//! um resumo por mecânico e o detalhe de cada ordem de serviço (OS).
//!
//! ## Como o relatório chega
//!
//! O extrator de PDF entrega o texto em ordem de leitura, um item por linha,
//! e cola colunas vizinhas sem separador:
//!
//! ```text
//! Mecânico:  JOAO SILVA
//! 68146
//! 110,00275,00          ← comissão + valor do serviço
//! 15/01/2026
//! TRR ZANFORLIN COM
//! COMBUSTIVEIS LTDA
//! 2.098,405.246,01      ← totais do mecânico
//! TOTAL MECÂNICO:
//! 2.098,40
//! ```
//!
//! ## Arquitetura Principal
//!
//! ### 1. Parser (`parser`)
//! Função pura `texto → ParseResult`, em camadas:
//! - **numbers**: números brasileiros, inclusive colados
//! - **classifier**: categoria de cada linha
//! - **orders**: blocos de OS
//! - **sections**: totais e trechos de cada mecânico (com quebras de página)
//!
//! ### 2. Leitura (`utils`)
//! PDF → texto normalizado, com limite de tamanho.
//!
//! ### 3. Importação (`import` + `store`)
//! Substituição por competência (ano/mês) num [`store::CommissionStore`].
//!
//! ### 4. Servidor (`server`, feature `server`)
//! Upload do PDF e consulta dos resumos via HTTP.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use comissao_mecanicos::prelude::*;
//!
//! let text = "De 01/01/2026 até 31/01/2026\n\
//!             Mecânico:  JOAO SILVA\n\
//!             68146\n\
//!             110,00275,00\n\
//!             CLIENTE TESTE\n\
//!             110,00275,00\n\
//!             TOTAL MECÂNICO:\n\
//!             110,00";
//!
//! let result = parse(text).unwrap();
//! assert_eq!(result.mechanics[0].commission_percent, 40.0);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais compartilhados por todo o sistema.
///
/// - [`ReportPeriod`]: competência (mês/ano) do relatório
/// - [`WorkOrderRecord`]: uma OS de um mecânico
/// - [`MechanicRecord`]: resumo de um mecânico
/// - [`ParseResult`]: resultado completo do parse
pub mod types;

/// Parser do relatório de comissão.
///
/// Contém:
/// - `ReportParser`: parser configurável, com parse em lote (Rayon)
/// - `parse`: atalho com as regras padrão
/// - `ParseError`: único erro fatal (competência ausente)
pub mod parser;

/// Utilitários diversos.
///
/// - Leitura de PDF/texto com limite de tamanho
/// - Normalização e comparação de texto sem acento
pub mod utils;

/// Interface de armazenamento e implementação em memória.
#[allow(missing_docs)]
pub mod store;

/// Importação: parse + substituição por competência no store.
#[allow(missing_docs)]
pub mod import;

/// Servidor HTTP (feature `server`).
#[cfg(feature = "server")]
pub mod server;

/// Configuração da importação via variáveis de ambiente.
///
/// - `MECANICOS_MAX_FILE_SIZE`: tamanho máximo do PDF (padrão: 100MB)
/// - `MECANICOS_BATCH_SIZE`: linhas de detalhe por lote (padrão: 500)
/// - `MECANICOS_LINHAS_IGNORADAS`: prefixos extras de ruído de página
/// - `MECANICOS_SAIDA`: formato da CLI ("json", "tabela")
/// - `MECANICOS_PORTA`: porta do servidor HTTP (padrão: 3000)
pub mod config;

// Re-exports principais
pub use config::{load_import_config, ImportConfig, OutputFormat};
pub use import::{CommissionImporter, ImportError, ImportSummary};
pub use parser::{parse, ParseError, ReportParser};
pub use store::{CommissionStore, InMemoryStore, StoreError};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// Importar tudo de uma vez:
/// ```rust
/// use comissao_mecanicos::prelude::*;
/// ```
pub mod prelude {
    pub use crate::import::{CommissionImporter, ImportError, ImportSummary};
    pub use crate::parser::classifier::{LineClassifier, LineKind};
    pub use crate::parser::numbers::format_br;
    pub use crate::parser::{parse, ParseError, ReportParser};
    pub use crate::store::{CommissionStore, InMemoryStore};
    pub use crate::types::*;
    pub use crate::utils::{FileReader, FileType};
}
