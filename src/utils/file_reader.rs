//! # File Reader Utilities
//!
//! Leitura dos relatórios exportados pelo sistema da concessionária e
//! extração do texto em ordem de leitura, pronto para o parser.
//!
//! ## Funcionalidades Principais
//!
//! - **Detecção de tipo**: pela extensão do arquivo ou pelo content-type
//! - **Extração de PDF**: via `pdf_extract`, com stderr silenciado e panics
//!   do extrator convertidos em erro
//! - **Texto pré-extraído**: arquivos `.txt` são aceitos como estão
//! - **Normalização**: quebras de linha, quebras de página e caracteres de controle
//!
//! ## Exemplo de Uso
//!
//! ```rust,no_run
//! use comissao_mecanicos::utils::file_reader::FileReader;
//!
//! let reader = FileReader::new();
//! let content = reader.read_file("comissao_janeiro.pdf")?;
//! println!("Linhas extraídas: {}", content.line_count);
//! # Ok::<(), comissao_mecanicos::utils::file_reader::FileReaderError>(())
//! ```
//!
//! ## Limites
//!
//! - Tamanho máximo de arquivo: 100MB (configurável via [`FileReader::with_max_size`])
//!
//! ## Tipos de Arquivo Suportados
//!
//! | Tipo | Extensões | Extração de Texto |
//! |------|-----------|-------------------|
//! | PDF | `.pdf` | ✅ `pdf_extract` |
//! | Texto | `.txt` | ✅ UTF-8 direto |
//! | Outros | - | ❌ Não |

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use thiserror::Error;

use super::text::{line_count, normalize_extracted_text};
use crate::config::{ImportConfig, DEFAULT_MAX_FILE_SIZE};

/// Erros que podem ocorrer durante a leitura de um relatório.
///
/// # Exemplo
///
/// ```rust
/// use comissao_mecanicos::utils::file_reader::FileReaderError;
///
/// fn handle_error(err: FileReaderError) {
///     match err {
///         FileReaderError::FileTooLarge { size, max } => {
///             eprintln!("Arquivo muito grande: {} bytes (máximo: {})", size, max);
///         }
///         FileReaderError::EmptyDocument => eprintln!("PDF sem texto"),
///         _ => eprintln!("Erro: {}", err),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum FileReaderError {
    /// Arquivo excede o limite máximo de tamanho permitido.
    #[error("Arquivo muito grande: {size} bytes (máximo: {max})")]
    FileTooLarge {
        /// Tamanho do arquivo em bytes
        size: u64,
        /// Limite máximo permitido em bytes
        max: u64,
    },

    /// Tipo de arquivo sem extração de texto.
    #[error("Tipo de arquivo não suportado: {0}")]
    UnsupportedType(String),

    /// Falha ao extrair texto de um arquivo PDF.
    ///
    /// Pode ocorrer quando o PDF está corrompido, protegido por senha,
    /// ou quando o extrator entra em panic numa estrutura inesperada.
    #[error("Falha ao extrair texto do PDF: {0}")]
    PdfExtractionError(String),

    /// O documento foi lido mas não contém texto (ex.: PDF escaneado).
    #[error("Documento sem texto extraível")]
    EmptyDocument,

    /// Erro de entrada/saída do sistema de arquivos.
    #[error("Erro de I/O: {0}")]
    IoError(#[from] std::io::Error),
}

/// Tipos de arquivo reconhecidos pelo leitor.
///
/// # Exemplo
///
/// ```rust
/// use comissao_mecanicos::utils::file_reader::FileType;
///
/// assert_eq!(FileType::from_path("relatorio.PDF"), FileType::Pdf);
/// assert_eq!(FileType::from_content_type("application/pdf"), FileType::Pdf);
/// assert_eq!(FileType::from_path("extraido.txt"), FileType::Text);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FileType {
    /// Documento PDF exportado pelo sistema.
    Pdf,

    /// Texto já extraído, um item por linha.
    Text,

    /// Tipo desconhecido; o [`String`] guarda a extensão ou content-type.
    Unknown(String),
}

impl FileType {
    /// Detecta o tipo pela extensão do caminho (case-insensitive).
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();

        if lower.ends_with(".pdf") {
            Self::Pdf
        } else if lower.ends_with(".txt") {
            Self::Text
        } else {
            let ext = Path::new(&lower)
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            Self::Unknown(ext)
        }
    }

    /// Detecta o tipo pelo header Content-Type (aceita parâmetros como charset).
    pub fn from_content_type(content_type: &str) -> Self {
        let ct_lower = content_type.to_lowercase();

        if ct_lower.contains("application/pdf") {
            Self::Pdf
        } else if ct_lower.contains("text/plain") {
            Self::Text
        } else {
            Self::Unknown(content_type.to_string())
        }
    }
}

/// Texto extraído de um relatório, com metadados.
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Caminho ou nome original do arquivo.
    pub source: String,

    /// Tipo detectado do arquivo.
    pub file_type: FileType,

    /// Texto normalizado, uma linha por item do relatório.
    pub text: String,

    /// Tamanho original do arquivo em bytes (antes da extração de texto).
    pub size_bytes: u64,

    /// Número de linhas não vazias no texto extraído.
    pub line_count: usize,
}

/// Leitor de relatórios com verificação de tamanho e extração de texto.
///
/// # Configuração
///
/// ```rust
/// use comissao_mecanicos::utils::file_reader::FileReader;
///
/// let reader = FileReader::new()
///     .with_max_size(50 * 1024 * 1024); // 50MB
/// ```
///
/// # Thread Safety
///
/// O `FileReader` não guarda estado mutável e pode ser compartilhado entre
/// threads usando `Arc<FileReader>`.
#[derive(Debug, Clone)]
pub struct FileReader {
    /// Tamanho máximo de arquivo permitido em bytes
    max_size: u64,
}

impl FileReader {
    /// Cria um leitor com o limite padrão de 100MB.
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Define o tamanho máximo de arquivo permitido (builder pattern).
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Leitor com o limite da configuração.
    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new().with_max_size(config.max_file_size)
    }

    /// Limite de tamanho em uso.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Lê um relatório do sistema de arquivos local.
    ///
    /// O tamanho é verificado pelos metadados antes de carregar o arquivo.
    ///
    /// # Erros
    ///
    /// - [`FileReaderError::IoError`] - Arquivo não encontrado ou sem permissão
    /// - [`FileReaderError::FileTooLarge`] - Arquivo excede o limite configurado
    /// - [`FileReaderError::UnsupportedType`] - Extensão diferente de `.pdf`/`.txt`
    /// - [`FileReaderError::PdfExtractionError`] - Falha ao extrair texto de PDF
    pub fn read_file(&self, path: &str) -> Result<FileContent, FileReaderError> {
        log::info!("📂 Lendo arquivo local: {}", path);

        let size = std::fs::metadata(path)?.len();
        self.check_size(size)?;

        let data = std::fs::read(path)?;
        self.read_bytes(path, &data, FileType::from_path(path))
    }

    /// Processa um relatório já carregado em memória (ex.: corpo de upload).
    pub fn read_bytes(
        &self,
        source: &str,
        data: &[u8],
        file_type: FileType,
    ) -> Result<FileContent, FileReaderError> {
        let size_bytes = data.len() as u64;
        self.check_size(size_bytes)?;

        let raw = match &file_type {
            FileType::Pdf => Self::extract_pdf_text(data)?,
            FileType::Text => String::from_utf8_lossy(data).into_owned(),
            FileType::Unknown(kind) => {
                return Err(FileReaderError::UnsupportedType(if kind.is_empty() {
                    source.to_string()
                } else {
                    kind.clone()
                }));
            }
        };

        let text = normalize_extracted_text(&raw);
        let line_count = line_count(&text);

        if line_count == 0 {
            return Err(FileReaderError::EmptyDocument);
        }

        log::info!(
            "✅ Arquivo processado: {} | tipo={:?} | {} bytes | {} linhas",
            source,
            file_type,
            size_bytes,
            line_count
        );

        Ok(FileContent {
            source: source.to_string(),
            file_type,
            text,
            size_bytes,
            line_count,
        })
    }

    /// Extrai texto de um PDF em memória, em ordem de leitura.
    ///
    /// O `pdf_extract` escreve avisos direto no stderr e pode entrar em panic
    /// com fontes malformadas; os dois casos são contidos aqui.
    pub fn extract_pdf_text(data: &[u8]) -> Result<String, FileReaderError> {
        log::info!("📄 Extraindo texto de PDF ({} bytes)", data.len());

        // Gag falha se outro Gag já estiver ativo; nesse caso só não silencia.
        let _silence = gag::Gag::stderr().ok();

        match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(data))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(FileReaderError::PdfExtractionError(e.to_string())),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic no extrator".to_string());
                log::error!("❌ pdf_extract entrou em panic: {}", message);
                Err(FileReaderError::PdfExtractionError(message))
            }
        }
    }

    fn check_size(&self, size: u64) -> Result<(), FileReaderError> {
        if size > self.max_size {
            return Err(FileReaderError::FileTooLarge {
                size,
                max: self.max_size,
            });
        }
        Ok(())
    }
}

impl Default for FileReader {
    fn default() -> Self {
        Self::new()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TESTES UNITÁRIOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
