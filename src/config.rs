// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DA IMPORTAÇÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Limites do leitor de PDF, lotes de gravação, linhas extras a ignorar e
// formato de saída da CLI. Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;

/// Tamanho máximo padrão do PDF (100MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Linhas de detalhe por lote de inserção.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Porta padrão do servidor HTTP.
pub const DEFAULT_PORT: u16 = 3000;

/// Formato de saída da CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON indentado, um documento por arquivo.
    Json,

    /// Tabela com valores no formato brasileiro (padrão).
    #[default]
    Table,
}

impl OutputFormat {
    /// Converte string do .env para OutputFormat.
    ///
    /// Case-insensitive:
    /// - "json" → Json
    /// - "tabela", "table" ou qualquer outro valor → Table
    pub fn from_env(value: &str) -> Self {
        match value.to_lowercase().trim() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }

    /// Retorna nome legível para logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Table => "Tabela",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Configuração da importação de relatórios.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// Tamanho máximo aceito para o arquivo, em bytes.
    pub max_file_size: u64,

    /// Linhas de detalhe por lote de inserção no store.
    pub batch_size: usize,

    /// Prefixos de linha extras tratados como ruído de página
    /// (ex.: razão social da concessionária).
    pub extra_boilerplate: Vec<String>,

    /// Formato de saída da CLI.
    pub output: OutputFormat,

    /// Porta do servidor HTTP.
    pub port: u16,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            extra_boilerplate: Vec::new(),
            output: OutputFormat::default(),
            port: DEFAULT_PORT,
        }
    }
}

impl ImportConfig {
    /// Cria configuração padrão.
    pub fn new() -> Self {
        Self::default()
    }

    /// Monta a configuração a partir de uma função de consulta de variáveis.
    ///
    /// Valores inválidos são ignorados e o padrão é mantido.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // MECANICOS_MAX_FILE_SIZE: limite do arquivo em bytes
        if let Some(size) = lookup("MECANICOS_MAX_FILE_SIZE").and_then(|v| v.trim().parse::<u64>().ok()) {
            if size > 0 {
                config.max_file_size = size;
                log::info!("📦 MECANICOS_MAX_FILE_SIZE={}", size);
            }
        }

        // MECANICOS_BATCH_SIZE: linhas por lote
        if let Some(batch) = lookup("MECANICOS_BATCH_SIZE").and_then(|v| v.trim().parse::<usize>().ok()) {
            if batch > 0 {
                config.batch_size = batch;
                log::info!("📦 MECANICOS_BATCH_SIZE={}", batch);
            }
        }

        // MECANICOS_LINHAS_IGNORADAS: prefixos separados por vírgula
        if let Some(raw) = lookup("MECANICOS_LINHAS_IGNORADAS") {
            config.extra_boilerplate = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
            log::info!("📦 MECANICOS_LINHAS_IGNORADAS={:?}", config.extra_boilerplate);
        }

        // MECANICOS_SAIDA: json | tabela
        if let Some(output) = lookup("MECANICOS_SAIDA") {
            config.output = OutputFormat::from_env(&output);
            log::info!("📦 MECANICOS_SAIDA={}", config.output);
        }

        // MECANICOS_PORTA: porta HTTP
        if let Some(port) = lookup("MECANICOS_PORTA").and_then(|v| v.trim().parse::<u16>().ok()) {
            if port > 0 {
                config.port = port;
                log::info!("📦 MECANICOS_PORTA={}", port);
            }
        }

        config
    }
}

/// Carrega a configuração a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `MECANICOS_MAX_FILE_SIZE`: tamanho máximo do PDF em bytes (padrão: 100MB)
/// - `MECANICOS_BATCH_SIZE`: linhas de detalhe por lote (padrão: 500)
/// - `MECANICOS_LINHAS_IGNORADAS`: prefixos extras de ruído, separados por vírgula
/// - `MECANICOS_SAIDA`: formato da CLI ("json", "tabela")
/// - `MECANICOS_PORTA`: porta do servidor HTTP (padrão: 3000)
///
/// # Exemplo
///
/// ```rust,ignore
/// // .env
/// MECANICOS_BATCH_SIZE=200
/// MECANICOS_LINHAS_IGNORADAS=SANCES VEICULOS,FILIAL 02
///
/// // código
/// let config = load_import_config();
/// assert_eq!(config.batch_size, 200);
/// ```
pub fn load_import_config() -> ImportConfig {
    ImportConfig::from_lookup(|key| std::env::var(key).ok())
}
