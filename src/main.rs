// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// COMISSÃO DOS MECÂNICOS CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// CLI para conferência dos relatórios de comissão.
//
// Uso:
//   comissao-mecanicos-cli relatorio_janeiro.pdf
//   comissao-mecanicos-cli --json janeiro.pdf fevereiro.pdf
//   comissao-mecanicos-cli --server --port=3000   (feature "server")
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use comissao_mecanicos::config::{load_import_config, ImportConfig, OutputFormat};
use comissao_mecanicos::prelude::*;
use std::path::PathBuf;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [PathBuf::from(".env"), PathBuf::from("../.env")];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    log::debug!("✓ Carregado .env de: {:?}", path);
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Comissão dos Mecânicos CLI v{}", comissao_mecanicos::VERSION);
    eprintln!();
    eprintln!("Uso: {} [--json] <arquivo.pdf|arquivo.txt>...", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --json             Saída em JSON (padrão: MECANICOS_SAIDA ou tabela)");
    eprintln!("  --server           Inicia o servidor HTTP (feature \"server\")");
    eprintln!("  --port=<porta>     Porta do servidor (padrão: MECANICOS_PORTA ou 3000)");
    eprintln!();
    eprintln!("Exemplos:");
    eprintln!("  {} comissao_janeiro.pdf", program);
    eprintln!("  {} --json comissao_janeiro.pdf comissao_fevereiro.pdf", program);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    // Inicializar logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("comissao-mecanicos-cli");

    let mut config = load_import_config();
    let mut server_mode = false;
    let mut files: Vec<String> = Vec::new();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--json" => config.output = OutputFormat::Json,
            "--server" => server_mode = true,
            "-h" | "--help" => {
                print_usage(program);
                return Ok(());
            }
            other if other.starts_with("--port=") => {
                let value = &other["--port=".len()..];
                config.port = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Porta inválida: {}", value))?;
            }
            other if other.starts_with("--") => {
                eprintln!("Opção desconhecida: {}", other);
                print_usage(program);
                std::process::exit(2);
            }
            file => files.push(file.to_string()),
        }
    }

    if server_mode {
        return run_server(config).await;
    }

    if files.is_empty() {
        print_usage(program);
        std::process::exit(1);
    }

    let failures = run_files(&files, &config);
    if failures > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Lê, faz o parse e imprime cada arquivo. Retorna quantos falharam.
fn run_files(files: &[String], config: &ImportConfig) -> usize {
    let reader = FileReader::from_config(config);
    let parser = ReportParser::from_config(config);
    let mut failures = 0;

    let mut loaded: Vec<(&str, String)> = Vec::with_capacity(files.len());
    for path in files {
        match reader.read_file(path) {
            Ok(content) => loaded.push((path.as_str(), content.text)),
            Err(e) => {
                eprintln!("✗ {}: {}", path, e);
                failures += 1;
            }
        }
    }

    let texts: Vec<&str> = loaded.iter().map(|(_, text)| text.as_str()).collect();
    let results = parser.parse_batch(&texts);

    for ((path, _), result) in loaded.iter().zip(results) {
        match result {
            Ok(result) if result.mechanics.is_empty() => {
                eprintln!("✗ {}: Nenhum mecanico encontrado no PDF", path);
                failures += 1;
            }
            Ok(result) => match config.output {
                OutputFormat::Json => match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("✗ {}: {}", path, e);
                        failures += 1;
                    }
                },
                OutputFormat::Table => print_table(path, &result),
            },
            Err(e) => {
                eprintln!("✗ {}: {}", path, e);
                failures += 1;
            }
        }
    }

    failures
}

fn print_table(path: &str, result: &ParseResult) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" COMPETÊNCIA {}  ({})", result.period, path);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!(
        "{:<30} {:>4} {:>14} {:>14} {:>7}",
        "MECÂNICO", "OS", "SERVIÇOS", "COMISSÃO", "%"
    );

    for mechanic in &result.mechanics {
        println!(
            "{:<30} {:>4} {:>14} {:>14} {:>7}",
            mechanic.name,
            mechanic.order_count,
            format_br(mechanic.service_value_total),
            format_br(mechanic.commission_total),
            format_br(mechanic.commission_percent)
        );
    }

    println!();
    println!(
        "{:<30} {:>4} {:>14} {:>14}",
        "TOTAL GERAL",
        result.detail_count(),
        format_br(result.grand_total_service_value),
        format_br(result.grand_total_commission)
    );
    println!();
}

#[cfg(feature = "server")]
async fn run_server(config: ImportConfig) -> anyhow::Result<()> {
    use comissao_mecanicos::server::{start_server, AppState};
    use std::net::SocketAddr;
    use std::sync::Arc;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let store: Arc<dyn CommissionStore> = Arc::new(InMemoryStore::new());
    let state = Arc::new(AppState::new(store, &config));

    start_server(addr, state).await
}

#[cfg(not(feature = "server"))]
async fn run_server(_config: ImportConfig) -> anyhow::Result<()> {
    anyhow::bail!("Servidor indisponível: compile com --features server")
}
