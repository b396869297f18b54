// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PARSER DO RELATÓRIO DE COMISSÃO DOS MECÂNICOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Texto extraído → ParseResult, em cinco camadas:
//
//   numbers     → tokenização de números brasileiros
//   classifier  → categoria de cada linha (LineKind)
//   orders      → blocos de OS dentro do trecho de um mecânico
//   sections    → totais e trechos de cada mecânico
//   (este mod)  → competência, total geral e montagem final
//
// Tudo é síncrono e sem estado global mutável; documentos independentes podem
// ser processados em paralelo (ver `ReportParser::parse_batch`).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod classifier;
pub mod numbers;
pub mod orders;
pub mod sections;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use thiserror::Error;

use crate::config::ImportConfig;
use crate::types::{MechanicRecord, ParseResult, ReportPeriod};
use crate::utils::compose_accents;
use classifier::{LineClassifier, LineKind, GRAND_TOTAL_RE};
use numbers::{leading_number, BR_NUMBER};
use orders::segment_orders;
use sections::{count_distinct_orders, resolve_sections, MechanicSection};

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bde\s+(\d{2})/(\d{2})/(\d{4})\s+at[eé]").expect("padrão de período inválido")
});

static GRAND_TOTAL_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)({0})({0})\s*total\s+geral:", BR_NUMBER))
        .expect("padrão do total geral inválido")
});

/// Erros fatais do parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Não há "De DD/MM/AAAA até" válido no texto.
    #[error("Período do relatório não encontrado (esperado \"De DD/MM/AAAA até ...\")")]
    MissingPeriod,
}

/// Parser de relatórios de comissão.
///
/// Guarda apenas o classificador de linhas; é `Send + Sync` e pode ser
/// compartilhado entre threads.
///
/// # Exemplo
///
/// ```rust
/// use comissao_mecanicos::parser::ReportParser;
///
/// let text = "De 01/01/2026 até 31/01/2026\n\
///             Mecânico:  JOAO SILVA\n\
///             68146\n\
///             110,00275,00\n\
///             CLIENTE TESTE\n\
///             110,00275,00\n\
///             TOTAL MECÂNICO:\n\
///             110,00";
///
/// let result = ReportParser::new().parse(text).unwrap();
/// assert_eq!(result.period.month, 1);
/// assert_eq!(result.mechanics[0].name, "JOAO SILVA");
/// assert_eq!(result.mechanics[0].commission_total, 110.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportParser {
    classifier: LineClassifier,
}

impl ReportParser {
    /// Parser com as regras padrão.
    pub fn new() -> Self {
        Self::default()
    }

    /// Usa um classificador customizado (ex.: com prefixos extras).
    pub fn with_classifier(mut self, classifier: LineClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Parser com os prefixos de boilerplate da configuração.
    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new().with_classifier(
            LineClassifier::new().with_extra_boilerplate(config.extra_boilerplate.iter().cloned()),
        )
    }

    /// Classificador em uso.
    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Converte o texto extraído de um relatório em registros estruturados.
    ///
    /// Acentos decompostos são recompostos antes da classificação. Falha apenas quando não há competência. Nenhum mecânico encontrado
    /// resulta em `Ok` com lista vazia; cabe ao chamador tratar.
    pub fn parse(&self, raw_text: &str) -> Result<ParseResult, ParseError> {
        // alguns extratores emitem acentos decompostos (NFD)
        let text = compose_accents(raw_text);
        let period = extract_period(&text).ok_or(ParseError::MissingPeriod)?;

        let lines: Vec<&str> = text.lines().collect();
        let kinds: Vec<LineKind<'_>> = lines
            .iter()
            .map(|&line| self.classifier.classify(line))
            .collect();

        let mechanics: Vec<MechanicRecord> = resolve_sections(&lines, &kinds)
            .iter()
            .map(|section| self.build_mechanic(section, &lines))
            .collect();

        let (grand_total_service_value, grand_total_commission) = extract_grand_totals(&lines);

        log::debug!(
            "📊 Relatório {}: {} mecânicos, {} OS detalhadas",
            period,
            mechanics.len(),
            mechanics.iter().map(|m| m.orders.len()).sum::<usize>()
        );

        Ok(ParseResult {
            period,
            mechanics,
            grand_total_service_value,
            grand_total_commission,
        })
    }

    /// Processa vários documentos independentes em paralelo, preservando a
    /// ordem de entrada.
    pub fn parse_batch(&self, documents: &[&str]) -> Vec<Result<ParseResult, ParseError>> {
        documents.par_iter().map(|text| self.parse(text)).collect()
    }

    fn build_mechanic(&self, section: &MechanicSection<'_>, lines: &[&str]) -> MechanicRecord {
        let span = section.text_lines(lines);
        let orders = segment_orders(&span, &self.classifier);
        let order_count = count_distinct_orders(&span);

        MechanicRecord::new(
            section.name,
            section.service_value_total,
            section.commission_total,
            order_count,
            orders,
        )
    }
}

/// Atalho para `ReportParser::new().parse(raw_text)`.
pub fn parse(raw_text: &str) -> Result<ParseResult, ParseError> {
    ReportParser::new().parse(raw_text)
}

/// Competência a partir da primeira ocorrência de "De DD/MM/AAAA até" com
/// mês válido.
///
/// Só mês e ano importam: um dia impossível no cabeçalho (ex.: 31/02) não
/// invalida a competência. Mês fora de 1..=12 é pulado.
pub fn extract_period(text: &str) -> Option<ReportPeriod> {
    PERIOD_RE.captures_iter(text).find_map(|caps| {
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;

        // dia 1 sempre existe: valida mês e ano sem depender do dia impresso
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| ReportPeriod::new(year, month))
    })
}

/// `(valor de serviços, comissão)` da linha "TOTAL GERAL:", ou `(0, 0)`.
///
/// Layout: `{comissão}{serviços}TOTAL GERAL:{comissão}`. A comissão vem do
/// número logo após o rótulo; os serviços, do segundo número do par colado
/// antes dele.
pub fn extract_grand_totals(lines: &[&str]) -> (f64, f64) {
    let Some(line) = lines.iter().find(|line| GRAND_TOTAL_RE.is_match(line)) else {
        return (0.0, 0.0);
    };

    let commission = GRAND_TOTAL_RE
        .find(line)
        .and_then(|label| leading_number(&line[label.end()..]))
        .unwrap_or(0.0);

    let service_value = GRAND_TOTAL_PAIR_RE
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map_or(0.0, |m| numbers::parse_br_number(m.as_str()));

    (service_value, commission)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
RELATÓRIO DE COMISSÃO DOS MECÂNICOS
De 01/01/2026 até 31/01/2026
Mecânico:  JOAO SILVA
68146
110,00275,00
15/01/2026
110,0040,00
TRR ZANFORLIN COM
COMBUSTIVEIS LTDA
110,00275,00
TOTAL MECÂNICO:
110,00
110,00275,00TOTAL GERAL:110,00";

    #[test]
    fn test_parse_single_mechanic() {
        let result = parse(SAMPLE).unwrap();

        assert_eq!(result.period, ReportPeriod::new(2026, 1));
        assert_eq!(result.mechanics.len(), 1);

        let joao = &result.mechanics[0];
        assert_eq!(joao.name, "JOAO SILVA");
        assert_eq!(joao.commission_total, 110.0);
        assert_eq!(joao.service_value_total, 275.0);
        assert_eq!(joao.commission_percent, 40.0);
        assert_eq!(joao.order_count, 1);
        assert_eq!(joao.orders.len(), 1);
        assert_eq!(joao.orders[0].client_name, "TRR ZANFORLIN COM COMBUSTIVEIS LTDA");
        assert_eq!(joao.orders[0].commission, 110.0);
        assert_eq!(joao.orders[0].service_value, 275.0);

        assert_eq!(result.grand_total_service_value, 275.0);
        assert_eq!(result.grand_total_commission, 110.0);
    }

    #[test]
    fn test_missing_period_is_fatal() {
        let text = SAMPLE.replace("De 01/01/2026 até 31/01/2026", "Sem período");
        assert_eq!(parse(&text), Err(ParseError::MissingPeriod));
    }

    #[test]
    fn test_extract_period() {
        assert_eq!(
            extract_period("De 01/03/2025 até 31/03/2025"),
            Some(ReportPeriod::new(2025, 3))
        );
        assert_eq!(
            extract_period("período: de 01/12/2025 ate 31/12/2025"),
            Some(ReportPeriod::new(2025, 12))
        );
        assert_eq!(extract_period("01/03/2025 até 31/03/2025"), None);
    }

    #[test]
    fn test_extract_period_ignores_impossible_day() {
        assert_eq!(
            extract_period("De 31/02/2026 até 28/02/2026"),
            Some(ReportPeriod::new(2026, 2))
        );
        let text = SAMPLE.replace("De 01/01/2026", "De 31/02/2026");
        assert_eq!(parse(&text).unwrap().period, ReportPeriod::new(2026, 2));
    }

    #[test]
    fn test_extract_period_skips_invalid_months() {
        assert_eq!(extract_period("De 01/00/2025 até 31/00/2025"), None);
        assert_eq!(
            extract_period("De 31/13/2025 até x\nDe 01/04/2025 até 30/04/2025"),
            Some(ReportPeriod::new(2025, 4))
        );
    }

    #[test]
    fn test_parse_decomposed_accents() {
        let text = "De 01/01/2026 ate\u{301} 31/01/2026\n\
                    Meca\u{302}nico:  ANA\n\
                    10,0020,00\n\
                    TOTAL MECA\u{302}NICO:\n\
                    10,00";

        let result = parse(text).unwrap();

        assert_eq!(result.period, ReportPeriod::new(2026, 1));
        assert_eq!(result.mechanics.len(), 1);
        assert_eq!(result.mechanics[0].name, "ANA");
        assert_eq!(result.mechanics[0].commission_total, 10.0);
        assert_eq!(result.mechanics[0].service_value_total, 20.0);
    }

    #[test]
    fn test_extract_grand_totals() {
        let lines = ["67.481,60156.942,75TOTAL GERAL:67.481,60"];
        assert_eq!(extract_grand_totals(&lines), (156942.75, 67481.60));

        let lines = ["TOTAL GERAL: 10,00"];
        assert_eq!(extract_grand_totals(&lines), (0.0, 10.0));

        let lines = ["nada aqui"];
        assert_eq!(extract_grand_totals(&lines), (0.0, 0.0));
    }

    #[test]
    fn test_zero_mechanics_is_ok() {
        let result = parse("De 01/01/2026 até 31/01/2026\nPágina 1").unwrap();
        assert!(result.mechanics.is_empty());
        assert_eq!(result.grand_total_commission, 0.0);
    }

    #[test]
    fn test_parse_batch_preserves_order() {
        let other = SAMPLE.replace("01/01/2026 até 31/01/2026", "01/02/2026 até 28/02/2026");
        let docs = [SAMPLE, "sem período", other.as_str()];

        let results = ReportParser::new().parse_batch(&docs);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().period.month, 1);
        assert_eq!(results[1], Err(ParseError::MissingPeriod));
        assert_eq!(results[2].as_ref().unwrap().period.month, 2);
    }

    #[test]
    fn test_from_config_applies_extra_boilerplate() {
        let text = SAMPLE.replace("COMBUSTIVEIS LTDA", "FILIAL CENTRO");
        let config = ImportConfig {
            extra_boilerplate: vec!["Filial".to_string()],
            ..ImportConfig::default()
        };

        let result = ReportParser::from_config(&config).parse(&text).unwrap();
        assert_eq!(result.mechanics[0].orders[0].client_name, "TRR ZANFORLIN COM");
    }
}
