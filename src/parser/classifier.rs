// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLASSIFICADOR DE LINHAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Cada linha do texto extraído cai em exatamente uma categoria de
// `LineKind`. As regras são avaliadas em ordem fixa:
//
//   1. linha vazia             → Boilerplate
//   2. "TOTAL MECÂNICO:"       → MechanicTotal
//   3. "TOTAL GERAL:"          → GrandTotal
//   4. "Mecânico: NOME"        → MechanicHeader
//   5. cabeçalhos de página    → Boilerplate
//   6. DD/MM/AAAA              → DateMarker
//   7. OS de 5 dígitos         → WorkOrderMarker
//   8. números BR              → NumericValue
//   9. qualquer outra coisa    → ClientNameFragment
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;

use super::numbers;
use crate::utils::starts_with_folded;

/// Faixa de numeração das ordens de serviço desta concessionária.
pub const ORDER_NUMBER_RANGE: RangeInclusive<u32> = 60_000..=99_999;

static ORDER_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{5})\b").expect("padrão de OS inválido"));

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("padrão de data inválido"));

static MECHANIC_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)mec[aâáàã]\p{M}*nico:\s*(.*)$").expect("padrão de cabeçalho inválido")
});

pub(crate) static MECHANIC_TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)total\s+mec[aâáàã]\p{M}*nico:").expect("padrão de total do mecânico inválido")
});

pub(crate) static GRAND_TOTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)total\s+geral:").expect("padrão de total geral inválido"));

/// Ruído de página: títulos, cabeçalhos de coluna, carimbo de emissão
/// (usuário@...), versão do sistema, a própria linha de período repetida
/// no topo de cada página e a razão social da concessionária (SANCES).
static BOILERPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:",
        r"p[aá]gina|relat[oó]rio|emitido|[^\s@]+@|d\d+$|empresa|finaliza",
        r"|n\.\s*os$|comiss[aã]o$|total$|valor$|servi[cç]os$|data\s+de$",
        r"|fechamento$|valor\s+com|%\s*com|cliente$|vers[aã]o",
        r"|de\s+\d{2}/\d{2}/\d{4}|sances",
        r")"
    ))
    .expect("padrão de boilerplate inválido")
});

/// Categoria de uma linha do relatório.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// Ruído de página, descartado onde quer que apareça.
    Boilerplate,
    /// Linha com número de OS na faixa [`ORDER_NUMBER_RANGE`].
    WorkOrderMarker(&'a str),
    /// Data isolada (DD/MM/AAAA).
    DateMarker,
    /// Um ou mais números brasileiros, já tokenizados.
    NumericValue(Vec<f64>),
    /// "Mecânico: NOME" com o nome já recortado.
    MechanicHeader(&'a str),
    /// "TOTAL MECÂNICO:"
    MechanicTotal,
    /// "TOTAL GERAL:"
    GrandTotal,
    /// Pedaço do nome do cliente.
    ClientNameFragment(&'a str),
}

/// Classificador de linhas com regras fixas e prefixos extras configuráveis.
///
/// # Exemplo
///
/// ```rust
/// use comissao_mecanicos::parser::classifier::{LineClassifier, LineKind};
///
/// let classifier = LineClassifier::new().with_extra_boilerplate(["FILIAL"]);
/// assert_eq!(classifier.classify("68146"), LineKind::WorkOrderMarker("68146"));
/// assert_eq!(classifier.classify("SANCES VEICULOS"), LineKind::Boilerplate);
/// assert_eq!(classifier.classify("FILIAL 02"), LineKind::Boilerplate);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    extra_boilerplate: Vec<String>,
}

impl LineClassifier {
    /// Classificador só com as regras padrão.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acrescenta prefixos de linha a descartar (ex.: razão social da empresa).
    ///
    /// A comparação ignora acentos, caixa e espaços repetidos.
    pub fn with_extra_boilerplate<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_boilerplate.extend(
            prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p| !p.trim().is_empty()),
        );
        self
    }

    /// Classifica uma linha. Função pura: a mesma linha sempre gera a mesma
    /// categoria.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        let line = line.trim();

        if line.is_empty() {
            return LineKind::Boilerplate;
        }
        if MECHANIC_TOTAL_RE.is_match(line) {
            return LineKind::MechanicTotal;
        }
        if GRAND_TOTAL_RE.is_match(line) {
            return LineKind::GrandTotal;
        }
        if let Some(caps) = MECHANIC_HEADER_RE.captures(line) {
            let name = caps.get(1).map_or("", |m| m.as_str().trim());
            // "Mecânico:" sem nome é rótulo de coluna
            if name.is_empty() {
                return LineKind::Boilerplate;
            }
            return LineKind::MechanicHeader(name);
        }
        if self.is_boilerplate(line) {
            return LineKind::Boilerplate;
        }
        if DATE_RE.is_match(line) {
            return LineKind::DateMarker;
        }
        if let Some(number) = order_marker(line) {
            return LineKind::WorkOrderMarker(number);
        }
        if numbers::contains_number(line) {
            return LineKind::NumericValue(numbers::tokenize(line));
        }

        LineKind::ClientNameFragment(line)
    }

    fn is_boilerplate(&self, line: &str) -> bool {
        BOILERPLATE_RE.is_match(line)
            || self
                .extra_boilerplate
                .iter()
                .any(|prefix| starts_with_folded(line, prefix))
    }
}

/// Todos os tokens isolados de 5 dígitos da linha que caem na faixa de OS.
pub fn order_numbers(line: &str) -> impl Iterator<Item = &str> {
    ORDER_NUMBER_RE
        .find_iter(line)
        .map(|m| m.as_str())
        .filter(|token| is_order_number(token))
}

/// Primeiro número de OS da linha, se houver.
pub fn order_marker(line: &str) -> Option<&str> {
    order_numbers(line).next()
}

fn is_order_number(token: &str) -> bool {
    token
        .parse::<u32>()
        .map(|n| ORDER_NUMBER_RANGE.contains(&n))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> LineKind<'_> {
        LineClassifier::new().classify(line)
    }

    #[test]
    fn test_order_number_range_boundaries() {
        assert_eq!(classify("60000"), LineKind::WorkOrderMarker("60000"));
        assert_eq!(classify("99999"), LineKind::WorkOrderMarker("99999"));
        assert_eq!(classify("59999"), LineKind::ClientNameFragment("59999"));
        assert_eq!(classify("100000"), LineKind::ClientNameFragment("100000"));
    }

    #[test]
    fn test_order_marker_with_other_text() {
        assert_eq!(classify("68146 15/01/2026"), LineKind::WorkOrderMarker("68146"));
        assert_eq!(classify("OS 12345 70001"), LineKind::WorkOrderMarker("70001"));
    }

    #[test]
    fn test_numeric_line_is_not_a_marker() {
        // "00275" é um token de 5 dígitos, mas fora da faixa
        assert_eq!(
            classify("110,00275,00"),
            LineKind::NumericValue(vec![110.0, 275.0])
        );
        assert_eq!(
            classify("2.098,405.246,01"),
            LineKind::NumericValue(vec![2098.40, 5246.01])
        );
    }

    #[test]
    fn test_date_marker() {
        assert_eq!(classify("15/01/2026"), LineKind::DateMarker);
        assert_eq!(classify(" 31/12/2025 "), LineKind::DateMarker);
    }

    #[test]
    fn test_mechanic_header() {
        assert_eq!(
            classify("Mecânico:  JOAO SILVA"),
            LineKind::MechanicHeader("JOAO SILVA")
        );
        assert_eq!(
            classify("MECANICO: ANA SOUZA"),
            LineKind::MechanicHeader("ANA SOUZA")
        );
        assert_eq!(classify("Mecânico:"), LineKind::Boilerplate);
        // acento decomposto (a + U+0302)
        assert_eq!(
            classify("Meca\u{302}nico:  ANA"),
            LineKind::MechanicHeader("ANA")
        );
        assert_eq!(classify("TOTAL MECA\u{302}NICO:"), LineKind::MechanicTotal);
    }

    #[test]
    fn test_totals_win_over_header() {
        assert_eq!(classify("TOTAL MECÂNICO:"), LineKind::MechanicTotal);
        assert_eq!(classify("total mecanico: 2.098,40"), LineKind::MechanicTotal);
        assert_eq!(
            classify("67.481,60156.942,75TOTAL GERAL:67.481,60"),
            LineKind::GrandTotal
        );
    }

    #[test]
    fn test_boilerplate_lines() {
        for line in [
            "",
            "Página 1 de 3",
            "RELATÓRIO DE COMISSÃO DOS MECÂNICOS",
            "EMITIDO EM 01/02/2026 10:32",
            "mateus@concessionaria.com.br",
            "D01",
            "Empresa: 1 - MATRIZ",
            "N. OS",
            "COMISSÃO",
            "TOTAL",
            "VALOR",
            "SERVIÇOS",
            "DATA DE",
            "FECHAMENTO",
            "VALOR COMISSÃO",
            "% COM.",
            "CLIENTE",
            "VERSÃO 4.12.0",
            "De 01/01/2026 até 31/01/2026",
        ] {
            assert_eq!(classify(line), LineKind::Boilerplate, "linha: {:?}", line);
        }
    }

    #[test]
    fn test_client_name_fragments() {
        assert_eq!(
            classify("TRR ZANFORLIN COM"),
            LineKind::ClientNameFragment("TRR ZANFORLIN COM")
        );
        // só "CLIENTE" isolado é cabeçalho de coluna
        assert_eq!(
            classify("CLIENTE TESTE"),
            LineKind::ClientNameFragment("CLIENTE TESTE")
        );
    }

    #[test]
    fn test_dealership_name_is_default_boilerplate() {
        assert_eq!(classify("SANCES VEICULOS LTDA"), LineKind::Boilerplate);
        assert_eq!(classify("Sances Veículos"), LineKind::Boilerplate);
    }

    #[test]
    fn test_extra_boilerplate_prefixes() {
        let classifier = LineClassifier::new().with_extra_boilerplate(["Filial Centro-Sul", " "]);
        assert_eq!(classifier.classify("FILIAL CENTRO-SUL LTDA"), LineKind::Boilerplate);
        assert_eq!(
            classify("FILIAL CENTRO-SUL LTDA"),
            LineKind::ClientNameFragment("FILIAL CENTRO-SUL LTDA")
        );
        assert_eq!(
            classifier.classify("OUTRO CLIENTE"),
            LineKind::ClientNameFragment("OUTRO CLIENTE")
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = LineClassifier::new();
        for line in [
            "68146",
            "110,00275,00",
            "Mecânico:  JOAO SILVA",
            "TOTAL MECÂNICO:",
            "CLIENTE TESTE",
            "Página 2",
        ] {
            assert_eq!(classifier.classify(line), classifier.classify(line));
        }
    }

    #[test]
    fn test_order_numbers_collects_all_in_range() {
        let found: Vec<&str> = order_numbers("68146 12345 99999 100000").collect();
        assert_eq!(found, vec!["68146", "99999"]);
    }
}
