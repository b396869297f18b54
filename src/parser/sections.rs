// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SEÇÕES POR MECÂNICO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Um mecânico pode ser interrompido por quebra de página e retomado depois,
// sempre reanunciado por outro "Mecânico: NOME". O fechamento vem em:
//
//   2.098,405.246,01      ← {comissão}{valor serviços} colados
//   TOTAL MECÂNICO:
//   2.098,40              ← comissão total
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashSet;
use std::ops::Range;

use super::classifier::{order_numbers, LineKind};
use super::numbers::{concatenated_pair, leading_number};

/// Ocorrência de um cabeçalho "Mecânico:" no documento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderOccurrence<'a> {
    /// Nome do mecânico
    pub name: &'a str,
    /// Índice da linha do cabeçalho
    pub line: usize,
}

/// Seção resolvida de um mecânico: totais e trechos de texto.
#[derive(Debug, Clone, PartialEq)]
pub struct MechanicSection<'a> {
    /// Nome do mecânico, como no cabeçalho
    pub name: &'a str,
    /// Linha do "TOTAL MECÂNICO:" que fechou a seção
    pub total_line: usize,
    /// Comissão total, lida logo após o "TOTAL MECÂNICO:"
    pub commission_total: f64,
    /// Valor de serviços, segundo número do par antes do "TOTAL MECÂNICO:"
    pub service_value_total: f64,
    /// Intervalos de linhas disjuntos e ordenados
    pub ranges: Vec<Range<usize>>,
}

impl<'a> MechanicSection<'a> {
    /// Concatena as linhas dos trechos, na ordem do documento.
    pub fn text_lines(&self, lines: &[&'a str]) -> Vec<&'a str> {
        self.ranges
            .iter()
            .flat_map(|range| lines[range.clone()].iter().copied())
            .collect()
    }
}

/// Todas as ocorrências de cabeçalho de mecânico, em ordem.
pub fn find_headers<'a>(kinds: &[LineKind<'a>]) -> Vec<HeaderOccurrence<'a>> {
    kinds
        .iter()
        .enumerate()
        .filter_map(|(line, kind)| match kind {
            LineKind::MechanicHeader(name) => Some(HeaderOccurrence { name: *name, line }),
            _ => None,
        })
        .collect()
}

/// Cabeçalho mais recente antes da linha `before`.
pub fn nearest_preceding_header<'h, 'a>(
    headers: &'h [HeaderOccurrence<'a>],
    before: usize,
) -> Option<&'h HeaderOccurrence<'a>> {
    headers.iter().rev().find(|header| header.line < before)
}

/// Trechos de texto de `name` que fecham no total da linha `total_line`.
///
/// Cada ocorrência do cabeçalho abre um trecho que vai até o próximo
/// cabeçalho de outro mecânico, limitado pela linha do total. Trechos que se
/// sobrepõem são unidos.
pub fn section_ranges(
    headers: &[HeaderOccurrence<'_>],
    name: &str,
    total_line: usize,
) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();

    for (j, header) in headers.iter().enumerate() {
        if header.name != name || header.line >= total_line {
            continue;
        }

        let next_other = headers[j + 1..]
            .iter()
            .find(|other| other.name != name)
            .map_or(total_line, |other| other.line);
        let end = next_other.min(total_line);

        match ranges.last_mut() {
            Some(last) if header.line <= last.end => last.end = last.end.max(end),
            _ => ranges.push(header.line..end),
        }
    }

    ranges
}

/// Resolve as seções de todos os mecânicos com "TOTAL MECÂNICO:".
///
/// Regras de tolerância:
/// - total sem número na linha seguinte: ignorado;
/// - total sem cabeçalho anterior: ignorado;
/// - segundo total de um mecânico já resolvido: ignorado (vale o primeiro).
pub fn resolve_sections<'a>(lines: &[&'a str], kinds: &[LineKind<'a>]) -> Vec<MechanicSection<'a>> {
    let headers = find_headers(kinds);
    let mut resolved: HashSet<&'a str> = HashSet::new();
    let mut sections = Vec::new();

    for (total_line, kind) in kinds.iter().enumerate() {
        if !matches!(kind, LineKind::MechanicTotal) {
            continue;
        }

        let Some(commission_total) = lines.get(total_line + 1).and_then(|l| leading_number(l))
        else {
            log::warn!(
                "⚠️ TOTAL MECÂNICO na linha {} sem comissão na linha seguinte; ignorado",
                total_line + 1
            );
            continue;
        };

        let service_value_total = total_line
            .checked_sub(1)
            .and_then(|prev| lines.get(prev))
            .and_then(|l| concatenated_pair(l.trim()))
            .map_or(0.0, |(_, service_value)| service_value);

        let Some(owner) = nearest_preceding_header(&headers, total_line) else {
            log::warn!(
                "⚠️ TOTAL MECÂNICO na linha {} sem cabeçalho de mecânico anterior; ignorado",
                total_line + 1
            );
            continue;
        };

        if !resolved.insert(owner.name) {
            log::debug!(
                "TOTAL repetido para {} na linha {}; mantendo o primeiro",
                owner.name,
                total_line + 1
            );
            continue;
        }

        sections.push(MechanicSection {
            name: owner.name,
            total_line,
            commission_total,
            service_value_total,
            ranges: section_ranges(&headers, owner.name, total_line),
        });
    }

    sections
}

/// Quantidade de números de OS distintos em qualquer ponto do trecho.
pub fn count_distinct_orders(lines: &[&str]) -> usize {
    lines
        .iter()
        .flat_map(|line| order_numbers(line))
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::classifier::LineClassifier;

    fn header(name: &str, line: usize) -> HeaderOccurrence<'_> {
        HeaderOccurrence { name, line }
    }

    fn resolve<'a>(lines: &[&'a str]) -> Vec<MechanicSection<'a>> {
        let classifier = LineClassifier::new();
        let kinds: Vec<LineKind<'a>> = lines.iter().map(|&l| classifier.classify(l)).collect();
        resolve_sections(lines, &kinds)
    }

    #[test]
    fn test_nearest_preceding_header() {
        let headers = [header("ANA", 2), header("BRUNO", 10), header("ANA", 20)];

        assert_eq!(nearest_preceding_header(&headers, 2), None);
        assert_eq!(nearest_preceding_header(&headers, 3).map(|h| h.name), Some("ANA"));
        assert_eq!(nearest_preceding_header(&headers, 15).map(|h| h.name), Some("BRUNO"));
        assert_eq!(nearest_preceding_header(&headers, 99).map(|h| h.line), Some(20));
    }

    #[test]
    fn test_section_ranges_single_occurrence() {
        let headers = [header("ANA", 3), header("BRUNO", 25)];
        assert_eq!(section_ranges(&headers, "ANA", 23), vec![3..23]);
        assert_eq!(section_ranges(&headers, "BRUNO", 30), vec![25..30]);
    }

    #[test]
    fn test_section_ranges_across_page_break() {
        // ANA (página 1) → ANA (página 2) → TOTAL → BRUNO
        let headers = [header("ANA", 3), header("ANA", 18), header("BRUNO", 25)];
        assert_eq!(section_ranges(&headers, "ANA", 23), vec![3..23]);
    }

    #[test]
    fn test_section_ranges_interleaved_with_other_mechanic() {
        // ANA → BRUNO → ANA → TOTAL de ANA
        let headers = [header("ANA", 0), header("BRUNO", 5), header("ANA", 9)];
        assert_eq!(section_ranges(&headers, "ANA", 14), vec![0..5, 9..14]);
    }

    #[test]
    fn test_section_ranges_ignores_headers_after_total() {
        let headers = [header("ANA", 0), header("ANA", 20)];
        assert_eq!(section_ranges(&headers, "ANA", 10), vec![0..10]);
    }

    #[test]
    fn test_resolve_reads_totals_around_marker() {
        let lines = [
            "Mecânico:  JOAO SILVA",
            "68146",
            "110,00275,00",
            "2.098,405.246,01",
            "TOTAL MECÂNICO:",
            "2.098,40",
        ];
        let sections = resolve(&lines);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "JOAO SILVA");
        assert_eq!(sections[0].commission_total, 2098.40);
        assert_eq!(sections[0].service_value_total, 5246.01);
        assert_eq!(sections[0].ranges, vec![0..4]);
    }

    #[test]
    fn test_resolve_first_total_wins() {
        let lines = [
            "Mecânico:  ANA",
            "10,0020,00",
            "TOTAL MECÂNICO:",
            "10,00",
            "Mecânico:  ANA",
            "99,00999,00",
            "TOTAL MECÂNICO:",
            "99,00",
        ];
        let sections = resolve(&lines);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].commission_total, 10.0);
        assert_eq!(sections[0].service_value_total, 20.0);
    }

    #[test]
    fn test_resolve_ignores_unowned_and_numberless_totals() {
        let lines = [
            "TOTAL MECÂNICO:",
            "50,00",
            "Mecânico:  ANA",
            "TOTAL MECÂNICO:",
            "sem valor",
            "10,0020,00",
            "TOTAL MECÂNICO:",
            "10,00",
        ];
        let sections = resolve(&lines);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "ANA");
        assert_eq!(sections[0].total_line, 6);
        assert_eq!(sections[0].commission_total, 10.0);
    }

    #[test]
    fn test_resolve_service_defaults_to_zero_without_pair() {
        let lines = ["Mecânico:  ANA", "20,00", "TOTAL MECÂNICO:", "10,00"];
        let sections = resolve(&lines);
        assert_eq!(sections[0].service_value_total, 0.0);
    }

    #[test]
    fn test_count_distinct_orders() {
        let lines = ["Mecânico:  ANA", "68146", "68146", "70001 15/01/2026", "12345", "110,00275,00"];
        assert_eq!(count_distinct_orders(&lines), 2);
    }

    #[test]
    fn test_text_lines_concatenates_ranges() {
        let lines = ["a", "b", "c", "d", "e"];
        let section = MechanicSection {
            name: "ANA",
            total_line: 4,
            commission_total: 0.0,
            service_value_total: 0.0,
            ranges: vec![0..2, 3..4],
        };
        assert_eq!(section.text_lines(&lines), vec!["a", "b", "d"]);
    }
}
