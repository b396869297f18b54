// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NÚMEROS NO FORMATO BRASILEIRO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Tokenização de valores "1.234,56" / "56,00" em qualquer posição da linha.
// O extrator de texto do PDF costuma colar colunas vizinhas sem separador:
//   "2.098,405.246,01" → [2098.40, 5246.01]
//   "110,00275,00"     → [110.00, 275.00]
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::Regex;

/// Padrão de um número brasileiro: grupos de até 3 dígitos separados por `.`,
/// seguidos de `,` e exatamente 2 casas decimais.
pub const BR_NUMBER: &str = r"\d{1,3}(?:\.\d{3})*,\d{2}";

static BR_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(BR_NUMBER).expect("padrão BR_NUMBER inválido"));

static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({})", BR_NUMBER)).expect("padrão de número inicial inválido")
});

static CONCATENATED_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({0})({0})", BR_NUMBER)).expect("padrão de par concatenado inválido")
});

/// Converte um token "1.234,56" em `1234.56`.
///
/// Remove os separadores de milhar, troca a vírgula decimal por ponto e
/// converte para `f64`. Um token que não converte vira `0.0`; nunca falha.
pub fn parse_br_number(token: &str) -> f64 {
    token
        .replace('.', "")
        .replacen(',', ".", 1)
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// Extrai todos os números brasileiros de um trecho, da esquerda para a direita.
///
/// Cada match consome o texto casado antes da próxima busca, então números
/// colados sem separador saem como tokens independentes.
///
/// # Exemplo
///
/// ```rust
/// use comissao_mecanicos::parser::numbers::tokenize;
///
/// assert_eq!(tokenize("2.098,405.246,01"), vec![2098.40, 5246.01]);
/// assert!(tokenize("sem valores").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<f64> {
    BR_NUMBER_RE
        .find_iter(text)
        .map(|m| parse_br_number(m.as_str()))
        .collect()
}

/// Indica se a linha contém ao menos um número brasileiro.
pub fn contains_number(text: &str) -> bool {
    BR_NUMBER_RE.is_match(text)
}

/// Número brasileiro no início do trecho (espaços iniciais ignorados).
pub fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER_RE
        .captures(text.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| parse_br_number(m.as_str()))
}

/// Primeiro par de números brasileiros colados um ao outro.
///
/// Usado nas linhas de total, onde o layout imprime `{comissão}{valor}` sem
/// espaço. Números separados por espaço não formam par.
pub fn concatenated_pair(text: &str) -> Option<(f64, f64)> {
    let caps = CONCATENATED_PAIR_RE.captures(text)?;
    let first = caps.get(1)?;
    let second = caps.get(2)?;
    Some((parse_br_number(first.as_str()), parse_br_number(second.as_str())))
}

/// Formata um valor no padrão brasileiro ("1.234,56").
pub fn format_br(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_concatenated_totals() {
        assert_eq!(tokenize("2.098,405.246,01"), vec![2098.40, 5246.01]);
    }

    #[test]
    fn test_tokenize_concatenated_order_values() {
        assert_eq!(tokenize("110,00275,00"), vec![110.00, 275.00]);
    }

    #[test]
    fn test_tokenize_single_and_empty() {
        assert_eq!(tokenize("56,00"), vec![56.00]);
        assert!(tokenize("no numbers here").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_embedded_in_text() {
        assert_eq!(
            tokenize("67.481,60156.942,75TOTAL GERAL:67.481,60"),
            vec![67481.60, 156942.75, 67481.60]
        );
        assert_eq!(tokenize("R$ 1.234,56 e 7,89"), vec![1234.56, 7.89]);
    }

    #[test]
    fn test_tokenize_ignores_dates_and_integers() {
        assert!(tokenize("15/01/2026").is_empty());
        assert!(tokenize("68146").is_empty());
    }

    #[test]
    fn test_parse_br_number() {
        assert_eq!(parse_br_number("1.234,56"), 1234.56);
        assert_eq!(parse_br_number("0,00"), 0.0);
        assert_eq!(parse_br_number("156.942,75"), 156942.75);
        assert_eq!(parse_br_number("abc"), 0.0);
        assert_eq!(parse_br_number(""), 0.0);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("2.098,40"), Some(2098.40));
        assert_eq!(leading_number("  180,00 texto"), Some(180.0));
        assert_eq!(leading_number("TOTAL 180,00"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_concatenated_pair() {
        assert_eq!(concatenated_pair("2.098,405.246,01"), Some((2098.40, 5246.01)));
        assert_eq!(concatenated_pair("2.098,40 5.246,01"), None);
        assert_eq!(concatenated_pair("2.098,40"), None);
    }

    #[test]
    fn test_format_br() {
        assert_eq!(format_br(1234.56), "1.234,56");
        assert_eq!(format_br(56.0), "56,00");
        assert_eq!(format_br(1_234_567.8), "1.234.567,80");
        assert_eq!(format_br(0.0), "0,00");
        assert_eq!(format_br(-12.5), "-12,50");
    }
}
