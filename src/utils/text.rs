// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TEXT UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Utilitários para o texto extraído dos relatórios:
// - Normalização de quebras de linha, quebras de página e acentos (NFC)
// - Comparação sem acento / sem caixa
// - Contagem de linhas
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normaliza o texto vindo do extrator de PDF.
///
/// - acentos decompostos (`a` + `\u{302}`) viram precompostos (NFC)
/// - `\r\n` e `\r` viram `\n`
/// - form feed (quebra de página) vira `\n`
/// - demais caracteres de controle são removidos (tab é mantido)
pub fn normalize_extracted_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    unified
        .nfc()
        .filter_map(|c| match c {
            '\u{000C}' => Some('\n'),
            '\n' | '\t' => Some(c),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Recompõe acentos (NFC) sem tocar em mais nada.
pub fn compose_accents(text: &str) -> String {
    text.nfc().collect()
}

/// Remove acentos (marcas combinantes após NFD), preservando a caixa.
pub fn fold_accents(text: &str) -> String {
    text.nfd().filter(|&c| !is_combining_mark(c)).collect()
}

/// Chave de comparação: sem acento, maiúscula, espaços colapsados.
pub fn comparison_key(text: &str) -> String {
    fold_accents(text)
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Verifica se `line` começa com `prefix`, ignorando acentos, caixa e
/// espaços repetidos.
pub fn starts_with_folded(line: &str, prefix: &str) -> bool {
    let prefix = comparison_key(prefix);
    !prefix.is_empty() && comparison_key(line).starts_with(&prefix)
}

/// Conta linhas não vazias
pub fn line_count(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}
