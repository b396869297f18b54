// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SEGMENTAÇÃO DE ORDENS DE SERVIÇO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Layout de cada OS no texto extraído (um item por linha):
//
//   68146                  ← número da OS
//   110,00275,00           ← comissão + valor do serviço, colados
//   15/01/2026             ← data (às vezes ausente)
//   110,0040,00            ← valor comissão + percentual, colados
//   TRR ZANFORLIN COM      ← nome do cliente
//   COMBUSTIVEIS LTDA      ←   (pode ocupar várias linhas)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashSet;

use super::classifier::{LineClassifier, LineKind};
use crate::types::WorkOrderRecord;

/// Reconstrói as ordens de serviço do trecho de texto de um mecânico.
///
/// Cada marcador de OS abre um bloco que vai até o próximo marcador (ou o fim
/// do trecho). Se o mesmo número de OS aparecer de novo (artefato de
/// paginação), só o primeiro bloco é aproveitado.
pub fn segment_orders(lines: &[&str], classifier: &LineClassifier) -> Vec<WorkOrderRecord> {
    let kinds: Vec<LineKind<'_>> = lines.iter().map(|&line| classifier.classify(line)).collect();

    let markers: Vec<(usize, &str)> = kinds
        .iter()
        .enumerate()
        .filter_map(|(idx, kind)| match kind {
            LineKind::WorkOrderMarker(number) => Some((idx, *number)),
            _ => None,
        })
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut orders = Vec::with_capacity(markers.len());

    for (k, &(start, number)) in markers.iter().enumerate() {
        if !seen.insert(number) {
            log::debug!("OS {} repetida no trecho; mantendo a primeira", number);
            continue;
        }

        let end = markers.get(k + 1).map_or(kinds.len(), |&(next, _)| next);
        orders.push(build_order(number, &kinds[start + 1..end]));
    }

    orders
}

/// Monta uma OS a partir das linhas já classificadas do seu bloco.
fn build_order(number: &str, block: &[LineKind<'_>]) -> WorkOrderRecord {
    let mut values: Vec<f64> = Vec::new();
    let mut client_parts: Vec<&str> = Vec::new();

    for kind in block {
        match kind {
            LineKind::MechanicTotal | LineKind::MechanicHeader(_) | LineKind::GrandTotal => break,
            LineKind::Boilerplate | LineKind::DateMarker | LineKind::WorkOrderMarker(_) => {}
            LineKind::NumericValue(numbers) => values.extend_from_slice(numbers),
            LineKind::ClientNameFragment(fragment) => client_parts.push(*fragment),
        }
    }

    let (commission, service_value) = assign_values(&values);

    WorkOrderRecord {
        order_number: number.to_string(),
        client_name: client_parts.join(" "),
        service_value,
        commission,
    }
}

/// Distribui os números do bloco em `(comissão, valor do serviço)`.
///
/// O layout imprime a comissão antes do valor do serviço. Com um único número
/// ele é o valor do serviço; o que faltar fica em zero.
pub fn assign_values(values: &[f64]) -> (f64, f64) {
    match values {
        [commission, service_value, ..] => (*commission, *service_value),
        [service_value] => (0.0, *service_value),
        [] => (0.0, 0.0),
    }
}
