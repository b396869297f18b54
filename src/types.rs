// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;

use serde::{Deserialize, Serialize};

/// Competência (mês/ano) declarada no cabeçalho do relatório.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// Ano com 4 dígitos
    pub year: i32,
    /// Mês (1–12)
    pub month: u32,
}

impl ReportPeriod {
    /// Cria uma competência.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Rótulo "M/AAAA" usado nas respostas da API.
    pub fn label(&self) -> String {
        format!("{}/{}", self.month, self.year)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Uma ordem de serviço (OS) listada para um mecânico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderRecord {
    /// Número da OS (5 dígitos, faixa 60000–99999)
    pub order_number: String,
    /// Nome do cliente; pode ficar vazio
    pub client_name: String,
    /// Valor do serviço
    pub service_value: f64,
    /// Comissão da OS
    pub commission: f64,
}

/// Resumo de um mecânico na competência.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicRecord {
    /// Nome como aparece no cabeçalho "Mecânico:"
    pub name: String,
    /// Valor total de serviços
    pub service_value_total: f64,
    /// Comissão total
    pub commission_total: f64,
    /// Comissão sobre serviços, em %, com 2 casas
    pub commission_percent: f64,
    /// Quantidade de números de OS distintos no trecho do mecânico.
    ///
    /// Estimativa independente de `orders.len()`: conta qualquer número na
    /// faixa de OS, mesmo quando o bloco da OS não pôde ser montado.
    pub order_count: usize,
    /// OS detalhadas, na ordem em que aparecem
    pub orders: Vec<WorkOrderRecord>,
}

impl MechanicRecord {
    /// Monta o resumo calculando o percentual de comissão.
    pub fn new(
        name: impl Into<String>,
        service_value_total: f64,
        commission_total: f64,
        order_count: usize,
        orders: Vec<WorkOrderRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            service_value_total,
            commission_total,
            commission_percent: commission_percent(commission_total, service_value_total),
            order_count,
            orders,
        }
    }
}

/// Resultado completo do parse de um relatório.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Competência do relatório
    pub period: ReportPeriod,
    /// Mecânicos na ordem em que aparecem no documento
    pub mechanics: Vec<MechanicRecord>,
    /// Valor de serviços da linha "TOTAL GERAL:" (0 se ausente)
    pub grand_total_service_value: f64,
    /// Comissão da linha "TOTAL GERAL:" (0 se ausente)
    pub grand_total_commission: f64,
}

impl ParseResult {
    /// Total de OS detalhadas em todos os mecânicos
    pub fn detail_count(&self) -> usize {
        self.mechanics.iter().map(|m| m.orders.len()).sum()
    }

    /// Busca um mecânico pelo nome exato
    pub fn mechanic(&self, name: &str) -> Option<&MechanicRecord> {
        self.mechanics.iter().find(|m| m.name == name)
    }
}

/// `round(comissão / serviços × 100, 2)`, ou 0 quando não há serviços.
pub fn commission_percent(commission_total: f64, service_value_total: f64) -> f64 {
    if service_value_total == 0.0 {
        return 0.0;
    }
    (commission_total / service_value_total * 10_000.0).round() / 100.0
}
