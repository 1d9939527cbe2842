#![forbid(unsafe_code)]

use crate::record::{FieldSource, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FinanceSummary {
    pub income: f64,
    pub expenses: f64,
    pub skipped: usize,
}

impl FinanceSummary {
    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Totals `valor` by `tipo` (`receita` / `despesa`). Rows whose amount does not parse, or
/// whose type is neither, are counted in `skipped`.
pub fn finance_summary(transactions: &[Record]) -> FinanceSummary {
    let mut summary = FinanceSummary::default();
    for transaction in transactions {
        let amount = transaction
            .text("valor")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite());
        match (transaction.text("tipo").trim(), amount) {
            ("receita", Some(amount)) => summary.income += amount,
            ("despesa", Some(amount)) => summary.expenses += amount,
            _ => summary.skipped += 1,
        }
    }
    summary
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockLevel {
    Low,
    Warning,
    Ok,
}

impl StockLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Warning => "warning",
            Self::Ok => "ok",
        }
    }
}

/// `None` when either quantity is missing or not a whole number.
pub fn stock_level(product: &impl FieldSource) -> Option<StockLevel> {
    let quantity = whole_number(product, "quantidade")?;
    let minimum = whole_number(product, "quantidade_minima")?;
    if quantity <= minimum {
        Some(StockLevel::Low)
    } else if (quantity as f64) <= minimum as f64 * 1.5 {
        Some(StockLevel::Warning)
    } else {
        Some(StockLevel::Ok)
    }
}

fn whole_number(source: &impl FieldSource, field: &str) -> Option<i64> {
    source.field_text(field)?.trim().parse().ok()
}
