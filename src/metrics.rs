//! Shared derived metrics: the zero-guarded advance ratio and the
//! top-N line-item ranking used for exception reporting.

use crate::sicop::LineItemBalance;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many partidas the dashboard's exception table shows per unit.
pub const TOP_PARTIDAS_DEFAULT: usize = 5;

/// Percentage-of-advance ratio. Zero whenever the denominator is not
/// strictly positive, so a spent-against-nothing line never divides by
/// zero and never produces a non-finite value. Applies uniformly to every
/// ratio the engine reports.
pub fn avance(numerador: Decimal, denominador: Decimal) -> Decimal {
    if denominador > Decimal::ZERO {
        numerador / denominador
    } else {
        Decimal::ZERO
    }
}

/// A ranked line item: the balance plus its share of the unit's total
/// available amount at the period horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedLineItem {
    pub item: LineItemBalance,
    pub participacion: Decimal,
}

/// The `n` line items with the largest `disponible`. Ties break by input
/// order (first seen wins); fewer than `n` items returns all of them.
/// `total` is the unit's `Disponible_periodo`, the base for each item's
/// share, guarded like every other ratio.
pub fn top_disponible(
    items: &[LineItemBalance],
    n: usize,
    total: Decimal,
) -> Vec<RankedLineItem> {
    let mut ordenadas: Vec<&LineItemBalance> = items.iter().collect();
    // Stable sort: equal keys keep their input order.
    ordenadas.sort_by(|a, b| b.disponible.cmp(&a.disponible));

    ordenadas
        .into_iter()
        .take(n)
        .map(|item| RankedLineItem {
            item: item.clone(),
            participacion: avance(item.disponible, total),
        })
        .collect()
}
