//! Row normalization: raw string cells to typed ledger entries.
//!
//! A missing required column is fatal before any row is touched. Per row,
//! only the grouping keys can reject: a line without its keys cannot be
//! placed in any aggregation. Monetary cells never reject; an unparseable
//! cell is zeroed and recorded as a warning in the validation report.

use crate::config::Capitulo;
use crate::error::{Result, RollupError};
use crate::schema::{
    columns, CellWarning, NormalizedEntry, RawTable, RowRejection, ValidationReport, Variant,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

struct ColumnIndices {
    ur: Option<usize>,
    programa: usize,
    partida: Option<usize>,
    denominacion: Option<usize>,
    original: usize,
    modificado_anual: usize,
    modificado_periodo: usize,
    ejercido: usize,
    devengado: Option<usize>,
    en_tramite: Option<usize>,
    congelado_anual: Option<usize>,
    congelado_periodo: Option<usize>,
}

impl ColumnIndices {
    fn resolve(table: &RawTable, variant: Variant) -> Result<Self> {
        for column in columns::required(variant) {
            if table.index_of(column).is_none() {
                return Err(RollupError::MissingColumn { variant, column });
            }
        }

        // Required indices are known present after the check above.
        let required = |name: &str| table.index_of(name).unwrap();

        Ok(Self {
            ur: table.index_of(columns::UR),
            programa: required(columns::PROGRAMA),
            partida: table.index_of(columns::PARTIDA),
            denominacion: table.index_of(columns::DENOMINACION),
            original: required(columns::ORIGINAL),
            modificado_anual: required(columns::MODIFICADO_ANUAL),
            modificado_periodo: required(columns::MODIFICADO_PERIODO),
            ejercido: required(columns::EJERCIDO),
            devengado: table.index_of(columns::DEVENGADO),
            en_tramite: table.index_of(columns::EN_TRAMITE),
            congelado_anual: table.index_of(columns::CONGELADO_ANUAL),
            congelado_periodo: table.index_of(columns::CONGELADO_PERIODO),
        })
    }
}

/// Parse a monetary cell as exported by MAP/SICOP: optional `$`, thousands
/// separators, and accounting-style parenthesized negatives. An empty cell
/// is zero. `None` means the cell held something non-numeric.
fn parse_money(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }

    let (body, negate) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (&trimmed[1..trimmed.len() - 1], true)
    } else {
        (trimmed, false)
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .ok()
        .map(|value| if negate { -value } else { value })
}

/// Validate and coerce every row of the table. Pure transformation: the
/// only outputs are the accepted entries and the report.
pub fn normalize(
    table: &RawTable,
    variant: Variant,
    fecha: NaiveDate,
) -> Result<(Vec<NormalizedEntry>, ValidationReport)> {
    let idx = ColumnIndices::resolve(table, variant)?;

    let mut entries = Vec::with_capacity(table.len());
    let mut report = ValidationReport {
        rows_total: table.len(),
        ..ValidationReport::default()
    };

    for row in 0..table.len() {
        let missing_key = columns::keys(variant).iter().copied().find(|key| {
            let col = table.index_of(key).unwrap();
            table.cell(row, col).trim().is_empty()
        });
        if let Some(key) = missing_key {
            report.rows_rejected += 1;
            report.rejections.push(RowRejection {
                row,
                reason: format!("grouping key '{key}' is empty"),
            });
            continue;
        }

        let mut money = |col: Option<usize>, name: &str| -> Decimal {
            let Some(col) = col else {
                return Decimal::ZERO;
            };
            let raw = table.cell(row, col);
            match parse_money(raw) {
                Some(value) => value,
                None => {
                    report.warnings.push(CellWarning {
                        row,
                        column: name.to_string(),
                        value: raw.to_string(),
                    });
                    Decimal::ZERO
                }
            }
        };

        let original = money(Some(idx.original), columns::ORIGINAL);
        let modificado_anual = money(Some(idx.modificado_anual), columns::MODIFICADO_ANUAL);
        let modificado_periodo = money(Some(idx.modificado_periodo), columns::MODIFICADO_PERIODO);
        let ejercido = money(Some(idx.ejercido), columns::EJERCIDO);
        let devengado = money(idx.devengado, columns::DEVENGADO);
        let en_tramite = money(idx.en_tramite, columns::EN_TRAMITE);
        let congelado_anual = money(idx.congelado_anual, columns::CONGELADO_ANUAL);
        let congelado_periodo = money(idx.congelado_periodo, columns::CONGELADO_PERIODO);

        let text = |col: Option<usize>| -> String {
            col.map(|c| table.cell(row, c).trim().to_string())
                .unwrap_or_default()
        };

        let partida = text(idx.partida);
        entries.push(NormalizedEntry {
            ur: text(idx.ur),
            programa: table.cell(row, idx.programa).trim().to_string(),
            capitulo: Capitulo::from_partida(&partida),
            partida,
            denominacion: text(idx.denominacion),
            original,
            modificado_anual,
            modificado_periodo,
            ejercido,
            devengado,
            en_tramite,
            congelado_anual,
            congelado_periodo,
            fecha,
        });
    }

    report.rows_accepted = entries.len();
    Ok((entries, report))
}
