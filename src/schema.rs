use crate::config::Capitulo;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which export system produced the file. The two formats share the same
/// overall shape but differ in column contracts and rollup dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Variant {
    Map,
    Sicop,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Map => write!(f, "MAP"),
            Variant::Sicop => write!(f, "SICOP"),
        }
    }
}

/// Column-name contracts per variant. The ingestion layer decodes CSV text
/// into a [`RawTable`]; these are the headers the normalizer expects.
pub mod columns {
    use super::Variant;

    pub const UR: &str = "UR";
    pub const PROGRAMA: &str = "Programa";
    pub const PARTIDA: &str = "Partida";
    pub const DENOMINACION: &str = "Denominacion";

    pub const ORIGINAL: &str = "Original";
    pub const MODIFICADO_ANUAL: &str = "Modificado_anual";
    pub const MODIFICADO_PERIODO: &str = "Modificado_periodo";
    pub const EJERCIDO: &str = "Ejercido";
    pub const DEVENGADO: &str = "Devengado";
    pub const EN_TRAMITE: &str = "En_tramite";
    pub const CONGELADO_ANUAL: &str = "Congelado_anual";
    pub const CONGELADO_PERIODO: &str = "Congelado_periodo";

    /// Columns that must be present for the variant. A missing required
    /// column aborts the run before any row is touched.
    pub fn required(variant: Variant) -> &'static [&'static str] {
        match variant {
            Variant::Map => &[
                PROGRAMA,
                ORIGINAL,
                MODIFICADO_ANUAL,
                MODIFICADO_PERIODO,
                EJERCIDO,
            ],
            Variant::Sicop => &[
                UR,
                PROGRAMA,
                PARTIDA,
                ORIGINAL,
                MODIFICADO_ANUAL,
                MODIFICADO_PERIODO,
                EJERCIDO,
                DEVENGADO,
                EN_TRAMITE,
            ],
        }
    }

    /// Grouping-key columns: a row with an empty value in one of these
    /// cannot be placed in any aggregation and is rejected.
    pub fn keys(variant: Variant) -> &'static [&'static str] {
        match variant {
            Variant::Map => &[PROGRAMA],
            Variant::Sicop => &[UR, PROGRAMA, PARTIDA],
        }
    }
}

/// An in-memory, column-name-addressable table: one header row plus string
/// cells, as handed over by the (external) CSV decoding layer. Short rows
/// read as empty cells; unknown extra columns are carried but ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header lookup, tolerant of surrounding whitespace in the export.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// One validated ledger line. Key fields a variant does not use stay empty;
/// monetary fields are always present, defaulted to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedEntry {
    pub ur: String,
    pub programa: String,
    pub partida: String,
    pub denominacion: String,
    /// Derived from the partida's leading digit; `None` for line items
    /// outside the three recognized expenditure chapters.
    pub capitulo: Option<Capitulo>,
    pub original: Decimal,
    pub modificado_anual: Decimal,
    pub modificado_periodo: Decimal,
    pub ejercido: Decimal,
    pub devengado: Decimal,
    pub en_tramite: Decimal,
    pub congelado_anual: Decimal,
    pub congelado_periodo: Decimal,
    pub fecha: NaiveDate,
}

/// Row rejected during normalization: a grouping key was missing, so the
/// row could not be placed in any aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRejection {
    /// Zero-based row index within the input table.
    pub row: usize,
    pub reason: String,
}

/// A monetary cell that could not be parsed and was zeroed. The row itself
/// is still accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellWarning {
    pub row: usize,
    pub column: String,
    pub value: String,
}

/// Outcome of the normalization pass, attached to the result bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows_total: usize,
    pub rows_accepted: usize,
    pub rows_rejected: usize,
    pub rejections: Vec<RowRejection>,
    pub warnings: Vec<CellWarning>,
    /// Reconciliation findings surfaced after aggregation (e.g. unit codes
    /// mapped to no organizational section). Never fatal.
    pub reconciliation: Vec<String>,
}
