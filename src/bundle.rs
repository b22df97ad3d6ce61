//! The result bundle: everything the presentation and export layers
//! consume, assembled once per processed file and immutable afterwards.

use crate::error::{Result, RollupError};
use crate::map::{MapRollup, MapTotals};
use crate::metrics::{self, RankedLineItem};
use crate::schema::{ValidationReport, Variant};
use crate::sicop::SicopRollup;
use crate::StructuralConfig;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// File-level metadata carried alongside the aggregations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Metadata {
    /// The ledger's reporting date as stated by the file, not "today".
    pub fecha_archivo: NaiveDate,
    /// Reporting month (1-12), for "al mes de ..." labels.
    pub mes: u32,
    pub ejercicio: i32,
    pub usa_tablas_2026: bool,
}

impl Metadata {
    pub fn new(fecha_archivo: NaiveDate, config: &StructuralConfig) -> Self {
        Self {
            fecha_archivo,
            mes: fecha_archivo.month(),
            ejercicio: config.ejercicio,
            usa_tablas_2026: config.usa_tablas_2026,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapBundle {
    pub metadata: Metadata,
    pub reporte: ValidationReport,
    pub rollup: MapRollup,
}

impl MapBundle {
    /// Fails when no program group was discovered: the file did not match
    /// the MAP schema (a SICOP upload selected as MAP aggregates to
    /// nothing here rather than erroring earlier).
    pub fn new(
        metadata: Metadata,
        reporte: ValidationReport,
        rollup: MapRollup,
    ) -> Result<MapBundle> {
        if rollup.programas.is_empty() {
            return Err(RollupError::EmptyDimension {
                variant: Variant::Map,
                dimension: "programas",
            });
        }
        Ok(MapBundle {
            metadata,
            reporte,
            rollup,
        })
    }

    /// The dashboard's "active programs" filter. Presentation concern: the
    /// rollup itself keeps zero-valued programs so totals reconcile.
    pub fn programas_activos(&self) -> impl Iterator<Item = (&String, &MapTotals)> {
        self.rollup.programas.iter().filter(|(_, t)| {
            t.original > Decimal::ZERO || t.modificado_anual_neto > Decimal::ZERO
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SicopBundle {
    pub metadata: Metadata,
    pub reporte: ValidationReport,
    pub rollup: SicopRollup,
}

impl SicopBundle {
    /// Fails when no responsible unit was discovered, the SICOP signal of
    /// a variant/file mismatch.
    pub fn new(
        metadata: Metadata,
        reporte: ValidationReport,
        rollup: SicopRollup,
    ) -> Result<SicopBundle> {
        if rollup.resumen.is_empty() {
            return Err(RollupError::EmptyDimension {
                variant: Variant::Sicop,
                dimension: "unidades responsables",
            });
        }
        Ok(SicopBundle {
            metadata,
            reporte,
            rollup,
        })
    }

    /// The `n` line items with the largest available balance for a unit,
    /// recomputed per request from the current aggregation. Unknown unit
    /// codes rank empty.
    pub fn top_partidas(&self, ur: &str, n: usize) -> Vec<RankedLineItem> {
        let Some(items) = self.rollup.partidas_por_ur.get(ur) else {
            return Vec::new();
        };
        let total = self
            .rollup
            .resumen
            .iter()
            .find(|u| u.ur == ur)
            .map(|u| u.totales.disponible_periodo())
            .unwrap_or(Decimal::ZERO);
        metrics::top_disponible(items, n, total)
    }
}

/// The engine's root output, tagged by variant so consumers get a typed
/// shape per dimension instead of string-keyed lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResultBundle {
    Map(MapBundle),
    Sicop(SicopBundle),
}

impl ResultBundle {
    pub fn variant(&self) -> Variant {
        match self {
            ResultBundle::Map(_) => Variant::Map,
            ResultBundle::Sicop(_) => Variant::Sicop,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            ResultBundle::Map(b) => &b.metadata,
            ResultBundle::Sicop(b) => &b.metadata,
        }
    }

    pub fn reporte(&self) -> &ValidationReport {
        match self {
            ResultBundle::Map(b) => &b.reporte,
            ResultBundle::Sicop(b) => &b.reporte,
        }
    }
}
