//! # presup-rollup
//!
//! Aggregation engine for government budget ledgers exported by the MAP
//! and SICOP systems. One uploaded file becomes one result bundle through
//! one linear pass:
//!
//! raw rows -> normalized rows -> per-dimension aggregations -> derived
//! ratios and rankings -> bundle.
//!
//! The crate owns no I/O: the (external) ingestion layer decodes CSV text
//! into a [`RawTable`] and hands it over together with the file's
//! reporting date and a variant selector. The bundle that comes back is a
//! plain data structure consumed by the dashboard and by the Excel
//! exporter.
//!
//! ## Example
//!
//! ```rust,ignore
//! use presup_rollup::{process, RawTable, Variant};
//! use chrono::NaiveDate;
//!
//! let table = RawTable::new(headers, rows);
//! let fecha = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
//! let bundle = process(&table, fecha, Variant::Sicop)?;
//! ```
//!
//! Fatal errors ([`RollupError`]) mean no bundle: a missing required
//! column, an unresolvable fiscal year, or an empty discriminating
//! dimension (the signal that the file does not match the selected
//! variant). Per-row problems never abort the run; they accumulate in the
//! bundle's [`ValidationReport`].

pub mod bundle;
pub mod config;
pub mod error;
pub mod map;
pub mod metrics;
pub mod normalize;
pub mod schema;
pub mod sicop;

pub use bundle::{MapBundle, Metadata, ResultBundle, SicopBundle};
pub use config::{Capitulo, Categoria, Seccion, StructuralConfig};
pub use error::{Result, RollupError};
pub use map::{MapRollup, MapTotals};
pub use metrics::{avance, top_disponible, RankedLineItem, TOP_PARTIDAS_DEFAULT};
pub use normalize::normalize;
pub use schema::{NormalizedEntry, RawTable, ValidationReport, Variant};
pub use sicop::{ChapterRow, ChapterTable, LineItemBalance, SicopRollup, SicopTotals, UnitSummary};

use chrono::NaiveDate;
use log::{debug, info, warn};

/// Run the full pipeline for the selected variant.
pub fn process(table: &RawTable, fecha: NaiveDate, variant: Variant) -> Result<ResultBundle> {
    match variant {
        Variant::Map => process_map(table, fecha).map(ResultBundle::Map),
        Variant::Sicop => process_sicop(table, fecha).map(ResultBundle::Sicop),
    }
}

/// MAP pipeline: cuadro de presupuesto by category and program.
pub fn process_map(table: &RawTable, fecha: NaiveDate) -> Result<MapBundle> {
    let config = StructuralConfig::resolve(fecha)?;
    info!(
        "processing MAP file dated {fecha} with {} structural tables",
        config.ejercicio
    );

    let (entries, mut reporte) = normalize(table, Variant::Map, fecha)?;
    debug!(
        "normalized {} of {} rows ({} rejected, {} cell warnings)",
        reporte.rows_accepted, reporte.rows_total, reporte.rows_rejected,
        reporte.warnings.len()
    );

    let rollup = map::aggregate(&entries, &config);
    for finding in map::reconcile(&rollup) {
        warn!("{finding}");
        reporte.reconciliation.push(finding);
    }

    MapBundle::new(Metadata::new(fecha, &config), reporte, rollup)
}

/// SICOP pipeline: estado del ejercicio by section, unit, chapter and
/// line item.
pub fn process_sicop(table: &RawTable, fecha: NaiveDate) -> Result<SicopBundle> {
    let config = StructuralConfig::resolve(fecha)?;
    info!(
        "processing SICOP file dated {fecha} with {} structural tables",
        config.ejercicio
    );

    let (entries, mut reporte) = normalize(table, Variant::Sicop, fecha)?;
    debug!(
        "normalized {} of {} rows ({} rejected, {} cell warnings)",
        reporte.rows_accepted, reporte.rows_total, reporte.rows_rejected,
        reporte.warnings.len()
    );

    let rollup = sicop::aggregate(&entries, &config);
    for finding in sicop::reconcile(&rollup) {
        warn!("{finding}");
        reporte.reconciliation.push(finding);
    }

    SicopBundle::new(Metadata::new(fecha, &config), reporte, rollup)
}
