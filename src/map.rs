//! MAP aggregation: the cuadro de presupuesto rollup by budget category
//! and by program.
//!
//! Grand totals are summed straight from the normalized rows, never from
//! the groups, so a membership gap would show up as a reconciliation
//! discrepancy instead of being baked into the totals. Zero-valued
//! programs are kept; filtering "active" programs is a presentation
//! decision (see [`crate::bundle::MapBundle::programas_activos`]).

use crate::config::{Categoria, StructuralConfig};
use crate::metrics::avance;
use crate::schema::NormalizedEntry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four-column MAP rollup. The two modified amounts are net of frozen
/// funds; with no freeze on any contributing row, net equals gross.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTotals {
    pub original: Decimal,
    pub modificado_anual_neto: Decimal,
    pub modificado_periodo_neto: Decimal,
    pub ejercido: Decimal,
}

impl MapTotals {
    fn absorb(&mut self, entry: &NormalizedEntry) {
        self.original += entry.original;
        self.modificado_anual_neto += entry.modificado_anual - entry.congelado_anual;
        self.modificado_periodo_neto += entry.modificado_periodo - entry.congelado_periodo;
        self.ejercido += entry.ejercido;
    }

    fn acumular(&mut self, other: &MapTotals) {
        self.original += other.original;
        self.modificado_anual_neto += other.modificado_anual_neto;
        self.modificado_periodo_neto += other.modificado_periodo_neto;
        self.ejercido += other.ejercido;
    }

    /// May be negative (over-exercised); never clamped here.
    pub fn disponible(&self) -> Decimal {
        self.modificado_periodo_neto - self.ejercido
    }

    pub fn avance(&self) -> Decimal {
        avance(self.ejercido, self.modificado_periodo_neto)
    }

    pub fn is_zero(&self) -> bool {
        *self == MapTotals::default()
    }
}

/// The MAP aggregation output: grand totals plus the category and program
/// dimensions. All five categories are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapRollup {
    pub totales: MapTotals,
    pub categorias: BTreeMap<Categoria, MapTotals>,
    pub programas: BTreeMap<String, MapTotals>,
}

pub fn aggregate(entries: &[NormalizedEntry], config: &StructuralConfig) -> MapRollup {
    let mut totales = MapTotals::default();
    let mut categorias: BTreeMap<Categoria, MapTotals> = Categoria::ALL
        .iter()
        .map(|c| (*c, MapTotals::default()))
        .collect();
    let mut programas: BTreeMap<String, MapTotals> = BTreeMap::new();

    for entry in entries {
        totales.absorb(entry);

        let categoria = config.categoria_de(&entry.programa);
        categorias
            .entry(categoria)
            .or_default()
            .absorb(entry);

        programas
            .entry(entry.programa.clone())
            .or_default()
            .absorb(entry);
    }

    MapRollup {
        totales,
        categorias,
        programas,
    }
}

/// Compare the grand totals against the category and program sums. With
/// total category membership the sums match by construction, but the check
/// runs anyway so a future membership change cannot silently skew a
/// dimension.
pub fn reconcile(rollup: &MapRollup) -> Vec<String> {
    let mut findings = Vec::new();

    let mut por_categoria = MapTotals::default();
    for totals in rollup.categorias.values() {
        por_categoria.acumular(totals);
    }
    if por_categoria != rollup.totales {
        findings.push(format!(
            "la suma por categoria no concilia con el total del archivo: {:?} vs {:?}",
            por_categoria, rollup.totales
        ));
    }

    let mut por_programa = MapTotals::default();
    for totals in rollup.programas.values() {
        por_programa.acumular(totals);
    }
    if por_programa != rollup.totales {
        findings.push(format!(
            "la suma por programa no concilia con el total del archivo: {:?} vs {:?}",
            por_programa, rollup.totales
        ));
    }

    findings
}
