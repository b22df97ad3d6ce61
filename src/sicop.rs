//! SICOP aggregation: the estado del ejercicio rollup by organizational
//! section, responsible unit, chapter within unit, and line item.
//!
//! The exercised figure here is accumulated: ejercido + devengado +
//! en trámite. Availability is reported at two horizons (annual, period)
//! and may be negative; nothing in this module clamps it.

use crate::config::{Capitulo, Seccion, StructuralConfig};
use crate::metrics::avance;
use crate::schema::NormalizedEntry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The SICOP rollup columns. Both modified amounts are net of frozen
/// funds; `ejercido_acumulado` folds in accrued and in-process amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SicopTotals {
    pub original: Decimal,
    pub modificado_anual: Decimal,
    pub modificado_periodo: Decimal,
    pub ejercido_acumulado: Decimal,
}

impl SicopTotals {
    fn absorb(&mut self, entry: &NormalizedEntry) {
        self.original += entry.original;
        self.modificado_anual += entry.modificado_anual - entry.congelado_anual;
        self.modificado_periodo += entry.modificado_periodo - entry.congelado_periodo;
        self.ejercido_acumulado += entry.ejercido + entry.devengado + entry.en_tramite;
    }

    fn acumular(&mut self, other: &SicopTotals) {
        self.original += other.original;
        self.modificado_anual += other.modificado_anual;
        self.modificado_periodo += other.modificado_periodo;
        self.ejercido_acumulado += other.ejercido_acumulado;
    }

    pub fn disponible_anual(&self) -> Decimal {
        self.modificado_anual - self.ejercido_acumulado
    }

    pub fn disponible_periodo(&self) -> Decimal {
        self.modificado_periodo - self.ejercido_acumulado
    }

    pub fn avance_anual(&self) -> Decimal {
        avance(self.ejercido_acumulado, self.modificado_anual)
    }

    pub fn avance_periodo(&self) -> Decimal {
        avance(self.ejercido_acumulado, self.modificado_periodo)
    }
}

/// One responsible unit's rollup, with its display denomination resolved
/// from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSummary {
    pub ur: String,
    pub denominacion: String,
    pub totales: SicopTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterRow {
    pub capitulo: Capitulo,
    pub totales: SicopTotals,
}

/// Per-unit chapter table: always the three recognized chapters (zero
/// rows included) plus a total row that is the elementwise sum of the
/// three, never re-aggregated from raw rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterTable {
    pub renglones: Vec<ChapterRow>,
    pub total: SicopTotals,
}

/// One line item's available balance within a unit, carrying its display
/// fields for the ranking table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemBalance {
    pub partida: String,
    pub denominacion: String,
    pub programa: String,
    pub denominacion_programa: String,
    /// Period-horizon availability; negative when over-exercised.
    pub disponible: Decimal,
}

/// The four nested SICOP aggregation levels plus grand totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SicopRollup {
    pub totales: SicopTotals,
    pub subtotales: BTreeMap<Seccion, SicopTotals>,
    pub resumen: Vec<UnitSummary>,
    pub capitulos_por_ur: BTreeMap<String, ChapterTable>,
    /// All line items per unit, sorted descending by disponible (stable,
    /// so ranking ties keep first-seen order).
    pub partidas_por_ur: BTreeMap<String, Vec<LineItemBalance>>,
    /// Unit codes that map to no organizational section; counted in grand
    /// totals and per-unit views but absent from `subtotales`.
    pub urs_sin_seccion: Vec<String>,
}

pub fn aggregate(entries: &[NormalizedEntry], config: &StructuralConfig) -> SicopRollup {
    let mut totales = SicopTotals::default();
    let mut subtotales: BTreeMap<Seccion, SicopTotals> = Seccion::ALL
        .iter()
        .map(|s| (*s, SicopTotals::default()))
        .collect();
    let mut por_ur: BTreeMap<String, SicopTotals> = BTreeMap::new();
    let mut capitulos: BTreeMap<String, BTreeMap<Capitulo, SicopTotals>> = BTreeMap::new();
    let mut partidas: BTreeMap<String, BTreeMap<(String, String), LineItemAccum>> =
        BTreeMap::new();
    let mut sin_seccion: BTreeSet<String> = BTreeSet::new();

    for entry in entries {
        totales.absorb(entry);

        match config.seccion_de(&entry.ur) {
            Some(seccion) => {
                subtotales.entry(seccion).or_default().absorb(entry);
            }
            None => {
                sin_seccion.insert(entry.ur.clone());
            }
        }

        por_ur.entry(entry.ur.clone()).or_default().absorb(entry);

        if let Some(capitulo) = entry.capitulo {
            capitulos
                .entry(entry.ur.clone())
                .or_default()
                .entry(capitulo)
                .or_default()
                .absorb(entry);
        }

        let acum = partidas
            .entry(entry.ur.clone())
            .or_default()
            .entry((entry.partida.clone(), entry.programa.clone()))
            .or_default();
        acum.totales.absorb(entry);
        if acum.denominacion.is_empty() {
            acum.denominacion = entry.denominacion.clone();
        }
    }

    let resumen = por_ur
        .iter()
        .map(|(ur, totals)| UnitSummary {
            ur: ur.clone(),
            denominacion: config
                .denominacion_ur(ur)
                .unwrap_or("Sin nombre")
                .to_string(),
            totales: *totals,
        })
        .collect();

    let capitulos_por_ur = por_ur
        .keys()
        .map(|ur| {
            let por_capitulo = capitulos.remove(ur).unwrap_or_default();
            (ur.clone(), chapter_table(por_capitulo))
        })
        .collect();

    let partidas_por_ur = partidas
        .into_iter()
        .map(|(ur, items)| {
            let mut balances: Vec<LineItemBalance> = items
                .into_iter()
                .map(|((partida, programa), acum)| LineItemBalance {
                    partida,
                    denominacion: acum.denominacion,
                    denominacion_programa: config
                        .nombre_programa(&programa)
                        .unwrap_or(&programa)
                        .to_string(),
                    programa,
                    disponible: acum.totales.disponible_periodo(),
                })
                .collect();
            balances.sort_by(|a, b| b.disponible.cmp(&a.disponible));
            (ur, balances)
        })
        .collect();

    SicopRollup {
        totales,
        subtotales,
        resumen,
        capitulos_por_ur,
        partidas_por_ur,
        urs_sin_seccion: sin_seccion.into_iter().collect(),
    }
}

#[derive(Default)]
struct LineItemAccum {
    denominacion: String,
    totales: SicopTotals,
}

fn chapter_table(mut por_capitulo: BTreeMap<Capitulo, SicopTotals>) -> ChapterTable {
    let mut total = SicopTotals::default();
    let renglones: Vec<ChapterRow> = Capitulo::ALL
        .iter()
        .map(|capitulo| {
            let totales = por_capitulo.remove(capitulo).unwrap_or_default();
            total.acumular(&totales);
            ChapterRow {
                capitulo: *capitulo,
                totales,
            }
        })
        .collect();
    ChapterTable { renglones, total }
}

/// Compare section subtotals against the grand totals. The two differ
/// exactly when some unit code maps to no section; the gap is reported,
/// never silently absorbed.
pub fn reconcile(rollup: &SicopRollup) -> Vec<String> {
    let mut findings = Vec::new();

    if !rollup.urs_sin_seccion.is_empty() {
        findings.push(format!(
            "unidades responsables sin seccion asignada, excluidas de los subtotales: {}",
            rollup.urs_sin_seccion.join(", ")
        ));
    }

    let mut por_seccion = SicopTotals::default();
    for totals in rollup.subtotales.values() {
        por_seccion.acumular(totals);
    }
    if por_seccion != rollup.totales && rollup.urs_sin_seccion.is_empty() {
        findings.push(format!(
            "la suma por seccion no concilia con el total del archivo: {:?} vs {:?}",
            por_seccion, rollup.totales
        ));
    }

    findings
}
