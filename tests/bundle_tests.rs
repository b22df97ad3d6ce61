use chrono::NaiveDate;
use presup_rollup::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fecha_2025() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

const MAP_HEADERS: &[&str] = &[
    "Programa",
    "Original",
    "Modificado_anual",
    "Modificado_periodo",
    "Ejercido",
    "Congelado_anual",
    "Congelado_periodo",
];

const SICOP_HEADERS: &[&str] = &[
    "UR",
    "Programa",
    "Partida",
    "Denominacion",
    "Original",
    "Modificado_anual",
    "Modificado_periodo",
    "Ejercido",
    "Devengado",
    "En_tramite",
];

#[test]
fn test_comprehensive_map_file() {
    let input = table(
        MAP_HEADERS,
        &[
            &["S293", "$5,000,000.00", "5200000", "2600000", "2100000", "200000", "100000"],
            &["S290", "3000000", "3000000", "1500000", "900000", "", ""],
            &["M001", "1200000", "1150000", "600000", "610000", "0", "0"],
            &["K014", "800000", "800000", "400000", "0", "", ""],
            // Unmapped program: must land in Otros programas, not vanish.
            &["U017", "500000", "500000", "250000", "100000", "", ""],
        ],
    );

    let bundle = process_map(&input, fecha_2025()).unwrap();

    assert_eq!(bundle.reporte.rows_accepted, 5);
    assert!(bundle.reporte.warnings.is_empty());
    assert!(bundle.reporte.reconciliation.is_empty());

    let totales = &bundle.rollup.totales;
    assert_eq!(totales.original, dec!(10500000));
    assert_eq!(totales.modificado_anual_neto, dec!(10450000));
    assert_eq!(totales.modificado_periodo_neto, dec!(5250000));
    assert_eq!(totales.ejercido, dec!(3710000));

    // Reconciliation: each monetary field sums across categories to the
    // grand total computed straight from the rows.
    let mut por_categoria = MapTotals::default();
    for totals in bundle.rollup.categorias.values() {
        por_categoria = MapTotals {
            original: por_categoria.original + totals.original,
            modificado_anual_neto: por_categoria.modificado_anual_neto
                + totals.modificado_anual_neto,
            modificado_periodo_neto: por_categoria.modificado_periodo_neto
                + totals.modificado_periodo_neto,
            ejercido: por_categoria.ejercido + totals.ejercido,
        };
    }
    assert_eq!(por_categoria, *totales);

    assert_eq!(
        bundle.rollup.categorias[&Categoria::Subsidios].original,
        dec!(8000000)
    );
    assert_eq!(
        bundle.rollup.categorias[&Categoria::OtrosProgramas].original,
        dec!(500000)
    );
    // Frozen funds netted out of the S293 row only.
    assert_eq!(
        bundle.rollup.categorias[&Categoria::Subsidios].modificado_anual_neto,
        dec!(8000000)
    );

    // Over-exercised program keeps its negative disponible.
    let admin = &bundle.rollup.programas["M001"];
    assert_eq!(admin.disponible(), dec!(-10000));
    assert!(admin.avance() > dec!(1));

    // K014 exercised nothing: still present, still active (Original > 0).
    assert_eq!(bundle.rollup.programas["K014"].avance(), Decimal::ZERO);
    assert_eq!(bundle.programas_activos().count(), 5);
}

#[test]
fn test_comprehensive_sicop_file() {
    let input = table(
        SICOP_HEADERS,
        &[
            &["100", "M001", "21101", "Materiales y utiles de oficina", "100000", "100000", "50000", "20000", "5000", "5000"],
            &["100", "M001", "33401", "Servicios de capacitacion", "200000", "180000", "90000", "30000", "0", "0"],
            &["100", "S293", "43101", "Subsidios a la produccion", "900000", "900000", "450000", "400000", "20000", "10000"],
            &["121", "M001", "21101", "Materiales y utiles de oficina", "40000", "40000", "20000", "8000", "0", "0"],
            &["B00", "E006", "33901", "Servicios profesionales", "300000", "300000", "150000", "60000", "10000", "0"],
            &["JAG", "E006", "43801", "Aportaciones a fideicomisos", "500000", "480000", "240000", "100000", "0", "0"],
        ],
    );

    let bundle = process_sicop(&input, fecha_2025()).unwrap();
    assert_eq!(bundle.reporte.rows_accepted, 6);
    assert!(bundle.reporte.reconciliation.is_empty());

    // All four sections present; every UR mapped.
    assert_eq!(bundle.rollup.subtotales.len(), 4);
    assert_eq!(
        bundle.rollup.subtotales[&Seccion::SectorCentral].original,
        dec!(1200000)
    );
    assert_eq!(
        bundle.rollup.subtotales[&Seccion::OficinasRepresentacion].original,
        dec!(40000)
    );

    // Accumulated exercised folds in devengado and en tramite.
    let central = &bundle.rollup.subtotales[&Seccion::SectorCentral];
    assert_eq!(central.ejercido_acumulado, dec!(490000));
    assert_eq!(central.disponible_periodo(), dec!(100000));

    // Chapter table for UR 100: three fixed rows, total row matches their
    // elementwise sum.
    let tabla = &bundle.rollup.capitulos_por_ur["100"];
    assert_eq!(tabla.renglones.len(), 3);
    let mut suma = dec!(0);
    for renglon in &tabla.renglones {
        suma += renglon.totales.original;
    }
    assert_eq!(tabla.total.original, suma);
    assert_eq!(tabla.total.original, dec!(1200000));

    // Rankings: UR 100's partidas sorted descending by disponible.
    let top = bundle.top_partidas("100", TOP_PARTIDAS_DEFAULT);
    assert_eq!(top.len(), 3);
    assert!(top[0].item.disponible >= top[1].item.disponible);
    assert!(top[1].item.disponible >= top[2].item.disponible);
    assert_eq!(top[0].item.partida, "33401");
    assert_eq!(top[0].item.disponible, dec!(60000));
    assert_eq!(
        top[0].item.denominacion_programa,
        "Actividades de apoyo administrativo"
    );

    // Shares are fractions of the unit's Disponible_periodo.
    let unidad = bundle
        .rollup
        .resumen
        .iter()
        .find(|u| u.ur == "100")
        .unwrap();
    assert_eq!(unidad.totales.disponible_periodo(), dec!(100000));
    assert_eq!(top[0].participacion, dec!(0.6));

    assert_eq!(
        unidad.denominacion,
        "Oficina del Secretario"
    );
    assert!(bundle.top_partidas("Z99", 5).is_empty());
}

#[test]
fn test_sicop_unmapped_ur_surfaces_reconciliation_warning() {
    let input = table(
        SICOP_HEADERS,
        &[
            &["100", "M001", "21101", "Materiales", "100", "100", "50", "10", "0", "0"],
            &["777", "M001", "21101", "Materiales", "900", "900", "450", "90", "0", "0"],
        ],
    );

    let bundle = process_sicop(&input, fecha_2025()).unwrap();

    assert_eq!(bundle.rollup.totales.original, dec!(1000));
    let mut por_seccion = dec!(0);
    for totals in bundle.rollup.subtotales.values() {
        por_seccion += totals.original;
    }
    assert_eq!(por_seccion, dec!(100));

    assert_eq!(bundle.reporte.reconciliation.len(), 1);
    assert!(bundle.reporte.reconciliation[0].contains("777"));
    assert!(bundle.rollup.resumen.iter().any(|u| u.ur == "777"));
}

#[test]
fn test_cutover_selects_structural_tables() {
    let rows: &[&[&str]] = &[&["S325", "100", "100", "50", "10", "", ""]];
    let input = table(MAP_HEADERS, rows);

    let nuevo = process_map(&input, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()).unwrap();
    assert!(nuevo.metadata.usa_tablas_2026);
    assert_eq!(nuevo.metadata.ejercicio, 2026);
    assert_eq!(
        nuevo.rollup.categorias[&Categoria::Subsidios].original,
        dec!(100)
    );

    let viejo = process_map(&input, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()).unwrap();
    assert!(!viejo.metadata.usa_tablas_2026);
    // S325 does not exist in the 2025 tables: catch-all category.
    assert_eq!(
        viejo.rollup.categorias[&Categoria::OtrosProgramas].original,
        dec!(100)
    );
}

#[test]
fn test_malformed_monetary_cell_is_warned_and_zeroed() {
    let input = table(
        MAP_HEADERS,
        &[
            &["S293", "1000", "sin dato", "500", "200", "", ""],
            &["S290", "2000", "2000", "1000", "300", "", ""],
        ],
    );

    let bundle = process_map(&input, fecha_2025()).unwrap();

    assert_eq!(bundle.reporte.rows_accepted, 2);
    assert_eq!(bundle.reporte.warnings.len(), 1);
    assert_eq!(bundle.reporte.warnings[0].column, "Modificado_anual");
    assert_eq!(bundle.reporte.warnings[0].value, "sin dato");

    // The zeroed cell contributes nothing to its field, the rest of the
    // row aggregates normally.
    assert_eq!(bundle.rollup.totales.modificado_anual_neto, dec!(2000));
    assert_eq!(bundle.rollup.totales.original, dec!(3000));
}

#[test]
fn test_empty_input_is_a_bundle_error() {
    let map_vacio = table(MAP_HEADERS, &[]);
    let err = process_map(&map_vacio, fecha_2025()).unwrap_err();
    assert!(matches!(
        err,
        RollupError::EmptyDimension {
            variant: Variant::Map,
            dimension: "programas",
        }
    ));

    let sicop_vacio = table(SICOP_HEADERS, &[]);
    let err = process_sicop(&sicop_vacio, fecha_2025()).unwrap_err();
    assert!(matches!(
        err,
        RollupError::EmptyDimension {
            variant: Variant::Sicop,
            dimension: "unidades responsables",
        }
    ));
}

#[test]
fn test_all_rows_rejected_reads_as_variant_mismatch() {
    // Key columns exist but every key cell is empty: the aggregation comes
    // back with no units, the single place a wrong-variant file surfaces.
    let input = table(
        SICOP_HEADERS,
        &[&["", "", "", "", "100", "100", "50", "10", "0", "0"]],
    );
    let err = process_sicop(&input, fecha_2025()).unwrap_err();
    assert!(matches!(err, RollupError::EmptyDimension { .. }));
}

#[test]
fn test_bundle_serializes_to_json() {
    let input = table(
        SICOP_HEADERS,
        &[&["100", "M001", "21101", "Materiales", "100", "100", "50", "10", "0", "0"]],
    );
    let bundle = process(&input, fecha_2025(), Variant::Sicop).unwrap();

    let json = serde_json::to_string(&bundle).unwrap();
    assert!(json.contains("\"fecha_archivo\":\"2025-06-30\""));
    assert!(json.contains("capitulos_por_ur"));

    let back: ResultBundle = serde_json::from_str(&json).unwrap();
    assert_eq!(back.variant(), Variant::Sicop);
    assert_eq!(back.metadata().mes, 6);
}
