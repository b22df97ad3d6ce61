//! Structural configuration: which program and unit tables apply for a
//! given reporting date, plus the closed classification enums the
//! aggregators group by.
//!
//! The tables are static data owned by the crate's deployment. Two fiscal
//! years are defined; the boundary between them is a single fixed cutover
//! date. Dates before the first defined year fail loudly rather than
//! resolving to an empty configuration.

use crate::error::{Result, RollupError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reporting dates at or after this date use the 2026 structural tables;
/// earlier dates use the 2025 tables.
pub fn fecha_corte_2026() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

const PRIMER_EJERCICIO: i32 = 2025;

/// The five budget categories of the MAP cuadro de presupuesto. Membership
/// is total: a program code not claimed by any other category belongs to
/// `OtrosProgramas`, so no row can silently vanish from the category rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Categoria {
    ServiciosPersonales,
    GastoCorriente,
    Subsidios,
    OtrosProgramas,
    BienesMuebles,
}

impl Categoria {
    pub const ALL: [Categoria; 5] = [
        Categoria::ServiciosPersonales,
        Categoria::GastoCorriente,
        Categoria::Subsidios,
        Categoria::OtrosProgramas,
        Categoria::BienesMuebles,
    ];

    pub fn nombre(&self) -> &'static str {
        match self {
            Categoria::ServiciosPersonales => "Servicios Personales",
            Categoria::GastoCorriente => "Gasto Corriente",
            Categoria::Subsidios => "Subsidios y Gastos asociados",
            Categoria::OtrosProgramas => "Otros programas",
            Categoria::BienesMuebles => "Bienes muebles e intangibles",
        }
    }
}

/// The four organizational sections of the SICOP estado del ejercicio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seccion {
    SectorCentral,
    OficinasRepresentacion,
    OrganosDesconcentrados,
    EntidadesParaestatales,
}

impl Seccion {
    pub const ALL: [Seccion; 4] = [
        Seccion::SectorCentral,
        Seccion::OficinasRepresentacion,
        Seccion::OrganosDesconcentrados,
        Seccion::EntidadesParaestatales,
    ];

    pub fn nombre(&self) -> &'static str {
        match self {
            Seccion::SectorCentral => "Sector Central",
            Seccion::OficinasRepresentacion => "Oficinas de Representacion",
            Seccion::OrganosDesconcentrados => "Organos Desconcentrados",
            Seccion::EntidadesParaestatales => "Entidades Paraestatales",
        }
    }
}

/// The three expenditure chapters shown in the per-unit chapter table.
/// SICOP exports carry the chapter implicitly in the partida's leading
/// digit; other chapters (1000 personal services, 5000 capital goods)
/// count toward unit totals but have no chapter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capitulo {
    MaterialesYSuministros,
    ServiciosGenerales,
    Transferencias,
}

impl Capitulo {
    pub const ALL: [Capitulo; 3] = [
        Capitulo::MaterialesYSuministros,
        Capitulo::ServiciosGenerales,
        Capitulo::Transferencias,
    ];

    pub fn clave(&self) -> &'static str {
        match self {
            Capitulo::MaterialesYSuministros => "2000",
            Capitulo::ServiciosGenerales => "3000",
            Capitulo::Transferencias => "4000",
        }
    }

    pub fn nombre(&self) -> &'static str {
        match self {
            Capitulo::MaterialesYSuministros => "Materiales y suministros",
            Capitulo::ServiciosGenerales => "Servicios generales",
            Capitulo::Transferencias => {
                "Transferencias, asignaciones, subsidios y otras ayudas"
            }
        }
    }

    pub fn from_partida(partida: &str) -> Option<Capitulo> {
        match partida.trim().chars().next() {
            Some('2') => Some(Capitulo::MaterialesYSuministros),
            Some('3') => Some(Capitulo::ServiciosGenerales),
            Some('4') => Some(Capitulo::Transferencias),
            _ => None,
        }
    }
}

/// Resolved structural tables for one fiscal year.
#[derive(Debug, Clone)]
pub struct StructuralConfig {
    pub ejercicio: i32,
    pub usa_tablas_2026: bool,
    programas: BTreeMap<&'static str, &'static str>,
    denominaciones: BTreeMap<&'static str, &'static str>,
    categorias: BTreeMap<&'static str, Categoria>,
    secciones: BTreeMap<&'static str, Seccion>,
}

impl StructuralConfig {
    /// Select the tables that apply for the ledger's reporting date (not
    /// "today"). Dates before the first defined fiscal year have no tables
    /// and fail with [`RollupError::UnknownEjercicio`].
    pub fn resolve(fecha: NaiveDate) -> Result<StructuralConfig> {
        if fecha.year() < PRIMER_EJERCICIO {
            return Err(RollupError::UnknownEjercicio(fecha.year()));
        }
        if fecha >= fecha_corte_2026() {
            Ok(Self::tablas_2026())
        } else {
            Ok(Self::tablas_2025())
        }
    }

    pub fn nombre_programa(&self, clave: &str) -> Option<&'static str> {
        self.programas.get(clave).copied()
    }

    pub fn denominacion_ur(&self, ur: &str) -> Option<&'static str> {
        self.denominaciones.get(ur).copied()
    }

    /// Total over all program codes: unmapped codes fall into
    /// `OtrosProgramas` instead of dropping out of the category rollup.
    pub fn categoria_de(&self, programa: &str) -> Categoria {
        self.categorias
            .get(programa)
            .copied()
            .unwrap_or(Categoria::OtrosProgramas)
    }

    /// Partial on purpose: an unknown unit code is real information (a new
    /// or retired UR) and is surfaced as a reconciliation warning by the
    /// SICOP aggregator rather than being folded into a catch-all section.
    pub fn seccion_de(&self, ur: &str) -> Option<Seccion> {
        self.secciones.get(ur).copied()
    }

    fn tablas_2025() -> StructuralConfig {
        StructuralConfig {
            ejercicio: 2025,
            usa_tablas_2026: false,
            programas: PROGRAMAS_2025.iter().copied().collect(),
            denominaciones: DENOMINACIONES_UR.iter().copied().collect(),
            categorias: CATEGORIAS_2025.iter().copied().collect(),
            secciones: SECCIONES_UR.iter().copied().collect(),
        }
    }

    fn tablas_2026() -> StructuralConfig {
        StructuralConfig {
            ejercicio: 2026,
            usa_tablas_2026: true,
            programas: PROGRAMAS_2026.iter().copied().collect(),
            denominaciones: DENOMINACIONES_UR.iter().copied().collect(),
            categorias: CATEGORIAS_2026.iter().copied().collect(),
            secciones: SECCIONES_UR.iter().copied().collect(),
        }
    }
}

const PROGRAMAS_2025: &[(&str, &str)] = &[
    ("E001", "Desarrollo, aplicacion de programas educativos e investigacion"),
    ("E006", "Generacion de proyectos de investigacion"),
    ("M001", "Actividades de apoyo administrativo"),
    ("O001", "Actividades de apoyo a la funcion publica y buen gobierno"),
    ("P001", "Diseno y aplicacion de la politica agropecuaria"),
    ("S290", "Precios de Garantia a Productos Alimentarios Basicos"),
    ("S293", "Produccion para el Bienestar"),
    ("S304", "Fertilizantes para el Bienestar"),
    ("U017", "Sistema Nacional de Informacion para el Desarrollo Rural"),
    ("K014", "Otros proyectos de infraestructura social"),
];

const PROGRAMAS_2026: &[(&str, &str)] = &[
    ("E001", "Desarrollo, aplicacion de programas educativos e investigacion"),
    ("E006", "Generacion de proyectos de investigacion"),
    ("M001", "Actividades de apoyo administrativo"),
    ("O001", "Actividades de apoyo a la funcion publica y buen gobierno"),
    ("P001", "Diseno y aplicacion de la politica agropecuaria"),
    ("S290", "Precios de Garantia a Productos Alimentarios Basicos"),
    ("S293", "Produccion para el Bienestar"),
    ("S304", "Fertilizantes para el Bienestar"),
    ("S325", "Cosechando Soberania"),
    ("K014", "Otros proyectos de infraestructura social"),
];

const CATEGORIAS_2025: &[(&str, Categoria)] = &[
    ("P001", Categoria::ServiciosPersonales),
    ("M001", Categoria::GastoCorriente),
    ("O001", Categoria::GastoCorriente),
    ("E001", Categoria::GastoCorriente),
    ("E006", Categoria::GastoCorriente),
    ("S290", Categoria::Subsidios),
    ("S293", Categoria::Subsidios),
    ("S304", Categoria::Subsidios),
    ("K014", Categoria::BienesMuebles),
];

const CATEGORIAS_2026: &[(&str, Categoria)] = &[
    ("P001", Categoria::ServiciosPersonales),
    ("M001", Categoria::GastoCorriente),
    ("O001", Categoria::GastoCorriente),
    ("E001", Categoria::GastoCorriente),
    ("E006", Categoria::GastoCorriente),
    ("S290", Categoria::Subsidios),
    ("S293", Categoria::Subsidios),
    ("S304", Categoria::Subsidios),
    ("S325", Categoria::Subsidios),
    ("K014", Categoria::BienesMuebles),
];

const DENOMINACIONES_UR: &[(&str, &str)] = &[
    ("100", "Oficina del Secretario"),
    ("110", "Coordinacion General de Comunicacion Social"),
    ("112", "Coordinacion General Juridica"),
    ("113", "Coordinacion General de Delegaciones"),
    ("114", "Coordinacion General de Administracion y Finanzas"),
    ("115", "Subsecretaria de Agricultura"),
    ("116", "Subsecretaria de Desarrollo Rural"),
    ("117", "Subsecretaria de Alimentacion y Competitividad"),
    ("121", "Oficina de Representacion en Aguascalientes"),
    ("122", "Oficina de Representacion en Baja California"),
    ("123", "Oficina de Representacion en Chiapas"),
    ("124", "Oficina de Representacion en Jalisco"),
    ("125", "Oficina de Representacion en Sinaloa"),
    ("A00", "Servicio de Informacion Agroalimentaria y Pesquera"),
    ("B00", "Servicio Nacional de Sanidad, Inocuidad y Calidad Agroalimentaria"),
    ("F00", "Comite Nacional para el Desarrollo Sustentable de la Cana de Azucar"),
    ("I00", "Comision Nacional de Acuacultura y Pesca"),
    ("JAG", "Instituto Nacional de Investigaciones Forestales, Agricolas y Pecuarias"),
    ("RJL", "Fideicomiso de Riesgo Compartido"),
    ("VSS", "Seguridad Alimentaria Mexicana"),
];

const SECCIONES_UR: &[(&str, Seccion)] = &[
    ("100", Seccion::SectorCentral),
    ("110", Seccion::SectorCentral),
    ("112", Seccion::SectorCentral),
    ("113", Seccion::SectorCentral),
    ("114", Seccion::SectorCentral),
    ("115", Seccion::SectorCentral),
    ("116", Seccion::SectorCentral),
    ("117", Seccion::SectorCentral),
    ("121", Seccion::OficinasRepresentacion),
    ("122", Seccion::OficinasRepresentacion),
    ("123", Seccion::OficinasRepresentacion),
    ("124", Seccion::OficinasRepresentacion),
    ("125", Seccion::OficinasRepresentacion),
    ("A00", Seccion::OrganosDesconcentrados),
    ("B00", Seccion::OrganosDesconcentrados),
    ("F00", Seccion::OrganosDesconcentrados),
    ("I00", Seccion::OrganosDesconcentrados),
    ("JAG", Seccion::EntidadesParaestatales),
    ("RJL", Seccion::EntidadesParaestatales),
    ("VSS", Seccion::EntidadesParaestatales),
];
