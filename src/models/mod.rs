// src/models/mod.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ───────────────────────────────────────
// Branches (sucursales table)
// ───────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BranchLocation {
    pub id: i64,
    pub nombre: String,
    pub grupo_operativo: Option<String>,
    pub estado: Option<String>,
    pub latitud: Option<f64>,  // decimal, cast to float8
    pub longitud: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct StateCount {
    pub estado: String,
    pub sucursales_count: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct TerritoryRow {
    pub estado: Option<String>,
    pub grupo_operativo: Option<String>,
    pub nombre: String,
}

// ───────────────────────────────────────
// Aggregates over supervision_normalized_view
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Kpis {
    pub promedio_general: Option<f64>,
    pub total_supervisiones: i64,
    pub total_sucursales: i64,
    pub total_grupos: i64,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct GroupStats {
    pub nombre: String,
    pub performance: f64,
    pub total_supervisiones: i64,
    pub total_sucursales: i64,
    pub ultima_supervision: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct BranchStats {
    pub nombre: String,
    pub estado: Option<String>,
    pub grupo_operativo: Option<String>,
    pub performance: f64,
    pub total_evaluaciones: i64,
    pub ultima_supervision: Option<NaiveDate>,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
}

/// One supervision of one branch.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SupervisionScore {
    pub submission_id: String,
    pub fecha_supervision: NaiveDate,
    pub calificacion_general_pct: f64,
}

/// Average of one evaluation area across a branch's supervisions.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct AreaScore {
    pub nombre: String,
    pub performance: f64,
    pub evaluaciones: i64,
}

/// Daily average of one branch.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct DailyScore {
    pub fecha: NaiveDate,
    pub sucursal: String,
    pub grupo: Option<String>,
    pub performance: f64,
    pub evaluaciones_dia: i64,
}
