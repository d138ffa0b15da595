// src/routes/kpis.rs

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::query_as;

use super::SUPERVISIONES_CTE;
use crate::{classify::period::round2, error::ApiError, models::Kpis, AppState};

#[derive(Serialize)]
pub struct KpisResp {
    #[serde(flatten)]
    pub kpis: Kpis,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub async fn get_kpis(State(state): State<AppState>) -> Result<Json<KpisResp>, ApiError> {
    let sql = format!(
        r#"{SUPERVISIONES_CTE}
        SELECT AVG(calificacion)                    AS promedio_general,
               COUNT(*)                             AS total_supervisiones,
               COUNT(DISTINCT nombre)               AS total_sucursales,
               COUNT(DISTINCT grupo_operativo)      AS total_grupos,
               MIN(fecha_supervision)               AS fecha_inicio,
               MAX(fecha_supervision)               AS fecha_fin
        FROM supervisiones"#
    );
    let mut kpis = query_as::<_, Kpis>(&sql).fetch_one(&state.pool).await?;
    kpis.promedio_general = kpis.promedio_general.map(round2);

    tracing::info!(
        promedio = ?kpis.promedio_general,
        supervisiones = kpis.total_supervisiones,
        "kpis loaded"
    );
    Ok(Json(KpisResp { kpis, status: "success", timestamp: Utc::now() }))
}
