// src/routes/historico.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::query_as;

use super::{filter_value, SUPERVISIONES_CTE};
use crate::{classify::period::round2, error::ApiError, models::DailyScore, AppState};

const HISTORY_LIMIT: i64 = 100;
/// Minimum change, in percentage points, that counts as a trend.
const TREND_THRESHOLD: f64 = 2.0;

#[derive(Debug, Deserialize)]
pub struct HistoricoQ {
    pub grupo: Option<String>,
    pub sucursal: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryTrend {
    pub trend: TrendDirection,
    pub change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub older_avg: Option<f64>,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compares the newest third of a series against the oldest third. `points`
/// is newest first; the two thirds overlap when the series is short.
pub fn history_trend(points: &[f64]) -> HistoryTrend {
    let n = points.len();
    if n < 2 {
        return HistoryTrend { trend: TrendDirection::Stable, change: 0.0, recent_avg: None, older_avg: None };
    }

    let recent = mean(&points[..(n + 2) / 3]);
    let older = mean(&points[(n * 2) / 3..]);
    let change = recent - older;

    let trend = if change > TREND_THRESHOLD {
        TrendDirection::Up
    } else if change < -TREND_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };
    HistoryTrend {
        trend,
        change: round2(change),
        recent_avg: Some(round2(recent)),
        older_avg: Some(round2(older)),
    }
}

#[derive(Debug, Serialize)]
pub struct HistoricoFilters {
    pub grupo: Option<String>,
    pub sucursal: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoricoResp {
    pub data: Vec<DailyScore>,
    pub trends: HistoryTrend,
    pub total_puntos: usize,
    pub promedio_periodo: f64,
    pub periodo_analisis: String,
    pub filters: HistoricoFilters,
}

pub(crate) fn build_historico(data: Vec<DailyScore>, filters: HistoricoFilters) -> HistoricoResp {
    let scores: Vec<f64> = data.iter().map(|d| d.performance).collect();
    let promedio_periodo = if scores.is_empty() { 0.0 } else { round2(mean(&scores)) };
    let periodo_analisis = match (data.last(), data.first()) {
        (Some(oldest), Some(newest)) => format!(
            "{} - {}",
            oldest.fecha.format("%-d/%-m/%Y"),
            newest.fecha.format("%-d/%-m/%Y")
        ),
        _ => "Sin datos".to_string(),
    };

    HistoricoResp {
        trends: history_trend(&scores),
        total_puntos: data.len(),
        promedio_periodo,
        periodo_analisis,
        filters,
        data,
    }
}

/// GET /api/historico?grupo=&sucursal=
pub async fn get_historico(
    State(state): State<AppState>,
    Query(q): Query<HistoricoQ>,
) -> Result<Json<HistoricoResp>, ApiError> {
    let grupo = filter_value(q.grupo);
    let sucursal = filter_value(q.sucursal);

    let sql = format!(
        r#"{SUPERVISIONES_CTE}
        SELECT fecha_supervision                            AS fecha,
               nombre                                       AS sucursal,
               grupo_operativo                              AS grupo,
               ROUND(AVG(calificacion)::numeric, 2)::float8 AS performance,
               COUNT(*)                                     AS evaluaciones_dia
        FROM supervisiones
        WHERE nombre IS NOT NULL
          AND ($1::text IS NULL OR grupo_operativo = $1)
          AND ($2::text IS NULL OR nombre = $2)
        GROUP BY fecha_supervision, nombre, grupo_operativo
        ORDER BY fecha DESC, sucursal
        LIMIT $3"#
    );
    let data = query_as::<_, DailyScore>(&sql)
        .bind(grupo.as_deref())
        .bind(sucursal.as_deref())
        .bind(HISTORY_LIMIT)
        .fetch_all(&state.pool)
        .await?;

    let resp = build_historico(data, HistoricoFilters { grupo, sucursal });
    tracing::info!(
        puntos = resp.total_puntos,
        promedio = resp.promedio_periodo,
        "historico loaded"
    );
    Ok(Json(resp))
}
