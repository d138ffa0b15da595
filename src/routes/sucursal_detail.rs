// src/routes/sucursal_detail.rs

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::query_as;

use super::{fetch_branch_stats, filter_value, BranchFilter, SUPERVISIONES_CTE};
use crate::{
    classify::{
        classify_territory, performance::performance_tier, period_trends, resolve_period,
        PeriodLabel, PeriodTrend, TerritoryClass,
    },
    error::ApiError,
    models::{AreaScore, BranchStats, SupervisionScore},
    AppState,
};

const RECENT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct DetailQ {
    pub sucursal: Option<String>,
    pub grupo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecentSupervision {
    pub submission_id: String,
    pub fecha: NaiveDate,
    pub performance: f64,
    pub periodo: PeriodLabel,
}

#[derive(Serialize)]
pub struct SucursalDetail {
    #[serde(flatten)]
    pub stats: BranchStats,
    pub clasificacion: &'static str,
    pub tipo_territorial: TerritoryClass,
    pub tendencias: Vec<PeriodTrend>,
    pub fuera_de_periodo: usize,
    pub evaluaciones_recientes: Vec<RecentSupervision>,
    pub areas_evaluacion: Vec<AreaScore>,
}

/// Assembles the detail view from the branch summary, its supervisions
/// (newest first) and its per-area averages (best first).
pub(crate) fn build_detail(
    stats: BranchStats,
    scores: Vec<SupervisionScore>,
    areas: Vec<AreaScore>,
) -> SucursalDetail {
    let territory = classify_territory(
        stats.estado.as_deref().unwrap_or_default(),
        stats.grupo_operativo.as_deref().unwrap_or_default(),
        &stats.nombre,
    );

    let tendencias = period_trends(
        scores.iter().map(|s| (s.fecha_supervision, s.calificacion_general_pct)),
        territory,
    );
    let fuera_de_periodo = scores
        .iter()
        .filter(|s| resolve_period(s.fecha_supervision, territory).is_other())
        .count();

    let evaluaciones_recientes = scores
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|s| RecentSupervision {
            periodo: resolve_period(s.fecha_supervision, territory),
            submission_id: s.submission_id,
            fecha: s.fecha_supervision,
            performance: s.calificacion_general_pct,
        })
        .collect();

    SucursalDetail {
        clasificacion: performance_tier(stats.performance),
        tipo_territorial: territory,
        stats,
        tendencias,
        fuera_de_periodo,
        evaluaciones_recientes,
        areas_evaluacion: areas.into_iter().filter(|a| a.performance.is_finite()).collect(),
    }
}

/// GET /api/sucursal-detail?sucursal=&grupo=
pub async fn sucursal_detail(
    State(state): State<AppState>,
    Query(q): Query<DetailQ>,
) -> Result<Json<SucursalDetail>, ApiError> {
    let sucursal = q
        .sucursal
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("sucursal is required".into()))?;
    let grupo = filter_value(q.grupo);
    tracing::debug!(%sucursal, ?grupo, "sucursal detail requested");

    let filter = BranchFilter { grupo: grupo.clone(), estado: None, sucursal: Some(sucursal.clone()) };
    let stats = fetch_branch_stats(&state.pool, &filter)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("sucursal '{sucursal}' not found")))?;

    let sql = format!(
        r#"{SUPERVISIONES_CTE}
        SELECT submission_id, fecha_supervision, calificacion AS calificacion_general_pct
        FROM supervisiones
        WHERE nombre = $1 AND ($2::text IS NULL OR grupo_operativo = $2)
        ORDER BY fecha_supervision DESC, submission_id"#
    );
    let scores = query_as::<_, SupervisionScore>(&sql)
        .bind(&sucursal)
        .bind(grupo.as_deref())
        .fetch_all(&state.pool)
        .await?;

    let areas = query_as::<_, AreaScore>(
        r#"SELECT TRIM(area_evaluacion)                       AS nombre,
                  ROUND(AVG(porcentaje)::numeric, 2)::float8   AS performance,
                  COUNT(*)                                     AS evaluaciones
           FROM supervision_normalized_view
           WHERE nombre_normalizado = $1
             AND ($2::text IS NULL OR grupo_normalizado = $2)
             AND area_tipo IS DISTINCT FROM 'area_principal'
             AND area_evaluacion IS NOT NULL
             AND TRIM(area_evaluacion) <> ''
             AND porcentaje IS NOT NULL
             AND fecha_supervision >= DATE '2025-02-01'
           GROUP BY TRIM(area_evaluacion)
           ORDER BY performance DESC, nombre"#,
    )
    .bind(&sucursal)
    .bind(grupo.as_deref())
    .fetch_all(&state.pool)
    .await?;

    let detail = build_detail(stats, scores, areas);
    tracing::info!(
        %sucursal,
        territorio = detail.tipo_territorial.as_str(),
        periodos = detail.tendencias.len(),
        areas = detail.areas_evaluacion.len(),
        "sucursal detail loaded"
    );
    Ok(Json(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn score(id: &str, date: NaiveDate, pct: f64) -> SupervisionScore {
        SupervisionScore {
            submission_id: id.into(),
            fecha_supervision: date,
            calificacion_general_pct: pct,
        }
    }

    fn area(nombre: &str, performance: f64, evaluaciones: i64) -> AreaScore {
        AreaScore { nombre: nombre.into(), performance, evaluaciones }
    }

    fn stats(nombre: &str, estado: &str, grupo: &str) -> BranchStats {
        BranchStats {
            nombre: nombre.into(),
            estado: Some(estado.into()),
            grupo_operativo: Some(grupo.into()),
            performance: 84.0,
            total_evaluaciones: 4,
            ultima_supervision: Some(day(2025, 11, 3)),
            latitud: Some(25.68),
            longitud: Some(-100.31),
        }
    }

    #[test]
    fn local_branch_trends_and_gap_days() {
        let scores = vec![
            score("s4", day(2025, 11, 3), 88.0),
            score("s3", day(2025, 9, 2), 80.0),
            score("s2", day(2025, 4, 20), 70.0),
            score("s1", day(2025, 3, 15), 90.0),
        ];
        let detail = build_detail(stats("1 - Pino Suarez", "Nuevo León", "TEPEYAC"), scores, Vec::new());

        assert_eq!(detail.tipo_territorial, TerritoryClass::Local);
        assert_eq!(detail.clasificacion, "Bueno");
        let labels: Vec<_> = detail.tendencias.iter().map(|t| t.periodo).collect();
        assert_eq!(labels, vec!["NL-T1-2025", "NL-T3-2025", "NL-T4-2025"]);
        assert_eq!(detail.fuera_de_periodo, 1);
        assert_eq!(detail.evaluaciones_recientes.len(), 4);
        assert_eq!(detail.evaluaciones_recientes[2].periodo, PeriodLabel::Other);
    }

    #[test]
    fn excluded_branch_uses_foreign_calendar() {
        let scores = vec![score("s1", day(2025, 9, 2), 80.0), score("s0", day(2025, 5, 2), 75.0)];
        let detail = build_detail(stats("30 - Carrizo", "Nuevo León", "CRR"), scores, Vec::new());

        assert_eq!(detail.tipo_territorial, TerritoryClass::Foreign);
        let labels: Vec<_> = detail.tendencias.iter().map(|t| t.periodo).collect();
        assert_eq!(labels, vec!["FOR-S1-2025", "FOR-S2-2025"]);
        assert_eq!(detail.fuera_de_periodo, 0);
    }

    #[test]
    fn detail_serializes_flat() {
        let detail = build_detail(stats("1 - Pino Suarez", "Nuevo León", "TEPEYAC"), Vec::new(), Vec::new());
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["nombre"], "1 - Pino Suarez");
        assert_eq!(json["tipo_territorial"], "LOCAL");
        assert!(json["tendencias"].as_array().unwrap().is_empty());
        assert!(json["areas_evaluacion"].as_array().unwrap().is_empty());
    }

    #[test]
    fn area_breakdown_is_carried_in_order() {
        let areas = vec![
            area("COCINA", 96.5, 4),
            area("BAÑOS", 88.0, 4),
            area("ALMACEN", f64::NAN, 1),
            area("EXTERIOR", 71.25, 3),
        ];
        let detail = build_detail(
            stats("1 - Pino Suarez", "Nuevo León", "TEPEYAC"),
            vec![score("s1", day(2025, 9, 2), 84.0)],
            areas,
        );

        let names: Vec<_> = detail.areas_evaluacion.iter().map(|a| a.nombre.as_str()).collect();
        assert_eq!(names, vec!["COCINA", "BAÑOS", "EXTERIOR"]);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["areas_evaluacion"][0]["performance"], 96.5);
        assert_eq!(json["areas_evaluacion"][2]["evaluaciones"], 3);
    }
}
