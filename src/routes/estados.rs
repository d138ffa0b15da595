// src/routes/estados.rs

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::{query, query_as, Executor, Postgres};

use crate::{
    classify::GeoClassifier,
    error::ApiError,
    models::{BranchLocation, StateCount},
    normalize::{NormalizePlan, StateChange, StateSummary},
    AppState,
};

pub async fn list_estados(State(state): State<AppState>) -> Result<Json<Vec<StateCount>>, ApiError> {
    let rows = query_as::<_, StateCount>(
        r#"SELECT COALESCE(estado, 'Desconocido') AS estado, COUNT(*) AS sucursales_count
           FROM sucursales
           GROUP BY COALESCE(estado, 'Desconocido')
           ORDER BY sucursales_count DESC, estado"#,
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(rows))
}

const BRANCH_LOCATIONS_SQL: &str = r#"SELECT id::int8 AS id, nombre, grupo_operativo, estado,
       latitud::float8 AS latitud, longitud::float8 AS longitud
FROM sucursales
WHERE latitud IS NOT NULL AND longitud IS NOT NULL
ORDER BY grupo_operativo, nombre"#;

/// Branch query for the plan; `lock` takes row locks for a rewrite.
fn branch_locations_sql(lock: bool) -> String {
    if lock {
        format!("{BRANCH_LOCATIONS_SQL}\nFOR UPDATE")
    } else {
        BRANCH_LOCATIONS_SQL.to_string()
    }
}

async fn load_plan<'e, E>(executor: E, geo: &GeoClassifier, lock: bool) -> Result<NormalizePlan, ApiError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = branch_locations_sql(lock);
    let branches = query_as::<_, BranchLocation>(&sql).fetch_all(executor).await?;
    Ok(NormalizePlan::build(geo, branches))
}

#[derive(Serialize)]
pub struct PreviewResp {
    pub changed_count: usize,
    pub changes: Vec<StateChange>,
    pub summary_by_new_estado: Vec<StateSummary>,
}

/// GET /api/normalize-estados/preview
pub async fn preview_normalize(State(state): State<AppState>) -> Result<Json<PreviewResp>, ApiError> {
    let plan = load_plan(&state.pool, &state.geo, false).await?;
    Ok(Json(PreviewResp {
        changed_count: plan.changed_count(),
        summary_by_new_estado: plan.per_state,
        changes: plan.changes,
    }))
}

#[derive(Serialize)]
pub struct NormalizeResp {
    pub updated_count: u64,
    pub changed_count: usize,
    pub summary_by_new_estado: Vec<StateSummary>,
}

/// POST /api/normalize-estados
///
/// Rewrites `estado` for every branch with coordinates. The plan is read under
/// row locks in the same transaction as the updates. Idempotent: a second run
/// reports `changed_count = 0`.
pub async fn normalize_estados(State(state): State<AppState>) -> Result<Json<NormalizeResp>, ApiError> {
    let mut tx = state.pool.begin().await?;
    let plan = load_plan(&mut *tx, &state.geo, true).await?;

    let mut updated_count = 0;
    for change in &plan.changes {
        let res = query(r#"UPDATE sucursales SET estado = $1 WHERE id = $2"#)
            .bind(change.estado_nuevo)
            .bind(change.id)
            .execute(&mut *tx)
            .await?;
        updated_count += res.rows_affected();
    }
    tx.commit().await?;

    let changed_count = plan.changed_count();
    tracing::info!(updated_count, changed_count, "estados normalized from GPS");

    Ok(Json(NormalizeResp {
        updated_count,
        changed_count,
        summary_by_new_estado: plan.per_state,
    }))
}
