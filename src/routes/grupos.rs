// src/routes/grupos.rs

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::query_as;

use super::SUPERVISIONES_CTE;
use crate::{
    classify::{classify_group, classify_territory, performance::performance_tier, GroupTerritory, TerritoryClass},
    error::ApiError,
    models::{GroupStats, TerritoryRow},
    AppState,
};

#[derive(Serialize)]
pub struct GroupView {
    #[serde(flatten)]
    pub stats: GroupStats,
    pub clasificacion: &'static str,
    pub tipo_territorial: GroupTerritory,
}

/// Territory of each operating group, folded from its branches.
pub(crate) fn group_territories<I>(rows: I) -> HashMap<String, GroupTerritory>
where
    I: IntoIterator<Item = TerritoryRow>,
{
    let mut branches: HashMap<String, Vec<TerritoryClass>> = HashMap::new();
    for row in rows {
        let grupo = row.grupo_operativo.unwrap_or_default();
        let territory = classify_territory(row.estado.as_deref().unwrap_or_default(), &grupo, &row.nombre);
        branches.entry(grupo.trim().to_string()).or_default().push(territory);
    }
    branches
        .into_iter()
        .map(|(grupo, classes)| (grupo, classify_group(classes)))
        .collect()
}

pub async fn list_grupos(State(state): State<AppState>) -> Result<Json<Vec<GroupView>>, ApiError> {
    let sql = format!(
        r#"{SUPERVISIONES_CTE}
        SELECT grupo_operativo                          AS nombre,
               ROUND(AVG(calificacion)::numeric, 2)::float8 AS performance,
               COUNT(*)                                 AS total_supervisiones,
               COUNT(DISTINCT nombre)                   AS total_sucursales,
               MAX(fecha_supervision)                   AS ultima_supervision
        FROM supervisiones
        WHERE grupo_operativo IS NOT NULL AND grupo_operativo <> ''
        GROUP BY grupo_operativo
        ORDER BY performance DESC"#
    );
    let rows = query_as::<_, GroupStats>(&sql).fetch_all(&state.pool).await?;

    let branches_sql = format!(
        r#"{SUPERVISIONES_CTE}
        SELECT MAX(estado) AS estado, grupo_operativo, nombre
        FROM supervisiones
        WHERE nombre IS NOT NULL AND grupo_operativo IS NOT NULL
        GROUP BY grupo_operativo, nombre"#
    );
    let branches = query_as::<_, TerritoryRow>(&branches_sql).fetch_all(&state.pool).await?;
    let territories = group_territories(branches);

    let grupos: Vec<GroupView> = rows
        .into_iter()
        .map(|stats| GroupView {
            clasificacion: performance_tier(stats.performance),
            tipo_territorial: territories
                .get(stats.nombre.trim())
                .copied()
                .unwrap_or_else(|| classify_group(None)),
            stats,
        })
        .collect();

    tracing::info!(grupos = grupos.len(), "grupos loaded");
    Ok(Json(grupos))
}
