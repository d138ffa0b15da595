// src/routes/ranking.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{fetch_branch_stats, filter_value, BranchFilter};
use crate::{
    classify::{classify_territory, performance::performance_tier, TerritoryClass},
    error::ApiError,
    models::BranchStats,
    AppState,
};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct RankingQ {
    pub grupo: Option<String>,
    pub estado: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct RankedBranch {
    pub posicion: usize,
    #[serde(flatten)]
    pub stats: BranchStats,
    pub clasificacion: &'static str,
    pub tipo_territorial: TerritoryClass,
}

pub(crate) fn rank(rows: Vec<BranchStats>, limit: Option<usize>) -> Vec<RankedBranch> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, stats)| RankedBranch {
            posicion: i + 1,
            clasificacion: performance_tier(stats.performance),
            tipo_territorial: classify_territory(
                stats.estado.as_deref().unwrap_or_default(),
                stats.grupo_operativo.as_deref().unwrap_or_default(),
                &stats.nombre,
            ),
            stats,
        })
        .collect()
}

/// GET /api/sucursales-ranking?grupo=&estado=&limit=
pub async fn sucursales_ranking(
    State(state): State<AppState>,
    Query(q): Query<RankingQ>,
) -> Result<Json<Vec<RankedBranch>>, ApiError> {
    let filter = BranchFilter {
        grupo: filter_value(q.grupo),
        estado: filter_value(q.estado),
        sucursal: None,
    };
    let rows = fetch_branch_stats(&state.pool, &filter).await?;
    Ok(Json(rank(rows, q.limit)))
}
