// src/routes/mapa.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{fetch_branch_stats, filter_value, BranchFilter};
use crate::{
    classify::{
        classify_territory,
        performance::{marker_size, performance_color},
        period::round2,
        TerritoryClass,
    },
    error::ApiError,
    models::BranchStats,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct MapaQ {
    pub grupo: Option<String>,
    pub estado: Option<String>,
}

#[derive(Serialize)]
pub struct MapMarker {
    #[serde(flatten)]
    pub stats: BranchStats,
    pub tipo_territorial: TerritoryClass,
    pub color: &'static str,
    pub size: f64,
}

#[derive(Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

#[derive(Serialize)]
pub struct MapaResp {
    pub sucursales: Vec<MapMarker>,
    pub total: usize,
    pub promedio_general: f64,
    pub centro: MapCenter,
}

// Monterrey
const MAP_CENTER: MapCenter = MapCenter { lat: 25.6866, lng: -100.3161, zoom: 6 };

pub(crate) fn to_marker(stats: BranchStats) -> MapMarker {
    let tipo_territorial = classify_territory(
        stats.estado.as_deref().unwrap_or_default(),
        stats.grupo_operativo.as_deref().unwrap_or_default(),
        &stats.nombre,
    );
    MapMarker {
        tipo_territorial,
        color: performance_color(stats.performance),
        size: marker_size(stats.performance),
        stats,
    }
}

/// Unweighted mean of the branch averages; 0 for an empty map.
pub(crate) fn mean_performance(markers: &[MapMarker]) -> f64 {
    if markers.is_empty() {
        return 0.0;
    }
    let sum: f64 = markers.iter().map(|m| m.stats.performance).sum();
    round2(sum / markers.len() as f64)
}

/// GET /api/mapa?grupo=&estado=
///
/// Branches without coordinates are left off the map.
pub async fn get_mapa(
    State(state): State<AppState>,
    Query(q): Query<MapaQ>,
) -> Result<Json<MapaResp>, ApiError> {
    let filter = BranchFilter {
        grupo: filter_value(q.grupo),
        estado: filter_value(q.estado),
        sucursal: None,
    };
    tracing::debug!(?filter, "mapa requested");

    let sucursales: Vec<MapMarker> = fetch_branch_stats(&state.pool, &filter)
        .await?
        .into_iter()
        .filter(|s| s.latitud.is_some() && s.longitud.is_some())
        .map(to_marker)
        .collect();

    Ok(Json(MapaResp {
        total: sucursales.len(),
        promedio_general: mean_performance(&sucursales),
        sucursales,
        centro: MAP_CENTER,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(nombre: &str, estado: &str, grupo: &str, performance: f64) -> BranchStats {
        BranchStats {
            nombre: nombre.into(),
            estado: Some(estado.into()),
            grupo_operativo: Some(grupo.into()),
            performance,
            total_evaluaciones: 3,
            ultima_supervision: None,
            latitud: Some(25.7),
            longitud: Some(-100.3),
        }
    }

    #[test]
    fn marker_carries_color_size_and_territory() {
        let marker = to_marker(stats("57 - Harold R. Pape", "Nuevo León", "CRR", 92.0));
        assert_eq!(marker.color, "#22c55e");
        assert_eq!(marker.size, 6.0 + 0.92 * 8.0);
        assert_eq!(marker.tipo_territorial, TerritoryClass::Foreign);

        let marker = to_marker(stats("1 - Pino Suarez", "Nuevo León", "TEPEYAC", 65.0));
        assert_eq!(marker.color, "#ef4444");
        assert_eq!(marker.tipo_territorial, TerritoryClass::Local);
    }

    #[test]
    fn mean_over_markers() {
        let markers = vec![
            to_marker(stats("a", "Nuevo León", "OGAS", 90.0)),
            to_marker(stats("b", "Nuevo León", "OGAS", 85.0)),
            to_marker(stats("c", "Nuevo León", "OGAS", 80.5)),
        ];
        assert_eq!(mean_performance(&markers), 85.17);
        assert_eq!(mean_performance(&[]), 0.0);
    }
}
