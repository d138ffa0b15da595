// src/routes/territorial.rs

use std::collections::{BTreeMap, BTreeSet};

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::query_as;

use crate::{
    classify::{classify_territory, TerritoryClass},
    error::ApiError,
    models::TerritoryRow,
    AppState,
};

#[derive(Debug, PartialEq, Serialize)]
pub struct TerritorialCount {
    pub tipo_territorial: TerritoryClass,
    pub estado: String,
    pub grupos: usize,
    pub sucursales: usize,
}

/// Branch counts per (territory, state); LOCAL first, then by count.
pub fn territorial_breakdown<I>(rows: I) -> Vec<TerritorialCount>
where
    I: IntoIterator<Item = TerritoryRow>,
{
    let mut buckets: BTreeMap<(bool, String), (usize, BTreeSet<String>)> = BTreeMap::new();

    for row in rows {
        let estado = row.estado.unwrap_or_else(|| "Desconocido".to_string());
        let grupo = row.grupo_operativo.unwrap_or_default();
        let territory = classify_territory(&estado, &grupo, &row.nombre);

        let entry = buckets
            .entry((territory == TerritoryClass::Foreign, estado))
            .or_default();
        entry.0 += 1;
        entry.1.insert(grupo);
    }

    let mut out: Vec<TerritorialCount> = buckets
        .into_iter()
        .map(|((foreign, estado), (sucursales, grupos))| TerritorialCount {
            tipo_territorial: if foreign { TerritoryClass::Foreign } else { TerritoryClass::Local },
            estado,
            grupos: grupos.len(),
            sucursales,
        })
        .collect();
    out.sort_by(|a, b| {
        (a.tipo_territorial == TerritoryClass::Foreign)
            .cmp(&(b.tipo_territorial == TerritoryClass::Foreign))
            .then(b.sucursales.cmp(&a.sucursales))
    });
    out
}

pub async fn get_territorial(
    State(state): State<AppState>,
) -> Result<Json<Vec<TerritorialCount>>, ApiError> {
    let rows = query_as::<_, TerritoryRow>(
        r#"SELECT estado, grupo_operativo, nombre
           FROM sucursales
           WHERE grupo_operativo IS NOT NULL"#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(territorial_breakdown(rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(estado: &str, grupo: &str, nombre: &str) -> TerritoryRow {
        TerritoryRow {
            estado: Some(estado.into()),
            grupo_operativo: Some(grupo.into()),
            nombre: nombre.into(),
        }
    }

    #[test]
    fn splits_by_territory_and_state() {
        let rows = vec![
            row("Nuevo León", "TEPEYAC", "1 - Pino Suarez"),
            row("Nuevo León", "OGAS", "8 - Gonzalitos"),
            row("Nuevo León", "CRR", "57 - Harold R. Pape"),
            row("Coahuila", "GRUPO SALTILLO", "52 - Venustiano Carranza"),
            row("Tamaulipas", "OCHTER TAMPICO", "60 - Tampico"),
        ];
        let out = territorial_breakdown(rows);

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].tipo_territorial, TerritoryClass::Local);
        assert_eq!(out[0].estado, "Nuevo León");
        assert_eq!(out[0].sucursales, 2);
        assert_eq!(out[0].grupos, 2);
        assert_eq!(out[1].estado, "Coahuila");
        assert!(out[2..]
            .iter()
            .all(|c| c.tipo_territorial == TerritoryClass::Foreign && c.sucursales == 1));
    }
}
