use sqlx::{query_as, PgPool};

use crate::models::BranchStats;

pub mod estados;
pub mod grupos;
pub mod health;
pub mod historico;
pub mod kpis;
pub mod mapa;
pub mod ranking;
pub mod sucursal_detail;
pub mod territorial;

// One row per supervision: the view repeats a submission once per area.
// Every dashboard aggregate starts from this CTE.
pub(crate) const SUPERVISIONES_CTE: &str = r#"
    WITH supervisiones AS (
        SELECT DISTINCT ON (submission_id)
            submission_id::text               AS submission_id,
            nombre_normalizado                AS nombre,
            grupo_normalizado                 AS grupo_operativo,
            estado_final                      AS estado,
            latitud::float8                   AS latitud,
            longitud::float8                  AS longitud,
            fecha_supervision::date           AS fecha_supervision,
            calificacion_general_pct::float8  AS calificacion
        FROM supervision_normalized_view
        WHERE area_tipo = 'area_principal'
          AND fecha_supervision >= DATE '2025-02-01'
          AND calificacion_general_pct IS NOT NULL
        ORDER BY submission_id
    )
"#;

#[derive(Debug, Default)]
pub(crate) struct BranchFilter {
    pub grupo: Option<String>,
    pub estado: Option<String>,
    pub sucursal: Option<String>,
}

/// Per-branch averages, best first.
pub(crate) async fn fetch_branch_stats(
    pool: &PgPool,
    filter: &BranchFilter,
) -> Result<Vec<BranchStats>, sqlx::Error> {
    let sql = format!(
        r#"{SUPERVISIONES_CTE}
        SELECT nombre,
               MAX(estado)                                  AS estado,
               grupo_operativo,
               ROUND(AVG(calificacion)::numeric, 2)::float8 AS performance,
               COUNT(*)                                     AS total_evaluaciones,
               MAX(fecha_supervision)                       AS ultima_supervision,
               MAX(latitud)                                 AS latitud,
               MAX(longitud)                                AS longitud
        FROM supervisiones
        WHERE nombre IS NOT NULL
          AND ($1::text IS NULL OR grupo_operativo = $1)
          AND ($2::text IS NULL OR estado = $2)
          AND ($3::text IS NULL OR nombre = $3)
        GROUP BY nombre, grupo_operativo
        ORDER BY performance DESC, nombre"#
    );
    query_as::<_, BranchStats>(&sql)
        .bind(filter.grupo.as_deref())
        .bind(filter.estado.as_deref())
        .bind(filter.sucursal.as_deref())
        .fetch_all(pool)
        .await
}

/// `"todos"`/`"todas"` and blank query values mean "no filter".
pub(crate) fn filter_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("todos") && !v.eq_ignore_ascii_case("todas"))
}
