// src/normalize.rs
//
// Recomputes each branch's `estado` from its coordinates. Planning is pure;
// the route applies the plan in one transaction.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::classify::GeoClassifier;
use crate::models::BranchLocation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateChange {
    pub id: i64,
    pub nombre: String,
    pub grupo_operativo: Option<String>,
    pub estado_actual: Option<String>,
    pub estado_nuevo: &'static str,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub estado_nuevo: &'static str,
    pub sucursales: usize,
    pub grupos: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct NormalizePlan {
    pub changes: Vec<StateChange>,
    pub per_state: Vec<StateSummary>,
}

impl NormalizePlan {
    /// Branches without both coordinates are left out: their stored state is
    /// never overwritten.
    pub fn build<I>(classifier: &GeoClassifier, branches: I) -> Self
    where
        I: IntoIterator<Item = BranchLocation>,
    {
        let mut changes = Vec::new();
        let mut by_state: BTreeMap<&'static str, (usize, BTreeSet<String>)> = BTreeMap::new();

        for branch in branches {
            if branch.latitud.is_none() || branch.longitud.is_none() {
                continue;
            }
            let estado_nuevo = classifier.classify_coords(branch.latitud, branch.longitud);
            let changed = branch.estado.as_deref() != Some(estado_nuevo);

            let entry = by_state.entry(estado_nuevo).or_default();
            entry.0 += 1;
            if let Some(group) = branch.grupo_operativo.as_ref() {
                entry.1.insert(group.clone());
            }

            changes.push(StateChange {
                id: branch.id,
                nombre: branch.nombre,
                grupo_operativo: branch.grupo_operativo,
                estado_actual: branch.estado,
                estado_nuevo,
                changed,
            });
        }

        let mut per_state: Vec<StateSummary> = by_state
            .into_iter()
            .map(|(estado_nuevo, (sucursales, grupos))| StateSummary {
                estado_nuevo,
                sucursales,
                grupos: grupos.len(),
            })
            .collect();
        // most branches first, ties by name (already name-ordered from the map)
        per_state.sort_by(|a, b| b.sucursales.cmp(&a.sucursales));

        Self { changes, per_state }
    }

    pub fn changed_count(&self) -> usize {
        self.changes.iter().filter(|c| c.changed).count()
    }
}
