// src/classify/territory.rs

use serde::{Deserialize, Serialize};

pub const LOCAL_STATE: &str = "Nuevo León";
pub const LOCAL_GROUP: &str = "GRUPO SALTILLO";

/// Branches administered from Nuevo León that are still evaluated on the
/// foreign (semi-annual) schedule.
pub const FOREIGN_SCHEDULE_BRANCHES: [&str; 3] =
    ["57 - Harold R. Pape", "30 - Carrizo", "28 - Guerrero"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerritoryClass {
    #[serde(rename = "LOCAL")]
    Local,
    #[serde(rename = "FORANEA")]
    Foreign,
}

impl TerritoryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerritoryClass::Local => "LOCAL",
            TerritoryClass::Foreign => "FORANEA",
        }
    }
}

pub fn classify_territory(state: &str, operating_group: &str, branch_name: &str) -> TerritoryClass {
    if FOREIGN_SCHEDULE_BRANCHES.contains(&branch_name.trim()) {
        return TerritoryClass::Foreign;
    }
    if state.trim() == LOCAL_STATE || operating_group.trim() == LOCAL_GROUP {
        return TerritoryClass::Local;
    }
    TerritoryClass::Foreign
}

// ───────────────────────────────────────
// Group-level view, used for dashboard grouping only
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupTerritory {
    Local,
    #[serde(rename = "foranea")]
    Foreign,
    Mixed,
}

/// Folds the territories of a group's branches: all local is `Local`, all
/// foreign is `Foreign`, anything else is `Mixed`. A group with no known
/// branches is `Foreign`.
pub fn classify_group<I>(branches: I) -> GroupTerritory
where
    I: IntoIterator<Item = TerritoryClass>,
{
    let (mut local, mut foreign) = (false, false);
    for territory in branches {
        match territory {
            TerritoryClass::Local => local = true,
            TerritoryClass::Foreign => foreign = true,
        }
    }
    match (local, foreign) {
        (true, false) => GroupTerritory::Local,
        (true, true) => GroupTerritory::Mixed,
        (false, _) => GroupTerritory::Foreign,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_branch_is_foreign_even_in_nuevo_leon() {
        assert_eq!(
            classify_territory("Nuevo León", "ANY_GROUP", "57 - Harold R. Pape"),
            TerritoryClass::Foreign
        );
        assert_eq!(
            classify_territory("Nuevo León", "CRR", "30 - Carrizo"),
            TerritoryClass::Foreign
        );
        assert_eq!(
            classify_territory("Nuevo León", "CRR", "28 - Guerrero"),
            TerritoryClass::Foreign
        );
    }

    #[test]
    fn saltillo_group_is_local_outside_nuevo_leon() {
        assert_eq!(classify_territory("Jalisco", "GRUPO SALTILLO", "X"), TerritoryClass::Local);
        assert_eq!(classify_territory("Coahuila", "GRUPO SALTILLO", "X"), TerritoryClass::Local);
    }

    #[test]
    fn nuevo_leon_branches_are_local() {
        assert_eq!(classify_territory("Nuevo León", "TEPEYAC", "1 - Pino Suarez"), TerritoryClass::Local);
    }

    #[test]
    fn everything_else_is_foreign() {
        assert_eq!(classify_territory("Tamaulipas", "OCHTER TAMPICO", "X"), TerritoryClass::Foreign);
        assert_eq!(classify_territory("", "", ""), TerritoryClass::Foreign);
    }

    #[test]
    fn territory_serializes_as_dashboard_tokens() {
        assert_eq!(serde_json::to_string(&TerritoryClass::Local).unwrap(), "\"LOCAL\"");
        assert_eq!(serde_json::to_string(&TerritoryClass::Foreign).unwrap(), "\"FORANEA\"");
        assert_eq!(TerritoryClass::Foreign.as_str(), "FORANEA");
    }

    #[test]
    fn group_follows_its_branches() {
        use TerritoryClass::{Foreign, Local};
        assert_eq!(classify_group([Local, Local]), GroupTerritory::Local);
        assert_eq!(classify_group([Foreign]), GroupTerritory::Foreign);
        assert_eq!(classify_group([Local, Foreign, Local]), GroupTerritory::Mixed);
    }

    #[test]
    fn group_without_branches_is_foreign() {
        assert_eq!(classify_group(Vec::new()), GroupTerritory::Foreign);
    }

    #[test]
    fn group_territory_tokens() {
        assert_eq!(serde_json::to_string(&GroupTerritory::Foreign).unwrap(), "\"foranea\"");
        assert_eq!(serde_json::to_string(&GroupTerritory::Mixed).unwrap(), "\"mixed\"");
    }
}
