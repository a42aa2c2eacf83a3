//! Default condition catalog loaded from JSON data.

use caresim_logic::catalog::{CatalogError, ConditionCatalog, ConditionTemplate};

/// The built-in catalog shipped with the simulation (same JSON any host
/// deployment would supply).
const CATALOG_JSON: &str = include_str!("../../../data/condition_catalog.json");

/// Errors from parsing catalog data.
#[derive(Debug)]
pub enum CatalogDataError {
    Parse(serde_json::Error),
    Catalog(CatalogError),
}

impl From<serde_json::Error> for CatalogDataError {
    fn from(e: serde_json::Error) -> Self {
        CatalogDataError::Parse(e)
    }
}

impl From<CatalogError> for CatalogDataError {
    fn from(e: CatalogError) -> Self {
        CatalogDataError::Catalog(e)
    }
}

impl std::fmt::Display for CatalogDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogDataError::Parse(e) => write!(f, "catalog JSON error: {}", e),
            CatalogDataError::Catalog(e) => write!(f, "catalog error: {}", e),
        }
    }
}

impl std::error::Error for CatalogDataError {}

/// Build a catalog from a JSON array of condition templates.
pub fn catalog_from_json(json: &str) -> Result<ConditionCatalog, CatalogDataError> {
    let templates: Vec<ConditionTemplate> = serde_json::from_str(json)?;
    Ok(ConditionCatalog::from_templates(templates)?)
}

/// Parse the embedded default catalog.
pub fn default_catalog() -> Result<ConditionCatalog, CatalogDataError> {
    catalog_from_json(CATALOG_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caresim_logic::causality::CausalType;
    use caresim_logic::condition::DurationClass;

    #[test]
    fn default_catalog_parses() {
        let catalog = default_catalog().expect("embedded catalog is valid");
        assert!(catalog.len() >= 6);
        for label in ["stress", "fatigue", "addiction", "isolation"] {
            assert!(catalog.contains(label), "missing '{}'", label);
        }
    }

    #[test]
    fn default_catalog_fields() {
        let catalog = default_catalog().unwrap();

        let stress = catalog.get("stress").unwrap();
        assert_eq!(stress.causal_type, CausalType::Behavioral);
        assert_eq!(stress.duration, DurationClass::Temporary);
        assert!(stress.progression.rate < 0.0);

        let addiction = catalog.get("addiction").unwrap();
        assert_eq!(addiction.causal_type, CausalType::Dependent);
        assert_eq!(addiction.duration, DurationClass::Permanent);
        assert!(addiction.progression.rate > 0.0);
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            catalog_from_json("not json"),
            Err(CatalogDataError::Parse(_))
        ));
    }

    #[test]
    fn duplicate_labels_rejected() {
        let json = r#"[
            {"label":"x","causal_type":"social","duration":"chronic",
             "progression":{"rate":0.001,"weight":0.5}},
            {"label":"x","causal_type":"social","duration":"chronic",
             "progression":{"rate":0.001,"weight":0.5}}
        ]"#;
        assert!(matches!(
            catalog_from_json(json),
            Err(CatalogDataError::Catalog(CatalogError::DuplicateLabel(_)))
        ));
    }
}
