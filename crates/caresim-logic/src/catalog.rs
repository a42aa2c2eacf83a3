//! Read-only registry of condition templates.
//!
//! The catalog is built once at simulation start and injected wherever
//! templates are needed. It is never mutated afterwards, so hosts may
//! share one catalog across agents (and threads) freely.

use crate::causality::CausalType;
use crate::condition::DurationClass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Natural-progression parameters for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// Signed drift direction and speed: negative drifts toward
    /// resolution, positive toward worsening.
    pub rate: f32,
    /// Relative weight of this condition in the progression formula.
    pub weight: f32,
}

/// Immutable catalog entry for one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTemplate {
    /// Unique key within a catalog.
    pub label: String,
    pub causal_type: CausalType,
    pub duration: DurationClass,
    pub progression: Progression,
}

/// Errors raised by catalog construction and lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A referenced label is not in the catalog.
    UnknownCondition(String),
    /// Two templates share a label at construction time.
    DuplicateLabel(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::UnknownCondition(label) => {
                write!(f, "unknown condition '{}'", label)
            }
            CatalogError::DuplicateLabel(label) => {
                write!(f, "duplicate condition label '{}'", label)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Registry of condition templates keyed by label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionCatalog {
    templates: HashMap<String, ConditionTemplate>,
}

impl ConditionCatalog {
    /// Build a catalog from a list of templates. Labels must be unique.
    pub fn from_templates(templates: Vec<ConditionTemplate>) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(templates.len());
        for template in templates {
            let label = template.label.clone();
            if map.insert(label.clone(), template).is_some() {
                return Err(CatalogError::DuplicateLabel(label));
            }
        }
        Ok(Self { templates: map })
    }

    /// Look up a template by label.
    pub fn get(&self, label: &str) -> Result<&ConditionTemplate, CatalogError> {
        self.templates
            .get(label)
            .ok_or_else(|| CatalogError::UnknownCondition(label.to_string()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.templates.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All labels, sorted for deterministic iteration.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> Vec<ConditionTemplate> {
        vec![
            ConditionTemplate {
                label: "stress".to_string(),
                causal_type: CausalType::Behavioral,
                duration: DurationClass::Temporary,
                progression: Progression {
                    rate: -0.004,
                    weight: 0.8,
                },
            },
            ConditionTemplate {
                label: "addiction".to_string(),
                causal_type: CausalType::Dependent,
                duration: DurationClass::Permanent,
                progression: Progression {
                    rate: 0.003,
                    weight: 1.0,
                },
            },
        ]
    }

    #[test]
    fn build_and_lookup() {
        let catalog = ConditionCatalog::from_templates(templates()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("stress"));
        let t = catalog.get("addiction").unwrap();
        assert_eq!(t.causal_type, CausalType::Dependent);
        assert_eq!(t.duration, DurationClass::Permanent);
    }

    #[test]
    fn unknown_label_errors() {
        let catalog = ConditionCatalog::from_templates(templates()).unwrap();
        let err = catalog.get("gout").unwrap_err();
        assert_eq!(err, CatalogError::UnknownCondition("gout".to_string()));
    }

    #[test]
    fn duplicate_labels_rejected() {
        let mut list = templates();
        list.push(list[0].clone());
        let err = ConditionCatalog::from_templates(list).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateLabel("stress".to_string()));
    }

    #[test]
    fn lookup_is_idempotent() {
        let catalog = ConditionCatalog::from_templates(templates()).unwrap();
        let first = catalog.get("stress").unwrap().clone();
        let second = catalog.get("stress").unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn labels_sorted() {
        let catalog = ConditionCatalog::from_templates(templates()).unwrap();
        assert_eq!(catalog.labels(), vec!["addiction", "stress"]);
    }
}
