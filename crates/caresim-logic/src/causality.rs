//! Causal types and outcome collections.
//!
//! An outcome is a typed magnitude describing the effect of an action or
//! intervention. Outcomes affect every condition sharing their causal type;
//! direction (beneficial or harmful) comes from which collection carries
//! them, never from the magnitude's sign.
//!
//! Causal types are a closed enum shared between outcome producers and
//! condition templates, so a mismatched category is caught at construction
//! time instead of silently missing at lookup time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Causal category linking outcomes to the conditions they affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CausalType {
    Behavioral,
    Social,
    Dependent,
    Physical,
    Cognitive,
}

impl CausalType {
    /// All causal types in order.
    pub const ALL: [CausalType; 5] = [
        CausalType::Behavioral,
        CausalType::Social,
        CausalType::Dependent,
        CausalType::Physical,
        CausalType::Cognitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CausalType::Behavioral => "behavioral",
            CausalType::Social => "social",
            CausalType::Dependent => "dependent",
            CausalType::Physical => "physical",
            CausalType::Cognitive => "cognitive",
        }
    }
}

/// Errors produced while normalizing an outcome collection.
///
/// A malformed collection fails before any condition state is touched, so
/// an assessment either runs against fully validated inputs or not at all.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeError {
    /// Magnitude is NaN or infinite.
    NonFinite(CausalType),
    /// Magnitude is negative. Direction is carried by the collection
    /// (beneficial vs harmful), not by the entry.
    NegativeMagnitude(CausalType, f32),
    /// A pair sequence repeats a causal type with a different magnitude.
    ConflictingEntry(CausalType),
}

impl std::fmt::Display for OutcomeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeError::NonFinite(ty) => {
                write!(f, "outcome magnitude for '{}' is not finite", ty.as_str())
            }
            OutcomeError::NegativeMagnitude(ty, m) => {
                write!(f, "outcome magnitude for '{}' is negative ({})", ty.as_str(), m)
            }
            OutcomeError::ConflictingEntry(ty) => {
                write!(
                    f,
                    "outcome sequence repeats '{}' with a different magnitude",
                    ty.as_str()
                )
            }
        }
    }
}

impl std::error::Error for OutcomeError {}

/// A normalized outcome collection: causal type to non-negative magnitude.
///
/// Accepts either a prebuilt mapping or an ordered sequence of
/// `(type, magnitude)` pairs; both are validated into the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSet {
    magnitudes: HashMap<CausalType, f32>,
}

impl OutcomeSet {
    /// An outcome collection with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize a prebuilt mapping.
    pub fn from_map(map: HashMap<CausalType, f32>) -> Result<Self, OutcomeError> {
        for (ty, magnitude) in &map {
            Self::validate(*ty, *magnitude)?;
        }
        Ok(Self { magnitudes: map })
    }

    /// Normalize an ordered pair sequence into a mapping.
    ///
    /// Repeated entries with an equal magnitude collapse; repeats with a
    /// different magnitude are rejected rather than silently last-wins.
    pub fn from_pairs(pairs: &[(CausalType, f32)]) -> Result<Self, OutcomeError> {
        let mut magnitudes = HashMap::new();
        for (ty, magnitude) in pairs {
            Self::validate(*ty, *magnitude)?;
            if let Some(existing) = magnitudes.insert(*ty, *magnitude) {
                if (existing - magnitude).abs() > f32::EPSILON {
                    return Err(OutcomeError::ConflictingEntry(*ty));
                }
            }
        }
        Ok(Self { magnitudes })
    }

    fn validate(ty: CausalType, magnitude: f32) -> Result<(), OutcomeError> {
        if !magnitude.is_finite() {
            return Err(OutcomeError::NonFinite(ty));
        }
        if magnitude < 0.0 {
            return Err(OutcomeError::NegativeMagnitude(ty, magnitude));
        }
        Ok(())
    }

    /// Magnitude recorded for a causal type, if any.
    pub fn get(&self, ty: CausalType) -> Option<f32> {
        self.magnitudes.get(&ty).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn causal_type_round_trip() {
        for ty in CausalType::ALL {
            assert!(!ty.as_str().is_empty());
        }
        assert_eq!(CausalType::ALL.len(), 5);
    }

    #[test]
    fn from_pairs_normalizes() {
        let set = OutcomeSet::from_pairs(&[
            (CausalType::Behavioral, 0.5),
            (CausalType::Social, 0.2),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);
        assert!((set.get(CausalType::Behavioral).unwrap() - 0.5).abs() < f32::EPSILON);
        assert!(set.get(CausalType::Dependent).is_none());
    }

    #[test]
    fn repeated_equal_entries_collapse() {
        let set = OutcomeSet::from_pairs(&[
            (CausalType::Behavioral, 0.5),
            (CausalType::Behavioral, 0.5),
        ])
        .unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn conflicting_entries_rejected() {
        let err = OutcomeSet::from_pairs(&[
            (CausalType::Behavioral, 0.5),
            (CausalType::Behavioral, 0.3),
        ])
        .unwrap_err();
        assert_eq!(err, OutcomeError::ConflictingEntry(CausalType::Behavioral));
    }

    #[test]
    fn negative_magnitude_rejected() {
        let err = OutcomeSet::from_pairs(&[(CausalType::Social, -0.1)]).unwrap_err();
        assert!(matches!(err, OutcomeError::NegativeMagnitude(CausalType::Social, _)));
    }

    #[test]
    fn non_finite_magnitude_rejected() {
        let err = OutcomeSet::from_pairs(&[(CausalType::Physical, f32::NAN)]).unwrap_err();
        assert_eq!(err, OutcomeError::NonFinite(CausalType::Physical));

        let mut map = HashMap::new();
        map.insert(CausalType::Cognitive, f32::INFINITY);
        assert!(OutcomeSet::from_map(map).is_err());
    }

    #[test]
    fn empty_set_matches_nothing() {
        let set = OutcomeSet::empty();
        assert!(set.is_empty());
        for ty in CausalType::ALL {
            assert!(set.get(ty).is_none());
        }
    }
}
