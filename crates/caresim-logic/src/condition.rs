//! Duration classes and live condition instances.

use crate::catalog::{ConditionTemplate, Progression};
use crate::causality::CausalType;
use serde::{Deserialize, Serialize};

/// Permanence class of a condition.
///
/// Escalation is one-way: temporary → chronic → permanent. The class
/// decides which severity deltas a condition accumulates and whether it
/// can ever be removed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DurationClass {
    /// Can only improve; removed once severity reaches zero.
    Temporary,
    /// Can move either way; never removed.
    Chronic,
    /// Can only worsen.
    Permanent,
}

impl DurationClass {
    /// All classes in escalation order.
    pub const ALL: [DurationClass; 3] = [
        DurationClass::Temporary,
        DurationClass::Chronic,
        DurationClass::Permanent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationClass::Temporary => "temporary",
            DurationClass::Chronic => "chronic",
            DurationClass::Permanent => "permanent",
        }
    }

    /// Position in the escalation order. Never decreases over a
    /// condition's lifetime.
    pub fn rank(self) -> u8 {
        match self {
            DurationClass::Temporary => 0,
            DurationClass::Chronic => 1,
            DurationClass::Permanent => 2,
        }
    }

    /// Next class after a severity overflow. Permanent has no successor.
    pub fn escalated(self) -> DurationClass {
        match self {
            DurationClass::Temporary => DurationClass::Chronic,
            DurationClass::Chronic | DurationClass::Permanent => DurationClass::Permanent,
        }
    }

    /// Whether a single delta source is retained under this class.
    ///
    /// Applied to each source individually before summing, so a worsening
    /// natural drift cannot hide inside an otherwise-improving total.
    pub fn retains(self, delta: f32) -> bool {
        match self {
            DurationClass::Chronic => true,
            DurationClass::Temporary => delta < 0.0,
            DurationClass::Permanent => delta > 0.0,
        }
    }
}

/// Live, per-agent state of one condition.
///
/// Instances are deep copies of a catalog template plus the two mutable
/// fields: `weight` (severity) and `duration` (escalates over time).
/// Exclusively owned by the chart that holds them; never shared between
/// agents or aliased back to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionInstance {
    pub label: String,
    pub causal_type: CausalType,
    pub duration: DurationClass,
    pub progression: Progression,
    /// Severity, nominally 0.0–1.0. May transiently exceed 1.0 inside an
    /// update before clamping.
    pub weight: f32,
}

impl ConditionInstance {
    /// Copy a template into a live instance at the given severity.
    pub fn from_template(template: &ConditionTemplate, weight: f32) -> Self {
        Self {
            label: template.label.clone(),
            causal_type: template.causal_type,
            duration: template.duration,
            progression: template.progression,
            weight,
        }
    }
}
