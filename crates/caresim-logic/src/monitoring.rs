//! Declarative status-monitoring rule table.
//!
//! A monitor is an external observer — a wearable, a log sink, a
//! caregiver channel — that watches agent status snapshots and reacts.
//! Rules are data: a sampled test over the snapshot plus the action to
//! perform on match. The chart only promises a stable snapshot shape;
//! rules consume it, and nothing flows back into the state machine.
//!
//! Sampling is deterministic: a rule decides whether to fire from an
//! integer seed, so the same snapshot with the same seed always produces
//! the same actions.

use crate::condition::ConditionInstance;
use serde::{Deserialize, Serialize};

/// Snapshot field a rule test reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleField {
    Label,
    CausalType,
    Duration,
    Weight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Gt,
    Lt,
}

/// Comparison target for a rule test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleValue {
    Number(f32),
    Text(String),
}

/// Predicate half of a rule.
///
/// An empty test (no field) matches every snapshot; otherwise the test
/// matches when any condition in the snapshot satisfies the
/// field/operator/value triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTest {
    /// Fraction of monitoring passes where this test is even evaluated.
    pub rate: f32,
    pub field: Option<RuleField>,
    pub operator: Option<Operator>,
    pub value: Option<RuleValue>,
}

impl RuleTest {
    /// Unconditional test, evaluated on every pass.
    pub fn always() -> Self {
        Self {
            rate: 1.0,
            field: None,
            operator: None,
            value: None,
        }
    }

    /// Whether the snapshot satisfies this test.
    pub fn matches(&self, snapshot: &[ConditionInstance]) -> bool {
        let (field, operator, value) = match (self.field, self.operator, &self.value) {
            (Some(field), Some(operator), Some(value)) => (field, operator, value),
            _ => return true,
        };
        snapshot
            .iter()
            .any(|condition| check(condition, field, operator, value))
    }
}

fn check(
    condition: &ConditionInstance,
    field: RuleField,
    operator: Operator,
    value: &RuleValue,
) -> bool {
    match field {
        RuleField::Weight => {
            let target = match value {
                RuleValue::Number(target) => *target,
                RuleValue::Text(_) => return false,
            };
            match operator {
                Operator::Eq => (condition.weight - target).abs() < f32::EPSILON,
                Operator::Gt => condition.weight > target,
                Operator::Lt => condition.weight < target,
            }
        }
        RuleField::Label | RuleField::CausalType | RuleField::Duration => {
            let text = match value {
                RuleValue::Text(text) => text.as_str(),
                RuleValue::Number(_) => return false,
            };
            // Ordering comparisons have no meaning for text fields.
            if operator != Operator::Eq {
                return false;
            }
            match field {
                RuleField::Label => condition.label == text,
                RuleField::CausalType => condition.causal_type.as_str() == text,
                RuleField::Duration => condition.duration.as_str() == text,
                RuleField::Weight => false,
            }
        }
    }
}

/// Action performed when a rule matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Append the status snapshot to a journal section.
    Store { section: String },
    /// Send a payload to an addressee.
    Message { addressee: String, content: String },
}

/// One monitoring rule: a sampled test plus the action it triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRule {
    pub label: String,
    /// Fraction of monitoring passes where this rule runs at all.
    pub rate: f32,
    pub test: RuleTest,
    pub action: RuleAction,
}

/// The default rule table: an unconditional status log plus a caregiver
/// alert when a dependency condition is present.
pub fn default_rules() -> Vec<MonitorRule> {
    vec![
        MonitorRule {
            label: "log".to_string(),
            rate: 1.0,
            test: RuleTest::always(),
            action: RuleAction::Store {
                section: "logs".to_string(),
            },
        },
        MonitorRule {
            label: "social monitoring".to_string(),
            rate: 1.0,
            test: RuleTest {
                rate: 0.05,
                field: Some(RuleField::CausalType),
                operator: Some(Operator::Eq),
                value: Some(RuleValue::Text("dependent".to_string())),
            },
            action: RuleAction::Message {
                addressee: "nurse".to_string(),
                content: "dependent".to_string(),
            },
        },
    ]
}

/// Deterministic sampling roll: true when a pass at `rate` fires for
/// this seed.
fn sample(rate: f32, seed: u32) -> bool {
    if rate >= 1.0 {
        return true;
    }
    if rate <= 0.0 {
        return false;
    }
    // Knuth multiplicative hash for repeatable noise.
    let hash = seed.wrapping_mul(2654435761);
    let roll = ((hash >> 8) % 10_000) as f32 / 10_000.0;
    roll < rate
}

/// Evaluate one rule against a snapshot.
///
/// Returns the action to perform, or `None` when the rule was not
/// sampled this pass or its test did not match.
pub fn evaluate_rule<'a>(
    rule: &'a MonitorRule,
    snapshot: &[ConditionInstance],
    seed: u32,
) -> Option<&'a RuleAction> {
    if !sample(rule.rate, seed) {
        return None;
    }
    if !sample(rule.test.rate, seed.wrapping_mul(31).wrapping_add(17)) {
        return None;
    }
    if !rule.test.matches(snapshot) {
        return None;
    }
    Some(&rule.action)
}
