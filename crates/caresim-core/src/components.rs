//! Agent components: identity and per-tick outcome queues.

use caresim_logic::causality::CausalType;
use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as a simulated agent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Agent;

/// Who the agent is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub birth_year: i32,
}

/// Outcomes accumulated for the agent's next assessment tick.
///
/// Hosts push the effects of actions and interventions here; the
/// assessment system also routes each tick's emerging events back in as
/// harmful outcomes for the following tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeQueue {
    positive: Vec<(CausalType, f32)>,
    negative: Vec<(CausalType, f32)>,
}

impl OutcomeQueue {
    /// Queue a beneficial outcome. Magnitudes for the same causal type
    /// accumulate into a single entry.
    pub fn push_positive(&mut self, ty: CausalType, magnitude: f32) {
        Self::push(&mut self.positive, ty, magnitude);
    }

    /// Queue a harmful outcome. Magnitudes for the same causal type
    /// accumulate into a single entry.
    pub fn push_negative(&mut self, ty: CausalType, magnitude: f32) {
        Self::push(&mut self.negative, ty, magnitude);
    }

    fn push(entries: &mut Vec<(CausalType, f32)>, ty: CausalType, magnitude: f32) {
        match entries.iter_mut().find(|(existing, _)| *existing == ty) {
            Some((_, total)) => *total += magnitude,
            None => entries.push((ty, magnitude)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    /// Take everything queued, leaving the queue empty.
    pub fn drain(&mut self) -> (Vec<(CausalType, f32)>, Vec<(CausalType, f32)>) {
        (
            std::mem::take(&mut self.positive),
            std::mem::take(&mut self.negative),
        )
    }
}
