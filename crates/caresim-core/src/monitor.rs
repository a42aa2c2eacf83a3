//! Monitor runner - executes the declarative rule table against agent
//! status snapshots.
//!
//! Rules come from `caresim_logic::monitoring`; this module owns their
//! effects: stored journal entries and outbound messages.

use caresim_logic::condition::ConditionInstance;
use caresim_logic::monitoring::{default_rules, evaluate_rule, MonitorRule, RuleAction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One stored status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub agent: String,
    /// Simulation hour the entry was recorded.
    pub hour: f64,
    pub status: Vec<ConditionInstance>,
}

/// Sectioned store of journal entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    sections: HashMap<String, Vec<JournalEntry>>,
}

impl Journal {
    pub fn append(&mut self, section: &str, entry: JournalEntry) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .push(entry);
    }

    /// Entries stored under a section, oldest first.
    pub fn section(&self, name: &str) -> &[JournalEntry] {
        self.sections.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }
}

/// An outbound message produced by a monitoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub addressee: String,
    pub content: String,
    pub agent: String,
    pub hour: f64,
}

/// Executes monitoring rules and collects their effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorRunner {
    rules: Vec<MonitorRule>,
    pub journal: Journal,
    pub outbox: Vec<Message>,
}

impl MonitorRunner {
    pub fn new(rules: Vec<MonitorRule>) -> Self {
        Self {
            rules,
            journal: Journal::default(),
            outbox: Vec::new(),
        }
    }

    /// Runner with the built-in rule table: status logging plus the
    /// caregiver alert on dependency conditions.
    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    pub fn rules(&self) -> &[MonitorRule] {
        &self.rules
    }

    /// Run every rule against one agent's snapshot.
    ///
    /// `seed` drives the deterministic sampling; callers should vary it
    /// per pass (the engine derives it from simulation time).
    pub fn run(&mut self, agent: &str, status: &[ConditionInstance], hour: f64, seed: u32) {
        let mut stores: Vec<String> = Vec::new();
        let mut messages: Vec<Message> = Vec::new();

        for (index, rule) in self.rules.iter().enumerate() {
            let rule_seed = seed.wrapping_add(index as u32);
            match evaluate_rule(rule, status, rule_seed) {
                Some(RuleAction::Store { section }) => stores.push(section.clone()),
                Some(RuleAction::Message { addressee, content }) => {
                    messages.push(Message {
                        addressee: addressee.clone(),
                        content: content.clone(),
                        agent: agent.to_string(),
                        hour,
                    });
                }
                None => {}
            }
        }

        for section in stores {
            log::info!("{}: status stored to '{}'", agent, section);
            self.journal.append(
                &section,
                JournalEntry {
                    agent: agent.to_string(),
                    hour,
                    status: status.to_vec(),
                },
            );
        }
        for message in messages {
            log::info!(
                "{}: message to {} ({})",
                agent,
                message.addressee,
                message.content
            );
            self.outbox.push(message);
        }
    }
}
