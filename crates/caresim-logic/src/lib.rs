//! Pure condition state-machine logic for CareSim.
//!
//! This crate contains all condition-model logic that is independent of any
//! engine, database, or runtime. Functions take plain data and return
//! results, making them unit-testable and portable across the native
//! engine, headless harnesses, and any future host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`assessment`] | Per-tick severity updates, overflow and escalation |
//! | [`catalog`] | Read-only registry of condition templates |
//! | [`causality`] | Causal types and normalized outcome collections |
//! | [`chart`] | Per-agent active condition set and the clock capability |
//! | [`condition`] | Duration classes and live condition instances |
//! | [`monitoring`] | Declarative status-monitoring rule table |
//! | [`progression`] | Natural-progression drift models |

pub mod assessment;
pub mod catalog;
pub mod causality;
pub mod chart;
pub mod condition;
pub mod monitoring;
pub mod progression;
