//! Phase-ordered rule dispatch for the vigil rule engine.
//!
//! An [`EngineBuilder`] collects rule conditions into one shared expression graph,
//! grouped by context and phase. Building normalizes the graph once; the resulting
//! [`RuleEngine`] hands out [`Transaction`]s that evaluate the rules of each phase
//! incrementally as the host appends field data.
//!
//! ```rust,ignore
//! let mut builder = EngineBuilder::new(factory);
//! let agent = builder.field("user_agent")?;
//! let cond = builder.call("lower", &[agent])?;
//! builder.add_rule("main", "block-scanner", Phase::RequestHeader, cond, false)?;
//! let engine = builder.build(&mut Reporter::new())?;
//!
//! let mut tx = engine.transaction();
//! tx.append_field("user_agent", "sqlmap/1.7")?;
//! let outcomes = engine.run_phase(&mut tx, "main", Phase::RequestHeader)?;
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod phase;
pub mod rule;
pub mod transaction;

#[cfg(test)]
mod test;

pub use builder::EngineBuilder;
pub use config::EngineConfig;
pub use engine::RuleEngine;
pub use error::{Error, Result};
pub use field::{FIELD_CALL, FieldOperator, FieldStore};
pub use phase::Phase;
pub use rule::{Rule, RuleOutcome, RuleSet};
pub use transaction::Transaction;
