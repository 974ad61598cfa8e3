//! Id synthesis for items added without an id

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of fresh item ids.
pub trait IdGenerator: fmt::Debug {
    fn next_id(&mut self) -> String;
}

impl IdGenerator for Box<dyn IdGenerator> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

/// Deterministic `<prefix><n>` ids, reproducible across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("item-")
    }
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn starting_at(mut self, next: u64) -> Self {
        self.next = next;
        self
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Configurable choice of generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Uuid,
}

impl IdStrategy {
    /// Build a generator; `prefix` only applies to sequential ids.
    pub fn generator(self, prefix: &str) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Sequential => Box::new(SequentialIdGenerator::new(prefix)),
            IdStrategy::Uuid => Box::new(UuidIdGenerator),
        }
    }
}

impl std::str::FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(IdStrategy::Sequential),
            "uuid" => Ok(IdStrategy::Uuid),
            other => Err(format!("unknown id strategy: {other}")),
        }
    }
}
