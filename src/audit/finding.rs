use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::roles::AgentRole;
use crate::ai::Recovery;

/// One agent's answer: the mapping read from the backend, tagged with the
/// role that produced it.
///
/// Keys are whatever the backend returned; consumers read them leniently.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentFinding {
    pub role: AgentRole,
    document: Value,
    pub recovery: Recovery,
}

impl AgentFinding {
    pub fn new(role: AgentRole, document: Map<String, Value>, recovery: Recovery) -> Self {
        Self {
            role,
            document: Value::Object(document),
            recovery,
        }
    }

    /// Finding with no keys, as produced by an unreadable answer
    pub fn empty(role: AgentRole) -> Self {
        Self::new(role, Map::new(), Recovery::Empty)
    }

    /// Always an object
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.document.as_object().is_none_or(Map::is_empty)
    }

    /// Expected keys of this role that the backend left out
    pub fn missing_keys(&self) -> Vec<&'static str> {
        self.role
            .spec()
            .expected_keys
            .iter()
            .copied()
            .filter(|key| self.get(key).is_none())
            .collect()
    }

    pub fn is_degraded(&self) -> bool {
        self.recovery.is_degraded() || !self.missing_keys().is_empty()
    }
}

impl Serialize for AgentFinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}
