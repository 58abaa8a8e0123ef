use serde_json::Value;

use crate::{
    BundleResult, EntryOptions,
    foundation::{error::EntityKind, ids::validate_id},
};

/// Behavioral state-machine document. Never interpreted, only packaged and reference-checked.
#[derive(Clone, Debug, PartialEq)]
pub struct StateMachine {
    id: String,
    data: Value,
    options: EntryOptions,
}

impl StateMachine {
    /// State machine from its document. Schema validation happens when it is added to a bundle.
    pub fn new(id: impl Into<String>, data: Value) -> BundleResult<Self> {
        let id = id.into();
        validate_id(EntityKind::StateMachine, &id)?;
        Ok(Self {
            id,
            data,
            options: EntryOptions::default(),
        })
    }

    /// Per-entry compression for the state-machine JSON.
    pub fn with_options(mut self, options: EntryOptions) -> BundleResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// State machine id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Compression settings.
    pub fn options(&self) -> EntryOptions {
        self.options
    }

    /// Animation ids referenced by `states[].animation`, in document order.
    pub fn animation_refs(&self) -> Vec<&str> {
        self.data
            .get("states")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|state| state.get("animation").and_then(Value::as_str))
            .filter(|id| !id.is_empty())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/state_machine.rs"]
mod tests;
