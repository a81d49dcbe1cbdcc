//! Tag-keyed constructors for conversation states.

use std::collections::HashMap;

use habitual_core::error::BotError;

use super::state::{ConversationState, StateArgs, StateTag};

type Constructor = Box<dyn Fn(StateArgs) -> Box<dyn ConversationState> + Send + Sync>;

/// Populated once at startup, read-only afterwards.
#[derive(Default)]
pub struct StateRegistry {
    constructors: HashMap<StateTag, Constructor>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the constructor for `tag`. A later registration replaces an
    /// earlier one.
    pub fn register<F>(&mut self, tag: StateTag, constructor: F)
    where
        F: Fn(StateArgs) -> Box<dyn ConversationState> + Send + Sync + 'static,
    {
        self.constructors.insert(tag, Box::new(constructor));
    }

    pub fn contains(&self, tag: StateTag) -> bool {
        self.constructors.contains_key(&tag)
    }

    /// Build a fresh state. Unregistered tags (including `End`) are a bug.
    pub fn create(
        &self,
        tag: StateTag,
        args: StateArgs,
    ) -> Result<Box<dyn ConversationState>, BotError> {
        let constructor = self
            .constructors
            .get(&tag)
            .ok_or_else(|| BotError::UnknownState(tag.to_string()))?;
        Ok(constructor(args))
    }
}
