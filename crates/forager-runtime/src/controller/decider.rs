//! Decider - the pure encode/evaluate/select pipeline.

use std::sync::Arc;

use forager_core::{CycleContext, EncodeError, FeatureEncoder, Perception, WorldSnapshot};
use forager_utility::{ActionSelector, RuleSet, Selection};

use crate::config::AgentConfig;

/// Result of one decision pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub perception: Perception,
    pub selection: Option<Selection>,
}

/// Immutable aggregate of encoder, rules and selector. Shared by reference with the loop task.
#[derive(Debug, Clone)]
pub struct Decider {
    encoder: FeatureEncoder,
    rules: Arc<RuleSet>,
    selector: ActionSelector,
}

impl Decider {
    pub fn new(encoder: FeatureEncoder, rules: RuleSet, selector: ActionSelector) -> Self {
        Self {
            encoder,
            rules: Arc::new(rules),
            selector,
        }
    }

    /// Standing rule table with encoder and selector taken from `config`.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            FeatureEncoder::new(config.encoder),
            RuleSet::standing(),
            ActionSelector::new(config.selection.clone()),
        )
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn selector(&self) -> &ActionSelector {
        &self.selector
    }

    pub fn decide(
        &self,
        snapshot: &WorldSnapshot,
        ctx: &CycleContext,
    ) -> Result<Decision, EncodeError> {
        let perception = self.encoder.encode(snapshot)?;
        let selection = self.selector.select(&self.rules, &perception.vector, ctx);
        Ok(Decision {
            perception,
            selection,
        })
    }
}
