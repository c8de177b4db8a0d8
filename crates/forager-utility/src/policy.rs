use std::collections::BTreeMap;

use forager_core::{ActionId, ActivationVector, CycleContext, DeterministicRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{RuleSet, RuleSupport};

/// RNG stream used for stochastic selection.
pub const SELECTION_STREAM: u64 = 0x5E1E_C700_0000_0001;

/// How ties between several eligible rules are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionPolicy {
    /// First registered eligible rule wins.
    #[default]
    FixedPriority,
    /// Sample among eligible rules, weighted by `support * weight`.
    Stochastic,
}

/// Relative weight of each decision level.
///
/// Only the fixed-rule level exists here. The remaining levels are kept as knobs so a
/// configuration can state them explicitly; they must stay at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelMeasures {
    pub fixed_rule: f64,
    pub implicit_rule: f64,
    pub bottom_level: f64,
    pub refined_rule: f64,
}

impl Default for LevelMeasures {
    fn default() -> Self {
        Self {
            fixed_rule: 1.0,
            implicit_rule: 0.0,
            bottom_level: 0.0,
            refined_rule: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelectionConfig {
    pub policy: SelectionPolicy,
    /// Per-action sampling weight for `Stochastic`. Missing entries weigh 1.
    pub weights: BTreeMap<ActionId, f64>,
    pub levels: LevelMeasures,
    /// Online rule refinement. Not supported; must be `false`.
    pub rule_refinement: bool,
    pub seed: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::FixedPriority,
            weights: BTreeMap::new(),
            levels: LevelMeasures::default(),
            rule_refinement: false,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionConfigError {
    #[error("rule refinement is not supported")]
    RefinementEnabled,
    #[error("fixed-rule level measure must be positive, got {0}")]
    FixedLevelDisabled(f64),
    #[error("level {level} has no rules; its measure must be 0, got {measure}")]
    UnsupportedLevel { level: &'static str, measure: f64 },
    #[error("weight for {action} must be a finite non-negative number, got {weight}")]
    InvalidWeight { action: ActionId, weight: f64 },
}

impl SelectionConfig {
    pub fn stochastic(seed: u64) -> Self {
        Self {
            policy: SelectionPolicy::Stochastic,
            seed,
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, action: ActionId, weight: f64) -> Self {
        self.weights.insert(action, weight);
        self
    }

    pub fn weight(&self, action: ActionId) -> f64 {
        self.weights.get(&action).copied().unwrap_or(1.0)
    }

    pub fn validate(&self) -> Result<(), SelectionConfigError> {
        if self.rule_refinement {
            return Err(SelectionConfigError::RefinementEnabled);
        }
        let levels = &self.levels;
        if !(levels.fixed_rule > 0.0) {
            return Err(SelectionConfigError::FixedLevelDisabled(levels.fixed_rule));
        }
        for (level, measure) in [
            ("implicit_rule", levels.implicit_rule),
            ("bottom_level", levels.bottom_level),
            ("refined_rule", levels.refined_rule),
        ] {
            if measure != 0.0 {
                return Err(SelectionConfigError::UnsupportedLevel { level, measure });
            }
        }
        for (action, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(SelectionConfigError::InvalidWeight {
                    action: *action,
                    weight: *weight,
                });
            }
        }
        Ok(())
    }
}

/// Outcome of one selection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub action: ActionId,
    pub support: f64,
    /// Every eligible action, in registration order.
    pub eligible: Vec<ActionId>,
}

/// Picks at most one action per cycle from a rule set.
#[derive(Debug, Clone, Default)]
pub struct ActionSelector {
    config: SelectionConfig,
}

impl ActionSelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Returns `None` when no rule has positive support.
    pub fn select(
        &self,
        rules: &RuleSet,
        vector: &ActivationVector,
        ctx: &CycleContext,
    ) -> Option<Selection> {
        let eligible = rules.eligible(vector);
        let chosen = match eligible.as_slice() {
            [] => return None,
            [only] => *only,
            [first, ..] => match self.config.policy {
                SelectionPolicy::FixedPriority => *first,
                SelectionPolicy::Stochastic => self.sample(&eligible, ctx).unwrap_or(*first),
            },
        };

        Some(Selection {
            action: chosen.action,
            support: chosen.support,
            eligible: eligible.iter().map(|r| r.action).collect(),
        })
    }

    fn sample(&self, eligible: &[RuleSupport], ctx: &CycleContext) -> Option<RuleSupport> {
        let weighted: Vec<(RuleSupport, f64)> = eligible
            .iter()
            .map(|r| (*r, r.support * self.config.weight(r.action)))
            .collect();
        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        if !(total > 0.0) {
            return None;
        }

        let mut rng = ctx.rng(SELECTION_STREAM);
        let mut pick = rng.next_f64_unit() * total;
        for (rule, w) in &weighted {
            if *w <= 0.0 {
                continue;
            }
            if pick < *w {
                return Some(*rule);
            }
            pick -= w;
        }
        // Rounding can leave `pick` just past the last bucket.
        weighted.iter().rev().find(|(_, w)| *w > 0.0).map(|(r, _)| *r)
    }
}
