//! Fixed-rule action selection.
//!
//! Each cycle every registered rule computes a support from the activation vector; the selector
//! keeps the rules with positive support and resolves several candidates through the configured
//! policy. Fixed-priority resolution is stable by registration order for determinism.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod policy;
pub mod rules;

pub use policy::{
    ActionSelector, LevelMeasures, Selection, SelectionConfig, SelectionConfigError,
    SelectionPolicy, SELECTION_STREAM,
};
pub use rules::{standing_eligible, ActionRule, Eligibility, RuleSet, RuleSupport, SupportFn};
