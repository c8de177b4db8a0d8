//! Deterministic, engine-agnostic perception and action primitives for the forager agent.
//!
//! Everything here is pure: a `WorldSnapshot` goes in, an `ActivationVector` and optional
//! `Target` come out, and `ActionId`s turn into gateway `Command`s.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod cycle;
pub mod encode;
pub mod rng;
pub mod sensory;
pub mod snapshot;

pub use action::{ActionId, Command, DispatchParams, Target};
pub use cycle::CycleContext;
pub use encode::{
    EncodeError, EncoderConfig, FeatureEncoder, GoalScope, Perception, SelfPose,
    DEFAULT_PROXIMITY_THRESHOLD,
};
pub use rng::{DeterministicRng, SplitMix64};
pub use sensory::{ActivationValue, ActivationVector, ActivationVectorBuilder, SensorDimension};
pub use snapshot::{Category, Inventory, Leaflet, LeafletItem, Thing, WorldSnapshot};
