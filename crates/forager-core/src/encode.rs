//! Reduce a raw snapshot into the fixed symbolic activation vector.

use core::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ActivationVector, Category, Leaflet, SensorDimension, Target, Thing, WorldSnapshot,
};

pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("snapshot has no self creature")]
    MissingSelf,
    #[error("creature {creature} has no primary leaflet")]
    MissingCollectionGoal { creature: String },
}

/// Which leaflets decide whether a jewel colour is still wanted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GoalScope {
    /// Only the first leaflet.
    #[default]
    Primary,
    /// Any of the creature's leaflets.
    AnyLeaflet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncoderConfig {
    /// Targets strictly nearer than this are "close".
    pub proximity_threshold: f64,
    pub goal_scope: GoalScope,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            goal_scope: GoalScope::Primary,
        }
    }
}

/// The agent's own pose, heading wrapped into `(-PI, PI]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfPose {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

/// Output of one encoding pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Perception {
    pub vector: ActivationVector,
    pub target: Option<Target>,
    pub pose: SelfPose,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureEncoder {
    config: EncoderConfig,
}

impl FeatureEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn encode(&self, snapshot: &WorldSnapshot) -> Result<Perception, EncodeError> {
        let me = snapshot.self_thing().ok_or(EncodeError::MissingSelf)?;
        let primary = me
            .leaflets
            .first()
            .ok_or_else(|| EncodeError::MissingCollectionGoal {
                creature: me.name.clone(),
            })?;

        let target = select_target(snapshot);

        let food_ahead = target.is_some_and(|t| t.category.is_food());
        let leaflet_jewel_ahead = target.is_some_and(|t| {
            t.category == Category::Jewel && self.wants_color(&t.color, &me.leaflets)
        });
        let non_leaflet_jewel_ahead =
            target.is_some_and(|t| t.category == Category::Jewel) && !leaflet_jewel_ahead;
        let close_object_ahead =
            target.is_some_and(|t| t.distance < self.config.proximity_threshold);
        let has_completed_leaflet = primary.is_complete();

        let vector = ActivationVector::from_fn(|dim| match dim {
            SensorDimension::FoodAhead => food_ahead,
            SensorDimension::LeafletJewelAhead => leaflet_jewel_ahead,
            SensorDimension::NonLeafletJewelAhead => non_leaflet_jewel_ahead,
            SensorDimension::CloseObjectAhead => close_object_ahead,
            SensorDimension::HasCompletedLeaflet => has_completed_leaflet,
        });

        Ok(Perception {
            vector,
            target: target.map(Target::from),
            pose: SelfPose {
                name: me.name.clone(),
                x: me.x,
                y: me.y,
                heading: wrap_heading(me.pitch.to_radians()),
            },
        })
    }

    fn wants_color(&self, color: &str, leaflets: &[Leaflet]) -> bool {
        match self.config.goal_scope {
            GoalScope::Primary => leaflets.first().is_some_and(|l| l.needs(color)),
            GoalScope::AnyLeaflet => leaflets.iter().any(|l| l.needs(color)),
        }
    }
}

/// Nearest object that is neither a creature nor a static obstacle.
///
/// Ties keep snapshot order.
pub fn select_target(snapshot: &WorldSnapshot) -> Option<&Thing> {
    snapshot
        .things
        .iter()
        .filter(|t| t.category != Category::Creature && !t.category.is_static())
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Wrap an angle in radians into `(-PI, PI]`.
pub fn wrap_heading(radians: f64) -> f64 {
    if !radians.is_finite() {
        return radians;
    }
    PI - (PI - radians).rem_euclid(2.0 * PI)
}
