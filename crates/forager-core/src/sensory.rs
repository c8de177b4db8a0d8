use core::fmt;
use core::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One symbolic sensory channel.
///
/// The set is closed: every `ActivationVector` carries exactly one value per variant, in
/// `SensorDimension::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SensorDimension {
    FoodAhead,
    LeafletJewelAhead,
    NonLeafletJewelAhead,
    CloseObjectAhead,
    HasCompletedLeaflet,
}

impl SensorDimension {
    pub const COUNT: usize = 5;

    pub const ALL: [SensorDimension; Self::COUNT] = [
        SensorDimension::FoodAhead,
        SensorDimension::LeafletJewelAhead,
        SensorDimension::NonLeafletJewelAhead,
        SensorDimension::CloseObjectAhead,
        SensorDimension::HasCompletedLeaflet,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SensorDimension::FoodAhead => "food_ahead",
            SensorDimension::LeafletJewelAhead => "leaflet_jewel_ahead",
            SensorDimension::NonLeafletJewelAhead => "non_leaflet_jewel_ahead",
            SensorDimension::CloseObjectAhead => "close_object_ahead",
            SensorDimension::HasCompletedLeaflet => "has_completed_leaflet",
        }
    }
}

impl fmt::Display for SensorDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Activation scalar in `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f64", into = "f64"))]
pub struct ActivationValue(f64);

impl ActivationValue {
    pub const MIN: ActivationValue = ActivationValue(0.0);
    pub const MAX: ActivationValue = ActivationValue(1.0);

    /// Clamp into `[MIN, MAX]`. NaN maps to `MIN`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn from_bool(on: bool) -> Self {
        if on {
            Self::MAX
        } else {
            Self::MIN
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_max(self) -> bool {
        self.0 == Self::MAX.0
    }

    pub fn is_min(self) -> bool {
        self.0 == Self::MIN.0
    }
}

impl From<f64> for ActivationValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<ActivationValue> for f64 {
    fn from(value: ActivationValue) -> Self {
        value.0
    }
}

impl Default for ActivationValue {
    fn default() -> Self {
        Self::MIN
    }
}

/// Immutable mapping from every declared dimension to one activation.
///
/// Equality and hashing compare raw bits, so two vectors are equal only when they are
/// bit-identical.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActivationVector {
    values: [ActivationValue; SensorDimension::COUNT],
}

impl ActivationVector {
    /// Every dimension at `MIN`.
    pub fn quiescent() -> Self {
        Self {
            values: [ActivationValue::MIN; SensorDimension::COUNT],
        }
    }

    pub fn builder() -> ActivationVectorBuilder {
        ActivationVectorBuilder {
            values: [ActivationValue::MIN; SensorDimension::COUNT],
        }
    }

    /// Build a binary vector from a closure over the declared dimensions.
    pub fn from_fn(mut f: impl FnMut(SensorDimension) -> bool) -> Self {
        let mut values = [ActivationValue::MIN; SensorDimension::COUNT];
        for dim in SensorDimension::ALL {
            values[dim.index()] = ActivationValue::from_bool(f(dim));
        }
        Self { values }
    }

    pub fn get(&self, dim: SensorDimension) -> ActivationValue {
        self.values[dim.index()]
    }

    pub fn is_max(&self, dim: SensorDimension) -> bool {
        self.get(dim).is_max()
    }

    pub fn is_min(&self, dim: SensorDimension) -> bool {
        self.get(dim).is_min()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorDimension, ActivationValue)> + '_ {
        SensorDimension::ALL
            .iter()
            .map(move |dim| (*dim, self.values[dim.index()]))
    }

    /// Dimensions currently at `MAX`, in declaration order.
    pub fn active(&self) -> Vec<SensorDimension> {
        self.iter()
            .filter(|(_, v)| v.is_max())
            .map(|(d, _)| d)
            .collect()
    }
}

impl PartialEq for ActivationVector {
    fn eq(&self, other: &Self) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| a.0.to_bits() == b.0.to_bits())
    }
}

impl Eq for ActivationVector {}

impl Hash for ActivationVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in &self.values {
            v.0.to_bits().hash(state);
        }
    }
}

impl fmt::Debug for ActivationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(d, v)| (d.name(), v.get())))
            .finish()
    }
}

impl Default for ActivationVector {
    fn default() -> Self {
        Self::quiescent()
    }
}

pub struct ActivationVectorBuilder {
    values: [ActivationValue; SensorDimension::COUNT],
}

impl ActivationVectorBuilder {
    pub fn set(mut self, dim: SensorDimension, value: ActivationValue) -> Self {
        self.values[dim.index()] = value;
        self
    }

    pub fn on(self, dim: SensorDimension) -> Self {
        self.set(dim, ActivationValue::MAX)
    }

    pub fn build(self) -> ActivationVector {
        ActivationVector {
            values: self.values,
        }
    }
}
