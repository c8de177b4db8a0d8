//! Raw world data as reported by the world service.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Creature,
    Brick,
    PerishableFood,
    NonPerishableFood,
    Jewel,
    DeliverySpot,
}

impl Category {
    pub fn is_food(self) -> bool {
        matches!(self, Category::PerishableFood | Category::NonPerishableFood)
    }

    /// Static obstacles never become a target.
    pub fn is_static(self) -> bool {
        matches!(self, Category::Brick)
    }
}

/// Required and collected counts for one jewel colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeafletItem {
    pub required: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collected: u32,
}

/// A collection goal.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Leaflet {
    pub id: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: BTreeMap<String, LeafletItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub complete: bool,
}

impl Leaflet {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_item(mut self, color: impl Into<String>, required: u32, collected: u32) -> Self {
        self.items
            .insert(color.into(), LeafletItem { required, collected });
        self
    }

    pub fn with_complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    pub fn required(&self, color: &str) -> u32 {
        self.items.get(color).map_or(0, |i| i.required)
    }

    pub fn collected(&self, color: &str) -> u32 {
        self.items.get(color).map_or(0, |i| i.collected)
    }

    /// Whether another jewel of `color` still counts toward this goal.
    pub fn needs(&self, color: &str) -> bool {
        self.required(color) > self.collected(color)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// One perceivable object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Thing {
    pub name: String,
    pub category: Category,
    /// Centre of mass.
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: String,
    /// Heading in degrees. Meaningful for creatures only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pitch: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub leaflets: Vec<Leaflet>,
}

impl Thing {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            x: 0.0,
            y: 0.0,
            distance: 0.0,
            color: String::new(),
            pitch: 0.0,
            leaflets: Vec::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_pitch(mut self, degrees: f64) -> Self {
        self.pitch = degrees;
        self
    }

    pub fn with_leaflet(mut self, leaflet: Leaflet) -> Self {
        self.leaflets.push(leaflet);
        self
    }
}

/// Everything the agent can see at one instant, in world-service order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WorldSnapshot {
    pub things: Vec<Thing>,
}

impl WorldSnapshot {
    pub fn new(things: Vec<Thing>) -> Self {
        Self { things }
    }

    pub fn with(mut self, thing: Thing) -> Self {
        self.things.push(thing);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    /// The agent's own body: the first creature reported.
    pub fn self_thing(&self) -> Option<&Thing> {
        self.things.iter().find(|t| t.category == Category::Creature)
    }
}

/// Container contents, keyed by item kind (jewel colour or food category).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inventory {
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn count(&self, kind: &str) -> u32 {
        self.items.get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }
}
