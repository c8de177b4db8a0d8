use forager_core::{ActionId, ActivationValue, ActivationVector, SensorDimension};

/// Pure support function over an activation vector. Result is clamped into `[0, 1]`.
pub type SupportFn = fn(&ActivationVector) -> f64;

/// How a rule computes its support.
#[derive(Clone, Copy)]
pub enum Eligibility {
    /// Entry of the standing rule table for this action.
    Standing(ActionId),
    Custom(SupportFn),
}

impl Eligibility {
    pub fn support(&self, vector: &ActivationVector) -> f64 {
        let raw = match self {
            Eligibility::Standing(action) => {
                if standing_eligible(*action, vector) {
                    1.0
                } else {
                    0.0
                }
            }
            Eligibility::Custom(f) => f(vector),
        };
        ActivationValue::new(raw).get()
    }
}

impl core::fmt::Debug for Eligibility {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Eligibility::Standing(action) => f.debug_tuple("Standing").field(action).finish(),
            Eligibility::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The standing eligibility table.
///
/// `GoAhead` reads `food || leaflet_jewel || (non_leaflet_jewel && !close)`: the close-object test
/// gates only the last disjunct, so a close food or leaflet jewel keeps `GoAhead` eligible.
pub fn standing_eligible(action: ActionId, v: &ActivationVector) -> bool {
    use SensorDimension::*;

    match action {
        ActionId::Rotate => {
            v.is_min(CloseObjectAhead)
                && v.is_min(FoodAhead)
                && v.is_min(LeafletJewelAhead)
                && v.is_min(NonLeafletJewelAhead)
        }
        ActionId::GoAhead => {
            v.is_max(FoodAhead)
                || v.is_max(LeafletJewelAhead)
                || (v.is_max(NonLeafletJewelAhead) && v.is_min(CloseObjectAhead))
        }
        ActionId::Eat => v.is_max(FoodAhead) && v.is_max(CloseObjectAhead),
        ActionId::Sack => v.is_max(LeafletJewelAhead) && v.is_max(CloseObjectAhead),
        ActionId::Hide => v.is_max(NonLeafletJewelAhead) && v.is_max(CloseObjectAhead),
        ActionId::Stop => v.is_max(HasCompletedLeaflet),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActionRule {
    pub action: ActionId,
    pub eligibility: Eligibility,
}

impl ActionRule {
    pub fn standing(action: ActionId) -> Self {
        Self {
            action,
            eligibility: Eligibility::Standing(action),
        }
    }

    pub fn custom(action: ActionId, support: SupportFn) -> Self {
        Self {
            action,
            eligibility: Eligibility::Custom(support),
        }
    }

    pub fn support(&self, vector: &ActivationVector) -> f64 {
        self.eligibility.support(vector)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleSupport {
    pub action: ActionId,
    pub support: f64,
}

impl RuleSupport {
    pub fn is_eligible(&self) -> bool {
        self.support > 0.0
    }
}

/// Ordered, immutable rule collection. Registration order is priority order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ActionRule>,
}

impl RuleSet {
    /// Fixed-priority order of the standing table.
    pub const STANDING_ORDER: [ActionId; 6] = [
        ActionId::Stop,
        ActionId::Eat,
        ActionId::Sack,
        ActionId::Hide,
        ActionId::GoAhead,
        ActionId::Rotate,
    ];

    pub fn new(rules: Vec<ActionRule>) -> Self {
        Self { rules }
    }

    pub fn standing() -> Self {
        Self::new(
            Self::STANDING_ORDER
                .iter()
                .map(|a| ActionRule::standing(*a))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[ActionRule] {
        &self.rules
    }

    /// Support of every rule, in registration order.
    pub fn evaluate(&self, vector: &ActivationVector) -> Vec<RuleSupport> {
        self.rules
            .iter()
            .map(|r| RuleSupport {
                action: r.action,
                support: r.support(vector),
            })
            .collect()
    }

    pub fn eligible(&self, vector: &ActivationVector) -> Vec<RuleSupport> {
        self.evaluate(vector)
            .into_iter()
            .filter(RuleSupport::is_eligible)
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standing()
    }
}
