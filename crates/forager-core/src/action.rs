use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Category, Thing};

/// Candidate external actions. "No action" is expressed as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionId {
    Rotate,
    GoAhead,
    Eat,
    Sack,
    Hide,
    Stop,
}

impl ActionId {
    pub const ALL: [ActionId; 6] = [
        ActionId::Rotate,
        ActionId::GoAhead,
        ActionId::Eat,
        ActionId::Sack,
        ActionId::Hide,
        ActionId::Stop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionId::Rotate => "rotate",
            ActionId::GoAhead => "go_ahead",
            ActionId::Eat => "eat",
            ActionId::Sack => "sack",
            ActionId::Hide => "hide",
            ActionId::Stop => "stop",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "rotate" | "rotate_clockwise" => Some(ActionId::Rotate),
            "go_ahead" | "goahead" => Some(ActionId::GoAhead),
            "eat" => Some(ActionId::Eat),
            "sack" => Some(ActionId::Sack),
            "hide" => Some(ActionId::Hide),
            "stop" => Some(ActionId::Stop),
            _ => None,
        }
    }

    /// Whether dispatch parameters come from the current target.
    pub fn requires_target(self) -> bool {
        matches!(
            self,
            ActionId::GoAhead | ActionId::Eat | ActionId::Sack | ActionId::Hide
        )
    }

    /// Translate into a gateway command.
    ///
    /// Returns `None` when the action needs a target and there is none.
    pub fn command(self, target: Option<&Target>, params: &DispatchParams) -> Option<Command> {
        let command = match self {
            ActionId::Rotate => Command::SetHeading {
                right_wheel: params.rotate_right_wheel,
                left_wheel: params.rotate_left_wheel,
                speed: params.rotate_speed,
            },
            ActionId::Stop => Command::Halt,
            ActionId::GoAhead => {
                let target = target?;
                Command::SetDestination {
                    right_wheel: params.move_right_wheel,
                    left_wheel: params.move_left_wheel,
                    x: target.x,
                    y: target.y,
                }
            }
            ActionId::Eat => Command::Consume {
                object: target?.name.clone(),
            },
            ActionId::Sack => Command::PickUp {
                object: target?.name.clone(),
            },
            ActionId::Hide => Command::Conceal {
                object: target?.name.clone(),
            },
        };
        Some(command)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The single most relevant object this cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Target {
    pub name: String,
    pub category: Category,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub distance: f64,
}

impl From<&Thing> for Target {
    fn from(thing: &Thing) -> Self {
        Self {
            name: thing.name.clone(),
            category: thing.category,
            color: thing.color.clone(),
            x: thing.x,
            y: thing.y,
            distance: thing.distance,
        }
    }
}

/// Motor parameters used when turning actions into commands.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchParams {
    pub rotate_right_wheel: f64,
    pub rotate_left_wheel: f64,
    pub rotate_speed: f64,
    pub move_right_wheel: f64,
    pub move_left_wheel: f64,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            rotate_right_wheel: 2.0,
            rotate_left_wheel: -2.0,
            rotate_speed: 2.0,
            move_right_wheel: 1.0,
            move_left_wheel: 1.0,
        }
    }
}

/// A gateway call, minus the agent identity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Command {
    SetHeading {
        right_wheel: f64,
        left_wheel: f64,
        speed: f64,
    },
    SetDestination {
        right_wheel: f64,
        left_wheel: f64,
        x: f64,
        y: f64,
    },
    PickUp {
        object: String,
    },
    Consume {
        object: String,
    },
    Conceal {
        object: String,
    },
    Halt,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetHeading { .. } => "set_heading",
            Command::SetDestination { .. } => "set_destination",
            Command::PickUp { .. } => "pick_up",
            Command::Consume { .. } => "consume",
            Command::Conceal { .. } => "conceal",
            Command::Halt => "halt",
        }
    }
}
