use std::collections::HashSet;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::input::InputState;
use crate::error::ConfigError;

pub const MOVE: &str = "Move";
pub const ATTACK: &str = "Attack";
pub const DEFEND: &str = "Defend";
pub const SKILL_1: &str = "Skill_1";
pub const SKILL_2: &str = "Skill_2";

const KEYBOARD_MOUSE: &str = "Keyboard&Mouse";
const GAMEPAD: &str = "Gamepad";
const JOYSTICK: &str = "Joystick";

/// Declarative description of player actions and the controls bound to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputActionAsset {
    pub name: String,
    #[serde(default)]
    pub maps: Vec<ActionMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMap {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<InputAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAction {
    pub name: String,
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_type: Option<ControlType>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Continuous value (sticks, composites).
    Value,
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Vector2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Binding {
    /// A single control.
    Path {
        path: String,
        #[serde(default)]
        groups: Vec<String>,
    },
    /// Four buttons folded into a 2D vector.
    Composite {
        up: String,
        down: String,
        left: String,
        right: String,
        #[serde(default)]
        groups: Vec<String>,
    },
    /// `button` only counts while `modifier` is held.
    Chord {
        modifier: String,
        button: String,
        #[serde(default)]
        groups: Vec<String>,
    },
}

impl Binding {
    fn path(path: &str, group: &str) -> Self {
        Binding::Path {
            path: path.to_string(),
            groups: vec![group.to_string()],
        }
    }

    fn composite(up: &str, down: &str, left: &str, right: &str) -> Self {
        Binding::Composite {
            up: up.to_string(),
            down: down.to_string(),
            left: left.to_string(),
            right: right.to_string(),
            groups: vec![KEYBOARD_MOUSE.to_string()],
        }
    }

    fn chord(modifier: &str, button: &str, group: &str) -> Self {
        Binding::Chord {
            modifier: modifier.to_string(),
            button: button.to_string(),
            groups: vec![group.to_string()],
        }
    }

    fn controls(&self) -> Vec<&str> {
        match self {
            Binding::Path { path, .. } => vec![path.as_str()],
            Binding::Composite {
                up,
                down,
                left,
                right,
                ..
            } => vec![up.as_str(), down.as_str(), left.as_str(), right.as_str()],
            Binding::Chord {
                modifier, button, ..
            } => vec![modifier.as_str(), button.as_str()],
        }
    }

    fn vector(&self, input: &InputState) -> Vec2 {
        let axis = |held: bool| if held { 1.0 } else { 0.0 };
        match self {
            Binding::Path { path, .. } => input.axis(path),
            Binding::Composite {
                up,
                down,
                left,
                right,
                ..
            } => Vec2::new(
                axis(input.is_held(right)) - axis(input.is_held(left)),
                axis(input.is_held(up)) - axis(input.is_held(down)),
            ),
            Binding::Chord { .. } => Vec2::ZERO,
        }
    }

    fn is_held(&self, input: &InputState, chorded: &HashSet<String>) -> bool {
        match self {
            Binding::Path { path, .. } => {
                !chorded.contains(&path.to_ascii_lowercase()) && input.is_held(path)
            }
            Binding::Composite { .. } => self.vector(input) != Vec2::ZERO,
            Binding::Chord {
                modifier, button, ..
            } => input.is_held(modifier) && input.is_held(button),
        }
    }

    fn just_pressed(&self, input: &InputState, chorded: &HashSet<String>) -> bool {
        match self {
            Binding::Path { path, .. } => {
                !chorded.contains(&path.to_ascii_lowercase()) && input.just_pressed(path)
            }
            Binding::Composite { .. } => false,
            Binding::Chord {
                modifier, button, ..
            } => input.is_held(modifier) && input.just_pressed(button),
        }
    }
}

impl InputActionAsset {
    /// The stock player controls: Move, Attack, Defend, Skill_1, Skill_2.
    pub fn default_player() -> Self {
        let actions = vec![
            InputAction {
                name: MOVE.to_string(),
                kind: ActionKind::Value,
                control_type: Some(ControlType::Vector2),
                bindings: vec![
                    Binding::composite("<Keyboard>/w", "<Keyboard>/s", "<Keyboard>/a", "<Keyboard>/d"),
                    Binding::composite(
                        "<Keyboard>/upArrow",
                        "<Keyboard>/downArrow",
                        "<Keyboard>/leftArrow",
                        "<Keyboard>/rightArrow",
                    ),
                    Binding::path("<Gamepad>/leftStick", GAMEPAD),
                    Binding::path("<Joystick>/stick", JOYSTICK),
                ],
            },
            InputAction {
                name: ATTACK.to_string(),
                kind: ActionKind::Button,
                control_type: None,
                bindings: vec![
                    Binding::path("<Keyboard>/j", KEYBOARD_MOUSE),
                    Binding::path("<Gamepad>/buttonWest", GAMEPAD),
                    Binding::path("<Joystick>/trigger", JOYSTICK),
                ],
            },
            InputAction {
                name: DEFEND.to_string(),
                kind: ActionKind::Button,
                control_type: None,
                bindings: vec![
                    Binding::path("<Keyboard>/k", KEYBOARD_MOUSE),
                    Binding::path("<Gamepad>/buttonEast", GAMEPAD),
                ],
            },
            InputAction {
                name: SKILL_1.to_string(),
                kind: ActionKind::Button,
                control_type: None,
                bindings: vec![
                    Binding::chord("<Keyboard>/shift", "<Keyboard>/j", KEYBOARD_MOUSE),
                    Binding::chord("<Gamepad>/leftShoulder", "<Gamepad>/buttonWest", GAMEPAD),
                ],
            },
            InputAction {
                name: SKILL_2.to_string(),
                kind: ActionKind::Button,
                control_type: None,
                bindings: vec![
                    Binding::chord("<Keyboard>/shift", "<Keyboard>/k", KEYBOARD_MOUSE),
                    Binding::chord("<Gamepad>/leftShoulder", "<Gamepad>/buttonEast", GAMEPAD),
                ],
            },
        ];

        Self {
            name: "PlayerControls".to_string(),
            maps: vec![ActionMap {
                name: "Player".to_string(),
                actions,
            }],
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let asset: InputActionAsset = toml::from_str(content)?;
        asset.validate()?;
        Ok(asset)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut map_names = HashSet::new();
        for map in &self.maps {
            if !map_names.insert(map.name.as_str()) {
                return Err(invalid(format!("action map '{}' declared twice", map.name)));
            }
            let mut action_names = HashSet::new();
            for action in &map.actions {
                if !action_names.insert(action.name.as_str()) {
                    return Err(invalid(format!(
                        "action '{}' declared twice in map '{}'",
                        action.name, map.name
                    )));
                }
                action.validate()?;
            }
        }
        Ok(())
    }

    /// First action with this name across all maps.
    pub fn action(&self, name: &str) -> Option<&InputAction> {
        self.maps
            .iter()
            .flat_map(|map| map.actions.iter())
            .find(|action| action.name == name)
    }

    /// Combined vector of every binding, clamped to unit length. Zero for
    /// unknown actions.
    pub fn read_vector(&self, name: &str, input: &InputState) -> Vec2 {
        self.action(name)
            .map(|action| {
                action
                    .bindings
                    .iter()
                    .map(|b| b.vector(input))
                    .sum::<Vec2>()
                    .clamp_length_max(1.0)
            })
            .unwrap_or(Vec2::ZERO)
    }

    #[allow(dead_code)]
    pub fn is_pressed(&self, name: &str, input: &InputState) -> bool {
        let chorded = self.chorded_buttons(input);
        self.action(name)
            .is_some_and(|action| action.bindings.iter().any(|b| b.is_held(input, &chorded)))
    }

    /// Pressed this frame and not the last.
    pub fn was_pressed(&self, name: &str, input: &InputState) -> bool {
        let chorded = self.chorded_buttons(input);
        self.action(name).is_some_and(|action| {
            action
                .bindings
                .iter()
                .any(|b| b.just_pressed(input, &chorded))
        })
    }

    /// Buttons of every chord whose modifier is held. Plain bindings on these
    /// buttons stay silent while the chord owns them.
    fn chorded_buttons(&self, input: &InputState) -> HashSet<String> {
        self.maps
            .iter()
            .flat_map(|map| map.actions.iter())
            .flat_map(|action| action.bindings.iter())
            .filter_map(|binding| match binding {
                Binding::Chord {
                    modifier, button, ..
                } if input.is_held(modifier) => Some(button.to_ascii_lowercase()),
                _ => None,
            })
            .collect()
    }
}

impl InputAction {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bindings.is_empty() {
            return Err(invalid(format!("action '{}' has no bindings", self.name)));
        }
        match self.kind {
            ActionKind::Value if self.control_type != Some(ControlType::Vector2) => {
                return Err(invalid(format!(
                    "value action '{}' needs control_type = \"vector2\"",
                    self.name
                )));
            }
            ActionKind::Button
                if self
                    .bindings
                    .iter()
                    .any(|b| matches!(b, Binding::Composite { .. })) =>
            {
                return Err(invalid(format!(
                    "button action '{}' cannot use a composite binding",
                    self.name
                )));
            }
            _ => {}
        }
        for binding in &self.bindings {
            if let Some(bad) = binding.controls().into_iter().find(|c| !c.starts_with('<')) {
                return Err(invalid(format!(
                    "action '{}' binds malformed control path '{}'",
                    self.name, bad
                )));
            }
            if let Binding::Chord {
                modifier, button, ..
            } = binding
            {
                if modifier.eq_ignore_ascii_case(button) {
                    return Err(invalid(format!(
                        "action '{}' chords '{}' with itself",
                        self.name, button
                    )));
                }
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
