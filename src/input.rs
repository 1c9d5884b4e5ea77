//! Keyboard bindings and held-key tracking
//!
//! Keys are identified by their lowercased `KeyboardEvent.key` value
//! (`"arrowup"`, `"w"`, ...). The driver feeds key presses in as they happen
//! and takes one [`TickInput`] snapshot per frame.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::sim::{Directions, PlayerSlot, TickInput};

/// Keys that restart from an end screen
pub const RESTART_KEYS: [&str; 2] = ["f5", "r"];

/// A named movement control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::Up, Control::Down, Control::Left, Control::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Up => "up",
            Control::Down => "down",
            Control::Left => "left",
            Control::Right => "right",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Control {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Control::Up),
            "down" => Ok(Control::Down),
            "left" => Ok(Control::Left),
            "right" => Ok(Control::Right),
            _ => Err(Error::UnknownControl(s.to_string())),
        }
    }
}

/// One player's keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    up: String,
    down: String,
    left: String,
    right: String,
}

impl KeyBindings {
    /// Bind four keys; they must be non-empty and distinct (case-insensitive)
    pub fn new(up: &str, down: &str, left: &str, right: &str) -> Result<Self> {
        let bindings = Self {
            up: up.to_lowercase(),
            down: down.to_lowercase(),
            left: left.to_lowercase(),
            right: right.to_lowercase(),
        };

        let mut seen = HashSet::new();
        for control in Control::ALL {
            let key = bindings.key(control);
            if key.is_empty() {
                return Err(Error::EmptyBinding(control));
            }
            if !seen.insert(key) {
                return Err(Error::DuplicateBinding(key.to_string()));
            }
        }
        Ok(bindings)
    }

    /// Build from a control-name → key map, e.g. `{"up": "w", ...}`
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let mut keys: [Option<&str>; 4] = [None; 4];
        for (name, key) in map {
            let control: Control = name.parse()?;
            keys[control as usize] = Some(key.as_str());
        }
        let key = |control: Control| keys[control as usize].ok_or(Error::EmptyBinding(control));
        Self::new(
            key(Control::Up)?,
            key(Control::Down)?,
            key(Control::Left)?,
            key(Control::Right)?,
        )
    }

    /// Player one default
    pub fn arrows() -> Self {
        Self {
            up: "arrowup".into(),
            down: "arrowdown".into(),
            left: "arrowleft".into(),
            right: "arrowright".into(),
        }
    }

    /// Player two default
    pub fn wasd() -> Self {
        Self {
            up: "w".into(),
            down: "s".into(),
            left: "a".into(),
            right: "d".into(),
        }
    }

    pub fn key(&self, control: Control) -> &str {
        match control {
            Control::Up => &self.up,
            Control::Down => &self.down,
            Control::Left => &self.left,
            Control::Right => &self.right,
        }
    }

    /// Which control a (lowercased) key drives, if any
    pub fn control_for(&self, key: &str) -> Option<Control> {
        Control::ALL.into_iter().find(|&c| self.key(c) == key)
    }

    /// Back to a control-name → key map
    pub fn to_map(&self) -> BTreeMap<String, String> {
        Control::ALL
            .into_iter()
            .map(|c| (c.as_str().to_string(), self.key(c).to_string()))
            .collect()
    }

    fn directions(&self, held: &HashSet<String>) -> Directions {
        Directions {
            up: held.contains(&self.up),
            down: held.contains(&self.down),
            left: held.contains(&self.left),
            right: held.contains(&self.right),
        }
    }
}

/// Both players' bindings plus the keys currently held down
#[derive(Debug, Clone)]
pub struct Controls {
    bindings: [KeyBindings; 2],
    held: HashSet<String>,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            bindings: [KeyBindings::arrows(), KeyBindings::wasd()],
            held: HashSet::new(),
        }
    }
}

impl Controls {
    /// Bindings must not share keys between players
    pub fn new(one: KeyBindings, two: KeyBindings) -> Result<Self> {
        for control in Control::ALL {
            let key = one.key(control);
            if two.control_for(key).is_some() {
                return Err(Error::DuplicateBinding(key.to_string()));
            }
        }
        Ok(Self {
            bindings: [one, two],
            held: HashSet::new(),
        })
    }

    pub fn bindings(&self, slot: PlayerSlot) -> &KeyBindings {
        &self.bindings[slot.index()]
    }

    /// Record a keydown
    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    /// Record a keyup
    pub fn release(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    /// Forget every held key
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&key.to_lowercase())
    }

    /// True if `key` restarts from an end screen
    pub fn is_restart_key(key: &str) -> bool {
        let key = key.to_lowercase();
        RESTART_KEYS.contains(&key.as_str())
    }

    /// True if `key` is a movement key for either player
    pub fn is_bound(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.bindings.iter().any(|b| b.control_for(&key).is_some())
    }

    /// Held directions for both players right now
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            players: [
                self.bindings[0].directions(&self.held),
                self.bindings[1].directions(&self.held),
            ],
        }
    }
}
