use std::fmt;

use serde::{Deserialize, Serialize};

use fruitquest_core::events::CollectibleId;
use fruitquest_core::input::InputSnapshot;
use fruitquest_level::collectibles::ObjectEntry;

/// What the scripted player does during one second of the countdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptStep {
    /// Seconds since the level started, counted from 0.
    pub second: u32,
    pub input: InputSnapshot,
    /// Collectibles the player touches during this second.
    pub collect: Vec<CollectibleId>,
}

/// A recorded or hand-written play-through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    /// Fruit placement. When empty the level's map object layer is used.
    pub fruit: Vec<ObjectEntry>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug)]
pub enum ScriptError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(e) => write!(f, "cannot read script: {e}"),
            ScriptError::Parse(e) => write!(f, "invalid script: {e}"),
        }
    }
}

impl std::error::Error for ScriptError {}

impl ReplayScript {
    pub fn parse(content: &str) -> Result<Self, ScriptError> {
        toml::from_str(content).map_err(ScriptError::Parse)
    }

    pub fn load(path: &str) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(ScriptError::Io)?;
        Self::parse(&content)
    }

    /// Steps scheduled for the given second, in file order.
    pub fn steps_at(&self, second: u32) -> impl Iterator<Item = &ScriptStep> {
        self.steps.iter().filter(move |s| s.second == second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_script() {
        let script = ReplayScript::parse(
            r#"
[[fruit]]
x = 96.0
y = 320.0
width = 16.0
height = 16.0

[[steps]]
second = 0
input = { right = true }
collect = [0]

[[steps]]
second = 4
input = { up = true, left = true }
"#,
        )
        .unwrap();
        assert_eq!(script.fruit.len(), 1);
        assert_eq!(script.steps.len(), 2);
        assert!(script.steps[0].input.right);
        assert_eq!(script.steps[0].collect, vec![0]);
        assert!(script.steps[1].collect.is_empty());
        assert_eq!(script.steps_at(4).count(), 1);
        assert_eq!(script.steps_at(2).count(), 0);
    }

    #[test]
    fn empty_script_is_valid() {
        let script = ReplayScript::parse("").unwrap();
        assert_eq!(script, ReplayScript::default());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(matches!(
            ReplayScript::parse("steps = 3"),
            Err(ScriptError::Parse(_))
        ));
    }
}
