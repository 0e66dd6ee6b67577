use std::{error::Error, fmt, str::FromStr};

use shoal_core::{Direction, InputError};

/// Separates entries inside a script.
const ENTRY_DELIMITER: char = ',';
/// Separates the tick index from the key inside an entry.
const FIELD_DELIMITER: char = ':';
/// Key token that releases the held direction.
const RELEASE_TOKEN: &str = "-";

/// Input change applied at a scripted tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScriptAction {
    /// Holds the provided direction.
    Press(Direction),
    /// Releases whatever direction is held.
    Release,
}

/// Key presses and releases scheduled by tick index, e.g. `0:right,40:-`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct InputScript {
    entries: Vec<(u64, ScriptAction)>,
}

impl InputScript {
    /// Parses the textual script representation.
    pub(crate) fn parse(value: &str) -> Result<Self, ScriptError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut entries = Vec::new();
        for entry in trimmed.split(ENTRY_DELIMITER) {
            let entry = entry.trim();
            let (tick, key) = entry
                .split_once(FIELD_DELIMITER)
                .ok_or_else(|| ScriptError::MissingKey(entry.to_owned()))?;
            let tick = tick
                .trim()
                .parse::<u64>()
                .map_err(|_| ScriptError::InvalidTick(entry.to_owned()))?;
            let key = key.trim();
            let action = if key == RELEASE_TOKEN {
                ScriptAction::Release
            } else {
                ScriptAction::Press(Direction::from_key(key).map_err(ScriptError::UnknownKey)?)
            };
            entries.push((tick, action));
        }

        entries.sort_by_key(|(tick, _)| *tick);
        Ok(Self { entries })
    }

    /// Actions scheduled for the provided tick, in script order.
    pub(crate) fn actions_at(&self, tick: u64) -> impl Iterator<Item = ScriptAction> + '_ {
        self.entries
            .iter()
            .filter(move |(scheduled, _)| *scheduled == tick)
            .map(|(_, action)| *action)
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Errors that can occur while parsing an input script.
#[derive(Debug)]
pub(crate) enum ScriptError {
    /// An entry had no `tick:key` separator.
    MissingKey(String),
    /// The tick index of an entry was not a non-negative integer.
    InvalidTick(String),
    /// The key of an entry does not map onto a direction.
    UnknownKey(InputError),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey(entry) => write!(f, "script entry '{entry}' is missing a key"),
            Self::InvalidTick(entry) => {
                write!(f, "script entry '{entry}' has an invalid tick index")
            }
            Self::UnknownKey(error) => write!(f, "script entry uses {error}"),
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownKey(error) => Some(error),
            _ => None,
        }
    }
}
