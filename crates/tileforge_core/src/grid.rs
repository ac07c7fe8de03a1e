//! Sparse grid coordinates

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A cell position on the map grid.
///
/// The domain is unbounded: layers store tiles sparsely, so positions
/// outside the configured grid are valid keys. Serializes as the compact
/// string `"x{x},y{y}"` so layers persist as plain JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{},y{}", self.x, self.y)
    }
}

/// Error returned when a serialized grid position does not match the
/// `"x{x},y{y}"` format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGridPosError(String);

impl fmt::Display for ParseGridPosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid grid position key: {:?}", self.0)
    }
}

impl std::error::Error for ParseGridPosError {}

impl FromStr for GridPos {
    type Err = ParseGridPosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGridPosError(s.to_string());
        let rest = s.strip_prefix('x').ok_or_else(err)?;
        let (x, y) = rest.split_once(",y").ok_or_else(err)?;
        Ok(GridPos {
            x: x.parse().map_err(|_| err())?,
            y: y.parse().map_err(|_| err())?,
        })
    }
}

impl Serialize for GridPos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridPos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
