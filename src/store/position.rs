use std::fmt;

use serde::Serialize;

/// Number of map blocks along each axis of the key space.
const AXIS_SPAN: i64 = 4096;

/// Map block coordinates, one unit per 16 nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlockPos {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl BlockPos {
    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decodes the integer key the map database stores blocks under.
    ///
    /// Keys are `x + 4096 * y + 4096^2 * z` with every axis in `-2048..=2047`, so each
    /// axis is peeled off with a euclidean remainder and folded back into the signed range.
    pub fn from_key(key: i64) -> Self {
        let mut rest = key;
        let x = axis_from_remainder(rest);
        rest = (rest - x) / AXIS_SPAN;
        let y = axis_from_remainder(rest);
        rest = (rest - y) / AXIS_SPAN;
        let z = axis_from_remainder(rest);
        Self::new(x as i16, y as i16, z as i16)
    }

    pub fn to_key(&self) -> i64 {
        self.x as i64 + self.y as i64 * AXIS_SPAN + self.z as i64 * AXIS_SPAN * AXIS_SPAN
    }
}

fn axis_from_remainder(value: i64) -> i64 {
    let unsigned = value.rem_euclid(AXIS_SPAN);
    if unsigned < AXIS_SPAN / 2 {
        unsigned
    } else {
        unsigned - AXIS_SPAN
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
