//! 16-point compass conversions and circular averaging of wind directions

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// Width of one compass sector in degrees
const SECTOR_DEGREES: f64 = 22.5;
const SECTOR_COUNT: usize = 16;

/// One of the 16 compass points, ordered clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; SECTOR_COUNT] = [
        CompassDirection::N,
        CompassDirection::NNE,
        CompassDirection::NE,
        CompassDirection::ENE,
        CompassDirection::E,
        CompassDirection::ESE,
        CompassDirection::SE,
        CompassDirection::SSE,
        CompassDirection::S,
        CompassDirection::SSW,
        CompassDirection::SW,
        CompassDirection::WSW,
        CompassDirection::W,
        CompassDirection::WNW,
        CompassDirection::NW,
        CompassDirection::NNW,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CompassDirection::N => "N",
            CompassDirection::NNE => "NNE",
            CompassDirection::NE => "NE",
            CompassDirection::ENE => "ENE",
            CompassDirection::E => "E",
            CompassDirection::ESE => "ESE",
            CompassDirection::SE => "SE",
            CompassDirection::SSE => "SSE",
            CompassDirection::S => "S",
            CompassDirection::SSW => "SSW",
            CompassDirection::SW => "SW",
            CompassDirection::WSW => "WSW",
            CompassDirection::W => "W",
            CompassDirection::WNW => "WNW",
            CompassDirection::NW => "NW",
            CompassDirection::NNW => "NNW",
        }
    }

    /// Sector index, 0 for north increasing clockwise
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % SECTOR_COUNT]
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.label() == label)
    }

    /// Nearest compass point for a bearing. Sectors are centered on each point,
    /// so 11.25 degrees is the first bearing that maps to NNE.
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let sector = ((degrees / SECTOR_DEGREES) + 0.5).trunc() as i64;
        Some(Self::from_index(sector.rem_euclid(SECTOR_COUNT as i64) as usize))
    }

    pub fn radians(&self) -> f64 {
        TAU * self.index() as f64 / SECTOR_COUNT as f64
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Convert a bearing to its compass label; unknown bearings map to an empty label
pub fn degree_to_direction(degrees: Option<f64>) -> &'static str {
    degrees
        .and_then(CompassDirection::from_degrees)
        .map(|d| d.label())
        .unwrap_or("")
}

/// Circular mean of compass labels, rounded back onto the 16-point rose.
///
/// Labels outside the compass vocabulary (including the empty "unknown" label)
/// are dropped before averaging. Returns `None` when nothing valid remains.
pub fn circular_mean_direction<I, S>(labels: I) -> Option<CompassDirection>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let radians: Vec<f64> = labels
        .into_iter()
        .filter_map(|label| CompassDirection::from_label(label.as_ref()))
        .map(|d| d.radians())
        .collect();

    if radians.is_empty() {
        return None;
    }

    let count = radians.len() as f64;
    let mean_sin = radians.iter().map(|r| r.sin()).sum::<f64>() / count;
    let mean_cos = radians.iter().map(|r| r.cos()).sum::<f64>() / count;

    let mut angle = mean_sin.atan2(mean_cos);
    if angle < 0.0 {
        angle += TAU;
    }

    let sector = (angle * SECTOR_COUNT as f64 / TAU).round() as usize;
    Some(CompassDirection::from_index(sector))
}
