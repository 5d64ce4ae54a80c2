//! Physical dimensions of activity quantities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The physical dimension of an activity or emission quantity.
///
/// Activity data only ever needs a handful of dimensions, so unlike a general
/// SI exponent vector these are closed categories. Conversion is only
/// allowed within a dimension, except Volume <-> Mass which goes through a
/// fuel density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Base unit: kg
    Mass,
    /// Base unit: m3
    Volume,
    /// Base unit: J
    Energy,
    /// Base unit: m (also used for vehicle- and passenger-kilometres)
    Length,
    /// Base unit: a dimensionless count ("unit")
    Count,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Mass => "mass",
            Dimension::Volume => "volume",
            Dimension::Energy => "energy",
            Dimension::Length => "length",
            Dimension::Count => "count",
        };
        f.write_str(name)
    }
}
