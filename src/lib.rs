#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::unreadable_literal,
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

//! Conversions between geodetic latitude/longitude and the projected grids
//! built on top of it: Transverse Mercator, Polar Stereographic, UTM, UPS,
//! and the MGRS grid-reference string, on an arbitrary reference ellipsoid.
//!
//! Every conversion is a pure function over immutable values; converters
//! carry no state beyond precomputed series coefficients, so separate values
//! can be used freely from separate threads.

use thiserror::Error;

pub mod datum;
pub mod ellipsoid;
pub mod geodetic;
pub mod mgrs;
pub mod tm;
pub mod ups;
pub mod utm;

pub use ellipsoid::Ellipsoid;
pub use geodetic::{GeodeticPosition, Hemisphere};
pub use mgrs::Mgrs;
pub use tm::{TmCoord, TmParameters};
pub use ups::UpsCoord;
pub use utm::UtmCoord;

pub(crate) mod projections {
    pub mod polar_stereographic;
    pub mod transverse_mercator;
}

pub(crate) mod utility;

/// Everything that can make a conversion fail. Failures are final: these are
/// closed-form computations, so a failed call will fail identically if
/// repeated.
#[derive(Debug, Error)]
pub enum Error {
    #[error("latitude {0}° is outside the valid range for this conversion")]
    InvalidLatitude(f64),
    #[error("longitude {0}° is outside the valid range for this conversion")]
    InvalidLongitude(f64),
    #[error("easting {0}m is outside the valid projection region")]
    InvalidEasting(f64),
    #[error("northing {0}m is outside the valid projection region")]
    InvalidNorthing(f64),
    #[error("point {0}m from the pole is outside the valid projection region")]
    OutsidePolarRadius(f64),
    #[error("zone {0} is not in [1, 60]")]
    InvalidZone(i32),
    #[error("zone override {requested} is not adjacent to the natural zone {natural}")]
    ZoneOverrideConflict { requested: u8, natural: u8 },
    #[error("semi-major axis {0}m must be greater than zero")]
    InvalidSemiMajorAxis(f64),
    #[error("inverse flattening {0} is not in [250, 350]")]
    InvalidFlattening(f64),
    #[error("origin latitude {0}° is outside ±89.99°")]
    InvalidOriginLatitude(f64),
    #[error("origin longitude {0}° is not in [-180°, 360°]")]
    InvalidOriginLongitude(f64),
    #[error("scale factor {0} is not in [0.3, 3.0]")]
    InvalidScaleFactor(f64),
    #[error("precision {0} is not in [0, 5]")]
    InvalidPrecision(usize),
    #[error("MGRS reference is invalid: {0}")]
    InvalidMgrs(String),
}

/// Non-fatal conditions a conversion can report alongside its result.
/// Whether a warning is treated as an error is the caller's decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// The longitude is more than 9° from the central meridian, so projected
    /// distances are noticeably distorted.
    LongitudeDistortion,
    /// An MGRS reference decoded to a latitude outside its claimed latitude
    /// band; the reference may be transposed or corrupted.
    LatitudeBandMismatch,
}

/// A conversion result together with the warning, if any, raised while
/// producing it.
#[derive(Clone, Copy, Debug)]
pub struct Converted<T> {
    value: T,
    warning: Option<Warning>,
}

impl<T> Converted<T> {
    pub(crate) fn clean(value: T) -> Converted<T> {
        Converted {
            value,
            warning: None,
        }
    }

    pub(crate) fn flagged(value: T, warning: Option<Warning>) -> Converted<T> {
        Converted { value, warning }
    }

    pub(crate) fn map<U, F>(self, op: F) -> Converted<U>
    where
        F: FnOnce(T) -> U,
    {
        Converted {
            value: op(self.value),
            warning: self.warning,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn warning(&self) -> Option<Warning> {
        self.warning
    }

    pub fn has_warning(&self) -> bool {
        self.warning.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

pub trait ParseCoord {
    /// Parses a coordinate from its string form.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] describing the first malformed element found.
    fn parse_coord(value: &str) -> Result<Self, Error>
    where
        Self: Sized;
}

/// Parses any [`ParseCoord`] implementor from a string.
///
/// # Errors
///
/// Returns an [`Error`] if the string is not a valid coordinate of type `T`.
pub fn from_str<S, T>(value: S) -> Result<T, Error>
where
    S: AsRef<str>,
    T: ParseCoord,
{
    T::parse_coord(value.as_ref())
}
