//! Universal Polar Stereographic coordinates for the two polar caps.

use std::f64::consts::PI;
use std::fmt::Display;

use lazy_static::lazy_static;

use crate::{
    ellipsoid::Ellipsoid,
    geodetic::{GeodeticPosition, Hemisphere},
    mgrs::Mgrs,
    projections::polar_stereographic::PolarStereographic,
    Error,
};

/// The standard UPS latitude of true scale.
const ORIGIN_LAT: f64 = 81.114528 * PI / 180.0;
/// False origin, applied on top of the bare polar projection.
const FALSE_EASTING: f64 = 2_000_000.0;
const FALSE_NORTHING: f64 = 2_000_000.0;
/// Northern cap floor and southern cap ceiling. Latitudes between these and
/// the UTM coverage have no UPS form.
const MIN_NORTH_LAT: f64 = 84.0 * PI / 180.0;
const MAX_SOUTH_LAT: f64 = -80.0 * PI / 180.0;
const MIN_EAST_NORTH: f64 = 0.0;
const MAX_EAST_NORTH: f64 = 4_000_000.0;

lazy_static! {
    /// The two standard polar projections on WGS 84; their secant constants
    /// need runtime math, so they are built once on first use.
    static ref NORTH_CAP: PolarStereographic =
        PolarStereographic::new(&Ellipsoid::WGS84, ORIGIN_LAT, 0.0, 0.0, 0.0)
            .expect("standard UPS parameters are valid");
    static ref SOUTH_CAP: PolarStereographic =
        PolarStereographic::new(&Ellipsoid::WGS84, -ORIGIN_LAT, 0.0, 0.0, 0.0)
            .expect("standard UPS parameters are valid");
}

fn cap(hemisphere: Hemisphere) -> &'static PolarStereographic {
    match hemisphere {
        Hemisphere::North => &*NORTH_CAP,
        Hemisphere::South => &*SOUTH_CAP,
    }
}

/// A UPS coordinate: hemisphere plus easting/northing in meters from the
/// 2,000 km false origin at the pole.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpsCoord {
    pub(crate) hemisphere: Hemisphere,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
}

impl UpsCoord {
    pub(crate) fn new(hemisphere: Hemisphere, easting: f64, northing: f64) -> UpsCoord {
        UpsCoord {
            hemisphere,
            easting,
            northing,
        }
    }

    /// Tries to create a UPS coordinate from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEasting`] or [`Error::InvalidNorthing`] for
    /// values outside [0, 4,000,000].
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{Hemisphere, UpsCoord};
    ///
    /// assert!(UpsCoord::create(Hemisphere::North, 2_000_000.0, 1_600_000.0).is_ok());
    /// assert!(UpsCoord::create(Hemisphere::North, 4_500_000.0, 1_600_000.0).is_err());
    /// assert!(UpsCoord::create(Hemisphere::North, 2_000_000.0, -1.0).is_err());
    /// ```
    pub fn create(hemisphere: Hemisphere, easting: f64, northing: f64) -> Result<UpsCoord, Error> {
        if !(MIN_EAST_NORTH..=MAX_EAST_NORTH).contains(&easting) {
            return Err(Error::InvalidEasting(easting));
        }
        if !(MIN_EAST_NORTH..=MAX_EAST_NORTH).contains(&northing) {
            return Err(Error::InvalidNorthing(northing));
        }
        Ok(UpsCoord::new(hemisphere, easting, northing))
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn is_north(&self) -> bool {
        self.hemisphere.is_north()
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Converts a geodetic position on one of the polar caps to UPS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLatitude`] for latitudes equatorward of 84°N
    /// (north) or 80°S (south) — the strip covered by UTM has no UPS form.
    pub fn from_geodetic(position: &GeodeticPosition) -> Result<UpsCoord, Error> {
        let lat = position.latitude_radians();
        let lon = position.longitude_radians();
        if lat < 0.0 && lat > MAX_SOUTH_LAT {
            return Err(Error::InvalidLatitude(position.latitude()));
        }
        if lat >= 0.0 && lat < MIN_NORTH_LAT {
            return Err(Error::InvalidLatitude(position.latitude()));
        }

        let hemisphere = Hemisphere::from_latitude(lat);
        let (x, y) = cap(hemisphere).project(lat, lon)?;
        Ok(UpsCoord {
            hemisphere,
            easting: FALSE_EASTING + x,
            northing: FALSE_NORTHING + y,
        })
    }

    /// Recovers the geodetic position for this coordinate.
    ///
    /// # Errors
    ///
    /// Returns an input-range error when the coordinate lies outside the
    /// valid region around the pole.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{GeodeticPosition, UpsCoord};
    ///
    /// let position = GeodeticPosition::from_degrees(87.0, 120.0).unwrap();
    /// let ups = UpsCoord::from_geodetic(&position).unwrap();
    /// let back = ups.to_geodetic().unwrap();
    ///
    /// assert!((back.latitude() - 87.0).abs() < 1e-9);
    /// assert!((back.longitude() - 120.0).abs() < 1e-9);
    /// ```
    pub fn to_geodetic(&self) -> Result<GeodeticPosition, Error> {
        if !(MIN_EAST_NORTH..=MAX_EAST_NORTH).contains(&self.easting) {
            return Err(Error::InvalidEasting(self.easting));
        }
        if !(MIN_EAST_NORTH..=MAX_EAST_NORTH).contains(&self.northing) {
            return Err(Error::InvalidNorthing(self.northing));
        }
        let (lat, lon) = cap(self.hemisphere)
            .unproject(self.easting - FALSE_EASTING, self.northing - FALSE_NORTHING)?;
        Ok(GeodeticPosition::new(lat, lon))
    }

    /// Encodes this coordinate as a polar MGRS reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] for precision above 5, or an
    /// input-range error if the coordinate cannot be gridded.
    pub fn to_mgrs(&self, precision: usize) -> Result<Mgrs, Error> {
        Mgrs::from_ups(self, precision)
    }
}

impl Display for UpsCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hemisphere = if self.is_north() { 'N' } else { 'S' };
        let mut buf = ryu::Buffer::new();
        let easting = buf.format(self.easting);
        let mut buf = ryu::Buffer::new();
        let northing = buf.format(self.northing);
        write!(f, "{} {} {}", hemisphere, easting, northing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pole_sits_on_the_false_origin() {
        let position = GeodeticPosition::from_degrees(90.0, 0.0).unwrap();
        let ups = UpsCoord::from_geodetic(&position).unwrap();
        assert_eq!(ups.easting(), FALSE_EASTING);
        assert_eq!(ups.northing(), FALSE_NORTHING);
    }

    #[test]
    fn rejects_the_utm_only_band() {
        for lat in [83.9, 50.0, 0.0, -50.0, -79.9] {
            let position = GeodeticPosition::from_degrees(lat, 10.0).unwrap();
            assert!(UpsCoord::from_geodetic(&position).is_err(), "lat {lat}");
        }
    }

    #[test]
    fn accepts_both_caps() {
        for lat in [84.0, 90.0, -80.0, -90.0] {
            let position = GeodeticPosition::from_degrees(lat, 10.0).unwrap();
            assert!(UpsCoord::from_geodetic(&position).is_ok(), "lat {lat}");
        }
    }

    #[test]
    fn southern_roundtrip() {
        let position = GeodeticPosition::from_degrees(-85.5, 123.0).unwrap();
        let ups = UpsCoord::from_geodetic(&position).unwrap();
        let back = ups.to_geodetic().unwrap();
        assert!((back.latitude() - -85.5).abs() < 1e-9);
        assert!((back.longitude() - 123.0).abs() < 1e-9);
    }
}
