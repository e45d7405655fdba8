//! Universal Transverse Mercator coordinates.

use std::f64::consts::PI;
use std::fmt::Display;

use crate::{
    datum,
    ellipsoid::Ellipsoid,
    geodetic::{GeodeticPosition, Hemisphere},
    mgrs::Mgrs,
    projections::transverse_mercator::TransverseMercator,
    utility::TWO_PI,
    Converted, Error,
};

/// UTM central scale factor.
const UTM_K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
/// Latitude acceptance window, slightly wider than the official grid so
/// imagery overlapping the polar caps can still be projected.
const MIN_LAT: f64 = -82.0 * PI / 180.0;
const MAX_LAT: f64 = 86.0 * PI / 180.0;
/// Sanity window for a forward conversion's output; an easting outside it
/// means the zone assignment was unreasonable for the input.
const MIN_EASTING: f64 = 100_000.0;
const MAX_EASTING: f64 = 900_000.0;
const MIN_NORTHING: f64 = 0.0;
const MAX_NORTHING: f64 = 10_000_000.0;

/// A UTM coordinate: zone, hemisphere, easting/northing in meters, plus the
/// zone's central meridian.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmCoord {
    pub(crate) zone: u8,
    pub(crate) hemisphere: Hemisphere,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
    /// Central meridian of the zone, degrees.
    pub(crate) central_meridian: f64,
}

/// Central meridian of a UTM zone, in degrees.
pub(crate) fn central_meridian_of(zone: u8) -> f64 {
    if zone >= 31 {
        f64::from(zone) * 6.0 - 183.0
    } else {
        f64::from(zone) * 6.0 + 177.0
    }
}

impl UtmCoord {
    pub(crate) fn new(zone: u8, hemisphere: Hemisphere, easting: f64, northing: f64) -> UtmCoord {
        UtmCoord {
            zone,
            hemisphere,
            easting,
            northing,
            central_meridian: central_meridian_of(zone),
        }
    }

    /// Tries to create a UTM coordinate from its parts.
    ///
    /// The easting is deliberately left unchecked so coordinates that extend
    /// past a zone boundary (reprojected imagery) can still be represented.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZone`] for a zone outside [1, 60] and
    /// [`Error::InvalidNorthing`] for a northing outside [0, 10,000,000].
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{Hemisphere, UtmCoord};
    ///
    /// let coord = UtmCoord::create(18, Hemisphere::North, 585664.121, 4511315.422);
    /// assert!(coord.is_ok());
    ///
    /// assert!(UtmCoord::create(0, Hemisphere::North, 500000.0, 0.0).is_err());
    /// assert!(UtmCoord::create(61, Hemisphere::North, 500000.0, 0.0).is_err());
    /// assert!(UtmCoord::create(18, Hemisphere::North, 500000.0, -1.0).is_err());
    /// ```
    pub fn create(
        zone: u8,
        hemisphere: Hemisphere,
        easting: f64,
        northing: f64,
    ) -> Result<UtmCoord, Error> {
        if !(1..=60).contains(&zone) {
            return Err(Error::InvalidZone(i32::from(zone)));
        }
        if !(MIN_NORTHING..=MAX_NORTHING).contains(&northing) {
            return Err(Error::InvalidNorthing(northing));
        }
        Ok(UtmCoord::new(zone, hemisphere, easting, northing))
    }

    pub fn zone(&self) -> u8 {
        self.zone
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

    /// Central meridian of the coordinate's zone, degrees.
    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }

    /// Converts a geodetic position to UTM on WGS 84, deriving the zone from
    /// the longitude with the documented irregular-zone overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLatitude`] outside roughly ±(80–84)°, or an
    /// easting/northing error when the projected result falls outside the
    /// zone's sanity window.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{GeodeticPosition, UtmCoord};
    ///
    /// // South-western Norway is pulled into the widened zone 32.
    /// let coord = GeodeticPosition::from_degrees(60.0, 5.0).unwrap();
    /// assert_eq!(UtmCoord::from_geodetic(&coord).unwrap().zone(), 32);
    ///
    /// // The naive formula would have said 31.
    /// let coord = GeodeticPosition::from_degrees(50.0, 5.0).unwrap();
    /// assert_eq!(UtmCoord::from_geodetic(&coord).unwrap().zone(), 31);
    /// ```
    pub fn from_geodetic(position: &GeodeticPosition) -> Result<UtmCoord, Error> {
        Ok(convert_geodetic(position, &Ellipsoid::WGS84, None)?.into_value())
    }

    /// Like [`UtmCoord::from_geodetic`], but forces the given zone, which
    /// must be the natural zone or one of its neighbors (wrapping 1 ↔ 60).
    /// Used to mosaic imagery across a zone boundary; projecting far into a
    /// neighboring zone can flag a distortion warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZoneOverrideConflict`] when the requested zone is not
    /// adjacent to the natural one.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{GeodeticPosition, UtmCoord};
    ///
    /// // A point close to the 31/32 boundary can be forced into either.
    /// let coord = GeodeticPosition::from_degrees(10.0, 5.8).unwrap();
    /// let natural = UtmCoord::from_geodetic(&coord).unwrap();
    /// assert_eq!(natural.zone(), 31);
    ///
    /// let forced = UtmCoord::from_geodetic_with_zone(&coord, 32).unwrap();
    /// assert_eq!(forced.value().zone(), 32);
    ///
    /// assert!(UtmCoord::from_geodetic_with_zone(&coord, 34).is_err());
    /// ```
    pub fn from_geodetic_with_zone(
        position: &GeodeticPosition,
        zone: u8,
    ) -> Result<Converted<UtmCoord>, Error> {
        convert_geodetic(position, &Ellipsoid::WGS84, Some(zone))
    }

    /// Recovers the geodetic position on WGS 84.
    ///
    /// # Errors
    ///
    /// Returns an input-range error when the coordinate lies outside its
    /// zone's valid region.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{Hemisphere, UtmCoord};
    ///
    /// let coord = UtmCoord::create(18, Hemisphere::North, 585664.121, 4511315.422).unwrap();
    /// let position = coord.to_geodetic().unwrap().into_value();
    ///
    /// assert!((position.latitude() - 40.748333).abs() < 1e-6);
    /// assert!((position.longitude() - -73.985278).abs() < 1e-6);
    /// ```
    pub fn to_geodetic(&self) -> Result<Converted<GeodeticPosition>, Error> {
        self.inverse(&Ellipsoid::WGS84)
    }

    /// Converts a WGS 84 geodetic position to UTM on the legacy NAD27 datum:
    /// the position is Molodensky-shifted to NAD27 and projected with
    /// Clarke 1866 ellipsoid parameters.
    ///
    /// # Errors
    ///
    /// Same conditions as [`UtmCoord::from_geodetic`].
    pub fn from_geodetic_nad27(position: &GeodeticPosition) -> Result<UtmCoord, Error> {
        let shifted = datum::wgs84_to_nad27(position);
        Ok(convert_geodetic(&shifted, &Ellipsoid::CLARKE_1866, None)?.into_value())
    }

    /// Recovers a WGS 84 geodetic position from a NAD27 UTM coordinate.
    ///
    /// # Errors
    ///
    /// Same conditions as [`UtmCoord::to_geodetic`].
    pub fn to_geodetic_nad27(&self) -> Result<Converted<GeodeticPosition>, Error> {
        let inverse = self.inverse(&Ellipsoid::CLARKE_1866)?;
        Ok(inverse.map(|position| datum::nad27_to_wgs84(&position)))
    }

    /// Encodes this coordinate as an MGRS reference, re-deriving the
    /// latitude for the band letter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] for precision above 5, or an
    /// input-range error if the coordinate cannot be gridded.
    pub fn to_mgrs(&self, precision: usize) -> Result<Mgrs, Error> {
        let position = self.to_geodetic()?.into_value();
        Mgrs::from_geodetic(&position, precision)
    }

    fn inverse(&self, ellipsoid: &Ellipsoid) -> Result<Converted<GeodeticPosition>, Error> {
        let false_northing = match self.hemisphere {
            Hemisphere::South => FALSE_NORTHING_SOUTH,
            Hemisphere::North => 0.0,
        };
        if !(MIN_NORTHING..=MAX_NORTHING).contains(&self.northing) {
            return Err(Error::InvalidNorthing(self.northing));
        }
        let converter = TransverseMercator::new(
            ellipsoid,
            0.0,
            self.central_meridian.to_radians(),
            FALSE_EASTING,
            false_northing,
            UTM_K0,
        )?;
        let inverse = converter.unproject(self.easting, self.northing)?;
        let (lat, lon) = *inverse.value();
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(Error::InvalidNorthing(self.northing));
        }
        Ok(Converted::flagged(
            GeodeticPosition::new(lat, lon),
            inverse.warning(),
        ))
    }
}

impl Display for UtmCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hemisphere = if self.is_north() { 'N' } else { 'S' };
        let mut buf = ryu::Buffer::new();
        let easting = buf.format(self.easting);
        let mut buf = ryu::Buffer::new();
        let northing = buf.format(self.northing);
        write!(f, "{}{} {} {}", self.zone, hemisphere, easting, northing)
    }
}

/// Natural zone number for a position, including the Norway and Svalbard
/// irregularities. Comparisons are on truncated integer degrees, as in the
/// published grid definition.
fn natural_zone(lat: f64, lon: f64) -> u8 {
    let lat_degrees = lat.to_degrees() as i64;
    let lon_degrees = lon.to_degrees() as i64;

    let mut zone: i64 = if lon < PI {
        (31.0 + lon.to_degrees() / 6.0) as i64
    } else {
        (lon.to_degrees() / 6.0 - 29.0) as i64
    };
    if zone > 60 {
        zone = 1;
    }

    // Norway
    if lat_degrees > 55 && lat_degrees < 64 && lon_degrees > -1 && lon_degrees < 3 {
        zone = 31;
    }
    if lat_degrees > 55 && lat_degrees < 64 && lon_degrees > 2 && lon_degrees < 12 {
        zone = 32;
    }
    // Svalbard
    if lat_degrees > 71 {
        if lon_degrees > -1 && lon_degrees < 9 {
            zone = 31;
        } else if lon_degrees > 8 && lon_degrees < 21 {
            zone = 33;
        } else if lon_degrees > 20 && lon_degrees < 33 {
            zone = 35;
        } else if lon_degrees > 32 && lon_degrees < 42 {
            zone = 37;
        }
    }

    zone as u8
}

fn convert_geodetic(
    position: &GeodeticPosition,
    ellipsoid: &Ellipsoid,
    override_zone: Option<u8>,
) -> Result<Converted<UtmCoord>, Error> {
    ellipsoid.validate()?;
    let lat = position.latitude_radians();
    let mut lon = position.longitude_radians();
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(Error::InvalidLatitude(position.latitude()));
    }
    if !(-PI..=TWO_PI).contains(&lon) {
        return Err(Error::InvalidLongitude(position.longitude()));
    }

    // Zone arithmetic happens in [0, 2π); the small bias keeps points just
    // west of the date line on the zone-60 side of the cut.
    if lon < 0.0 {
        lon += TWO_PI + 1.0e-10;
    }
    let natural = natural_zone(lat, lon);

    let zone = match override_zone {
        None => natural,
        Some(requested) => {
            if !(1..=60).contains(&requested) {
                return Err(Error::InvalidZone(i32::from(requested)));
            }
            let adjacent = (natural == 1 && requested == 60)
                || (natural == 60 && requested == 1)
                || requested + 1 == natural
                || requested == natural
                || requested == natural + 1;
            if !adjacent {
                return Err(Error::ZoneOverrideConflict { requested, natural });
            }
            requested
        }
    };

    let central_meridian = central_meridian_of(zone);
    let (hemisphere, false_northing) = if lat < 0.0 {
        (Hemisphere::South, FALSE_NORTHING_SOUTH)
    } else {
        (Hemisphere::North, 0.0)
    };

    let converter = TransverseMercator::new(
        ellipsoid,
        0.0,
        central_meridian.to_radians(),
        FALSE_EASTING,
        false_northing,
        UTM_K0,
    )?;
    let projected = converter.project(lat, lon)?;
    let (easting, northing) = *projected.value();

    if !(MIN_EASTING..=MAX_EASTING).contains(&easting) {
        return Err(Error::InvalidEasting(easting));
    }
    if !(MIN_NORTHING..=MAX_NORTHING).contains(&northing) {
        return Err(Error::InvalidNorthing(northing));
    }

    Ok(Converted::flagged(
        UtmCoord {
            zone,
            hemisphere,
            easting,
            northing,
            central_meridian,
        },
        projected.warning(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_meridians_wrap_the_date_line() {
        assert_eq!(central_meridian_of(31), 3.0);
        assert_eq!(central_meridian_of(60), 177.0);
        // Zones west of Greenwich are expressed east of it; the projection
        // engine wraps them past 180°.
        assert_eq!(central_meridian_of(18), 285.0);
        assert_eq!(central_meridian_of(1), 183.0);
    }

    #[test]
    fn svalbard_zones() {
        for (lon, expected) in [(5.0, 31), (15.0, 33), (25.0, 35), (35.0, 37)] {
            let position = GeodeticPosition::from_degrees(75.0, lon).unwrap();
            assert_eq!(
                UtmCoord::from_geodetic(&position).unwrap().zone(),
                expected,
                "lon {lon}"
            );
        }
    }

    #[test]
    fn zone_override_wraps_across_the_date_line() {
        let position = GeodeticPosition::from_degrees(10.0, 179.5).unwrap();
        let natural = UtmCoord::from_geodetic(&position).unwrap();
        assert_eq!(natural.zone(), 60);

        let forced = UtmCoord::from_geodetic_with_zone(&position, 1).unwrap();
        assert_eq!(forced.value().zone(), 1);
    }

    #[test]
    fn polar_latitudes_are_rejected() {
        let position = GeodeticPosition::from_degrees(87.0, 10.0).unwrap();
        assert!(UtmCoord::from_geodetic(&position).is_err());
        let position = GeodeticPosition::from_degrees(-85.0, 10.0).unwrap();
        assert!(UtmCoord::from_geodetic(&position).is_err());
    }

    #[test]
    fn nad27_roundtrip_is_consistent() {
        let position = GeodeticPosition::from_degrees(39.5, -105.1).unwrap();
        let utm = UtmCoord::from_geodetic_nad27(&position).unwrap();
        let back = utm.to_geodetic_nad27().unwrap().into_value();
        assert!((back.latitude() - position.latitude()).abs() < 1e-5);
        assert!((back.longitude() - position.longitude()).abs() < 1e-5);
    }

    #[test]
    fn nad27_differs_from_wgs84_projection() {
        let position = GeodeticPosition::from_degrees(39.5, -105.1).unwrap();
        let wgs = UtmCoord::from_geodetic(&position).unwrap();
        let nad = UtmCoord::from_geodetic_nad27(&position).unwrap();
        // The datum shift moves the grid coordinate by a couple hundred
        // meters in this part of the world.
        assert!((wgs.northing - nad.northing).abs() > 10.0);
    }
}
