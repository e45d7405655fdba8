//! Geodetic positions: latitude/longitude on the ellipsoid.

use std::fmt::Display;

use crate::{mgrs::Mgrs, ups::UpsCoord, utm::UtmCoord, Converted, Error};

/// Mean radius of Earth in meters.
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius>
const EARTH_MEAN_RADIUS_M: f64 = 6371.0088 * 1000.0;

/// The hemisphere a projected coordinate belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub(crate) fn from_latitude(lat_radians: f64) -> Hemisphere {
        if lat_radians < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }

    pub fn is_north(self) -> bool {
        self == Hemisphere::North
    }
}

impl Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hemisphere::North => write!(f, "north"),
            Hemisphere::South => write!(f, "south"),
        }
    }
}

/// A geodetic position: latitude and longitude referenced to an ellipsoid,
/// plus an elevation above it. Angles are held in radians and exposed in
/// degrees. Can be converted to/from [`UtmCoord`], [`UpsCoord`] and [`Mgrs`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeodeticPosition {
    /// Latitude in radians.
    pub(crate) lat: f64,
    /// Longitude in radians.
    pub(crate) lon: f64,
    /// Elevation above the ellipsoid in meters.
    pub(crate) height: f64,
}

impl GeodeticPosition {
    /// Internal-only constructor that doesn't check the bounds of lat/lon.
    pub(crate) fn new(lat_radians: f64, lon_radians: f64) -> GeodeticPosition {
        GeodeticPosition {
            lat: lat_radians,
            lon: lon_radians,
            height: 0.0,
        }
    }

    /// Tries to create a position from a lat/lon pair in degrees. Latitude
    /// must lie in [-90, 90]; longitude is accepted in [-180, 360] and
    /// normalized into (-180, 180].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLatitude`] or [`Error::InvalidLongitude`] if a
    /// value is out of range.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::GeodeticPosition;
    ///
    /// let coord = GeodeticPosition::from_degrees(40.748333, -73.985278).unwrap();
    /// assert!((coord.latitude() - 40.748333).abs() < 1e-12);
    /// assert!((coord.longitude() - -73.985278).abs() < 1e-12);
    ///
    /// // A longitude given in [0, 360) is normalized.
    /// let coord = GeodeticPosition::from_degrees(10.0, 200.0).unwrap();
    /// assert!((coord.longitude() - -160.0).abs() < 1e-12);
    ///
    /// assert!(GeodeticPosition::from_degrees(100.0, 0.0).is_err());
    /// assert!(GeodeticPosition::from_degrees(0.0, -200.0).is_err());
    /// ```
    pub fn from_degrees(lat: f64, lon: f64) -> Result<GeodeticPosition, Error> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidLatitude(lat));
        }
        if !(-180.0..=360.0).contains(&lon) {
            return Err(Error::InvalidLongitude(lon));
        }
        let lon = if lon > 180.0 { lon - 360.0 } else { lon };
        Ok(GeodeticPosition::new(lat.to_radians(), lon.to_radians()))
    }

    /// Same as [`GeodeticPosition::from_degrees`], with radian inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLatitude`] or [`Error::InvalidLongitude`] if a
    /// value is out of range.
    pub fn from_radians(lat: f64, lon: f64) -> Result<GeodeticPosition, Error> {
        GeodeticPosition::from_degrees(lat.to_degrees(), lon.to_degrees())
    }

    /// Returns the same position with the given elevation in meters.
    pub fn with_height(mut self, height: f64) -> GeodeticPosition {
        self.height = height;
        self
    }

    /// Latitude in degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.lat.to_degrees()
    }

    /// Longitude in degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.lon.to_degrees()
    }

    #[inline]
    pub fn latitude_radians(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn longitude_radians(&self) -> f64 {
        self.lon
    }

    /// Elevation above the ellipsoid in meters.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn hemisphere(&self) -> Hemisphere {
        Hemisphere::from_latitude(self.lat)
    }

    /// Returns the distance in meters to `other` using the
    /// [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula)
    /// on the mean-radius sphere.
    pub fn haversine(&self, other: &GeodeticPosition) -> f64 {
        2.0 * EARTH_MEAN_RADIUS_M
            * (((other.lat - self.lat) / 2.0).sin().powi(2)
                + self.lat.cos()
                    * other.lat.cos()
                    * ((other.lon - self.lon) / 2.0).sin().powi(2))
            .sqrt()
            .asin()
    }

    /// Converts to [`UtmCoord`] on WGS 84, deriving the zone and hemisphere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLatitude`] outside UTM's latitude coverage.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::GeodeticPosition;
    ///
    /// let coord = GeodeticPosition::from_degrees(40.748333, -73.985278).unwrap();
    /// let utm = coord.to_utm().unwrap();
    ///
    /// assert_eq!(utm.zone(), 18);
    /// assert!(utm.is_north());
    /// assert!((utm.easting() - 585664.121).abs() < 1e-2);
    /// assert!((utm.northing() - 4511315.422).abs() < 1e-2);
    /// ```
    pub fn to_utm(&self) -> Result<UtmCoord, Error> {
        UtmCoord::from_geodetic(self)
    }

    /// Converts from [`UtmCoord`], which may carry a distortion warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside its zone's valid
    /// region.
    pub fn from_utm(value: &UtmCoord) -> Result<Converted<GeodeticPosition>, Error> {
        value.to_geodetic()
    }

    /// Converts to [`UpsCoord`]; valid only on the polar caps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLatitude`] for latitudes below 84°N in the
    /// north or above 80°S in the south.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::GeodeticPosition;
    ///
    /// let coord = GeodeticPosition::from_degrees(86.0, 0.0).unwrap();
    /// let ups = coord.to_ups().unwrap();
    ///
    /// assert!(ups.hemisphere().is_north());
    /// // On the 0° meridian the point sits on the grid's easting axis.
    /// assert_eq!(ups.easting(), 2_000_000.0);
    /// assert!(ups.northing() < 2_000_000.0);
    ///
    /// // Mid-latitudes have no UPS form.
    /// let coord = GeodeticPosition::from_degrees(45.0, 0.0).unwrap();
    /// assert!(coord.to_ups().is_err());
    /// ```
    pub fn to_ups(&self) -> Result<UpsCoord, Error> {
        UpsCoord::from_geodetic(self)
    }

    /// Converts from [`UpsCoord`].
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside the polar projection
    /// region.
    pub fn from_ups(value: &UpsCoord) -> Result<GeodeticPosition, Error> {
        value.to_geodetic()
    }

    /// Converts to an MGRS grid reference with `precision` digits per axis
    /// (0 = 100 km square, 5 = 1 m).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] for precision above 5, or a range
    /// error if the position cannot be gridded.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::GeodeticPosition;
    ///
    /// let coord = GeodeticPosition::from_degrees(40.748333, -73.985278).unwrap();
    /// let mgrs = coord.to_mgrs(5).unwrap();
    ///
    /// assert_eq!(mgrs.to_string(), "18TWL 85664 11315");
    /// ```
    pub fn to_mgrs(&self, precision: usize) -> Result<Mgrs, Error> {
        Mgrs::from_geodetic(self, precision)
    }

    /// Converts from an MGRS reference. The result may carry a
    /// [`Warning::LatitudeBandMismatch`](crate::Warning) if the reference's
    /// latitude band disagrees with its grid coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMgrs`] if the reference's letters are not
    /// valid for its zone.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{GeodeticPosition, Mgrs};
    ///
    /// let mgrs = Mgrs::parse_str("18TWL8566411315").unwrap();
    /// let coord = GeodeticPosition::from_mgrs(&mgrs).unwrap();
    ///
    /// assert!((coord.value().latitude() - 40.748333).abs() < 1e-4);
    /// assert!((coord.value().longitude() - -73.985278).abs() < 1e-4);
    /// ```
    pub fn from_mgrs(value: &Mgrs) -> Result<Converted<GeodeticPosition>, Error> {
        value.to_geodetic()
    }
}

impl Display for GeodeticPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude());
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude());
        write!(f, "{lat} {lon}")
    }
}
