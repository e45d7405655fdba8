//! Transverse Mercator coordinates that carry their projection parameters.
//!
//! A TM easting/northing is meaningless without the parameter set that
//! produced it, so the two travel together.

use std::fmt::Display;

use crate::{
    ellipsoid::Ellipsoid, geodetic::GeodeticPosition,
    projections::transverse_mercator::TransverseMercator, Converted, Error,
};

/// The parameter set of a Transverse Mercator projection. Angles in degrees,
/// offsets in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TmParameters {
    pub origin_latitude: f64,
    pub central_meridian: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub scale_factor: f64,
}

impl Default for TmParameters {
    /// A bare projection: origin on the equator at Greenwich, no false
    /// offsets, unit scale.
    fn default() -> TmParameters {
        TmParameters {
            origin_latitude: 0.0,
            central_meridian: 0.0,
            false_easting: 0.0,
            false_northing: 0.0,
            scale_factor: 1.0,
        }
    }
}

impl TmParameters {
    pub(crate) fn converter(&self, ellipsoid: &Ellipsoid) -> Result<TransverseMercator, Error> {
        TransverseMercator::new(
            ellipsoid,
            self.origin_latitude.to_radians(),
            self.central_meridian.to_radians(),
            self.false_easting,
            self.false_northing,
            self.scale_factor,
        )
    }
}

/// A Transverse Mercator coordinate: easting/northing in meters plus the
/// parameters it was projected with.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TmCoord {
    pub(crate) easting: f64,
    pub(crate) northing: f64,
    pub(crate) parameters: TmParameters,
}

impl TmCoord {
    /// Wraps an easting/northing produced under `parameters`.
    pub fn new(easting: f64, northing: f64, parameters: TmParameters) -> TmCoord {
        TmCoord {
            easting,
            northing,
            parameters,
        }
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    pub fn parameters(&self) -> &TmParameters {
        &self.parameters
    }

    /// Projects a geodetic position onto the Transverse Mercator plane
    /// described by `parameters`. The result carries a
    /// [`Warning::LongitudeDistortion`](crate::Warning) when the position is
    /// more than 9° from the central meridian.
    ///
    /// # Errors
    ///
    /// Returns a parameter-configuration error for an invalid ellipsoid or
    /// parameter set, or an input-range error when the position lies outside
    /// the ±90° wedge around the central meridian.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{Ellipsoid, GeodeticPosition, TmCoord, TmParameters};
    ///
    /// let params = TmParameters {
    ///     central_meridian: 3.0,
    ///     false_easting: 500_000.0,
    ///     scale_factor: 0.9996,
    ///     ..TmParameters::default()
    /// };
    /// let coord = GeodeticPosition::from_degrees(52.0, 3.0).unwrap();
    /// let tm = TmCoord::from_geodetic(&coord, &Ellipsoid::WGS84, params).unwrap();
    ///
    /// // On the central meridian the easting is exactly the false easting.
    /// assert!((tm.value().easting() - 500_000.0).abs() < 1e-6);
    /// assert!(!tm.has_warning());
    /// ```
    pub fn from_geodetic(
        position: &GeodeticPosition,
        ellipsoid: &Ellipsoid,
        parameters: TmParameters,
    ) -> Result<Converted<TmCoord>, Error> {
        let converter = parameters.converter(ellipsoid)?;
        let projected = converter.project(
            position.latitude_radians(),
            position.longitude_radians(),
        )?;
        Ok(projected.map(|(easting, northing)| TmCoord {
            easting,
            northing,
            parameters,
        }))
    }

    /// Recovers the geodetic position for this coordinate on the given
    /// ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns an input-range error when the easting/northing falls outside
    /// the projection's valid region.
    pub fn to_geodetic(&self, ellipsoid: &Ellipsoid) -> Result<Converted<GeodeticPosition>, Error> {
        let converter = self.parameters.converter(ellipsoid)?;
        let inverse = converter.unproject(self.easting, self.northing)?;
        Ok(inverse.map(|(lat, lon)| GeodeticPosition::new(lat, lon)))
    }
}

impl Display for TmCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let easting = buf.format(self.easting);
        let mut buf = ryu::Buffer::new();
        let northing = buf.format(self.northing);
        write!(f, "{easting} {northing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_travel_with_the_coordinate() {
        let params = TmParameters {
            origin_latitude: 49.0,
            central_meridian: -2.0,
            false_easting: 400_000.0,
            false_northing: -100_000.0,
            scale_factor: 0.9996012717,
        };
        let position = GeodeticPosition::from_degrees(52.658, 1.717).unwrap();
        let tm = TmCoord::from_geodetic(&position, &Ellipsoid::WGS84, params)
            .unwrap()
            .into_value();
        assert_eq!(tm.parameters(), &params);

        let back = tm.to_geodetic(&Ellipsoid::WGS84).unwrap().into_value();
        assert!((back.latitude() - 52.658).abs() < 1e-6);
        assert!((back.longitude() - 1.717).abs() < 1e-6);
    }
}
