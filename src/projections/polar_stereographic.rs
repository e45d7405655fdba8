//! Polar Stereographic projection engine.
//!
//! Southern parameter sets are normalized to the northern form by flipping
//! signs on the way in and out, which halves the formula surface. The secant
//! case (true scale off the pole) uses the `mc`/`tc` constants; true scale
//! exactly at the pole degenerates to the closed-form `e4` constant.

use std::f64::consts::PI;

use crate::{
    ellipsoid::Ellipsoid,
    utility::TWO_PI,
    Error,
};

const PI_OVER_2: f64 = PI / 2.0;
const PI_OVER_4: f64 = PI / 4.0;
/// Latitudes this close to ±90° count as the pole.
const POLE_TOLERANCE: f64 = 1.0e-10;

pub(crate) struct PolarStereographic {
    /// First eccentricity.
    es: f64,
    es_over_2: f64,
    southern: bool,
    /// Secant-case constants; unused when true scale sits on the pole.
    tc: f64,
    a_mc: f64,
    /// Pole-case constant; unused otherwise.
    e4: f64,
    two_a: f64,
    /// Origin in northern form.
    origin_lat: f64,
    origin_lon: f64,
    false_easting: f64,
    false_northing: f64,
    delta_easting: f64,
    delta_northing: f64,
}

impl PolarStereographic {
    /// Builds a converter from the latitude of true scale and the longitude
    /// down from the pole, both in radians.
    pub fn new(
        ellipsoid: &Ellipsoid,
        latitude_of_true_scale: f64,
        longitude_down_from_pole: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<PolarStereographic, Error> {
        ellipsoid.validate()?;
        if !(-PI_OVER_2..=PI_OVER_2).contains(&latitude_of_true_scale) {
            return Err(Error::InvalidOriginLatitude(
                latitude_of_true_scale.to_degrees(),
            ));
        }
        if !(-PI..=TWO_PI).contains(&longitude_down_from_pole) {
            return Err(Error::InvalidOriginLongitude(
                longitude_down_from_pole.to_degrees(),
            ));
        }

        let mut origin_lon = longitude_down_from_pole;
        if origin_lon > PI {
            origin_lon -= TWO_PI;
        }
        let southern = latitude_of_true_scale < 0.0;
        let (origin_lat, origin_lon) = if southern {
            (-latitude_of_true_scale, -origin_lon)
        } else {
            (latitude_of_true_scale, origin_lon)
        };

        let a = ellipsoid.semi_major_axis();
        let es = ellipsoid.eccentricity_squared().sqrt();
        let es_over_2 = es / 2.0;

        let mut tc = 1.0;
        let mut e4 = 1.0;
        let mut a_mc = a;
        if (origin_lat.abs() - PI_OVER_2).abs() > POLE_TOLERANCE {
            let slat = origin_lat.sin();
            let essin = es * slat;
            let pow_es = ((1.0 - essin) / (1.0 + essin)).powf(es_over_2);
            let clat = origin_lat.cos();
            let mc = clat / (1.0 - essin * essin).sqrt();
            a_mc = a * mc;
            tc = (PI_OVER_4 - origin_lat / 2.0).tan() / pow_es;
        } else {
            let one_plus_es = 1.0 + es;
            let one_minus_es = 1.0 - es;
            e4 = (one_plus_es.powf(one_plus_es) * one_minus_es.powf(one_minus_es)).sqrt();
        }

        let mut converter = PolarStereographic {
            es,
            es_over_2,
            southern,
            tc,
            a_mc,
            e4,
            two_a: 2.0 * a,
            origin_lat,
            origin_lon,
            false_easting,
            false_northing,
            delta_easting: 12_713_601.0,
            delta_northing: 12_713_601.0,
        };

        // The usable radius is set by the projected equator point at the
        // origin longitude.
        let (_, equator_northing) = converter.forward_core(0.0, converter.origin_lon);
        converter.delta_northing = (equator_northing * 2.0).abs() + 1.0e-2;
        converter.delta_easting = converter.delta_northing;

        Ok(converter)
    }

    /// Forward formulas without range checks. Handles the southern sign flip
    /// and the exact pole.
    fn forward_core(&self, lat: f64, lon: f64) -> (f64, f64) {
        if (lat.abs() - PI_OVER_2).abs() < POLE_TOLERANCE {
            // The pole projects onto the grid origin; false offsets are the
            // caller's concern there.
            return (0.0, 0.0);
        }
        let (lat, lon) = if self.southern { (-lat, -lon) } else { (lat, lon) };

        let mut dlam = lon - self.origin_lon;
        if dlam > PI {
            dlam -= TWO_PI;
        }
        if dlam < -PI {
            dlam += TWO_PI;
        }

        let slat = lat.sin();
        let essin = self.es * slat;
        let pow_es = ((1.0 - essin) / (1.0 + essin)).powf(self.es_over_2);
        let t = (PI_OVER_4 - lat / 2.0).tan() / pow_es;
        let rho = if (self.origin_lat.abs() - PI_OVER_2).abs() > POLE_TOLERANCE {
            self.a_mc * t / self.tc
        } else {
            self.two_a * t / self.e4
        };

        if self.southern {
            (
                -(rho * dlam.sin()) + self.false_easting,
                rho * dlam.cos() + self.false_northing,
            )
        } else {
            (
                rho * dlam.sin() + self.false_easting,
                -(rho * dlam.cos()) + self.false_northing,
            )
        }
    }

    /// Projects a geodetic latitude/longitude to easting/northing.
    ///
    /// Fails when the latitude's hemisphere disagrees with the converter's,
    /// or the longitude is out of range.
    pub fn project(&self, lat: f64, lon: f64) -> Result<(f64, f64), Error> {
        if !(-PI_OVER_2..=PI_OVER_2).contains(&lat) {
            return Err(Error::InvalidLatitude(lat.to_degrees()));
        }
        if (lat < 0.0 && !self.southern) || (lat > 0.0 && self.southern) {
            return Err(Error::InvalidLatitude(lat.to_degrees()));
        }
        if !(-PI..=TWO_PI).contains(&lon) {
            return Err(Error::InvalidLongitude(lon.to_degrees()));
        }
        Ok(self.forward_core(lat, lon))
    }

    /// Recovers latitude/longitude from easting/northing by fixed-point
    /// iteration on the isometric-latitude relation.
    ///
    /// Fails when the point lies outside the valid radius around the pole.
    pub fn unproject(&self, easting: f64, northing: f64) -> Result<(f64, f64), Error> {
        if easting > self.false_easting + self.delta_easting
            || easting < self.false_easting - self.delta_easting
        {
            return Err(Error::InvalidEasting(easting));
        }
        if northing > self.false_northing + self.delta_northing
            || northing < self.false_northing - self.delta_northing
        {
            return Err(Error::InvalidNorthing(northing));
        }

        let mut dy = northing - self.false_northing;
        let mut dx = easting - self.false_easting;
        let rho = dx.hypot(dy);
        let delta_radius = self.delta_easting.hypot(self.delta_northing);
        if rho > delta_radius {
            return Err(Error::OutsidePolarRadius(rho));
        }

        let (mut lat, mut lon) = if dy == 0.0 && dx == 0.0 {
            (PI_OVER_2, self.origin_lon)
        } else {
            if self.southern {
                dy = -dy;
                dx = -dx;
            }

            let t = if (self.origin_lat.abs() - PI_OVER_2).abs() > POLE_TOLERANCE {
                rho * self.tc / self.a_mc
            } else {
                rho * self.e4 / self.two_a
            };
            let mut phi = PI_OVER_2 - 2.0 * t.atan();
            let mut previous = 0.0;
            while (phi - previous).abs() > POLE_TOLERANCE {
                previous = phi;
                let essin = self.es * phi.sin();
                let pow_es = ((1.0 - essin) / (1.0 + essin)).powf(self.es_over_2);
                phi = PI_OVER_2 - 2.0 * (t * pow_es).atan();
            }
            let mut lon = self.origin_lon + dx.atan2(-dy);

            if lon > PI {
                lon -= TWO_PI;
            } else if lon < -PI {
                lon += TWO_PI;
            }
            // Force values distorted by round-off back onto the valid
            // ranges at the pole and the antimeridian.
            (phi.clamp(-PI_OVER_2, PI_OVER_2), lon.clamp(-PI, PI))
        };

        if self.southern {
            lat = -lat;
            lon = -lon;
        }
        Ok((lat, lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ups(southern: bool) -> PolarStereographic {
        let true_scale = 81.114528_f64.to_radians();
        let lat = if southern { -true_scale } else { true_scale };
        PolarStereographic::new(&Ellipsoid::WGS84, lat, 0.0, 0.0, 0.0).unwrap()
    }

    #[test]
    fn pole_projects_to_origin() {
        let ps = ups(false);
        assert_eq!(ps.project(PI_OVER_2, 1.0).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn northern_roundtrip() {
        let ps = ups(false);
        let lat = 87.3_f64.to_radians();
        let lon = 42.0_f64.to_radians();
        let (x, y) = ps.project(lat, lon).unwrap();
        let (lat2, lon2) = ps.unproject(x, y).unwrap();
        assert!((lat - lat2).abs() < 1e-9);
        assert!((lon - lon2).abs() < 1e-9);
    }

    #[test]
    fn southern_roundtrip() {
        // Regression for the southern forward branch: both axes must invert
        // cleanly, not just the easting.
        let ps = ups(true);
        for &(lat_deg, lon_deg) in &[(-87.3, 42.0), (-85.0, -120.0), (-89.9, 179.0)] {
            let lat = f64::to_radians(lat_deg);
            let lon = f64::to_radians(lon_deg);
            let (x, y) = ps.project(lat, lon).unwrap();
            let (lat2, lon2) = ps.unproject(x, y).unwrap();
            assert!((lat - lat2).abs() < 1e-9, "lat mismatch at {lat_deg}");
            assert!((lon - lon2).abs() < 1e-9, "lon mismatch at {lat_deg}");
        }
    }

    #[test]
    fn southern_grid_north_points_to_greenwich() {
        let ps = ups(true);
        let (x, y) = ps.project((-87.0_f64).to_radians(), 0.0).unwrap();
        assert!(x.abs() < 1e-6);
        assert!(y > 0.0);
    }

    #[test]
    fn hemisphere_mismatch_is_rejected() {
        let ps = ups(false);
        assert!(ps.project((-87.0_f64).to_radians(), 0.0).is_err());
    }

    #[test]
    fn far_points_are_rejected() {
        let ps = ups(false);
        assert!(ps.unproject(30_000_000.0, 0.0).is_err());
    }
}
