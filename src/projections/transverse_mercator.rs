//! Transverse Mercator projection engine.
//!
//! Series formulation of the NGA standard: the forward direction expands
//! easting/northing in powers of the longitude offset from the central
//! meridian; the inverse recovers a footpoint latitude by fixed-point
//! iteration and back-substitutes. All angles are radians. Series
//! coefficients are specific to the ellipsoid and recomputed whenever a
//! converter is built; nothing is cached across ellipsoids.

use std::f64::consts::PI;

use crate::{
    ellipsoid::Ellipsoid,
    utility::{wrap_radians, TWO_PI},
    Converted, Error, Warning,
};

/// Origin latitudes are kept just short of the poles to avoid the tangent
/// singularity.
const MAX_LAT: f64 = PI * 89.99 / 180.0;
/// Half-width of the longitude wedge a converter accepts.
const MAX_DELTA_LON: f64 = PI * 90.0 / 180.0;
/// |Δλ| beyond this distorts projected distances noticeably.
const DISTORTION_LON: f64 = 9.0 * PI / 180.0;
const MIN_SCALE_FACTOR: f64 = 0.3;
const MAX_SCALE_FACTOR: f64 = 3.0;

pub(crate) struct TransverseMercator {
    a: f64,
    /// First eccentricity squared.
    es: f64,
    /// Second eccentricity squared.
    ebs: f64,
    origin_lat: f64,
    origin_lon: f64,
    false_easting: f64,
    false_northing: f64,
    scale: f64,
    /// True meridional distance series coefficients.
    ap: f64,
    bp: f64,
    cp: f64,
    dp: f64,
    ep: f64,
    /// Widest usable offsets from the false origin, found at construction by
    /// projecting the extreme corner of the valid region.
    delta_easting: f64,
    delta_northing: f64,
}

impl TransverseMercator {
    /// Builds a converter for the given ellipsoid and projection parameters.
    /// Angles are radians; the central meridian is accepted in [-π, 2π].
    pub fn new(
        ellipsoid: &Ellipsoid,
        origin_lat: f64,
        central_meridian: f64,
        false_easting: f64,
        false_northing: f64,
        scale: f64,
    ) -> Result<TransverseMercator, Error> {
        ellipsoid.validate()?;
        if !(-MAX_LAT..=MAX_LAT).contains(&origin_lat) {
            return Err(Error::InvalidOriginLatitude(origin_lat.to_degrees()));
        }
        if !(-PI..=TWO_PI).contains(&central_meridian) {
            return Err(Error::InvalidOriginLongitude(central_meridian.to_degrees()));
        }
        if !(MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&scale) {
            return Err(Error::InvalidScaleFactor(scale));
        }

        let a = ellipsoid.semi_major_axis();
        let b = ellipsoid.semi_minor_axis();

        // True meridional distance constants for this ellipsoid, a series in
        // (a - b) / (a + b).
        let tn = (a - b) / (a + b);
        let tn2 = tn * tn;
        let tn3 = tn2 * tn;
        let tn4 = tn3 * tn;
        let tn5 = tn4 * tn;

        let mut converter = TransverseMercator {
            a,
            es: ellipsoid.eccentricity_squared(),
            ebs: ellipsoid.second_eccentricity_squared(),
            origin_lat: 0.0,
            origin_lon: 0.0,
            false_easting: 0.0,
            false_northing: 0.0,
            scale: 1.0,
            ap: a * (1.0 - tn + 5.0 * (tn2 - tn3) / 4.0 + 81.0 * (tn4 - tn5) / 64.0),
            bp: 3.0 * a * (tn - tn2 + 7.0 * (tn3 - tn4) / 8.0 + 55.0 * tn5 / 64.0) / 2.0,
            cp: 15.0 * a * (tn2 - tn3 + 3.0 * (tn4 - tn5) / 4.0) / 16.0,
            dp: 35.0 * a * (tn3 - tn4 + 11.0 * tn5 / 16.0) / 48.0,
            ep: 315.0 * a * (tn4 - tn5) / 512.0,
            delta_easting: 40_000_000.0,
            delta_northing: 40_000_000.0,
        };

        // The usable window is bounded by the projection of the corner of the
        // valid region, taken with a bare projection (origin and false
        // offsets still zero, scale one).
        let (_, corner_northing) = converter.series(MAX_LAT, MAX_DELTA_LON);
        converter.delta_northing = corner_northing;
        let (corner_easting, _) = converter.series(0.0, MAX_DELTA_LON);
        converter.delta_easting = corner_easting;

        converter.origin_lat = origin_lat;
        converter.origin_lon = wrap_radians(central_meridian);
        converter.false_easting = false_easting;
        converter.false_northing = false_northing;
        converter.scale = scale;
        Ok(converter)
    }

    /// Radius of curvature in the prime vertical.
    fn sphsn(&self, lat: f64) -> f64 {
        self.a / (1.0 - self.es * lat.sin().powi(2)).sqrt()
    }

    /// Radius of curvature in the meridian.
    fn sphsr(&self, lat: f64) -> f64 {
        self.a * (1.0 - self.es) / (1.0 - self.es * lat.sin().powi(2)).powf(1.5)
    }

    /// True meridional distance from the equator.
    fn sphtmd(&self, lat: f64) -> f64 {
        self.ap * lat - self.bp * (2.0 * lat).sin() + self.cp * (4.0 * lat).sin()
            - self.dp * (6.0 * lat).sin()
            + self.ep * (8.0 * lat).sin()
    }

    /// Evaluates the forward series for a latitude and longitude offset from
    /// the central meridian. No range checks.
    fn series(&self, lat: f64, dlam: f64) -> (f64, f64) {
        let s = lat.sin();
        let c = lat.cos();
        let c2 = c * c;
        let c3 = c2 * c;
        let c5 = c3 * c2;
        let c7 = c5 * c2;
        let t = lat.tan();
        let tan2 = t * t;
        let tan3 = tan2 * t;
        let tan4 = tan3 * t;
        let tan5 = tan4 * t;
        let tan6 = tan5 * t;
        let eta = self.ebs * c2;
        let eta2 = eta * eta;
        let eta3 = eta2 * eta;
        let eta4 = eta3 * eta;

        let sn = self.sphsn(lat);
        let tmd = self.sphtmd(lat);
        let tmdo = self.sphtmd(self.origin_lat);

        let t1 = (tmd - tmdo) * self.scale;
        let t2 = sn * s * c * self.scale / 2.0;
        let t3 = sn * s * c3 * self.scale * (5.0 - tan2 + 9.0 * eta + 4.0 * eta2) / 24.0;
        let t4 = sn
            * s
            * c5
            * self.scale
            * (61.0 - 58.0 * tan2 + tan4 + 270.0 * eta - 330.0 * tan2 * eta + 445.0 * eta2
                + 324.0 * eta3
                - 680.0 * tan2 * eta2
                + 88.0 * eta4
                - 600.0 * tan2 * eta3
                - 192.0 * tan2 * eta4)
            / 720.0;
        let t5 = sn * s * c7 * self.scale * (1385.0 - 3111.0 * tan2 + 543.0 * tan4 - tan6)
            / 40320.0;

        let northing = self.false_northing
            + t1
            + dlam.powi(2) * t2
            + dlam.powi(4) * t3
            + dlam.powi(6) * t4
            + dlam.powi(8) * t5;

        let t6 = sn * c * self.scale;
        let t7 = sn * c3 * self.scale * (1.0 - tan2 + eta) / 6.0;
        let t8 = sn
            * c5
            * self.scale
            * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta - 58.0 * tan2 * eta + 13.0 * eta2
                + 4.0 * eta3
                - 64.0 * tan2 * eta2
                - 24.0 * tan2 * eta3)
            / 120.0;
        let t9 = sn * c7 * self.scale * (61.0 - 479.0 * tan2 + 179.0 * tan4 - tan6) / 5040.0;

        let easting = self.false_easting
            + dlam * t6
            + dlam.powi(3) * t7
            + dlam.powi(5) * t8
            + dlam.powi(7) * t9;

        (easting, northing)
    }

    /// Projects a geodetic latitude/longitude to easting/northing.
    ///
    /// Fails for latitudes beyond ±89.99° or longitudes outside the ±90°
    /// wedge around the central meridian; flags a distortion warning beyond
    /// 9° from it.
    pub fn project(&self, lat: f64, lon: f64) -> Result<Converted<(f64, f64)>, Error> {
        if !(-MAX_LAT..=MAX_LAT).contains(&lat) {
            return Err(Error::InvalidLatitude(lat.to_degrees()));
        }
        let lon = if lon > PI { lon - TWO_PI } else { lon };
        if lon < self.origin_lon - MAX_DELTA_LON || lon > self.origin_lon + MAX_DELTA_LON {
            // Compare in [0, 2π) so a longitude near ±180° lines up with an
            // origin on the other side of the date line.
            let shifted_lon = if lon < 0.0 { lon + TWO_PI } else { lon };
            let shifted_origin = if self.origin_lon < 0.0 {
                self.origin_lon + TWO_PI
            } else {
                self.origin_lon
            };
            if shifted_lon < shifted_origin - MAX_DELTA_LON
                || shifted_lon > shifted_origin + MAX_DELTA_LON
            {
                return Err(Error::InvalidLongitude(lon.to_degrees()));
            }
        }

        let mut dlam = lon - self.origin_lon;
        let warning = if dlam.abs() > DISTORTION_LON {
            Some(Warning::LongitudeDistortion)
        } else {
            None
        };
        dlam = wrap_radians(dlam);
        if dlam.abs() < 2.0e-10 {
            dlam = 0.0;
        }

        Ok(Converted::flagged(self.series(lat, dlam), warning))
    }

    /// Recovers latitude/longitude from easting/northing.
    ///
    /// Fails when the point lies outside the precomputed valid window; flags
    /// a distortion warning when the recovered longitude is far from the
    /// central meridian (the tolerated offset shrinks toward the poles).
    pub fn unproject(&self, easting: f64, northing: f64) -> Result<Converted<(f64, f64)>, Error> {
        if easting < self.false_easting - self.delta_easting
            || easting > self.false_easting + self.delta_easting
        {
            return Err(Error::InvalidEasting(easting));
        }
        if northing < self.false_northing - self.delta_northing
            || northing > self.false_northing + self.delta_northing
        {
            return Err(Error::InvalidNorthing(northing));
        }

        let tmdo = self.sphtmd(self.origin_lat);
        let tmd = tmdo + (northing - self.false_northing) / self.scale;

        // Footpoint latitude: first estimate from the equatorial radius of
        // curvature, then a fixed-point refinement. Five passes are enough
        // for double precision.
        let mut sr = self.sphsr(0.0);
        let mut ftphi = tmd / sr;
        for _ in 0..5 {
            let t10 = self.sphtmd(ftphi);
            sr = self.sphsr(ftphi);
            ftphi += (tmd - t10) / sr;
        }

        sr = self.sphsr(ftphi);
        let sn = self.sphsn(ftphi);

        let c = ftphi.cos();
        let t = ftphi.tan();
        let tan2 = t * t;
        let tan4 = tan2 * tan2;
        let eta = self.ebs * c * c;
        let eta2 = eta * eta;
        let eta3 = eta2 * eta;
        let eta4 = eta3 * eta;
        let mut de = easting - self.false_easting;
        if de.abs() < 0.0001 {
            de = 0.0;
        }

        let t10 = t / (2.0 * sr * sn * self.scale.powi(2));
        let t11 = t * (5.0 + 3.0 * tan2 + eta - 4.0 * eta.powi(2) - 9.0 * tan2 * eta)
            / (24.0 * sr * sn.powi(3) * self.scale.powi(4));
        let t12 = t
            * (61.0 + 90.0 * tan2 + 46.0 * eta + 45.0 * tan4 - 252.0 * tan2 * eta - 3.0 * eta2
                + 100.0 * eta3
                - 66.0 * tan2 * eta2
                - 90.0 * tan4 * eta
                + 88.0 * eta4
                + 225.0 * tan4 * eta2
                + 84.0 * tan2 * eta3
                - 192.0 * tan2 * eta4)
            / (720.0 * sr * sn.powi(5) * self.scale.powi(6));
        let t13 = t * (1385.0 + 3633.0 * tan2 + 4095.0 * tan4 + 1575.0 * t.powi(6))
            / (40320.0 * sr * sn.powi(7) * self.scale.powi(8));
        let lat =
            ftphi - de.powi(2) * t10 + de.powi(4) * t11 - de.powi(6) * t12 + de.powi(8) * t13;

        let t14 = 1.0 / (sn * c * self.scale);
        let t15 = (1.0 + 2.0 * tan2 + eta) / (6.0 * sn.powi(3) * c * self.scale.powi(3));
        let t16 = (5.0 + 6.0 * eta + 28.0 * tan2 - 3.0 * eta2 + 8.0 * tan2 * eta + 24.0 * tan4
            - 4.0 * eta3
            + 4.0 * tan2 * eta2
            + 24.0 * tan2 * eta3)
            / (120.0 * sn.powi(5) * c * self.scale.powi(5));
        let t17 = (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * t.powi(6))
            / (5040.0 * sn.powi(7) * c * self.scale.powi(7));

        let dlam = de * t14 - de.powi(3) * t15 + de.powi(5) * t16 - de.powi(7) * t17;
        let mut lon = self.origin_lon + dlam;

        if lat.abs() > PI / 2.0 {
            return Err(Error::InvalidNorthing(northing));
        }
        if lon > PI {
            lon -= TWO_PI;
            if lon.abs() > PI {
                return Err(Error::InvalidEasting(easting));
            }
        }

        let warning = if dlam.abs() > DISTORTION_LON * lat.cos() {
            Some(Warning::LongitudeDistortion)
        } else {
            None
        };

        Ok(Converted::flagged((lat, lon), warning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm_zone_31() -> TransverseMercator {
        TransverseMercator::new(
            &Ellipsoid::WGS84,
            0.0,
            3.0_f64.to_radians(),
            500_000.0,
            0.0,
            0.9996,
        )
        .unwrap()
    }

    #[test]
    fn roundtrip_mid_latitude() {
        let tm = utm_zone_31();
        let lat = 52.2_f64.to_radians();
        let lon = 4.9_f64.to_radians();
        let (e, n) = *tm.project(lat, lon).unwrap().value();
        let (lat2, lon2) = *tm.unproject(e, n).unwrap().value();
        assert!((lat - lat2).abs() < 1e-10);
        assert!((lon - lon2).abs() < 1e-10);
    }

    #[test]
    fn central_meridian_maps_to_false_easting() {
        let tm = utm_zone_31();
        let converted = tm.project(10.0_f64.to_radians(), 3.0_f64.to_radians()).unwrap();
        let (e, _) = *converted.value();
        assert!((e - 500_000.0).abs() < 1e-6);
        assert!(!converted.has_warning());
    }

    #[test]
    fn distortion_warning_far_from_meridian() {
        let tm = utm_zone_31();
        let converted = tm.project(10.0_f64.to_radians(), 13.0_f64.to_radians()).unwrap();
        assert_eq!(converted.warning(), Some(Warning::LongitudeDistortion));
    }

    #[test]
    fn rejects_out_of_wedge_longitude() {
        let tm = utm_zone_31();
        assert!(tm.project(0.0, 110.0_f64.to_radians()).is_err());
    }

    #[test]
    fn wedge_check_wraps_at_date_line() {
        let tm = TransverseMercator::new(
            &Ellipsoid::WGS84,
            0.0,
            177.0_f64.to_radians(),
            500_000.0,
            0.0,
            0.9996,
        )
        .unwrap();
        // 171°W is 12° east of a 177°E meridian once wrapped.
        let converted = tm.project(10.0_f64.to_radians(), (-171.0_f64).to_radians()).unwrap();
        assert_eq!(converted.warning(), Some(Warning::LongitudeDistortion));
    }

    #[test]
    fn rejects_bad_parameters() {
        let e = Ellipsoid::WGS84;
        assert!(TransverseMercator::new(&e, 0.0, 0.0, 0.0, 0.0, 0.2).is_err());
        assert!(TransverseMercator::new(&e, 90.0_f64.to_radians(), 0.0, 0.0, 0.0, 1.0).is_err());
        assert!(TransverseMercator::new(&e, 0.0, 7.0, 0.0, 0.0, 1.0).is_err());
    }
}
