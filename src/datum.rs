//! Datum shifts between reference ellipsoids.

use crate::{ellipsoid::Ellipsoid, geodetic::GeodeticPosition};

/// A three-parameter datum translation, meters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatumShift {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

/// Translation applied when going from WGS 84 to NAD27.
const WGS84_TO_NAD27: DatumShift = DatumShift {
    dx: -12.0,
    dy: 130.0,
    dz: 190.0,
};

/// Shifts a position between two datums with the abridged Molodensky
/// formulas: the latitude, longitude and height corrections are computed
/// from the translation, the meridional and normal radii of curvature, and
/// the equatorial-radius and flattening differences between the ellipsoids,
/// then subtracted from the input.
///
/// The correction terms are evaluated on the target ellipsoid.
pub fn molodensky_shift(
    position: &GeodeticPosition,
    from: &Ellipsoid,
    to: &Ellipsoid,
    shift: DatumShift,
) -> GeodeticPosition {
    let lat = position.latitude_radians();
    let lon = position.longitude_radians();

    let a = to.semi_major_axis();
    let b = to.semi_minor_axis();
    let f = to.flattening();
    let e2 = to.eccentricity_squared();
    let dif_a = from.semi_major_axis() - to.semi_major_axis();
    let dif_f = from.flattening() - to.flattening();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let sin_lon = lon.sin();
    let cos_lon = lon.cos();

    // Normal and meridional radii of curvature.
    let rn = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let rm = a * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5);

    let err_lon = (-shift.dx * sin_lon + shift.dy * cos_lon) / (rn * cos_lat);
    let err_lat = (-shift.dx * sin_lat * cos_lon - shift.dy * sin_lat * sin_lon
        + shift.dz * cos_lat
        + dif_a * (rn * e2 * sin_lat * cos_lat) / a
        + dif_f * (rm * a / b + rn * b / a) * sin_lat * cos_lat)
        / rm;
    let err_height = shift.dx * cos_lat * cos_lon
        + shift.dy * cos_lat * sin_lon
        + shift.dz * sin_lat
        + (a * dif_f + f * dif_a) * sin_lat * sin_lat
        - dif_a;

    GeodeticPosition::new(lat - err_lat, lon - err_lon)
        .with_height(position.height() - err_height)
}

/// Shifts a WGS 84 position onto the legacy NAD27 datum (Clarke 1866).
pub fn wgs84_to_nad27(position: &GeodeticPosition) -> GeodeticPosition {
    molodensky_shift(
        position,
        &Ellipsoid::WGS84,
        &Ellipsoid::CLARKE_1866,
        WGS84_TO_NAD27,
    )
}

/// Shifts a NAD27 position onto WGS 84 by reversing the translation.
pub fn nad27_to_wgs84(position: &GeodeticPosition) -> GeodeticPosition {
    molodensky_shift(
        position,
        &Ellipsoid::CLARKE_1866,
        &Ellipsoid::WGS84,
        DatumShift {
            dx: -WGS84_TO_NAD27.dx,
            dy: -WGS84_TO_NAD27.dy,
            dz: -WGS84_TO_NAD27.dz,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_is_small_but_not_zero() {
        let position = GeodeticPosition::from_degrees(39.5, -105.1).unwrap();
        let shifted = wgs84_to_nad27(&position);
        let lat_moved = (shifted.latitude() - position.latitude()).abs();
        let lon_moved = (shifted.longitude() - position.longitude()).abs();
        // NAD27 differs from WGS 84 by tens to hundreds of meters in the
        // continental US.
        assert!(lat_moved > 1e-6 && lat_moved < 1e-2);
        assert!(lon_moved > 1e-6 && lon_moved < 1e-2);
    }

    #[test]
    fn reverse_shift_restores_the_position() {
        let position = GeodeticPosition::from_degrees(39.5, -105.1).unwrap().with_height(1600.0);
        let there_and_back = nad27_to_wgs84(&wgs84_to_nad27(&position));
        assert!((there_and_back.latitude() - position.latitude()).abs() < 1e-6);
        assert!((there_and_back.longitude() - position.longitude()).abs() < 1e-6);
        assert!((there_and_back.height() - position.height()).abs() < 0.1);
    }

    #[test]
    fn zero_shift_between_identical_ellipsoids_is_identity() {
        let position = GeodeticPosition::from_degrees(10.0, 20.0).unwrap();
        let shift = DatumShift { dx: 0.0, dy: 0.0, dz: 0.0 };
        let shifted = molodensky_shift(&position, &Ellipsoid::WGS84, &Ellipsoid::WGS84, shift);
        assert_eq!(shifted, position);
    }
}
