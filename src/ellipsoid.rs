//! Reference ellipsoid model: two scalars, everything else derived.

use crate::Error;

/// A reference ellipsoid, defined by its semi-major axis in meters and its
/// flattening. Constructed once and shared by reference across conversions;
/// never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    a: f64,
    f: f64,
}

impl Ellipsoid {
    /// The WGS 84 ellipsoid, the default for every grid in this crate.
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257223563,
    };

    /// The Clarke 1866 ellipsoid, used by the legacy NAD27 datum.
    pub const CLARKE_1866: Ellipsoid = Ellipsoid {
        a: 6_378_206.4,
        f: 1.0 / 294.9786982,
    };

    /// Builds an ellipsoid without checking the parameters. Prefer
    /// [`Ellipsoid::create`] for values that do not come from a trusted
    /// constant.
    pub const fn new(semi_major_axis: f64, flattening: f64) -> Ellipsoid {
        Ellipsoid {
            a: semi_major_axis,
            f: flattening,
        }
    }

    /// Builds an ellipsoid, validating that the semi-major axis is positive
    /// and the inverse flattening lies in the accepted [250, 350] window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSemiMajorAxis`] or [`Error::InvalidFlattening`].
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::Ellipsoid;
    ///
    /// let grs80 = Ellipsoid::create(6_378_137.0, 1.0 / 298.257222101);
    /// assert!(grs80.is_ok());
    ///
    /// let sphere = Ellipsoid::create(6_371_000.0, 0.0);
    /// assert!(sphere.is_err());
    /// ```
    pub fn create(semi_major_axis: f64, flattening: f64) -> Result<Ellipsoid, Error> {
        let ellipsoid = Ellipsoid::new(semi_major_axis, flattening);
        ellipsoid.validate()?;
        Ok(ellipsoid)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.a <= 0.0 {
            return Err(Error::InvalidSemiMajorAxis(self.a));
        }
        let inv_f = 1.0 / self.f;
        if !(250.0..=350.0).contains(&inv_f) {
            return Err(Error::InvalidFlattening(inv_f));
        }
        Ok(())
    }

    pub const fn semi_major_axis(&self) -> f64 {
        self.a
    }

    pub const fn flattening(&self) -> f64 {
        self.f
    }

    pub fn inverse_flattening(&self) -> f64 {
        1.0 / self.f
    }

    /// Semi-minor axis: `a * (1 - f)`.
    pub fn semi_minor_axis(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// First eccentricity squared: `2f - f²`.
    pub fn eccentricity_squared(&self) -> f64 {
        2.0 * self.f - self.f * self.f
    }

    /// Second eccentricity squared: `e² / (1 - e²)`.
    pub fn second_eccentricity_squared(&self) -> f64 {
        1.0 / (1.0 - self.eccentricity_squared()) - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wgs84_derived_values() {
        let e = Ellipsoid::WGS84;
        assert!((e.eccentricity_squared() - 0.00669437999014138).abs() < 1e-15);
        assert!((e.second_eccentricity_squared() - 0.0067394967565869).abs() < 1e-13);
        assert!((e.semi_minor_axis() - 6_356_752.314245179).abs() < 1e-6);
    }

    #[test]
    fn validation_windows() {
        assert!(Ellipsoid::create(0.0, 1.0 / 298.0).is_err());
        assert!(Ellipsoid::create(6_378_137.0, 1.0 / 200.0).is_err());
        assert!(Ellipsoid::create(6_378_137.0, 1.0 / 400.0).is_err());
        assert!(Ellipsoid::WGS84.validate().is_ok());
        assert!(Ellipsoid::CLARKE_1866.validate().is_ok());
    }
}
