//! MGRS grid references.
//!
//! An MGRS reference is a fixed-precision serialization of a UTM or UPS
//! coordinate: zone digits (absent for polar references), a latitude-band or
//! polar-quadrant letter, two 100 km square letters, and 0–5 digits per axis.
//! The letters I and O are never used, to avoid confusion with 1 and 0; every
//! letter lookup below goes through explicit alphabets with those two
//! removed, so encode and decode share one skip rule.

use std::fmt::Display;

use crate::{
    geodetic::{GeodeticPosition, Hemisphere},
    ups::UpsCoord,
    utility::round_half_up,
    utm::UtmCoord,
    Converted, Error, ParseCoord, Warning,
};

pub(crate) const MAX_PRECISION: usize = 5;
/// UTM covers [-80°, 84°]; anything outside is gridded through UPS.
const MIN_UTM_LAT_DEG: f64 = -80.0;
const MAX_UTM_LAT_DEG: f64 = 84.0;
/// Side of a 100 km grid square, meters.
const ONEHT: f64 = 100_000.0;
/// Period of the UTM row-letter cycle, meters.
const TWOMIL: f64 = 2_000_000.0;
const MIN_EAST_NORTH: f64 = 0.0;
const MAX_EAST_NORTH: f64 = 4_000_000.0;

/// Latitude band letters, C..X.
const LATITUDE_BAND_LETTERS: &str = "CDEFGHJKLMNPQRSTUVWX";
/// 100 km column letters per zone set; sets cycle with `(zone - 1) % 3`.
const UTM_COLUMNS: [&str; 3] = ["ABCDEFGH", "JKLMNPQR", "STUVWXYZ"];
/// 100 km row letters; the cycle repeats every 2,000 km.
const UTM_ROWS: &str = "ABCDEFGHJKLMNPQRSTUV";
const UPS_ROWS_SOUTH: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
const UPS_ROWS_NORTH: &str = "ABCDEFGHJKLMNP";

/// One row of the latitude band table. Northing values are meters, latitude
/// bounds are degrees.
struct LatitudeBand {
    letter: char,
    /// Minimum northing for the band.
    min_northing: f64,
    /// Latitude bounds of the band.
    north: f64,
    south: f64,
    /// Keeps the row lettering continuous across the band seam.
    northing_offset: f64,
}

#[rustfmt::skip]
const LATITUDE_BANDS: [LatitudeBand; 20] = [
    LatitudeBand { letter: 'C', min_northing: 1_100_000.0, north: -72.0, south: -80.5, northing_offset: 0.0 },
    LatitudeBand { letter: 'D', min_northing: 2_000_000.0, north: -64.0, south: -72.0, northing_offset: 2_000_000.0 },
    LatitudeBand { letter: 'E', min_northing: 2_800_000.0, north: -56.0, south: -64.0, northing_offset: 2_000_000.0 },
    LatitudeBand { letter: 'F', min_northing: 3_700_000.0, north: -48.0, south: -56.0, northing_offset: 2_000_000.0 },
    LatitudeBand { letter: 'G', min_northing: 4_600_000.0, north: -40.0, south: -48.0, northing_offset: 4_000_000.0 },
    LatitudeBand { letter: 'H', min_northing: 5_500_000.0, north: -32.0, south: -40.0, northing_offset: 4_000_000.0 },
    LatitudeBand { letter: 'J', min_northing: 6_400_000.0, north: -24.0, south: -32.0, northing_offset: 6_000_000.0 },
    LatitudeBand { letter: 'K', min_northing: 7_300_000.0, north: -16.0, south: -24.0, northing_offset: 6_000_000.0 },
    LatitudeBand { letter: 'L', min_northing: 8_200_000.0, north: -8.0, south: -16.0, northing_offset: 8_000_000.0 },
    LatitudeBand { letter: 'M', min_northing: 9_100_000.0, north: 0.0, south: -8.0, northing_offset: 8_000_000.0 },
    LatitudeBand { letter: 'N', min_northing: 0.0, north: 8.0, south: 0.0, northing_offset: 0.0 },
    LatitudeBand { letter: 'P', min_northing: 800_000.0, north: 16.0, south: 8.0, northing_offset: 0.0 },
    LatitudeBand { letter: 'Q', min_northing: 1_700_000.0, north: 24.0, south: 16.0, northing_offset: 0.0 },
    LatitudeBand { letter: 'R', min_northing: 2_600_000.0, north: 32.0, south: 24.0, northing_offset: 2_000_000.0 },
    LatitudeBand { letter: 'S', min_northing: 3_500_000.0, north: 40.0, south: 32.0, northing_offset: 2_000_000.0 },
    LatitudeBand { letter: 'T', min_northing: 4_400_000.0, north: 48.0, south: 40.0, northing_offset: 4_000_000.0 },
    LatitudeBand { letter: 'U', min_northing: 5_300_000.0, north: 56.0, south: 48.0, northing_offset: 4_000_000.0 },
    LatitudeBand { letter: 'V', min_northing: 6_200_000.0, north: 64.0, south: 56.0, northing_offset: 6_000_000.0 },
    LatitudeBand { letter: 'W', min_northing: 7_000_000.0, north: 72.0, south: 64.0, northing_offset: 6_000_000.0 },
    LatitudeBand { letter: 'X', min_northing: 7_900_000.0, north: 84.5, south: 72.0, northing_offset: 6_000_000.0 },
];

/// One quadrant of the polar grid. Column/row strings enumerate the valid
/// letters in order, so indexing them applies the skip rules.
struct PolarQuadrant {
    band: char,
    columns: &'static str,
    rows: &'static str,
    false_easting: f64,
    false_northing: f64,
}

#[rustfmt::skip]
const POLAR_QUADRANTS: [PolarQuadrant; 4] = [
    PolarQuadrant { band: 'A', columns: "JKLPQRSTUXYZ", rows: UPS_ROWS_SOUTH, false_easting: 800_000.0, false_northing: 800_000.0 },
    PolarQuadrant { band: 'B', columns: "ABCFGHJKLPQR", rows: UPS_ROWS_SOUTH, false_easting: 2_000_000.0, false_northing: 800_000.0 },
    PolarQuadrant { band: 'Y', columns: "JKLPQRSTUXYZ", rows: UPS_ROWS_NORTH, false_easting: 800_000.0, false_northing: 1_300_000.0 },
    PolarQuadrant { band: 'Z', columns: "ABCFGHJ", rows: UPS_ROWS_NORTH, false_easting: 2_000_000.0, false_northing: 1_300_000.0 },
];

fn quadrant_for(band: char) -> Option<&'static PolarQuadrant> {
    POLAR_QUADRANTS.iter().find(|quadrant| quadrant.band == band)
}

/// Row-letter offset for a zone's set: even sets start their lettering half a
/// cycle in.
fn row_false_northing(zone: u8) -> f64 {
    let set = match zone % 6 {
        0 => 6,
        set => set,
    };
    if set % 2 == 0 {
        500_000.0
    } else {
        0.0
    }
}

/// Band index (0 = C .. 19 = X) for a latitude in radians.
fn latitude_band_index(lat: f64) -> Result<usize, Error> {
    let lat_deg = lat.to_degrees();
    if (72.0..84.5).contains(&lat_deg) {
        Ok(19)
    } else if lat_deg > -80.5 && lat_deg < 72.0 {
        Ok(((lat_deg + 80.0) / 8.0 + 1.0e-12) as usize)
    } else {
        Err(Error::InvalidLatitude(lat_deg))
    }
}

fn validate_precision(precision: usize) -> Result<(), Error> {
    if precision > MAX_PRECISION {
        return Err(Error::InvalidPrecision(precision));
    }
    Ok(())
}

/// Snaps a meter value onto the grid implied by the precision, rounding
/// half-up.
fn snap_to_precision(value: f64, precision: usize) -> f64 {
    let divisor = 10f64.powi((MAX_PRECISION - precision) as i32);
    round_half_up(value / divisor) * divisor
}

/// Right-aligns a digit group to the requested precision.
fn right_aligned(value: u64, precision: usize) -> String {
    if precision == 0 {
        return String::new();
    }
    let digits = value.to_string();
    if digits.len() > precision {
        // Legacy formatting quirk, kept for wire compatibility: the overflow
        // branch drops one more character than the precision calls for.
        digits[..precision - 1].to_string()
    } else {
        format!("{digits:0>precision$}")
    }
}

/// An MGRS grid reference, held as its parsed components. A zone of 0 marks
/// a polar (UPS-gridded) reference. Easting/northing are the meter
/// remainders within the reference's 100 km square; round-tripping through
/// the string form keeps only `precision` digits of them by design.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mgrs {
    pub(crate) zone: u8,
    pub(crate) band: char,
    pub(crate) column: char,
    pub(crate) row: char,
    pub(crate) easting: u32,
    pub(crate) northing: u32,
    pub(crate) precision: usize,
}

impl Mgrs {
    /// Tries to create a reference from its components. Letter validity for
    /// the zone is only checked when converting, as when parsing.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the zone, letters, remainders, or precision
    /// are out of range.
    pub fn create(
        zone: u8,
        band: char,
        column: char,
        row: char,
        easting: u32,
        northing: u32,
        precision: usize,
    ) -> Result<Mgrs, Error> {
        if zone > 60 {
            return Err(Error::InvalidZone(i32::from(zone)));
        }
        for letter in [band, column, row] {
            if !letter.is_ascii_uppercase() || letter == 'I' || letter == 'O' {
                return Err(Error::InvalidMgrs(format!(
                    "letter {letter} is not a valid MGRS letter"
                )));
            }
        }
        if easting >= ONEHT as u32 {
            return Err(Error::InvalidEasting(f64::from(easting)));
        }
        if northing >= ONEHT as u32 {
            return Err(Error::InvalidNorthing(f64::from(northing)));
        }
        validate_precision(precision)?;
        Ok(Mgrs {
            zone,
            band,
            column,
            row,
            easting,
            northing,
            precision,
        })
    }

    /// Zone number, 0 for polar references.
    pub fn zone(&self) -> u8 {
        self.zone
    }

    /// Latitude band letter (C–X), or polar quadrant letter (A/B/Y/Z).
    pub fn band(&self) -> char {
        self.band
    }

    /// First 100 km square letter (easting).
    pub fn column(&self) -> char {
        self.column
    }

    /// Second 100 km square letter (northing).
    pub fn row(&self) -> char {
        self.row
    }

    /// Easting remainder within the 100 km square, meters.
    pub fn easting(&self) -> u32 {
        self.easting
    }

    /// Northing remainder within the 100 km square, meters.
    pub fn northing(&self) -> u32 {
        self.northing
    }

    /// Digits kept per axis: 0 (100 km) to 5 (1 m).
    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn is_polar(&self) -> bool {
        self.zone == 0
    }

    /// Parses a reference string; see [`ParseCoord`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMgrs`] for a malformed string.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::Mgrs;
    ///
    /// let mgrs = Mgrs::parse_str("18TWL8566411315").unwrap();
    /// assert_eq!(mgrs.zone(), 18);
    /// assert_eq!(mgrs.precision(), 5);
    /// assert_eq!(mgrs.to_string(), "18TWL 85664 11315");
    ///
    /// // Polar references carry no zone digits.
    /// let polar = Mgrs::parse_str("ZAH 00000 00000").unwrap();
    /// assert!(polar.is_polar());
    /// ```
    pub fn parse_str(value: &str) -> Result<Mgrs, Error> {
        Mgrs::parse_coord(value)
    }

    /// Encodes a geodetic position, gridding through UTM inside its latitude
    /// coverage and through UPS on the polar caps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] for precision above 5, or an
    /// input-range error if the position cannot be gridded.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::{GeodeticPosition, Mgrs};
    ///
    /// let coord = GeodeticPosition::from_degrees(0.0, 0.0).unwrap();
    /// let mgrs = Mgrs::from_geodetic(&coord, 5).unwrap();
    /// assert_eq!(mgrs.to_string(), "31NAA 66021 00000");
    ///
    /// // Coarser precisions round onto their grid before lettering.
    /// let mgrs = Mgrs::from_geodetic(&coord, 1).unwrap();
    /// assert_eq!(mgrs.to_string(), "31NAA 7 0");
    /// ```
    pub fn from_geodetic(position: &GeodeticPosition, precision: usize) -> Result<Mgrs, Error> {
        validate_precision(precision)?;
        let lat_deg = position.latitude();
        if !(MIN_UTM_LAT_DEG..=MAX_UTM_LAT_DEG).contains(&lat_deg) {
            let ups = UpsCoord::from_geodetic(position)?;
            Mgrs::from_ups(&ups, precision)
        } else {
            let utm = UtmCoord::from_geodetic(position)?;
            encode_utm(
                utm.zone(),
                position.latitude_radians(),
                utm.easting(),
                utm.northing(),
                precision,
            )
        }
    }

    /// Encodes a UPS coordinate as a polar reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] for precision above 5, or an
    /// input-range error for coordinates off the polar grid.
    pub fn from_ups(ups: &UpsCoord, precision: usize) -> Result<Mgrs, Error> {
        validate_precision(precision)?;
        if !(MIN_EAST_NORTH..=MAX_EAST_NORTH).contains(&ups.easting()) {
            return Err(Error::InvalidEasting(ups.easting()));
        }
        if !(MIN_EAST_NORTH..=MAX_EAST_NORTH).contains(&ups.northing()) {
            return Err(Error::InvalidNorthing(ups.northing()));
        }

        let easting = snap_to_precision(ups.easting(), precision);
        let northing = snap_to_precision(ups.northing(), precision);

        let band = match (ups.hemisphere(), easting >= TWOMIL) {
            (Hemisphere::North, true) => 'Z',
            (Hemisphere::North, false) => 'Y',
            (Hemisphere::South, true) => 'B',
            (Hemisphere::South, false) => 'A',
        };
        let quadrant = quadrant_for(band).expect("every polar band has a quadrant entry");

        let column_count = ((easting - quadrant.false_easting) / ONEHT).floor() as i64;
        let column = usize::try_from(column_count)
            .ok()
            .and_then(|index| quadrant.columns.as_bytes().get(index))
            .copied()
            .ok_or(Error::InvalidEasting(ups.easting()))? as char;

        let row_count = ((northing - quadrant.false_northing) / ONEHT).floor() as i64;
        let row = usize::try_from(row_count)
            .ok()
            .and_then(|index| quadrant.rows.as_bytes().get(index))
            .copied()
            .ok_or(Error::InvalidNorthing(ups.northing()))? as char;

        Ok(Mgrs {
            zone: 0,
            band,
            column,
            row,
            easting: (easting % ONEHT) as u32,
            northing: (northing % ONEHT) as u32,
            precision,
        })
    }

    /// Reconstructs the UTM coordinate this reference abbreviates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMgrs`] for polar references or letters that
    /// are not valid for the zone.
    pub fn to_utm(&self) -> Result<UtmCoord, Error> {
        if self.is_polar() {
            return Err(Error::InvalidMgrs(
                "a polar reference has no UTM form".to_string(),
            ));
        }
        let band_index = self.band_index()?;

        // Zones 32, 34 and 36 are swallowed by their neighbors in band X.
        if self.band == 'X' && matches!(self.zone, 32 | 34 | 36) {
            return Err(Error::InvalidMgrs(format!(
                "zone {} does not exist in band X",
                self.zone
            )));
        }

        // Bands C through M lie south of the equator.
        let hemisphere = if band_index <= 9 {
            Hemisphere::South
        } else {
            Hemisphere::North
        };

        let columns = UTM_COLUMNS[((self.zone - 1) % 3) as usize];
        let column_position = columns.find(self.column).ok_or_else(|| {
            Error::InvalidMgrs(format!(
                "column letter {} is not valid in zone {}",
                self.column, self.zone
            ))
        })?;
        let row_position = self.row_position(UTM_ROWS)?;

        let grid_easting = (column_position as f64 + 1.0) * ONEHT;

        let band = &LATITUDE_BANDS[band_index];
        let mut grid_northing = row_position as f64 * ONEHT;
        grid_northing -= row_false_northing(self.zone);
        if grid_northing < 0.0 {
            grid_northing += TWOMIL;
        }
        grid_northing += band.northing_offset;
        if grid_northing < band.min_northing {
            grid_northing += TWOMIL;
        }

        UtmCoord::create(
            self.zone,
            hemisphere,
            grid_easting + f64::from(self.easting),
            grid_northing + f64::from(self.northing),
        )
    }

    /// Reconstructs the UPS coordinate a polar reference abbreviates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMgrs`] for zoned references or letters that
    /// are not valid for the quadrant.
    pub fn to_ups(&self) -> Result<UpsCoord, Error> {
        if !self.is_polar() {
            return Err(Error::InvalidMgrs(
                "a zoned reference has no UPS form".to_string(),
            ));
        }
        let quadrant = quadrant_for(self.band).ok_or_else(|| {
            Error::InvalidMgrs(format!("{} is not a polar quadrant letter", self.band))
        })?;
        let hemisphere = match self.band {
            'Y' | 'Z' => Hemisphere::North,
            _ => Hemisphere::South,
        };

        let column_position = quadrant.columns.find(self.column).ok_or_else(|| {
            Error::InvalidMgrs(format!(
                "column letter {} is not valid in quadrant {}",
                self.column, self.band
            ))
        })?;
        let row_position = self.row_position(quadrant.rows)?;

        let grid_easting = column_position as f64 * ONEHT + quadrant.false_easting;
        let grid_northing = row_position as f64 * ONEHT + quadrant.false_northing;

        UpsCoord::create(
            hemisphere,
            grid_easting + f64::from(self.easting),
            grid_northing + f64::from(self.northing),
        )
    }

    /// Recovers the geodetic position at this reference's grid corner. The
    /// result carries [`Warning::LatitudeBandMismatch`] when the position
    /// falls outside the claimed latitude band (beyond a precision-dependent
    /// tolerance) — the usual sign of a transposed reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMgrs`] if the letters are not valid for the
    /// zone, or an input-range error if the reconstructed coordinate is off
    /// the grid.
    ///
    /// # Usage
    ///
    /// ```
    /// use geocoords::Mgrs;
    ///
    /// let mgrs = Mgrs::parse_str("18TWL 85664 11315").unwrap();
    /// let position = mgrs.to_geodetic().unwrap();
    ///
    /// assert!(!position.has_warning());
    /// assert!((position.value().latitude() - 40.748333).abs() < 1e-4);
    /// assert!((position.value().longitude() - -73.985278).abs() < 1e-4);
    /// ```
    pub fn to_geodetic(&self) -> Result<Converted<GeodeticPosition>, Error> {
        if self.is_polar() {
            let position = self.to_ups()?.to_geodetic()?;
            return Ok(Converted::clean(position));
        }

        let band = &LATITUDE_BANDS[self.band_index()?];
        let inverse = self.to_utm()?.to_geodetic()?;
        let position = *inverse.value();

        let tolerance = 1.0_f64.to_radians() / 10f64.powi(self.precision as i32);
        let south = band.south.to_radians() - tolerance;
        let north = band.north.to_radians() + tolerance;
        let lat = position.latitude_radians();
        let warning = if lat < south || lat > north {
            Some(Warning::LatitudeBandMismatch)
        } else {
            inverse.warning()
        };
        Ok(Converted::flagged(position, warning))
    }

    fn band_index(&self) -> Result<usize, Error> {
        LATITUDE_BAND_LETTERS.find(self.band).ok_or_else(|| {
            Error::InvalidMgrs(format!("{} is not a latitude band letter", self.band))
        })
    }

    fn row_position(&self, rows: &str) -> Result<usize, Error> {
        rows.find(self.row).ok_or_else(|| {
            Error::InvalidMgrs(format!("row letter {} is not valid here", self.row))
        })
    }
}

/// Encodes a UTM coordinate, using the latitude for the band letter.
fn encode_utm(
    zone: u8,
    lat: f64,
    easting: f64,
    northing: f64,
    precision: usize,
) -> Result<Mgrs, Error> {
    let easting = snap_to_precision(easting, precision);
    let northing = snap_to_precision(northing, precision);

    let band_index = latitude_band_index(lat)?;
    let band = LATITUDE_BANDS[band_index].letter;

    let mut grid_northing = northing;
    if grid_northing == 10_000_000.0 {
        grid_northing -= 1.0;
    }
    while grid_northing >= TWOMIL {
        grid_northing -= TWOMIL;
    }
    grid_northing += row_false_northing(zone);
    if grid_northing >= TWOMIL {
        grid_northing -= TWOMIL;
    }
    let row = UTM_ROWS.as_bytes()[(grid_northing / ONEHT) as usize] as char;

    let mut grid_easting = easting;
    if band == 'V' && zone == 31 && grid_easting == 500_000.0 {
        // 31V pinches to nothing at this meridian; step one meter back in.
        grid_easting -= 1.0;
    }
    let columns = UTM_COLUMNS[((zone - 1) % 3) as usize];
    let column_index = (grid_easting / ONEHT) as i64 - 1;
    let column = usize::try_from(column_index)
        .ok()
        .and_then(|index| columns.as_bytes().get(index))
        .copied()
        .ok_or(Error::InvalidEasting(easting))? as char;

    Ok(Mgrs {
        zone,
        band,
        column,
        row,
        easting: (easting % ONEHT) as u32,
        northing: (northing % ONEHT) as u32,
        precision,
    })
}

impl ParseCoord for Mgrs {
    fn parse_coord(value: &str) -> Result<Mgrs, Error> {
        let cleaned: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        let bytes = cleaned.as_bytes();

        let mut i = 0;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i > 2 {
            return Err(Error::InvalidMgrs(format!(
                "more than 2 zone digits at the start of {cleaned}"
            )));
        }
        // No zone digits is not an error: it marks a polar reference.
        let zone = if i > 0 {
            let zone: u8 = cleaned[..i]
                .parse()
                .expect("1-2 decimal digits fit in a u8");
            if !(1..=60).contains(&zone) {
                return Err(Error::InvalidMgrs(format!("zone {zone} is not in [1, 60]")));
            }
            zone
        } else {
            0
        };

        let letters_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        if i - letters_start != 3 {
            return Err(Error::InvalidMgrs(format!(
                "expected 3 letters after the zone in {cleaned}"
            )));
        }
        let band = bytes[letters_start] as char;
        let column = bytes[letters_start + 1] as char;
        let row = bytes[letters_start + 2] as char;
        for letter in [band, column, row] {
            if letter == 'I' || letter == 'O' {
                return Err(Error::InvalidMgrs(format!(
                    "the letter {letter} is never used in MGRS"
                )));
            }
        }

        let digits = &cleaned[i..];
        if digits.bytes().any(|b| !b.is_ascii_digit()) {
            return Err(Error::InvalidMgrs(format!(
                "trailing non-digits in {cleaned}"
            )));
        }
        if digits.len() % 2 != 0 {
            return Err(Error::InvalidMgrs(format!(
                "odd number of position digits in {cleaned}"
            )));
        }
        let precision = digits.len() / 2;
        validate_precision(precision).map_err(|_| {
            Error::InvalidMgrs(format!("more than 10 position digits in {cleaned}"))
        })?;

        let (easting, northing) = if precision > 0 {
            let multiplier = 10u32.pow((MAX_PRECISION - precision) as u32);
            let easting: u32 = digits[..precision]
                .parse()
                .expect("at most 5 decimal digits fit in a u32");
            let northing: u32 = digits[precision..]
                .parse()
                .expect("at most 5 decimal digits fit in a u32");
            (easting * multiplier, northing * multiplier)
        } else {
            (0, 0)
        };

        Ok(Mgrs {
            zone,
            band,
            column,
            row,
            easting,
            northing,
            precision,
        })
    }
}

impl Display for Mgrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_polar() {
            write!(f, "{:02}", self.zone)?;
        }
        write!(f, "{}{}{}", self.band, self.column, self.row)?;
        if self.precision > 0 {
            let divisor = 10u32.pow((MAX_PRECISION - self.precision) as u32);
            write!(
                f,
                " {} {}",
                right_aligned(u64::from(self.easting / divisor), self.precision),
                right_aligned(u64::from(self.northing / divisor), self.precision),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_overflow_truncation_is_preserved() {
        // A digit group wider than the precision keeps precision - 1
        // characters, matching the reference implementation byte for byte.
        assert_eq!(right_aligned(100_000, 5), "1000");
        assert_eq!(right_aligned(100, 2), "1");
        // The normal path zero-pads on the left.
        assert_eq!(right_aligned(7, 3), "007");
        assert_eq!(right_aligned(0, 0), "");
    }

    #[test]
    fn parse_rejects_malformed_references() {
        assert!(Mgrs::parse_str("123TWL12341234").is_err()); // 3 zone digits
        assert!(Mgrs::parse_str("61TWL12341234").is_err()); // zone out of range
        assert!(Mgrs::parse_str("18TW").is_err()); // missing row letter
        assert!(Mgrs::parse_str("18TIL12341234").is_err()); // letter I
        assert!(Mgrs::parse_str("18TWL123412345").is_err()); // odd digits
        assert!(Mgrs::parse_str("18TWL123456123456").is_err()); // too many digits
        assert!(Mgrs::parse_str("18TWL1234x234").is_err()); // stray letter
    }

    #[test]
    fn parse_is_case_and_space_insensitive() {
        let reference = Mgrs::parse_str("18TWL8566411315").unwrap();
        assert_eq!(Mgrs::parse_str(" 18 twl 85664 11315 ").unwrap(), reference);
    }

    #[test]
    fn zone_set_tables_cycle() {
        assert_eq!(row_false_northing(1), 0.0);
        assert_eq!(row_false_northing(18), 500_000.0);
        assert_eq!(row_false_northing(60), 500_000.0);
        assert_eq!(row_false_northing(31), 0.0);
    }

    #[test]
    fn band_x_swallowed_zones_are_rejected() {
        for zone in [32, 34, 36] {
            let mgrs = Mgrs::create(zone, 'X', 'S', 'A', 0, 0, 0).unwrap();
            assert!(mgrs.to_utm().is_err(), "zone {zone}");
        }
        let mgrs = Mgrs::create(33, 'X', 'S', 'A', 0, 0, 0).unwrap();
        assert!(mgrs.to_utm().is_ok());
    }

    #[test]
    fn band_mismatch_is_a_warning_not_an_error() {
        // 18TWL is around 40.7°N; relabelling it 18UWL claims 48–56°N.
        let tampered = Mgrs::parse_str("18UWL8566411315").unwrap();
        let converted = tampered.to_geodetic().unwrap();
        assert_eq!(converted.warning(), Some(Warning::LatitudeBandMismatch));
    }

    #[test]
    fn polar_quadrant_letters() {
        // South pole: B quadrant, AN square.
        let pole = GeodeticPosition::from_degrees(-90.0, 0.0).unwrap();
        let mgrs = Mgrs::from_geodetic(&pole, 5).unwrap();
        assert_eq!(mgrs.to_string(), "BAN 00000 00000");
    }

    #[test]
    fn precision_zero_renders_square_only() {
        let coord = GeodeticPosition::from_degrees(40.748333, -73.985278).unwrap();
        let mgrs = Mgrs::from_geodetic(&coord, 0).unwrap();
        // Rounding to the 100 km grid carries the easting into the X column.
        assert_eq!(mgrs.to_string(), "18TXL");
    }
}
