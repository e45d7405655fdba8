use geocoords::{
    Ellipsoid, GeodeticPosition, Hemisphere, Mgrs, TmCoord, TmParameters, UtmCoord, Warning,
};

fn position(lat: f64, lon: f64) -> GeodeticPosition {
    GeodeticPosition::from_degrees(lat, lon).unwrap()
}

#[test]
fn utm_roundtrip_over_the_grid() {
    // Latitudes inside UTM coverage, longitudes offset from the 6° zone
    // boundaries.
    let mut checked = 0;
    for lat_step in 0..23 {
        let lat = -79.0 + 7.2 * f64::from(lat_step);
        if lat > 79.0 {
            break;
        }
        for lon_step in 0..24 {
            let lon = -177.5 + 15.0 * f64::from(lon_step);
            let original = position(lat, lon);
            let utm = UtmCoord::from_geodetic(&original).unwrap();
            let recovered = utm.to_geodetic().unwrap().into_value();

            let lat_err = (recovered.latitude_radians() - original.latitude_radians()).abs();
            let lon_err = (recovered.longitude_radians() - original.longitude_radians()).abs();
            assert!(lat_err < 1e-9, "lat error {lat_err} at ({lat}, {lon})");
            assert!(lon_err < 1e-9, "lon error {lon_err} at ({lat}, {lon})");
            checked += 1;
        }
    }
    assert!(checked > 500);
}

#[test]
fn mgrs_roundtrip_error_tracks_precision() {
    let samples = [
        (40.748333, -73.985278),
        (-33.9249, 18.4241),
        (60.0, 5.0),
        (75.3, 24.9),
        (-74.37916, 155.02235),
        (0.001, 0.001),
        (87.2, -63.0),
        (-85.7, 111.0),
    ];
    for &(lat, lon) in &samples {
        let original = position(lat, lon);
        for precision in 0..=5 {
            let mgrs = original.to_mgrs(precision).unwrap();
            let recovered = mgrs.to_geodetic().unwrap().into_value();
            let bound = 0.75 * 10f64.powi(5 - precision as i32);
            let distance = original.haversine(&recovered);
            assert!(
                distance < bound,
                "({lat}, {lon}) at precision {precision}: {distance}m off, bound {bound}m"
            );
        }
    }
}

#[test]
fn mgrs_string_roundtrip_is_lossless() {
    let samples = [
        (40.748333, -73.985278),
        (-74.37916, 155.02235),
        (89.5, 10.0),
        (-81.0, -140.0),
    ];
    for &(lat, lon) in &samples {
        for precision in 0..=5 {
            let mgrs = position(lat, lon).to_mgrs(precision).unwrap();
            let reparsed = Mgrs::parse_str(&mgrs.to_string()).unwrap();
            assert_eq!(mgrs, reparsed, "({lat}, {lon}) precision {precision}");
        }
    }
}

#[test]
fn norway_and_svalbard_get_widened_zones() {
    assert_eq!(position(60.0, 5.0).to_utm().unwrap().zone(), 32);
    assert_eq!(position(56.5, 3.5).to_utm().unwrap().zone(), 32);
    assert_eq!(position(60.0, 1.0).to_utm().unwrap().zone(), 31);
    // The same longitudes away from the exception latitudes use the naive
    // zone.
    assert_eq!(position(50.0, 5.0).to_utm().unwrap().zone(), 31);
    // Svalbard's four widened zones.
    assert_eq!(position(78.0, 5.0).to_utm().unwrap().zone(), 31);
    assert_eq!(position(78.0, 12.0).to_utm().unwrap().zone(), 33);
    assert_eq!(position(78.0, 25.0).to_utm().unwrap().zone(), 35);
    assert_eq!(position(78.0, 39.0).to_utm().unwrap().zone(), 37);
}

#[test]
fn each_grid_rejects_the_others_latitudes() {
    assert!(position(87.0, 10.0).to_utm().is_err());
    assert!(position(-85.0, 10.0).to_utm().is_err());
    assert!(position(45.0, 10.0).to_ups().is_err());
    assert!(position(83.0, 10.0).to_ups().is_err());
    assert!(position(-79.0, 10.0).to_ups().is_err());
}

#[test]
fn mgrs_never_uses_i_or_o() {
    let mut lat = -79.6;
    while lat < 89.0 {
        let mut lon = -177.3;
        while lon < 180.0 {
            let mgrs = position(lat, lon).to_mgrs(5).unwrap().to_string();
            assert!(!mgrs.contains('I'), "{mgrs} at ({lat}, {lon})");
            assert!(!mgrs.contains('O'), "{mgrs} at ({lat}, {lon})");
            lon += 13.7;
        }
        lat += 5.9;
    }
}

#[test]
fn reference_scenario_southern_pacific() {
    let original = position(-74.37916, 155.02235);

    let utm = original.to_utm().unwrap();
    assert!(!utm.is_north());
    let recovered = utm.to_geodetic().unwrap().into_value();
    assert!((recovered.latitude() - original.latitude()).abs() < 9e-6);
    assert!((recovered.longitude() - original.longitude()).abs() < 9e-6);

    let mgrs = original.to_mgrs(5).unwrap();
    let recovered = mgrs.to_geodetic().unwrap().into_value();
    let lat_err = (recovered.latitude_radians() - original.latitude_radians()).abs();
    let lon_err = (recovered.longitude_radians() - original.longitude_radians()).abs();
    assert!(lat_err < 2e-5, "lat error {lat_err}");
    assert!(lon_err < 2e-5, "lon error {lon_err}");
}

#[test]
fn north_pole_has_an_mgrs_form_but_no_exact_inverse() {
    let pole = position(90.0, 177.0);
    assert!(pole.to_utm().is_err());

    let mgrs = pole.to_mgrs(5).unwrap();
    assert_eq!(mgrs.to_string(), "ZAH 00000 00000");

    // The longitude degenerates at the pole: decoding lands on the origin
    // meridian, not the one we started from.
    let recovered = mgrs.to_geodetic().unwrap().into_value();
    assert!((recovered.latitude() - 90.0).abs() < 1e-9);
    assert!((recovered.longitude() - 177.0).abs() > 1.0);
}

#[test]
fn identical_inputs_give_bit_identical_outputs() {
    let coord = position(47.3769, 8.5417);
    let first = UtmCoord::from_geodetic(&coord).unwrap();
    let second = UtmCoord::from_geodetic(&coord).unwrap();
    assert_eq!(first, second);

    let params = TmParameters {
        central_meridian: 9.0,
        false_easting: 500_000.0,
        scale_factor: 0.9996,
        ..TmParameters::default()
    };
    let first = TmCoord::from_geodetic(&coord, &Ellipsoid::WGS84, params)
        .unwrap()
        .into_value();
    let second = TmCoord::from_geodetic(&coord, &Ellipsoid::WGS84, params)
        .unwrap()
        .into_value();
    assert_eq!(first, second);
}

#[test]
fn distortion_warning_far_from_the_central_meridian() {
    let params = TmParameters {
        scale_factor: 0.9996,
        ..TmParameters::default()
    };
    let coord = position(10.0, 15.0);
    let projected = TmCoord::from_geodetic(&coord, &Ellipsoid::WGS84, params).unwrap();
    assert_eq!(projected.warning(), Some(Warning::LongitudeDistortion));

    let coord = position(10.0, 4.0);
    let projected = TmCoord::from_geodetic(&coord, &Ellipsoid::WGS84, params).unwrap();
    assert!(!projected.has_warning());
}

#[test]
fn ups_roundtrip_on_both_caps() {
    for &(lat, lon) in &[(84.0, 0.0), (88.8, -135.0), (-80.0, 45.0), (-89.99, 179.0)] {
        let original = position(lat, lon);
        let ups = original.to_ups().unwrap();
        let recovered = ups.to_geodetic().unwrap();
        let distance = original.haversine(&recovered);
        assert!(distance < 1e-3, "({lat}, {lon}): {distance}m off");
    }
}

#[test]
fn utm_coordinates_display_their_parts() {
    let utm = UtmCoord::create(18, Hemisphere::North, 585664.0, 4511315.0).unwrap();
    assert_eq!(utm.to_string(), "18N 585664.0 4511315.0");
}

#[test]
fn generic_parsing_entry_point() {
    let mgrs: Mgrs = geocoords::from_str("31NAA6602100000").unwrap();
    assert_eq!(mgrs.zone(), 31);
    assert_eq!(mgrs.band(), 'N');

    let recovered = mgrs.to_geodetic().unwrap().into_value();
    assert!(recovered.latitude().abs() < 0.01);
    assert!(recovered.longitude().abs() < 0.01);
}

#[test]
fn utm_error_bound_grows_near_the_pole_as_a_warning() {
    // A coordinate deep in the zone's corner at high latitude decodes fine
    // but flags distortion, because 9° of longitude shrinks to under 1° of
    // tolerated offset at 84°N.
    let utm = UtmCoord::create(31, Hemisphere::North, 100_000.0, 9_300_000.0).unwrap();
    let recovered = utm.to_geodetic().unwrap();
    assert_eq!(recovered.warning(), Some(Warning::LongitudeDistortion));
}
