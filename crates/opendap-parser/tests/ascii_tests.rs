//! Tests for DDS and DAP ASCII parsing against canned server responses.

use opendap_parser::{parse_ascii, parse_dds, DapData, DapError};
use test_utils::{assert_approx_eq, CONUS404_ASCII, CONUS404_DDS, GDS_AXES_ASCII, GDS_GUST_ASCII, HRRR_DDS};

// ============================================================================
// DDS
// ============================================================================

#[test]
fn test_conus404_dds_shapes() {
    let dds = parse_dds(CONUS404_DDS).unwrap();
    assert_eq!(dds.shape("PREC_ACC_NC").unwrap(), vec![1, 1015, 1367]);
    assert_eq!(dds.shape("XLAT").unwrap(), vec![1015, 1367]);
    assert_eq!(dds.get("Times").unwrap().data_type, "String");
    assert!(dds.dataset.ends_with("wrf2d_d01_1993-03-12_00:00:00.nc"));
}

#[test]
fn test_grid_dds_keeps_array_declaration() {
    let dds = parse_dds(HRRR_DDS).unwrap();
    assert_eq!(dds.shape("gustsfc").unwrap(), vec![19, 1059, 1799]);
    assert_eq!(dds.shape("lat").unwrap(), vec![1059]);
    assert_eq!(dds.variables.iter().filter(|v| v.name == "time").count(), 1);
    assert_eq!(dds.dataset, "hrrr_sfc.t12z");
}

#[test]
fn test_dds_missing_variable() {
    let dds = parse_dds(CONUS404_DDS).unwrap();
    assert!(matches!(dds.shape("T2"), Err(DapError::MissingData(_))));
}

#[test]
fn test_dds_requires_dataset_header() {
    assert!(matches!(
        parse_dds("<html>Not Found</html>"),
        Err(DapError::InvalidFormat(_))
    ));
}

// ============================================================================
// THREDDS dialect
// ============================================================================

#[test]
fn test_thredds_ascii_grid_and_text() {
    let dataset = parse_ascii(CONUS404_ASCII).unwrap();

    let precip = dataset.grid("PREC_ACC_NC").unwrap();
    assert_eq!(precip.shape(), (2, 3));
    assert_eq!(precip.data(), &[0.0, 0.25, 1.5, 2.0, 0.0, 0.75]);

    let times = dataset.require("Times").unwrap().strings().unwrap();
    assert_eq!(times, &["1993-03-12_00:00:00".to_string()]);
}

// ============================================================================
// GrADS dialect
// ============================================================================

#[test]
fn test_gds_ascii_grid_with_fill_value() {
    let dataset = parse_ascii(GDS_GUST_ASCII).unwrap();
    let gust = dataset.grid("gustsfc").unwrap();
    assert_eq!(gust.shape(), (2, 3));
    assert!(gust.get(0, 2).unwrap().is_nan());
    assert_eq!(gust.get(1, 2), Some(22.5));
    assert_eq!(dataset.axis("lon").unwrap(), vec![-85.0, -84.7, -84.4]);
}

#[test]
fn test_gds_axes_only() {
    let dataset = parse_ascii(GDS_AXES_ASCII).unwrap();
    let time = dataset.axis("time").unwrap();
    assert_eq!(time.len(), 3);
    assert_approx_eq!(time[1] - time[0], 1.0 / 24.0, 1e-6);
    assert_eq!(dataset.axis("lat").unwrap().len(), 5);
    assert!(dataset.grid("lat").is_err());
}

// ============================================================================
// Malformed responses
// ============================================================================

#[test]
fn test_value_count_must_match_shape() {
    let text = "gustsfc, [1][2][2]\n[0][0], 1.0, 2.0\n[0][1], 3.0\n";
    match parse_ascii(text) {
        Err(DapError::ShapeMismatch {
            name,
            expected,
            actual,
        }) => {
            assert_eq!(name, "gustsfc");
            assert_eq!(expected, 4);
            assert_eq!(actual, 3);
        }
        other => panic!("expected shape mismatch, got {:?}", other),
    }
}

#[test]
fn test_unparseable_value() {
    let text = "lat, [2]\n34.0, north\n";
    assert!(matches!(parse_ascii(text), Err(DapError::InvalidFormat(_))));
}

#[test]
fn test_values_before_header() {
    assert!(matches!(
        parse_ascii("1.0, 2.0\n"),
        Err(DapError::InvalidFormat(_))
    ));
}

#[test]
fn test_dotted_grid_names_use_member_name() {
    let text = "gustsfc.gustsfc[1][1][2]\n[0][0], 3.0, 4.0\ngustsfc.lat[1]\n35.0\n";
    let dataset = parse_ascii(text).unwrap();
    assert!(matches!(
        &dataset.require("gustsfc").unwrap().data,
        DapData::Numeric(v) if v == &vec![3.0, 4.0]
    ));
    assert_eq!(dataset.axis("lat").unwrap(), vec![35.0]);
}
