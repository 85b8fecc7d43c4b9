//! Common test fixtures for wxmaps tests.
//!
//! Canned server responses shaped like the real THREDDS, GrADS Data Server
//! and ACIS payloads, plus the map extents used by the products.

/// Map extents as `[west, east, south, north]`.
pub mod extents {
    /// Eastern US precipitation-type product
    pub const EASTERN_US: [f64; 4] = [-94.05, -66.07, 30.13, 47.69];

    /// Carolinas snowfall product
    pub const CAROLINAS: [f64; 4] = [-85.13, -74.74, 31.59, 37.19];

    /// Southern Appalachians gust product
    pub const SOUTHERN_APPS: [f64; 4] = [-85.0302, -80.3544, 34.509, 36.7941];
}

/// DDS of a CONUS404 hourly file.
pub const CONUS404_DDS: &str = r#"Dataset {
    Float32 PREC_ACC_NC[Time = 1][south_north = 1015][west_east = 1367];
    Float32 SR[Time = 1][south_north = 1015][west_east = 1367];
    Float32 SNOW_ACC_NC[Time = 1][south_north = 1015][west_east = 1367];
    Float32 XLAT[south_north = 1015][west_east = 1367];
    Float32 XLONG[south_north = 1015][west_east = 1367];
    String Times[Time = 1];
} files/g/ds559.0/wy1993/199303/wrf2d_d01_1993-03-12_00:00:00.nc;
"#;

/// THREDDS ASCII response: a 2x3 precipitation hyperslab and the time string.
pub const CONUS404_ASCII: &str = r#"Dataset {
    Float32 PREC_ACC_NC[Time = 1][south_north = 2][west_east = 3];
    String Times[Time = 1];
} files/g/ds559.0/wy1993/199303/wrf2d_d01_1993-03-12_00:00:00.nc;
---------------------------------------------
PREC_ACC_NC[1][2][3]
[0][0], 0.0, 0.25, 1.5
[0][1], 2.0, 0.0, 0.75

Times[1]
"1993-03-12_00:00:00"
"#;

/// DDS of a NOMADS HRRR surface dataset.
pub const HRRR_DDS: &str = r#"Dataset {
    Float64 time[time = 19];
    Float64 lat[lat = 1059];
    Float64 lon[lon = 1799];
    Grid {
     ARRAY:
        Float32 gustsfc[time = 19][lat = 1059][lon = 1799];
     MAPS:
        Float64 time[time = 19];
        Float64 lat[lat = 1059];
        Float64 lon[lon = 1799];
    } gustsfc;
} hrrr_sfc.t12z;
"#;

/// GrADS Data Server ASCII axes response (3 times, 5 latitudes, 4 longitudes).
pub const GDS_AXES_ASCII: &str = r#"time, [3]
738900.5, 738900.5416666666, 738900.5833333334
lat, [5]
34.2, 34.5, 34.8, 35.1, 35.4
lon, [4]
-85.3, -85.0, -84.7, -84.4
"#;

/// GrADS Data Server ASCII grid response with its map vectors; one fill value.
pub const GDS_GUST_ASCII: &str = r#"gustsfc, [1][2][3]
[0][0], 10.0, 12.5, 9.999E20
[0][1], 15.0, 20.0, 22.5


time, [1]
738900.5
lat, [2]
34.5, 34.8
lon, [3]
-85.0, -84.7, -84.4
"#;

/// ACIS MultiStnData response covering every reconciliation rule.
///
/// | station     | daily values      | outcome            |
/// |-------------|-------------------|--------------------|
/// | ASHEVILLE   | 0.5, 1.5, 1.2     | "3"                |
/// | BOONE       | 1.0, M, 2.0       | missing day        |
/// | CHARLOTTE   | 0, T, 0           | "T"                |
/// | RALEIGH     | 0, 0, 0           | zero total         |
/// | GREENVILLE  | 0.3, 0.4, 0       | "0.7"              |
/// | ACCUM       | 1.5A, 0, 0        | parse error        |
/// | NOWHERE     | no coordinates    | missing location   |
pub const ACIS_MULTISTN_JSON: &str = r#"{
  "data": [
    {"meta": {"name": "ASHEVILLE", "ll": [-82.54, 35.43], "sids": ["310300 2"]}, "data": [["0.5"], ["1.5"], ["1.2"]]},
    {"meta": {"name": "BOONE", "ll": [-81.67, 36.22]}, "data": [["1.0"], ["M"], ["2.0"]]},
    {"meta": {"name": "CHARLOTTE", "ll": [-80.95, 35.21]}, "data": [["0"], ["T"], ["0"]]},
    {"meta": {"name": "RALEIGH", "ll": [-78.78, 35.87]}, "data": [["0"], ["0"], ["0"]]},
    {"meta": {"name": "GREENVILLE", "ll": [-82.22, 34.90]}, "data": [["0.3"], ["0.4"], ["0"]]},
    {"meta": {"name": "ACCUM", "ll": [-81.0, 34.0]}, "data": [["1.5A"], ["0"], ["0"]]},
    {"meta": {"name": "NOWHERE"}, "data": [["1.0"], ["1.0"], ["1.0"]]}
  ]
}"#;

/// Two-feature GeoJSON boundary layer (a polygon and a line).
pub const BOUNDARIES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"NAME": "Buncombe"},
     "geometry": {"type": "Polygon", "coordinates": [[[-82.8, 35.4], [-82.3, 35.4], [-82.3, 35.8], [-82.8, 35.8], [-82.8, 35.4]]]}},
    {"type": "Feature", "properties": {},
     "geometry": {"type": "MultiLineString", "coordinates": [[[-84.0, 35.0], [-81.0, 35.0]], [[-83.0, 34.6], [-83.0, 36.6]]]}}
  ]
}"#;
