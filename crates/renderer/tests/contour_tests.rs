//! Tests for contour line (isoline) generation and drawing.

use renderer::contour::{
    connect_segments, draw_contours, generate_all_contours, generate_contour_levels,
    march_squares, smooth_contour, Contour, ContourConfig, Point, Segment,
};
use renderer::{CanvasLayout, MapCanvas};
use test_utils::{create_geo_grid, create_surface_state_grids, extents};
use wx_common::{BoundingBox, Grid2D};

// ============================================================================
// generate_contour_levels tests
// ============================================================================

#[test]
fn test_generate_contour_levels_mslp_range() {
    let levels = generate_contour_levels(960.0, 1030.0, 5.0);
    assert_eq!(levels.len(), 15);
    assert_eq!(levels[0], 960.0);
    assert_eq!(levels[14], 1030.0);
}

#[test]
fn test_generate_contour_levels_negative_range() {
    let levels = generate_contour_levels(-12.0, 3.0, 5.0);
    assert_eq!(levels, vec![-10.0, -5.0, 0.0]);
}

#[test]
fn test_generate_contour_levels_invalid_interval() {
    assert!(generate_contour_levels(0.0, 10.0, 0.0).is_empty());
    assert!(generate_contour_levels(0.0, 10.0, -1.0).is_empty());
    assert!(generate_contour_levels(10.0, 0.0, 1.0).is_empty());
}

// ============================================================================
// march_squares tests
// ============================================================================

#[test]
fn test_march_squares_empty_cases() {
    assert!(march_squares(&[1.0], 1, 1, 0.5).is_empty());
    assert!(march_squares(&[], 0, 0, 0.5).is_empty());
    // Mismatched dimensions
    assert!(march_squares(&[1.0, 2.0], 3, 3, 0.5).is_empty());
}

#[test]
fn test_march_squares_single_corner_above() {
    let data = vec![
        10.0, 0.0, // row 0
        0.0, 0.0, // row 1
    ];
    let segments = march_squares(&data, 2, 2, 5.0);
    assert_eq!(segments.len(), 1);

    // Left edge to top edge
    let seg = &segments[0];
    assert!(seg.start.x < 0.5);
    assert!(seg.end.y < 0.5);
}

#[test]
fn test_march_squares_interpolation_accuracy() {
    let data = vec![
        0.0, 100.0, // row 0
        0.0, 100.0, // row 1
    ];
    let segments = march_squares(&data, 2, 2, 50.0);
    assert_eq!(segments.len(), 1);
    assert!((segments[0].start.x - 0.5).abs() < 0.01);
    assert!((segments[0].end.x - 0.5).abs() < 0.01);
}

#[test]
fn test_march_squares_saddle() {
    let data = vec![
        10.0, 0.0, // row 0
        0.0, 10.0, // row 1
    ];
    assert_eq!(march_squares(&data, 2, 2, 5.0).len(), 2);
}

#[test]
fn test_march_squares_skips_nan_cells() {
    #[rustfmt::skip]
    let data = vec![
        f32::NAN, 10.0, 10.0,
        0.0,      10.0, 10.0,
        0.0,      0.0,  0.0,
    ];
    let segments = march_squares(&data, 3, 3, 5.0);
    assert!(!segments.is_empty());
    // Nothing from the NaN cell at (0, 0): every segment lies in x >= 1 or y >= 1.
    assert!(segments
        .iter()
        .all(|s| s.start.x >= 1.0 || s.start.y >= 1.0 || s.end.x >= 1.0 || s.end.y >= 1.0));
}

// ============================================================================
// connect_segments / smooth_contour tests
// ============================================================================

#[test]
fn test_connect_segments_chain_out_of_order() {
    // Middle segment first: the chain must grow at both ends.
    let segments = vec![
        Segment { start: Point::new(1.0, 0.0), end: Point::new(2.0, 0.0) },
        Segment { start: Point::new(0.0, 0.0), end: Point::new(1.0, 0.0) },
        Segment { start: Point::new(3.0, 0.0), end: Point::new(2.0, 0.0) },
    ];
    let contours = connect_segments(segments);
    assert_eq!(contours.len(), 1);
    assert_eq!(contours[0].points.len(), 4);
    assert!(!contours[0].closed);
}

#[test]
fn test_connect_segments_closed_square() {
    let segments = vec![
        Segment { start: Point::new(0.0, 0.0), end: Point::new(1.0, 0.0) },
        Segment { start: Point::new(1.0, 0.0), end: Point::new(1.0, 1.0) },
        Segment { start: Point::new(1.0, 1.0), end: Point::new(0.0, 1.0) },
        Segment { start: Point::new(0.0, 1.0), end: Point::new(0.0, 0.0) },
    ];
    let contours = connect_segments(segments);
    assert_eq!(contours.len(), 1);
    assert!(contours[0].closed);
}

#[test]
fn test_connect_segments_two_separate() {
    let segments = vec![
        Segment { start: Point::new(0.0, 0.0), end: Point::new(1.0, 0.0) },
        Segment { start: Point::new(5.0, 5.0), end: Point::new(6.0, 5.0) },
    ];
    assert_eq!(connect_segments(segments).len(), 2);
}

#[test]
fn test_smooth_contour_preserves_open_endpoints() {
    let contour = Contour {
        level: 3.0,
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)],
        closed: false,
    };
    let smoothed = smooth_contour(&contour, 2);
    assert_eq!(smoothed.level, 3.0);
    assert!(smoothed.points.len() > contour.points.len());
    assert_eq!(smoothed.points.first(), Some(&Point::new(0.0, 0.0)));
    assert_eq!(smoothed.points.last(), Some(&Point::new(2.0, 0.0)));
}

#[test]
fn test_smooth_contour_no_iterations() {
    let contour = Contour {
        level: 1.0,
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)],
        closed: false,
    };
    assert_eq!(smooth_contour(&contour, 0).points, contour.points);
}

#[test]
fn test_generate_all_contours_peak_is_closed() {
    #[rustfmt::skip]
    let data = vec![
        0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 2.0, 4.0, 2.0, 0.0,
        0.0, 4.0, 8.0, 4.0, 0.0,
        0.0, 2.0, 4.0, 2.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0,
    ];
    let config = ContourConfig {
        levels: vec![3.0],
        smoothing_passes: 0,
        ..ContourConfig::default()
    };
    let contours = generate_all_contours(&data, 5, 5, &config);
    assert_eq!(contours.len(), 1);
    assert!(contours[0].closed);
    assert_eq!(contours[0].level, 3.0);
}

// ============================================================================
// draw_contours tests
// ============================================================================

#[test]
fn test_level_label() {
    let config = ContourConfig::default();
    assert_eq!(config.level_label(1015.0), "1015");
    assert_eq!(config.level_label(2.5), "2.5");
}

#[test]
fn test_draw_dashed_isobars_on_map() {
    let extent = BoundingBox::from_extent(extents::SOUTHERN_APPS);
    let geo = create_geo_grid(30, 40, extent);
    // Pressure in hPa rising away from the grid centre.
    let (psfc, _, _) = create_surface_state_grids(30, 40);
    let mslp = psfc.map(|p| p / 100.0);

    let mut canvas = MapCanvas::new(CanvasLayout::sized(400, 300), extent).unwrap();
    let config = ContourConfig {
        levels: generate_contour_levels(960.0, 1030.0, 5.0),
        dash: Some(vec![6.0, 4.0]),
        labels_enabled: true,
        ..ContourConfig::default()
    };
    let drawn = draw_contours(&mut canvas, &mslp, &geo, &config).unwrap();
    assert!(drawn >= 1);

    let non_white = canvas
        .pixmap()
        .pixels()
        .iter()
        .filter(|p| p.red() < 200)
        .count();
    assert!(non_white > 0, "contours should mark the canvas");
}

#[test]
fn test_draw_contours_shape_mismatch() {
    let extent = BoundingBox::from_extent(extents::SOUTHERN_APPS);
    let geo = create_geo_grid(10, 10, extent);
    let field = Grid2D::filled(5, 5, 1000.0);
    let mut canvas = MapCanvas::new(CanvasLayout::sized(200, 150), extent).unwrap();
    assert!(draw_contours(&mut canvas, &field, &geo, &ContourConfig::default()).is_err());
}
