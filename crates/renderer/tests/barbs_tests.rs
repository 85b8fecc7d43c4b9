//! Tests for wind barb rendering.

use std::f64::consts::PI;

use renderer::barbs::{barb_elements, barb_indices, draw_barbs, uv_to_speed_direction, BarbConfig, BarbElements};
use renderer::{CanvasLayout, MapCanvas};
use test_utils::{assert_approx_eq, create_geo_grid, create_grid_with_nans, extents};
use wx_common::{BoundingBox, Grid2D};

// ============================================================================
// uv_to_speed_direction tests
// ============================================================================

#[test]
fn test_uv_calm_wind() {
    let (speed, _) = uv_to_speed_direction(0.0, 0.0);
    assert_eq!(speed, 0.0);
}

#[test]
fn test_uv_speed_calculation_3_4_5() {
    let (speed, _) = uv_to_speed_direction(3.0, 4.0);
    assert_approx_eq!(speed, 5.0, 1e-6);
}

#[test]
fn test_uv_direction_quadrants() {
    // (u, v) -> staff angle pointing back toward the source
    let cases = [
        (10.0, 0.0, PI),        // westerly: staff points west
        (0.0, 10.0, 1.5 * PI),  // southerly: staff points south
        (-10.0, 0.0, 0.0),      // easterly
        (0.0, -10.0, 0.5 * PI), // northerly
    ];
    for (u, v, expected) in cases {
        let (_, dir) = uv_to_speed_direction(u, v);
        assert_approx_eq!(dir, expected, 1e-6);
    }
}

#[test]
fn test_uv_direction_range() {
    for i in 0..36 {
        let angle = i as f32 * 10.0_f32.to_radians();
        let (_, dir) = uv_to_speed_direction(angle.cos() * 10.0, angle.sin() * 10.0);
        assert!((0.0..2.0 * PI).contains(&dir), "direction {} out of range", dir);
    }
}

// ============================================================================
// barb_elements tests
// ============================================================================

#[test]
fn test_barb_elements_rounding_to_five_knots() {
    assert_eq!(barb_elements(12.4).full, 1);
    assert_eq!(barb_elements(12.4).half, 0);
    assert_eq!(barb_elements(12.6).half, 1);
}

#[test]
fn test_barb_elements_pennants() {
    assert_eq!(
        barb_elements(103.0),
        BarbElements { pennants: 2, full: 0, half: 1, calm: false }
    );
    assert_eq!(
        barb_elements(50.0),
        BarbElements { pennants: 1, full: 0, half: 0, calm: false }
    );
}

#[test]
fn test_barb_elements_calm_threshold() {
    assert!(barb_elements(0.0).calm);
    assert!(barb_elements(2.4).calm);
    assert!(!barb_elements(2.5).calm);
}

// ============================================================================
// barb_indices / draw_barbs tests
// ============================================================================

#[test]
fn test_barb_indices_default_stride() {
    let config = BarbConfig::default();
    assert_eq!(config.stride, 20);
    assert_eq!(config.color, [0x3d, 0x3d, 0x3d, 255]);
    assert_eq!(barb_indices(61, config.stride), vec![60, 40, 20, 0]);
}

#[test]
fn test_draw_barbs_counts_strided_nodes() {
    let extent = BoundingBox::from_extent(extents::SOUTHERN_APPS);
    let geo = create_geo_grid(41, 61, extent);
    let u = Grid2D::filled(41, 61, 15.0);
    let v = Grid2D::filled(41, 61, -5.0);

    let mut canvas = MapCanvas::new(CanvasLayout::sized(400, 300), extent).unwrap();
    let drawn = draw_barbs(&mut canvas, &u, &v, &geo, &BarbConfig::default()).unwrap();
    // rows 40, 20, 0 x cols 60, 40, 20, 0
    assert_eq!(drawn, 12);
}

#[test]
fn test_draw_barbs_skips_missing_wind() {
    let extent = BoundingBox::from_extent(extents::SOUTHERN_APPS);
    let geo = create_geo_grid(21, 21, extent);
    let u = create_grid_with_nans(&Grid2D::filled(21, 21, 10.0), &[(20, 20)]);
    let v = Grid2D::filled(21, 21, 10.0);

    let mut canvas = MapCanvas::new(CanvasLayout::sized(300, 200), extent).unwrap();
    let drawn = draw_barbs(&mut canvas, &u, &v, &geo, &BarbConfig::default()).unwrap();
    assert_eq!(drawn, 3);
}

#[test]
fn test_draw_barbs_shape_mismatch() {
    let extent = BoundingBox::from_extent(extents::SOUTHERN_APPS);
    let geo = create_geo_grid(10, 10, extent);
    let u = Grid2D::filled(10, 10, 1.0);
    let v = Grid2D::filled(10, 9, 1.0);
    let mut canvas = MapCanvas::new(CanvasLayout::sized(200, 150), extent).unwrap();
    assert!(draw_barbs(&mut canvas, &u, &v, &geo, &BarbConfig::default()).is_err());
}
