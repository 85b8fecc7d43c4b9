//! Tests for the map layers: filled fields, overlays, colorbar and labels.

use renderer::colorbar::format_value;
use renderer::fill::fill_field;
use renderer::labels::{draw_point_labels, PointLabel};
use renderer::overlay::draw_boundaries;
use renderer::{
    draw_colorbar, BoundaryLayer, CanvasLayout, Colorbar, LineStyle, MapCanvas, TextStyle, Tick,
};
use test_utils::{create_constant_grid, create_geo_grid, create_grid_with_nans, extents, BOUNDARIES_GEOJSON};
use wx_common::{BoundingBox, ColorScale};

// ============================================================================
// Helper functions
// ============================================================================

fn two_color_scale() -> ColorScale {
    ColorScale::from_hex(&[1.0, 5.0], &["transparent", "#ff0000", "#0000ff"]).unwrap()
}

fn rgba_at(canvas: &MapCanvas, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let p = canvas.pixmap().pixel(x, y).unwrap().demultiply();
    (p.red(), p.green(), p.blue(), p.alpha())
}

fn frame_center(canvas: &MapCanvas) -> (u32, u32) {
    let f = canvas.frame();
    ((f.x + f.width / 2.0) as u32, (f.y + f.height / 2.0) as u32)
}

// ============================================================================
// fill_field tests
// ============================================================================

#[test]
fn test_fill_paints_bucket_color() {
    let extent = BoundingBox::from_extent(extents::CAROLINAS);
    let geo = create_geo_grid(20, 30, extent);
    let field = create_constant_grid(20, 30, 3.0);

    let mut canvas = MapCanvas::new(CanvasLayout::sized(300, 200), extent).unwrap();
    let drawn = fill_field(&mut canvas, &field, &geo, &two_color_scale()).unwrap();
    assert_eq!(drawn, 19 * 29);

    let (x, y) = frame_center(&canvas);
    assert_eq!(rgba_at(&canvas, x, y), (255, 0, 0, 255));
}

#[test]
fn test_fill_skips_transparent_bucket() {
    let extent = BoundingBox::from_extent(extents::CAROLINAS);
    let geo = create_geo_grid(10, 10, extent);
    let field = create_constant_grid(10, 10, 0.2);

    let mut canvas = MapCanvas::new(CanvasLayout::sized(200, 150), extent).unwrap();
    assert_eq!(fill_field(&mut canvas, &field, &geo, &two_color_scale()).unwrap(), 0);
    let (x, y) = frame_center(&canvas);
    assert_eq!(rgba_at(&canvas, x, y), (255, 255, 255, 255));
}

#[test]
fn test_fill_skips_nan_cells() {
    let extent = BoundingBox::from_extent(extents::CAROLINAS);
    let geo = create_geo_grid(3, 3, extent);
    let field = create_grid_with_nans(&create_constant_grid(3, 3, 7.0), &[(1, 1)]);

    let mut canvas = MapCanvas::new(CanvasLayout::sized(200, 150), extent).unwrap();
    // Every cell of a 3x3 grid touches the centre node.
    assert_eq!(fill_field(&mut canvas, &field, &geo, &two_color_scale()).unwrap(), 0);
}

#[test]
fn test_fill_layers_stack_in_call_order() {
    let extent = BoundingBox::from_extent(extents::CAROLINAS);
    let geo = create_geo_grid(10, 10, extent);
    let rain = create_constant_grid(10, 10, 2.0);
    let snow = create_constant_grid(10, 10, 8.0);

    let mut canvas = MapCanvas::new(CanvasLayout::sized(200, 150), extent).unwrap();
    fill_field(&mut canvas, &rain, &geo, &two_color_scale()).unwrap();
    fill_field(&mut canvas, &snow, &geo, &two_color_scale()).unwrap();
    let (x, y) = frame_center(&canvas);
    assert_eq!(rgba_at(&canvas, x, y), (0, 0, 255, 255));
}

#[test]
fn test_fill_stays_inside_frame() {
    let extent = BoundingBox::from_extent(extents::CAROLINAS);
    // Grid larger than the map extent
    let geo = create_geo_grid(10, 10, extent.padded(2.0));
    let field = create_constant_grid(10, 10, 3.0);

    let mut canvas = MapCanvas::new(CanvasLayout::sized(200, 150), extent).unwrap();
    fill_field(&mut canvas, &field, &geo, &two_color_scale()).unwrap();
    assert_eq!(rgba_at(&canvas, 0, 0), (255, 255, 255, 255));
}

// ============================================================================
// overlay tests
// ============================================================================

#[test]
fn test_boundary_layer_from_fixture() {
    let layer = BoundaryLayer::from_geojson(BOUNDARIES_GEOJSON).unwrap();
    // One polygon ring plus two line strings
    assert_eq!(layer.lines().len(), 3);
    assert_eq!(layer.lines()[0].len(), 5);
    assert_eq!(layer.lines()[0][0], (-82.8, 35.4));
}

#[test]
fn test_draw_boundaries_marks_canvas() {
    let extent = BoundingBox::from_extent(extents::SOUTHERN_APPS);
    let layer = BoundaryLayer::from_geojson(BOUNDARIES_GEOJSON).unwrap();
    let mut canvas = MapCanvas::new(CanvasLayout::sized(400, 300), extent).unwrap();
    let style = LineStyle {
        color: [0, 0, 0, 255],
        width: 2.0,
    };
    draw_boundaries(&mut canvas, &layer, &style);

    // The 35.0N line crosses the whole frame.
    let (x, y) = canvas.view().to_pixel(-82.0, 35.0);
    let (r, _, _, _) = rgba_at(&canvas, x as u32, y.round() as u32);
    assert!(r < 128, "boundary line should be drawn at 35N");
}

// ============================================================================
// colorbar tests
// ============================================================================

#[test]
fn test_format_value_trims_whole_numbers() {
    assert_eq!(format_value(24.0), "24");
    assert_eq!(format_value(0.5), "0.5");
}

#[test]
fn test_colorbar_draws_in_band() {
    let extent = BoundingBox::from_extent(extents::SOUTHERN_APPS);
    let layout = CanvasLayout::sized(500, 300).with_colorbar(80.0);
    let mut canvas = MapCanvas::new(layout, extent).unwrap();
    let band = canvas.colorbar_area().unwrap();

    let colorbar = Colorbar::with_ticks(vec![Tick::new(1.0, "T"), Tick::new(5.0, "5\"")]);
    draw_colorbar(&mut canvas, &two_color_scale(), &colorbar).unwrap();

    // Two drawable blocks: red below, blue above.
    let x = (band.x + 12.0 + 9.0) as u32;
    let low = (band.bottom() - band.height / 4.0) as u32;
    let high = (band.y + band.height / 4.0) as u32;
    assert_eq!(rgba_at(&canvas, x, low), (255, 0, 0, 255));
    assert_eq!(rgba_at(&canvas, x, high), (0, 0, 255, 255));
}

#[test]
fn test_colorbar_without_band_is_noop() {
    let extent = BoundingBox::from_extent(extents::SOUTHERN_APPS);
    let mut canvas = MapCanvas::new(CanvasLayout::sized(200, 150), extent).unwrap();
    let before = canvas.pixmap().data().to_vec();
    draw_colorbar(&mut canvas, &two_color_scale(), &Colorbar::from_breakpoints(&two_color_scale(), 1)).unwrap();
    assert_eq!(canvas.pixmap().data(), &before[..]);
}

// ============================================================================
// point label tests
// ============================================================================

#[test]
fn test_labels_respect_inset() {
    let extent = BoundingBox::from_extent(extents::CAROLINAS);
    let mut canvas = MapCanvas::new(CanvasLayout::sized(400, 300), extent).unwrap();
    let labels = vec![
        PointLabel::new("3", -80.0, 35.0),
        // Within 0.1 degree of the western edge
        PointLabel::new("T", -85.08, 35.0),
        // Outside the extent
        PointLabel::new("0.7", -70.0, 35.0),
    ];
    let style = TextStyle::sized(10.0).color([255, 255, 255, 255]).halo([0, 0, 0, 255], 2.0);
    assert_eq!(draw_point_labels(&mut canvas, &labels, 0.1, &style), 1);
}
