//! Integration tests for background drawables drawn onto a recording canvas.

use canopy_render::{
    Brush, Canvas, Color, CornerRadii, DrawOp, Drawable, DrawableFactory, GradientStop,
    LinearGradientBrush, Path, RadialGradientBrush, Rect, RecordingCanvas,
};

fn gradient() -> Brush {
    Brush::LinearGradient(LinearGradientBrush::horizontal(vec![
        GradientStop::new(0.0, Color::RED),
        GradientStop::new(1.0, Color::BLUE),
    ]))
}

#[test]
fn test_opaque_red_background_is_flat_color() {
    let factory = DrawableFactory::new();
    let drawable = factory
        .build_background_drawable(
            &Brush::solid(Color::from_rgba8(255, 0, 0, 255)),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            None,
            None,
            true,
        )
        .unwrap();

    assert_eq!(drawable, Some(Drawable::Color(Color::RED)));
    assert_eq!(factory.resolver().stats().total_paints(), 0);
}

#[test]
fn test_clipped_drawables_paint_inside_clip_and_extent() {
    let factory = DrawableFactory::new();
    let extent = Rect::new(0.0, 0.0, 100.0, 40.0);
    let mask = Path::rounded_rect(extent, CornerRadii::uniform(6.0));
    let clips = [
        Rect::new(10.0, 10.0, 20.0, 20.0),
        Rect::new(-50.0, -50.0, 80.0, 80.0),
        Rect::new(90.0, 30.0, 100.0, 100.0),
        Rect::new(200.0, 200.0, 5.0, 5.0),
    ];
    let brushes = [
        Brush::solid(Color::GREEN),
        gradient(),
        Brush::RadialGradient(RadialGradientBrush::new(vec![
            GradientStop::new(0.0, Color::WHITE),
            GradientStop::new(1.0, Color::BLACK),
        ])),
    ];

    for brush in &brushes {
        for mask in [None, Some(&mask)] {
            for clip in clips {
                let drawable = factory
                    .build_background_drawable(brush, extent, Some(clip), mask, true)
                    .unwrap()
                    .unwrap();

                let mut canvas = RecordingCanvas::new();
                drawable.draw(&mut canvas, extent);

                let allowed = clip.intersect(&extent);
                for region in canvas.painted_regions() {
                    let allowed = allowed.unwrap_or_else(|| {
                        panic!("{region:?} painted although clip {clip:?} misses {extent:?}")
                    });
                    assert!(
                        allowed.contains_rect(&region),
                        "{region:?} escapes {allowed:?} ({brush:?}, mask: {})",
                        mask.is_some()
                    );
                }
                assert_eq!(canvas.save_depth(), 0);
            }
        }
    }
}

#[test]
fn test_clipped_drawable_keeps_outer_clip() {
    let factory = DrawableFactory::new();
    let drawable = factory
        .build_background_drawable(
            &gradient(),
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Some(Rect::new(0.0, 0.0, 25.0, 50.0)),
            None,
            true,
        )
        .unwrap()
        .unwrap();

    let mut canvas = RecordingCanvas::new();
    canvas.clip_rect(Rect::new(0.0, 0.0, 50.0, 10.0));
    drawable.draw(&mut canvas, Rect::new(0.0, 0.0, 50.0, 50.0));
    canvas.fill_rect(Rect::new(0.0, 0.0, 50.0, 50.0), Color::BLACK);

    assert_eq!(
        canvas.painted_regions(),
        vec![Rect::new(0.0, 0.0, 25.0, 10.0), Rect::new(0.0, 0.0, 50.0, 10.0)]
    );
    assert!(matches!(canvas.ops()[0].op, DrawOp::DrawRect { .. }));
}

#[test]
fn test_gradient_reresolves_per_region() {
    let factory = DrawableFactory::new();
    let brush = gradient();
    let small = factory
        .build_background_drawable(&brush, Rect::new(0.0, 0.0, 10.0, 10.0), None, None, true)
        .unwrap();
    let large = factory
        .build_background_drawable(&brush, Rect::new(0.0, 0.0, 500.0, 10.0), None, None, true)
        .unwrap();

    assert_ne!(small, large);
    assert_eq!(factory.resolver().stats().fill_paints, 2);
}
