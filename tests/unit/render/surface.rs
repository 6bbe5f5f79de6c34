use super::*;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedFrame {
    let mut bytes = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..(w * h) {
        bytes.extend_from_slice(&rgba);
    }
    PreparedFrame::from_premul(w, h, bytes).unwrap()
}

#[test]
fn fill_transform_stretches_each_axis() {
    let t = fill_transform(Size::new(2.0, 4.0), Size::new(8.0, 4.0));
    assert_eq!(t, Affine::scale_non_uniform(4.0, 1.0));
    assert_eq!(
        fill_transform(Size::new(0.0, 4.0), Size::new(8.0, 4.0)),
        Affine::scale(0.0)
    );
}

#[test]
fn resized_surface_starts_blank() {
    let mut s = CpuSurface::new();
    s.set_pixel_size(PixelSize::new(4, 3)).unwrap();
    let snap = s.snapshot();
    assert_eq!((snap.width, snap.height), (4, 3));
    assert_eq!(snap.data.len(), 4 * 3 * 4);
    assert!(snap.is_blank());
}

#[test]
fn draw_fills_whole_surface() {
    let mut s = CpuSurface::new();
    s.set_pixel_size(PixelSize::new(8, 8)).unwrap();
    s.draw_image_fill(&solid(2, 2, [255, 0, 0, 255])).unwrap();

    let snap = s.snapshot();
    for (x, y) in [(0, 0), (4, 4), (7, 7), (0, 7)] {
        let px = snap.pixel(x, y).unwrap();
        assert!(px[0] >= 250 && px[3] >= 250, "pixel ({x},{y}) = {px:?}");
    }
}

#[test]
fn clear_erases_previous_draw() {
    let mut s = CpuSurface::new();
    s.set_pixel_size(PixelSize::new(4, 4)).unwrap();
    s.draw_image_fill(&solid(1, 1, [0, 0, 255, 255])).unwrap();
    assert!(!s.snapshot().is_blank());
    s.clear();
    assert!(s.snapshot().is_blank());
}

#[test]
fn replaced_frame_is_never_painted_from_the_cache() {
    let mut s = CpuSurface::new();
    s.set_pixel_size(PixelSize::new(4, 4)).unwrap();
    for round in 0..50 {
        let red = solid(4, 4, [255, 0, 0, 255]);
        s.draw_image_fill(&red).unwrap();
        drop(red);

        s.clear();
        s.draw_image_fill(&solid(4, 4, [0, 0, 255, 255])).unwrap();
        let px = s.snapshot().pixel(2, 2).unwrap();
        assert!(
            px[2] >= 250 && px[0] <= 5,
            "round {round}: expected blue, got {px:?}"
        );
    }
}

#[test]
fn same_frame_repaints_after_clear() {
    let mut s = CpuSurface::new();
    s.set_pixel_size(PixelSize::new(4, 4)).unwrap();
    let green = solid(2, 2, [0, 255, 0, 255]);
    s.draw_image_fill(&green).unwrap();
    s.clear();
    s.draw_image_fill(&green).unwrap();
    let px = s.snapshot().pixel(1, 1).unwrap();
    assert!(px[1] >= 250 && px[3] >= 250, "unexpected pixel {px:?}");
}

#[test]
fn empty_surface_ignores_draws() {
    let mut s = CpuSurface::new();
    s.set_pixel_size(PixelSize::new(0, 10)).unwrap();
    s.draw_image_fill(&solid(1, 1, [1, 2, 3, 255])).unwrap();
    assert!(s.snapshot().data.is_empty());
}

#[test]
fn oversized_surface_is_geometry_error() {
    let mut s = CpuSurface::new();
    let err = s.set_pixel_size(PixelSize::new(70_000, 10)).unwrap_err();
    assert!(matches!(err, ReelError::Geometry(_)));
}

#[test]
fn straight_alpha_export_unpremultiplies() {
    let f = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![64, 0, 32, 128, 9, 9, 9, 0],
        premultiplied: true,
    };
    assert_eq!(f.to_straight_rgba8(), [128, 0, 64, 128, 0, 0, 0, 0]);

    let straight = FrameRGBA {
        premultiplied: false,
        ..f.clone()
    };
    assert_eq!(straight.to_straight_rgba8(), straight.data);
}
