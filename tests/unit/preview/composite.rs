use super::*;

const A: [u8; 4] = [0, 0, 255, 255];
const B: [u8; 4] = [255, 0, 0, 255];

fn pair(w: u32, h: u32) -> (Surface, Surface) {
    (Surface::filled(w, h, A), Surface::filled(w, h, B))
}

fn run(kind: TransitionKind, t: f32, w: u32, h: u32) -> Surface {
    let (a, b) = pair(w, h);
    let mut dst = Surface::new(w, h);
    composite(&kind, t, &a, &b, &mut dst);
    dst
}

#[test]
fn crossfade_endpoints_are_exact() {
    let (a, b) = pair(3, 2);
    assert_eq!(run(TransitionKind::Crossfade, 0.0, 3, 2), a);
    assert_eq!(run(TransitionKind::Crossfade, 1.0, 3, 2), b);
}

#[test]
fn wipe_right_reveals_left_side_first() {
    let kind = TransitionKind::Wipe {
        dir: WipeDir::LeftToRight,
        soft_edge: 0.0,
    };
    let out = run(kind, 0.5, 8, 1);
    assert_eq!(out.pixel(0, 0), B);
    assert_eq!(out.pixel(7, 0), A);
}

#[test]
fn wipe_left_reveals_right_side_first() {
    let kind = TransitionKind::Wipe {
        dir: WipeDir::RightToLeft,
        soft_edge: 0.0,
    };
    let out = run(kind, 0.5, 8, 1);
    assert_eq!(out.pixel(0, 0), A);
    assert_eq!(out.pixel(7, 0), B);
}

#[test]
fn soft_wipe_keeps_endpoints_pure() {
    let kind = TransitionKind::Wipe {
        dir: WipeDir::TopToBottom,
        soft_edge: 0.2,
    };
    let (a, b) = pair(4, 10);
    assert_eq!(run(kind, 0.0, 4, 10), a);
    assert_eq!(run(kind, 1.0, 4, 10), b);
}

#[test]
fn slide_left_pushes_both_regions() {
    let out = run(
        TransitionKind::Slide {
            dir: SlideDir::Left,
        },
        0.5,
        8,
        1,
    );
    assert_eq!(out.pixel(0, 0), A);
    assert_eq!(out.pixel(7, 0), B);
}

#[test]
fn circle_open_starts_at_center() {
    let kind = TransitionKind::Circle {
        open: true,
        origin: Vec2::new(0.5, 0.5),
        soft_edge: 0.0,
    };
    let out = run(kind, 0.5, 16, 16);
    assert_eq!(out.pixel(8, 8), B);
    assert_eq!(out.pixel(0, 0), A);
}

#[test]
fn circle_close_shrinks_from_region() {
    let kind = TransitionKind::Circle {
        open: false,
        origin: Vec2::new(0.5, 0.5),
        soft_edge: 0.1,
    };
    let out = run(kind, 0.5, 16, 16);
    assert_eq!(out.pixel(8, 8), A);
    assert_eq!(out.pixel(0, 0), B);
}

#[test]
fn dissolve_is_deterministic_per_seed() {
    let kind = TransitionKind::Dissolve { seed: 7 };
    assert_eq!(run(kind, 0.4, 16, 16), run(kind, 0.4, 16, 16));
    assert_ne!(
        run(kind, 0.4, 16, 16),
        run(TransitionKind::Dissolve { seed: 8 }, 0.4, 16, 16)
    );
}

#[test]
fn dip_to_black_darkens_midpoint() {
    let out = run(TransitionKind::Dip { tint: Tint::Black }, 0.5, 2, 2);
    let px = out.pixel(0, 0);
    assert_eq!(px[3], 255);
    assert!(px[0] < 20 && px[2] < 20);
}

#[test]
fn zoom_in_grows_to_region_from_center() {
    let kind = TransitionKind::Zoom {
        zoom_in: true,
        min_scale: 0.1,
        origin: Vec2::new(0.5, 0.5),
    };
    let out = run(kind, 0.3, 20, 20);
    assert_eq!(out.pixel(0, 0), A);
    assert_ne!(out.pixel(10, 10), A);
}

#[test]
fn blur_of_flat_color_is_flat() {
    let flat = Surface::filled(6, 6, A);
    assert_eq!(box_blur(&flat, 3), flat);
}

#[test]
fn pixelate_midpoint_uses_blocks() {
    let mut a = Surface::filled(8, 8, A);
    a.set_pixel(1, 0, [0, 255, 0, 255]);
    let b = a.clone();
    let mut dst = Surface::new(8, 8);
    composite(&TransitionKind::Pixelate { max_block: 4 }, 0.5, &a, &b, &mut dst);
    assert_eq!(dst.pixel(1, 0), A);
}

#[test]
fn huge_pixelate_block_stays_bounded() {
    let kind = TransitionKind::Pixelate {
        max_block: u32::MAX,
    };
    let (a, b) = pair(8, 8);
    let mid = run(kind, 0.5, 8, 8);
    assert_eq!(mid.pixel(7, 7), mid.pixel(0, 0));
    assert_eq!(run(kind, 0.0, 8, 8), a);
    assert_eq!(run(kind, 1.0, 8, 8), b);
}

#[test]
fn huge_blur_radius_is_capped_and_keeps_coverage() {
    let kind = TransitionKind::Blur {
        max_radius: u32::MAX,
    };
    let (a, b) = pair(6, 4);
    let mid = run(kind, 0.5, 6, 4);
    assert!(mid.data().chunks_exact(4).all(|px| px[3] == 255));
    assert_eq!(run(kind, 0.0, 6, 4), a);
    assert_eq!(run(kind, 1.0, 6, 4), b);
}
