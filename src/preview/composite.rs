use crate::foundation::core::Vec2;
use crate::foundation::math::{
    Fnv1a64, add_sat_u8, mid_peak, mul_div255_u8, smoothstep, unit_to_u8_weight,
};
use crate::preview::plan::{MAX_RADIUS_LIMIT, SlideDir, Tint, TransitionKind, WipeDir};
use crate::preview::surface::{PremulRgba8, Surface};

/// Composite `a` ("from") and `b` ("to") over `dst` at progress `t`.
///
/// All three surfaces must share one size; callers check.
pub(crate) fn composite(kind: &TransitionKind, t: f32, a: &Surface, b: &Surface, dst: &mut Surface) {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match *kind {
        TransitionKind::Crossfade => crossfade(dst, a, b, t),
        TransitionKind::Dip { tint } => dip(dst, a, b, t, tint),
        TransitionKind::Dissolve { seed } => dissolve(dst, a, b, t, seed),
        TransitionKind::Wipe { dir, soft_edge } => wipe(dst, a, b, t, dir, soft_edge),
        TransitionKind::Slide { dir } => slide(dst, a, b, t, dir),
        TransitionKind::Zoom {
            zoom_in,
            min_scale,
            origin,
        } => zoom(dst, a, b, t, zoom_in, min_scale, origin),
        TransitionKind::Circle {
            open,
            origin,
            soft_edge,
        } => circle(dst, a, b, t, open, origin, soft_edge),
        TransitionKind::Pixelate { max_block } => pixelate(dst, a, b, t, max_block),
        TransitionKind::Blur { max_radius } => blur(dst, a, b, t, max_radius),
        TransitionKind::Mirror => mirror(dst, a, b, t),
    }
}

fn crossfade(dst: &mut Surface, a: &Surface, b: &Surface, t: f32) {
    let tt = unit_to_u8_weight(t);
    let it = 255 - tt;
    let out = dst.data_mut();
    for ((d, ap), bp) in out
        .chunks_exact_mut(4)
        .zip(a.data().chunks_exact(4))
        .zip(b.data().chunks_exact(4))
    {
        let mut src = [0u8; 4];
        for c in 0..4 {
            src[c] = add_sat_u8(
                mul_div255_u8(u16::from(ap[c]), it),
                mul_div255_u8(u16::from(bp[c]), tt),
            );
        }
        let o = over_px([d[0], d[1], d[2], d[3]], src);
        d.copy_from_slice(&o);
    }
}

fn dip(dst: &mut Surface, a: &Surface, b: &Surface, t: f32, tint: Tint) {
    let tint_px = tint.premul();
    let strength = mid_peak(t);
    for_each_px(dst, |x, y| {
        let base = mix_px(a.pixel(x, y), b.pixel(x, y), t);
        // Keep the source's coverage so the tint never paints where both are empty.
        let toward = scale_px(tint_px, base[3]);
        mix_px(base, toward, strength)
    });
}

fn dissolve(dst: &mut Surface, a: &Surface, b: &Surface, t: f32, seed: u64) {
    for_each_px(dst, |x, y| {
        let threshold = (hash_u32(seed, x as u32, y as u32) >> 8) as f32 / (1u32 << 24) as f32;
        if threshold < t {
            b.pixel(x, y)
        } else {
            a.pixel(x, y)
        }
    });
}

fn wipe(dst: &mut Surface, a: &Surface, b: &Surface, t: f32, dir: WipeDir, soft_edge: f32) {
    let (w, h) = (dst.width(), dst.height());
    let axis_len = match dir {
        WipeDir::LeftToRight | WipeDir::RightToLeft => w as f32,
        WipeDir::TopToBottom | WipeDir::BottomToTop => h as f32,
    };
    let soft_px = soft_edge.max(0.0) * axis_len;
    let edge = t * (axis_len + 2.0 * soft_px) - soft_px;
    let (a_edge, b_edge) = (edge - soft_px, edge + soft_px);

    for_each_px(dst, |x, y| {
        let pos = match dir {
            WipeDir::LeftToRight => x as f32,
            WipeDir::RightToLeft => (w as i32 - 1 - x) as f32,
            WipeDir::TopToBottom => y as f32,
            WipeDir::BottomToTop => (h as i32 - 1 - y) as f32,
        };
        let m_b = if soft_px <= 0.0 {
            if pos < edge { 1.0 } else { 0.0 }
        } else {
            1.0 - smoothstep(a_edge, b_edge, pos)
        };
        mix_px(a.pixel(x, y), b.pixel(x, y), m_b)
    });
}

fn slide(dst: &mut Surface, a: &Surface, b: &Surface, t: f32, dir: SlideDir) {
    let w = dst.width() as f32;
    let h = dst.height() as f32;
    let (b_dx, b_dy) = match dir {
        SlideDir::Left => ((1.0 - t) * w, 0.0),
        SlideDir::Right => (-(1.0 - t) * w, 0.0),
        SlideDir::Up => (0.0, (1.0 - t) * h),
        SlideDir::Down => (0.0, -(1.0 - t) * h),
    };
    let (a_dx, a_dy) = match dir {
        SlideDir::Left => (-t * w, 0.0),
        SlideDir::Right => (t * w, 0.0),
        SlideDir::Up => (0.0, -t * h),
        SlideDir::Down => (0.0, t * h),
    };
    for_each_px(dst, |x, y| {
        let (xf, yf) = (x as f32, y as f32);
        let ap = a.pixel((xf - a_dx).round() as i32, (yf - a_dy).round() as i32);
        let bp = b.pixel((xf - b_dx).round() as i32, (yf - b_dy).round() as i32);
        over_px(ap, bp)
    });
}

#[allow(clippy::too_many_arguments)]
fn zoom(
    dst: &mut Surface,
    a: &Surface,
    b: &Surface,
    t: f32,
    zoom_in: bool,
    min_scale: f32,
    origin: Vec2,
) {
    let min_scale = min_scale.clamp(1e-3, 1.0);
    // Scale of the moving layer: "to" grows in, "from" shrinks away.
    let s = if zoom_in {
        min_scale + (1.0 - min_scale) * t
    } else {
        1.0 - (1.0 - min_scale) * t
    };
    let (w, h) = (dst.width() as f32, dst.height() as f32);
    let ox = origin.x as f32 * w;
    let oy = origin.y as f32 * h;

    for_each_px(dst, |x, y| {
        let sx = ox + (x as f32 + 0.5 - ox) / s - 0.5;
        let sy = oy + (y as f32 + 0.5 - oy) / s - 0.5;
        let inside = sx >= -0.5 && sy >= -0.5 && sx < w - 0.5 && sy < h - 0.5;
        let (sxi, syi) = (sx.round() as i32, sy.round() as i32);
        match (zoom_in, inside) {
            (true, true) => mix_px(a.pixel(x, y), b.pixel(sxi, syi), t),
            (true, false) => a.pixel(x, y),
            (false, true) => mix_px(a.pixel(sxi, syi), b.pixel(x, y), t),
            (false, false) => b.pixel(x, y),
        }
    });
}

#[allow(clippy::too_many_arguments)]
fn circle(
    dst: &mut Surface,
    a: &Surface,
    b: &Surface,
    t: f32,
    open: bool,
    origin: Vec2,
    soft_edge: f32,
) {
    let (w, h) = (dst.width() as f32, dst.height() as f32);
    let ox = origin.x as f32 * w;
    let oy = origin.y as f32 * h;
    let max_x = ox.max(w - ox);
    let max_y = oy.max(h - oy);
    let max_dist = (max_x * max_x + max_y * max_y).sqrt().max(1e-6);
    let soft = soft_edge.max(0.0) * max_dist;

    // Inner region is "to" for open and "from" for close; close runs the mask backwards.
    let r = if open { t } else { 1.0 - t };
    let edge = r * (max_dist + 2.0 * soft) - soft;

    for_each_px(dst, |x, y| {
        let dx = x as f32 + 0.5 - ox;
        let dy = y as f32 + 0.5 - oy;
        let dist = (dx * dx + dy * dy).sqrt();
        let inner = if soft <= 0.0 {
            if dist < edge { 1.0 } else { 0.0 }
        } else {
            1.0 - smoothstep(edge - soft, edge + soft, dist)
        };
        let m_b = if open { inner } else { 1.0 - inner };
        mix_px(a.pixel(x, y), b.pixel(x, y), m_b)
    });
}

fn pixelate(dst: &mut Surface, a: &Surface, b: &Surface, t: f32, max_block: u32) {
    let longest = dst.width().max(dst.height()).max(1) as f32;
    let max_block = (max_block.max(1) as f32).min(longest);
    let block = (1.0 + mid_peak(t).max(0.0) * (max_block - 1.0))
        .round()
        .clamp(1.0, longest) as i32;
    for_each_px(dst, |x, y| {
        let (bx, by) = (x - x % block, y - y % block);
        mix_px(a.pixel(bx, by), b.pixel(bx, by), t)
    });
}

fn blur(dst: &mut Surface, a: &Surface, b: &Surface, t: f32, max_radius: u32) {
    let cap = MAX_RADIUS_LIMIT.min(dst.width().max(dst.height()));
    let radius = (mid_peak(t).max(0.0) * max_radius.min(cap) as f32).round() as u32;
    if radius == 0 {
        crossfade(dst, a, b, t);
        return;
    }
    let ab = box_blur(a, radius);
    let bb = box_blur(b, radius);
    for_each_px(dst, |x, y| mix_px(ab.pixel(x, y), bb.pixel(x, y), t));
}

fn mirror(dst: &mut Surface, a: &Surface, b: &Surface, t: f32) {
    let strength = mid_peak(t);
    let w = dst.width() as i32;
    let half = w / 2;
    let folded = |s: &Surface, x: i32, y: i32| {
        let own = s.pixel(x, y);
        if x < half {
            own
        } else {
            mix_px(own, s.pixel(w - 1 - x, y), strength)
        }
    };
    for_each_px(dst, |x, y| mix_px(folded(a, x, y), folded(b, x, y), t));
}

/// Run `f` for every output pixel and composite its result over `dst`.
fn for_each_px(dst: &mut Surface, mut f: impl FnMut(i32, i32) -> PremulRgba8) {
    for y in 0..dst.height() {
        for x in 0..dst.width() {
            let src = f(x as i32, y as i32);
            let d = dst.pixel(x as i32, y as i32);
            dst.set_pixel(x, y, over_px(d, src));
        }
    }
}

fn mix_px(a: PremulRgba8, b: PremulRgba8, m_b: f32) -> PremulRgba8 {
    let tt = unit_to_u8_weight(m_b);
    let it = 255 - tt;
    let mut out = [0u8; 4];
    for c in 0..4 {
        out[c] = add_sat_u8(
            mul_div255_u8(u16::from(a[c]), it),
            mul_div255_u8(u16::from(b[c]), tt),
        );
    }
    out
}

fn scale_px(px: PremulRgba8, alpha: u8) -> PremulRgba8 {
    let a = u16::from(alpha);
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
        mul_div255_u8(u16::from(px[3]), a),
    ]
}

fn over_px(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    let inv = 255 - sa;
    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255_u8(u16::from(dst[3]), inv));
    for c in 0..3 {
        out[c] = add_sat_u8(src[c], mul_div255_u8(u16::from(dst[c]), inv));
    }
    out
}

/// Separable box blur on premultiplied pixels; edges clamp.
fn box_blur(src: &Surface, radius: u32) -> Surface {
    let (w, h) = (src.width() as i32, src.height() as i32);
    let r = radius as i32;
    let mut tmp = Surface::new(src.width(), src.height());
    let mut out = Surface::new(src.width(), src.height());
    for y in 0..h {
        for x in 0..w {
            let px = average((-r..=r).map(|k| src.pixel((x + k).clamp(0, w - 1), y)));
            tmp.set_pixel(x as u32, y as u32, px);
        }
    }
    for y in 0..h {
        for x in 0..w {
            let px = average((-r..=r).map(|k| tmp.pixel(x, (y + k).clamp(0, h - 1))));
            out.set_pixel(x as u32, y as u32, px);
        }
    }
    out
}

fn average(pixels: impl Iterator<Item = PremulRgba8>) -> PremulRgba8 {
    let mut acc = [0u32; 4];
    let mut n = 0u32;
    for p in pixels {
        for c in 0..4 {
            acc[c] += u32::from(p[c]);
        }
        n += 1;
    }
    if n == 0 {
        return [0; 4];
    }
    acc.map(|v| ((v + n / 2) / n).min(255) as u8)
}

fn hash_u32(seed: u64, x: u32, y: u32) -> u32 {
    let mut h = Fnv1a64::new(seed ^ Fnv1a64::OFFSET_BASIS);
    h.write_u32(x);
    h.write_u32(y);
    (h.finish() & 0xFFFF_FFFF) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/preview/composite.rs"]
mod tests;
