use crate::braille::BrailleCanvas;
use crate::chart::PieChartSpec;
use glam::DVec2;
use std::f64::consts::TAU;

/// Clockwise angle of `v` measured from 12 o'clock, in [0, TAU).
/// Screen y grows downward.
fn clock_angle(v: DVec2) -> f64 {
    v.x.atan2(-v.y).rem_euclid(TAU)
}

/// Unit vector pointing at clock angle `theta` (screen coordinates)
fn clock_direction(theta: f64) -> DVec2 {
    DVec2::new(theta.sin(), -theta.cos())
}

/// Angular extent of each slice, starting at 12 o'clock and going clockwise
fn slice_spans(pie: &PieChartSpec) -> Vec<(f64, f64)> {
    let total = pie.total();
    let mut start = 0.0;
    pie.slices
        .iter()
        .map(|slice| {
            let sweep = if total == 0 {
                0.0
            } else {
                slice.value as f64 / total as f64 * TAU
            };
            let span = (start, start + sweep);
            start += sweep;
            span
        })
        .collect()
}

/// Rasterize a pie into one Braille layer per slice, in slice order.
///
/// `width` and `height` are in terminal cells. Pulled slices are shifted
/// along their bisector by `pull * radius`; the radius shrinks so the
/// displaced slice still fits the area.
pub fn rasterize_pie(pie: &PieChartSpec, width: usize, height: usize) -> Vec<BrailleCanvas> {
    let mut layers: Vec<BrailleCanvas> = pie
        .slices
        .iter()
        .map(|_| BrailleCanvas::new(width, height))
        .collect();

    let (dot_w, dot_h) = (width * 2, height * 4);
    let max_pull = pie.slices.iter().map(|s| s.pull).fold(0.0, f64::max);
    let radius = (dot_w.min(dot_h) as f64 / 2.0) / (1.0 + max_pull) - 1.0;
    if radius < 1.0 || pie.total() == 0 {
        return layers;
    }

    let center = DVec2::new(dot_w as f64 / 2.0, dot_h as f64 / 2.0);
    let spans = slice_spans(pie);

    for ((slice, &(start, end)), layer) in pie.slices.iter().zip(&spans).zip(&mut layers) {
        if end <= start {
            continue;
        }
        let offset = clock_direction((start + end) / 2.0) * slice.pull * radius;
        let origin = center + offset;

        let min = (origin - DVec2::splat(radius)).floor().max(DVec2::ZERO);
        let max = (origin + DVec2::splat(radius)).ceil();

        for y in min.y as usize..=(max.y as usize).min(dot_h.saturating_sub(1)) {
            for x in min.x as usize..=(max.x as usize).min(dot_w.saturating_sub(1)) {
                // Sample the dot center
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) - origin;
                if p.length() > radius {
                    continue;
                }
                let theta = clock_angle(p);
                if theta >= start && theta < end {
                    layer.set_pixel(x, y);
                }
            }
        }
    }

    layers
}
