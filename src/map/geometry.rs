use crate::braille::BrailleCanvas;
use crate::color::Rgb;
use glam::DVec2;

/// Dash pattern in dots: `on` drawn, then `off` skipped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashArray {
    pub on: u32,
    pub off: u32,
}

impl DashArray {
    /// Equal dash and gap, like a single-value SVG `dash-array`
    pub const fn uniform(len: u32) -> Self {
        Self { on: len, off: len }
    }
}

/// How a path is stroked on the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    /// Square pen size in dots
    pub thickness: i32,
    pub dash: Option<DashArray>,
}

/// Walks along a stroked path so dashes continue across segments
struct Pen {
    stroke: Stroke,
    travelled: u32,
}

impl Pen {
    fn new(stroke: Stroke) -> Self {
        Self { stroke, travelled: 0 }
    }

    fn step(&mut self, canvas: &mut BrailleCanvas, x: i32, y: i32) {
        let ink = match self.stroke.dash {
            Some(dash) if dash.on + dash.off > 0 => self.travelled % (dash.on + dash.off) < dash.on,
            _ => true,
        };
        self.travelled = self.travelled.wrapping_add(1);
        if !ink {
            return;
        }
        let t = self.stroke.thickness.max(1);
        let lo = -(t - 1) / 2;
        for oy in lo..lo + t {
            for ox in lo..lo + t {
                canvas.set_pixel_signed(x + ox, y + oy, self.stroke.color);
            }
        }
    }
}

/// Walk a line using Bresenham's algorithm, calling `plot` for every pixel
fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        plot(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Stroke a projected polyline. Segments longer than `max_jump` are skipped
/// (antimeridian wraps) and segments entirely off-canvas are not rasterised,
/// but both still advance the dash pattern.
pub fn stroke_path(canvas: &mut BrailleCanvas, points: &[(i32, i32)], stroke: Stroke, max_jump: i32) {
    let (w, h) = ((canvas.width() * 2) as i32, (canvas.height() * 4) as i32);
    let mut pen = Pen::new(stroke);

    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let span = (x1 - x0).abs().max((y1 - y0).abs());
        if span > max_jump {
            continue;
        }
        let visible = x0.max(x1) >= 0 && x0.min(x1) < w && y0.max(y1) >= 0 && y0.min(y1) < h;
        if !visible {
            pen.travelled = pen.travelled.wrapping_add(span as u32);
            continue;
        }
        bresenham(x0, y0, x1, y1, |x, y| pen.step(canvas, x, y));
    }
}

/// Fill every character cell whose center lies inside the projected rings
/// (even-odd rule, so holes stay empty).
pub fn fill_rings(canvas: &mut BrailleCanvas, rings: &[Vec<DVec2>], color: Rgb) {
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in rings.iter().flatten() {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }

    let first_row = ((min_y - 2.0) / 4.0).ceil().max(0.0) as usize;
    let last_row = (((max_y - 2.0) / 4.0).floor()).min(canvas.height() as f64 - 1.0);
    if last_row < 0.0 {
        return;
    }

    let mut crossings: Vec<f64> = Vec::new();
    for cy in first_row..=last_row as usize {
        let yc = cy as f64 * 4.0 + 2.0;
        crossings.clear();
        for ring in rings {
            for (a, b) in ring.iter().zip(ring.iter().cycle().skip(1)) {
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = ((span[0] - 1.0) / 2.0).ceil().max(0.0);
            let end = ((span[1] - 1.0) / 2.0).ceil().min(canvas.width() as f64);
            let mut cx = start as usize;
            while (cx as f64) < end {
                canvas.fill_cell(cx, cy, color);
                cx += 1;
            }
        }
    }
}

/// Even-odd point-in-polygon test over all rings
pub fn rings_contain(rings: &[Vec<DVec2>], p: DVec2) -> bool {
    let mut inside = false;
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}

/// Bounding box of a set of rings as (min, max); `None` when empty
pub fn bounding_box(rings: &[Vec<DVec2>]) -> Option<(DVec2, DVec2)> {
    let mut points = rings.iter().flatten();
    let first = *points.next()?;
    Some(points.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgb = Rgb::WHITE;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(x0, y0),
            DVec2::new(x1, y0),
            DVec2::new(x1, y1),
            DVec2::new(x0, y1),
        ]
    }

    fn solid() -> Stroke {
        Stroke { color: INK, thickness: 1, dash: None }
    }

    fn lit_dots(canvas: &BrailleCanvas) -> u32 {
        canvas.rows().flatten().map(|c| c.dots.count_ones()).sum()
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        stroke_path(&mut canvas, &[(0, 0), (9, 0)], solid(), 100);
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        stroke_path(&mut canvas, &[(0, 0), (0, 7)], solid(), 100);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_dashes_skip_gaps() {
        let mut canvas = BrailleCanvas::new(8, 1);
        let stroke = Stroke { color: INK, thickness: 1, dash: Some(DashArray::uniform(4)) };
        stroke_path(&mut canvas, &[(0, 0), (15, 0)], stroke, 100);
        // 4 on, 4 off: dots 0-3 and 8-11
        assert_eq!(canvas.to_string(), "⠉⠉⠀⠀⠉⠉⠀⠀");
    }

    #[test]
    fn test_thickness_widens_stroke() {
        let thin = solid();
        let thick = Stroke { thickness: 2, ..thin };

        let mut a = BrailleCanvas::new(8, 2);
        stroke_path(&mut a, &[(0, 3), (15, 3)], thin, 100);
        let mut b = BrailleCanvas::new(8, 2);
        stroke_path(&mut b, &[(0, 3), (15, 3)], thick, 100);

        assert_eq!(lit_dots(&a), 16);
        assert_eq!(lit_dots(&b), 32);
    }

    #[test]
    fn test_long_jumps_are_skipped() {
        let mut canvas = BrailleCanvas::new(8, 1);
        stroke_path(&mut canvas, &[(0, 0), (15, 0)], solid(), 10);
        assert_eq!(lit_dots(&canvas), 0);
    }

    #[test]
    fn test_fill_square_cells() {
        let mut canvas = BrailleCanvas::new(6, 4);
        fill_rings(&mut canvas, &[square(2.0, 4.0, 8.0, 12.0)], INK);
        let filled: Vec<(usize, usize)> = (0..4)
            .flat_map(|cy| (0..6).map(move |cx| (cx, cy)))
            .filter(|&(cx, cy)| canvas.cell(cx, cy).and_then(|c| c.bg).is_some())
            .collect();
        // Cell centers at x = 3, 5, 7 and y = 6, 10
        assert_eq!(filled, [(1, 1), (2, 1), (3, 1), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_fill_respects_holes() {
        let mut canvas = BrailleCanvas::new(10, 5);
        let outer = square(0.0, 0.0, 20.0, 20.0);
        let hole = square(6.0, 6.0, 14.0, 14.0);
        fill_rings(&mut canvas, &[outer, hole], INK);
        assert!(canvas.cell(0, 0).unwrap().bg.is_some());
        assert!(canvas.cell(4, 2).unwrap().bg.is_none());
    }

    #[test]
    fn test_rings_contain() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let hole = square(4.0, 4.0, 6.0, 6.0);
        let rings = vec![outer, hole];
        assert!(rings_contain(&rings, DVec2::new(1.0, 1.0)));
        assert!(!rings_contain(&rings, DVec2::new(5.0, 5.0)));
        assert!(!rings_contain(&rings, DVec2::new(11.0, 5.0)));
    }

    #[test]
    fn test_bounding_box() {
        let rings = vec![square(-3.0, 1.0, 4.0, 2.0)];
        let (min, max) = bounding_box(&rings).unwrap();
        assert_eq!(min, DVec2::new(-3.0, 1.0));
        assert_eq!(max, DVec2::new(4.0, 2.0));
        assert!(bounding_box(&[]).is_none());
    }
}
