use super::RenderConfig;
use super::layout::Point;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};
use crate::perceive::rings::RingInfo;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const MARGIN: f64 = 60.0;
const MAX_BOND_PIXELS: f64 = 70.0;
const DASH: f64 = 6.0;
const GAP: f64 = 4.0;

/// Draws `molecule` at the given layout onto a white canvas.
pub fn draw(molecule: &Molecule, rings: &RingInfo, coords: &[Point], config: &RenderConfig) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(config.width, config.height, BACKGROUND);
    let view = Viewport::fit(coords, config.width, config.height);
    let bond_px = view.scale;
    let stroke = (bond_px / 25.0).clamp(1.0, 3.0);
    let spacing = bond_px * 0.16;

    for (b, bond) in molecule.bonds.iter().enumerate() {
        let p = view.project(coords[bond.i]);
        let q = view.project(coords[bond.j]);
        let inner_side = ring_center(rings, b, coords).map(|c| view.project(c));

        match bond.order {
            BondOrder::Single => thick_line(&mut canvas, p, q, stroke),
            BondOrder::Double => match inner_side {
                Some(center) => {
                    thick_line(&mut canvas, p, q, stroke);
                    let (a, b) = inner_segment(p, q, center, spacing);
                    thick_line(&mut canvas, a, b, stroke);
                }
                None => {
                    let (a1, b1) = offset(p, q, spacing / 2.0);
                    let (a2, b2) = offset(p, q, -spacing / 2.0);
                    thick_line(&mut canvas, a1, b1, stroke);
                    thick_line(&mut canvas, a2, b2, stroke);
                }
            },
            BondOrder::Triple => {
                thick_line(&mut canvas, p, q, stroke);
                for side in [spacing, -spacing] {
                    let (a, b) = offset(p, q, side);
                    thick_line(&mut canvas, a, b, stroke);
                }
            }
            BondOrder::Aromatic => {
                thick_line(&mut canvas, p, q, stroke);
                let center = inner_side.unwrap_or_else(|| offset(p, q, spacing).0);
                let (a, b) = inner_segment(p, q, center, spacing);
                dashed_line(&mut canvas, a, b, stroke);
            }
        }
    }

    let radius = (bond_px * 0.22).round().max(3.0) as i32;
    for (idx, atom) in molecule.atoms.iter().enumerate() {
        if atom.element == Element::C {
            continue;
        }
        let center = view.project(coords[idx]);
        let pixel = (center.x.round() as i32, center.y.round() as i32);
        draw_filled_circle_mut(&mut canvas, pixel, radius, atom_color(atom.element));
        draw_hollow_circle_mut(&mut canvas, pixel, radius, INK);
    }

    canvas
}

/// Maps layout coordinates onto the canvas, centred, with a uniform scale.
struct Viewport {
    scale: f64,
    origin: Point,
    center: Point,
}

impl Viewport {
    fn fit(coords: &[Point], width: u32, height: u32) -> Self {
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        if let Some(first) = coords.first() {
            (min_x, max_x, min_y, max_y) = (first.x, first.x, first.y, first.y);
        }
        for p in coords {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let usable_w = (f64::from(width) - 2.0 * MARGIN).max(1.0);
        let usable_h = (f64::from(height) - 2.0 * MARGIN).max(1.0);
        let span_x = (max_x - min_x).max(1e-6);
        let span_y = (max_y - min_y).max(1e-6);
        let scale = (usable_w / span_x).min(usable_h / span_y).min(MAX_BOND_PIXELS);

        Self {
            scale,
            origin: Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
            center: Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0),
        }
    }

    fn project(&self, p: Point) -> Point {
        // Image rows grow downward.
        Point::new(
            self.center.x + (p.x - self.origin.x) * self.scale,
            self.center.y - (p.y - self.origin.y) * self.scale,
        )
    }
}

fn ring_center(rings: &RingInfo, bond: usize, coords: &[Point]) -> Option<Point> {
    let ring = rings.rings().iter().find(|ring| ring.bonds.contains(&bond))?;
    let n = ring.size() as f64;
    let sum = ring
        .atoms
        .iter()
        .fold(Point::default(), |acc, &a| Point::new(acc.x + coords[a].x, acc.y + coords[a].y));
    Some(Point::new(sum.x / n, sum.y / n))
}

fn offset(p: Point, q: Point, distance: f64) -> (Point, Point) {
    let (nx, ny) = unit_normal(p, q);
    (
        Point::new(p.x + nx * distance, p.y + ny * distance),
        Point::new(q.x + nx * distance, q.y + ny * distance),
    )
}

/// A shortened copy of `p`-`q` shifted toward `center`.
fn inner_segment(p: Point, q: Point, center: Point, spacing: f64) -> (Point, Point) {
    let (nx, ny) = unit_normal(p, q);
    let mid = Point::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0);
    let toward = (center.x - mid.x) * nx + (center.y - mid.y) * ny;
    let side = if toward >= 0.0 { spacing } else { -spacing };
    let (a, b) = offset(p, q, side);
    let trim = 0.15;
    (
        Point::new(a.x + (b.x - a.x) * trim, a.y + (b.y - a.y) * trim),
        Point::new(b.x - (b.x - a.x) * trim, b.y - (b.y - a.y) * trim),
    )
}

fn unit_normal(p: Point, q: Point) -> (f64, f64) {
    let (dx, dy) = (q.x - p.x, q.y - p.y);
    let length = dx.hypot(dy).max(1e-9);
    (-dy / length, dx / length)
}

fn thick_line(canvas: &mut RgbImage, p: Point, q: Point, width: f64) {
    let (nx, ny) = unit_normal(p, q);
    let strokes = width.round().max(1.0) as i32;
    for k in 0..strokes {
        let shift = f64::from(k) - f64::from(strokes - 1) / 2.0;
        draw_line_segment_mut(
            canvas,
            ((p.x + nx * shift) as f32, (p.y + ny * shift) as f32),
            ((q.x + nx * shift) as f32, (q.y + ny * shift) as f32),
            INK,
        );
    }
}

fn dashed_line(canvas: &mut RgbImage, p: Point, q: Point, width: f64) {
    let length = p.distance(q);
    if length < 1e-6 {
        return;
    }
    let (ux, uy) = ((q.x - p.x) / length, (q.y - p.y) / length);
    let mut start = 0.0;
    while start < length {
        let end = (start + DASH).min(length);
        thick_line(
            canvas,
            Point::new(p.x + ux * start, p.y + uy * start),
            Point::new(p.x + ux * end, p.y + uy * end),
            width,
        );
        start = end + GAP;
    }
}

/// CPK colours for heteroatom discs.
fn atom_color(element: Element) -> Rgb<u8> {
    match element {
        Element::H => Rgb([235, 235, 235]),
        Element::N => Rgb([48, 80, 248]),
        Element::O => Rgb([255, 13, 13]),
        Element::F => Rgb([144, 224, 80]),
        Element::Cl => Rgb([31, 240, 31]),
        Element::Br => Rgb([166, 41, 41]),
        Element::I => Rgb([148, 0, 148]),
        Element::S => Rgb([255, 200, 50]),
        Element::P => Rgb([255, 128, 0]),
        Element::B => Rgb([255, 181, 181]),
        Element::Se => Rgb([255, 161, 0]),
        _ => Rgb([221, 119, 255]),
    }
}
