use crate::model::molecule::Molecule;
use crate::perceive::rings::{Ring, RingInfo};
use std::collections::VecDeque;
use std::f64::consts::PI;

const RELAX_ITERATIONS: usize = 150;
const CONTACT_DISTANCE: f64 = 0.8;
const COMPONENT_GAP: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn distance(self, other: Point) -> f64 {
        self.sub(other).length()
    }
}

/// Unit-bond-length 2D coordinates for every atom.
///
/// Rings become regular polygons, fused rings are built outward across
/// their shared edge, and chains grow in a zigzag from placed atoms. A short
/// relaxation then pushes apart atoms that ended up too close. The result
/// depends only on the graph and its atom order.
pub fn compute(molecule: &Molecule, rings: &RingInfo) -> Vec<Point> {
    let adjacency = molecule.adjacency();
    let mut coords = vec![Point::default(); molecule.atom_count()];
    let mut offset = 0.0;

    for members in molecule.components() {
        let mut builder = Builder {
            adjacency: &adjacency,
            rings,
            positions: vec![None; molecule.atom_count()],
            depth: vec![0; molecule.atom_count()],
            ring_placed: vec![false; rings.rings().len()],
        };
        builder.place_component(&members);
        let mut local: Vec<(usize, Point)> = members
            .iter()
            .map(|&a| (a, builder.positions[a].unwrap_or_default()))
            .collect();

        relax(molecule, rings, &mut local);

        let min_x = local.iter().map(|(_, p)| p.x).fold(f64::INFINITY, f64::min);
        let max_x = local.iter().map(|(_, p)| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = local.iter().map(|(_, p)| p.y).fold(f64::INFINITY, f64::min);
        let max_y = local.iter().map(|(_, p)| p.y).fold(f64::NEG_INFINITY, f64::max);
        let shift = Point::new(offset - min_x, -(min_y + max_y) / 2.0);
        for (a, p) in local {
            coords[a] = p.add(shift);
        }
        offset += (max_x - min_x) + COMPONENT_GAP;
    }

    coords
}

struct Builder<'a> {
    adjacency: &'a [Vec<(usize, usize)>],
    rings: &'a RingInfo,
    positions: Vec<Option<Point>>,
    depth: Vec<usize>,
    ring_placed: Vec<bool>,
}

impl Builder<'_> {
    fn place_component(&mut self, members: &[usize]) {
        let Some(&start) = members.first() else {
            return;
        };

        let first_ring = self
            .rings
            .rings()
            .iter()
            .position(|ring| members.contains(&ring.atoms[0]));
        match first_ring {
            Some(r) => self.place_free_ring(r),
            None => self.positions[start] = Some(Point::default()),
        }

        let mut queue: VecDeque<usize> = members
            .iter()
            .copied()
            .filter(|&a| self.positions[a].is_some())
            .collect();

        loop {
            self.place_touching_rings(&mut queue);
            let Some(atom) = queue.pop_front() else {
                break;
            };
            for placed in self.place_substituents(atom) {
                queue.push_back(placed);
            }
        }
    }

    fn place_free_ring(&mut self, r: usize) {
        let rings = self.rings;
        let ring = &rings.rings()[r];
        let n = ring.size() as f64;
        let radius = circumradius(ring.size());
        let start = -PI / 2.0 + PI / n;
        for (k, &a) in ring.atoms.iter().enumerate() {
            self.positions[a] = Some(Point::polar(Point::default(), radius, start + 2.0 * PI * k as f64 / n));
        }
        self.ring_placed[r] = true;
    }

    /// Places every ring that already has at least one placed atom, until
    /// no further ring can be placed.
    fn place_touching_rings(&mut self, queue: &mut VecDeque<usize>) {
        let rings = self.rings;
        loop {
            let mut progress = false;
            for (r, ring) in rings.rings().iter().enumerate() {
                if self.ring_placed[r] {
                    continue;
                }
                let placed: Vec<usize> = (0..ring.size())
                    .filter(|&k| self.positions[ring.atoms[k]].is_some())
                    .collect();
                if placed.is_empty() {
                    continue;
                }

                let new_atoms = match shared_edge(ring, &placed) {
                    Some((ia, ib)) => self.place_fused_ring(ring, ia, ib),
                    None => self.place_attached_ring(ring, placed[0]),
                };
                queue.extend(new_atoms);
                self.ring_placed[r] = true;
                progress = true;
            }
            if !progress {
                break;
            }
        }
    }

    fn place_fused_ring(&mut self, ring: &Ring, ia: usize, ib: usize) -> Vec<usize> {
        let n = ring.size();
        let a = ring.atoms[ia];
        let b = ring.atoms[ib];
        let (pa, pb) = match (self.positions[a], self.positions[b]) {
            (Some(pa), Some(pb)) => (pa, pb),
            _ => return Vec::new(),
        };

        let mid = pa.add(pb).scale(0.5);
        let edge = pb.sub(pa);
        let normal = Point::new(-edge.y, edge.x).scale(1.0 / edge.length().max(1e-9));
        let apothem = 1.0 / (2.0 * (PI / n as f64).tan());

        // Build on the side away from the already placed neighbours.
        let crowd = self.placed_centroid_near(a, b);
        let side = if crowd.sub(mid).x * normal.x + crowd.sub(mid).y * normal.y > 0.0 {
            -1.0
        } else {
            1.0
        };
        let center = mid.add(normal.scale(side * apothem));
        self.place_around(ring, center, ia, ib)
    }

    fn place_attached_ring(&mut self, ring: &Ring, k: usize) -> Vec<usize> {
        let anchor = ring.atoms[k];
        let Some(p) = self.positions[anchor] else {
            return Vec::new();
        };
        let outward = self.outward_direction(anchor);
        let center = p.add(outward.scale(circumradius(ring.size())));
        let n = ring.size();
        let step = 2.0 * PI / n as f64;
        let start = p.sub(center).angle();

        let mut placed = Vec::new();
        for j in 1..n {
            let atom = ring.atoms[(k + j) % n];
            if self.positions[atom].is_none() {
                self.positions[atom] = Some(Point::polar(center, circumradius(n), start + step * j as f64));
                self.depth[atom] = self.depth[anchor] + 1;
                placed.push(atom);
            }
        }
        placed
    }

    /// Places the unplaced atoms of `ring` on the polygon around `center`,
    /// keeping the positions of atoms `ia` and `ib`.
    fn place_around(&mut self, ring: &Ring, center: Point, ia: usize, ib: usize) -> Vec<usize> {
        let n = ring.size();
        let (Some(pa), Some(pb)) = (self.positions[ring.atoms[ia]], self.positions[ring.atoms[ib]]) else {
            return Vec::new();
        };
        let radius = circumradius(n);
        let phi_a = pa.sub(center).angle();
        let delta = wrap_angle(pb.sub(center).angle() - phi_a);
        let forward = (ia + 1) % n == ib;

        let mut placed = Vec::new();
        for j in 1..n {
            let k = if forward { (ia + j) % n } else { (ia + n - j) % n };
            let atom = ring.atoms[k];
            if self.positions[atom].is_none() {
                self.positions[atom] = Some(Point::polar(center, radius, phi_a + delta * j as f64));
                self.depth[atom] = self.depth[ring.atoms[ia]] + 1;
                placed.push(atom);
            }
        }
        placed
    }

    /// Places the unplaced neighbours of `atom` and returns them.
    fn place_substituents(&mut self, atom: usize) -> Vec<usize> {
        let Some(p) = self.positions[atom] else {
            return Vec::new();
        };
        let pending: Vec<usize> = self.adjacency[atom]
            .iter()
            .map(|&(nb, _)| nb)
            .filter(|&nb| self.positions[nb].is_none())
            .collect();
        if pending.is_empty() {
            return pending;
        }

        let placed_dirs: Vec<f64> = self.adjacency[atom]
            .iter()
            .filter_map(|&(nb, _)| self.positions[nb])
            .map(|q| q.sub(p).angle())
            .collect();

        let angles: Vec<f64> = match placed_dirs.as_slice() {
            [] => {
                let step = if pending.len() == 2 { 2.0 * PI / 3.0 } else { 2.0 * PI / pending.len() as f64 };
                (0..pending.len()).map(|k| -PI / 6.0 + step * k as f64).collect()
            }
            [single] => {
                let turn = if self.depth[atom] % 2 == 0 { 1.0 } else { -1.0 };
                match pending.len() {
                    1 => vec![single + turn * 2.0 * PI / 3.0],
                    2 => vec![single + 2.0 * PI / 3.0, single - 2.0 * PI / 3.0],
                    m => {
                        let step = 2.0 * PI / (m + 1) as f64;
                        (1..=m).map(|k| single + step * k as f64).collect()
                    }
                }
            }
            _ => {
                let outward = self.outward_direction(atom).angle();
                let spread = PI / 3.0;
                let m = pending.len();
                (0..m)
                    .map(|k| outward + spread * (k as f64 - (m - 1) as f64 / 2.0))
                    .collect()
            }
        };

        for (&nb, angle) in pending.iter().zip(angles) {
            self.positions[nb] = Some(Point::polar(p, 1.0, angle));
            self.depth[nb] = self.depth[atom] + 1;
        }
        pending
    }

    /// Unit vector pointing away from the placed neighbours of `atom`.
    fn outward_direction(&self, atom: usize) -> Point {
        let Some(p) = self.positions[atom] else {
            return Point::new(1.0, 0.0);
        };
        let mut sum = Point::default();
        for &(nb, _) in &self.adjacency[atom] {
            if let Some(q) = self.positions[nb] {
                let d = q.sub(p);
                sum = sum.add(d.scale(1.0 / d.length().max(1e-9)));
            }
        }
        let away = sum.scale(-1.0);
        if away.length() < 1e-6 {
            Point::new(1.0, 0.0)
        } else {
            away.scale(1.0 / away.length())
        }
    }

    fn placed_centroid_near(&self, a: usize, b: usize) -> Point {
        let mut sum = Point::default();
        let mut count: f64 = 0.0;
        for &center in &[a, b] {
            for &(nb, _) in &self.adjacency[center] {
                if nb == a || nb == b {
                    continue;
                }
                if let Some(q) = self.positions[nb] {
                    sum = sum.add(q);
                    count += 1.0;
                }
            }
        }
        match (self.positions[a], self.positions[b]) {
            (Some(pa), Some(pb)) if count == 0.0 => pa.add(pb).scale(0.5),
            _ => sum.scale(1.0 / count.max(1.0)),
        }
    }
}

/// Adjacent placed ring positions `(ia, ib)`, if any.
fn shared_edge(ring: &Ring, placed: &[usize]) -> Option<(usize, usize)> {
    let n = ring.size();
    placed
        .iter()
        .find_map(|&k| {
            let next = (k + 1) % n;
            placed.contains(&next).then_some((k, next))
        })
}

fn circumradius(n: usize) -> f64 {
    1.0 / (2.0 * (PI / n as f64).sin())
}

fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Pushes apart non-bonded atoms closer than the contact distance while
/// pulling bonded atoms back toward unit length. Ring atoms move less so
/// polygons keep their shape.
fn relax(molecule: &Molecule, rings: &RingInfo, local: &mut [(usize, Point)]) {
    if local.len() < 3 {
        return;
    }
    let index: std::collections::HashMap<usize, usize> =
        local.iter().enumerate().map(|(k, &(a, _))| (a, k)).collect();
    let bonds: Vec<(usize, usize)> = molecule
        .bonds
        .iter()
        .filter_map(|b| Some((*index.get(&b.i)?, *index.get(&b.j)?)))
        .collect();
    let mobility: Vec<f64> = local
        .iter()
        .map(|&(a, _)| if rings.is_ring_atom(a) { 0.2 } else { 1.0 })
        .collect();

    for _ in 0..RELAX_ITERATIONS {
        let mut forces = vec![Point::default(); local.len()];
        let mut moved = false;

        for u in 0..local.len() {
            for v in (u + 1)..local.len() {
                let d = local[v].1.sub(local[u].1);
                let dist = d.length();
                if dist >= CONTACT_DISTANCE || bonds.contains(&(u, v)) || bonds.contains(&(v, u)) {
                    continue;
                }
                let dir = if dist < 1e-9 {
                    Point::new(1.0, 0.0)
                } else {
                    d.scale(1.0 / dist)
                };
                let push = dir.scale(0.5 * (CONTACT_DISTANCE - dist));
                forces[u] = forces[u].sub(push);
                forces[v] = forces[v].add(push);
                moved = true;
            }
        }

        for &(u, v) in &bonds {
            let d = local[v].1.sub(local[u].1);
            let dist = d.length().max(1e-9);
            let pull = d.scale(0.25 * (dist - 1.0) / dist);
            forces[u] = forces[u].add(pull);
            forces[v] = forces[v].sub(pull);
        }

        if !moved {
            break;
        }
        for (k, force) in forces.into_iter().enumerate() {
            local[k].1 = local[k].1.add(force.scale(mobility[k]));
        }
    }
}
