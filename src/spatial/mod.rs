use glam::{DVec2, IVec2, UVec2};

use crate::geometry::Rect;

/// Largest fraction used when mapping a position to a cell, so rounding at
/// the far edge never yields index == dimension.
const MAX_FRACTION: f64 = 0.999_999;

/// Toroidal uniform grid over the domain for O(1) neighbor queries.
///
/// Cell side must be >= the sensing radius so the 3x3 block around a
/// particle's cell covers its whole sensing disc. Each cell holds indices
/// into the simulation's particle vec; cleared and refilled every step.
pub struct Grid {
    bounds: Rect,
    dims: IVec2,
    cell_size: DVec2,
    /// Row-major, `y * X + x`. Pre-allocated, cleared each rebuild.
    cells: Vec<Vec<u32>>,
}

impl Grid {
    pub fn new(bounds: Rect, dims: UVec2) -> Self {
        let count = dims.x as usize * dims.y as usize;
        let mut cells = Vec::with_capacity(count);
        for _ in 0..count {
            // Keeps allocation across rebuilds.
            cells.push(Vec::with_capacity(8));
        }
        Self {
            bounds,
            dims: dims.as_ivec2(),
            cell_size: bounds.size() / dims.as_dvec2(),
            cells,
        }
    }

    /// Grid dimensions for a domain: domain extent divided by the sensing
    /// radius, truncated, so every cell side is >= `radius`.
    pub fn dims_for(bounds: &Rect, radius: f64) -> UVec2 {
        let n = (bounds.size() / radius).floor();
        UVec2::new(n.x as u32, n.y as u32)
    }

    pub fn dims(&self) -> UVec2 {
        self.dims.as_uvec2()
    }

    pub fn cell_size(&self) -> DVec2 {
        self.cell_size
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    /// Clear all cells. Call at start of each rebuild.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Append a particle index to a cell. `cell` must be in range.
    pub fn insert(&mut self, cell: IVec2, index: u32) {
        let i = self.flat(cell);
        self.cells[i].push(index);
    }

    /// Map a world position to its cell. Positions inside the domain always
    /// land in `[0, X) x [0, Y)`. Positions outside it are not meaningful
    /// here; callers check `Rect::contains` first.
    pub fn cell_index_for(&self, pos: DVec2) -> IVec2 {
        let frac = self.bounds.fraction(pos).min(DVec2::splat(MAX_FRACTION));
        let raw = (frac * self.dims.as_dvec2()).as_ivec2();
        (raw + self.dims) % self.dims
    }

    pub fn in_range(&self, cell: IVec2) -> bool {
        cell.cmpge(IVec2::ZERO).all() && cell.cmplt(self.dims).all()
    }

    /// True for cells on the outer ring, whose wrapped neighbors sit on the
    /// opposite side of the domain.
    pub fn on_boundary(&self, cell: IVec2) -> bool {
        cell.x == 0 || cell.y == 0 || cell.x == self.dims.x - 1 || cell.y == self.dims.y - 1
    }

    pub fn cell(&self, cell: IVec2) -> &[u32] {
        &self.cells[self.flat(cell)]
    }

    /// The 3x3 block around `center`, wrapped, each paired with the offset to
    /// add to positions found there so they share `center`'s unwrapped frame.
    pub fn neighborhood(&self, center: IVec2) -> impl Iterator<Item = (&[u32], DVec2)> + '_ {
        let fix = self.on_boundary(center);
        let span = self.bounds.size();
        (-1i32..=1).flat_map(move |dy| {
            (-1i32..=1).map(move |dx| {
                let cell = (center + IVec2::new(dx, dy) + self.dims) % self.dims;
                let offset = if fix {
                    wrap_offset(cell - center, span)
                } else {
                    DVec2::ZERO
                };
                (self.cell(cell), offset)
            })
        })
    }

    /// Number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    fn flat(&self, cell: IVec2) -> usize {
        cell.y as usize * self.dims.x as usize + cell.x as usize
    }
}

/// A wrapped neighbor cell more than one index away really lies one domain
/// extent the other way.
fn wrap_offset(step: IVec2, span: DVec2) -> DVec2 {
    let axis = |d: i32, s: f64| {
        if d > 1 {
            -s
        } else if d < -1 {
            s
        } else {
            0.0
        }
    };
    DVec2::new(axis(step.x, span.x), axis(step.y, span.y))
}
