use std::f64::consts::TAU;

use glam::DVec2;

/// Axis-aligned rectangle `[min, max)` describing the toroidal domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub const fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(DVec2::ZERO, DVec2::new(width, height))
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Fractional position of `p` within the rectangle on each axis.
    pub fn fraction(&self, p: DVec2) -> DVec2 {
        (p - self.min) / self.size()
    }

    /// Single-step wrap back into `[min, max)` on each axis independently.
    /// Assumes `p` is less than one extent outside the rectangle.
    pub fn wrap(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            wrap_axis(p.x, self.min.x, self.max.x),
            wrap_axis(p.y, self.min.y, self.max.y),
        )
    }

    /// Uniform random point inside the rectangle.
    pub fn random_point(&self, rng: &mut fastrand::Rng) -> DVec2 {
        let x = self.min.x + rng.f64() * (self.max.x - self.min.x);
        let y = self.min.y + rng.f64() * (self.max.y - self.min.y);
        self.wrap(DVec2::new(x, y))
    }
}

fn wrap_axis(v: f64, lo: f64, hi: f64) -> f64 {
    let w = if v < lo {
        v + (hi - lo)
    } else if v >= hi {
        v - (hi - lo)
    } else {
        return v;
    };
    // Rounding can land a tiny negative exactly on the far edge.
    if w >= hi || w < lo {
        lo
    } else {
        w
    }
}

/// Floored modulo: result lies in `[0, n)` for negative `a` too.
#[inline]
pub fn floored_mod(a: f64, n: f64) -> f64 {
    ((a % n) + n) % n
}

/// Heading folded into `[0, 2π)`.
#[inline]
pub fn normalize_heading(angle: f64) -> f64 {
    floored_mod(angle, TAU)
}

/// Unit vector pointing along `heading`.
#[inline]
pub fn heading_vector(heading: f64) -> DVec2 {
    let (sin, cos) = heading.sin_cos();
    DVec2::new(cos, sin)
}

/// Heading vector rotated by -90°.
#[inline]
pub fn right_axis(heading: f64) -> DVec2 {
    let (sin, cos) = heading.sin_cos();
    DVec2::new(sin, -cos)
}

/// -1, 0 or +1. Unlike `f64::signum`, zero maps to zero.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else if x > 0.0 {
        1.0
    } else {
        0.0
    }
}
