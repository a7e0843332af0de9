//! Continuous scales mapping data values to pixel values.

/// Min and max of a sequence, ignoring NaN. `None` when empty.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Linear interpolation from a domain onto a range.
///
/// A degenerate domain (`lo == hi`) maps every input to the range midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Clamp outputs to the range.
    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn scale(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        let mut t = (x - d0) / (d1 - d0);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }
}

/// Square-root scale: equal steps in output area for equal steps in input.
/// Negative inputs use the signed root, so the scale stays monotone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    inner: LinearScale,
}

fn signed_sqrt(x: f64) -> f64 {
    x.signum() * x.abs().sqrt()
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((signed_sqrt(domain.0), signed_sqrt(domain.1)), range),
        }
    }

    pub fn clamped(mut self) -> Self {
        self.inner = self.inner.clamped();
        self
    }

    pub fn scale(&self, x: f64) -> f64 {
        self.inner.scale(signed_sqrt(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        let s = LinearScale::new((0.0, 10.0), (100.0, 200.0));
        assert_eq!(s.scale(5.0), 150.0);
        assert_eq!(s.scale(20.0), 300.0);
        assert_eq!(s.clamped().scale(20.0), 200.0);
    }

    #[test]
    fn test_inverted_range() {
        let s = LinearScale::new((0.0, 4.0), (300.0, 100.0));
        assert_eq!(s.scale(4.0), 100.0);
        assert_eq!(s.scale(0.0), 300.0);
    }

    #[test]
    fn test_degenerate_domain_is_midpoint() {
        let s = LinearScale::new((2.0, 2.0), (10.0, 20.0));
        assert_eq!(s.scale(2.0), 15.0);
        assert_eq!(s.scale(-7.0), 15.0);
        assert_eq!(SqrtScale::new((3.0, 3.0), (4.0, 8.0)).scale(3.0), 6.0);
    }

    #[test]
    fn test_sqrt_area_proportional() {
        let s = SqrtScale::new((0.0, 100.0), (0.0, 10.0));
        assert_eq!(s.scale(25.0), 5.0);
        assert_eq!(s.scale(100.0), 10.0);
    }

    #[test]
    fn test_sqrt_signed_monotone() {
        let s = SqrtScale::new((-4.0, 4.0), (0.0, 1.0)).clamped();
        assert!(s.scale(-4.0) < s.scale(-1.0));
        assert!(s.scale(-1.0) < s.scale(0.0));
        assert!(s.scale(0.0) < s.scale(1.0));
        assert_eq!(s.scale(9.0), 1.0);
    }

    #[test]
    fn test_extent() {
        assert_eq!(extent([3.0, -1.0, f64::NAN, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(extent(Vec::<f64>::new()), None);
    }
}
