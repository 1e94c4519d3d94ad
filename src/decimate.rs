//! Max-hold reduction of a spectrum to one point per pixel column.

/// Decimated stereo curve on a shared x axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayCurve {
    positions: Vec<f32>,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl DisplayCurve {
    pub fn with_capacity(capacity: usize) -> DisplayCurve {
        DisplayCurve {
            positions: Vec::with_capacity(capacity),
            left: Vec::with_capacity(capacity),
            right: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize { self.positions.len() }
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }
    pub fn positions(&self) -> &[f32] { &self.positions }
    pub fn left(&self) -> &[f32] { &self.left }
    pub fn right(&self) -> &[f32] { &self.right }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.left.clear();
        self.right.clear();
    }

    fn push(&mut self, x: f32, left: f32, right: f32) {
        self.positions.push(x);
        self.left.push(left);
        self.right.push(right);
    }
}

/// Reduce `(positions, left, right)` to at most one point per pixel column
/// of a `pixel_width` wide viewport showing the first `view_fraction` of the
/// axis. Each emitted point sits at the position of the first bin in its
/// column and carries the maximum of every bin in that column. A bin on the
/// right edge still gets a column; bins past it are dropped.
pub fn decimate_into(
    positions: &[f32],
    left: &[f32],
    right: &[f32],
    pixel_width: usize,
    view_fraction: f32,
    out: &mut DisplayCurve,
) {
    assert_eq!(positions.len(), left.len());
    assert_eq!(positions.len(), right.len());
    out.clear();
    if positions.is_empty() || pixel_width == 0 || !(view_fraction > 0.0) {
        return;
    }

    let width = pixel_width as f32;
    let scale = width / view_fraction;
    let column = |x: f32| (x * scale).floor();

    let mut bucket = column(positions[0]);
    if bucket > width {
        return;
    }
    let mut x0 = positions[0];
    let mut max_l = left[0];
    let mut max_r = right[0];

    for i in 1..positions.len() {
        let col = column(positions[i]);
        if col > width {
            break;
        }
        if col > bucket {
            out.push(x0, max_l, max_r);
            bucket = col;
            x0 = positions[i];
            max_l = left[i];
            max_r = right[i];
        } else {
            max_l = max_l.max(left[i]);
            max_r = max_r.max(right[i]);
        }
    }
    out.push(x0, max_l, max_r);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_positions(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32 / (n - 1) as f32).collect()
    }

    fn wobble(n: usize, seed: u32) -> Vec<f32> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                -120.0 + (state >> 8) as f32 / (1u32 << 24) as f32 * 100.0
            })
            .collect()
    }

    #[test]
    fn wide_viewport_leaves_curve_untouched() {
        let x = linear_positions(9);
        let l = wobble(9, 1);
        let r = wobble(9, 2);
        let mut out = DisplayCurve::default();
        decimate_into(&x, &l, &r, 16, 1.0, &mut out);
        assert_eq!(out.positions(), &x[..]);
        assert_eq!(out.left(), &l[..]);
        assert_eq!(out.right(), &r[..]);

        let mut again = DisplayCurve::default();
        decimate_into(out.positions(), out.left(), out.right(), 16, 1.0, &mut again);
        assert_eq!(again, out);
    }

    #[test]
    fn narrow_viewport_holds_column_maxima() {
        let n = 1025;
        let width = 100;
        let x = linear_positions(n);
        let l = wobble(n, 7);
        let r = wobble(n, 11);
        let mut out = DisplayCurve::default();
        decimate_into(&x, &l, &r, width, 1.0, &mut out);

        assert!(out.len() <= width + 1);
        assert!(out.len() <= n);

        // Group the input by column and compare against each emitted point.
        let scale = width as f32;
        let mut k = 0;
        let mut i = 0;
        while i < n {
            let col = (x[i] * scale).floor();
            let mut j = i;
            let (mut ml, mut mr) = (f32::MIN, f32::MIN);
            while j < n && (x[j] * scale).floor() == col {
                ml = ml.max(l[j]);
                mr = mr.max(r[j]);
                j += 1;
            }
            assert_eq!(out.positions()[k], x[i]);
            assert_eq!(out.left()[k], ml);
            assert_eq!(out.right()[k], mr);
            assert!(l[i..j].iter().all(|&v| v <= out.left()[k]));
            k += 1;
            i = j;
        }
        assert_eq!(k, out.len());
    }

    #[test]
    fn single_bin_spike_survives() {
        let n = 2049;
        let x = linear_positions(n);
        let mut l = vec![-100.0; n];
        l[1234] = -3.0;
        let r = vec![-100.0; n];
        let mut out = DisplayCurve::default();
        decimate_into(&x, &l, &r, 37, 1.0, &mut out);
        assert!(out.left().contains(&-3.0));
    }

    #[test]
    fn bins_past_the_visible_width_are_dropped() {
        let x = linear_positions(513);
        let l = wobble(513, 3);
        let r = wobble(513, 4);
        let mut out = DisplayCurve::default();
        decimate_into(&x, &l, &r, 200, 0.25, &mut out);
        assert!(!out.is_empty());
        assert!(out.len() <= 201);
        assert!(out.positions().iter().all(|&p| p <= 0.25));
    }

    #[test]
    fn degenerate_viewport_yields_nothing() {
        let x = linear_positions(5);
        let v = vec![0.0; 5];
        let mut out = DisplayCurve::default();
        decimate_into(&x, &v, &v, 0, 1.0, &mut out);
        assert!(out.is_empty());
        decimate_into(&x, &v, &v, 100, 0.0, &mut out);
        assert!(out.is_empty());
    }
}
