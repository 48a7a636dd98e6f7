//! Lazy Cartesian product over a list of axes.
//!
//! The last axis varies fastest, so the output order matches a recursive
//! product that fixes the first axis outermost.

/// Iterator over every combination of one value per axis.
///
/// An empty axis list yields exactly one empty combination; any empty axis
/// yields nothing.
pub struct CartesianProduct<'a, T> {
    axes: &'a [Vec<T>],
    indices: Vec<usize>,
    done: bool,
}

impl<'a, T> CartesianProduct<'a, T> {
    pub fn new(axes: &'a [Vec<T>]) -> Self {
        Self {
            axes,
            indices: vec![0; axes.len()],
            done: axes.iter().any(|axis| axis.is_empty()),
        }
    }
}

impl<'a, T> Iterator for CartesianProduct<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let combo = self
            .indices
            .iter()
            .zip(self.axes)
            .map(|(index, axis)| &axis[*index])
            .collect();

        // Advance the odometer; wrapping past the first axis ends iteration.
        self.done = true;
        for pos in (0..self.axes.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.axes[pos].len() {
                self.done = false;
                break;
            }
            self.indices[pos] = 0;
        }

        Some(combo)
    }
}

/// Number of combinations, saturating at `u64::MAX`.
pub fn product_len<T>(axes: &[Vec<T>]) -> u64 {
    axes.iter()
        .fold(1u64, |acc, axis| acc.saturating_mul(axis.len() as u64))
}

/// Combination at position `index` of the iteration order, without
/// enumerating the ones before it.
pub fn combination_at<T>(axes: &[Vec<T>], mut index: u64) -> Option<Vec<&T>> {
    if index >= product_len(axes) {
        return None;
    }

    let mut combo = Vec::with_capacity(axes.len());
    for axis in axes.iter().rev() {
        let len = axis.len() as u64;
        combo.push(&axis[(index % len) as usize]);
        index /= len;
    }
    combo.reverse();
    Some(combo)
}
