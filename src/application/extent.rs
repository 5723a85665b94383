// Padded axis extents
use crate::domain::geometry::Extent;

/// Fractional padding added to each side of a non-constant range.
const RANGE_PADDING: f64 = 0.05;
/// Fraction of `max(1, |v|)` added to each side of a constant range.
const CONSTANT_PADDING: f64 = 0.1;

/// Padded `[min, max]` of `values`, computed in one pass.
///
/// Empty input yields `[0, 1]`; a constant series is widened by
/// `max(1, |v|) * 0.1` on each side so the range is never empty.
pub fn extent<I>(values: I) -> Extent
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = values.into_iter();
    let Some(first) = iter.next() else {
        return Extent::UNIT;
    };

    let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min == max {
        let delta = min.abs().max(1.0) * CONSTANT_PADDING;
        return Extent::new(min - delta, max + delta);
    }

    let padding = (max - min) * RANGE_PADDING;
    Extent::new(min - padding, max + padding)
}

/// Like [`extent`], with the lower bound clamped at zero. Plotted values are
/// physical magnitudes and never go below the baseline.
pub fn value_extent<I>(values: I) -> Extent
where
    I: IntoIterator<Item = f64>,
{
    let mut padded = extent(values);
    padded.min = padded.min.max(0.0);
    padded
}
