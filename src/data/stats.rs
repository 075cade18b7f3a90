// ---------------------------------------------------------------------------
// Descriptive aggregation behind the charts
// ---------------------------------------------------------------------------

/// Distinct integral values up to this count get one bar each.
const MAX_DISCRETE_BINS: usize = 20;

/// One histogram bar covering `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub value: f64,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Count histogram with automatic binning.
///
/// Small sets of integral values (scores, ratings) get one unit-wide bar per
/// value; anything else is split into Sturges' number of equal-width bins.
pub fn count_histogram(values: &[f64]) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let mut distinct = finite.clone();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();

    if distinct.len() <= MAX_DISCRETE_BINS && distinct.iter().all(|v| v.fract() == 0.0) {
        return distinct
            .iter()
            .map(|&v| HistogramBin {
                start: v - 0.5,
                end: v + 0.5,
                value: finite.iter().filter(|&&x| x == v).count() as f64,
            })
            .collect();
    }

    let bins = (finite.len() as f64).log2().ceil() as usize + 1;
    let weighted: Vec<(f64, f64)> = finite.iter().map(|&v| (v, 1.0)).collect();
    weighted_histogram(&weighted, bins)
}

/// Equal-width histogram over the `x` of each `(x, weight)` pair; bar height is
/// the summed weight of the pairs falling into the bin.
pub fn weighted_histogram(pairs: &[(f64, f64)], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|(x, w)| x.is_finite() && w.is_finite())
        .collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max = finite.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);

    if max - min < f64::EPSILON {
        return vec![HistogramBin {
            start: min - 0.5,
            end: max + 0.5,
            value: finite.iter().map(|p| p.1).sum(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut sums = vec![0.0; bins];
    for &(x, w) in &finite {
        let idx = (((x - min) / width).floor() as usize).min(bins - 1);
        sums[idx] += w;
    }

    sums.into_iter()
        .enumerate()
        .map(|(i, value)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            value,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot summary
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Linear-interpolated quantile of sorted data, `p` in `[0, 1]`.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Quartiles plus whiskers at the most extreme points within 1.5 IQR.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&x| x >= lower_fence)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&x| x <= upper_fence)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|&x| x < lower_fence || x > upper_fence)
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_scores_get_one_bar_each() {
        let bins = count_histogram(&[3.0, 1.0, 3.0, 4.0, 3.0]);
        let summary: Vec<(f64, f64)> = bins.iter().map(|b| (b.center(), b.value)).collect();
        assert_eq!(summary, vec![(1.0, 1.0), (3.0, 3.0), (4.0, 1.0)]);
        assert!(bins.iter().all(|b| (b.width() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn continuous_values_use_sturges_bins() {
        let values: Vec<f64> = (0..16).map(|i| i as f64 * 0.5).collect();
        let bins = count_histogram(&values);
        // log2(16) + 1
        assert_eq!(bins.len(), 5);
        let total: f64 = bins.iter().map(|b| b.value).sum();
        assert_eq!(total, 16.0);
    }

    #[test]
    fn empty_input_gives_no_bins() {
        assert!(count_histogram(&[]).is_empty());
        assert!(weighted_histogram(&[], 8).is_empty());
        assert!(box_summary(&[]).is_none());
    }

    #[test]
    fn weighted_histogram_sums_weights_per_bin() {
        // ages 20..=60 in 8 bins of width 5
        let pairs = [(20.0, 100.0), (22.0, 50.0), (41.0, 10.0), (60.0, 7.0)];
        let bins = weighted_histogram(&pairs, 8);
        assert_eq!(bins.len(), 8);
        assert_eq!(bins[0].value, 150.0);
        assert_eq!(bins[4].value, 10.0);
        // maximum lands in the closed last bin
        assert_eq!(bins[7].value, 7.0);
        assert_eq!(bins[0].start, 20.0);
        assert_eq!(bins[7].end, 60.0);
    }

    #[test]
    fn single_value_histogram_is_one_bar() {
        let bins = weighted_histogram(&[(30.0, 2.0), (30.0, 3.0)], 8);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].value, 5.0);
        assert_eq!(bins[0].center(), 30.0);
    }

    #[test]
    fn box_summary_interpolates_quartiles() {
        let s = box_summary(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!((s.q1, s.median, s.q3), (2.0, 3.0, 4.0));
        assert_eq!((s.lower_whisker, s.upper_whisker), (1.0, 5.0));
        assert!(s.outliers.is_empty());
    }

    #[test]
    fn box_summary_separates_outliers() {
        let s = box_summary(&[10.0, 11.0, 12.0, 13.0, 100.0]).unwrap();
        assert_eq!(s.outliers, vec![100.0]);
        assert_eq!(s.upper_whisker, 13.0);
        assert_eq!(s.lower_whisker, 10.0);
    }
}
