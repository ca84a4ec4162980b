use serde::{Deserialize, Serialize};

/// A single time-to-event observation.
///
/// An observation either ends in the event of interest at `time`, or is
/// right-censored there (the event was not observed before the sample ended).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Duration until the event or censoring.
    pub time: f64,
    /// `true` if the observation was censored (event did not occur).
    pub is_censored: bool,
    /// Contribution of this observation to at-risk and event counts.
    pub weight: f64,
}

impl Observation {
    /// Creates an observation with unit weight.
    #[must_use]
    pub fn new(time: f64, is_censored: bool) -> Self {
        Self {
            time,
            is_censored,
            weight: 1.0,
        }
    }

    /// Returns the same observation with a custom weight.
    #[must_use]
    pub fn with_weight(self, weight: f64) -> Self {
        Self { weight, ..self }
    }

    /// Whether the event of interest was observed.
    #[must_use]
    pub fn is_event(&self) -> bool {
        !self.is_censored
    }
}

impl From<(f64, bool)> for Observation {
    fn from((time, is_censored): (f64, bool)) -> Self {
        Self::new(time, is_censored)
    }
}

impl From<(f64, bool, f64)> for Observation {
    fn from((time, is_censored, weight): (f64, bool, f64)) -> Self {
        Self::new(time, is_censored).with_weight(weight)
    }
}

/// Nelson-Aalen cumulative hazard curve.
///
/// The Nelson-Aalen estimator is a non-parametric estimate of the cumulative
/// hazard function from right-censored lifetime data. At every distinct time
/// `t_j` where at least one event occurred, the hazard increases by
/// `d_j / n_j`, where `d_j` is the number of events at exactly `t_j` and `n_j`
/// the number of observations still at risk (duration `>= t_j`).
///
/// # Fields
///
/// The curve stores parallel vectors, one entry per event time:
/// - Time points where events occurred, strictly increasing
/// - Number of subjects at risk at each time point (non-increasing)
/// - Number of events at each time point
/// - Cumulative hazard at each time point (non-decreasing)
///
/// Counts are `f64` because observations may be weighted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NelsonAalenCurve {
    /// Time points where events (non-censored observations) occurred.
    pub times: Vec<f64>,
    /// Weighted number of subjects at risk at each time point.
    pub at_risk: Vec<f64>,
    /// Weighted number of events at each time point.
    pub events: Vec<f64>,
    /// Cumulative hazard at each time point.
    pub cumulative_hazard: Vec<f64>,
}

impl NelsonAalenCurve {
    /// Computes the Nelson-Aalen curve from survival data.
    ///
    /// # Arguments
    ///
    /// * `data` - Observations, or anything convertible into one such as
    ///   `(time, is_censored)` and `(time, is_censored, weight)` tuples
    ///
    /// Tied event times are merged into a single increment. Times where only
    /// censoring happened produce no point. A time whose at-risk weight is
    /// zero is skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sgf_stats::hazard::NelsonAalenCurve;
    /// // Data: (time, is_censored)
    /// let data = vec![(1.0, false), (1.0, false), (2.0, true), (3.0, false)];
    /// let curve = NelsonAalenCurve::from_data(data);
    /// assert_eq!(curve.times, [1.0, 3.0]);
    /// assert_eq!(curve.cumulative_hazard, [0.5, 1.5]);
    /// ```
    #[must_use]
    pub fn from_data<I>(data: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Observation>,
    {
        let mut data = data.into_iter().map(Into::into).collect::<Vec<Observation>>();
        if data.is_empty() {
            return Self::default();
        }

        data.sort_by(|a, b| a.time.total_cmp(&b.time));

        // Walk distinct times from the largest down, so the at-risk weight of
        // each time is everything consumed so far.
        let mut points = vec![];
        let mut at_risk = 0.0;
        let mut end = data.len();
        while end > 0 {
            let current_time = data[end - 1].time;
            let mut start = end;
            while start > 0 && data[start - 1].time.total_cmp(&current_time).is_eq() {
                start -= 1;
            }

            let group = &data[start..end];
            at_risk += group.iter().map(|o| o.weight).sum::<f64>();

            let mut has_event = false;
            let mut event_count = 0.0;
            for obs in group.iter().filter(|o| o.is_event()) {
                has_event = true;
                event_count += obs.weight;
            }

            if has_event && at_risk > 0.0 {
                points.push((current_time, at_risk, event_count));
            }

            end = start;
        }

        let mut curve = Self {
            times: Vec::with_capacity(points.len()),
            at_risk: Vec::with_capacity(points.len()),
            events: Vec::with_capacity(points.len()),
            cumulative_hazard: Vec::with_capacity(points.len()),
        };

        let mut hazard = 0.0;
        for (time, at_risk, events) in points.into_iter().rev() {
            hazard += events / at_risk;
            curve.times.push(time);
            curve.at_risk.push(at_risk);
            curve.events.push(events);
            curve.cumulative_hazard.push(hazard);
        }

        curve
    }

    /// Number of event times on the curve.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the cumulative hazard after the last event time, or `0.0` if
    /// no event was observed.
    #[must_use]
    pub fn final_cumulative_hazard(&self) -> f64 {
        self.cumulative_hazard.last().copied().unwrap_or(0.0)
    }

    /// Returns the cumulative hazard at a specific time.
    ///
    /// The curve is a right-continuous step function: it jumps at each event
    /// time and stays flat in between.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sgf_stats::hazard::NelsonAalenCurve;
    /// let curve = NelsonAalenCurve::from_data([(10.0, false), (20.0, false)]);
    ///
    /// assert_eq!(curve.cumulative_hazard_at(5.0), 0.0);  // Before first event
    /// assert_eq!(curve.cumulative_hazard_at(10.0), 0.5);
    /// assert_eq!(curve.cumulative_hazard_at(15.0), 0.5);
    /// assert_eq!(curve.cumulative_hazard_at(25.0), 1.5);
    /// ```
    #[must_use]
    pub fn cumulative_hazard_at(&self, time: f64) -> f64 {
        let idx = self.times.partition_point(|t| *t <= time);
        if idx == 0 {
            0.0
        } else {
            self.cumulative_hazard[idx - 1]
        }
    }

    /// Returns `(time, cumulative_hazard)` pairs for a post-step plot,
    /// starting from the origin.
    #[must_use]
    pub fn step_points(&self) -> Vec<(f64, f64)> {
        std::iter::once((0.0, 0.0))
            .chain(
                self.times
                    .iter()
                    .copied()
                    .zip(self.cumulative_hazard.iter().copied()),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    /// Rescans the whole sample for every event time.
    fn reference_curve(data: &[Observation]) -> NelsonAalenCurve {
        let mut event_times = data
            .iter()
            .filter(|o| o.is_event())
            .map(|o| o.time)
            .collect::<Vec<_>>();
        event_times.sort_by(f64::total_cmp);
        event_times.dedup();

        let mut curve = NelsonAalenCurve::default();
        let mut hazard = 0.0;
        for t in event_times {
            let at_risk = data
                .iter()
                .filter(|o| o.time >= t)
                .map(|o| o.weight)
                .sum::<f64>();
            let events = data
                .iter()
                .filter(|o| o.time == t && o.is_event())
                .map(|o| o.weight)
                .sum::<f64>();
            if at_risk > 0.0 {
                hazard += events / at_risk;
                curve.times.push(t);
                curve.at_risk.push(at_risk);
                curve.events.push(events);
                curve.cumulative_hazard.push(hazard);
            }
        }
        curve
    }

    #[test]
    fn test_worked_example() {
        let durations = [1.0, 1.0, 2.0, 3.0];
        let events = [true, true, false, true];
        let curve = NelsonAalenCurve::from_data(
            durations
                .iter()
                .zip(events)
                .map(|(&d, e)| (d, !e)),
        );

        assert_eq!(curve.times, [1.0, 3.0]);
        assert_eq!(curve.at_risk, [4.0, 1.0]);
        assert_eq!(curve.events, [2.0, 1.0]);
        assert_eq!(curve.cumulative_hazard, [0.5, 1.5]);
    }

    #[test]
    fn test_empty_data() {
        let curve = NelsonAalenCurve::from_data(Vec::<Observation>::new());
        assert!(curve.is_empty());
        assert_eq!(curve.final_cumulative_hazard(), 0.0);
        assert_eq!(curve.step_points(), [(0.0, 0.0)]);
    }

    #[test]
    fn test_all_censored() {
        let curve = NelsonAalenCurve::from_data([(1.0, true), (2.0, true), (2.0, true)]);
        assert!(curve.times.is_empty());
        assert!(curve.cumulative_hazard.is_empty());
    }

    #[test]
    fn test_single_event() {
        let curve = NelsonAalenCurve::from_data([(5.0, false)]);
        assert_eq!(curve.times, [5.0]);
        assert_eq!(curve.at_risk, [1.0]);
        assert_eq!(curve.cumulative_hazard, [1.0]);
    }

    #[test]
    fn test_censoring_after_last_event_keeps_subjects_at_risk() {
        let curve = NelsonAalenCurve::from_data([(1.0, false), (4.0, true), (4.0, true)]);
        assert_eq!(curve.times, [1.0]);
        assert_eq!(curve.at_risk, [3.0]);
        assert_relative_eq!(curve.final_cumulative_hazard(), 1.0 / 3.0);
    }

    #[test]
    fn test_tied_event_and_censoring() {
        // Censored at the same instant still counts as at risk
        let curve = NelsonAalenCurve::from_data([(2.0, false), (2.0, true), (3.0, false)]);
        assert_eq!(curve.times, [2.0, 3.0]);
        assert_eq!(curve.at_risk, [3.0, 1.0]);
        assert_eq!(curve.events, [1.0, 1.0]);
        assert_relative_eq!(curve.cumulative_hazard[1], 1.0 / 3.0 + 1.0);
    }

    #[test]
    fn test_weighted_observations() {
        let curve =
            NelsonAalenCurve::from_data([(1.0, false, 2.0), (2.0, true, 1.0), (3.0, false, 1.0)]);
        assert_eq!(curve.at_risk, [4.0, 1.0]);
        assert_eq!(curve.events, [2.0, 1.0]);
        assert_eq!(curve.cumulative_hazard, [0.5, 1.5]);
    }

    #[test]
    fn test_zero_at_risk_is_skipped() {
        let curve = NelsonAalenCurve::from_data([(1.0, false, 0.0), (2.0, false, 1.0)]);
        assert_eq!(curve.times, [2.0]);
        assert_eq!(curve.cumulative_hazard, [1.0]);
    }

    #[test]
    fn test_cumulative_hazard_at() {
        let curve =
            NelsonAalenCurve::from_data([(1.0, false), (1.0, false), (2.0, true), (3.0, false)]);
        assert_eq!(curve.cumulative_hazard_at(0.5), 0.0);
        assert_eq!(curve.cumulative_hazard_at(1.0), 0.5);
        assert_eq!(curve.cumulative_hazard_at(2.9), 0.5);
        assert_eq!(curve.cumulative_hazard_at(3.0), 1.5);
        assert_eq!(curve.cumulative_hazard_at(100.0), 1.5);
        assert_eq!(curve.step_points(), [(0.0, 0.0), (1.0, 0.5), (3.0, 1.5)]);
    }

    #[test]
    fn test_matches_rescan_and_invariants_on_random_samples() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let n = rng.random_range(0..60);
            let data = (0..n)
                .map(|_| {
                    let time = f64::from(rng.random_range(0_u32..15));
                    let is_censored = rng.random_bool(0.3);
                    Observation::new(time, is_censored)
                })
                .collect::<Vec<_>>();

            let curve = NelsonAalenCurve::from_data(data.clone());
            assert_eq!(curve, reference_curve(&data));

            assert!(curve.times.windows(2).all(|w| w[0] < w[1]));
            assert!(curve.at_risk.windows(2).all(|w| w[0] >= w[1]));
            assert!(curve.cumulative_hazard.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
