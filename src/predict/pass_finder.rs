use chrono::{DateTime, Duration, Utc};

use crate::frames::LookAngles;
use crate::predict::error::PredictError;
use crate::predict::trajectory::{look, SampleOptions};
use crate::predict::types::{Pass, PassEvent};
use crate::predict::GroundStation;
use crate::propagation::{OrbitState, PropagationError};

/// Bisection and golden-section refinement stop at this resolution.
const FINE_STEP_MS: i64 = 1000;
const INV_GOLDEN: f64 = 0.618_033_988_749_894_9;

#[derive(Debug, Clone, Copy)]
pub struct PassOptions<'a> {
    /// Bisect AOS/LOS and search TCA to one second. Without it all three are
    /// resolved to one scan step.
    pub refine: bool,
    pub sampling: SampleOptions<'a>,
}

impl Default for PassOptions<'_> {
    fn default() -> Self {
        Self {
            refine: true,
            sampling: SampleOptions::default(),
        }
    }
}

/// Find passes above `min_elevation` (rad) in `[start, end]`, scanning every
/// `step_seconds`.
///
/// A pass already in progress at `start` gets `aos = start`; one still in
/// progress at `end` gets `los = end`. If the orbit decays during the scan
/// the passes found so far are returned.
pub fn predict_passes(
    state: &OrbitState,
    station: &GroundStation,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_seconds: f64,
    min_elevation: f64,
    options: &PassOptions,
) -> Result<Vec<Pass>, PredictError> {
    let scanner = Scanner {
        catalog_number: state.catalog_number(),
        min_elevation,
        refine: options.refine,
        look: |t: DateTime<Utc>| look(state, station, t, &options.sampling),
    };
    scanner.scan(start, end, step_seconds)
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    time: DateTime<Utc>,
    angles: LookAngles,
}

/// Pass under construction.
#[derive(Debug, Clone, Copy)]
struct OpenPass {
    aos: Sample,
    peak: Sample,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    BelowHorizon,
    InPass(OpenPass),
}

struct Scanner<F> {
    catalog_number: u32,
    min_elevation: f64,
    refine: bool,
    look: F,
}

impl<F> Scanner<F>
where
    F: FnMut(DateTime<Utc>) -> Result<LookAngles, PropagationError>,
{
    fn scan(
        mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step_seconds: f64,
    ) -> Result<Vec<Pass>, PredictError> {
        if end < start {
            return Err(PredictError::InvalidWindow { start, end });
        }
        let step_ms = (step_seconds * 1000.0).round();
        if !step_seconds.is_finite() || step_ms < 1.0 {
            return Err(PredictError::InvalidStep(step_seconds));
        }
        let step = Duration::try_milliseconds(step_ms as i64)
            .ok_or(PredictError::InvalidStep(step_seconds))?;

        let mut passes = Vec::new();
        let mut state = ScanState::BelowHorizon;
        let mut previous: Option<Sample> = None;
        let mut cursor = start;

        loop {
            match self.advance(state, previous, cursor, step, &mut passes) {
                Ok((next, current)) => {
                    state = next;
                    previous = Some(current);
                }
                Err(e) => return self.stop(e, cursor, passes),
            }
            if cursor >= end {
                break;
            }
            cursor = cursor.checked_add_signed(step).map_or(end, |c| c.min(end));
        }

        if let (ScanState::InPass(open), Some(last)) = (state, previous) {
            match self.close(open, last, step) {
                Ok(pass) => passes.push(pass),
                Err(e) => return self.stop(e, end, passes),
            }
        }
        Ok(passes)
    }

    /// Sample `cursor` and apply the state transition it implies.
    fn advance(
        &mut self,
        state: ScanState,
        previous: Option<Sample>,
        cursor: DateTime<Utc>,
        step: Duration,
        passes: &mut Vec<Pass>,
    ) -> Result<(ScanState, Sample), PropagationError> {
        let current = self.sample(cursor)?;
        let visible = current.angles.elevation >= self.min_elevation;

        let next = match (state, visible) {
            (ScanState::BelowHorizon, true) => {
                let aos = match previous {
                    Some(before) if self.refine => self.bisect(before, current, true)?,
                    _ => current,
                };
                ScanState::InPass(OpenPass { aos, peak: current })
            }
            (ScanState::InPass(mut open), true) => {
                if current.angles.elevation > open.peak.angles.elevation {
                    open.peak = current;
                }
                ScanState::InPass(open)
            }
            (ScanState::InPass(open), false) => {
                let los = match previous {
                    Some(before) if self.refine => self.bisect(before, current, false)?,
                    _ => current,
                };
                passes.push(self.close(open, los, step)?);
                ScanState::BelowHorizon
            }
            (ScanState::BelowHorizon, false) => ScanState::BelowHorizon,
        };
        Ok((next, current))
    }

    /// A decayed orbit ends the scan with what was found; anything else fails it.
    fn stop(
        &self,
        error: PropagationError,
        at: DateTime<Utc>,
        passes: Vec<Pass>,
    ) -> Result<Vec<Pass>, PredictError> {
        match error {
            PropagationError::Decayed { radius_er } => {
                log::warn!(
                    "{} decayed (radius {:.4} ER) near {}, stopping pass scan with {} passes",
                    self.catalog_number,
                    radius_er,
                    at,
                    passes.len()
                );
                Ok(passes)
            }
            e => Err(e.into()),
        }
    }

    fn sample(&mut self, time: DateTime<Utc>) -> Result<Sample, PropagationError> {
        Ok(Sample {
            time,
            angles: (self.look)(time)?,
        })
    }

    /// Narrow a mask crossing between `before` and `after` to one second.
    /// Returns the first sample on the far side of the crossing.
    fn bisect(
        &mut self,
        before: Sample,
        after: Sample,
        rising: bool,
    ) -> Result<Sample, PropagationError> {
        let mut low = before;
        let mut high = after;
        while (high.time - low.time).num_milliseconds() > FINE_STEP_MS {
            let mid = self.sample(low.time + (high.time - low.time) / 2)?;
            let above = mid.angles.elevation >= self.min_elevation;
            if above == rising {
                high = mid;
            } else {
                low = mid;
            }
        }
        log::debug!(
            "{} crossing refined to [{}, {}]",
            if rising { "AOS" } else { "LOS" },
            low.time,
            high.time
        );
        Ok(high)
    }

    /// Golden-section search for the elevation peak in `[low, high]`.
    fn culminate(
        &mut self,
        low: DateTime<Utc>,
        high: DateTime<Utc>,
        coarse: Sample,
    ) -> Result<Sample, PropagationError> {
        let span = (high - low).num_milliseconds() as f64;
        let at = |offset: f64| low + Duration::milliseconds(offset.round() as i64);

        let (mut a, mut b) = (0.0, span);
        let mut c = b - INV_GOLDEN * (b - a);
        let mut d = a + INV_GOLDEN * (b - a);
        let mut fc = self.sample(at(c))?;
        let mut fd = self.sample(at(d))?;
        while b - a > FINE_STEP_MS as f64 {
            if fc.angles.elevation > fd.angles.elevation {
                b = d;
                d = c;
                fd = fc;
                c = b - INV_GOLDEN * (b - a);
                fc = self.sample(at(c))?;
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + INV_GOLDEN * (b - a);
                fd = self.sample(at(d))?;
            }
        }

        let best = if fc.angles.elevation > fd.angles.elevation {
            fc
        } else {
            fd
        };
        Ok(if best.angles.elevation > coarse.angles.elevation {
            best
        } else {
            coarse
        })
    }

    fn close(
        &mut self,
        open: OpenPass,
        los: Sample,
        step: Duration,
    ) -> Result<Pass, PropagationError> {
        let peak = if self.refine {
            let low = open
                .peak
                .time
                .checked_sub_signed(step)
                .map_or(open.aos.time, |t| t.max(open.aos.time));
            let high = open
                .peak
                .time
                .checked_add_signed(step)
                .map_or(los.time, |t| t.min(los.time));
            self.culminate(low, high, open.peak)?
        } else {
            open.peak
        };

        let event = PassEvent {
            aos: open.aos.time,
            tca: peak.time,
            los: los.time,
            max_elevation: peak.angles.elevation,
        };
        Ok(Pass {
            catalog_number: self.catalog_number,
            event,
            max_elevation_deg: peak.angles.elevation.to_degrees(),
            aos_azimuth_deg: open.aos.angles.azimuth.to_degrees(),
            los_azimuth_deg: los.angles.azimuth.to_degrees(),
            duration_seconds: (los.time - open.aos.time).num_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn seconds(t: DateTime<Utc>) -> f64 {
        (t - t0()).num_milliseconds() as f64 / 1000.0
    }

    /// Elevation profile with single peaks of `height` rad at each centre,
    /// each 800 s wide at the horizon.
    fn profile(
        centres: &'static [f64],
        height: f64,
    ) -> impl FnMut(DateTime<Utc>) -> Result<LookAngles, PropagationError> {
        move |t| {
            let s = seconds(t);
            let elevation = centres
                .iter()
                .map(|c| height * (1.0 - ((s - c) / 400.0).powi(2)))
                .fold(-1.0, f64::max);
            Ok(LookAngles {
                azimuth: (s / 3600.0).rem_euclid(1.0) * std::f64::consts::TAU,
                elevation,
                range_km: 1000.0,
                range_rate_km_s: 0.0,
            })
        }
    }

    fn scanner<F>(look: F, refine: bool) -> Scanner<F> {
        Scanner {
            catalog_number: 1,
            min_elevation: 0.0,
            refine,
            look,
        }
    }

    #[test]
    fn single_peak_gives_one_pass() {
        let passes = scanner(profile(&[1800.0], 1.0), true)
            .scan(t0(), t0() + Duration::hours(1), 30.0)
            .unwrap();
        assert_eq!(passes.len(), 1);
        let ev = passes[0].event;
        assert!(ev.aos < ev.tca && ev.tca < ev.los);
        assert!((seconds(ev.aos) - 1400.0).abs() <= 1.0);
        assert!((seconds(ev.los) - 2200.0).abs() <= 1.0);
        assert!((seconds(ev.tca) - 1800.0).abs() <= 1.0);
        assert!(ev.max_elevation >= 0.0);
        assert!((ev.max_elevation - 1.0).abs() < 1e-5);
        assert!((passes[0].duration_seconds - 800).abs() <= 2);
    }

    #[test]
    fn unrefined_resolves_to_step() {
        let passes = scanner(profile(&[1800.0], 1.0), false)
            .scan(t0(), t0() + Duration::hours(1), 30.0)
            .unwrap();
        assert_eq!(passes.len(), 1);
        let ev = passes[0].event;
        assert_eq!(seconds(ev.aos), 1410.0);
        assert_eq!(seconds(ev.tca), 1800.0);
        assert_eq!(seconds(ev.los), 2220.0);
    }

    #[test]
    fn two_peaks_two_passes() {
        let passes = scanner(profile(&[1000.0, 5000.0], 0.6), true)
            .scan(t0(), t0() + Duration::hours(2), 20.0)
            .unwrap();
        assert_eq!(passes.len(), 2);
        assert!(passes[0].event.los < passes[1].event.aos);
    }

    #[test]
    fn open_passes_are_clipped_to_window() {
        let passes = scanner(profile(&[100.0, 3500.0], 1.0), true)
            .scan(t0(), t0() + Duration::seconds(3600), 30.0)
            .unwrap();
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].event.aos, t0());
        assert_eq!(passes[1].event.los, t0() + Duration::seconds(3600));
    }

    #[test]
    fn mask_filters_low_peaks() {
        let mut s = scanner(profile(&[1000.0], 0.1), true);
        s.min_elevation = 0.2;
        let passes = s.scan(t0(), t0() + Duration::hours(1), 30.0).unwrap();
        assert!(passes.is_empty());
    }

    #[test]
    fn decay_stops_scan() {
        let mut inner = profile(&[1000.0, 5000.0], 1.0);
        let look = move |t: DateTime<Utc>| {
            if seconds(t) > 3000.0 {
                Err(PropagationError::Decayed { radius_er: 0.99 })
            } else {
                inner(t)
            }
        };
        let passes = scanner(look, true)
            .scan(t0(), t0() + Duration::hours(2), 30.0)
            .unwrap();
        assert_eq!(passes.len(), 1);
    }

    #[test]
    fn other_errors_propagate() {
        let look = |_t: DateTime<Utc>| -> Result<LookAngles, PropagationError> {
            Err(PropagationError::IntegrationDivergence { steps: 10_000 })
        };
        let result = scanner(look, true).scan(t0(), t0() + Duration::hours(1), 30.0);
        assert!(matches!(result, Err(PredictError::Propagation(_))));
    }

    #[test]
    fn step_wider_than_window() {
        let passes = scanner(profile(&[100.0], 1.0), true)
            .scan(t0(), t0() + Duration::hours(1), 1.0e13)
            .unwrap();
        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].event.aos, t0());
        assert!((seconds(passes[0].event.los) - 500.0).abs() <= 1.0);
        assert!((seconds(passes[0].event.tca) - 100.0).abs() <= 1.0);

        let passes = scanner(profile(&[100.0], 1.0), false)
            .scan(t0(), t0() + Duration::hours(1), 1.0e13)
            .unwrap();
        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].event.los, t0() + Duration::hours(1));
    }

    #[test]
    fn rejects_bad_inputs() {
        let result = scanner(profile(&[0.0], 1.0), true)
            .scan(t0(), t0() - Duration::seconds(1), 30.0);
        assert!(matches!(result, Err(PredictError::InvalidWindow { .. })));
        for step in [0.0, -5.0, f64::NAN] {
            let result = scanner(profile(&[0.0], 1.0), true)
                .scan(t0(), t0() + Duration::hours(1), step);
            assert!(matches!(result, Err(PredictError::InvalidStep(_))));
        }
    }
}
