// Synthetic sample generation (bounded random walk)
use super::telemetry::{Sample, Timestamp};
use chrono::TimeDelta;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const BASE_DEPTH: f64 = 50.0;
pub const BASE_TEMPERATURE: f64 = 12.0;
pub const SEED_DEPTH_JITTER: f64 = 10.0;
pub const SEED_TEMPERATURE_JITTER: f64 = 2.0;
pub const DEPTH_STEP: f64 = 0.5;
pub const TEMPERATURE_STEP: f64 = 0.1;

/// Source of synthetic telemetry.
pub trait SampleGenerator: Send {
    /// Advance `previous` to a new sample stamped `now`.
    fn next(&mut self, previous: &Sample, now: Timestamp) -> Sample;

    /// Produce up to `count` samples spaced `interval` apart, oldest first,
    /// the newest stamped `ending_at`. Samples whose timestamp falls outside
    /// the representable range are left out.
    fn seed(&mut self, count: usize, interval: TimeDelta, ending_at: Timestamp) -> Vec<Sample>;
}

/// Random walk around the base depth/temperature.
///
/// Live samples drift from their predecessor by at most `DEPTH_STEP` and
/// `TEMPERATURE_STEP`. Seed samples are drawn independently around the base
/// values so the window does not drift before ticking starts.
#[derive(Debug, Clone)]
pub struct RandomWalkGenerator<R = StdRng> {
    rng: R,
}

impl RandomWalkGenerator<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomWalkGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn jitter(&mut self, bound: f64) -> f64 {
        self.rng.gen_range(-bound..=bound)
    }
}

impl<R: Rng + Send> SampleGenerator for RandomWalkGenerator<R> {
    fn next(&mut self, previous: &Sample, now: Timestamp) -> Sample {
        Sample::new(
            now,
            previous.depth + self.jitter(DEPTH_STEP),
            previous.temperature + self.jitter(TEMPERATURE_STEP),
        )
    }

    fn seed(&mut self, count: usize, interval: TimeDelta, ending_at: Timestamp) -> Vec<Sample> {
        (0..count)
            .filter_map(|i| seed_timestamp(ending_at, interval, count - 1 - i))
            .map(|timestamp| {
                Sample::new(
                    timestamp,
                    BASE_DEPTH + self.jitter(SEED_DEPTH_JITTER),
                    BASE_TEMPERATURE + self.jitter(SEED_TEMPERATURE_JITTER),
                )
            })
            .collect()
    }
}

/// `ending_at - interval * steps_back`, or `None` on overflow.
pub fn seed_timestamp(ending_at: Timestamp, interval: TimeDelta, steps_back: usize) -> Option<Timestamp> {
    let steps_back = i32::try_from(steps_back).ok()?;
    let offset = interval.checked_mul(steps_back)?;
    ending_at.checked_sub_signed(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn start() -> Timestamp {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_next_drift_is_bounded() {
        let mut generator = RandomWalkGenerator::from_seed(7);
        let mut previous = Sample::new(start(), BASE_DEPTH, BASE_TEMPERATURE);

        for i in 1..=1000 {
            let now = start() + TimeDelta::seconds(i * 5);
            let next = generator.next(&previous, now);

            assert!((next.depth - previous.depth).abs() <= DEPTH_STEP + 1e-9);
            assert!((next.temperature - previous.temperature).abs() <= TEMPERATURE_STEP + 1e-9);
            assert_eq!(next.timestamp, now);
            previous = next;
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomWalkGenerator::from_seed(42);
        let mut b = RandomWalkGenerator::from_seed(42);

        let seeds_a = a.seed(10, TimeDelta::seconds(5), start());
        let seeds_b = b.seed(10, TimeDelta::seconds(5), start());
        assert_eq!(seeds_a, seeds_b);
    }

    #[test]
    fn test_seed_spacing_ends_at_now() {
        let mut generator = RandomWalkGenerator::from_seed(1);
        let seeds = generator.seed(60, TimeDelta::seconds(5), start());

        assert_eq!(seeds.len(), 60);
        assert_eq!(seeds[59].timestamp, start());
        assert_eq!(seeds[0].timestamp, start() - TimeDelta::seconds(5 * 59));
        assert!(seeds
            .windows(2)
            .all(|w| w[1].timestamp - w[0].timestamp == TimeDelta::seconds(5)));
    }

    #[test]
    fn test_seed_values_stay_near_base() {
        let mut generator = RandomWalkGenerator::from_seed(99);
        let seeds = generator.seed(500, TimeDelta::seconds(1), start());

        for sample in &seeds {
            assert!((sample.depth - BASE_DEPTH).abs() <= SEED_DEPTH_JITTER);
            assert!((sample.temperature - BASE_TEMPERATURE).abs() <= SEED_TEMPERATURE_JITTER);
        }
    }

    #[test]
    fn test_seed_zero_count() {
        let mut generator = RandomWalkGenerator::from_seed(3);
        assert!(generator.seed(0, TimeDelta::seconds(5), start()).is_empty());
    }

    #[test]
    fn test_seed_skips_unrepresentable_timestamps() {
        let mut generator = RandomWalkGenerator::from_seed(3);
        let huge = TimeDelta::seconds(i64::MAX / 1000);

        let seeds = generator.seed(3, huge, start());
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].timestamp, start());
    }

    #[test]
    fn test_seed_timestamp_overflow() {
        let interval = TimeDelta::seconds(5);
        assert_eq!(
            seed_timestamp(start(), interval, 2),
            Some(start() - TimeDelta::seconds(10))
        );
        assert_eq!(seed_timestamp(start(), interval, usize::MAX), None);
        assert_eq!(seed_timestamp(start(), TimeDelta::seconds(i64::MAX / 1000), 2), None);
    }
}
