//! Time of day and weather driver.

use eco_core::{ClockConfig, Weather};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const HOURS_PER_DAY: u32 = 24;

/// What changed during one clock advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockTick {
    pub hour_advanced: bool,
    pub weather_rolled: bool,
}

/// Simulated hour and weather, advanced once per simulation step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    config: ClockConfig,
    step: u64,
    hour: u32,
    weather: Weather,
}

impl Clock {
    pub fn new(config: ClockConfig) -> Self {
        let hour = config.start_hour % HOURS_PER_DAY;
        Self {
            config,
            step: 0,
            hour,
            weather: Weather::default(),
        }
    }

    /// Back to step zero, the start hour and clear skies.
    pub fn reset(&mut self) {
        self.step = 0;
        self.hour = self.config.start_hour % HOURS_PER_DAY;
        self.weather = Weather::default();
    }

    /// Count one step; every `steps_per_hour` steps the hour moves on and, on
    /// hours that are a multiple of the change interval, the weather is rerolled.
    pub fn advance(&mut self, rng: &mut ChaCha8Rng) -> ClockTick {
        let mut tick = ClockTick::default();
        self.step += 1;

        if self.step % self.config.steps_per_hour.max(1) == 0 {
            self.hour = (self.hour + 1) % HOURS_PER_DAY;
            tick.hour_advanced = true;

            if self.hour % self.config.weather_change_interval.max(1) == 0 {
                self.weather = Weather::ALL[rng.gen_range(0..Weather::ALL.len())];
                tick.weather_rolled = true;
            }
        }

        tick
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn is_raining(&self) -> bool {
        self.weather == Weather::Rain
    }

    /// Daylight: [8, 20)
    pub fn is_day(&self) -> bool {
        (8..20).contains(&self.hour)
    }

    /// [6, 8)
    pub fn is_morning(&self) -> bool {
        (6..8).contains(&self.hour)
    }

    /// (18, 20]
    pub fn is_evening(&self) -> bool {
        self.hour > 18 && self.hour <= 20
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn clock() -> Clock {
        Clock::new(ClockConfig::default())
    }

    #[test]
    fn test_hour_advances_every_25_steps() {
        let mut clock = clock();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for _ in 0..24 {
            assert!(!clock.advance(&mut rng).hour_advanced);
        }
        assert_eq!(clock.hour(), 0);

        assert!(clock.advance(&mut rng).hour_advanced);
        assert_eq!(clock.hour(), 1);
        assert_eq!(clock.step(), 25);
    }

    #[test]
    fn test_hour_wraps_after_a_day() {
        let mut clock = clock();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for _ in 0..(25 * 24) {
            clock.advance(&mut rng);
        }
        assert_eq!(clock.hour(), 0);
    }

    #[test]
    fn test_day_predicates() {
        let mut clock = Clock::new(ClockConfig {
            start_hour: 7,
            ..Default::default()
        });
        assert!(clock.is_morning());
        assert!(!clock.is_day());

        clock.hour = 8;
        assert!(clock.is_day());
        assert!(!clock.is_morning());

        clock.hour = 19;
        assert!(clock.is_day());
        assert!(clock.is_evening());

        clock.hour = 20;
        assert!(!clock.is_day());
        assert!(clock.is_evening());

        clock.hour = 18;
        assert!(!clock.is_evening());
    }

    #[test]
    fn test_reset() {
        let mut clock = Clock::new(ClockConfig {
            start_hour: 10,
            ..Default::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..1000 {
            clock.advance(&mut rng);
        }

        clock.reset();
        assert_eq!(clock.step(), 0);
        assert_eq!(clock.hour(), 10);
        assert_eq!(clock.weather(), Weather::Clear);
    }

    #[test]
    fn test_weather_eventually_rains() {
        let mut clock = clock();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen_rain = false;
        for _ in 0..(25 * 24 * 10) {
            clock.advance(&mut rng);
            seen_rain |= clock.is_raining();
        }
        assert!(seen_rain);
    }

    proptest! {
        #[test]
        fn prop_hour_tracks_step_count(steps in 0u64..20_000, seed in any::<u64>()) {
            let mut clock = clock();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..steps {
                clock.advance(&mut rng);
            }
            prop_assert_eq!(clock.step(), steps);
            prop_assert_eq!(clock.hour() as u64, (steps / 25) % 24);
        }

        #[test]
        fn prop_weather_changes_only_on_six_hour_marks(steps in 0u64..5_000, seed in any::<u64>()) {
            let mut clock = clock();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..steps {
                let before = clock.weather();
                let tick = clock.advance(&mut rng);
                if clock.weather() != before {
                    prop_assert!(tick.hour_advanced);
                    prop_assert!(tick.weather_rolled);
                    prop_assert_eq!(clock.hour() % 6, 0);
                    prop_assert_eq!(clock.step() % 25, 0);
                }
                if tick.weather_rolled {
                    prop_assert_eq!(clock.hour() % 6, 0);
                }
            }
        }
    }
}
