//! Simulated clock
//!
//! The clock only moves forward, and only when the stepper advances it.
//! Time is a whole number of base increments: N ticks at speed 1 and one
//! tick at speed N reach the same instant.

use super::error::CommandError;

/// Simulated time in seconds plus the speed multiplier that scales ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    /// Base increments elapsed since reset
    steps: u64,
    speed: u32,
    tick_increment_s: f64,
}

impl Clock {
    pub fn new(tick_increment_s: f64) -> Self {
        Self {
            steps: 0,
            speed: 1,
            tick_increment_s,
        }
    }

    pub fn now(&self) -> f64 {
        self.time_at(self.steps)
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Time the next tick advances to
    pub fn next_time(&self) -> f64 {
        self.time_at(self.next_steps())
    }

    /// Moves the clock forward by one tick at the current speed
    pub fn advance(&mut self) {
        self.steps = self.next_steps();
    }

    fn next_steps(&self) -> u64 {
        self.steps.saturating_add(u64::from(self.speed))
    }

    fn time_at(&self, steps: u64) -> f64 {
        steps as f64 * self.tick_increment_s
    }

    pub fn set_speed(&mut self, speed: u32, min: u32, max: u32) -> Result<(), CommandError> {
        if !(min..=max).contains(&speed) {
            return Err(CommandError::InvalidSpeed {
                requested: speed,
                min,
                max,
            });
        }
        self.speed = speed;
        Ok(())
    }
}
