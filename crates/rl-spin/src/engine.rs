//! Spin state machine.
//!
//! States: `Idle` → `Spinning` → `Idle`.
//! The engine does not own a timer. Whoever schedules frames calls
//! [`SpinEngine::tick`] with the frame timestamp until a tick comes back with
//! `finished` set; the first tick of a spin defines its start time.

use rand::Rng;
use rl_types::WheelConfig;
use std::f64::consts::TAU;
use tracing::{debug, warn};

/// Cubic ease-out: fast start, smooth stop.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinState {
    Idle,
    Spinning {
        start_rotation: f64,
        target_rotation: f64,
        duration_ms: f64,
        start_time: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTick {
    pub rotation: f64,
    pub progress: f64,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct SpinEngine {
    state: SpinState,
    min_extra_spins: f64,
    max_extra_spins: f64,
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::from_config(&WheelConfig::default())
    }
}

impl SpinEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &WheelConfig) -> Self {
        Self {
            state: SpinState::Idle,
            min_extra_spins: config.min_extra_spins,
            max_extra_spins: config.max_extra_spins,
        }
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, SpinState::Spinning { .. })
    }

    /// Starts a spin from `current_rotation` and returns the target rotation.
    ///
    /// Returns `None` without touching the running spin if one is already in
    /// progress.
    pub fn spin<R>(&mut self, current_rotation: f64, duration_ms: f64, rng: &mut R) -> Option<f64>
    where
        R: Rng + ?Sized,
    {
        if self.is_spinning() {
            debug!("spin ignored, wheel already spinning");
            return None;
        }

        let extra_spins = if self.max_extra_spins > self.min_extra_spins {
            rng.gen_range(self.min_extra_spins..self.max_extra_spins)
        } else {
            self.min_extra_spins
        };
        let random_angle = rng.gen_range(0.0..TAU);
        let target_rotation = current_rotation + extra_spins * TAU + random_angle;

        debug!(
            "spin started: {:.3} -> {:.3} over {}ms ({:.2} turns)",
            current_rotation,
            target_rotation,
            duration_ms,
            extra_spins + random_angle / TAU
        );

        self.state = SpinState::Spinning {
            start_rotation: current_rotation,
            target_rotation,
            duration_ms,
            start_time: None,
        };
        Some(target_rotation)
    }

    /// Advances the animation to `timestamp_ms`. `None` while idle, and for
    /// non-finite timestamps, which leave the spin untouched.
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<SpinTick> {
        let SpinState::Spinning {
            start_rotation,
            target_rotation,
            duration_ms,
            start_time,
        } = &mut self.state
        else {
            return None;
        };
        if !timestamp_ms.is_finite() {
            warn!("ignoring non-finite frame timestamp {}", timestamp_ms);
            return None;
        }

        let started = *start_time.get_or_insert(timestamp_ms);
        let elapsed = (timestamp_ms - started).max(0.0);
        let progress = if *duration_ms > 0.0 {
            (elapsed / *duration_ms).min(1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            let rotation = *target_rotation;
            self.state = SpinState::Idle;
            debug!("spin finished at {:.3}", rotation);
            return Some(SpinTick {
                rotation,
                progress: 1.0,
                finished: true,
            });
        }

        let rotation = *start_rotation + (*target_rotation - *start_rotation) * ease_out_cubic(progress);
        Some(SpinTick {
            rotation,
            progress,
            finished: false,
        })
    }

    /// Drives the running spin over a sequence of frame timestamps.
    pub fn frames<I>(&mut self, timestamps: I) -> SpinFrames<'_, I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        SpinFrames {
            engine: self,
            timestamps: timestamps.into_iter(),
            done: false,
        }
    }
}

/// Lazy rotation sequence for one spin, ending with the exact target.
///
/// Stops early if the timestamps run out; the engine then keeps spinning and
/// can be driven further with [`SpinEngine::tick`].
pub struct SpinFrames<'a, I> {
    engine: &'a mut SpinEngine,
    timestamps: I,
    done: bool,
}

impl<I> Iterator for SpinFrames<'_, I>
where
    I: Iterator<Item = f64>,
{
    type Item = SpinTick;

    fn next(&mut self) -> Option<SpinTick> {
        if self.done {
            return None;
        }
        let timestamp = self.timestamps.find(|t| t.is_finite())?;
        let tick = self.engine.tick(timestamp);
        match tick {
            Some(t) if !t.finished => Some(t),
            other => {
                self.done = true;
                other
            }
        }
    }
}
