//! Spin animation and winner resolution for the roulette wheel.

mod engine;
mod resolver;

pub use engine::{SpinEngine, SpinFrames, SpinState, SpinTick, ease_out_cubic};
pub use resolver::{POINTER_ANGLE, resolve};
