use rl_types::{WheelError, WheelResult};
use std::f64::consts::{FRAC_PI_2, TAU};

/// The pointer sits at the top of the wheel in screen space.
pub const POINTER_ANGLE: f64 = -FRAC_PI_2;

/// Index of the slice under the pointer after the wheel has turned by
/// `final_rotation` radians.
///
/// Slices are laid out in option order starting at angle 0 and running
/// clockwise, each `2π / option_count` wide.
pub fn resolve(final_rotation: f64, option_count: usize) -> WheelResult<usize> {
    if option_count == 0 {
        return Err(WheelError::NoOptions);
    }
    let arc_size = TAU / option_count as f64;

    let normalized = final_rotation.rem_euclid(TAU);

    let mut relative = POINTER_ANGLE - normalized;
    while relative < 0.0 {
        relative += TAU;
    }
    while relative >= TAU {
        relative -= TAU;
    }

    // floor() can land on option_count when relative sits a hair under 2π.
    let index = (relative / arc_size).floor() as usize;
    Ok(index.min(option_count - 1))
}
