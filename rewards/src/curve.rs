//! Reward curves.

use covenant_store::CurveKind;
use covenant_types::StateError;

/// Maps the rshares a piece of content earned to its claim on a fund.
pub trait RewardCurve {
    fn evaluate(&self, rshares: u128, content_constant: u128) -> Result<u128, StateError>;
}

impl RewardCurve for CurveKind {
    fn evaluate(&self, rshares: u128, content_constant: u128) -> Result<u128, StateError> {
        let s = content_constant;
        match self {
            CurveKind::Linear => Ok(rshares),
            CurveKind::Quadratic => {
                let shifted = rshares.checked_add(s).ok_or(StateError::Overflow)?;
                square(shifted)?
                    .checked_sub(square(s)?)
                    .ok_or(StateError::Overflow)
            }
            CurveKind::ConvergentLinear => {
                let shifted = rshares.checked_add(s).ok_or(StateError::Overflow)?;
                let numerator = square(shifted)?
                    .checked_sub(square(s)?)
                    .ok_or(StateError::Overflow)?;
                let denominator = s
                    .checked_mul(4)
                    .and_then(|v| v.checked_add(rshares))
                    .ok_or(StateError::Overflow)?;
                if denominator == 0 {
                    return Ok(0);
                }
                Ok(numerator / denominator)
            }
            CurveKind::SquareRoot => Ok(isqrt(rshares)),
        }
    }
}

fn square(v: u128) -> Result<u128, StateError> {
    v.checked_mul(v).ok_or(StateError::Overflow)
}

/// Floor of the square root.
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Newton's method from an over-estimate converges downward.
    let mut x = 1u128 << ((128 - n.leading_zeros()).div_ceil(2));
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}
