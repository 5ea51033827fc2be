//! Bounded random numbers for games.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::AppError;

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Inclusive range; `0 <= min <= max <= i32::MAX`.
    fn generate(&mut self, min: i64, max: i64) -> Result<i32, AppError>;
}

/// Check bounds shared by every [`RandomSource`].
pub fn check_bounds(min: i64, max: i64) -> Result<(i32, i32), AppError> {
    if min > max || min < 0 || max > i64::from(i32::MAX) {
        return Err(AppError::InvalidRange { min, max });
    }
    // Both bounds are within 0..=i32::MAX here.
    Ok((min as i32, max as i32))
}

/// `rand`-backed source.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn generate(&mut self, min: i64, max: i64) -> Result<i32, AppError> {
        let (min, max) = check_bounds(min, max)?;
        Ok(self.rng.gen_range(min..=max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_invalid_ranges() {
        let mut random = StdRandom::seeded(1);
        assert_eq!(
            random.generate(5, 4),
            Err(AppError::InvalidRange { min: 5, max: 4 })
        );
        assert!(random.generate(-1, 4).is_err());
        assert!(random.generate(0, i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn test_single_value_range() {
        let mut random = StdRandom::seeded(1);
        assert_eq!(random.generate(7, 7), Ok(7));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = StdRandom::seeded(42);
        let mut b = StdRandom::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.generate(0, 1000), b.generate(0, 1000));
        }
    }

    proptest! {
        #[test]
        fn test_generate_within_bounds(seed: u64, min in 0i64..1000, span in 0i64..1000) {
            let mut random = StdRandom::seeded(seed);
            let value = i64::from(random.generate(min, min + span).unwrap());
            prop_assert!(value >= min && value <= min + span);
        }
    }
}
