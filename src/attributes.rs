//! Placeholder price and rating
//!
//! The catalog has no price or rating data, so the dashboard shows generated
//! values. The source is injectable; seed it to pin the output in tests.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::ops::RangeInclusive;

pub const PRICE_RANGE: RangeInclusive<u32> = 150_000..=300_000;
pub const RATING_RANGE: RangeInclusive<f64> = 3.0..=5.0;

pub trait AttributeSource: Send {
    /// Integer in [`PRICE_RANGE`]
    fn price(&mut self) -> u32;
    /// One decimal, in [`RATING_RANGE`]
    fn rating(&mut self) -> f64;
}

pub struct RandomAttributes {
    rng: StdRng,
}

impl RandomAttributes {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// Seeded when a seed is configured, entropy otherwise
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl AttributeSource for RandomAttributes {
    fn price(&mut self) -> u32 {
        self.rng.random_range(PRICE_RANGE)
    }

    fn rating(&mut self) -> f64 {
        round_to_tenth(self.rng.random_range(RATING_RANGE))
    }
}

/// Always hands out the same pair
#[derive(Debug, Clone, Copy)]
pub struct FixedAttributes {
    pub price: u32,
    pub rating: f64,
}

impl AttributeSource for FixedAttributes {
    fn price(&mut self) -> u32 {
        self.price
    }

    fn rating(&mut self) -> f64 {
        self.rating
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
