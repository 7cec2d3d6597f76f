//! weather.rs — Random wind for each new mission setup
//!
//! Whole-mph wind speeds drawn uniformly from `[0, max]` and one of eight
//! compass points. The RNG is injected so seeded runs replay exactly.

use drone_types::{Weather, WindDirection};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

pub const DEFAULT_MAX_WIND_MPH: u32 = 40;

pub fn random_weather<R: Rng + ?Sized>(rng: &mut R, max_wind_mph: u32) -> Weather {
    let speed = Uniform::new_inclusive(0, max_wind_mph).sample(rng);
    let direction = WindDirection::ALL[rng.gen_range(0..WindDirection::ALL.len())];
    Weather { wind_mph: speed as f64, direction }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draws_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let w = random_weather(&mut rng, DEFAULT_MAX_WIND_MPH);
            assert!((0.0..=40.0).contains(&w.wind_mph));
            assert_eq!(w.wind_mph.fract(), 0.0);
        }
    }

    #[test]
    fn same_seed_same_weather() {
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..20).map(|_| random_weather(&mut rng, 40)).collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..20).map(|_| random_weather(&mut rng, 40)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn calm_ceiling_is_always_calm() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_weather(&mut rng, 0).wind_mph, 0.0);
    }
}
