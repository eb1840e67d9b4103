//! Random-source helpers shared by the generator and the pattern-set builder.
//!
//! Every draw goes through an explicit `&mut dyn RngCore`; nothing here keeps
//! global state.
use rand::RngCore;

/// Scale factor mapping a 24-bit integer onto [0, 1).
const FRACTION_SCALE: f32 = 1.0 / (1u32 << 24) as f32;

/// Generate a uniform random fraction in the range [0, 1).
///
/// Only the upper 24 bits of the draw are used so the result is exactly
/// representable in `f32` and never rounds up to `1.0`.
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * FRACTION_SCALE
}

/// Pick a uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0, "rand_index requires a non-empty range");
    ((rand01(rng) * len as f32) as usize).min(len - 1)
}

/// Creates a deterministic seed for a density level from a base seed.
pub fn seed_for_level(base_seed: u64, level: usize) -> u64 {
    let mixed = base_seed ^ (level as u64).wrapping_mul(0x9E3779B97F4A7C15);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// RNG fixture that returns the same word forever.
    pub(crate) struct FixedRng {
        pub(crate) value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    /// RNG fixture that replays a fixed script of words, then repeats the last one.
    pub(crate) struct ScriptedRng {
        words: Vec<u32>,
        cursor: usize,
    }

    impl ScriptedRng {
        pub(crate) fn new(words: Vec<u32>) -> Self {
            assert!(!words.is_empty());
            Self { words, cursor: 0 }
        }

        /// Word that makes [`rand01`] return exactly `fraction` for dyadic inputs.
        pub(crate) fn word_for(fraction: f32) -> u32 {
            ((fraction * (1u32 << 24) as f32) as u32) << 8
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let idx = self.cursor.min(self.words.len() - 1);
            self.cursor += 1;
            self.words[idx]
        }

        fn next_u64(&mut self) -> u64 {
            self.next_u32() as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(4) {
                let bytes = self.next_u32().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_stays_below_one_for_max_input() {
        let mut rng = FixedRng { value: u32::MAX };
        let result = rand01(&mut rng);
        assert!(result < 1.0);
        assert!(result > 0.999);
    }

    #[test]
    fn rand01_values_in_range() {
        let test_values = vec![0, 1, 100, 1000, u32::MAX / 2, u32::MAX - 1, u32::MAX];

        for value in test_values {
            let mut rng = FixedRng { value };
            let result = rand01(&mut rng);
            assert!(
                (0.0..1.0).contains(&result),
                "rand01({}) = {} is out of range [0,1)",
                value,
                result
            );
        }
    }

    #[test]
    fn rand_index_covers_whole_range() {
        let mut low = FixedRng { value: 0 };
        let mut high = FixedRng { value: u32::MAX };
        assert_eq!(rand_index(&mut low, 5), 0);
        assert_eq!(rand_index(&mut high, 5), 4);
        assert_eq!(rand_index(&mut high, 1), 0);
    }

    #[test]
    fn scripted_word_round_trips_dyadic_fraction() {
        let mut rng = ScriptedRng::new(vec![ScriptedRng::word_for(0.25), ScriptedRng::word_for(0.5)]);
        assert_eq!(rand01(&mut rng), 0.25);
        assert_eq!(rand01(&mut rng), 0.5);
        assert_eq!(rand01(&mut rng), 0.5);
    }

    #[test]
    fn level_seeds_differ_and_are_stable() {
        let a = seed_for_level(42, 0);
        let b = seed_for_level(42, 1);
        assert_ne!(a, b);
        assert_eq!(a, seed_for_level(42, 0));
        assert_ne!(seed_for_level(43, 0), a);
    }
}
