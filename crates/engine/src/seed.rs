//! Initial-state functions for [`crate::Grid::new`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fair coin flip per cell.
pub const DEFAULT_FILL_RATE: f64 = 0.5;

/// Each cell is alive with probability `fill_rate`, drawn independently in the
/// order the grid asks for them.
///
/// `seed` - random seed (if `None`, then random seed is generated)
///
/// # Panics
///
/// The returned function panics if `fill_rate` is outside `[0, 1]`.
pub fn random(fill_rate: f64, seed: Option<u64>) -> impl FnMut(usize, usize) -> bool {
    let mut rng = if let Some(x) = seed {
        ChaCha8Rng::seed_from_u64(x)
    } else {
        ChaCha8Rng::from_entropy()
    };
    move |_, _| rng.gen_bool(fill_rate)
}

pub fn dead(_row: usize, _col: usize) -> bool {
    false
}
