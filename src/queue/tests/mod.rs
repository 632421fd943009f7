//! Test modules for the reordering channel
//!
//! Tests are organized by functional area for better maintainability.

mod handles;

/// Indices `first..=last` in a fixed, seeded shuffle
pub(crate) fn shuffled_indices(first: u64, last: u64) -> Vec<u64> {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let mut rng = StdRng::seed_from_u64(first ^ last.rotate_left(32));
    let mut indices: Vec<u64> = (first..=last).collect();
    indices.shuffle(&mut rng);
    indices
}
