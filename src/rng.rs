//! Pure sampling helpers threaded through by a seedable generator
//! (`bevy_rand::GlobalEntropy<WyRand>`, per SPEC_FULL.md §E) so patrol
//! moves, `RandomMove`, and `RandomUtilitySelector` are all deterministically
//! reproducible from one seed, as spec.md §9's "Randomness" design note
//! requires.
//!
//! These take `&mut impl rand::Rng` rather than the concrete resource type
//! so they're testable with any seeded `rand::rngs::StdRng` without pulling
//! Bevy's ECS into unit tests.

use crate::position::Action;
use rand::Rng;

pub fn random_cardinal_move(rng: &mut impl Rng) -> Action {
    match rng.random_range(0..4u8) {
        0 => Action::Left,
        1 => Action::Right,
        2 => Action::Up,
        _ => Action::Down,
    }
}

/// Samples an index with probability proportional to `exp(scores[i])`
/// (spec.md §4.F "RandomUtilitySelector"), returning `None` for an empty
/// slice.
pub fn softmax_sample(scores: &[f32], rng: &mut impl Rng) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }
    let weights: Vec<f32> = scores.iter().map(|s| s.exp()).collect();
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return Some(0);
    }
    let mut proba = rng.random_range(0.0..total);
    let mut idx = 0usize;
    for (i, w) in weights.iter().enumerate() {
        idx = i;
        proba -= w;
        if proba <= 0.0 {
            break;
        }
    }
    // Floating-point rounding can leave `proba > 0` after the last
    // subtraction (spec.md §9 open question) — clamp defensively.
    Some(idx.min(weights.len() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn softmax_sample_is_deterministic_for_seed() {
        let scores = [1.0, 2.0, 0.5];
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(
            softmax_sample(&scores, &mut a),
            softmax_sample(&scores, &mut b)
        );
    }

    #[test]
    fn softmax_sample_never_indexes_out_of_range() {
        let scores = [1.0, 2.0, 3.0, 4.0];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let idx = softmax_sample(&scores, &mut rng).unwrap();
            assert!(idx < scores.len());
        }
    }

    #[test]
    fn random_cardinal_move_is_always_a_move_action() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(random_cardinal_move(&mut rng).is_move());
        }
    }
}
