//! Property tests for move generation.

use proptest::prelude::*;

use tower_operator::{DiscCount, MoveGenerator, Rod};

fn rod_index(rod: Rod) -> usize {
    match rod {
        Rod::A => 0,
        Rod::B => 1,
        Rod::C => 2,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: n discs always take exactly 2^n - 1 moves.
    #[test]
    fn property_move_count_is_two_pow_n_minus_one(n in 1i64..=12) {
        let moves = MoveGenerator::generate(n).unwrap();
        prop_assert_eq!(moves.len() as u64, (1u64 << n) - 1);
    }

    /// PROPERTY: replaying the sequence never puts a larger disc on a
    /// smaller one, and ends with every disc on C.
    #[test]
    fn property_sequence_is_legal_and_solves(n in 1u32..=10) {
        let moves = MoveGenerator::solve(DiscCount::new(i64::from(n)).unwrap());

        let mut rods: [Vec<u32>; 3] = [(1..=n).rev().collect(), Vec::new(), Vec::new()];
        for mv in &moves {
            prop_assert_ne!(mv.from, mv.to);
            let from = rod_index(mv.from);
            let to = rod_index(mv.to);
            let top = rods[from].pop();
            prop_assert_eq!(top, Some(mv.disc_index));
            if let Some(&below) = rods[to].last() {
                prop_assert!(below > mv.disc_index);
            }
            rods[to].push(mv.disc_index);
        }

        prop_assert!(rods[0].is_empty());
        prop_assert!(rods[1].is_empty());
        prop_assert_eq!(rods[2].clone(), (1..=n).rev().collect::<Vec<_>>());
    }

    /// PROPERTY: the middle move carries the largest disc from A to C.
    #[test]
    fn property_middle_move_is_largest_disc(n in 1i64..=12) {
        let moves = MoveGenerator::generate(n).unwrap();
        let middle = moves[moves.len() / 2];
        prop_assert_eq!(i64::from(middle.disc_index), n);
        prop_assert_eq!(middle.from, Rod::A);
        prop_assert_eq!(middle.to, Rod::C);
    }

    /// PROPERTY: non-positive disc counts are always rejected.
    #[test]
    fn property_non_positive_is_rejected(n in i64::MIN..=0) {
        prop_assert!(MoveGenerator::generate(n).is_err());
    }
}
