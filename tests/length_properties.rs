//! Property-based tests for gene length computation
//!
//! The union length must not depend on locus order or on how a covered
//! region is split into loci, and must agree with an independent interval
//! coverage computation.

use gene_import::core::{gene_length, Locus, LocusGroup};
use proptest::prelude::*;
use rust_lapper::{Interval, Lapper};

/// Generate a non-empty set of loci
fn arb_loci() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec(
        (0u64..5000, 1u64..500).prop_map(|(start, len)| (start, start + len)),
        1..30,
    )
}

fn to_loci(pairs: &[(u64, u64)]) -> Vec<Locus> {
    pairs.iter().copied().map(Locus::from).collect()
}

/// Coverage as computed by rust-lapper
fn lapper_coverage(pairs: &[(u64, u64)]) -> u64 {
    let intervals: Vec<Interval<u64, u32>> = pairs
        .iter()
        .map(|&(start, stop)| Interval { start, stop, val: 0 })
        .collect();
    Lapper::new(intervals).cov()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: union length matches interval coverage
    #[test]
    fn prop_length_matches_coverage(pairs in arb_loci()) {
        let length = gene_length(&to_loci(&pairs)).unwrap();
        prop_assert_eq!(length, lapper_coverage(&pairs));
    }

    /// Property: union length does not depend on locus order
    #[test]
    fn prop_length_order_invariant(
        (pairs, shuffled) in arb_loci().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        prop_assert_eq!(
            gene_length(&to_loci(&pairs)).unwrap(),
            gene_length(&to_loci(&shuffled)).unwrap()
        );
    }

    /// Property: splitting a locus into two overlapping pieces keeps the length
    #[test]
    fn prop_length_split_invariant(
        pairs in arb_loci(),
        pick in any::<prop::sample::Index>(),
        cut in 0.0f64..1.0,
        overlap in 0u64..50,
    ) {
        let idx = pick.index(pairs.len());
        let (start, end) = pairs[idx];
        prop_assume!(end - start >= 2);

        let mid = start + 1 + ((end - start - 1) as f64 * cut) as u64;
        let mid = mid.min(end - 1);
        let mut split = pairs.clone();
        split[idx] = (start, (mid + overlap).min(end));
        split.push((mid, end));

        prop_assert_eq!(
            gene_length(&to_loci(&pairs)).unwrap(),
            gene_length(&to_loci(&split)).unwrap()
        );
    }

    /// Property: length is bounded by the longest locus and by the total span
    #[test]
    fn prop_length_bounds(pairs in arb_loci()) {
        let length = gene_length(&to_loci(&pairs)).unwrap();
        let longest = pairs.iter().map(|&(s, e)| e - s).max().unwrap();
        let min = pairs.iter().map(|&(s, _)| s).min().unwrap();
        let max = pairs.iter().map(|&(_, e)| e).max().unwrap();
        let total: u64 = pairs.iter().map(|&(s, e)| e - s).sum();

        prop_assert!(length >= longest);
        prop_assert!(length <= max - min);
        prop_assert!(length <= total);
    }

    /// Property: a locus group yields the same length and is empty afterwards
    #[test]
    fn prop_locus_group_consumed_once(pairs in arb_loci()) {
        let mut group = LocusGroup::new();
        for locus in to_loci(&pairs) {
            group.push(locus);
        }
        prop_assert_eq!(group.take_length().unwrap(), gene_length(&to_loci(&pairs)).unwrap());
        prop_assert!(group.is_empty());
        prop_assert!(group.take_length().is_err());
    }
}

#[test]
fn test_documented_examples() {
    assert_eq!(gene_length(&[Locus::new(3, 10)]).unwrap(), 7);
    assert_eq!(gene_length(&[Locus::new(3, 10), Locus::new(5, 11)]).unwrap(), 8);
}
