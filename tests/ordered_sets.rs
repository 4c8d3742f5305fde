use std::cmp::Ordering;

use incidence::algs::ordered::{
    compare, difference, intersection, sort_unique, symmetric_difference, union,
};

#[test]
fn results_are_ascending_and_duplicate_free() {
    let a = [9, 1, 4, 4, 7];
    let b = [4, 2, 9, 2];
    for result in [
        intersection(&a, &b),
        union(&a, &b),
        difference(&a, &b),
        symmetric_difference(&a, &b),
    ] {
        assert!(result.windows(2).all(|w| w[0] < w[1]), "{result:?}");
    }
}

#[test]
fn set_theoretic_identities_hold() {
    let a = [3, 1, 4, 1, 5];
    let b = [2, 7, 1, 8];
    // A = (A ∩ B) ∪ (A \ B)
    let mut canonical_a = a.to_vec();
    sort_unique(&mut canonical_a);
    assert_eq!(
        union(&intersection(&a, &b), &difference(&a, &b)),
        canonical_a
    );
    // A △ B = (A \ B) ∪ (B \ A)
    assert_eq!(
        symmetric_difference(&a, &b),
        union(&difference(&a, &b), &difference(&b, &a))
    );
    // ∩ and ∪ are commutative
    assert_eq!(intersection(&a, &b), intersection(&b, &a));
    assert_eq!(union(&a, &b), union(&b, &a));
}

#[test]
fn operations_against_the_empty_set() {
    let a = [5, 3, 5];
    let empty: [i32; 0] = [];
    assert_eq!(intersection(&a, &empty), vec![]);
    assert_eq!(union(&a, &empty), vec![3, 5]);
    assert_eq!(difference(&a, &empty), vec![3, 5]);
    assert_eq!(symmetric_difference(&empty, &a), vec![3, 5]);
}

#[test]
fn compare_orders_rows_lexicographically() {
    assert_eq!(compare(&[1, 2, 3], &[1, 2, 4]), Ordering::Less);
    assert_eq!(compare(&[1, 2], &[1, 2, 0]), Ordering::Less);
    assert_eq!(compare(&[5], &[5]), Ordering::Equal);
    assert_eq!(compare(&[6], &[5, 9]), Ordering::Greater);
}

#[test]
fn works_over_arbitrary_ord_types() {
    let a = ["pear", "apple", "pear"];
    let b = ["apple", "quince"];
    assert_eq!(intersection(&a, &b), vec!["apple"]);
    assert_eq!(union(&a, &b), vec!["apple", "pear", "quince"]);
}
