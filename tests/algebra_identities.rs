use incidence::algs::random_one_to_many;
use incidence::relation::OneToMany;

fn rel(rows: &[&[usize]]) -> OneToMany {
    rows.iter().map(|r| r.to_vec()).collect()
}

fn row_set(row: &[usize]) -> Vec<usize> {
    let mut v = row.to_vec();
    v.sort_unstable();
    v.dedup();
    v
}

fn as_row_sets(rel: &OneToMany) -> Vec<Vec<usize>> {
    rel.rows().map(row_set).collect()
}

#[test]
fn symbolic_product_scenario() {
    let a = rel(&[&[0, 1], &[2]]);
    let b = rel(&[&[10], &[10, 20], &[30]]);
    let p = &a * &b;
    assert_eq!(row_set(&p[0]), vec![10, 20]);
    assert_eq!(row_set(&p[1]), vec![30]);
}

#[test]
fn union_is_commutative_as_sets() {
    let a = random_one_to_many(50, 30, 0.2, Some(5));
    let b = random_one_to_many(40, 30, 0.25, Some(6));
    assert_eq!(as_row_sets(&(&a | &b)), as_row_sets(&(&b | &a)));
}

#[test]
fn symmetric_difference_identity() {
    let a = random_one_to_many(50, 30, 0.2, Some(7));
    let b = random_one_to_many(60, 30, 0.2, Some(8));
    let lhs = &(&a | &b) - &(&a & &b);
    assert_eq!(lhs, &a ^ &b);
}

#[test]
fn plus_is_union() {
    let a = random_one_to_many(20, 10, 0.3, Some(9));
    let b = random_one_to_many(20, 10, 0.3, Some(10));
    assert_eq!(&a + &b, &a | &b);
}

#[test]
fn intersection_with_self_dedups_in_order() {
    let a = rel(&[&[4, 2, 4, 9]]);
    let i = &a & &a;
    assert_eq!(&i[0], &[4, 2, 9]);
}

#[test]
fn difference_with_self_is_empty_rows() {
    let a = random_one_to_many(30, 15, 0.4, Some(11));
    let d = &a - &a;
    assert_eq!(d.len(), a.len());
    assert!(d.rows().all(<[usize]>::is_empty));
}

#[test]
fn product_against_transpose_contains_diagonal() {
    // e shares a node with itself whenever its row is non-empty
    let a = rel(&[&[0, 1], &[1, 2], &[]]);
    let ee = &a * &a.transpose();
    assert!(row_set(&ee[0]).contains(&0));
    assert!(row_set(&ee[1]).contains(&1));
    assert!(ee[2].is_empty());
}
