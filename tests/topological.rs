use incidence::relation::OneToMany;

fn rel(rows: &[&[usize]]) -> OneToMany {
    rows.iter().map(|r| r.to_vec()).collect()
}

#[test]
fn chain_scenario() {
    let a = rel(&[&[1, 2], &[2], &[]]);
    assert!(a.is_acyclic());
    assert_eq!(a.topological_order(), vec![0, 1, 2]);
}

#[test]
fn acyclic_order_is_complete_and_respects_edges() {
    let a = rel(&[&[3], &[3, 4], &[0]]);
    assert!(a.is_acyclic());
    let order = a.topological_order();
    assert_eq!(order.len(), 5);
    let pos = |v: usize| order.iter().position(|&x| x == v).unwrap();
    for (u, row) in a.rows().enumerate() {
        for &v in row {
            assert!(pos(u) < pos(v), "edge {u}->{v} violates the order");
        }
    }
}

#[test]
fn cyclic_order_is_a_strict_subset() {
    let a = rel(&[&[1], &[0], &[0]]);
    assert!(!a.is_acyclic());
    let order = a.topological_order();
    assert!(order.len() < 3);
}

#[test]
fn vertices_without_rows_are_sinks() {
    // node 4 has in-edges only
    let a = rel(&[&[4], &[4]]);
    assert!(a.is_acyclic());
    let order = a.topological_order();
    assert_eq!(order.len(), 5);
    assert_eq!(order.last(), Some(&4));
}

#[test]
fn is_permutation_of_ignores_row_order() {
    let a = rel(&[&[1, 2], &[0]]);
    let mut b = a.clone();
    b.permute_elements(&[1, 0]);
    assert!(a.is_permutation_of(&b));
    assert_ne!(a, b);
}
