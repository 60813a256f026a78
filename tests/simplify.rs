//! End-to-end scenarios exercising the public API: construct a
//! [`TableCollection`], sort it, simplify it, and check the resulting
//! tables -- mirroring how `tskit-dev-tskit-rust`'s `tests/test_table_collection.rs`
//! drives the crate from outside rather than through `#[cfg(test)]` units.

use tskit_simplify::prelude::*;
use tskit_simplify::sort_tables;

fn add_sample(tables: &mut TableCollection, time: f64) -> NodeId {
    tables
        .nodes
        .add_row(NodeFlags::new_sample(), Time::from(time), PopulationId::NULL, b"")
        .unwrap()
}

fn add_ancestor(tables: &mut TableCollection, time: f64) -> NodeId {
    tables
        .nodes
        .add_row(NodeFlags::NONE, Time::from(time), PopulationId::NULL, b"")
        .unwrap()
}

#[test]
fn s1_identity_two_samples_one_edgeset() {
    let mut tables = TableCollection::new(Position::from(1.0)).unwrap();
    let n0 = add_sample(&mut tables, 0.0);
    let n1 = add_sample(&mut tables, 0.0);
    let n2 = add_ancestor(&mut tables, 1.0);
    tables
        .edgesets
        .add_row(Position::from(0.0), Position::from(1.0), n2, &[n0, n1])
        .unwrap();

    tables.full_sort().unwrap();
    let idmap = tables.simplify(&[n0, n1], SimplifyFlags::NONE).unwrap();

    assert_eq!(tables.nodes.num_rows(), 3);
    assert_eq!(tables.edgesets.num_rows(), 1);
    let row = tables.edgesets.row(0).unwrap();
    assert_eq!(row.left, Position::from(0.0));
    assert_eq!(row.right, Position::from(1.0));
    assert_eq!(row.children, vec![NodeId::from(0), NodeId::from(1)]);
    assert_eq!(row.parent, NodeId::from(2));
    assert_eq!(idmap[usize::try_from(n0).unwrap()], NodeId::from(0));
    assert_eq!(idmap[usize::try_from(n1).unwrap()], NodeId::from(1));
}

#[test]
fn s3_squash_across_abutting_intervals_via_table_collection() {
    let mut tables = TableCollection::new(Position::from(1.0)).unwrap();
    let a = add_sample(&mut tables, 0.0);
    let b = add_sample(&mut tables, 0.0);
    let p = add_ancestor(&mut tables, 1.0);
    // Deliberately out of sorted order (reversed intervals) to exercise
    // `full_sort` before simplification.
    tables
        .edgesets
        .add_row(Position::from(0.5), Position::from(1.0), p, &[a, b])
        .unwrap();
    tables
        .edgesets
        .add_row(Position::from(0.0), Position::from(0.5), p, &[a, b])
        .unwrap();

    tables.full_sort().unwrap();
    tables.simplify(&[a, b], SimplifyFlags::NONE).unwrap();

    assert_eq!(tables.edgesets.num_rows(), 1);
    let row = tables.edgesets.row(0).unwrap();
    assert_eq!(row.left, Position::from(0.0));
    assert_eq!(row.right, Position::from(1.0));
}

#[test]
fn s5_sample_list_validation() {
    let mut tables = TableCollection::new(Position::from(1.0)).unwrap();
    let a = add_sample(&mut tables, 0.0);
    let not_sample = add_ancestor(&mut tables, 0.0);

    let err = tables.simplify(&[a, a], SimplifyFlags::NONE).unwrap_err();
    assert_eq!(err, TskitError::DuplicateSample);

    let err = tables
        .simplify(&[a, not_sample], SimplifyFlags::NONE)
        .unwrap_err();
    assert_eq!(err, TskitError::BadSamples);

    let err = tables.simplify(&[a], SimplifyFlags::NONE).unwrap_err();
    assert!(matches!(err, TskitError::BadParam { .. }));
}

#[test]
fn s6_sort_orders_edgesets_by_time_then_parent_then_left() {
    let mut tables = TableCollection::new(Position::from(1.0)).unwrap();
    for t in [0.0, 0.0, 1.0, 2.0, 2.0, 2.0] {
        tables
            .nodes
            .add_row(NodeFlags::NONE, Time::from(t), PopulationId::NULL, b"")
            .unwrap();
    }
    // parents 3 and 5 have time=2, parent 4 has time=1.
    tables
        .edgesets
        .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(5), &[NodeId::from(0)])
        .unwrap();
    tables
        .edgesets
        .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(4), &[NodeId::from(1)])
        .unwrap();
    tables
        .edgesets
        .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(3), &[NodeId::from(0)])
        .unwrap();

    tables.full_sort().unwrap();

    assert_eq!(tables.edgesets.parent(0), NodeId::from(4));
    assert_eq!(tables.edgesets.parent(1), NodeId::from(3));
    assert_eq!(tables.edgesets.parent(2), NodeId::from(5));
}

#[test]
fn sort_tables_is_idempotent() {
    let mut tables = TableCollection::new(Position::from(1.0)).unwrap();
    for t in [0.0, 0.0, 1.0, 2.0] {
        tables
            .nodes
            .add_row(NodeFlags::NONE, Time::from(t), PopulationId::NULL, b"")
            .unwrap();
    }
    tables
        .edgesets
        .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(3), &[NodeId::from(1)])
        .unwrap();
    tables
        .edgesets
        .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(2), &[NodeId::from(0)])
        .unwrap();

    tables.full_sort().unwrap();
    let after_first: Vec<_> = tables.edgesets.iter().collect();
    tables.full_sort().unwrap();
    let after_second: Vec<_> = tables.edgesets.iter().collect();
    assert_eq!(after_first, after_second);
}

#[test]
fn sort_tables_preserves_edgeset_and_mutation_multisets() {
    let mut nodes = tskit_simplify::NodeTable::new(8, 64).unwrap();
    for t in [0.0, 0.0, 1.0] {
        nodes
            .add_row(NodeFlags::NONE, Time::from(t), PopulationId::NULL, b"")
            .unwrap();
    }
    let mut edgesets = tskit_simplify::EdgesetTable::new(8, 64).unwrap();
    edgesets
        .add_row(Position::from(0.5), Position::from(1.0), NodeId::from(2), &[NodeId::from(1)])
        .unwrap();
    edgesets
        .add_row(Position::from(0.0), Position::from(0.5), NodeId::from(2), &[NodeId::from(0)])
        .unwrap();

    let mut sites = SiteTable::new(8, 64).unwrap();
    sites.add_row(Position::from(0.9), b"A").unwrap();
    sites.add_row(Position::from(0.1), b"C").unwrap();
    let mut mutations = MutationTable::new(8, 64).unwrap();
    mutations
        .add_row(SiteId::from(0), NodeId::from(1), b"T")
        .unwrap();
    mutations
        .add_row(SiteId::from(1), NodeId::from(0), b"G")
        .unwrap();

    let mut before_edgesets: Vec<_> = edgesets.iter().collect();
    let mut before_mutation_triples: Vec<_> = mutations
        .iter()
        .map(|m| (sites.position(usize::try_from(m.site).unwrap()), m.node, m.derived_state))
        .collect();

    sort_tables(&nodes, &mut edgesets, &mut sites, &mut mutations).unwrap();

    let mut after_edgesets: Vec<_> = edgesets.iter().collect();
    let mut after_mutation_triples: Vec<_> = mutations
        .iter()
        .map(|m| (sites.position(usize::try_from(m.site).unwrap()), m.node, m.derived_state))
        .collect();

    let edgeset_key = |e: &tskit_simplify::EdgesetTableRow| {
        (e.left, e.right, e.parent, e.children.clone())
    };
    before_edgesets.sort_by(|a, b| {
        edgeset_key(a)
            .partial_cmp(&edgeset_key(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    after_edgesets.sort_by(|a, b| {
        edgeset_key(a)
            .partial_cmp(&edgeset_key(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    assert_eq!(before_edgesets, after_edgesets);

    before_mutation_triples
        .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    after_mutation_triples
        .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    assert_eq!(before_mutation_triples, after_mutation_triples);
}
