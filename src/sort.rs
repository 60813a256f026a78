//! The table sorter (C4): establishes the input order the simplifier
//! requires.

use crate::edgeset_table::EdgesetTable;
use crate::mutation_table::MutationTable;
use crate::node_table::NodeTable;
use crate::site_table::SiteTable;
use crate::{NodeId, SiteId, TskitError};

fn checked_usize(id: impl Into<i32>, num_rows: usize, reason: &'static str) -> Result<usize, TskitError> {
    let raw = id.into();
    let i = usize::try_from(raw).map_err(|_| TskitError::OutOfBounds { reason })?;
    if i >= num_rows {
        return Err(TskitError::OutOfBounds { reason });
    }
    Ok(i)
}

/// Sort `edgesets` by `(parent-time, parent, left)`, sort `sites` by
/// `position` remapping `mutations`' site column accordingly, and sort
/// `mutations` by their new site. `nodes` is read-only: edgeset times are
/// looked up through it.
///
/// `migrations` is accepted for API parity with the abstract interface
/// described in the design but is never touched here; callers pass it
/// through unmodified.
pub fn sort_tables(
    nodes: &NodeTable,
    edgesets: &mut EdgesetTable,
    sites: &mut SiteTable,
    mutations: &mut MutationTable,
) -> Result<(), TskitError> {
    sort_edgesets(nodes, edgesets)?;
    let site_id_map = sort_sites(sites);
    sort_mutations(nodes, mutations, &site_id_map)?;
    Ok(())
}

fn sort_edgesets(nodes: &NodeTable, edgesets: &mut EdgesetTable) -> Result<(), TskitError> {
    let n = edgesets.num_rows();
    let mut keyed = Vec::with_capacity(n);
    for i in 0..n {
        let row = edgesets.row(i)?;
        let time = nodes.time(row.parent)?;
        keyed.push((time, row));
    }
    keyed.sort_by(|(ta, a), (tb, b)| {
        f64::from(*ta)
            .partial_cmp(&f64::from(*tb))
            .unwrap()
            .then_with(|| i32::from(a.parent).cmp(&i32::from(b.parent)))
            .then_with(|| f64::from(a.left).partial_cmp(&f64::from(b.left)).unwrap())
    });

    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    let mut parent = Vec::with_capacity(n);
    let mut children = Vec::new();
    let mut children_length = Vec::with_capacity(n);
    for (_, mut row) in keyed {
        row.children.sort();
        left.push(row.left);
        right.push(row.right);
        parent.push(row.parent);
        children_length.push(row.children.len() as u16);
        children.extend(row.children);
    }
    edgesets.set_columns(&left, &right, &parent, &children, &children_length)
}

/// Sort `sites` by ascending position, returning the old-ordinal -> new-id
/// map.
fn sort_sites(sites: &mut SiteTable) -> Vec<SiteId> {
    let n = sites.num_rows();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        f64::from(sites.position(a))
            .partial_cmp(&f64::from(sites.position(b)))
            .unwrap()
    });

    let mut site_id_map = vec![SiteId::NULL; n];
    for (new_id, &old_id) in order.iter().enumerate() {
        site_id_map[old_id] = SiteId::from(new_id);
    }

    let mut position = Vec::with_capacity(n);
    let mut ancestral_state = Vec::new();
    let mut ancestral_state_length = Vec::with_capacity(n);
    for &old_id in &order {
        let row = sites.row(old_id).expect("old_id is a valid row index");
        position.push(row.position);
        ancestral_state_length.push(row.ancestral_state.len() as u32);
        ancestral_state.extend(row.ancestral_state);
    }
    sites
        .set_columns(&position, &ancestral_state, &ancestral_state_length)
        .expect("rebuilt columns have matching lengths by construction");

    site_id_map
}

fn sort_mutations(
    nodes: &NodeTable,
    mutations: &mut MutationTable,
    site_id_map: &[SiteId],
) -> Result<(), TskitError> {
    let n = mutations.num_rows();
    struct Keyed {
        site: SiteId,
        node: NodeId,
        derived_state: Vec<u8>,
    }
    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let row = mutations.row(i)?;
        let old_site = checked_usize(row.site, site_id_map.len(), "mutation site id out of bounds")?;
        checked_usize(row.node, nodes.num_rows(), "mutation node id out of bounds")?;
        rows.push(Keyed {
            site: site_id_map[old_site],
            node: row.node,
            derived_state: row.derived_state,
        });
    }
    rows.sort_by_key(|r| i32::from(r.site));

    let mut site = Vec::with_capacity(n);
    let mut node = Vec::with_capacity(n);
    let mut derived_state = Vec::new();
    let mut derived_state_length = Vec::with_capacity(n);
    for row in rows {
        site.push(row.site);
        node.push(row.node);
        derived_state_length.push(row.derived_state.len() as u16);
        derived_state.extend(row.derived_state);
    }
    mutations.set_columns(&site, &node, &derived_state, &derived_state_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeFlags, PopulationId, Position, Time};

    fn sample_nodes() -> NodeTable {
        let mut nodes = NodeTable::new(8, 64).unwrap();
        for t in [0.0, 0.0, 1.0, 2.0] {
            nodes
                .add_row(NodeFlags::NONE, Time::from(t), PopulationId::NULL, b"")
                .unwrap();
        }
        nodes
    }

    #[test]
    fn edgesets_sort_by_time_then_parent_then_left() {
        let nodes = sample_nodes();
        let mut edgesets = EdgesetTable::new(8, 64).unwrap();
        // parent 3 has time 2; parent 2 has time 1.
        edgesets
            .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(3), &[NodeId::from(1)])
            .unwrap();
        edgesets
            .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(2), &[NodeId::from(0)])
            .unwrap();
        sort_edgesets(&nodes, &mut edgesets).unwrap();
        assert_eq!(edgesets.parent(0), NodeId::from(2));
        assert_eq!(edgesets.parent(1), NodeId::from(3));
    }

    #[test]
    fn edgeset_children_sorted_ascending() {
        let nodes = sample_nodes();
        let mut edgesets = EdgesetTable::new(8, 64).unwrap();
        edgesets
            .add_row(
                Position::from(0.0),
                Position::from(1.0),
                NodeId::from(2),
                &[NodeId::from(1), NodeId::from(0)],
            )
            .unwrap();
        sort_edgesets(&nodes, &mut edgesets).unwrap();
        assert_eq!(edgesets.children(0), &[NodeId::from(0), NodeId::from(1)]);
    }

    #[test]
    fn sites_sort_and_mutations_remap() {
        let nodes = sample_nodes();
        let mut sites = SiteTable::new(8, 64).unwrap();
        sites.add_row(Position::from(5.0), b"A").unwrap(); // old id 0
        sites.add_row(Position::from(1.0), b"C").unwrap(); // old id 1
        let mut mutations = MutationTable::new(8, 64).unwrap();
        mutations
            .add_row(SiteId::from(0), NodeId::from(0), b"G")
            .unwrap();
        mutations
            .add_row(SiteId::from(1), NodeId::from(1), b"T")
            .unwrap();

        sort_tables(&nodes, &mut EdgesetTable::new(8, 64).unwrap(), &mut sites, &mut mutations)
            .unwrap();

        assert_eq!(sites.position(0), Position::from(1.0));
        assert_eq!(sites.position(1), Position::from(5.0));
        // The mutation that referenced old site 1 (now new site 0) sorts first.
        assert_eq!(mutations.site(0), SiteId::from(0));
        assert_eq!(mutations.derived_state(0), b"T");
        assert_eq!(mutations.site(1), SiteId::from(1));
        assert_eq!(mutations.derived_state(1), b"G");
    }

    #[test]
    fn out_of_bounds_parent_is_rejected() {
        let nodes = sample_nodes();
        let mut edgesets = EdgesetTable::new(8, 64).unwrap();
        edgesets
            .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(99), &[NodeId::from(0)])
            .unwrap();
        let err = sort_edgesets(&nodes, &mut edgesets).unwrap_err();
        assert!(matches!(err, TskitError::OutOfBounds { .. }));
    }
}
