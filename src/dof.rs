//! Degree-of-freedom bookkeeping.

use petgraph::graph::NodeIndex;

/// Dense numbering of joint degrees of freedom.
///
/// The k-th joint in enumeration order owns the global indices `2k` (x) and
/// `2k + 1` (y). The table is built once per solve so the assembly and
/// recovery loops only deal in plain integers.
#[derive(Clone, Debug)]
pub struct DofMap {
    /// Dense position of each joint, indexed by `NodeIndex::index()`.
    dense: Vec<Option<usize>>,
    /// Number of joints that received an index.
    joints: usize,
}

impl DofMap {
    /// Number the supplied joints in iteration order.
    pub fn new(nodes: impl IntoIterator<Item = NodeIndex>) -> Self {
        let mut dense = Vec::new();
        let mut joints = 0;
        for node in nodes {
            let slot = node.index();
            if dense.len() <= slot {
                dense.resize(slot + 1, None);
            }
            dense[slot] = Some(joints);
            joints += 1;
        }
        Self { dense, joints }
    }

    /// Number of numbered joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints
    }

    /// Total number of degrees of freedom.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.joints * 2
    }

    /// Return the `(x, y)` indices for a joint, if it was numbered.
    #[must_use]
    pub fn dofs(&self, node: NodeIndex) -> Option<[usize; 2]> {
        let dense = (*self.dense.get(node.index())?)?;
        Some([2 * dense, 2 * dense + 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joints_receive_consecutive_pairs() {
        let map = DofMap::new((0..3).map(NodeIndex::new));
        assert_eq!(map.joint_count(), 3);
        assert_eq!(map.dof_count(), 6);
        assert_eq!(map.dofs(NodeIndex::new(0)), Some([0, 1]));
        assert_eq!(map.dofs(NodeIndex::new(2)), Some([4, 5]));
    }

    #[test]
    fn numbering_follows_iteration_order() {
        let map = DofMap::new([NodeIndex::new(4), NodeIndex::new(1)]);
        assert_eq!(map.dofs(NodeIndex::new(4)), Some([0, 1]));
        assert_eq!(map.dofs(NodeIndex::new(1)), Some([2, 3]));
        assert_eq!(map.dofs(NodeIndex::new(0)), None);
        assert_eq!(map.dofs(NodeIndex::new(9)), None);
    }
}
