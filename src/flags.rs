//! Bit flags.

use bitflags::bitflags;

bitflags! {
    /// Node flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use tskit_simplify::NodeFlags;
    ///
    /// let f = NodeFlags::default();
    /// assert_eq!(f, NodeFlags::NONE);
    ///
    /// let f = NodeFlags::new_sample();
    /// assert!(f.is_sample());
    ///
    /// let f = NodeFlags::default().mark_sample();
    /// assert_eq!(f, NodeFlags::IS_SAMPLE);
    /// ```
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[repr(transparent)]
    pub struct NodeFlags: u32 {
        /// Default (empty) flags.
        const NONE = 0;
        /// The node is a sample: its ancestry is retained by
        /// [`crate::simplify::simplify`].
        const IS_SAMPLE = 1;
    }
}

impl NodeFlags {
    /// A new flags value with [`NodeFlags::IS_SAMPLE`] set.
    pub fn new_sample() -> Self {
        Self::default().mark_sample()
    }

    /// Return `self` with [`NodeFlags::IS_SAMPLE`] set.
    ///
    /// Named `mark_sample` rather than `is_sample` to not collide with the
    /// predicate of the same concept.
    pub fn mark_sample(self) -> Self {
        self | Self::IS_SAMPLE
    }

    /// `true` if `self` contains [`NodeFlags::IS_SAMPLE`].
    pub fn is_sample(&self) -> bool {
        self.contains(NodeFlags::IS_SAMPLE)
    }
}

bitflags! {
    /// Behavioral flags accepted by [`crate::simplify::simplify`].
    ///
    /// No bits are currently defined; §4.5 of the design calls this
    /// bitset "currently informational". It exists as an extensibility
    /// point, the same way the teacher crate carries several near-empty
    /// `*Options` bitsets for forward compatibility.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[repr(transparent)]
    pub struct SimplifyFlags: u32 {
        /// Default (empty) flags.
        const NONE = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert_eq!(NodeFlags::default(), NodeFlags::NONE);
        assert_eq!(SimplifyFlags::default(), SimplifyFlags::NONE);
    }

    #[test]
    fn node_is_sample_roundtrip() {
        let n = NodeFlags::default();
        assert!(!n.is_sample());
        let n = NodeFlags::new_sample();
        assert!(n.is_sample());
    }
}
