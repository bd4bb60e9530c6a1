//! Work distribution planner: N-dimensional index domains and their
//! decomposition into groups.
//!
//! A dispatch covers a **global extent** partitioned into fixed-size
//! **groups** described by a **local extent**. Every point of the global
//! extent belongs to exactly one group and carries a local coordinate within
//! it:
//!
//! ```text
//! global[d] == group[d] * local_extent[d] + local[d]
//! ```
//!
//! The partition is only valid when every used local dimension evenly
//! divides its global counterpart; [`NdRange::new`] enforces that.
//!
//! Linearization follows the host's row-major layout: the last used
//! dimension varies fastest, so a 2D buffer indexed `[i][j]` lives at
//! `i * dim(1) + j`.

use std::fmt;

use crate::error::{DispatchError, Result};

/// An up-to-3-dimensional extent. Unused dimensions are 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    dims: [u32; 3],
    rank: u8,
}

impl Extent {
    /// Create a 1D extent.
    pub const fn d1(d0: u32) -> Self {
        Self {
            dims: [d0, 1, 1],
            rank: 1,
        }
    }

    /// Create a 2D extent.
    pub const fn d2(d0: u32, d1: u32) -> Self {
        Self {
            dims: [d0, d1, 1],
            rank: 2,
        }
    }

    /// Create a 3D extent.
    pub const fn d3(d0: u32, d1: u32, d2: u32) -> Self {
        Self {
            dims: [d0, d1, d2],
            rank: 3,
        }
    }

    /// Number of used dimensions (1, 2, or 3).
    pub const fn rank(&self) -> usize {
        self.rank as usize
    }

    /// Size along dimension `d`. Unused dimensions report 1.
    pub const fn dim(&self, d: usize) -> u32 {
        self.dims[d]
    }

    /// Total number of points in the extent.
    pub const fn len(&self) -> usize {
        self.dims[0] as usize * self.dims[1] as usize * self.dims[2] as usize
    }

    /// True when the extent covers no points.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear offset of a 2D coordinate (row-major, `d1` fastest).
    pub const fn linear2(&self, i0: u32, i1: u32) -> usize {
        i0 as usize * self.dims[1] as usize + i1 as usize
    }

    /// Linear offset of a 3D coordinate (row-major, `d2` fastest).
    pub const fn linear3(&self, i0: u32, i1: u32, i2: u32) -> usize {
        (i0 as usize * self.dims[1] as usize + i1 as usize) * self.dims[2] as usize + i2 as usize
    }

    /// Linear offset of a full coordinate triple.
    pub(crate) const fn linear(&self, coord: [u32; 3]) -> usize {
        self.linear3(coord[0], coord[1], coord[2])
    }

    /// Inverse of [`Extent::linear`]: split a linear offset back into a
    /// coordinate triple.
    pub(crate) const fn decompose(&self, linear: usize) -> [u32; 3] {
        let d1 = self.dims[1] as usize;
        let d2 = self.dims[2] as usize;
        [
            (linear / (d1 * d2)) as u32,
            (linear / d2 % d1) as u32,
            (linear % d2) as u32,
        ]
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            1 => write!(f, "{}", self.dims[0]),
            2 => write!(f, "{}x{}", self.dims[0], self.dims[1]),
            _ => write!(f, "{}x{}x{}", self.dims[0], self.dims[1], self.dims[2]),
        }
    }
}

/// A validated (global extent, local extent) pair.
///
/// Construction fails with [`DispatchError::InvalidDomain`] when the ranks
/// differ, any used dimension is zero, or a local dimension does not evenly
/// divide its global counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdRange {
    global: Extent,
    local: Extent,
}

impl NdRange {
    /// Create a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidDomain`] when the pair does not
    /// describe an exact partition of the global extent.
    pub fn new(global: Extent, local: Extent) -> Result<Self> {
        let invalid = |reason| DispatchError::InvalidDomain {
            reason,
            global,
            local,
        };

        if global.rank != local.rank {
            return Err(invalid("global and local ranks differ"));
        }
        for d in 0..global.rank() {
            if global.dim(d) == 0 || local.dim(d) == 0 {
                return Err(invalid("extent dimension is zero"));
            }
            if global.dim(d) % local.dim(d) != 0 {
                return Err(invalid("local extent does not divide global extent"));
            }
        }
        Ok(Self { global, local })
    }

    /// Create a validated 1D range.
    pub fn linear(global: u32, local: u32) -> Result<Self> {
        Self::new(Extent::d1(global), Extent::d1(local))
    }

    /// The global extent.
    pub const fn global(&self) -> Extent {
        self.global
    }

    /// The local (group) extent.
    pub const fn local(&self) -> Extent {
        self.local
    }

    /// Extent counting groups per dimension (`global / local`).
    pub fn group_extent(&self) -> Extent {
        Extent {
            dims: [
                self.global.dims[0] / self.local.dims[0],
                self.global.dims[1] / self.local.dims[1],
                self.global.dims[2] / self.local.dims[2],
            ],
            rank: self.global.rank,
        }
    }

    /// Total number of groups in the dispatch.
    pub fn group_count(&self) -> usize {
        self.group_extent().len()
    }

    /// Number of members per group.
    pub const fn group_size(&self) -> usize {
        self.local.len()
    }

    /// Total number of work items across all groups.
    pub const fn item_count(&self) -> usize {
        self.global.len()
    }

    /// Materialize the work item at (group linear index, local linear index).
    pub fn item(&self, group_linear: usize, local_linear: usize) -> WorkItem {
        debug_assert!(group_linear < self.group_count());
        debug_assert!(local_linear < self.group_size());
        let group = self.group_extent().decompose(group_linear);
        let local = self.local.decompose(local_linear);
        let global = [
            group[0] * self.local.dims[0] + local[0],
            group[1] * self.local.dims[1] + local[1],
            group[2] * self.local.dims[2] + local[2],
        ];
        WorkItem {
            global,
            local,
            group,
            global_extent: self.global,
            local_extent: self.local,
        }
    }

    /// Iterate every work item of the dispatch, group by group.
    pub fn items(&self) -> impl Iterator<Item = WorkItem> + '_ {
        (0..self.group_count())
            .flat_map(move |g| (0..self.group_size()).map(move |l| self.item(g, l)))
    }
}

impl fmt::Display for NdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "global {} / local {}", self.global, self.local)
    }
}

/// One point of the global index domain with its (group, local)
/// decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    global: [u32; 3],
    local: [u32; 3],
    group: [u32; 3],
    global_extent: Extent,
    local_extent: Extent,
}

impl WorkItem {
    /// Global coordinate along dimension `d`.
    pub const fn global_id(&self, d: usize) -> u32 {
        self.global[d]
    }

    /// Local coordinate along dimension `d`, bounded by the local extent.
    pub const fn local_id(&self, d: usize) -> u32 {
        self.local[d]
    }

    /// Owning group's coordinate along dimension `d`.
    pub const fn group_id(&self, d: usize) -> u32 {
        self.group[d]
    }

    /// Global extent of the dispatch this item belongs to.
    pub const fn global_extent(&self) -> Extent {
        self.global_extent
    }

    /// Local extent of the owning group.
    pub const fn local_extent(&self) -> Extent {
        self.local_extent
    }

    /// Linear position within the global extent.
    pub const fn global_linear(&self) -> usize {
        self.global_extent.linear(self.global)
    }

    /// Linear position within the owning group.
    pub const fn local_linear(&self) -> usize {
        self.local_extent.linear(self.local)
    }
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_constructors() {
        let e = Extent::d3(2, 3, 4);
        assert_eq!(e.rank(), 3);
        assert_eq!(e.len(), 24);
        assert_eq!(e.to_string(), "2x3x4");

        let e = Extent::d2(4, 4);
        assert_eq!(e.len(), 16);
        assert_eq!(e.to_string(), "4x4");

        let e = Extent::d1(9);
        assert_eq!(e.len(), 9);
        assert_eq!(e.to_string(), "9");
    }

    #[test]
    fn linear_offsets_are_row_major() {
        let e = Extent::d2(4, 6);
        assert_eq!(e.linear2(0, 0), 0);
        assert_eq!(e.linear2(0, 5), 5);
        assert_eq!(e.linear2(1, 0), 6);
        assert_eq!(e.linear2(3, 5), 23);

        let e = Extent::d3(4, 4, 6);
        assert_eq!(e.linear3(1, 2, 3), 1 * 24 + 2 * 6 + 3);
    }

    #[test]
    fn decompose_inverts_linear() {
        let e = Extent::d3(4, 4, 6);
        for linear in 0..e.len() {
            let coord = e.decompose(linear);
            assert_eq!(e.linear(coord), linear);
        }
    }

    #[test]
    fn nd_range_rejects_zero_dimensions() {
        assert!(NdRange::new(Extent::d1(0), Extent::d1(1)).is_err());
        assert!(NdRange::new(Extent::d1(8), Extent::d1(0)).is_err());
        assert!(NdRange::new(Extent::d2(8, 0), Extent::d2(2, 2)).is_err());
    }

    #[test]
    fn nd_range_rejects_non_dividing_local_extent() {
        assert!(NdRange::new(Extent::d1(9), Extent::d1(2)).is_err());
        assert!(NdRange::new(Extent::d2(8, 8), Extent::d2(3, 2)).is_err());
        assert!(NdRange::new(Extent::d3(4, 4, 6), Extent::d3(2, 2, 4)).is_err());
    }

    #[test]
    fn nd_range_rejects_rank_mismatch() {
        assert!(NdRange::new(Extent::d2(8, 8), Extent::d1(2)).is_err());
    }

    #[test]
    fn group_extent_divides_out() {
        let range = NdRange::new(Extent::d3(4, 4, 6), Extent::d3(2, 2, 2)).unwrap();
        assert_eq!(range.group_extent(), Extent::d3(2, 2, 3));
        assert_eq!(range.group_count(), 12);
        assert_eq!(range.group_size(), 8);
        assert_eq!(range.item_count(), 96);
    }

    #[test]
    fn decomposition_is_a_bijection() {
        // Every global point appears exactly once across all (group, local)
        // pairs, and the decomposition reconstructs the global coordinate.
        let range = NdRange::new(Extent::d2(8, 8), Extent::d2(2, 4)).unwrap();
        let mut seen = vec![false; range.item_count()];
        for item in range.items() {
            for d in 0..2 {
                assert_eq!(
                    item.global_id(d),
                    item.group_id(d) * range.local().dim(d) + item.local_id(d),
                );
            }
            let linear = item.global_linear();
            assert!(!seen[linear], "global point visited twice");
            seen[linear] = true;
        }
        assert!(seen.iter().all(|&v| v));
    }

    #[test]
    fn work_item_linear_indices() {
        let range = NdRange::new(Extent::d2(4, 4), Extent::d2(2, 2)).unwrap();
        let item = range.item(3, 3);
        // group (1,1), local (1,1) -> global (3,3)
        assert_eq!(item.group_id(0), 1);
        assert_eq!(item.group_id(1), 1);
        assert_eq!(item.global_id(0), 3);
        assert_eq!(item.global_id(1), 3);
        assert_eq!(item.global_linear(), 15);
        assert_eq!(item.local_linear(), 3);
    }
}
