//! Current partition of the point set and its reverse index.
//!
//! Clusters live in an arena and are addressed by [`ClusterId`] handles that
//! are never reused. Each point maps to the handle of the cluster that owns it,
//! and the partition order lists the live handles. A merge retires both input
//! handles, allocates a new one in the slot of the earlier input, and rewrites
//! the owner of every moved point.
//!
//! Display names are derived lazily from the merge tree rather than stored, so
//! merging never rewrites strings. A singleton named on its own renders as
//! `{A}`; nested inside a merged name it contributes the bare identifier, so
//! merging `A` with `B` and then with `C` yields `{A,B}` and `{{A,B},C}`.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use crate::{
    error::ClusterStateError,
    points::PointSet,
    result::{ClusterId, ClusterSnapshot},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Composition {
    Singleton(usize),
    Merged { left: ClusterId, right: ClusterId },
}

#[derive(Clone, Debug)]
struct ClusterNode {
    composition: Composition,
    members: Vec<usize>,
    live: bool,
}

/// Partition of the point set into named clusters.
///
/// # Examples
/// ```
/// use hcsolver_core::ClusterState;
///
/// let mut state = ClusterState::try_from_identifiers(["A", "B", "C"])?;
/// let a = state.owner_of("A").expect("A is tracked");
/// let b = state.owner_of("B").expect("B is tracked");
/// let merged = state.merge(a, b)?;
///
/// assert_eq!(state.len(), 2);
/// assert_eq!(state.name_of(merged).as_deref(), Some("{A,B}"));
/// assert_eq!(state.owner_of("B"), Some(merged));
/// assert_eq!(state.member_ids(merged), Some(vec!["A", "B"]));
/// # Ok::<(), hcsolver_core::ClusterStateError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ClusterState {
    point_ids: Vec<Arc<str>>,
    point_index: HashMap<Arc<str>, usize>,
    nodes: Vec<ClusterNode>,
    order: Vec<ClusterId>,
    owners: Vec<ClusterId>,
}

impl ClusterState {
    /// Seeds one singleton cluster per point of `points`, in insertion order.
    #[must_use]
    pub fn from_points(points: &PointSet) -> Self {
        let point_ids = points.ids();
        let point_index = point_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (Arc::clone(id), index))
            .collect();
        Self::seeded(point_ids, point_index)
    }

    /// Seeds one singleton cluster per identifier, in iteration order.
    ///
    /// # Errors
    /// Returns [`ClusterStateError::DuplicatePoint`] when an identifier
    /// repeats.
    pub fn try_from_identifiers<I, S>(identifiers: I) -> Result<Self, ClusterStateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let mut point_ids = Vec::new();
        let mut point_index = HashMap::new();
        for id in identifiers {
            let id: Arc<str> = id.into();
            match point_index.entry(Arc::clone(&id)) {
                Entry::Occupied(_) => return Err(ClusterStateError::DuplicatePoint { id }),
                Entry::Vacant(slot) => {
                    slot.insert(point_ids.len());
                }
            }
            point_ids.push(id);
        }
        Ok(Self::seeded(point_ids, point_index))
    }

    fn seeded(point_ids: Vec<Arc<str>>, point_index: HashMap<Arc<str>, usize>) -> Self {
        let count = point_ids.len();
        let nodes = (0..count)
            .map(|point| ClusterNode {
                composition: Composition::Singleton(point),
                members: vec![point],
                live: true,
            })
            .collect();
        let order: Vec<ClusterId> = (0..count).map(ClusterId::new).collect();
        let owners = order.clone();
        Self {
            point_ids,
            point_index,
            nodes,
            order,
            owners,
        }
    }

    /// Number of clusters in the current partition.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether the partition is empty (no points were supplied).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of points tracked by the state.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.point_ids.len()
    }

    /// Identifier of the point at `index`.
    #[must_use]
    pub fn point_id(&self, index: usize) -> Option<&str> {
        self.point_ids.get(index).map(AsRef::as_ref)
    }

    pub(crate) fn shared_point_id(&self, index: usize) -> Option<Arc<str>> {
        self.point_ids.get(index).cloned()
    }

    /// Live cluster handles in partition order.
    #[must_use]
    pub fn clusters(&self) -> &[ClusterId] {
        &self.order
    }

    /// Returns whether `id` names a cluster in the current partition.
    #[must_use]
    pub fn contains(&self, id: ClusterId) -> bool {
        self.nodes.get(id.get()).is_some_and(|node| node.live)
    }

    /// Cluster currently owning the point labeled `point`.
    #[must_use]
    pub fn owner_of(&self, point: &str) -> Option<ClusterId> {
        let index = self.point_index.get(point).copied()?;
        self.owner_of_index(index)
    }

    /// Cluster currently owning the point at `index`.
    #[must_use]
    pub fn owner_of_index(&self, index: usize) -> Option<ClusterId> {
        self.owners.get(index).copied()
    }

    /// Member point indices of a live cluster, in merge order.
    #[must_use]
    pub fn members_of(&self, id: ClusterId) -> Option<&[usize]> {
        self.live_node(id).map(|node| node.members.as_slice())
    }

    /// The two clusters `id` was merged from, live or retired; `None` for
    /// singletons and unknown handles.
    pub(crate) fn children_of(&self, id: ClusterId) -> Option<(ClusterId, ClusterId)> {
        match self.nodes.get(id.get())?.composition {
            Composition::Merged { left, right } => Some((left, right)),
            Composition::Singleton(_) => None,
        }
    }

    /// Member point identifiers of a live cluster, in merge order.
    #[must_use]
    pub fn member_ids(&self, id: ClusterId) -> Option<Vec<&str>> {
        let members = self.members_of(id)?;
        Some(
            members
                .iter()
                .filter_map(|&point| self.point_id(point))
                .collect(),
        )
    }

    /// Display name of any cluster ever created in this state, live or
    /// retired.
    #[must_use]
    pub fn name_of(&self, id: ClusterId) -> Option<String> {
        let node = self.nodes.get(id.get())?;
        let mut name = String::new();
        match node.composition {
            Composition::Singleton(point) => {
                name.push('{');
                name.push_str(self.point_id(point)?);
                name.push('}');
            }
            Composition::Merged { .. } => self.write_label(id, &mut name),
        }
        Some(name)
    }

    /// Live cluster whose display name equals `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ClusterId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.name_of(id).as_deref() == Some(name))
    }

    /// Merges `left` and `right` into a new cluster and returns its handle.
    ///
    /// The new cluster lists `left`'s members followed by `right`'s, takes the
    /// partition slot of whichever input came first, and owns every moved
    /// point. All other clusters are untouched.
    ///
    /// # Errors
    /// Returns [`ClusterStateError::SelfMerge`] when both handles are equal and
    /// [`ClusterStateError::UnknownCluster`] when either handle is not live.
    pub fn merge(
        &mut self,
        left: ClusterId,
        right: ClusterId,
    ) -> Result<ClusterId, ClusterStateError> {
        if left == right {
            return Err(ClusterStateError::SelfMerge { id: left });
        }
        let left_slot = self.slot_of(left)?;
        let right_slot = self.slot_of(right)?;

        let merged = ClusterId::new(self.nodes.len());
        let mut members = self.retire(left)?;
        members.extend(self.retire(right)?);
        for &point in &members {
            if let Some(owner) = self.owners.get_mut(point) {
                *owner = merged;
            }
        }
        self.nodes.push(ClusterNode {
            composition: Composition::Merged { left, right },
            members,
            live: true,
        });

        let (first, second) = if left_slot < right_slot {
            (left_slot, right_slot)
        } else {
            (right_slot, left_slot)
        };
        self.order.remove(second);
        if let Some(slot) = self.order.get_mut(first) {
            *slot = merged;
        }
        Ok(merged)
    }

    /// Merges the live clusters named `left` and `right`.
    ///
    /// # Errors
    /// Returns [`ClusterStateError::UnknownClusterName`] when a name is not in
    /// the current partition, and any error raised by [`Self::merge`].
    pub fn merge_by_name(&mut self, left: &str, right: &str) -> Result<ClusterId, ClusterStateError> {
        let left_id = self.require_name(left)?;
        let right_id = self.require_name(right)?;
        self.merge(left_id, right_id)
    }

    /// Snapshot of every live cluster in partition order.
    #[must_use]
    pub fn partition(&self) -> Vec<ClusterSnapshot> {
        self.order
            .iter()
            .filter_map(|&id| {
                let name = self.name_of(id)?;
                let members = self
                    .members_of(id)?
                    .iter()
                    .filter_map(|&point| self.shared_point_id(point))
                    .collect();
                Some(ClusterSnapshot { name, members })
            })
            .collect()
    }

    /// Verifies that the partition order, the arena and the reverse index
    /// agree, and that every point belongs to exactly one live cluster.
    ///
    /// # Errors
    /// Returns [`ClusterStateError::Inconsistent`] describing the first
    /// violation found.
    pub fn check_invariants(&self) -> Result<(), ClusterStateError> {
        let live = self.nodes.iter().filter(|node| node.live).count();
        if live != self.order.len() {
            return Err(inconsistent(format!(
                "{live} live clusters but {} in partition order",
                self.order.len()
            )));
        }

        let mut seen = vec![false; self.point_ids.len()];
        for &id in &self.order {
            let members = self
                .members_of(id)
                .ok_or_else(|| inconsistent(format!("cluster {id} is ordered but not live")))?;
            if members.is_empty() {
                return Err(inconsistent(format!("cluster {id} has no members")));
            }
            for &point in members {
                match seen.get_mut(point) {
                    Some(flag) if *flag => {
                        return Err(inconsistent(format!(
                            "point {point} belongs to more than one cluster"
                        )));
                    }
                    Some(flag) => *flag = true,
                    None => return Err(inconsistent(format!("point {point} is out of range"))),
                }
                if self.owner_of_index(point) != Some(id) {
                    return Err(inconsistent(format!(
                        "point {point} is listed in {id} but indexed elsewhere"
                    )));
                }
            }
        }

        if let Some(orphan) = seen.iter().position(|flag| !flag) {
            return Err(inconsistent(format!("point {orphan} belongs to no cluster")));
        }
        Ok(())
    }

    fn live_node(&self, id: ClusterId) -> Option<&ClusterNode> {
        self.nodes.get(id.get()).filter(|node| node.live)
    }

    fn slot_of(&self, id: ClusterId) -> Result<usize, ClusterStateError> {
        if !self.contains(id) {
            return Err(ClusterStateError::UnknownCluster { id });
        }
        self.order
            .iter()
            .position(|&candidate| candidate == id)
            .ok_or(ClusterStateError::UnknownCluster { id })
    }

    fn retire(&mut self, id: ClusterId) -> Result<Vec<usize>, ClusterStateError> {
        let node = self
            .nodes
            .get_mut(id.get())
            .filter(|node| node.live)
            .ok_or(ClusterStateError::UnknownCluster { id })?;
        node.live = false;
        // Retired nodes keep their composition for naming; the members move.
        Ok(std::mem::take(&mut node.members))
    }

    fn require_name(&self, name: &str) -> Result<ClusterId, ClusterStateError> {
        self.find_by_name(name)
            .ok_or_else(|| ClusterStateError::UnknownClusterName {
                name: name.to_owned(),
            })
    }

    /// Writes the nested label of `root` without recursing, so long merge
    /// chains cannot exhaust the stack.
    fn write_label(&self, root: ClusterId, out: &mut String) {
        enum Step {
            Node(ClusterId),
            Text(char),
        }

        let mut stack = vec![Step::Node(root)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Text(ch) => out.push(ch),
                Step::Node(id) => match self.nodes.get(id.get()).map(|node| node.composition) {
                    Some(Composition::Singleton(point)) => {
                        out.push_str(self.point_id(point).unwrap_or_default());
                    }
                    Some(Composition::Merged { left, right }) => {
                        stack.push(Step::Text('}'));
                        stack.push(Step::Node(right));
                        stack.push(Step::Text(','));
                        stack.push(Step::Node(left));
                        out.push('{');
                    }
                    None => {}
                },
            }
        }
    }
}

fn inconsistent(reason: String) -> ClusterStateError {
    ClusterStateError::Inconsistent { reason }
}
