//! Strongly-typed identifiers for agents, groups, and clusters.
//!
//! Membership structures throughout the workspace are keyed by these ids,
//! never by reference identity, so that grouping and clustering results
//! are comparable and serializable.

use std::fmt;

/// Identifies one agent fragment within a cell/window.
///
/// Agents are created per contiguous cell visit and assigned sequential
/// ids by the assignment stage. `AgentId(n)` is the n-th agent created
/// while processing one scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a trajectory-similarity cluster.
///
/// Cluster ids are assigned per outer-loop agent during clustering, so
/// one physical cluster may span several ids when similarity is not
/// mutually triggered. See the clustering engine for the full contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ClusterId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
