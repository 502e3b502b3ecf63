//! Node and link status.
//!
//! Node status decides which nodes the router updates; link status is derived
//! from the status of a link's two endpoints and decides which links carry
//! flux.

use std::fmt;

/// Boundary classification of a mesh node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeStatus {
    /// Interior node with a cell; its water depth evolves.
    #[default]
    Core,

    /// Boundary node whose depth is held by the caller (constant head).
    FixedValue,

    /// Boundary node excluded from flux computation entirely.
    Closed,
}

impl NodeStatus {
    /// Check if this is a core node.
    pub fn is_core(&self) -> bool {
        matches!(self, NodeStatus::Core)
    }

    /// Check if this is a closed node.
    pub fn is_closed(&self) -> bool {
        matches!(self, NodeStatus::Closed)
    }

    /// Check if this is a boundary node of either kind.
    pub fn is_boundary(&self) -> bool {
        !self.is_core()
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeStatus::Core => "core",
            NodeStatus::FixedValue => "fixed",
            NodeStatus::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Whether a link carries flux.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    /// At least one endpoint is core and neither endpoint is closed.
    Active,
    /// Touches a closed node, or joins two boundary nodes.
    Inactive,
}

impl LinkStatus {
    /// Derive link status from its endpoint statuses.
    ///
    /// A link between two boundary nodes is inactive even when neither is
    /// closed: no cell on either side is updated, so its flux goes nowhere.
    pub fn from_endpoints(tail: NodeStatus, head: NodeStatus) -> Self {
        if tail.is_closed() || head.is_closed() {
            LinkStatus::Inactive
        } else if tail.is_core() || head.is_core() {
            LinkStatus::Active
        } else {
            LinkStatus::Inactive
        }
    }

    /// Check if this link is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, LinkStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_core() {
        assert_eq!(NodeStatus::default(), NodeStatus::Core);
    }

    #[test]
    fn test_predicates() {
        assert!(NodeStatus::Core.is_core());
        assert!(!NodeStatus::Core.is_boundary());
        assert!(NodeStatus::FixedValue.is_boundary());
        assert!(!NodeStatus::FixedValue.is_closed());
        assert!(NodeStatus::Closed.is_closed());
        assert!(NodeStatus::Closed.is_boundary());
    }

    #[test]
    fn test_link_status_rules() {
        use NodeStatus::*;

        assert!(LinkStatus::from_endpoints(Core, Core).is_active());
        assert!(LinkStatus::from_endpoints(Core, FixedValue).is_active());
        assert!(LinkStatus::from_endpoints(FixedValue, Core).is_active());

        assert!(!LinkStatus::from_endpoints(Core, Closed).is_active());
        assert!(!LinkStatus::from_endpoints(Closed, Core).is_active());
        assert!(!LinkStatus::from_endpoints(FixedValue, FixedValue).is_active());
        assert!(!LinkStatus::from_endpoints(FixedValue, Closed).is_active());
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeStatus::Core.to_string(), "core");
        assert_eq!(NodeStatus::FixedValue.to_string(), "fixed");
        assert_eq!(NodeStatus::Closed.to_string(), "closed");
    }
}
