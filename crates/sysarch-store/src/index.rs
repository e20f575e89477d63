//! Edge index over relationship rows
//!
//! Keyed by (source node, kind) and (target function, kind) so outgoing and
//! incoming lookups never scan the relationship table.

use std::collections::{BTreeSet, HashMap};
use sysarch_domain::{FunctionId, NodeRef, Relationship, RelationshipId, RelationshipKind};

#[derive(Debug, Default, Clone)]
pub(crate) struct EdgeIndex {
    outgoing: HashMap<(NodeRef, RelationshipKind), BTreeSet<RelationshipId>>,
    incoming: HashMap<(FunctionId, RelationshipKind), BTreeSet<RelationshipId>>,
}

impl EdgeIndex {
    pub(crate) fn insert(&mut self, relationship: &Relationship) {
        let kind = relationship.kind();
        self.outgoing
            .entry((relationship.edge.source(), kind))
            .or_default()
            .insert(relationship.id);
        self.incoming
            .entry((relationship.edge.target(), kind))
            .or_default()
            .insert(relationship.id);
    }

    pub(crate) fn remove(&mut self, relationship: &Relationship) {
        let kind = relationship.kind();
        let out_key = (relationship.edge.source(), kind);
        if let Some(ids) = self.outgoing.get_mut(&out_key) {
            ids.remove(&relationship.id);
            if ids.is_empty() {
                self.outgoing.remove(&out_key);
            }
        }
        let in_key = (relationship.edge.target(), kind);
        if let Some(ids) = self.incoming.get_mut(&in_key) {
            ids.remove(&relationship.id);
            if ids.is_empty() {
                self.incoming.remove(&in_key);
            }
        }
    }

    pub(crate) fn outgoing(&self, source: NodeRef, kind: RelationshipKind) -> Vec<RelationshipId> {
        self.outgoing
            .get(&(source, kind))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn incoming(&self, target: FunctionId, kind: RelationshipKind) -> Vec<RelationshipId> {
        self.incoming
            .get(&(target, kind))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every relationship starting or ending at a node, any kind
    pub(crate) fn touching(&self, node: NodeRef) -> BTreeSet<RelationshipId> {
        let mut ids = BTreeSet::new();
        for kind in RelationshipKind::ALL {
            ids.extend(self.outgoing(node, kind));
            if let NodeRef::Function(function) = node {
                ids.extend(self.incoming(function, kind));
            }
        }
        ids
    }
}
