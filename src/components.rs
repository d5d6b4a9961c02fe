//! Confidence registry for detected components.
//!
//! One `Components` instance lives for exactly one lint run. Records are
//! keyed by [`NodeId`], created by the detection instructions and enriched
//! by used-prop evidence until the walk ends and [`Components::list`]
//! harvests the confirmed set.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::tree::{NodeId, NodeKind, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Confidence {
    Banned,
    Maybe,
    Confirmed,
}

impl Confidence {
    /// `Banned` absorbs everything; otherwise the stronger evidence wins.
    pub fn merge(self, incoming: Confidence) -> Confidence {
        if self == Confidence::Banned || incoming == Confidence::Banned {
            Confidence::Banned
        } else {
            self.max(incoming)
        }
    }
}

/// How a prop was read at the usage site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UsageKind {
    /// `props.a`, `this.props.a.b`
    MemberAccess,
    /// `const { a } = props`, `function Foo({ a })`
    Destructured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedPropType {
    pub name: String,
    pub all_names: Option<Vec<String>>,
    pub node: NodeId,
    pub kind: UsageKind,
}

impl UsedPropType {
    pub fn is_equivalent(&self, other: &UsedPropType) -> bool {
        self.name == other.name && self.all_names == other.all_names
    }
}

#[derive(Debug, Clone)]
pub struct Component {
    pub node: NodeId,
    pub confidence: Confidence,
    pub used_prop_types: Vec<UsedPropType>,
    /// Keys of a `propTypes` object attached to the component.
    pub declared_prop_types: Vec<String>,
}

/// Fields to merge into an existing record with [`Components::set`].
#[derive(Debug, Clone, Default)]
pub struct ComponentPatch {
    pub used_prop_types: Option<Vec<UsedPropType>>,
    pub declared_prop_types: Option<Vec<String>>,
}

fn merge_used_prop_types(existing: &mut Vec<UsedPropType>, incoming: Vec<UsedPropType>) {
    for prop in incoming {
        if !existing.iter().any(|known| known.is_equivalent(&prop)) {
            existing.push(prop);
        }
    }
}

#[derive(Debug, Default)]
pub struct Components {
    records: BTreeMap<NodeId, Component>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node`, or merge `confidence` into its existing record.
    pub fn add(&mut self, node: NodeId, confidence: Confidence) -> &Component {
        let record = self.records.entry(node).or_insert_with(|| Component {
            node,
            confidence,
            used_prop_types: Vec::new(),
            declared_prop_types: Vec::new(),
        });
        let merged = record.confidence.merge(confidence);
        if merged != record.confidence {
            tracing::debug!(
                node = node.index(),
                from = ?record.confidence,
                to = ?merged,
                "component confidence changed"
            );
        }
        record.confidence = merged;
        record
    }

    pub fn get(&self, node: NodeId) -> Option<&Component> {
        self.records.get(&node)
    }

    /// Apply `patch` to the record of `node` or of its nearest registered
    /// ancestor. Does nothing when no ancestor is registered.
    pub fn set(&mut self, tree: &SyntaxTree<'_>, node: NodeId, patch: ComponentPatch) {
        let Some(owner) = std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|id| self.records.contains_key(id))
        else {
            return;
        };
        let Some(record) = self.records.get_mut(&owner) else {
            return;
        };
        if let Some(used) = patch.used_prop_types {
            merge_used_prop_types(&mut record.used_prop_types, used);
        }
        for name in patch.declared_prop_types.unwrap_or_default() {
            if !record.declared_prop_types.contains(&name) {
                record.declared_prop_types.push(name);
            }
        }
    }

    /// Confirmed components, with props used inside unconfirmed nested
    /// records handed up to the nearest registered ancestor.
    pub fn list(&self, tree: &SyntaxTree<'_>) -> Vec<Component> {
        let mut inherited: HashMap<NodeId, Vec<UsedPropType>> = HashMap::new();

        for record in self.records.values() {
            if record.confidence >= Confidence::Confirmed {
                continue;
            }
            let mut owner = None;
            for ancestor in tree.ancestors(record.node) {
                if matches!(tree.kind(ancestor), NodeKind::Decorator) {
                    break;
                }
                if self.records.contains_key(&ancestor) {
                    owner = Some(ancestor);
                    break;
                }
            }
            let Some(owner) = owner else {
                continue;
            };
            inherited.entry(owner).or_default().extend(
                record
                    .used_prop_types
                    .iter()
                    .filter(|prop| prop.kind != UsageKind::Destructured)
                    .cloned(),
            );
        }

        self.records
            .values()
            .filter(|record| record.confidence == Confidence::Confirmed)
            .map(|record| {
                let mut component = record.clone();
                if let Some(extra) = inherited.remove(&record.node) {
                    component.used_prop_types.extend(extra);
                }
                component
            })
            .collect()
    }

    /// Number of confirmed components.
    pub fn len(&self) -> usize {
        self.records
            .values()
            .filter(|record| record.confidence == Confidence::Confirmed)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every record, whatever its confidence. Used by tests and debugging.
    pub fn records(&self) -> impl Iterator<Item = &Component> {
        self.records.values()
    }
}
