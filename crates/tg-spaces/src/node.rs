//! Virtual nodes: the tree shape produced by abstraction.

use serde::{Deserialize, Serialize};
use tg_types::{ConstructionError, TgError, TgResult};

use crate::space::{expect_value, Candidate, Space, SpaceId};

/// One node of an abstraction result: a stable key, an optional wrapped
/// payload (for leaves synthesized from determined spaces or raw candidate
/// values), and an insertion-ordered mapping from child key to child space.
///
/// Virtual nodes are produced by [`Space::abstracted`]; they are not meant to
/// be assembled by client code, and [`VirtualNode::append`] exists as the
/// construction primitive abstraction uses while building the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualNode {
    key: SpaceId,
    // Boxed: the payload closes the Candidate -> Space -> VirtualNode cycle.
    value: Option<Box<Candidate>>,
    children: Vec<(SpaceId, Space)>,
}

impl VirtualNode {
    pub fn new(key: SpaceId) -> Self {
        Self {
            key,
            value: None,
            children: Vec::new(),
        }
    }

    /// A childless node wrapping the payload a determined space (or raw
    /// candidate value) collapsed to.
    pub(crate) fn leaf(key: SpaceId, value: Candidate) -> Self {
        Self {
            key,
            value: Some(Box::new(value)),
            children: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: SpaceId, child: Space) {
        self.children.push((key, child));
    }

    /// Insert a child in call order. Fails with
    /// [`ConstructionError::InvalidCandidate`] when handed a concrete value
    /// where a space is required.
    pub fn append(&mut self, key: SpaceId, value: Candidate) -> TgResult<()> {
        match value {
            Candidate::Space(space) => {
                self.insert(key, space);
                Ok(())
            }
            Candidate::Value(v) => Err(ConstructionError::InvalidCandidate {
                value: v.to_string(),
            }
            .into()),
        }
    }

    pub fn key(&self) -> SpaceId {
        self.key
    }

    /// The wrapped payload, present only on leaves synthesized by
    /// abstraction.
    pub fn value(&self) -> Option<&Candidate> {
        self.value.as_deref()
    }

    pub fn get(&self, key: SpaceId) -> Option<&Space> {
        self.children
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, child)| child)
    }

    pub fn contains_key(&self, key: SpaceId) -> bool {
        self.get(key).is_some()
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (SpaceId, &Space)> {
        self.children.iter().map(|(k, child)| (*k, child))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// True iff every child is determined; vacuously true for a childless
    /// node.
    pub fn determined(&self) -> bool {
        self.children.iter().all(|(_, child)| child.determined())
    }

    /// Virtual nodes describe structure, not a sampling distribution.
    pub fn random(&self, _recursion: bool) -> TgResult<Candidate> {
        Err(TgError::Unsupported {
            operation: "random",
            variant: "VirtualNode",
        })
    }

    /// Rebuild the tree keeping only undetermined children, keyed by the
    /// projected child's id.
    pub fn abstracted(&self) -> Space {
        let mut node = VirtualNode::new(self.key);
        for (_, child) in &self.children {
            if !child.determined() {
                let projected = child.abstracted();
                node.insert(projected.id(), projected);
            }
        }
        Space::Virtual(node)
    }

    pub fn has(&self, x: &Candidate) -> TgResult<bool> {
        expect_value(x)?;
        for (_, child) in &self.children {
            if child.has(x)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn xrepr(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut lines = match &self.value {
            Some(value) => vec![format!("{pad}VirtualNode(value={value},")],
            None => vec![format!("{pad}VirtualNode(")],
        };
        for (_, child) in &self.children {
            lines.push(format!("{},", child.xrepr(indent + 2)));
        }
        lines.push(format!("{pad})"));
        lines.join("\n")
    }
}

/// Equality compares the child mappings: same key set, pairwise-equal
/// children, insertion order irrelevant. Leaf payloads are not compared.
impl PartialEq for VirtualNode {
    fn eq(&self, other: &Self) -> bool {
        self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .all(|(key, child)| other.get(*key).map_or(false, |o| child == o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Categorical, Continuous, Integer};

    fn node_with(children: Vec<Space>) -> VirtualNode {
        let mut node = VirtualNode::new(0);
        for child in children {
            let key = child.id();
            node.append(key, child.into()).unwrap();
        }
        node
    }

    #[test]
    fn append_rejects_concrete_values() {
        let mut node = VirtualNode::new(0);
        match node.append(1, 5.into()) {
            Err(TgError::Construction(ConstructionError::InvalidCandidate { value })) => {
                assert_eq!(value, "5");
            }
            other => panic!("expected InvalidCandidate, got {other:?}"),
        }
        assert!(node.is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let a = Continuous::new(0.0, 1.0);
        let b = Continuous::new(2.0, 3.0);
        let (a_key, b_key) = (a.id(), b.id());
        let node = node_with(vec![a.into(), b.into()]);

        let keys: Vec<SpaceId> = node.children().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![a_key, b_key]);
        assert!(node.contains_key(a_key));
        assert!(!node.contains_key(a_key + b_key + 1));
    }

    #[test]
    fn childless_node_is_vacuously_determined() {
        assert!(VirtualNode::new(0).determined());
    }

    #[test]
    fn determined_tracks_children() {
        let determined = node_with(vec![
            Continuous::new(0.0, 0.0).into(),
            Categorical::new(vec![5.into()]).unwrap().into(),
        ]);
        assert!(determined.determined());

        let undetermined = node_with(vec![
            Continuous::new(0.0, 0.0).into(),
            Integer::new(0, 3).unwrap().into(),
        ]);
        assert!(!undetermined.determined());
    }

    #[test]
    fn membership_scans_children() {
        let node = node_with(vec![
            Integer::new(0, 3).unwrap().into(),
            Continuous::new(10.0, 20.0).into(),
        ]);
        assert!(node.has(&2.into()).unwrap());
        assert!(node.has(&15.0.into()).unwrap());
        assert!(!node.has(&5.into()).unwrap());
    }

    #[test]
    fn random_is_unsupported() {
        match VirtualNode::new(0).random(true) {
            Err(TgError::Unsupported { operation, variant }) => {
                assert_eq!(operation, "random");
                assert_eq!(variant, "VirtualNode");
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn abstraction_drops_determined_children() {
        let free = Integer::new(0, 3).unwrap();
        let node = node_with(vec![
            Continuous::new(0.0, 0.0).into(),
            free.clone().into(),
        ]);

        match node.abstracted() {
            Space::Virtual(projected) => {
                assert_eq!(projected.key(), node.key());
                assert_eq!(projected.len(), 1);
                let (_, only) = projected.children().next().unwrap();
                assert_eq!(only, &free.abstracted());
            }
            other => panic!("expected a VirtualNode, got {other:?}"),
        }
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = Continuous::new(0.0, 1.0);
        let b = Integer::new(0, 3).unwrap();

        let mut forward = VirtualNode::new(0);
        forward.append(1, a.clone().into()).unwrap();
        forward.append(2, b.clone().into()).unwrap();

        let mut backward = VirtualNode::new(9);
        backward.append(2, b.into()).unwrap();
        backward.append(1, a.into()).unwrap();

        assert_eq!(forward, backward);

        let mut shorter = VirtualNode::new(0);
        shorter.append(1, Continuous::new(0.0, 1.0).into()).unwrap();
        assert_ne!(forward, shorter);
    }

    #[test]
    fn xrepr_indents_children() {
        let node = node_with(vec![
            Continuous::new(0.0, 1.0).into(),
            Integer::new(0, 3).unwrap().into(),
        ]);
        let expected = "VirtualNode(\n\
                        \x20 Continuous(lower=0, upper=1, default_value=None, log_scale=false),\n\
                        \x20 Integer(lower=0, upper=3, default=None),\n\
                        )";
        assert_eq!(node.xrepr(0), expected);
    }
}
