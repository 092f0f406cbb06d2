//! # Hypothesis Graph
//!
//! Owning container for all hypotheses of one tracking problem.
//!
//! ## Key Components
//!
//! - **HypothesisId**: identity of a segmentation hypothesis, as supplied by the caller
//! - **HypothesisGraph**: segmentation hypotheses by id, linking hypotheses by
//!   `(source, dest)` key, and exclusion constraints
//!
//! ## Design
//!
//! - Hypotheses and links live in `BTreeMap`s so every pass over the graph
//!   (registration, export, verification) visits them in id order.
//! - Link endpoints are ids. An id-indexed adjacency map answers
//!   "incoming/outgoing links of node N" without storing references.
//! - Once a [`ModelBuilder`](crate::engine::builder::ModelBuilder) has
//!   assigned optimizer ids the graph is frozen: further insertions and a
//!   second registration are rejected.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::engine::errors::TrackingError;
use crate::engine::solution::Solution;
use crate::engine::tracker::ModelState;
use crate::model::exclusion::ExclusionConstraint;
use crate::model::linking::{LinkKey, LinkingHypothesis};
use crate::model::segmentation::SegmentationHypothesis;
use crate::records::GraphRecord;

/// Identifier of a segmentation hypothesis.
///
/// HypothesisId implements Ord/PartialOrd for stable, deterministic iteration.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HypothesisId(pub i64);

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type LinkList = SmallVec<[LinkKey; 4]>;

/// Aggregate owner of all hypotheses and exclusion constraints.
#[derive(Debug, Clone, Default)]
pub struct HypothesisGraph {
    segmentations: BTreeMap<HypothesisId, SegmentationHypothesis>,
    links: BTreeMap<LinkKey, LinkingHypothesis>,
    exclusions: Vec<ExclusionConstraint>,
    incoming: FxHashMap<HypothesisId, LinkList>,
    outgoing: FxHashMap<HypothesisId, LinkList>,
    registered: bool,
    num_variables: Option<usize>,
}

impl HypothesisGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from its external record.
    ///
    /// Segmentations are inserted first so that links and exclusions can be
    /// checked against known ids.
    ///
    /// # Errors
    ///
    /// * `TrackingError::Duplicate` - repeated segmentation id or link key
    /// * `TrackingError::Reference` - a link or exclusion names an unknown id
    pub fn from_record(record: &GraphRecord) -> Result<Self, TrackingError> {
        let mut graph = Self::new();

        #[cfg(feature = "tracing")]
        tracing::info!(
            "graph contains {} segmentation hypotheses, {} linking hypotheses, {} exclusions",
            record.segmentation_hypotheses.len(),
            record.linking_hypotheses.len(),
            record.exclusions.len()
        );

        for entry in &record.segmentation_hypotheses {
            graph.add_segmentation(SegmentationHypothesis::from_record(entry))?;
        }
        for entry in &record.linking_hypotheses {
            graph.add_link(LinkingHypothesis::from_record(entry))?;
        }
        for members in &record.exclusions {
            graph.add_exclusion(members.iter().copied().map(HypothesisId))?;
        }

        Ok(graph)
    }

    pub fn add_segmentation(&mut self, hypothesis: SegmentationHypothesis) -> Result<(), TrackingError> {
        self.ensure_mutable("add a segmentation hypothesis")?;
        let id = hypothesis.id();
        if self.segmentations.contains_key(&id) {
            return Err(TrackingError::Duplicate(format!(
                "segmentation hypothesis {} is defined more than once",
                id
            )));
        }
        self.segmentations.insert(id, hypothesis);
        Ok(())
    }

    pub fn add_link(&mut self, link: LinkingHypothesis) -> Result<(), TrackingError> {
        self.ensure_mutable("add a linking hypothesis")?;
        let key = link.key();
        for endpoint in [key.source, key.dest] {
            if !self.segmentations.contains_key(&endpoint) {
                return Err(TrackingError::Reference(format!(
                    "link {} refers to unknown segmentation hypothesis {}",
                    key, endpoint
                )));
            }
        }
        if self.links.contains_key(&key) {
            return Err(TrackingError::Duplicate(format!(
                "link {} is defined more than once",
                key
            )));
        }

        self.outgoing.entry(key.source).or_default().push(key);
        self.incoming.entry(key.dest).or_default().push(key);
        self.links.insert(key, link);
        Ok(())
    }

    pub fn add_exclusion<I>(&mut self, members: I) -> Result<(), TrackingError>
    where
        I: IntoIterator<Item = HypothesisId>,
    {
        self.ensure_mutable("add an exclusion constraint")?;
        let constraint = ExclusionConstraint::new(members);
        if let Some(unknown) = constraint
            .members()
            .iter()
            .find(|id| !self.segmentations.contains_key(id))
        {
            return Err(TrackingError::Reference(format!(
                "exclusion constraint refers to unknown segmentation hypothesis {}",
                unknown
            )));
        }
        self.exclusions.push(constraint);
        Ok(())
    }

    fn ensure_mutable(&self, operation: &'static str) -> Result<(), TrackingError> {
        if self.registered {
            return Err(TrackingError::IllegalTransition {
                operation,
                state: ModelState::Built,
            });
        }
        Ok(())
    }

    pub fn segmentation(&self, id: HypothesisId) -> Option<&SegmentationHypothesis> {
        self.segmentations.get(&id)
    }

    /// Looks up a segmentation hypothesis, failing with a reference error.
    pub fn require_segmentation(&self, id: HypothesisId) -> Result<&SegmentationHypothesis, TrackingError> {
        self.segmentations.get(&id).ok_or_else(|| {
            TrackingError::Reference(format!("unknown segmentation hypothesis {}", id))
        })
    }

    pub fn segmentations(&self) -> impl Iterator<Item = &SegmentationHypothesis> {
        self.segmentations.values()
    }

    pub fn link(&self, key: LinkKey) -> Option<&LinkingHypothesis> {
        self.links.get(&key)
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkingHypothesis> {
        self.links.values()
    }

    pub fn exclusions(&self) -> &[ExclusionConstraint] {
        &self.exclusions
    }

    pub fn num_segmentations(&self) -> usize {
        self.segmentations.len()
    }

    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Resolves the source endpoint of a link.
    pub fn source_of(&self, link: &LinkingHypothesis) -> Option<&SegmentationHypothesis> {
        self.segmentations.get(&link.source())
    }

    /// Resolves the destination endpoint of a link.
    pub fn dest_of(&self, link: &LinkingHypothesis) -> Option<&SegmentationHypothesis> {
        self.segmentations.get(&link.dest())
    }

    /// Links ending in `id`, in insertion order.
    pub fn incoming_links(&self, id: HypothesisId) -> impl Iterator<Item = &LinkingHypothesis> {
        self.adjacent(&self.incoming, id)
    }

    /// Links starting in `id`, in insertion order.
    pub fn outgoing_links(&self, id: HypothesisId) -> impl Iterator<Item = &LinkingHypothesis> {
        self.adjacent(&self.outgoing, id)
    }

    fn adjacent<'a>(
        &'a self,
        index: &'a FxHashMap<HypothesisId, LinkList>,
        id: HypothesisId,
    ) -> impl Iterator<Item = &'a LinkingHypothesis> {
        index
            .get(&id)
            .into_iter()
            .flat_map(|keys| keys.iter())
            .filter_map(move |key| self.links.get(key))
    }

    pub fn count_active_incoming(&self, id: HypothesisId, solution: &Solution) -> usize {
        self.incoming_links(id)
            .filter(|link| solution.is_active(link.optimizer_id()))
            .count()
    }

    pub fn count_active_outgoing(&self, id: HypothesisId, solution: &Solution) -> usize {
        self.outgoing_links(id)
            .filter(|link| solution.is_active(link.optimizer_id()))
            .count()
    }

    /// Whether optimizer ids have been assigned.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Variable count of the model this graph was registered with.
    pub fn num_variables(&self) -> Option<usize> {
        self.num_variables
    }

    /// Like [`num_variables`](Self::num_variables), failing with a reference
    /// error while the graph has no completed model.
    pub fn registered_variables(&self) -> Result<usize, TrackingError> {
        self.num_variables.ok_or_else(|| {
            TrackingError::Reference("graph is not registered with a model".into())
        })
    }

    pub(crate) fn segmentations_mut(&mut self) -> impl Iterator<Item = &mut SegmentationHypothesis> {
        self.segmentations.values_mut()
    }

    pub(crate) fn links_mut(&mut self) -> impl Iterator<Item = &mut LinkingHypothesis> {
        self.links.values_mut()
    }

    pub(crate) fn mark_registered(&mut self) -> Result<(), TrackingError> {
        self.ensure_mutable("register the graph")?;
        self.registered = true;
        Ok(())
    }

    pub(crate) fn complete_registration(&mut self, num_variables: usize) {
        self.num_variables = Some(num_variables);
    }
}
