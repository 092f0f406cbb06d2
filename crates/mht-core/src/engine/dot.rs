//! Graphviz export of a hypothesis graph.
//!
//! Segmentation hypotheses become nodes, linking hypotheses become edges and
//! every exclusion constraint becomes a chain of dashed undirected edges
//! between its members. With a solution, active detections and links are
//! drawn in blue.

use std::fmt::{self, Write};

use crate::engine::solution::Solution;
use crate::model::graph::HypothesisGraph;
use crate::model::variable::VariableKind;

const ACTIVE: &str = "color=\"blue\", penwidth=2";

/// Renders `graph` as a DOT digraph.
pub fn to_dot(graph: &HypothesisGraph, solution: Option<&Solution>) -> String {
    let mut out = String::new();
    write_dot(graph, solution, &mut out).ok();
    out
}

/// Writes the DOT rendering of `graph` to `out`.
pub fn write_dot<W: Write>(graph: &HypothesisGraph, solution: Option<&Solution>, out: &mut W) -> fmt::Result {
    let active = |id| solution.map_or(false, |s| s.is_active(id));

    writeln!(out, "digraph G {{")?;

    for hyp in graph.segmentations() {
        let mut label = hyp.id().to_string();
        for (kind, tag) in [
            (VariableKind::Division, "div"),
            (VariableKind::Appearance, "app"),
            (VariableKind::Disappearance, "dis"),
        ] {
            if active(hyp.optimizer_id(kind)) {
                label.push_str(", ");
                label.push_str(tag);
            }
        }
        if active(hyp.optimizer_id(VariableKind::Detection)) {
            writeln!(out, "    {} [label=\"{}\", {}];", hyp.id(), label, ACTIVE)?;
        } else {
            writeln!(out, "    {} [label=\"{}\"];", hyp.id(), label)?;
        }
    }

    for link in graph.links() {
        if active(link.optimizer_id()) {
            writeln!(out, "    {} -> {} [{}];", link.source(), link.dest(), ACTIVE)?;
        } else {
            writeln!(out, "    {} -> {};", link.source(), link.dest())?;
        }
    }

    for exclusion in graph.exclusions() {
        for pair in exclusion.members().windows(2) {
            writeln!(
                out,
                "    {} -> {} [dir=none, style=dashed, color=\"red\"];",
                pair[0], pair[1]
            )?;
        }
    }

    writeln!(out, "}}")
}
