//! Graphviz export of the transition table

use super::table::TransitionTable;
use super::StatState;
use std::fmt::Write;

/// Render every state as a node and every table row as an edge labelled
/// with its guard name.
pub fn to_dot(table: &TransitionTable) -> String {
    let mut dot = String::from("digraph hoopstat {\n    rankdir=LR;\n");
    for state in StatState::ALL {
        let shape = if state == StatState::default() {
            "doublecircle"
        } else if state.is_leaf() {
            "box"
        } else {
            "ellipse"
        };
        let _ = writeln!(dot, "    \"{state}\" [shape={shape}];");
    }
    for t in table.transitions() {
        let _ = writeln!(
            dot,
            "    \"{}\" -> \"{}\" [label=\"{}\"];",
            t.source,
            t.dest,
            t.guard.name()
        );
    }
    dot.push_str("}\n");
    dot
}
