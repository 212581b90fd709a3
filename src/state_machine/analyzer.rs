//! Specification analyzer
//!
//! Builds a directed graph from a transition table to report structural
//! problems such as states that can never be reached from `start`.

use super::{MachineSpec, START_STATE, StateName};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use std::collections::HashMap;

/// Structural summary of a specification
#[derive(Debug, Clone)]
pub struct SpecAnalysis {
    pub start_states: Vec<StateName>,
    pub terminal_states: Vec<StateName>,
    pub unreachable_states: Vec<StateName>,
    pub duplicate_anchors: Vec<StateName>,
    pub self_loops: Vec<StateName>,
    /// Cycles through two or more states; self-loops are not counted
    pub has_cycles: bool,
}

impl SpecAnalysis {
    /// Problems that make the specification unusable for validation
    pub fn errors(&self, spec: &MachineSpec) -> Vec<String> {
        let mut errors = Vec::new();
        if !spec.has_start() {
            errors.push(format!(
                "No '{}' anchor: every new order would be flagged",
                START_STATE
            ));
        } else if self.start_states.is_empty() {
            errors.push(format!("The '{}' anchor lists no states", START_STATE));
        }
        errors
    }

    /// Suspicious but legal constructs
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for anchor in &self.duplicate_anchors {
            warnings.push(format!(
                "Anchor '{}' is declared more than once, only the first is used",
                anchor
            ));
        }
        for state in &self.unreachable_states {
            warnings.push(format!("State '{}' is unreachable from '{}'", state, START_STATE));
        }
        warnings
    }
}

/// Analyze a specification
pub fn analyze(spec: &MachineSpec) -> SpecAnalysis {
    let mut graph: DiGraph<StateName, ()> = DiGraph::new();
    let mut index: HashMap<StateName, NodeIndex> = HashMap::new();
    let mut self_loops = Vec::new();

    let mut node = |graph: &mut DiGraph<StateName, ()>, name: &StateName| {
        *index
            .entry(name.clone())
            .or_insert_with(|| graph.add_node(name.clone()))
    };

    let start = node(&mut graph, &START_STATE.to_string());
    for state in spec.states() {
        node(&mut graph, &state);
    }

    // Only the first occurrence of an anchor is visible to lookups
    for entry in spec.entries() {
        if spec.anchor(&entry.state).map(|first| std::ptr::eq(first, entry)) != Some(true) {
            continue;
        }
        let from = node(&mut graph, &entry.state);
        for target in &entry.transitions {
            if *target == entry.state {
                self_loops.push(target.clone());
                continue;
            }
            let to = node(&mut graph, target);
            graph.update_edge(from, to, ());
        }
    }

    let mut reachable = vec![false; graph.node_count()];
    let mut bfs = Bfs::new(&graph, start);
    while let Some(idx) = bfs.next(&graph) {
        reachable[idx.index()] = true;
    }

    let unreachable_states = graph
        .node_indices()
        .filter(|idx| *idx != start && !reachable[idx.index()])
        .map(|idx| graph[idx].clone())
        .collect();

    let terminal_states = spec
        .states()
        .into_iter()
        .filter(|state| spec.is_terminal_state(state))
        .collect();

    SpecAnalysis {
        start_states: spec.start_states().to_vec(),
        terminal_states,
        unreachable_states,
        duplicate_anchors: spec.duplicate_anchors(),
        self_loops,
        has_cycles: petgraph::algo::is_cyclic_directed(&graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::StateTransitions;

    #[test]
    fn test_linear_spec() {
        let spec = MachineSpec::new(vec![
            StateTransitions::new("start", ["pending"]),
            StateTransitions::new("pending", ["shipped", "cancelled"]),
            StateTransitions::new("shipped", ["shipped"]),
        ]);

        let analysis = analyze(&spec);
        assert_eq!(analysis.start_states, vec!["pending"]);
        assert_eq!(analysis.terminal_states, vec!["shipped", "cancelled"]);
        assert!(analysis.unreachable_states.is_empty());
        assert_eq!(analysis.self_loops, vec!["shipped"]);
        assert!(!analysis.has_cycles);
        assert!(analysis.errors(&spec).is_empty());
        assert!(analysis.warnings().is_empty());
    }

    #[test]
    fn test_unreachable_and_cycles() {
        let spec = MachineSpec::new(vec![
            StateTransitions::new("start", ["a"]),
            StateTransitions::new("a", ["b"]),
            StateTransitions::new("b", ["a"]),
            StateTransitions::new("orphan", ["a"]),
        ]);

        let analysis = analyze(&spec);
        assert_eq!(analysis.unreachable_states, vec!["orphan"]);
        assert!(analysis.has_cycles);
        assert_eq!(analysis.warnings().len(), 1);
    }

    #[test]
    fn test_missing_start_is_an_error() {
        let spec = MachineSpec::new(vec![StateTransitions::new("a", ["b"])]);
        let analysis = analyze(&spec);
        assert_eq!(analysis.errors(&spec).len(), 1);
        assert_eq!(analysis.unreachable_states, vec!["a", "b"]);
    }
}
