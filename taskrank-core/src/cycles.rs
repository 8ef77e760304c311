//! Dependency cycle detection.
//!
//! Depth-first search with three colours over an arena of interned ids. The
//! walk keeps its own frame stack so deep dependency chains cannot overflow
//! the call stack.

use crate::error::{Result, ScoringError};
use crate::task::{Task, TaskId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    /// On the current DFS path.
    Gray,
    Black,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    next_edge: usize,
}

/// Dependency graph keyed by dense node indices.
#[derive(Debug, Default)]
struct DependencyGraph {
    ids: Vec<TaskId>,
    index: HashMap<TaskId, usize>,
    edges: Vec<Vec<usize>>,
    /// Nodes that came from a task record, in first-seen order.
    roots: Vec<usize>,
}

impl DependencyGraph {
    fn build(tasks: &[Task]) -> Self {
        let mut g = Self::default();
        let mut seen = HashSet::new();
        for task in tasks {
            let Some(id) = &task.id else { continue };
            let node = g.intern(id);
            let deps: Vec<usize> = task.dependencies.iter().map(|d| g.intern(d)).collect();
            if seen.insert(node) {
                g.roots.push(node);
            }
            // Later duplicates replace the earlier dependency list.
            g.edges[node] = deps;
        }
        g
    }

    fn intern(&mut self, id: &TaskId) -> usize {
        if let Some(&i) = self.index.get(id) {
            return i;
        }
        let i = self.ids.len();
        self.ids.push(id.clone());
        self.index.insert(id.clone(), i);
        self.edges.push(Vec::new());
        i
    }

    /// Walk from `root`, returning the first cycle closed on the current path.
    fn find_cycle_from(&self, root: usize, color: &mut [Color]) -> Option<Vec<usize>> {
        let mut stack = vec![Frame { node: root, next_edge: 0 }];
        color[root] = Color::Gray;

        while let Some(top) = stack.last_mut() {
            let node = top.node;
            let Some(&next) = self.edges[node].get(top.next_edge) else {
                color[node] = Color::Black;
                stack.pop();
                continue;
            };
            top.next_edge += 1;

            match color[next] {
                Color::White => {
                    color[next] = Color::Gray;
                    stack.push(Frame { node: next, next_edge: 0 });
                }
                Color::Gray => {
                    let start = stack.iter().position(|f| f.node == next).unwrap_or(0);
                    let mut cycle: Vec<usize> = stack[start..].iter().map(|f| f.node).collect();
                    cycle.push(next);
                    // Abandon the walk; everything on it counts as explored.
                    for f in &stack {
                        color[f.node] = Color::Black;
                    }
                    return Some(cycle);
                }
                Color::Black => {}
            }
        }

        None
    }
}

/// Report dependency cycles, each as a closed loop of ids (first id repeated
/// at the end). An empty result means the batch is a DAG.
///
/// At most one representative cycle is reported per unexplored root, and
/// identical sequences are reported once; rotations of the same loop may
/// still appear.
pub fn detect_circular_dependencies(tasks: &[Task]) -> Vec<Vec<TaskId>> {
    let graph = DependencyGraph::build(tasks);
    let mut color = vec![Color::White; graph.ids.len()];
    let mut cycles: Vec<Vec<TaskId>> = Vec::new();

    for &root in &graph.roots {
        if color[root] != Color::White {
            continue;
        }
        if let Some(path) = graph.find_cycle_from(root, &mut color) {
            let cycle: Vec<TaskId> = path.into_iter().map(|i| graph.ids[i].clone()).collect();
            if !cycles.contains(&cycle) {
                cycles.push(cycle);
            }
        }
    }

    if !cycles.is_empty() {
        tracing::debug!(count = cycles.len(), "dependency cycles found");
    }
    cycles
}

/// Gate used before scoring: fails with every detected cycle.
pub fn ensure_acyclic(tasks: &[Task]) -> Result<()> {
    let cycles = detect_circular_dependencies(tasks);
    if cycles.is_empty() {
        Ok(())
    } else {
        Err(ScoringError::DependencyCycle { cycles })
    }
}
