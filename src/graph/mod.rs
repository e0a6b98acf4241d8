use std::collections::BTreeSet;

/// A graph of nodes and directional edges represented using _adjacency lists_ that has no edge weights.
/// Adjacency lists suit a spreadsheet, where most cells reference few others or none at all.
///
/// To interpret the data structure, assume we have a node A, where A is the zero-based id of the node and also
/// its position in the Vec's.
///
///   - `outgoing_edges[A]` lists the ids of the nodes that depend on A (A's subscribers).
///   - `incoming_edges[A]` lists the ids of the nodes that A depends on (A's dependencies).
///
/// This is a bidirectional index, so every edge appears twice; once as an incoming edge and once as an outgoing edge.
/// BTreeSets keep neighbors in ascending id order, so traversals are deterministic.
#[derive(Clone, Debug)]
pub struct Graph {
    /// The index into the list is the `from` node Id (a dependency), while the set holds the node Ids
    /// of the dependents it points `to`.
    outgoing_edges: Vec<Option<BTreeSet<usize>>>,

    /// The index into the list is the `to` node Id (a dependent), while the set holds the node Ids
    /// of the dependencies pointing to it.
    incoming_edges: Vec<Option<BTreeSet<usize>>>
}

/// Visit state of a node during a depth first traversal.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Mark {
    Unvisited,
    /// On the current path. Reaching a node in this state again means there is a cycle.
    Evaluating,
    Done
}

impl Graph {
    /// Construct a Graph whose capacity is `node_count` nodes.
    /// The graph cannot be made larger than this.
    pub fn new(node_count: usize) -> Self {
        Graph {
            outgoing_edges: vec!(None; node_count),
            incoming_edges: vec!(None; node_count)
        }
    }

    pub fn node_count(&self) -> usize {
        self.outgoing_edges.len()
    }

    /// Add a directional edge that starts at `from_node` and points to `to_node`.
    /// `from_node` is a dependency, whereas `to_node` is a dependent node.
    pub fn add_edge(&mut self, from_node: usize, to_node: usize) {
        self.outgoing_edges[from_node]
          .get_or_insert_with(BTreeSet::new)
          .insert(to_node);
        self.incoming_edges[to_node]
          .get_or_insert_with(BTreeSet::new)
          .insert(from_node);
    }

    /// Remove an edge that starts at `from_node` and points to `to_node`.
    ///
    ///   - If such an edge exists and was successfully removed, return true.
    ///   - If no such edge exists, return false.
    pub fn remove_edge(&mut self, from_node: usize, to_node: usize) -> bool {
        let removed_outgoing = match self.outgoing_edges[from_node] {
            Some(ref mut set) => set.remove(&to_node),
            None => false
        };
        let removed_incoming = match self.incoming_edges[to_node] {
            Some(ref mut set) => set.remove(&from_node),
            None => false
        };
        removed_outgoing && removed_incoming
    }

    /// Ids of the nodes that `node` depends on, in ascending order.
    pub fn dependencies_of(&self, node: usize) -> Vec<usize> {
        Self::neighbors(&self.incoming_edges[node])
    }

    /// Ids of the nodes that depend directly on `node`, in ascending order.
    pub fn dependents_of(&self, node: usize) -> Vec<usize> {
        Self::neighbors(&self.outgoing_edges[node])
    }

    fn neighbors(edges: &Option<BTreeSet<usize>>) -> Vec<usize> {
        match edges {
            Some(set) => set.iter().copied().collect(),
            None => vec![]
        }
    }

    /// Swap the complete dependency set of `node` for `dependencies`.
    ///
    /// The new set is fully known before any edge is touched, and every old edge is torn down
    /// before the new ones are added, so no stale or duplicate edge can survive the swap.
    pub fn replace_dependencies(&mut self, node: usize, dependencies: &BTreeSet<usize>) {
        self.clear_dependencies(node);
        for dependency in dependencies {
            self.add_edge(*dependency, node);
        }
    }

    /// Remove every edge pointing to `node`.
    pub fn clear_dependencies(&mut self, node: usize) {
        for dependency in self.dependencies_of(node) {
            self.remove_edge(dependency, node);
        }
        self.incoming_edges[node] = None;
    }

    /// True if `node` depends on `target`, directly or through any chain of dependencies.
    /// A node does not depend on itself unless it lies on a cycle.
    pub fn depends_on(&self, node: usize, target: usize) -> bool {
        let mut visited = vec![false; self.node_count()];
        let mut pending = self.dependencies_of(node);
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !visited[current] {
                visited[current] = true;
                pending.extend(self.dependencies_of(current));
            }
        }
        false
    }

    /// Order in which everything downstream of `start` must be recomputed after `start` changes.
    ///
    /// Returns a tuple with two `Vecs`.
    ///
    ///   - The first `Vec` holds the ids of all transitive dependents of `start` (not `start` itself)
    ///     in __topological order__: every node appears after all of the nodes it depends on.
    ///   - The second `Vec` holds the ids of nodes found on a cycle, in ascending order.
    ///     These are excluded from the first `Vec`.
    ///
    /// __Algorithm__. Depth first search along outgoing edges, marking each node as Evaluating
    /// while its dependents are being visited and Done once they all are.
    /// Reaching a node that is still Evaluating means the path has looped back on itself.
    /// Reversing the order in which nodes become Done yields the topological order.
    pub fn downstream_order(&self, start: usize) -> (Vec<usize>, Vec<usize>) {
        let mut marks = vec![Mark::Unvisited; self.node_count()];
        let mut finished = Vec::new();
        let mut cyclic = BTreeSet::new();
        self.visit(start, &mut marks, &mut finished, &mut cyclic);
        let ordered = finished
            .into_iter()
            .rev()
            .filter(|node| *node != start && !cyclic.contains(node))
            .collect();
        (ordered, cyclic.into_iter().collect())
    }

    fn visit(&self, node: usize, marks: &mut Vec<Mark>, finished: &mut Vec<usize>, cyclic: &mut BTreeSet<usize>) {
        marks[node] = Mark::Evaluating;
        for dependent in self.dependents_of(node) {
            match marks[dependent] {
                Mark::Unvisited => self.visit(dependent, marks, finished, cyclic),
                Mark::Evaluating => { cyclic.insert(dependent); },
                Mark::Done => ()
            }
        }
        marks[node] = Mark::Done;
        finished.push(node);
    }
}
