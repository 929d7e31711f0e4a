use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use rand::Rng;

use crate::model::{Move, PuzzleState, StateKey};

/// Default cap on distinct states visited before a search gives up.
pub const DEFAULT_NODE_BUDGET: usize = 2000;

/// Limits for one exploration run. The node budget keeps the search from
/// running away on puzzles it cannot crack; callers wanting a wall-clock
/// bound impose it on top of this.
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits {
    /// Hard cap on the size of the visited set.
    pub max_nodes: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_NODE_BUDGET,
        }
    }
}

/// One discovered transition out of a state.
struct Edge {
    state: StateKey,
    step: Move,
    #[allow(dead_code)]
    weight: f32,
    is_final: bool,
    is_best_step: bool,
}

/// Discovery record for one visited state: its outgoing edges and the state
/// it was first reached from.
struct Node {
    next: Vec<Edge>,
    prev: Option<StateKey>,
}

/// A successor materialized during expansion, before it becomes an edge.
struct Successor {
    state: PuzzleState,
    key: StateKey,
    step: Move,
    weight: f32,
    is_final: bool,
}

/// Partial state-space graph rooted at some encoded puzzle state.
///
/// [`recalculate`](Self::recalculate) explores depth-first under a node
/// budget until it finds any solved state, then marks the best step out of
/// every state along the discovered path. [`get_best_step`](Self::get_best_step)
/// answers "what should I play from here" for any state the exploration
/// touched. The graph holds its own disposable copies of puzzle states and
/// never mutates the state it was asked to solve.
pub struct SolverGraph {
    limits: SearchLimits,
    graph: HashMap<StateKey, Node>,
}

impl SolverGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(SearchLimits::default())
    }

    #[must_use]
    pub fn with_limits(limits: SearchLimits) -> Self {
        Self {
            limits,
            graph: HashMap::new(),
        }
    }

    /// Discards the previous graph and searches again from `state`'s
    /// current encoding. Returns whether a path to a solved state was
    /// found within the node budget.
    ///
    /// `false` is an inconclusive outcome, not an error: the usual caller
    /// reaction is to roll its move history back one step and try again
    /// from there.
    ///
    /// The tie-break between equally promising moves draws from `rng`;
    /// pass a seeded generator for reproducible searches.
    pub fn recalculate<R: Rng + ?Sized>(&mut self, state: &PuzzleState, rng: &mut R) -> bool {
        self.graph.clear();
        if state.is_final() {
            debug!("root state is already solved, nothing to search");
            return true;
        }
        self.explore(state, rng)
    }

    /// The move known to lie on a discovered path to a solved state, for
    /// any state visited by the last exploration. `None` means this state
    /// is unknown or no solution was found through it; callers should
    /// recalculate from it.
    #[must_use]
    pub fn get_best_step(&self, state: &StateKey) -> Option<Move> {
        let node = self.graph.get(state)?;
        node.next.iter().find(|e| e.is_best_step).map(|e| e.step)
    }

    /// Follows best-step marks from `from` to the solved state they lead
    /// to. Empty if `from` is unknown or off the solved branch.
    #[must_use]
    pub fn best_line(&self, from: &StateKey) -> Vec<Move> {
        let mut line = Vec::new();
        let mut cur = from.clone();
        while let Some(node) = self.graph.get(&cur) {
            let Some(edge) = node.next.iter().find(|e| e.is_best_step) else {
                break;
            };
            line.push(edge.step);
            if edge.is_final {
                break;
            }
            cur = edge.state.clone();
        }
        line
    }

    /// Depth-first exploration with heuristic-ordered frontier insertion.
    /// LIFO keeps memory bounded and finishes a promising line of play
    /// before backtracking.
    fn explore<R: Rng + ?Sized>(&mut self, root: &PuzzleState, rng: &mut R) -> bool {
        let root_key = root.encode();
        let mut stack: Vec<(PuzzleState, StateKey, Option<StateKey>)> =
            vec![(root.clone(), root_key.clone(), None)];
        let mut visited: HashSet<StateKey> = HashSet::new();
        visited.insert(root_key);

        while let Some((state, key, prev)) = stack.pop() {
            let successors = Self::expand(&state, rng);
            trace!("expanding {state}: {} legal pours", successors.len());
            let edges = successors
                .iter()
                .map(|s| Edge {
                    state: s.key.clone(),
                    step: s.step,
                    weight: s.weight,
                    is_final: s.is_final,
                    // A terminal edge is its own best step; everything else
                    // gets marked by back-propagation.
                    is_best_step: s.is_final,
                })
                .collect();
            self.graph.insert(key.clone(), Node { next: edges, prev });

            for succ in successors {
                if !visited.insert(succ.key.clone()) {
                    continue;
                }
                let solved = succ.is_final;
                stack.push((succ.state, succ.key, Some(key.clone())));
                if solved {
                    self.propagate_best_step(&key);
                    debug!("solution found after visiting {} states", visited.len());
                    return true;
                }
            }

            if visited.len() > self.limits.max_nodes {
                debug!(
                    "node budget of {} exhausted, abandoning search",
                    self.limits.max_nodes
                );
                return false;
            }
        }

        debug!(
            "search space exhausted without a solution, {} states visited",
            visited.len()
        );
        false
    }

    /// Materializes every legal single pour out of `state`, ordered for
    /// frontier insertion: ascending heuristic weight, then descending
    /// unit count (bigger pours first), then a random token. With a LIFO
    /// frontier the back of this ordering is expanded first, so the
    /// heaviest (most useful) pour leads the line of play.
    fn expand<R: Rng + ?Sized>(state: &PuzzleState, rng: &mut R) -> Vec<Successor> {
        let n = state.tube_count();
        let mut found = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let Some(pour) = state.can_transfer(i, j) else {
                    continue;
                };
                let step = Move {
                    source: i,
                    target: j,
                    color: pour.color,
                    units: pour.units,
                };
                let mut next = state.clone();
                next.transfer(step);
                let key = next.encode();
                let is_final = next.is_final();
                found.push(Successor {
                    state: next,
                    key,
                    step,
                    weight: pour.weight,
                    is_final,
                });
            }
        }

        // The random token is drawn up front so the comparator stays a
        // total order; it only decides between equally weighted pours.
        let mut ordered: Vec<(u32, Successor)> =
            found.into_iter().map(|s| (rng.random::<u32>(), s)).collect();
        ordered.sort_by(|(token_a, a), (token_b, b)| {
            a.weight
                .total_cmp(&b.weight)
                .then(b.step.units.cmp(&a.step.units))
                .then(token_a.cmp(token_b))
        });
        ordered.into_iter().map(|(_, s)| s).collect()
    }

    /// Walks predecessor links from the state that reached a solved state
    /// up toward the root, marking the edge toward the solved branch in
    /// every state that has no best step yet. An ancestor that already has
    /// one shares a known-good continuation, so the walk stops there.
    fn propagate_best_step(&mut self, from: &StateKey) {
        let mut cur = from.clone();
        loop {
            let Some(prev) = self.graph.get(&cur).and_then(|n| n.prev.clone()) else {
                break;
            };
            if self.has_best_step(&prev) {
                break;
            }
            if let Some(node) = self.graph.get_mut(&prev)
                && let Some(edge) = node.next.iter_mut().find(|e| e.state == cur)
            {
                edge.is_best_step = true;
            }
            cur = prev;
        }
    }

    fn has_best_step(&self, state: &StateKey) -> bool {
        self.graph
            .get(state)
            .is_some_and(|n| n.next.iter().any(|e| e.is_best_step))
    }
}

impl Default for SolverGraph {
    fn default() -> Self {
        Self::new()
    }
}
