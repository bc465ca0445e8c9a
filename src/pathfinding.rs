//! Dijkstra's and A* pathfinding on top of a decrease-key heap
//!
//! Graph search is the canonical consumer of `decrease_key`: when a shorter
//! route to a vertex already in the open set is found, its priority is lowered
//! in place instead of pushing a duplicate entry.
//!
//! # Design
//!
//! Only lightweight indices are stored in the heap. A fast hash map (using
//! FxHash) maps node states to their index, and a dense table keyed by index
//! holds costs, heap handles and back-pointers for path reconstruction.
//!
//! Dijkstra is A* with h(n) = 0.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heap::pathfinding::{dijkstra, SearchNode};
//! use mergeable_heap::FibonacciHeap;
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         let step = |dx, dy| GridPos { x: self.x + dx, y: self.y + dy, ..self.clone() };
//!         vec![(step(1, 0), 1), (step(-1, 0), 1), (step(0, 1), 1), (step(0, -1), 1)]
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra::<_, FibonacciHeap<_>>(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;

use rustc_hash::FxHashMap;

use crate::traits::{DecreaseKeyHeap, Entry};

/// Trait for types that can be used as costs in pathfinding algorithms.
///
/// Costs are ordered, copyable, addable, and `Default` is the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// Trait for nodes in a search graph.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can provide a heuristic estimate for A* search.
///
/// The heuristic must never overestimate the true remaining cost for A* to
/// find optimal paths.
pub trait AStarNode: SearchNode {
    fn heuristic(&self) -> Self::Cost;
}

/// Heap key for search entries, ordered by f-score only.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCost<C> {
    /// The f-score: g + h (where h=0 for Dijkstra)
    pub f_score: C,
    /// The actual cost from start (g-score)
    pub g_score: C,
}

impl<C: Ord> PartialEq for PriorityCost<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for PriorityCost<C> {}

impl<C: Ord> PartialOrd for PriorityCost<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for PriorityCost<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

/// Index of a discovered node state.
pub type NodeIndex = usize;

/// Item type the search stores in its heap.
pub type SearchEntry<C> = Entry<PriorityCost<C>, NodeIndex>;

/// Metadata stored for each discovered node during search.
struct NodeEntry<N: SearchNode, H> {
    node: N,
    g_score: N::Cost,
    /// Handle into the heap while the node is in the open set
    handle: Option<H>,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Open set plus discovered-node table for one search.
struct PathFinder<N, H>
where
    N: SearchNode,
    H: DecreaseKeyHeap<Item = SearchEntry<N::Cost>>,
{
    heap: H,
    nodes: Vec<NodeEntry<N, H::Handle>>,
    state_to_index: FxHashMap<N, NodeIndex>,
}

impl<N, H> PathFinder<N, H>
where
    N: SearchNode,
    H: DecreaseKeyHeap<Item = SearchEntry<N::Cost>>,
{
    fn new(start: &N, start_h: N::Cost) -> Self {
        let mut finder = PathFinder {
            heap: H::new(),
            nodes: Vec::new(),
            state_to_index: FxHashMap::default(),
        };
        let zero = N::Cost::default();
        finder.relax(start.clone(), zero, start_h, None);
        finder
    }

    /// Settles the open node with the smallest f-score.
    fn pop(&mut self) -> Option<(NodeIndex, N::Cost)> {
        let (priority, index) = self.heap.extract_min()?.into_parts();
        let entry = &mut self.nodes[index];
        entry.closed = true;
        entry.handle = None;
        Some((index, priority.g_score))
    }

    /// Records a route to `node` costing `g`, inserting it into the open set
    /// or lowering its priority if the route is an improvement.
    fn relax(&mut self, node: N, g: N::Cost, h: N::Cost, from: Option<NodeIndex>) {
        let priority = PriorityCost {
            f_score: g + h,
            g_score: g,
        };

        let index = match self.state_to_index.get(&node) {
            Some(&index) => index,
            None => {
                let index = self.nodes.len();
                self.state_to_index.insert(node.clone(), index);
                let handle = self.heap.insert(Entry::new(priority, index));
                self.nodes.push(NodeEntry {
                    node,
                    g_score: g,
                    handle: Some(handle),
                    came_from: from,
                    closed: false,
                });
                return;
            }
        };

        let entry = &mut self.nodes[index];
        if entry.closed || g >= entry.g_score {
            return;
        }
        entry.g_score = g;
        entry.came_from = from;
        if let Some(handle) = &entry.handle {
            // Same h, smaller g: the f-score strictly drops.
            let lowered = self.heap.decrease_key(handle, priority);
            debug_assert!(lowered.is_ok());
        }
    }

    fn node(&self, index: NodeIndex) -> &N {
        &self.nodes[index].node
    }

    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.nodes[current].node.clone()];
        while let Some(prev) = self.nodes[current].came_from {
            path.push(self.nodes[prev].node.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from the start node until `is_goal()` returns true.
///
/// Returns the path (start and goal inclusive) and its cost, or `None` if no
/// goal is reachable.
pub fn dijkstra<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<Item = SearchEntry<N::Cost>>,
{
    PathFinderBuilder::new(start.clone()).dijkstra::<H>()
}

/// Runs A* search from the start node until `is_goal()` returns true.
pub fn astar<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: AStarNode,
    H: DecreaseKeyHeap<Item = SearchEntry<N::Cost>>,
{
    PathFinderBuilder::new(start.clone()).astar::<H>()
}

/// Builder for pathfinding queries with search limits.
pub struct PathFinderBuilder<N: SearchNode> {
    start: N,
    max_cost: Option<N::Cost>,
    max_nodes: Option<usize>,
}

impl<N: SearchNode> PathFinderBuilder<N> {
    pub fn new(start: N) -> Self {
        PathFinderBuilder {
            start,
            max_cost: None,
            max_nodes: None,
        }
    }

    /// Ignores routes costing more than `cost`.
    pub fn max_cost(mut self, cost: N::Cost) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Gives up after settling `count` nodes.
    pub fn max_nodes(mut self, count: usize) -> Self {
        self.max_nodes = Some(count);
        self
    }

    pub fn dijkstra<H>(self) -> Option<(Vec<N>, N::Cost)>
    where
        H: DecreaseKeyHeap<Item = SearchEntry<N::Cost>>,
    {
        self.search::<H>(|_| N::Cost::default())
    }

    pub fn astar<H>(self) -> Option<(Vec<N>, N::Cost)>
    where
        N: AStarNode,
        H: DecreaseKeyHeap<Item = SearchEntry<N::Cost>>,
    {
        self.search::<H>(|n| n.heuristic())
    }

    fn search<H>(self, heuristic: impl Fn(&N) -> N::Cost) -> Option<(Vec<N>, N::Cost)>
    where
        H: DecreaseKeyHeap<Item = SearchEntry<N::Cost>>,
    {
        let mut finder = PathFinder::<N, H>::new(&self.start, heuristic(&self.start));
        let mut settled = 0usize;

        while let Some((current, g)) = finder.pop() {
            if self.max_nodes.is_some_and(|max| settled >= max) {
                return None;
            }
            settled += 1;

            if finder.node(current).is_goal() {
                return Some((finder.reconstruct_path(current), g));
            }

            for (neighbor, edge_cost) in finder.node(current).successors() {
                let tentative = g + edge_cost;
                if self.max_cost.is_some_and(|max| tentative > max) {
                    continue;
                }
                let h = heuristic(&neighbor);
                finder.relax(neighbor, tentative, h, Some(current));
            }
        }

        None
    }
}

/// Returns all nodes reachable from the start within a given cost budget,
/// in order of increasing cost.
pub fn reachable_within<N, H>(start: &N, max_cost: N::Cost) -> Vec<(N, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<Item = SearchEntry<N::Cost>>,
{
    let mut finder = PathFinder::<N, H>::new(start, N::Cost::default());
    let mut result = Vec::new();

    while let Some((current, g)) = finder.pop() {
        result.push((finder.node(current).clone(), g));

        for (neighbor, edge_cost) in finder.node(current).successors() {
            let tentative = g + edge_cost;
            if tentative <= max_cost {
                finder.relax(neighbor, tentative, N::Cost::default(), Some(current));
            }
        }
    }

    result
}
