use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::Debug,
    ops::{Deref, DerefMut},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node is inside the map and can be stepped on
    fn is_traversable(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the traversable neighbors of the provided node.
    /// Every move costs exactly one.
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// The objects that we store in the priority queue
#[derive(Debug)]
struct ToVisit<R> {
    cost: usize,
    /// Push order, used to break ties between entries of equal cost
    sequence: usize,
    point: R,
    from: Option<R>,
}

impl<R> Ord for ToVisit<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for BinaryHeap to be a min-heap, earliest push first on equal cost
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<R> PartialOrd for ToVisit<R> {
    fn partial_cmp(&self, other: &ToVisit<R>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> PartialEq for ToVisit<R> {
    fn eq(&self, other: &ToVisit<R>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<R> Eq for ToVisit<R> {}

#[derive(Clone, Copy, Debug)]
pub struct VisitedItem<R> {
    pub cost: usize,
    pub from: Option<R>,
}

/// Back-pointer record kept per node while searching
#[derive(Clone, Copy, Debug)]
pub struct Visited<R>(Option<VisitedItem<R>>);

impl<R> Default for Visited<R> {
    fn default() -> Self {
        Visited(None)
    }
}
impl<R> Deref for Visited<R> {
    type Target = Option<VisitedItem<R>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<R> DerefMut for Visited<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Serialize, Deserialize)]
pub struct PathResult<R> {
    /// Every node from start to goal, both included
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    /// Number of moves, always `path.len() - 1`
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome<R> {
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> SearchOutcome<R> {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::PathFound(_))
    }

    pub fn path_result(&self) -> Option<&PathResult<R>> {
        match self {
            SearchOutcome::PathFound(result) => Some(result),
            SearchOutcome::NoPathFound => None,
        }
    }

    pub fn total_cost(&self) -> Option<usize> {
        self.path_result().map(|r| r.total_cost)
    }
}

/// Uniform-cost search from `start` to `goal`.
///
/// Nodes are expanded in order of accumulated cost, and among equal costs in
/// the order they were pushed, so on a map with unit moves this visits nodes
/// exactly like a breadth-first search and the result is deterministic. Each
/// node is expanded at most once and remembers where it was reached from; the
/// path is rebuilt from those back-pointers once the goal is popped.
///
/// Endpoints that are outside the map or not traversable give
/// [`SearchOutcome::NoPathFound`].
pub fn solve<M: MapTrait>(
    map: &M,
    start: M::Reference,
    goal: M::Reference,
) -> SearchOutcome<M::Reference> {
    if !map.is_traversable(start) || !map.is_traversable(goal) {
        warn!("cannot search from {:?} to {:?}: endpoint is blocked", start, goal);
        return SearchOutcome::NoPathFound;
    }

    // to keep track of where we have been
    let mut visited: M::Storage<Visited<M::Reference>> = map.create_storage();

    let mut sequence = 0;
    let mut visit_list = BinaryHeap::from([ToVisit {
        cost: 0,
        sequence,
        point: start,
        from: None,
    }]);

    while let Some(visit) = visit_list.pop() {
        if visited.get(visit.point).is_some() {
            continue;
        }

        *visited.get_mut(visit.point) = Visited(Some(VisitedItem {
            cost: visit.cost,
            from: visit.from,
        }));

        if visit.point == goal {
            debug!("reached goal {:?}: cost={}", goal, visit.cost);

            return SearchOutcome::PathFound(PathResult {
                path: backtrack(&visited, goal),
                start,
                goal,
                total_cost: visit.cost,
            });
        }

        for point in map.neighbors_of(visit.point) {
            if visited.get(point).is_none() {
                sequence += 1;
                visit_list.push(ToVisit {
                    cost: visit.cost + 1,
                    sequence,
                    point,
                    from: Some(visit.point),
                });
            }
        }
    }

    debug!("no path from {:?} to {:?}", start, goal);
    SearchOutcome::NoPathFound
}

/// Follow the back-pointers from `goal` until the node without a predecessor
fn backtrack<R, S>(visited: &S, goal: R) -> Vec<R>
where
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
{
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(VisitedItem {
        from: Some(from), ..
    }) = *visited.get(current)
    {
        path.push(from);
        current = from;
    }

    path.reverse();
    path
}
