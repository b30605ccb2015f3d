//! Cost-bounded path search over an abstract node graph.
//!
//! Uniform-cost search with a hard budget: a node whose cheapest known cost
//! exceeds `max_cost` is never expanded, so a reachable-but-too-expensive
//! target yields `None` rather than an over-budget path. Ties between
//! equal-cost paths break toward fewer steps, then discovery order.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

/// A found path: total cost plus the route from start to target, inclusive.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path<N> {
    pub cost: f64,
    pub route: Vec<N>,
}

impl<N: Copy> Path<N> {
    pub fn target(&self) -> N {
        *self.route.last().expect("a path has at least its start node")
    }
}

/// Step cost ordering; f64 is not Ord, total_cmp gives us a total order.
#[derive(Clone, Copy, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Searches from `start` for the cheapest node satisfying `found`.
///
/// `step_cost(from, to)` prices entering `to` from `from`; [`f64::MAX`] marks
/// the step impassable. The search never expands beyond `max_cost`.
pub fn find<N, FF, CF, NF, NI>(
    start: N,
    mut found: FF,
    mut step_cost: CF,
    max_cost: f64,
    mut neighbours: NF,
) -> Option<Path<N>>
where
    N: Copy + Eq + Ord,
    FF: FnMut(N) -> bool,
    CF: FnMut(N, N) -> f64,
    NF: FnMut(N) -> NI,
    NI: IntoIterator<Item = N>,
{
    if max_cost < 0.0 {
        return None;
    }

    let mut best: BTreeMap<N, f64> = BTreeMap::new();
    let mut parent: BTreeMap<N, N> = BTreeMap::new();
    let mut frontier = BinaryHeap::new();

    best.insert(start, 0.0);
    frontier.push(Reverse((Cost(0.0), 0u32, start)));

    while let Some(Reverse((Cost(cost), steps, node))) = frontier.pop() {
        if best.get(&node).copied().unwrap_or(f64::MAX) < cost {
            continue;
        }

        if found(node) {
            let mut route = vec![node];
            let mut current = node;
            while let Some(&prev) = parent.get(&current) {
                route.push(prev);
                current = prev;
            }
            route.reverse();
            return Some(Path { cost, route });
        }

        for next in neighbours(node) {
            let step = step_cost(node, next);
            if step >= f64::MAX {
                continue;
            }
            let next_cost = cost + step;
            if next_cost > max_cost {
                continue;
            }
            if next_cost < best.get(&next).copied().unwrap_or(f64::MAX) {
                best.insert(next, next_cost);
                parent.insert(next, node);
                frontier.push(Reverse((Cost(next_cost), steps + 1, next)));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nodes 0..=9 on a line; stepping to an even node costs 1, odd costs 2.
    fn line_neighbours(n: i32) -> Vec<i32> {
        [n - 1, n + 1].into_iter().filter(|m| (0..10).contains(m)).collect()
    }

    #[test]
    fn finds_cheapest_route() {
        let path = find(
            0,
            |n| n == 4,
            |_, to| if to % 2 == 0 { 1.0 } else { 2.0 },
            100.0,
            line_neighbours,
        )
        .expect("target reachable");
        assert_eq!(path.route, vec![0, 1, 2, 3, 4]);
        assert!((path.cost - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn budget_bounds_the_frontier() {
        // Reaching 4 costs 6; a budget of 5 must fail.
        assert!(find(0, |n| n == 4, |_, _| 1.5, 5.0, line_neighbours).is_none());
        assert!(find(0, |n| n == 4, |_, _| 1.0, 5.0, line_neighbours).is_some());
    }

    #[test]
    fn impassable_steps_block() {
        let blocked = 2;
        let result = find(
            0,
            |n| n == 4,
            |_, to| if to == blocked { f64::MAX } else { 1.0 },
            100.0,
            line_neighbours,
        );
        assert!(result.is_none());
    }

    #[test]
    fn start_can_be_the_target() {
        let path = find(3, |n| n == 3, |_, _| 1.0, 0.0, line_neighbours).expect("trivial path");
        assert_eq!(path.route, vec![3]);
        assert_eq!(path.cost, 0.0);
    }
}
