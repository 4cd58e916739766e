use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
    hash::Hash,
};

use crate::{HashMap, HashSet};

/// Generate a shortest paths map on a grid according to a neighbors function.
pub fn dijkstra_map<'a, T, I>(
    mut neighbors: impl FnMut(&T) -> I + 'a,
    starts: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = (T, usize)> + 'a
where
    T: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = T>,
{
    let mut edge: VecDeque<(T, usize)> =
        starts.into_iter().map(|s| (s, 0)).collect();
    let mut seen = HashSet::default();

    std::iter::from_fn(move || {
        // Candidates are in a queue and consumed first-in, first-out. This
        // should guarantee that the first time a node is popped from the queue
        // it shows the shortest path length from start to that node.

        while let Some((node, len)) = edge.pop_front() {
            if !seen.contains(&node) {
                seen.insert(node.clone());
                for n in neighbors(&node) {
                    edge.push_back((n, len + 1));
                }
                return Some((node, len));
            }
        }
        None
    })
}

/// A* search with unit step cost.
///
/// Returns the path from `start` to `end` without the start node and with the
/// end node, an empty path if `start == end` and `None` if `end` can't be
/// reached.
///
/// Open nodes with equal f-scores are expanded in the order they were
/// discovered, so the result only depends on the order `neighbors` yields
/// nodes in.
pub fn astar_path<T, I>(
    start: &T,
    end: &T,
    mut neighbors: impl FnMut(&T) -> I,
    mut heuristic: impl FnMut(&T, &T) -> usize,
) -> Option<Vec<T>>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = T>,
{
    // Open list entries index into `nodes`, the index doubles as insertion
    // sequence number for tie-breaking.
    let mut nodes: Vec<(T, usize)> = vec![(start.clone(), 0)];
    let mut open = BinaryHeap::new();
    open.push(Reverse((heuristic(start, end), 0usize)));

    let mut best: HashMap<T, usize> = HashMap::default();
    best.insert(start.clone(), 0);
    let mut came_from: HashMap<T, T> = HashMap::default();

    while let Some(Reverse((_, idx))) = open.pop() {
        let (node, g) = nodes[idx].clone();

        // Stale entry, a shorter route to the node was found after it was
        // queued.
        if best.get(&node).is_some_and(|&b| b < g) {
            continue;
        }

        if &node == end {
            let mut path = vec![node];
            while let Some(prev) = came_from.get(path.last()?) {
                if prev == start {
                    break;
                }
                path.push(prev.clone());
            }
            path.reverse();
            if &path[0] == start {
                path.clear();
            }
            return Some(path);
        }

        for n in neighbors(&node) {
            let g2 = g + 1;
            if best.get(&n).is_some_and(|&b| b <= g2) {
                continue;
            }
            best.insert(n.clone(), g2);
            came_from.insert(n.clone(), node.clone());
            let f = g2 + heuristic(&n, end);
            nodes.push((n, g2));
            open.push(Reverse((f, nodes.len() - 1)));
        }
    }

    None
}
