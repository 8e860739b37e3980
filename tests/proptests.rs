//! Property tests over random finite graphs.

use std::collections::VecDeque;

use itertools::Itertools;
use quickcheck::quickcheck;

use graphless::{Bfs, Dfs, DfsEvent, Dijkstra, MinSpanningTree, Strategy, TopologicalSort};

const N: usize = 12;

/// Normalise an arbitrary edge list into an adjacency list over the
/// vertices `0..N`.
fn adjacency(edges: &[(u8, u8)]) -> Vec<Vec<usize>> {
    let mut adj = vec![Vec::new(); N];
    for &(a, b) in edges {
        adj[a as usize % N].push(b as usize % N);
    }
    adj
}

/// Unweighted shortest path depths by a plain reference BFS.
fn reference_depths(adj: &[Vec<usize>], start: usize) -> Vec<Option<usize>> {
    let mut depths = vec![None; N];
    depths[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        for &v in &adj[u] {
            if depths[v].is_none() {
                depths[v] = Some(depths[u].unwrap() + 1);
                queue.push_back(v);
            }
        }
    }
    depths
}

quickcheck! {
    fn bfs_reports_each_reachable_vertex_at_its_depth(edges: Vec<(u8, u8)>, start: u8) -> bool {
        let adj = adjacency(&edges);
        let start = start as usize % N;
        let expected = reference_depths(&adj, start);

        let mut t = Bfs::new(|v: &usize, _| adj[*v].clone());
        t.start_from(start);
        let mut seen = vec![false; N];
        seen[start] = true;
        while let Some(v) = t.next_reported() {
            let v = v.unwrap();
            if seen[v] {
                return false; // reported twice
            }
            seen[v] = true;
            if expected[v] != Some(t.state.depth) {
                return false;
            }
        }
        // reported exactly the reachable vertices (except the start)
        (0..N).all(|v| {
            if v == start {
                seen[v]
            } else {
                seen[v] == expected[v].is_some()
            }
        })
    }

    fn bfs_paths_round_trip(edges: Vec<(u8, u8)>, start: u8) -> bool {
        let adj = adjacency(&edges);
        let start = start as usize % N;
        let mut t = Bfs::new(|v: &usize, _| adj[*v].clone());
        t.build_paths(true);
        let reported: Vec<usize> = t.start_from(start).map(Result::unwrap).collect();
        let paths = t.state.paths.as_ref().unwrap();
        reported.iter().all(|v| {
            let forth: Vec<usize> = paths.iter_vertices_from_start(v).unwrap().collect();
            let mut back: Vec<usize> = paths.iter_vertices_to_start(v).unwrap().collect();
            back.reverse();
            let edges_count = paths.iter_edges_from_start(v).unwrap().count();
            forth == back
                && edges_count == forth.len() - 1
                && forth.first() == Some(&start)
                && forth.last() == Some(v)
        })
    }

    fn dfs_brackets_are_balanced(edges: Vec<(u8, u8)>, start: u8) -> bool {
        let adj = adjacency(&edges);
        let start = start as usize % N;
        let mut t = Dfs::new(|v: &usize, _| adj[*v].clone());
        t.report(DfsEvent::IN_OUT);
        t.start_from(start);
        let mut stack = Vec::new();
        while let Some(v) = t.next_reported() {
            let v = v.unwrap();
            if DfsEvent::ENTERING.contains(t.state.event) {
                stack.push(v);
            } else if stack.pop() != Some(v) {
                return false;
            }
        }
        stack.is_empty()
    }

    fn dfs_classifies_every_edge(edges: Vec<(u8, u8)>, start: u8) -> bool {
        let adj = adjacency(&edges);
        let start = start as usize % N;
        let mut t = Dfs::new(|v: &usize, _| adj[*v].clone());
        t.report(DfsEvent::EDGES | DfsEvent::ENTERING_START);
        t.start_from(start);
        let mut tree_edges = 0usize;
        let mut non_tree = 0usize;
        let mut entered = 0usize;
        while let Some(v) = t.next_reported() {
            v.unwrap();
            match t.state.event {
                DfsEvent::ENTERING_START => entered += 1,
                DfsEvent::ENTERING_SUCCESSOR => {
                    entered += 1;
                    tree_edges += 1;
                }
                DfsEvent::BACK_EDGE | DfsEvent::FORWARD_EDGE | DfsEvent::CROSS_EDGE => {
                    non_tree += 1;
                }
                _ => return false,
            }
        }
        // every edge leaving an entered vertex is either followed (tree)
        // or classified as a non-tree edge
        let mut seen = vec![false; N];
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        let mut out_edges = 0usize;
        while let Some(u) = queue.pop_front() {
            out_edges += adj[u].len();
            for &v in &adj[u] {
                if !seen[v] {
                    seen[v] = true;
                    queue.push_back(v);
                }
            }
        }
        tree_edges + non_tree == out_edges && tree_edges == entered - 1
    }

    fn dijkstra_distances_are_minimal(edges: Vec<(u8, u8, u8)>, start: u8) -> bool {
        // weighted adjacency with weights 1..=8
        let mut adj = vec![Vec::new(); N];
        for &(a, b, w) in &edges {
            adj[a as usize % N].push((b as usize % N, (w as u64 % 8) + 1));
        }
        let start = start as usize % N;

        // Bellman-Ford as an independent reference
        let mut dist: Vec<Option<u64>> = vec![None; N];
        dist[start] = Some(0);
        for _ in 0..N {
            for u in 0..N {
                if let Some(du) = dist[u] {
                    for &(v, w) in &adj[u] {
                        if dist[v].map_or(true, |dv| du + w < dv) {
                            dist[v] = Some(du + w);
                        }
                    }
                }
            }
        }

        let mut t = Dijkstra::new(|v: &usize, _| adj[*v].clone());
        t.build_paths(true).keep_distances(true);
        t.start_from(start);
        let mut previous = 0u64;
        let mut reported = vec![false; N];
        while let Some(v) = t.next_reported() {
            let v = v.unwrap();
            if t.state.distance < previous || reported[v] {
                return false; // not in distance order, or repeated
            }
            previous = t.state.distance;
            reported[v] = true;
            if dist[v] != Some(t.state.distance) {
                return false;
            }
            // the stored path has exactly the reported weight
            let path: Vec<usize> = t
                .state
                .paths
                .as_ref()
                .unwrap()
                .iter_vertices_from_start(&v)
                .unwrap()
                .collect();
            let weight: u64 = path
                .iter()
                .tuple_windows()
                .map(|(a, b)| {
                    adj[*a]
                        .iter()
                        .filter(|(n, _)| n == b)
                        .map(|(_, w)| *w)
                        .min()
                        .unwrap()
                })
                .sum();
            if weight != t.state.distance {
                return false;
            }
        }
        (0..N).all(|v| v == start || reported[v] == dist[v].is_some())
    }

    fn topological_order_is_valid_on_dags(edges: Vec<(u8, u8)>, start: u8) -> bool {
        // force acyclicity: edges always point from a larger to a smaller
        // vertex number
        let mut adj = vec![Vec::new(); N];
        for &(a, b) in &edges {
            let (a, b) = (a as usize % N, b as usize % N);
            if a > b {
                adj[a].push(b);
            } else if b > a {
                adj[b].push(a);
            }
        }
        let start = start as usize % N;
        let mut t = TopologicalSort::new(|v: &usize, _| adj[*v].clone());
        let order: Vec<usize> = t.start_from(start).map(Result::unwrap).collect();
        let position = |v: usize| order.iter().position(|x| *x == v);
        order.iter().all(|&u| {
            adj[u]
                .iter()
                .all(|&v| position(v).unwrap() < position(u).unwrap())
        })
    }

    fn topological_sort_surfaces_cycles(edges: Vec<(u8, u8)>, start: u8) -> bool {
        let adj = adjacency(&edges);
        let start = start as usize % N;
        let mut t = TopologicalSort::new(|v: &usize, _| adj[*v].clone());
        t.start_from(start);
        let mut outcome = Ok(());
        for item in t.by_ref() {
            if let Err(e) = item {
                outcome = Err(e);
            }
        }
        match outcome {
            Ok(()) => true,
            Err(graphless::Error::CycleDetected) => {
                // the surfaced trace is a real path that closes a cycle
                let cycle = &t.state.cycle_from_start;
                cycle.len() >= 2
                    && cycle.windows(2).all(|w| adj[w[0]].contains(&w[1]))
                    && cycle[..cycle.len() - 1].contains(cycle.last().unwrap())
            }
            Err(_) => false,
        }
    }

    fn mst_weight_matches_kruskal(edges: Vec<(u8, u8, u8)>, start: u8) -> bool {
        // undirected graph: register both directions
        let mut adj = vec![Vec::new(); N];
        let mut undirected = Vec::new();
        for &(a, b, w) in &edges {
            let (a, b) = (a as usize % N, b as usize % N);
            if a == b {
                continue;
            }
            let w = (w as u64 % 16) + 1;
            adj[a].push((b, w));
            adj[b].push((a, w));
            undirected.push((a, b, w));
        }
        let start = start as usize % N;

        let mut t = MinSpanningTree::new(|v: &usize, _| adj[*v].clone());
        t.start_from(start);
        let mut count = 0usize;
        let mut total = 0u64;
        while let Some(v) = t.next_reported() {
            v.unwrap();
            total += t.state.edge.as_ref().unwrap().weight;
            count += 1;
        }

        // Kruskal over the component of `start` as reference
        let reachable = {
            let mut seen = vec![false; N];
            seen[start] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                for &(v, _) in &adj[u] {
                    if !seen[v] {
                        seen[v] = true;
                        queue.push_back(v);
                    }
                }
            }
            seen
        };
        let mut parent: Vec<usize> = (0..N).collect();
        fn find(parent: &mut Vec<usize>, v: usize) -> usize {
            if parent[v] != v {
                let root = find(parent, parent[v]);
                parent[v] = root;
            }
            parent[v]
        }
        let mut kruskal_total = 0u64;
        let mut kruskal_count = 0usize;
        for &(a, b, w) in undirected.iter().sorted_by_key(|e| e.2) {
            if !reachable[a] {
                continue;
            }
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            if ra != rb {
                parent[ra] = rb;
                kruskal_total += w;
                kruskal_count += 1;
            }
        }

        count == kruskal_count
            && count == reachable.iter().filter(|r| **r).count() - 1
            && total == kruskal_total
    }
}
