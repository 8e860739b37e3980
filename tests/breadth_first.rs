use graphless::{Bfs, Error, Strategy};

fn diamond(v: &u32) -> Vec<u32> {
    match v {
        0 => vec![1, 2],
        1 | 2 => vec![3],
        _ => vec![],
    }
}

#[test]
fn diamond_order_and_depths() {
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    t.start_from(0);
    let mut reported = Vec::new();
    while let Some(v) = t.next_reported() {
        reported.push((v.unwrap(), t.state.depth));
    }
    assert_eq!(reported, vec![(1, 1), (2, 1), (3, 2)]);
    // after exhaustion, the maximum reached depth remains visible
    assert_eq!(t.state.depth, 2);
}

#[test]
fn first_found_path_wins() {
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    t.build_paths(true).start_from(0).for_each(drop);
    let paths = t.state.paths.as_ref().unwrap();
    let path: Vec<u32> = paths.iter_vertices_from_start(&3).unwrap().collect();
    // 1 is emitted before 2 by the successor function, so the path over 1
    // is recorded first and kept
    assert_eq!(path, vec![0, 1, 3]);
    assert_eq!(paths.predecessor(&3).unwrap(), Some(&1));
    assert_eq!(paths.predecessor(&0).unwrap(), None);
}

#[test]
fn start_vertices_are_not_reported() {
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    let reported: Vec<u32> = t
        .start_from_vertices([0, 1])
        .map(Result::unwrap)
        .collect();
    assert!(!reported.contains(&0));
    assert!(!reported.contains(&1));
    assert_eq!(reported, vec![2, 3]);
}

#[test]
fn empty_start_set_yields_nothing() {
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    assert_eq!(t.start_from_vertices([]).count(), 0);
}

#[test]
fn visited_contains_reachable_vertices() {
    use graphless::gear::collections::VertexIdSet;

    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    t.start_from(0).for_each(drop);
    for v in 0..4 {
        assert!(t.state.visited.is_visited(&v));
    }
    assert!(!t.state.visited.is_visited(&4));
}

#[test]
fn already_visited_blocks_vertices() {
    use graphless::gear::collections::VertexIdSet;

    let mut blocked = hashbrown::HashSet::new();
    blocked.visit(1u32);
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    let reported: Vec<u32> = t
        .already_visited(blocked)
        .start_from(0)
        .map(Result::unwrap)
        .collect();
    // 1 is never entered; 3 is still reached over 2
    assert_eq!(reported, vec![2, 3]);
}

#[test]
fn calculation_limit_is_counted_per_expansion() {
    let mut t = Bfs::new(|v: &u32, _| vec![v + 1]);
    t.calculation_limit(3).start_from(0);
    assert_eq!(t.next(), Some(Ok(1)));
    assert_eq!(t.next(), Some(Ok(2)));
    assert_eq!(t.next(), Some(Ok(3)));
    assert_eq!(t.next(), Some(Err(Error::CalculationLimitExceeded)));
    assert_eq!(t.next(), None);
}

#[test]
fn go_to_and_not_found() {
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    assert_eq!(t.start_from(0).go_to(&3), Ok(3));
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    assert_eq!(t.start_from(0).go_to(&99), Err(Error::VertexNotFound));
}

#[test]
fn go_for_vertices_in_stops_after_last_hit() {
    let mut t = Bfs::new(|v: &u32, _| vec![v + 1]);
    t.start_from(0);
    let found: Vec<u32> = t
        .go_for_vertices_in(&[2, 4])
        .map(Result::unwrap)
        .collect();
    assert_eq!(found, vec![2, 4]);
    // the stream continues after the helper is done
    assert_eq!(t.next(), Some(Ok(5)));
}

#[test]
fn go_for_vertices_in_reports_missing_vertices() {
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    t.start_from(0);
    let results: Vec<Result<u32, Error>> = t.go_for_vertices_in(&[2, 77]).collect();
    assert_eq!(results, vec![Ok(2), Err(Error::VertexNotFound)]);
}

#[test]
fn go_for_depth_range_drops_head_and_tail() {
    // a chain with two vertices per depth level
    let mut t = Bfs::new(|v: &u32, _| if *v < 20 { vec![v + 2] } else { vec![] });
    t.start_from_vertices([0, 1]);
    let mid: Vec<u32> = t
        .go_for_depth_range(2, 4)
        .map(Result::unwrap)
        .collect();
    assert_eq!(mid, vec![4, 5, 6, 7]);
}

#[test]
fn labeled_edges_build_labeled_paths() {
    let mut t = Bfs::new(|v: &u32, _| match v {
        0 => vec![(1, "a"), (2, "b")],
        1 => vec![(3, "c")],
        _ => vec![],
    });
    t.build_paths(true).start_from(0).for_each(drop);
    let paths = t.state.paths.as_ref().unwrap();
    let labeled: Vec<(u32, u32, &str)> = paths.iter_labeled_edges_from_start(&3).unwrap().collect();
    assert_eq!(labeled, vec![(0, 1, "a"), (1, 3, "c")]);
}

#[test]
fn unlabeled_paths_refuse_labeled_queries() {
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    t.build_paths(true).start_from(0).for_each(drop);
    let paths = t.state.paths.as_ref().unwrap();
    assert!(matches!(
        paths.iter_labeled_edges_from_start(&3),
        Err(Error::NoLabels)
    ));
}

#[test]
fn is_tree_skips_visited_bookkeeping() {
    use graphless::gear::collections::VertexIdSet;

    // a binary tree; every vertex is reachable exactly once
    let mut t = Bfs::new(|v: &u32, _| {
        if *v < 4 {
            vec![2 * v + 1, 2 * v + 2]
        } else {
            vec![]
        }
    });
    t.is_tree(true);
    let reported: Vec<u32> = t.start_from(0).map(Result::unwrap).collect();
    assert_eq!(reported, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(!t.state.visited.is_visited(&1));
}

#[test]
fn successor_function_observes_the_expansion_depth() {
    let mut seen = Vec::new();
    {
        let mut t = Bfs::new(|v: &u32, state: &graphless::BfsState<u32, (), _, _>| {
            seen.push((*v, state.depth));
            diamond(v)
        });
        t.start_from(0).for_each(drop);
    }
    assert_eq!(seen, vec![(0, 0), (1, 1), (2, 1), (3, 2)]);
}

#[test]
#[should_panic(expected = "not started")]
fn iterating_before_start_panics() {
    let mut t = Bfs::new(|v: &u32, _| diamond(v));
    let _ = t.next();
}

#[test]
fn gear_variants_agree() {
    use graphless::gear::{IntIdBoolGear, IntIdGear};
    use graphless::vertex_as_id;

    let with_bits = {
        let mut t = Bfs::with_gear(
            vertex_as_id,
            IntIdGear::<f64>::new().extend_size(2),
            |v: &usize, _| diamond(&(*v as u32)).into_iter().map(|n| n as usize).collect::<Vec<_>>(),
        );
        t.start_from(0).map(Result::unwrap).collect::<Vec<_>>()
    };
    let with_bools = {
        let mut t = Bfs::with_gear(
            vertex_as_id,
            IntIdBoolGear::<f64>::new(),
            |v: &usize, _| diamond(&(*v as u32)).into_iter().map(|n| n as usize).collect::<Vec<_>>(),
        );
        t.start_from(0).map(Result::unwrap).collect::<Vec<_>>()
    };
    assert_eq!(with_bits, vec![1, 2, 3]);
    assert_eq!(with_bits, with_bools);
}
