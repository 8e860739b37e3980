use graphless::{Dfs, DfsEvent, DfsMode, Error, Strategy};

/// 0 -> [1, 2, 3], 2 -> [1, 3], 1 -> [0]. Exploration pops the last
/// emitted successor first, so from 0 the order of subtrees is 3, 2, 1.
fn classified(v: &u32) -> Vec<u32> {
    match v {
        0 => vec![1, 2, 3],
        1 => vec![0],
        2 => vec![1, 3],
        _ => vec![],
    }
}

#[test]
fn enters_depth_first_in_stack_order() {
    let mut t = Dfs::new(|v: &u32, _| match v {
        0 => vec![1, 2],
        1 => vec![2],
        _ => vec![],
    });
    let entered: Vec<u32> = t.start_from(0).map(Result::unwrap).collect();
    assert_eq!(entered, vec![2, 1]);
}

#[test]
fn start_vertex_reported_with_entering_start() {
    let mut t = Dfs::new(|v: &u32, _| if *v == 0 { vec![1] } else { vec![] });
    t.report(DfsEvent::ENTERING);
    t.start_from(0);
    assert_eq!(t.next(), Some(Ok(0)));
    assert_eq!(t.state.event, DfsEvent::ENTERING_START);
    assert_eq!(t.next(), Some(Ok(1)));
    assert_eq!(t.state.event, DfsEvent::ENTERING_SUCCESSOR);
    assert_eq!(t.next(), None);
}

#[test]
fn entering_and_leaving_form_balanced_brackets() {
    let mut t = Dfs::new(|v: &u32, _| classified(v));
    t.report(DfsEvent::IN_OUT);
    t.start_from(0);
    let mut open: Vec<u32> = Vec::new();
    let mut events = Vec::new();
    while let Some(v) = t.next_reported() {
        let v = v.unwrap();
        events.push((t.state.event, v));
        if DfsEvent::ENTERING.contains(t.state.event) {
            open.push(v);
        } else {
            assert_eq!(open.pop(), Some(v));
        }
    }
    assert!(open.is_empty());
    // each of the four vertices is entered and left exactly once
    assert_eq!(events.len(), 8);
}

#[test]
fn edge_classification_is_complete() {
    let mut t = Dfs::new(|v: &u32, _| classified(v));
    t.report(DfsEvent::ALL).compute_index(true);
    t.start_from(0);
    let mut log = Vec::new();
    while let Some(v) = t.next_reported() {
        log.push((t.state.event, v.unwrap()));
    }
    assert_eq!(
        log,
        vec![
            (DfsEvent::ENTERING_START, 0),
            (DfsEvent::ENTERING_SUCCESSOR, 3),
            (DfsEvent::LEAVING_SUCCESSOR, 3),
            (DfsEvent::ENTERING_SUCCESSOR, 2),
            (DfsEvent::CROSS_EDGE, 3),
            (DfsEvent::ENTERING_SUCCESSOR, 1),
            (DfsEvent::BACK_EDGE, 0),
            (DfsEvent::LEAVING_SUCCESSOR, 1),
            (DfsEvent::LEAVING_SUCCESSOR, 2),
            (DfsEvent::FORWARD_EDGE, 1),
            (DfsEvent::LEAVING_START, 0),
        ]
    );
}

#[test]
fn non_tree_edges_as_group() {
    let mut t = Dfs::new(|v: &u32, _| classified(v));
    t.report(DfsEvent::SOME_NON_TREE_EDGE);
    t.start_from(0);
    let mut count = 0;
    while let Some(v) = t.next_reported() {
        v.unwrap();
        assert_eq!(t.state.event, DfsEvent::SOME_NON_TREE_EDGE);
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn index_numbers_vertices_in_pre_order() {
    use graphless::gear::collections::VertexIdMap;

    let mut t = Dfs::new(|v: &u32, _| classified(v));
    t.compute_index(true);
    t.start_from(0).for_each(drop);
    assert_eq!(t.state.index.get(&0), Some(&1));
    assert_eq!(t.state.index.get(&3), Some(&2));
    assert_eq!(t.state.index.get(&2), Some(&3));
    assert_eq!(t.state.index.get(&1), Some(&4));
}

#[test]
fn trace_shows_the_current_path() {
    let mut t = Dfs::new(|v: &u32, _| if *v < 3 { vec![v + 1] } else { vec![] });
    t.compute_trace(true);
    t.start_from(0);
    assert_eq!(t.next(), Some(Ok(1)));
    assert_eq!(t.state.trace, vec![0, 1]);
    assert_eq!(t.next(), Some(Ok(2)));
    assert_eq!(t.state.trace, vec![0, 1, 2]);
}

#[test]
fn trace_labels_follow_the_trace() {
    let mut t = Dfs::new(|v: &u32, _| {
        if *v < 2 {
            vec![(v + 1, format!("e{v}"))]
        } else {
            vec![]
        }
    });
    t.compute_trace(true);
    t.start_from(0);
    assert_eq!(t.next(), Some(Ok(1)));
    assert_eq!(t.state.trace_labels, vec!["e0".to_string()]);
    assert_eq!(t.next(), Some(Ok(2)));
    assert_eq!(t.state.trace_labels, vec!["e0".to_string(), "e1".to_string()]);
}

#[test]
fn skipping_start_is_reported() {
    let mut t = Dfs::new(|v: &u32, _| if *v == 0 { vec![1] } else { vec![] });
    t.report(DfsEvent::ENTERING_SUCCESSOR | DfsEvent::SKIPPING_START);
    t.start_from_vertices([0, 1]);
    assert_eq!(t.next(), Some(Ok(1)));
    assert_eq!(t.state.event, DfsEvent::ENTERING_SUCCESSOR);
    // 1 was already visited from 0, so it is skipped as a start
    assert_eq!(t.next(), Some(Ok(1)));
    assert_eq!(t.state.event, DfsEvent::SKIPPING_START);
    assert_eq!(t.next(), None);
}

#[test]
fn all_paths_mode_follows_visited_vertices_again() {
    // two paths lead to 2, and both continue to 3
    let mut t = Dfs::new(|v: &u32, _| match v {
        0 => vec![1, 2],
        1 => vec![2],
        2 => vec![3],
        _ => vec![],
    });
    t.mode(DfsMode::AllPaths);
    let entered: Vec<u32> = t.start_from(0).map(Result::unwrap).collect();
    // 2 and 3 are entered twice, once per simple path
    assert_eq!(entered, vec![2, 3, 1, 2, 3]);
}

#[test]
fn all_walks_mode_never_terminates_on_cycles() {
    let mut t = Dfs::new(|v: &u32, _| vec![(v + 1) % 3]);
    t.mode(DfsMode::AllWalks);
    t.start_from(0);
    let walk: Vec<u32> = t.by_ref().take(7).map(Result::unwrap).collect();
    assert_eq!(walk, vec![1, 2, 0, 1, 2, 0, 1]);
}

#[test]
fn skip_expanding_entered_vertex_acknowledges_and_backtracks() {
    let mut t = Dfs::new(|v: &u32, _| if *v < 10 { vec![v * 2 + 1, v * 2 + 2] } else { vec![] });
    t.start_from(0);
    // first entered vertex is 2 (stack order); skip its expansion
    assert_eq!(t.next(), Some(Ok(2)));
    t.skip_expanding_entered_vertex();
    assert_eq!(t.next(), Some(Ok(2))); // acknowledgement
    // 5 and 6 (children of 2) are never entered
    let rest: Vec<u32> = t.map(Result::unwrap).collect();
    assert!(!rest.contains(&5));
    assert!(!rest.contains(&6));
    assert!(rest.contains(&1));
}

#[test]
fn skip_also_works_in_the_trace_engine() {
    let mut t = Dfs::new(|v: &u32, _| if *v < 10 { vec![v * 2 + 1, v * 2 + 2] } else { vec![] });
    t.compute_trace(true);
    t.start_from(0);
    assert_eq!(t.next(), Some(Ok(2)));
    t.skip_expanding_entered_vertex();
    assert_eq!(t.next(), Some(Ok(2)));
    let rest: Vec<u32> = t.map(Result::unwrap).collect();
    assert!(!rest.contains(&5));
    assert!(!rest.contains(&6));
}

#[test]
#[should_panic(expected = "entering event")]
fn skip_outside_entering_event_panics() {
    let mut t = Dfs::new(|v: &u32, _| if *v == 0 { vec![1] } else { vec![] });
    t.start_from(0);
    t.skip_expanding_entered_vertex();
}

#[test]
fn depth_is_optional_and_tracked_on_request() {
    let mut t = Dfs::new(|v: &u32, _| if *v < 3 { vec![v + 1] } else { vec![] });
    t.start_from(0);
    assert_eq!(t.next(), Some(Ok(1)));
    assert_eq!(t.state.depth, None);

    let mut t = Dfs::new(|v: &u32, _| if *v < 3 { vec![v + 1] } else { vec![] });
    t.compute_depth(true);
    t.start_from(0);
    assert_eq!(t.next(), Some(Ok(1)));
    assert_eq!(t.state.depth, Some(1));
    assert_eq!(t.next(), Some(Ok(2)));
    assert_eq!(t.state.depth, Some(2));
}

#[test]
fn paths_are_built_along_the_dfs_tree() {
    let mut t = Dfs::new(|v: &u32, _| match v {
        0 => vec![1, 2],
        2 => vec![3],
        _ => vec![],
    });
    t.build_paths(true);
    t.start_from(0).for_each(drop);
    let paths = t.state.paths.as_ref().unwrap();
    let path: Vec<u32> = paths.iter_vertices_from_start(&3).unwrap().collect();
    assert_eq!(path, vec![0, 2, 3]);
}

#[test]
#[should_panic(expected = "AllWalks")]
fn paths_in_all_walks_mode_panic() {
    let mut t = Dfs::new(|v: &u32, _| vec![(v + 1) % 3]);
    t.mode(DfsMode::AllWalks).build_paths(true);
    t.start_from(0);
}

#[test]
#[should_panic(expected = "non-tree edge events")]
fn non_tree_events_for_trees_panic() {
    let mut t = Dfs::new(|v: &u32, _| if *v == 0 { vec![1] } else { vec![] });
    t.is_tree(true).report(DfsEvent::BACK_EDGE);
    t.start_from(0);
}

#[test]
#[should_panic(expected = "cannot be combined")]
fn group_and_member_events_panic() {
    let mut t = Dfs::new(|v: &u32, _| vec![*v]);
    t.report(DfsEvent::SOME_NON_TREE_EDGE | DfsEvent::BACK_EDGE);
    t.start_from(0);
}

#[test]
#[should_panic(expected = "AllPaths")]
fn forward_cross_in_all_paths_panics() {
    let mut t = Dfs::new(|v: &u32, _| vec![*v]);
    t.mode(DfsMode::AllPaths).report(DfsEvent::FORWARD_EDGE);
    t.start_from(0);
}

#[test]
#[should_panic(expected = "already_visited")]
fn index_with_already_visited_panics() {
    let mut t = Dfs::new(|v: &u32, _| vec![*v]);
    t.compute_index(true).already_visited(hashbrown::HashSet::new());
    t.start_from(0);
}
