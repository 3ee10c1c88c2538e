use farmstead::{
    assets::SceneEvent,
    data_structures::scene_graph::{AlreadyInserted, SceneGraph},
    scene::{LoadTracker, apply},
};

#[test]
fn should_insert_keys_in_order() {
    let mut graph = SceneGraph::new();

    assert_eq!(graph.insert("cat", 1), Ok(1));
    assert_eq!(graph.insert("farmhouse", 2), Ok(2));

    assert_eq!(graph.len(), 2);
    assert_eq!(graph.keys().collect::<Vec<_>>(), vec!["cat", "farmhouse"]);
    assert_eq!(graph.get("farmhouse"), Some(&2));
}

#[test]
fn should_reject_a_key_inserted_twice() {
    let mut graph = SceneGraph::new();
    graph.insert("cat", 1).unwrap();

    let result = graph.insert("cat", 7);

    assert_eq!(result, Err(AlreadyInserted("cat".to_string())));
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.get("cat"), Some(&1));
}

#[test]
fn should_count_a_repeated_placement_as_failed() {
    let mut graph = SceneGraph::new();
    let mut loads = LoadTracker::default();
    loads.start(2);

    let first = apply(
        &mut graph,
        &mut loads,
        SceneEvent::Placed {
            name: "tractor".to_string(),
            node: "red",
        },
    );
    let second = apply(
        &mut graph,
        &mut loads,
        SceneEvent::Placed {
            name: "tractor".to_string(),
            node: "green",
        },
    );

    assert!(first);
    assert!(!second);
    assert_eq!(graph.get("tractor"), Some(&"red"));
    assert_eq!(loads.placed(), 1);
    assert_eq!(loads.failed(), 1);
}

#[test]
fn should_leave_graph_untouched_on_failure() {
    let mut graph: SceneGraph<u32> = SceneGraph::new();
    let mut loads = LoadTracker::default();
    loads.start(1);

    let grew = apply(
        &mut graph,
        &mut loads,
        SceneEvent::Failed {
            name: "bison".to_string(),
            error: anyhow::anyhow!("404"),
        },
    );

    assert!(!grew);
    assert!(graph.is_empty());
    assert!(!graph.contains("bison"));
    assert!(loads.is_settled());
}

#[test]
fn should_track_pending_loads() {
    let mut loads = LoadTracker::default();
    assert!(loads.is_settled());

    loads.start(3);
    assert_eq!(loads.requested(), 3);
    assert_eq!(loads.pending(), 3);

    loads.record_placed();
    loads.record_failed();
    assert_eq!(loads.pending(), 1);
    assert!(!loads.is_settled());

    loads.record_placed();
    assert!(loads.is_settled());
}

#[test]
fn should_map_placed_events_and_keep_failures() {
    let placed: SceneEvent<u32> = SceneEvent::Placed {
        name: "gym".to_string(),
        node: 2,
    };
    let failed: SceneEvent<u32> = SceneEvent::Failed {
        name: "club".to_string(),
        error: anyhow::anyhow!("bad file"),
    };

    let placed = placed.map(|n| n * 10);
    let failed = failed.map(|n| n * 10);

    assert!(matches!(placed, SceneEvent::Placed { node: 20, .. }));
    assert_eq!(failed.name(), "club");
    assert!(format!("{failed:?}").contains("bad file"));
}
