use relay_traffic_graph::traffic::{GraphOp, Placement, TrafficSession};

fn feed(session: &mut TrafficSession, frames: &[&str]) -> Vec<GraphOp> {
	let mut ops = Vec::new();
	for frame in frames {
		session.on_message(frame, &mut ops);
	}
	ops
}

fn ticks(session: &mut TrafficSession, n: usize) -> Vec<GraphOp> {
	let mut ops = Vec::new();
	for _ in 0..n {
		session.tick(&mut ops);
	}
	ops
}

#[test]
fn reciprocal_traffic_makes_two_edges() {
	let mut session = TrafficSession::default();
	let ops = feed(&mut session, &[r#"[0,"A","B",100]"#, r#"[0,"B","A",101]"#]);

	let edges: Vec<_> = ops
		.iter()
		.filter_map(|op| match op {
			GraphOp::AddEdge { id, .. } => Some(id.as_str()),
			_ => None,
		})
		.collect();
	assert_eq!(edges, ["A->B", "B->A"]);

	for id in ["A", "B"] {
		let node = session.registry().get(id).unwrap();
		assert_eq!((node.rx, node.tx, node.idle_ticks), (1, 1, 0));
	}
}

#[test]
fn silent_node_survives_ten_ticks_and_goes_on_the_eleventh() {
	let mut session = TrafficSession::default();
	feed(&mut session, &[r#"["20","US","A",1]"#]);
	// first tick absorbs the activity
	assert!(ticks(&mut session, 1).is_empty());

	assert!(ticks(&mut session, 10).is_empty());
	assert!(session.registry().contains("A"));
	assert_eq!(session.registry().get("A").unwrap().idle_ticks, 10);

	let ops = ticks(&mut session, 1);
	assert!(!session.registry().contains("A"));
	assert!(ops.contains(&GraphOp::RemoveNode { id: "A".into() }));
	assert!(ops.contains(&GraphOp::RemoveEdge { id: "US->A".into() }));
	assert!(session.edges().is_empty());
}

#[test]
fn steady_traffic_keeps_a_node_alive() {
	let mut session = TrafficSession::new(2, Placement::default());
	for ts in 0..20 {
		feed(&mut session, &[format!(r#"[11,"US","A",{ts}]"#).as_str()]);
		assert!(session.tick(&mut Vec::<GraphOp>::new()).evicted.is_empty());
	}
	assert_eq!(session.registry().len(), 2);
}

#[test]
fn garbage_never_reaches_the_graph() {
	let mut session = TrafficSession::default();
	let ops = feed(
		&mut session,
		&["not json", "", "[]", r#"[1,"A"]"#, r#"["x","A","B",1]"#, "null"],
	);
	assert!(ops.is_empty());
	assert!(session.registry().is_empty());
	assert!(session.edges().is_empty());
}

#[test]
fn registry_and_edges_mirror_the_emitted_ops() {
	let mut session = TrafficSession::new(1, Placement::default());
	let mut ops = feed(
		&mut session,
		&[
			r#"[1,"US","A",1]"#,
			r#"[1,"A","US",2]"#,
			r#"[2,"US","B",3]"#,
			r#"[3,"C","B",4]"#,
		],
	);
	ops.extend(ticks(&mut session, 1));
	ops.extend(feed(&mut session, &[r#"[1,"US","A",5]"#]));
	ops.extend(ticks(&mut session, 2));

	let mut nodes = std::collections::BTreeSet::new();
	let mut edges = std::collections::BTreeSet::new();
	for op in &ops {
		match op {
			GraphOp::AddNode { id, .. } => assert!(nodes.insert(id.clone())),
			GraphOp::RemoveNode { id } => assert!(nodes.remove(id)),
			GraphOp::AddEdge { id, source, target } => {
				assert!(nodes.contains(source) && nodes.contains(target));
				assert!(edges.insert(id.clone()));
			}
			GraphOp::RemoveEdge { id } => assert!(edges.remove(id)),
		}
	}

	let live: std::collections::BTreeSet<_> =
		session.registry().ids().map(str::to_owned).collect();
	assert_eq!(nodes, live);
	let tracked: std::collections::BTreeSet<_> = session.edges().iter().map(|k| k.id()).collect();
	assert_eq!(edges, tracked);
}

#[test]
fn arrowed_router_ids_keep_separate_edge_ids() {
	let mut session = TrafficSession::default();
	let ops = feed(&mut session, &[r#"[0,"A->B","C",1]"#, r#"[0,"A","B->C",2]"#]);
	let ids: std::collections::BTreeSet<_> = ops
		.iter()
		.filter_map(|op| match op {
			GraphOp::AddEdge { id, .. } => Some(id.clone()),
			_ => None,
		})
		.collect();
	assert_eq!(ids.len(), 2);
	assert_eq!(session.edges().len(), 2);
}
