use std::time::Duration;

use super::helpers::{info, spawn_scheduler, FakeBrowser, RecordingView, RenderCall};

const WAIT: Duration = Duration::from_secs(5);
const SETTLE: Duration = Duration::from_millis(200);

#[test]
fn completed_result_rendered_once() {
    let (client, queries) = FakeBrowser::new();
    let (view, renders) = RecordingView::new();
    client.script("/data", vec![Ok(info(1234, 987_654, false))]);
    let node = view.node(1);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit("/data", node);

    let query = queries.recv_timeout(WAIT).unwrap();
    assert_eq!(query.path, "/data");
    assert_eq!(query.timeout_ms, 1000);

    assert_eq!(
        renders.recv_timeout(WAIT).unwrap(),
        RenderCall {
            node,
            total_size: 987_654,
            file_count: 1234,
            provisional: false,
        }
    );
    assert!(renders.recv_timeout(SETTLE).is_err());
}

#[test]
fn truncated_result_rendered_provisionally_then_retried_with_bigger_budget() {
    let (client, queries) = FakeBrowser::new();
    let (view, renders) = RecordingView::new();
    client.script(
        "/x",
        vec![Ok(info(10, 100, true)), Ok(info(25, 400, false))],
    );
    let node = view.node(1);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit("/x", node);

    assert_eq!(queries.recv_timeout(WAIT).unwrap().timeout_ms, 1000);

    let first = renders.recv_timeout(WAIT).unwrap();
    assert!(first.provisional);
    assert_eq!(first.total_size, 100);

    // Reinserted attempt runs with 1000 + 2000.
    assert_eq!(queries.recv_timeout(WAIT).unwrap().timeout_ms, 3000);

    let second = renders.recv_timeout(WAIT).unwrap();
    assert!(!second.provisional);
    assert_eq!(second.total_size, 400);
    assert_eq!(second.file_count, 25);
}

#[test]
fn escalation_caps_at_max_timeout() {
    let (client, queries) = FakeBrowser::new();
    let (view, _renders) = RecordingView::new();
    client.script(
        "/deep/tree",
        vec![
            Ok(info(1, 10, true)),
            Ok(info(2, 20, true)),
            Ok(info(3, 30, true)),
        ],
    );
    let node = view.node(1);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit_with_timeout("/deep/tree", node, 4000);

    // 4000 + 2000 would exceed the 5000 cap, so the budget pins there and
    // stays pinned. The fourth attempt is unscripted, which ends the chain
    // like a transport failure would.
    let budgets: Vec<u64> = (0..4)
        .map(|_| queries.recv_timeout(WAIT).unwrap().timeout_ms)
        .collect();
    assert_eq!(budgets, vec![4000, 5000, 5000, 5000]);
    assert!(queries.recv_timeout(SETTLE).is_err());
}

#[test]
fn submitted_budget_above_max_is_clamped() {
    let (client, queries) = FakeBrowser::new();
    let (view, _renders) = RecordingView::new();
    client.script("/big", vec![Ok(info(1, 1, false))]);
    let node = view.node(1);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit_with_timeout("/big", node, 60_000);

    assert_eq!(queries.recv_timeout(WAIT).unwrap().timeout_ms, 5000);
}

#[test]
fn stale_target_dropped_without_remote_call() {
    let (client, queries) = FakeBrowser::new();
    let (view, renders) = RecordingView::new();
    client.script("/live", vec![Ok(info(5, 50, false))]);
    let gone = view.node(1);
    view.invalidate(gone);
    let live = view.node(2);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit("/gone", gone);
    scheduler.submit("/live", live);

    // "/gone" is dequeued first (FIFO among equals) and must vanish without
    // a query; the first observed call is for "/live".
    assert_eq!(queries.recv_timeout(WAIT).unwrap().path, "/live");
    assert_eq!(renders.recv_timeout(WAIT).unwrap().node, live);
    assert!(renders.recv_timeout(SETTLE).is_err());
    assert!(queries.recv_timeout(SETTLE).is_err());
}

#[test]
fn target_invalidated_mid_flight_not_rendered() {
    let (client, queries) = FakeBrowser::new();
    let (view, renders) = RecordingView::new();
    let gate = client.gate("/mid");
    client.script("/mid", vec![Ok(info(7, 70, false))]);
    let node = view.node(1);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit("/mid", node);

    // The node passed the dequeue-time check, but disappears while the
    // remote call is held in flight; the delivery-time re-check must
    // swallow the result.
    assert_eq!(queries.recv_timeout(WAIT).unwrap().path, "/mid");
    view.invalidate(node);
    gate.send(()).unwrap();

    assert!(renders.recv_timeout(SETTLE).is_err());
}

#[test]
fn disabled_scheduler_drops_without_querying() {
    let (client, queries) = FakeBrowser::new();
    let (view, renders) = RecordingView::new();
    client.script("/y", vec![Ok(info(5, 50, false))]);
    let node = view.node(1);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.set_enabled(false);
    scheduler.submit("/y", node);

    assert!(queries.recv_timeout(SETTLE).is_err());
    assert!(renders.recv_timeout(SETTLE).is_err());
}

#[test]
fn clear_abandons_queued_but_spares_in_flight() {
    let (client, queries) = FakeBrowser::new();
    let (view, renders) = RecordingView::new();
    let gate = client.gate("/slow");
    client.script("/slow", vec![Ok(info(3, 30, false))]);
    client.script("/queued/a", vec![Ok(info(1, 1, false))]);
    client.script("/queued/b", vec![Ok(info(2, 2, false))]);
    let slow = view.node(1);
    let qa = view.node(2);
    let qb = view.node(3);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit("/slow", slow);

    // Wait until "/slow" is held in flight, then queue more and clear.
    assert_eq!(queries.recv_timeout(WAIT).unwrap().path, "/slow");
    scheduler.submit("/queued/a", qa);
    scheduler.submit("/queued/b", qb);
    scheduler.clear();
    gate.send(()).unwrap();

    // The in-flight call completes and delivers normally.
    assert_eq!(renders.recv_timeout(WAIT).unwrap().node, slow);

    // The cleared requests are never serviced.
    assert!(queries.recv_timeout(SETTLE).is_err());
    assert!(renders.recv_timeout(SETTLE).is_err());
}

#[test]
fn deeper_requests_serviced_first_while_worker_busy() {
    let (client, queries) = FakeBrowser::new();
    let (view, _renders) = RecordingView::new();
    let gate = client.gate("/hold");
    client.script("/hold", vec![Ok(info(1, 1, false))]);
    client.script("/a", vec![Ok(info(1, 1, false))]);
    client.script("/a/b", vec![Ok(info(1, 1, false))]);
    let hold = view.node(1);
    let a = view.node(2);
    let ab = view.node(3);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit("/hold", hold);
    assert_eq!(queries.recv_timeout(WAIT).unwrap().path, "/hold");

    // Shallow submitted before deep; the deep one still wins the queue.
    scheduler.submit("/a", a);
    scheduler.submit("/a/b", ab);
    gate.send(()).unwrap();

    assert_eq!(queries.recv_timeout(WAIT).unwrap().path, "/a/b");
    assert_eq!(queries.recv_timeout(WAIT).unwrap().path, "/a");
}

#[test]
fn at_most_one_remote_call_in_flight() {
    let (client, _queries) = FakeBrowser::new();
    let (view, renders) = RecordingView::new();
    let paths: Vec<String> = (0..8).map(|i| format!("/dir{i}")).collect();
    for (i, path) in paths.iter().enumerate() {
        client.script(path, vec![Ok(info(i as u64, 10 * i as u64, false))]);
    }
    let nodes: Vec<_> = (0..8).map(|i| view.node(i as u64 + 1)).collect();

    let scheduler = spawn_scheduler(&client, &view);
    for (path, node) in paths.iter().zip(&nodes) {
        scheduler.submit(path, *node);
    }

    for _ in 0..8 {
        renders.recv_timeout(WAIT).unwrap();
    }
    assert_eq!(client.max_in_flight(), 1);
}

#[test]
fn drop_joins_worker_and_stops_servicing() {
    let (client, queries) = FakeBrowser::new();
    let (view, _renders) = RecordingView::new();
    client.script("/a", vec![Ok(info(1, 1, false))]);
    let node = view.node(1);

    let scheduler = spawn_scheduler(&client, &view);
    scheduler.submit("/a", node);
    queries.recv_timeout(WAIT).unwrap();
    drop(scheduler);

    assert!(queries.recv_timeout(SETTLE).is_err());
}
