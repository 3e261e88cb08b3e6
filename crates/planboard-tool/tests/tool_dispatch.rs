//! Wire-level tests of the tool surface: JSON in, JSON out, events observed
//! exactly in acceptance order.

use planboard_core::TaskSession;
use planboard_core::task::{TaskEvent, TaskStatus};
use planboard_core::view::TaskView;
use planboard_tool::TaskTool;
use serde_json::json;

#[tokio::test]
async fn dispatch_add_update_create_round_trip() {
    let session = TaskSession::new();
    let tool = TaskTool::for_session(&session);

    let added = tool
        .dispatch(json!({"action": "add", "description": "write tests"}))
        .await;
    assert_eq!(added["result"], "added");
    let root_id = added["id"].as_str().unwrap().to_string();

    let child = tool
        .dispatch(json!({
            "action": "add",
            "description": "unit tests",
            "parent_id": root_id,
        }))
        .await;
    assert_eq!(child["result"], "added");
    let child_id = child["id"].as_str().unwrap().to_string();

    let updated = tool
        .dispatch(json!({
            "action": "update_status",
            "id": child_id,
            "status": "done",
        }))
        .await;
    assert_eq!(updated["result"], "updated");
    assert_eq!(updated["status"], "done");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot[0].id, root_id);
    assert_eq!(snapshot[0].status, TaskStatus::NotStarted);
    assert_eq!(snapshot[1].id, child_id);
    assert_eq!(snapshot[1].status, TaskStatus::Done);

    let created = tool
        .dispatch(json!({
            "action": "create",
            "tasks": [
                {"description": "a"},
                {"description": "b", "parent": 0},
            ],
        }))
        .await;
    assert_eq!(created["result"], "created");
    assert_eq!(created["tasks"].as_array().unwrap().len(), 2);
    assert!(session.snapshot().await.iter().all(|t| t.id != root_id));
}

#[tokio::test]
async fn dispatch_classifies_failures_without_state_change() {
    let session = TaskSession::new();
    let tool = TaskTool::for_session(&session);
    tool.dispatch(json!({"action": "add", "description": "keep me"}))
        .await;
    let before = session.snapshot().await;

    let garbage = tool.dispatch(json!({"action": "launch_rocket"})).await;
    assert_eq!(garbage["result"], "error");
    assert_eq!(garbage["kind"], "malformed_input");

    let empty = tool
        .dispatch(json!({"action": "add", "description": ""}))
        .await;
    assert_eq!(empty["result"], "error");
    assert_eq!(empty["kind"], "empty_description");

    let missing = tool
        .dispatch(json!({
            "action": "update_status",
            "id": uuid::Uuid::new_v4().to_string(),
            "status": "done",
        }))
        .await;
    assert_eq!(missing["result"], "error");
    assert_eq!(missing["kind"], "not_found");

    let bad_parent = tool
        .dispatch(json!({
            "action": "create",
            "tasks": [
                {"description": "a"},
                {"description": "b", "parent": 5},
            ],
        }))
        .await;
    assert_eq!(bad_parent["result"], "error");
    assert_eq!(bad_parent["kind"], "invalid_parent");

    assert_eq!(session.snapshot().await, before);
}

#[tokio::test]
async fn subscriber_sees_one_event_per_accepted_call() {
    let session = TaskSession::new();
    let tool = TaskTool::for_session(&session);
    let mut rx = session.subscribe().await;

    tool.dispatch(json!({"action": "add", "description": "a"}))
        .await;
    // Rejected calls must not surface to observers.
    tool.dispatch(json!({"action": "add", "description": ""}))
        .await;
    tool.dispatch(json!({"action": "create", "tasks": [{"description": "b"}]}))
        .await;

    assert!(matches!(rx.try_recv().unwrap(), TaskEvent::Added { .. }));
    assert!(matches!(rx.try_recv().unwrap(), TaskEvent::Reset { .. }));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn view_folded_from_tool_events_matches_snapshot() {
    let session = TaskSession::new();
    let tool = TaskTool::for_session(&session);
    let mut rx = session.subscribe().await;
    let mut view = TaskView::new();

    let added = tool
        .dispatch(json!({"action": "add", "description": "plan"}))
        .await;
    let id = added["id"].as_str().unwrap();
    tool.dispatch(json!({"action": "add", "description": "step", "parent_id": id}))
        .await;
    tool.dispatch(json!({"action": "update_status", "id": id, "status": "in_progress"}))
        .await;

    while let Ok(event) = rx.try_recv() {
        view.apply(event);
    }

    let projected: Vec<_> = view
        .tasks()
        .into_iter()
        .map(|t| (t.id, t.status, t.parent_id))
        .collect();
    let authoritative: Vec<_> = session
        .snapshot()
        .await
        .into_iter()
        .map(|t| (t.id, t.status, t.parent_id))
        .collect();
    assert_eq!(projected, authoritative);
}
