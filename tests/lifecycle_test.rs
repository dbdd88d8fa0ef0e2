mod helpers;

use helpers::{backdate_session, fill_session, test_manager, thought};
use thoughtlog::error::SessionError;

#[tokio::test]
async fn rename_moves_all_thoughts() {
    let (_tmp, manager) = test_manager();
    fill_session(&manager, "TEMP:1:abc", 5).await;

    let outcome = manager
        .rename_session("TEMP:1:abc", "thesis:NVDA:ai_dominance")
        .await
        .unwrap();
    assert_eq!(outcome.thought_count, 5);

    let view = manager
        .view_session("thesis:NVDA:ai_dominance", None, None)
        .await
        .unwrap();
    assert_eq!(view.total_thoughts, 5);

    let err = manager.delete_session("TEMP:1:abc").await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound { .. }));
    let err = manager
        .rename_session("TEMP:1:abc", "other:name:here")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound { .. }));
}

#[tokio::test]
async fn temp_session_can_be_adopted() {
    let (_tmp, manager) = test_manager();
    let outcome = manager
        .append_thought(thoughtlog::session::AppendThought {
            reasoning: "unsorted idea".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    manager
        .rename_session(&outcome.session_name, "ideas:misc:one")
        .await
        .unwrap();
    let info = manager.get_session_info("ideas:misc:one").await.unwrap();
    assert_eq!(info.thought_count, 1);
}

#[tokio::test]
async fn read_of_missing_session_is_empty_but_delete_fails() {
    let (_tmp, manager) = test_manager();

    let view = manager.view_session("a:b:c", None, None).await.unwrap();
    assert_eq!(view.total_thoughts, 0);
    assert!(!view.has_more);

    let err = manager.delete_session("a:b:c").await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound { .. }));
}

#[tokio::test]
async fn delete_removes_session() {
    let (_tmp, manager) = test_manager();
    manager.append_thought(thought("a:b:c", "x")).await.unwrap();

    manager.delete_session("a:b:c").await.unwrap();
    let info = manager.get_session_info("a:b:c").await.unwrap();
    assert!(!info.exists);
    assert_eq!(manager.list_sessions(10, 0).await.unwrap().total, 0);
}

#[tokio::test]
async fn list_sessions_most_recent_first() {
    let (_tmp, manager) = test_manager();
    fill_session(&manager, "old:sess:a", 2).await;
    fill_session(&manager, "new:sess:b", 1).await;
    backdate_session(&manager, "old:sess:a", 3);

    let list = manager.list_sessions(10, 0).await.unwrap();
    assert_eq!(list.total, 2);
    assert_eq!(list.sessions[0].session_name, "new:sess:b");
    assert_eq!(list.sessions[1].session_name, "old:sess:a");
    assert_eq!(list.sessions[1].thought_count, 2);
    assert!(list.sessions[1].first_thought <= list.sessions[1].last_thought);

    let page = manager.list_sessions(1, 1).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.total, 2);
    assert_eq!(page.sessions[0].session_name, "old:sess:a");
}

#[tokio::test]
async fn list_skips_corrupt_session_files() {
    let (_tmp, manager) = test_manager();
    fill_session(&manager, "good:sess:a", 1).await;
    let bad = manager.store().dir().join("bad___sess___b.json");
    std::fs::write(bad, "{ not json").unwrap();

    let list = manager.list_sessions(10, 0).await.unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.sessions[0].session_name, "good:sess:a");
}

#[tokio::test]
async fn cleanup_deletes_only_sessions_past_threshold() {
    let (_tmp, manager) = test_manager();
    for (name, age) in [("s:one:a", 100), ("s:two:b", 50), ("s:three:c", 10)] {
        fill_session(&manager, name, 1).await;
        backdate_session(&manager, name, age);
    }

    let preview = manager.preview_cleanup(90).await.unwrap();
    assert!(preview.dry_run);
    assert_eq!(preview.deleted_count, 0);
    assert_eq!(preview.candidates.len(), 1);

    let result = manager.cleanup_sessions(90).await.unwrap();
    assert_eq!(result.deleted_count, 1);
    assert_eq!(result.candidates[0].session_name, "s:one:a");

    let remaining = manager.list_sessions(10, 0).await.unwrap();
    let names: Vec<&str> = remaining
        .sessions
        .iter()
        .map(|s| s.session_name.as_str())
        .collect();
    assert_eq!(remaining.total, 2);
    assert!(names.contains(&"s:two:b"));
    assert!(names.contains(&"s:three:c"));
}

#[tokio::test]
async fn cleanup_with_unbounded_age_deletes_nothing() {
    let (_tmp, manager) = test_manager();
    fill_session(&manager, "s:one:a", 1).await;
    backdate_session(&manager, "s:one:a", 1);

    for max_age_days in [u64::MAX, 1_000_000_000_000_000] {
        let result = manager.cleanup_sessions(max_age_days).await.unwrap();
        assert_eq!(result.deleted_count, 0);
        assert!(result.candidates.is_empty());
    }
    assert!(manager.store().statistics("s:one:a").await.unwrap().exists);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_never_fail_or_tear_the_file() {
    let (_tmp, manager) = test_manager();
    let manager = std::sync::Arc::new(manager);
    fill_session(&manager, "a:b:c", 1).await;
    let body = "x".repeat(200_000);

    for _ in 0..5 {
        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = manager.clone();
            let body = body.clone();
            handles.push(tokio::spawn(async move {
                manager.append_thought(thought("a:b:c", &body)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert!(!manager.store().load("a:b:c").await.unwrap().is_empty());
    }

    let leftovers: Vec<_> = std::fs::read_dir(manager.store().dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
    assert_eq!(manager.store().list().await.unwrap(), vec!["a___b___c".to_string()]);
}
