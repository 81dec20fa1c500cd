// ==========================================
// AssignmentFormSession 集成测试
// ==========================================
// 测试范围:
// 1. 打开表单: 目录加载成功/失败
// 2. 切换教师后清空不再可选的班次
// 3. 提交校验: 0 值不发请求
// 4. 重复分配的友好提示、其他失败原样透出
// 5. 成功提交: 发布事件、关闭表单、重置草稿
// 6. 过期解析结果被丢弃（含重新打开表单）
// 7. 教师必须在有效教师目录中
// ==========================================

mod helpers;

use std::time::Duration;

use campus_admin::engine::AssignmentEventType;
use campus_admin::i18n;
use campus_admin::ApiError;
use helpers::fixture_builder::standard_fixture;
use helpers::SessionEnv;

// ==========================================
// 打开表单
// ==========================================

#[tokio::test]
async fn test_open_loads_catalogs() {
    let env = SessionEnv::new(standard_fixture().backend());

    env.session.open().await.expect("打开失败");

    assert!(env.session.is_ready());
    let snapshot = env.session.snapshot().unwrap();
    assert_eq!(snapshot.faculty.len(), 3);
    assert_eq!(snapshot.batches.len(), 3);
    assert_eq!(snapshot.course_index.len(), 2);

    assert_eq!(snapshot.find_batch(102).map(|b| b.code.as_str()), Some("b2"));
    assert!(snapshot.find_batch(999).is_none());
    assert_eq!(
        snapshot.find_faculty(10).map(|f| f.display_label()),
        Some("Asha Rao (EMP010)".to_string())
    );
}

#[tokio::test]
async fn test_catalog_failure_blocks_submit() {
    let backend = standard_fixture()
        .backend()
        .with_catalog_failure("503 Service Unavailable");
    let env = SessionEnv::new(backend);

    let err = env.session.open().await.unwrap_err();
    assert!(matches!(err, ApiError::CatalogLoad(_)));
    assert!(err.user_message().contains("503"));
    assert!(env.session.is_open());
    assert!(!env.session.is_ready());

    let err = env.session.submit().await.unwrap_err();
    assert!(matches!(err, ApiError::NotReady(_)));
    assert!(matches!(
        env.session.select_faculty(10).await.unwrap_err(),
        ApiError::NotReady(_)
    ));
    assert_eq!(env.backend.assign_calls(), 0);
}

// ==========================================
// 教师/班次选择
// ==========================================

#[tokio::test]
async fn test_switching_faculty_clears_ineligible_batch() {
    let env = SessionEnv::new(standard_fixture().backend());
    env.session.open().await.unwrap();

    env.session.select_faculty(10).await.unwrap();
    env.session.select_batch(101).unwrap();
    assert_eq!(env.session.draft().batch_id, 101);

    // 教师 20 只能教 b2
    let outcome = env.session.select_faculty(20).await.unwrap();
    assert_eq!(outcome.eligible_ids(), vec![102]);
    assert_eq!(env.session.draft().faculty_id, 20);
    assert_eq!(env.session.draft().batch_id, 0);
}

#[tokio::test]
async fn test_switching_faculty_keeps_still_eligible_batch() {
    let backend = standard_fixture().assign_module(20, 7, "Algorithms").backend();
    let env = SessionEnv::new(backend);
    env.session.open().await.unwrap();

    env.session.select_faculty(10).await.unwrap();
    env.session.select_batch(103).unwrap();
    env.session.select_faculty(20).await.unwrap();

    assert_eq!(env.session.draft().batch_id, 103);
}

#[tokio::test]
async fn test_select_batch_rejects_ineligible() {
    let env = SessionEnv::new(standard_fixture().backend());
    env.session.open().await.unwrap();
    env.session.select_faculty(10).await.unwrap();

    let err = env.session.select_batch(102).unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(env.session.draft().batch_id, 0);
}

#[tokio::test]
async fn test_clearing_faculty_empties_list() {
    let env = SessionEnv::new(standard_fixture().backend());
    env.session.open().await.unwrap();
    env.session.select_faculty(10).await.unwrap();
    env.session.select_batch(101).unwrap();

    let outcome = env.session.select_faculty(0).await.unwrap();

    assert!(outcome.eligible.is_empty());
    assert!(env.session.eligible_batches().is_empty());
    assert_eq!(env.session.draft().batch_id, 0);
}

#[tokio::test]
async fn test_reload_catalogs_reresolves_current_faculty() {
    let env = SessionEnv::new(standard_fixture().backend());
    env.session.open().await.unwrap();
    env.session.select_faculty(10).await.unwrap();

    let outcome = env.session.reload_catalogs().await.unwrap();

    assert_eq!(outcome.unwrap().eligible_ids(), vec![101, 103]);
    // 缓存跨重载保留
    assert_eq!(env.backend.course_module_calls(1), 1);
}

// ==========================================
// 提交
// ==========================================

#[tokio::test]
async fn test_submit_without_selection_makes_no_call() {
    let env = SessionEnv::new(standard_fixture().backend());
    env.session.open().await.unwrap();

    let err = env.session.submit().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    env.session.select_faculty(10).await.unwrap();
    let err = env.session.submit().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    assert_eq!(env.backend.assign_calls(), 0);
}

#[tokio::test]
async fn test_submit_success_closes_form() {
    let env = SessionEnv::new(standard_fixture().backend());
    env.session.open().await.unwrap();
    env.session.select_faculty(10).await.unwrap();
    env.session.select_batch(103).unwrap();

    let assignment = env.session.submit().await.expect("提交失败");

    assert_eq!(assignment.faculty_id, 10);
    assert_eq!(assignment.batch_id, 103);
    assert_eq!(env.backend.batch_assignments().len(), 1);

    assert!(!env.session.is_open());
    assert_eq!(env.session.draft().faculty_id, 0);
    assert_eq!(env.session.draft().batch_id, 0);
    assert!(env.session.eligible_batches().is_empty());
    assert!(env.session.resolver().cache().is_empty());

    let events = env.publisher.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, AssignmentEventType::FacultyAssigned);
    assert_eq!(events[0].assignment_id, Some(assignment.id));
    assert_eq!(events[0].session_id, env.session.session_id());
    assert_eq!(events[1].event_type, AssignmentEventType::FormClosed);
}

#[tokio::test]
async fn test_duplicate_assignment_is_rewritten() {
    let backend = standard_fixture().existing_assignment(1, 10, 101).backend();
    let env = SessionEnv::new(backend);
    env.session.open().await.unwrap();
    env.session.select_faculty(10).await.unwrap();
    env.session.select_batch(101).unwrap();

    let err = env.session.submit().await.unwrap_err();

    match err {
        ApiError::DuplicateAssignment(msg) => {
            assert_eq!(msg, i18n::t("assignment.duplicate"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // 失败后表单保持打开，可重新选择
    assert!(env.session.is_ready());
    assert_eq!(env.session.draft().batch_id, 101);
    assert!(env.publisher.events().is_empty());
}

#[tokio::test]
async fn test_session_close_clears_cache() {
    let env = SessionEnv::new(standard_fixture().backend());
    env.session.open().await.unwrap();
    env.session.select_faculty(10).await.unwrap();
    assert!(!env.session.resolver().cache().is_empty());

    env.session.close();

    assert!(env.session.resolver().cache().is_empty());
    assert!(env.session.snapshot().is_none());

    // 重新打开后重新查询
    env.session.open().await.unwrap();
    env.session.select_faculty(10).await.unwrap();
    assert_eq!(env.backend.course_module_calls(1), 2);
}

// ==========================================
// 过期解析结果
// ==========================================

#[tokio::test]
async fn test_stale_ticket_is_discarded() {
    let env = SessionEnv::new(standard_fixture().backend());
    env.session.open().await.unwrap();

    let old_ticket = env.session.begin_resolution(10).unwrap();
    let new_ticket = env.session.begin_resolution(20).unwrap();
    assert!(new_ticket.generation() > old_ticket.generation());

    let new_outcome = env.session.resolve_ticket(&new_ticket).await.unwrap();
    let old_outcome = env.session.resolve_ticket(&old_ticket).await.unwrap();

    assert!(env.session.apply_resolution(&new_ticket, new_outcome));
    assert!(!env.session.apply_resolution(&old_ticket, old_outcome));

    let ids: Vec<i64> = env.session.eligible_batches().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![102]);
    assert_eq!(env.session.draft().faculty_id, 20);
}

#[tokio::test]
async fn test_slow_superseded_selection_cannot_overwrite() {
    let backend = standard_fixture()
        .backend()
        .with_assignment_delay(10, Duration::from_millis(50));
    let env = SessionEnv::new(backend);
    env.session.open().await.unwrap();

    let slow = env.session.select_faculty(10);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        env.session.select_faculty(20).await
    };
    let (slow_result, fast_result) = tokio::join!(slow, fast);

    // 两次解析各自返回结果，但只有最新的被应用
    assert_eq!(slow_result.unwrap().eligible_ids(), vec![101, 103]);
    assert_eq!(fast_result.unwrap().eligible_ids(), vec![102]);
    let ids: Vec<i64> = env.session.eligible_batches().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![102]);
    assert_eq!(env.session.draft().faculty_id, 20);
}

#[tokio::test]
async fn test_reopen_discards_in_flight_selection() {
    let backend = standard_fixture()
        .backend()
        .with_assignment_delay(10, Duration::from_millis(50));
    let env = SessionEnv::new(backend);
    env.session.open().await.unwrap();

    let slow = env.session.select_faculty(10);
    let reopen = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        env.session.open().await
    };
    let (slow_result, reopen_result) = tokio::join!(slow, reopen);
    slow_result.unwrap();
    reopen_result.unwrap();

    // 重新打开后的表单保持空白
    assert_eq!(env.session.draft().faculty_id, 0);
    assert_eq!(env.session.draft().batch_id, 0);
    assert!(env.session.eligible_batches().is_empty());
    assert!(env.session.last_outcome().is_none());
    assert!(env.session.select_batch(101).is_err());
}

// ==========================================
// 教师目录校验
// ==========================================

#[tokio::test]
async fn test_select_faculty_rejects_unknown_faculty() {
    let backend = standard_fixture()
        .assign_module(99, 5, "Data Structures")
        .backend();
    let env = SessionEnv::new(backend);
    env.session.open().await.unwrap();

    let result = env.session.select_faculty(99).await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(env.session.draft().faculty_id, 0);
    assert!(env.session.eligible_batches().is_empty());

    let result = env.session.submit().await;
    assert!(result.is_err());
    assert_eq!(env.backend.assign_calls(), 0);
}

#[tokio::test]
async fn test_select_faculty_rejects_inactive_faculty() {
    let backend = standard_fixture()
        .inactive_faculty(40, "On Leave")
        .assign_module(40, 5, "Data Structures")
        .backend();
    let env = SessionEnv::new(backend);
    env.session.open().await.unwrap();

    assert!(env.session.begin_resolution(40).is_err());
    // 目录中的教师照常解析
    let outcome = env.session.select_faculty(10).await.unwrap();
    assert_eq!(outcome.eligible_ids(), vec![101, 103]);
}
