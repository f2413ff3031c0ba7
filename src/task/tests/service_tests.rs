//! Service orchestration tests for admission, mutation, and queries.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{DueDate, Priority, Task, TaskEvent, TaskId, TaskUpdate},
    ports::{Admission, RejectionReason, TaskValidator, ValidatorError, ValidatorResult},
    services::{AddTaskRequest, LifecycleError, LifecycleService},
    validation::TitleValidator,
};
use async_trait::async_trait;

type TestService = LifecycleService<InMemoryTaskStore, TitleValidator, DefaultClock>;

#[fixture]
fn service() -> TestService {
    LifecycleService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(TitleValidator::new()),
        Arc::new(DefaultClock),
    )
}

/// Records every published event alongside the task id it concerned.
fn record_events(service: &TestService) -> Arc<Mutex<Vec<(TaskEvent, TaskId)>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    service.subscribe_fn(move |event, task| {
        sink.lock().expect("event sink lock").push((event, task.id()));
        Ok(())
    });
    events
}

fn rfc3339_days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_task_commits_and_publishes(service: TestService) {
    let events = record_events(&service);

    let task = service
        .add_task(
            AddTaskRequest::new("Complete project")
                .with_priority(Priority::High)
                .with_due_date("2030-01-15"),
        )
        .await
        .expect("admission should succeed");

    assert_eq!(task.id(), TaskId::from_value(1));
    assert_eq!(task.title(), "Complete project");
    assert_eq!(task.priority(), Priority::High);
    assert!(!task.is_completed());
    assert!(task.due().due_at().is_some());

    let published = events.lock().expect("event sink lock");
    assert_eq!(*published, vec![(TaskEvent::Added, task.id())]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_title_is_rejected_without_a_commit(service: TestService) {
    let events = record_events(&service);

    let result = service.add_task(AddTaskRequest::new("")).await;
    assert!(matches!(
        result,
        Err(LifecycleError::Rejected {
            reason: RejectionReason::EmptyTitle
        })
    ));
    let whitespace = service.add_task(AddTaskRequest::new("   ")).await;
    assert!(whitespace.is_err());

    assert!(events.lock().expect("event sink lock").is_empty());
    assert_eq!(service.stats().expect("stats succeed").total, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_admissions_permanently_consume_their_id(service: TestService) {
    service
        .add_task(AddTaskRequest::new("first"))
        .await
        .expect("admission should succeed");
    service
        .add_task(AddTaskRequest::new(""))
        .await
        .expect_err("empty title is rejected");
    let third = service
        .add_task(AddTaskRequest::new("third"))
        .await
        .expect("admission should succeed");

    // The rejected attempt burned id 2; ids are never recycled.
    assert_eq!(third.id(), TaskId::from_value(3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unparseable_due_date_is_admitted_with_the_sentinel(service: TestService) {
    let task = service
        .add_task(AddTaskRequest::new("Review code").with_due_date("invalid-date"))
        .await
        .expect("admission should succeed despite the bad due date");

    assert_eq!(task.due(), &DueDate::Invalid("invalid-date".to_owned()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_results_follow_input_order_with_isolated_failures(service: TestService) {
    let results = service
        .bulk_add_tasks(vec![
            AddTaskRequest::new("A"),
            AddTaskRequest::new(""),
            AddTaskRequest::new("C"),
        ])
        .await;

    assert_eq!(results.len(), 3);
    let first = results.first().expect("three results");
    let second = results.get(1).expect("three results");
    let third = results.get(2).expect("three results");

    assert_eq!(first.as_ref().expect("A is committed").title(), "A");
    assert!(matches!(
        second,
        Err(LifecycleError::Rejected {
            reason: RejectionReason::EmptyTitle
        })
    ));
    assert_eq!(third.as_ref().expect("C is committed").title(), "C");

    let committed: Vec<TaskId> = [first, third]
        .iter()
        .map(|result| result.as_ref().expect("committed").id())
        .collect();
    assert_ne!(committed.first(), committed.get(1), "ids stay unique");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_task_moves_and_publishes_in_causal_order(service: TestService) {
    let events = record_events(&service);
    let task = service
        .add_task(AddTaskRequest::new("finish me"))
        .await
        .expect("admission should succeed");

    let completed = service
        .complete_task(task.id())
        .expect("store is usable")
        .expect("task was pending");
    assert!(completed.is_completed());
    assert!(completed.completed_at().is_some());

    let published = events.lock().expect("event sink lock");
    assert_eq!(
        *published,
        vec![
            (TaskEvent::Added, task.id()),
            (TaskEvent::Completed, task.id()),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_unknown_or_completed_ids_is_a_quiet_no_op(service: TestService) {
    let task = service
        .add_task(AddTaskRequest::new("once only"))
        .await
        .expect("admission should succeed");

    assert!(
        service
            .complete_task(TaskId::from_value(99))
            .expect("store is usable")
            .is_none()
    );
    service
        .complete_task(task.id())
        .expect("store is usable")
        .expect("first completion succeeds");
    assert!(
        service
            .complete_task(task.id())
            .expect("store is usable")
            .is_none()
    );

    let stats = service.stats().expect("stats succeed");
    assert_eq!(stats.completed, 1, "no duplicate in the completed set");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_task_applies_the_whitelist_and_publishes(service: TestService) {
    let events = record_events(&service);
    let task = service
        .add_task(AddTaskRequest::new("draft").with_priority(Priority::Low))
        .await
        .expect("admission should succeed");

    let updated = service
        .update_task(task.id(), &TaskUpdate::new().with_title("final"))
        .expect("store is usable")
        .expect("task is pending");
    assert_eq!(updated.title(), "final");
    assert_eq!(updated.priority(), Priority::Low);

    assert!(
        service
            .update_task(TaskId::from_value(41), &TaskUpdate::new().with_title("x"))
            .expect("store is usable")
            .is_none()
    );

    let published = events.lock().expect("event sink lock");
    assert_eq!(
        *published,
        vec![
            (TaskEvent::Added, task.id()),
            (TaskEvent::Updated, task.id()),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_excludes_invalid_dates_and_sorts_ascending(service: TestService) {
    let last_week = service
        .add_task(AddTaskRequest::new("last week").with_due_date(rfc3339_days_from_now(-7)))
        .await
        .expect("admission should succeed");
    let yesterday = service
        .add_task(AddTaskRequest::new("yesterday").with_due_date(rfc3339_days_from_now(-1)))
        .await
        .expect("admission should succeed");
    service
        .add_task(AddTaskRequest::new("tomorrow").with_due_date(rfc3339_days_from_now(1)))
        .await
        .expect("admission should succeed");
    service
        .add_task(AddTaskRequest::new("broken").with_due_date("not-a-date"))
        .await
        .expect("admission should succeed");

    let overdue = service.overdue_tasks().expect("query succeeds");
    let ids: Vec<TaskId> = overdue.iter().map(Task::id).collect();
    assert_eq!(ids, vec![last_week.id(), yesterday.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_tasks_are_not_overdue(service: TestService) {
    let task = service
        .add_task(AddTaskRequest::new("late but done").with_due_date(rfc3339_days_from_now(-2)))
        .await
        .expect("admission should succeed");
    service
        .complete_task(task.id())
        .expect("store is usable")
        .expect("task was pending");

    assert!(service.overdue_tasks().expect("query succeeds").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_query_reflects_the_call_time_snapshot(service: TestService) {
    service
        .add_task(AddTaskRequest::new("urgent").with_priority(Priority::High))
        .await
        .expect("admission should succeed");
    service
        .add_task(AddTaskRequest::new("routine"))
        .await
        .expect("admission should succeed");

    let high = service
        .tasks_by_priority(Priority::High)
        .expect("query succeeds");
    assert_eq!(high.len(), 1);
    assert_eq!(high.first().expect("one task").title(), "urgent");
    assert!(
        service
            .tasks_by_priority(Priority::Low)
            .expect("query succeeds")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_covers_title_and_optional_description(service: TestService) {
    service
        .add_task(AddTaskRequest::new("Write RELEASE notes"))
        .await
        .expect("admission should succeed");
    service
        .add_task(AddTaskRequest::new("Tidy up").with_description("release checklist"))
        .await
        .expect("admission should succeed");
    service
        .add_task(AddTaskRequest::new("Unrelated"))
        .await
        .expect("admission should succeed");

    let found = service.search_tasks("release").expect("query succeeds");
    assert_eq!(found.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_are_computed_from_one_partition_snapshot(service: TestService) {
    let empty = service.stats().expect("stats succeed");
    assert_eq!(empty.total, 0);
    assert!(empty.completion_rate.abs() < f64::EPSILON, "no division by zero");

    let done = service
        .add_task(AddTaskRequest::new("done").with_due_date(rfc3339_days_from_now(-1)))
        .await
        .expect("admission should succeed");
    service
        .add_task(AddTaskRequest::new("open").with_due_date(rfc3339_days_from_now(-1)))
        .await
        .expect("admission should succeed");
    service
        .complete_task(done.id())
        .expect("store is usable")
        .expect("task was pending");

    let stats = service.stats().expect("stats succeed");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.overdue, 1, "completed tasks never count as overdue");
    assert!((stats.completion_rate - 50.0).abs() < f64::EPSILON);
}

/// Validator standing in for an unreachable validation backend.
struct FailingValidator;

#[async_trait]
impl TaskValidator for FailingValidator {
    async fn validate(&self, _candidate: &Task) -> ValidatorResult<Admission> {
        Err(ValidatorError::Unavailable("backend offline".to_owned()))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn validator_faults_are_distinct_from_rejections() {
    let service = LifecycleService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(FailingValidator),
        Arc::new(DefaultClock),
    );

    let result = service.add_task(AddTaskRequest::new("anything")).await;
    assert!(matches!(
        result,
        Err(LifecycleError::Validator(ValidatorError::Unavailable(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unsubscribed_observers_stop_receiving_events(service: TestService) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let handle = service.subscribe_fn(move |event, _| {
        sink.lock().expect("event sink lock").push(event);
        Ok(())
    });

    service
        .add_task(AddTaskRequest::new("seen"))
        .await
        .expect("admission should succeed");
    assert!(service.unsubscribe(handle));
    service
        .add_task(AddTaskRequest::new("unseen"))
        .await
        .expect("admission should succeed");

    assert_eq!(*events.lock().expect("event sink lock"), vec![TaskEvent::Added]);
}
