//! Integration tests for the ticket board and the retention purge using the
//! in-memory store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use property_desk::{
    db::{memory_store::MemoryStore, store::TicketStore},
    models::ticket::{Ticket, TicketStatus},
    services::ticket_service::TicketService,
};
use uuid::Uuid;

fn ticket(title: &str) -> Ticket {
    Ticket {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        status: TicketStatus::Open,
        property_id: None,
        date_created: Some(Utc::now()),
        date_completed: None,
        deleted_at: None,
        created_at: None,
        updated_at: None,
    }
}

fn trashed(title: &str, deleted_at: DateTime<Utc>) -> Ticket {
    Ticket {
        deleted_at: Some(deleted_at),
        ..ticket(title)
    }
}

fn setup() -> (Arc<MemoryStore>, TicketService) {
    let store = Arc::new(MemoryStore::new());
    let service = TicketService::new(store.clone(), Duration::days(30));
    (store, service)
}

#[tokio::test]
async fn reap_deletes_each_expired_ticket_once() {
    let (store, service) = setup();
    let now = Utc::now();

    let old_a = trashed("old-a", now - Duration::days(31));
    let old_b = trashed("old-b", now - Duration::days(400));
    let recent = trashed("recent", now - Duration::days(29));
    let open = ticket("open");
    let expired_ids = [old_a.id, old_b.id];

    for t in [old_a, old_b, recent, open] {
        store.insert_ticket(t);
    }

    let outcome = service.reap_expired(now).await.unwrap();
    assert_eq!(outcome.deleted, 2);
    assert_eq!(outcome.failed, 0);

    let mut calls = store.delete_calls();
    calls.sort();
    let mut expected = expired_ids.to_vec();
    expected.sort();
    assert_eq!(calls, expected);

    let mut remaining: Vec<String> = store.tickets().into_iter().map(|t| t.title).collect();
    remaining.sort();
    assert_eq!(remaining, vec!["open".to_string(), "recent".to_string()]);

    // Segunda passada não tem o que apagar
    let again = service.reap_expired(now).await.unwrap();
    assert_eq!(again.deleted, 0);
    assert_eq!(store.delete_calls().len(), 2);
}

#[tokio::test]
async fn failed_purge_is_counted_not_raised() {
    let (store, service) = setup();
    let stuck = trashed("stuck", Utc::now() - Duration::days(45));
    store.fail_delete_of(stuck.id);
    store.insert_ticket(stuck);

    let outcome = service.reap_expired(Utc::now()).await.unwrap();
    assert_eq!(outcome.deleted, 0);
    assert_eq!(outcome.failed, 1);
    assert_eq!(store.tickets().len(), 1);
}

#[tokio::test]
async fn board_hides_expired_and_purges_in_background() {
    let (store, service) = setup();
    let expired = trashed("expired", Utc::now() - Duration::days(60));
    let expired_id = expired.id;
    store.insert_ticket(expired);
    store.insert_ticket(ticket("open"));

    let (board, purge) = service.board_and_purge(None).await.unwrap();

    assert_eq!(board.active.cards.len(), 1);
    assert!(board.completed.cards.is_empty());
    assert!(board.deleted.cards.is_empty());
    assert!(board.deleted.empty_state.is_some());

    let outcome = purge.expect("purge should be scheduled").await.unwrap();
    assert_eq!(outcome.deleted, 1);
    assert_eq!(store.delete_calls(), vec![expired_id]);
}

#[tokio::test]
async fn board_without_expired_tickets_schedules_nothing() {
    let (store, service) = setup();
    store.insert_ticket(ticket("open"));

    let (_, purge) = service.board_and_purge(None).await.unwrap();
    assert!(purge.is_none());
    assert!(store.delete_calls().is_empty());
}

#[tokio::test]
async fn board_and_reap_survive_a_retention_longer_than_the_calendar() {
    let store = Arc::new(MemoryStore::new());
    let service = TicketService::new(store.clone(), Duration::MAX);
    store.insert_ticket(trashed("ancient", Utc::now() - Duration::days(3650)));

    let (board, purge) = service.board_and_purge(None).await.unwrap();
    assert!(purge.is_none());
    assert_eq!(board.deleted.cards.len(), 1);

    let outcome = service.reap_expired(Utc::now()).await.unwrap();
    assert_eq!(outcome.deleted, 0);
    assert!(store.delete_calls().is_empty());
}

#[tokio::test]
async fn racing_purges_do_not_report_failures() {
    let (store, service) = setup();
    store.insert_ticket(trashed("expired", Utc::now() - Duration::days(40)));

    // O quadro agenda o expurgo; o reap concorrente pode chegar antes ou depois
    let (_, purge) = service.board_and_purge(None).await.unwrap();
    let reaped = service.reap_expired(Utc::now()).await.unwrap();
    let background = purge.expect("purge should be scheduled").await.unwrap();

    assert_eq!(reaped.failed + background.failed, 0);
    assert!(store.tickets().is_empty());
}

#[tokio::test]
async fn board_respects_property_filter() {
    let (store, service) = setup();
    let selected = Uuid::new_v4();

    store.insert_ticket(Ticket {
        property_id: Some(selected),
        ..ticket("mine")
    });
    store.insert_ticket(Ticket {
        property_id: Some(Uuid::new_v4()),
        ..ticket("theirs")
    });

    let board = service.board(Some(selected)).await.unwrap();
    let titles: Vec<&str> = board.active.cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["mine"]);
}

#[tokio::test]
async fn lifecycle_moves_ticket_between_buckets() {
    let (store, service) = setup();
    let created = service
        .create_ticket("Vazamento no 2º andar", None, None, None)
        .await
        .unwrap();
    assert_eq!(created.status, TicketStatus::Open);

    let board = service.board(None).await.unwrap();
    assert_eq!(board.active.cards.len(), 1);

    let completed = service.complete_ticket(created.id).await.unwrap();
    assert_eq!(completed.status, TicketStatus::Completed);
    assert!(completed.date_completed.is_some());
    let board = service.board(None).await.unwrap();
    assert_eq!(board.completed.cards.len(), 1);
    assert!(board.active.empty_state.is_some());

    service.soft_delete_ticket(created.id).await.unwrap();
    let board = service.board(None).await.unwrap();
    assert_eq!(board.deleted.cards.len(), 1);
    assert!(board.deleted.cards[0].is_deleted);
    assert!(board.completed.cards.is_empty());

    service.restore_ticket(created.id).await.unwrap();
    let board = service.board(None).await.unwrap();
    assert_eq!(board.completed.cards.len(), 1);

    service.purge_ticket(created.id).await.unwrap();
    assert!(store.list_tickets().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_ticket_is_reported() {
    let (_, service) = setup();
    let missing = Uuid::new_v4();

    let err = service.complete_ticket(missing).await.unwrap_err();
    assert!(matches!(
        err,
        property_desk::common::error::AppError::TicketNotFound(id) if id == missing
    ));
}
