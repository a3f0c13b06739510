// src/services/ticket_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::TicketStore,
    models::ticket::{
        BucketKind, BucketView, EmptyState, NewTicket, ReapOutcome, Ticket, TicketBoard,
        TicketCard, TicketStatus,
    },
};

pub const DEFAULT_RETENTION_DAYS: i64 = 30;
// Cem anos; acima disso `now - retention` nem cabe num DateTime
pub const MAX_RETENTION_DAYS: i64 = 36_500;

// =========================================================================
//  PARTIÇÃO (pura, sem I/O)
// =========================================================================

/// Os três baldes já ordenados, mais os ids que passaram da retenção.
#[derive(Debug, Default)]
pub struct TicketPartition {
    pub active: Vec<Ticket>,
    pub completed: Vec<Ticket>,
    pub deleted: Vec<Ticket>,
    // Fora de todos os baldes; cada id aparece uma única vez
    pub expired: Vec<Uuid>,
}

// `None` quando a retenção recua além do menor DateTime: nada expira
fn retention_cutoff(now: DateTime<Utc>, retention: Duration) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(retention)
}

fn is_expired(ticket: &Ticket, cutoff: Option<DateTime<Utc>>) -> bool {
    match (ticket.deleted_at, cutoff) {
        (Some(deleted_at), Some(cutoff)) => deleted_at < cutoff,
        _ => false,
    }
}

/// Ids dos tickets na lixeira há mais tempo que `retention`.
pub fn expired_ticket_ids<'a>(
    tickets: impl IntoIterator<Item = &'a Ticket>,
    now: DateTime<Utc>,
    retention: Duration,
) -> Vec<Uuid> {
    let cutoff = retention_cutoff(now, retention);
    tickets
        .into_iter()
        .filter(|ticket| is_expired(ticket, cutoff))
        .map(|ticket| ticket.id)
        .collect()
}

/// Separa os tickets em ativos, concluídos e excluídos.
///
/// A ordem das regras importa: primeiro a retenção (o expirado some mesmo
/// que seja de outra propriedade), depois o filtro de propriedade, e só
/// então a classificação. A chave do mapa é o id que vale.
pub fn partition_tickets(
    tickets: HashMap<Uuid, Ticket>,
    property_filter: Option<Uuid>,
    now: DateTime<Utc>,
    retention: Duration,
) -> TicketPartition {
    let cutoff = retention_cutoff(now, retention);
    let mut partition = TicketPartition::default();

    for (id, mut ticket) in tickets {
        ticket.id = id;

        if is_expired(&ticket, cutoff) {
            partition.expired.push(id);
            continue;
        }

        if let Some(property_id) = property_filter {
            if ticket.property_id != Some(property_id) {
                continue;
            }
        }

        if ticket.is_soft_deleted() {
            partition.deleted.push(ticket);
        } else if ticket.status == TicketStatus::Completed {
            partition.completed.push(ticket);
        } else {
            partition.active.push(ticket);
        }
    }

    // Mais recentes primeiro. `None < Some(_)`, então data ausente vai pro fim.
    partition.active.sort_by(|a, b| b.date_created.cmp(&a.date_created));
    partition.completed.sort_by(|a, b| b.date_completed.cmp(&a.date_completed));
    partition.deleted.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));

    partition
}

// =========================================================================
//  RENDERIZAÇÃO (cards ou estado vazio)
// =========================================================================

fn empty_state(kind: BucketKind) -> EmptyState {
    match kind {
        BucketKind::Active => EmptyState { icon: "📋", message: "No active tickets" },
        BucketKind::Completed => EmptyState { icon: "✅", message: "No completed tickets" },
        BucketKind::Deleted => EmptyState { icon: "🗑️", message: "No deleted tickets" },
    }
}

fn ticket_card(ticket: &Ticket, is_deleted: bool) -> TicketCard {
    TicketCard {
        id: ticket.id,
        title: ticket.title.clone(),
        description: ticket.description.clone(),
        status: ticket.status,
        property_id: ticket.property_id,
        date_created: ticket.date_created,
        date_completed: ticket.date_completed,
        deleted_at: ticket.deleted_at,
        is_deleted,
    }
}

fn bucket_view(kind: BucketKind, tickets: &[Ticket]) -> BucketView {
    let is_deleted = kind == BucketKind::Deleted;
    let cards: Vec<TicketCard> = tickets.iter().map(|t| ticket_card(t, is_deleted)).collect();
    let empty_state = cards.is_empty().then(|| empty_state(kind));

    BucketView { kind, cards, empty_state }
}

pub fn render_board(partition: &TicketPartition) -> TicketBoard {
    TicketBoard {
        active: bucket_view(BucketKind::Active, &partition.active),
        completed: bucket_view(BucketKind::Completed, &partition.completed),
        deleted: bucket_view(BucketKind::Deleted, &partition.deleted),
    }
}

// =========================================================================
//  SERVIÇO (com I/O)
// =========================================================================

// Apaga um por um; falha só vai pro log, sem retry.
async fn purge(store: &dyn TicketStore, ids: &[Uuid]) -> ReapOutcome {
    let mut outcome = ReapOutcome::default();

    for id in ids {
        match store.delete_ticket(*id).await {
            Ok(()) => outcome.deleted += 1,
            // Outro expurgo chegou antes
            Err(AppError::TicketNotFound(_)) => {
                tracing::debug!("Ticket {} já tinha sido apagado", id);
                outcome.deleted += 1;
            }
            Err(e) => {
                tracing::error!("🔥 Erro ao apagar definitivamente o ticket {}: {}", id, e);
                outcome.failed += 1;
            }
        }
    }

    outcome
}

#[derive(Clone)]
pub struct TicketService {
    store: Arc<dyn TicketStore>,
    retention: Duration,
}

impl TicketService {
    pub fn new(store: Arc<dyn TicketStore>, retention: Duration) -> Self {
        Self { store, retention }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    async fn load(&self) -> Result<HashMap<Uuid, Ticket>, AppError> {
        let tickets = self.store.list_tickets().await?;
        Ok(tickets.into_iter().map(|t| (t.id, t)).collect())
    }

    /// Monta o quadro. Os expirados encontrados no caminho são expurgados em
    /// segundo plano (fire-and-forget).
    pub async fn board(&self, property_filter: Option<Uuid>) -> Result<TicketBoard, AppError> {
        let (board, _purge) = self.board_and_purge(property_filter).await?;
        Ok(board)
    }

    /// Igual a `board`, mas devolve o handle do expurgo em segundo plano
    /// (`None` quando não há nada para apagar).
    pub async fn board_and_purge(
        &self,
        property_filter: Option<Uuid>,
    ) -> Result<(TicketBoard, Option<JoinHandle<ReapOutcome>>), AppError> {
        let partition = partition_tickets(
            self.load().await?,
            property_filter,
            Utc::now(),
            self.retention,
        );

        let purge_handle = if partition.expired.is_empty() {
            None
        } else {
            let store = self.store.clone();
            let ids = partition.expired.clone();
            Some(tokio::spawn(async move { purge(store.as_ref(), &ids).await }))
        };

        Ok((render_board(&partition), purge_handle))
    }

    /// O "reap" explícito: apaga de vez o que passou da retenção.
    pub async fn reap_expired(&self, now: DateTime<Utc>) -> Result<ReapOutcome, AppError> {
        let tickets = self.store.list_tickets().await?;
        let expired = expired_ticket_ids(&tickets, now, self.retention);
        if expired.is_empty() {
            return Ok(ReapOutcome::default());
        }

        tracing::info!("🗑️ {} ticket(s) fora da retenção, apagando...", expired.len());
        Ok(purge(self.store.as_ref(), &expired).await)
    }

    /// Agenda o `reap_expired` periodicamente.
    pub fn spawn_reaper(&self, every: std::time::Duration) -> JoinHandle<()> {
        let service = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                match service.reap_expired(Utc::now()).await {
                    Ok(outcome) if outcome.deleted > 0 || outcome.failed > 0 => {
                        tracing::info!(
                            "✅ Expurgo concluído: {} apagado(s), {} falha(s)",
                            outcome.deleted,
                            outcome.failed
                        );
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!("🔥 Falha ao listar tickets para expurgo: {}", e),
                }
            }
        })
    }

    // --- Ciclo de vida ---

    pub async fn create_ticket(
        &self,
        title: &str,
        description: Option<&str>,
        property_id: Option<Uuid>,
        date_created: Option<DateTime<Utc>>,
    ) -> Result<Ticket, AppError> {
        self.store
            .create_ticket(NewTicket {
                title: title.to_string(),
                description: description.map(str::to_string),
                status: TicketStatus::Open,
                property_id,
                date_created: date_created.unwrap_or_else(Utc::now),
            })
            .await
    }

    pub async fn complete_ticket(&self, id: Uuid) -> Result<Ticket, AppError> {
        self.store.complete_ticket(id, Utc::now()).await
    }

    pub async fn soft_delete_ticket(&self, id: Uuid) -> Result<Ticket, AppError> {
        self.store.soft_delete_ticket(id, Utc::now()).await
    }

    pub async fn restore_ticket(&self, id: Uuid) -> Result<Ticket, AppError> {
        self.store.restore_ticket(id).await
    }

    pub async fn purge_ticket(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete_ticket(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
    }

    fn ticket(title: &str) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: TicketStatus::Open,
            property_id: None,
            date_created: None,
            date_completed: None,
            deleted_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn by_id(tickets: Vec<Ticket>) -> HashMap<Uuid, Ticket> {
        tickets.into_iter().map(|t| (t.id, t)).collect()
    }

    fn titles(tickets: &[Ticket]) -> Vec<&str> {
        tickets.iter().map(|t| t.title.as_str()).collect()
    }

    fn retention() -> Duration {
        Duration::days(DEFAULT_RETENTION_DAYS)
    }

    #[test]
    fn classifies_into_exactly_one_bucket() {
        let open = ticket("open");
        let mut done = ticket("done");
        done.status = TicketStatus::Completed;
        let mut trashed = ticket("trashed");
        trashed.deleted_at = Some(now() - Duration::days(1));
        // Concluído e na lixeira: a lixeira ganha
        let mut done_and_trashed = ticket("done-and-trashed");
        done_and_trashed.status = TicketStatus::Completed;
        done_and_trashed.deleted_at = Some(now() - Duration::days(2));
        let mut on_hold = ticket("on-hold");
        on_hold.status = TicketStatus::OnHold;

        let p = partition_tickets(
            by_id(vec![open, done, trashed, done_and_trashed, on_hold]),
            None,
            now(),
            retention(),
        );

        let mut active = titles(&p.active);
        active.sort();
        assert_eq!(active, vec!["on-hold", "open"]);
        assert_eq!(titles(&p.completed), vec!["done"]);
        assert_eq!(titles(&p.deleted), vec!["trashed", "done-and-trashed"]);
        assert!(p.expired.is_empty());
    }

    #[test]
    fn expired_tickets_leave_every_bucket() {
        let mut old = ticket("old");
        old.deleted_at = Some(now() - Duration::days(31));
        let old_id = old.id;
        let mut edge = ticket("edge");
        // Exatamente no limite ainda não expirou
        edge.deleted_at = Some(now() - retention());

        let p = partition_tickets(by_id(vec![old, edge]), None, now(), retention());

        assert_eq!(p.expired, vec![old_id]);
        assert_eq!(titles(&p.deleted), vec!["edge"]);
        assert!(p.active.is_empty() && p.completed.is_empty());
    }

    #[test]
    fn retention_beyond_the_calendar_expires_nothing() {
        let mut trashed = ticket("trashed");
        trashed.deleted_at = Some(DateTime::<Utc>::MIN_UTC);

        let p = partition_tickets(by_id(vec![trashed]), None, now(), Duration::MAX);

        assert!(p.expired.is_empty());
        assert_eq!(titles(&p.deleted), vec!["trashed"]);
    }

    #[tokio::test]
    async fn purge_of_an_already_deleted_ticket_is_not_a_failure() {
        let store = crate::db::memory_store::MemoryStore::new();
        let gone = Uuid::new_v4();

        let outcome = purge(&store, &[gone]).await;

        assert_eq!(outcome, ReapOutcome { deleted: 1, failed: 0 });
        assert_eq!(store.delete_calls(), vec![gone]);
    }

    #[test]
    fn retention_applies_before_the_property_filter() {
        let mine = Uuid::new_v4();
        let mut foreign_old = ticket("foreign-old");
        foreign_old.property_id = Some(Uuid::new_v4());
        foreign_old.deleted_at = Some(now() - Duration::days(90));
        let foreign_id = foreign_old.id;

        let p = partition_tickets(by_id(vec![foreign_old]), Some(mine), now(), retention());
        assert_eq!(p.expired, vec![foreign_id]);
    }

    #[test]
    fn property_filter_drops_other_properties() {
        let mine = Uuid::new_v4();
        let mut a = ticket("mine");
        a.property_id = Some(mine);
        let mut b = ticket("theirs");
        b.property_id = Some(Uuid::new_v4());
        let c = ticket("unassigned");

        let p = partition_tickets(by_id(vec![a, b, c]), Some(mine), now(), retention());
        assert_eq!(titles(&p.active), vec!["mine"]);

        let everything = partition_tickets(
            by_id(vec![ticket("x"), ticket("y")]),
            None,
            now(),
            retention(),
        );
        assert_eq!(everything.active.len(), 2);
    }

    #[test]
    fn buckets_are_newest_first_with_missing_dates_last() {
        let mut older = ticket("older");
        older.date_created = Some(now() - Duration::days(3));
        let mut newer = ticket("newer");
        newer.date_created = Some(now() - Duration::hours(1));
        let undated = ticket("undated");

        let mut done_early = ticket("done-early");
        done_early.status = TicketStatus::Completed;
        done_early.date_completed = Some(now() - Duration::days(5));
        // Criado depois, concluído antes: a ordem é pela conclusão
        done_early.date_created = Some(now());
        let mut done_late = ticket("done-late");
        done_late.status = TicketStatus::Completed;
        done_late.date_completed = Some(now() - Duration::days(1));
        done_late.date_created = Some(now() - Duration::days(10));

        let mut trashed_first = ticket("trashed-first");
        trashed_first.deleted_at = Some(now() - Duration::days(20));
        let mut trashed_last = ticket("trashed-last");
        trashed_last.deleted_at = Some(now() - Duration::days(2));

        let p = partition_tickets(
            by_id(vec![
                older, undated, newer, done_early, done_late, trashed_first, trashed_last,
            ]),
            None,
            now(),
            retention(),
        );

        assert_eq!(titles(&p.active), vec!["newer", "older", "undated"]);
        assert_eq!(titles(&p.completed), vec!["done-late", "done-early"]);
        assert_eq!(titles(&p.deleted), vec!["trashed-last", "trashed-first"]);
    }

    #[test]
    fn map_key_is_the_ticket_id() {
        let key = Uuid::new_v4();
        let mut tickets = HashMap::new();
        tickets.insert(key, ticket("keyed"));

        let p = partition_tickets(tickets, None, now(), retention());
        assert_eq!(p.active[0].id, key);
    }

    #[test]
    fn empty_buckets_render_their_placeholder() {
        let mut done = ticket("done");
        done.status = TicketStatus::Completed;

        let board = render_board(&partition_tickets(by_id(vec![done]), None, now(), retention()));

        assert_eq!(board.completed.cards.len(), 1);
        assert!(board.completed.empty_state.is_none());
        assert!(!board.completed.cards[0].is_deleted);

        let active = board.active.empty_state.expect("active placeholder");
        assert_eq!(active.message, "No active tickets");
        let deleted = board.deleted.empty_state.expect("deleted placeholder");
        assert_eq!(deleted.icon, "🗑️");
        assert_eq!(deleted.message, "No deleted tickets");
    }

    #[test]
    fn deleted_cards_are_flagged() {
        let mut trashed = ticket("trashed");
        trashed.deleted_at = Some(now() - Duration::days(1));

        let board = render_board(&partition_tickets(by_id(vec![trashed]), None, now(), retention()));
        assert!(board.deleted.cards[0].is_deleted);
        assert_eq!(board.deleted.kind, BucketKind::Deleted);
    }
}
