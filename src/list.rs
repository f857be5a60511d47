//! The controller behind the transaction list and home screens.
//!
//! It turns filter selections into store queries, keeps the working set the
//! screen displays, and implements delete with undo:
//!
//! 1. Armed: the deleted transaction and the current working set are captured.
//! 2. Committed: the transaction is removed from the store and the working set,
//!    and a [DeletedNotice] with an undo action is returned.
//! 3. Undo requested: while the notice is live, [ListController::undo]
//!    re-inserts the captured fields (the store assigns a new ID). If the
//!    working set has not been reloaded since the deletion, the captured
//!    working set is restored, otherwise it is queried again with the active
//!    filter.
//! 4. Expired: after the timeout, a dismissal or another delete, the deletion
//!    can no longer be undone.

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;

use crate::{
    AppConfig, Error,
    alert::Alert,
    dashboard::Dashboard,
    stores::{BackgroundStore, TransactionStore},
    transaction::{Category, Transaction, TransactionFilter, TransactionRow, TransactionType},
};

/// The message of the notice shown after a deletion.
pub const DELETED_MESSAGE: &str = "Transaction deleted!";

/// The label of the undo action on the deletion notice.
pub const UNDO_ACTION: &str = "Undo";

/// Identifies the deletion a [DeletedNotice] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoToken(u64);

/// Published after a transaction was deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedNotice {
    /// Pass to [ListController::undo] or [ListController::dismiss].
    pub token: UndoToken,
    /// The notice to display.
    pub alert: Alert,
    /// The label of the undo action.
    pub action: &'static str,
    /// How long the notice, and with it the undo action, stays visible.
    pub timeout: Duration,
}

#[derive(Debug)]
struct PendingUndo {
    token: UndoToken,
    deleted: Transaction,
    previous: Arc<[Transaction]>,
    generation: u64,
    deadline: Instant,
}

impl PendingUndo {
    fn is_live(&self, token: UndoToken) -> bool {
        self.token == token && Instant::now() < self.deadline
    }
}

/// Mediates between the filter selections of a screen and the store.
///
/// Methods take `&mut self` and await each store call before touching the
/// working set, so a screen observes its own operations in the order it
/// issued them.
#[derive(Debug)]
pub struct ListController<S> {
    store: BackgroundStore<S>,
    filter: TransactionFilter,
    working_set: Arc<[Transaction]>,
    /// Incremented every time the working set is loaded from the store.
    generation: u64,
    pending_undo: Option<PendingUndo>,
    next_token: u64,
    undo_timeout: Duration,
}

impl<S> ListController<S>
where
    S: TransactionStore,
{
    /// Create a controller with no filters and an empty working set.
    ///
    /// Call [ListController::refresh] to load the transactions.
    pub fn new(store: BackgroundStore<S>, config: &AppConfig) -> Self {
        Self {
            store,
            filter: TransactionFilter::default(),
            working_set: Arc::from(Vec::new()),
            generation: 0,
            pending_undo: None,
            next_token: 0,
            undo_timeout: config.undo_timeout,
        }
    }

    /// The transactions currently displayed.
    ///
    /// The snapshot is never modified, later changes replace it.
    pub fn working_set(&self) -> Arc<[Transaction]> {
        self.working_set.clone()
    }

    /// The rows for the working set.
    pub fn rows(&self) -> Vec<TransactionRow> {
        self.working_set
            .iter()
            .map(TransactionRow::new_from_transaction)
            .collect()
    }

    /// The totals of the working set.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::from_transactions(&self.working_set)
    }

    /// The active filter.
    pub fn filter(&self) -> TransactionFilter {
        self.filter
    }

    /// Reload the working set with the active filter.
    ///
    /// Screens should call this whenever they become active again, since
    /// transactions may have been added or edited on another screen.
    ///
    /// # Errors
    /// Returns the store error, the working set is left unchanged.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.load(self.filter).await
    }

    /// Show only transactions of `transaction_type`, replacing any earlier
    /// type selection.
    ///
    /// # Errors
    /// Returns the store error, the filter and working set are left unchanged.
    pub async fn select_type(&mut self, transaction_type: TransactionType) -> Result<(), Error> {
        self.load(TransactionFilter {
            transaction_type: Some(transaction_type),
            ..self.filter
        })
        .await
    }

    /// Show only transactions in `category`, replacing any earlier category
    /// selection.
    ///
    /// # Errors
    /// Returns the store error, the filter and working set are left unchanged.
    pub async fn select_category(&mut self, category: Category) -> Result<(), Error> {
        self.load(TransactionFilter {
            category: Some(category),
            ..self.filter
        })
        .await
    }

    /// Remove both filters.
    ///
    /// # Errors
    /// Returns the store error, the filter and working set are left unchanged.
    pub async fn clear_filters(&mut self) -> Result<(), Error> {
        self.load(TransactionFilter::default()).await
    }

    async fn load(&mut self, filter: TransactionFilter) -> Result<(), Error> {
        let transactions = self.store.get_filtered(filter).await.inspect_err(|error| {
            tracing::error!("Could not load transactions with filter {filter:?}: {error}");
        })?;

        self.filter = filter;
        self.working_set = transactions.into();
        self.generation += 1;

        Ok(())
    }

    /// Delete `transaction` and offer to undo it.
    ///
    /// Any earlier deletion that could still be undone expires.
    ///
    /// # Errors
    /// Returns the store error, in which case nothing changes.
    pub async fn delete(&mut self, transaction: &Transaction) -> Result<DeletedNotice, Error> {
        let deleted = transaction.clone();
        let previous = self.working_set.clone();

        self.store
            .delete(deleted.id)
            .await
            .inspect_err(|error| {
                tracing::error!("Could not delete transaction {}: {error}", deleted.id);
            })?;

        self.working_set = previous
            .iter()
            .filter(|candidate| candidate.id != deleted.id)
            .cloned()
            .collect();

        let token = UndoToken(self.next_token);
        self.next_token += 1;

        if let Some(expired) = self.pending_undo.take() {
            tracing::debug!(
                "Deletion of transaction {} can no longer be undone",
                expired.deleted.id
            );
        }

        self.pending_undo = Some(PendingUndo {
            token,
            deleted,
            previous,
            generation: self.generation,
            deadline: Instant::now() + self.undo_timeout,
        });

        Ok(DeletedNotice {
            token,
            alert: Alert::success(DELETED_MESSAGE, ""),
            action: UNDO_ACTION,
            timeout: self.undo_timeout,
        })
    }

    /// Whether the deletion identified by `token` can still be undone.
    pub fn can_undo(&self, token: UndoToken) -> bool {
        self.pending_undo
            .as_ref()
            .is_some_and(|pending| pending.is_live(token))
    }

    /// Restore the transaction deleted with `token`.
    ///
    /// The transaction is created again with the same fields and a new ID.
    /// If the working set was not reloaded since the deletion, the working set
    /// from before the deletion is restored with the new transaction in the
    /// place of the deleted one. Otherwise the working set is queried again
    /// with the active filter, and if that query fails the working set is left
    /// as is until the next refresh.
    ///
    /// # Errors
    /// Returns an [Error::UndoUnavailable] if the deletion expired or `token`
    /// is unknown. Returns the store error if the insert fails, in which case
    /// the undo can be retried until it expires.
    pub async fn undo(&mut self, token: UndoToken) -> Result<Transaction, Error> {
        let pending = match self.pending_undo.take() {
            Some(pending) if pending.is_live(token) => pending,
            Some(pending) if pending.token != token => {
                self.pending_undo = Some(pending);
                return Err(Error::UndoUnavailable);
            }
            _ => return Err(Error::UndoUnavailable),
        };

        let restored = match self.store.insert(pending.deleted.to_builder()).await {
            Ok(restored) => restored,
            Err(error) => {
                tracing::error!(
                    "Could not restore transaction {}: {error}",
                    pending.deleted.id
                );
                self.pending_undo = Some(pending);
                return Err(error);
            }
        };

        tracing::info!(
            "Restored transaction {} as {}",
            pending.deleted.id,
            restored.id
        );

        if pending.generation == self.generation {
            self.working_set = pending
                .previous
                .iter()
                .map(|transaction| {
                    if transaction.id == pending.deleted.id {
                        restored.clone()
                    } else {
                        transaction.clone()
                    }
                })
                .collect();
        } else if let Err(error) = self.refresh().await {
            tracing::warn!(
                "Restored transaction {} but could not reload the list: {error}",
                restored.id
            );
        }

        Ok(restored)
    }

    /// The deletion notice identified by `token` was dismissed, so the
    /// deletion can no longer be undone.
    pub fn dismiss(&mut self, token: UndoToken) {
        if self
            .pending_undo
            .as_ref()
            .is_some_and(|pending| pending.token == token)
        {
            self.pending_undo = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };

    use crate::{
        AppConfig, Category, Error, Label, Transaction, TransactionType,
        alert::Alert,
        dashboard::{Dashboard, DashboardView, NEGATIVE_BALANCE_WARNING},
        database_id::TransactionId,
        db::open_in_memory,
        list::{DELETED_MESSAGE, ListController, UNDO_ACTION},
        stores::{BackgroundStore, SQLiteTransactionStore, TransactionStore},
        transaction::{TransactionBuilder, TransactionFilter},
    };

    /// Wraps the SQLite store and fails writes while `fail_writes` is set.
    #[derive(Clone)]
    struct FlakyStore {
        inner: SQLiteTransactionStore,
        fail_writes: Arc<AtomicBool>,
    }

    impl FlakyStore {
        fn check(&self) -> Result<(), Error> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(Error::DatabaseLockError)
            } else {
                Ok(())
            }
        }
    }

    impl TransactionStore for FlakyStore {
        fn insert(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
            self.check()?;
            self.inner.insert(builder)
        }

        fn update(&self, transaction: &Transaction) -> Result<(), Error> {
            self.check()?;
            self.inner.update(transaction)
        }

        fn delete(&self, id: TransactionId) -> Result<(), Error> {
            self.check()?;
            self.inner.delete(id)
        }

        fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
            self.inner.get(id)
        }

        fn get_query(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, Error> {
            self.inner.get_query(filter)
        }
    }

    fn get_store() -> FlakyStore {
        let connection = open_in_memory().unwrap();
        FlakyStore {
            inner: SQLiteTransactionStore::new(Arc::new(Mutex::new(connection))),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    fn get_controller(store: &FlakyStore, undo_timeout: Duration) -> ListController<FlakyStore> {
        ListController::new(
            BackgroundStore::new(store.clone()),
            &AppConfig { undo_timeout },
        )
    }

    fn build(label: &str, amount: f64) -> TransactionBuilder {
        Transaction::build(Label::new_unchecked(label), amount)
    }

    fn seed(store: &FlakyStore) -> Vec<Transaction> {
        vec![
            store
                .insert(build("Coffee", 4.5).category(Category::Food))
                .unwrap(),
            store
                .insert(
                    build("Pay", 2000.0)
                        .transaction_type(TransactionType::Income)
                        .category(Category::Salary),
                )
                .unwrap(),
            store
                .insert(build("Rent", 900.0).category(Category::Rent))
                .unwrap(),
            store
                .insert(build("Groceries", 85.2).category(Category::Groceries))
                .unwrap(),
        ]
    }

    const LONG: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn coffee_scenario() {
        let store = get_store();
        let coffee = store
            .insert(
                build("Coffee", 4.5)
                    .transaction_type(TransactionType::Expense)
                    .category(Category::Food),
            )
            .unwrap();
        let mut controller = get_controller(&store, LONG);

        controller.refresh().await.unwrap();

        assert_eq!(&*controller.working_set(), &[coffee]);
        let dashboard = controller.dashboard();
        assert_eq!(
            dashboard,
            Dashboard {
                balance: -4.5,
                income: 0.0,
                expense: 4.5
            }
        );
        let view = DashboardView::new(&dashboard);
        assert_eq!(view.expense, "$ 4.50");
        assert_eq!(view.income, "$ 0.00");
        assert_eq!(view.balance, "$ -4.50");
        assert_eq!(
            view.warning,
            Some(Alert::error_simple(NEGATIVE_BALANCE_WARNING))
        );
    }

    #[tokio::test]
    async fn delete_then_undo_restores_view_with_new_id() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();
        let before = controller.working_set();

        let notice = controller.delete(&seeded[1]).await.unwrap();

        assert_eq!(notice.alert, Alert::success(DELETED_MESSAGE, ""));
        assert_eq!(notice.action, UNDO_ACTION);
        assert_eq!(notice.timeout, LONG);
        assert_eq!(controller.working_set().len(), 3);
        assert!(controller.working_set().iter().all(|t| t.id != seeded[1].id));
        assert_eq!(store.get(seeded[1].id), Err(Error::NotFound));
        assert!(controller.can_undo(notice.token));

        let restored = controller.undo(notice.token).await.unwrap();

        assert_ne!(restored.id, seeded[1].id);
        assert_eq!(restored.to_builder(), seeded[1].to_builder());
        let mut want = before.to_vec();
        want[1] = restored.clone();
        assert_eq!(controller.working_set().to_vec(), want);
        assert_eq!(store.get(restored.id), Ok(restored));
        assert!(!controller.can_undo(notice.token));
    }

    #[tokio::test]
    async fn undo_after_filter_change_follows_filter() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();
        let notice = controller.delete(&seeded[0]).await.unwrap();

        controller.select_type(TransactionType::Income).await.unwrap();
        let restored = controller.undo(notice.token).await.unwrap();

        assert_eq!(restored.label.as_ref(), "Coffee");
        assert_eq!(store.get(restored.id), Ok(restored));
        let labels: Vec<_> = controller
            .working_set()
            .iter()
            .map(|t| t.label.to_string())
            .collect();
        assert_eq!(labels, vec!["Pay"]);
        assert!(
            controller
                .working_set()
                .iter()
                .all(|t| t.transaction_type == TransactionType::Income)
        );
    }

    #[tokio::test]
    async fn undo_after_refresh_keeps_changes_made_elsewhere() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();
        let notice = controller.delete(&seeded[1]).await.unwrap();

        // Another screen edits a transaction while the notice is visible.
        let mut edited = seeded[2].clone();
        edited.amount = 950.0;
        store.update(&edited).unwrap();
        controller.refresh().await.unwrap();

        let restored = controller.undo(notice.token).await.unwrap();

        let working_set = controller.working_set();
        assert_eq!(working_set.len(), 4);
        assert!(working_set.contains(&edited));
        assert_eq!(working_set.last(), Some(&restored));
    }

    #[tokio::test]
    async fn undo_twice_is_unavailable() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();
        let notice = controller.delete(&seeded[0]).await.unwrap();
        controller.undo(notice.token).await.unwrap();

        assert_eq!(
            controller.undo(notice.token).await,
            Err(Error::UndoUnavailable)
        );
        assert_eq!(store.get_all().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn undo_after_timeout_is_unavailable() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, Duration::ZERO);
        controller.refresh().await.unwrap();

        let notice = controller.delete(&seeded[0]).await.unwrap();

        assert!(!controller.can_undo(notice.token));
        assert_eq!(
            controller.undo(notice.token).await,
            Err(Error::UndoUnavailable)
        );
        assert_eq!(store.get_all().unwrap().len(), 3);
        assert_eq!(controller.working_set().len(), 3);
    }

    #[tokio::test]
    async fn undo_after_dismiss_is_unavailable() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();
        let notice = controller.delete(&seeded[0]).await.unwrap();

        controller.dismiss(notice.token);

        assert_eq!(
            controller.undo(notice.token).await,
            Err(Error::UndoUnavailable)
        );
    }

    #[tokio::test]
    async fn second_delete_expires_first() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();

        let first = controller.delete(&seeded[0]).await.unwrap();
        let second = controller.delete(&seeded[1]).await.unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(
            controller.undo(first.token).await,
            Err(Error::UndoUnavailable)
        );
        assert!(controller.can_undo(second.token));

        let restored = controller.undo(second.token).await.unwrap();

        let labels: Vec<_> = controller
            .working_set()
            .iter()
            .map(|t| t.label.to_string())
            .collect();
        assert_eq!(labels, vec!["Pay", "Rent", "Groceries"]);
        assert_eq!(restored.label.as_ref(), "Pay");
    }

    #[tokio::test]
    async fn failed_delete_changes_nothing() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);

        let result = controller.delete(&seeded[0]).await;

        assert_eq!(result, Err(Error::DatabaseLockError));
        assert_eq!(controller.working_set().len(), 4);
        assert_eq!(
            result.unwrap_err().alert().message,
            "Something went wrong"
        );
    }

    #[tokio::test]
    async fn failed_undo_can_be_retried() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();
        let notice = controller.delete(&seeded[2]).await.unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);

        assert_eq!(
            controller.undo(notice.token).await,
            Err(Error::DatabaseLockError)
        );
        assert_eq!(controller.working_set().len(), 3);
        assert!(controller.can_undo(notice.token));

        store.fail_writes.store(false, Ordering::SeqCst);
        let restored = controller.undo(notice.token).await.unwrap();

        assert_eq!(restored.label.as_ref(), "Rent");
        assert_eq!(controller.working_set().len(), 4);
    }

    #[tokio::test]
    async fn filters_are_last_selected_wins_per_axis() {
        let store = get_store();
        seed(&store);
        store
            .insert(build("Bonus", 500.0).transaction_type(TransactionType::Income))
            .unwrap();
        let mut controller = get_controller(&store, LONG);

        controller.select_type(TransactionType::Expense).await.unwrap();
        assert_eq!(controller.working_set().len(), 3);

        controller.select_type(TransactionType::Income).await.unwrap();
        assert_eq!(controller.working_set().len(), 2);

        controller.select_category(Category::Food).await.unwrap();
        assert_eq!(
            controller.filter(),
            TransactionFilter {
                transaction_type: Some(TransactionType::Income),
                category: Some(Category::Food),
            }
        );
        let labels: Vec<_> = controller
            .working_set()
            .iter()
            .map(|t| t.label.to_string())
            .collect();
        assert_eq!(labels, vec!["Bonus"]);

        controller.select_category(Category::Salary).await.unwrap();
        let labels: Vec<_> = controller
            .working_set()
            .iter()
            .map(|t| t.label.to_string())
            .collect();
        assert_eq!(labels, vec!["Pay"]);

        controller.clear_filters().await.unwrap();
        assert_eq!(controller.working_set().len(), 5);
    }

    #[tokio::test]
    async fn refresh_picks_up_changes_made_elsewhere() {
        let store = get_store();
        let seeded = seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();
        let snapshot = controller.working_set();

        // Another screen edits and adds transactions.
        let mut edited = seeded[0].clone();
        edited.amount = 5.0;
        store.update(&edited).unwrap();
        store.insert(build("Bus", 3.0)).unwrap();

        assert_eq!(controller.working_set(), snapshot);

        controller.refresh().await.unwrap();

        assert_eq!(controller.working_set().len(), 5);
        assert_eq!(controller.working_set()[0].amount, 5.0);
        assert_eq!(snapshot[0].amount, 4.5);
    }

    #[tokio::test]
    async fn rows_follow_working_set() {
        let store = get_store();
        seed(&store);
        let mut controller = get_controller(&store, LONG);
        controller.refresh().await.unwrap();

        let amounts: Vec<_> = controller.rows().into_iter().map(|row| row.amount).collect();

        assert_eq!(
            amounts,
            vec!["- $4.50", "+ $2000.00", "- $900.00", "- $85.20"]
        );
    }
}
