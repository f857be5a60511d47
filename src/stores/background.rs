//! Runs store operations on the blocking thread pool so that callers can
//! await them without stalling the async runtime.

use tokio::task::{self, JoinError};

use crate::{
    Error,
    database_id::TransactionId,
    stores::TransactionStore,
    transaction::{Category, Transaction, TransactionBuilder, TransactionFilter, TransactionType},
};

/// Async front for a [TransactionStore].
///
/// Every operation is moved onto [tokio::task::spawn_blocking] with a clone of
/// the store, and the returned future resolves once the operation finished.
/// Dropping the future does not abort an operation that already started, so a
/// write issued by a screen that goes away still completes.
#[derive(Debug, Clone)]
pub struct BackgroundStore<S> {
    store: S,
}

impl<S> BackgroundStore<S>
where
    S: TransactionStore,
{
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn run<T, F>(&self, operation: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(S) -> Result<T, Error> + Send + 'static,
    {
        let store = self.store.clone();

        task::spawn_blocking(move || operation(store))
            .await
            .map_err(background_task_failed)?
    }

    /// See [TransactionStore::insert].
    pub async fn insert(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        self.run(move |store| store.insert(builder)).await
    }

    /// See [TransactionStore::update].
    pub async fn update(&self, transaction: Transaction) -> Result<(), Error> {
        self.run(move |store| store.update(&transaction)).await
    }

    /// See [TransactionStore::delete].
    pub async fn delete(&self, id: TransactionId) -> Result<(), Error> {
        self.run(move |store| store.delete(id)).await
    }

    /// See [TransactionStore::get].
    pub async fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.run(move |store| store.get(id)).await
    }

    /// See [TransactionStore::get_all].
    pub async fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.run(|store| store.get_all()).await
    }

    /// See [TransactionStore::get_all_by_type].
    pub async fn get_all_by_type(
        &self,
        transaction_type: TransactionType,
    ) -> Result<Vec<Transaction>, Error> {
        self.run(move |store| store.get_all_by_type(transaction_type))
            .await
    }

    /// See [TransactionStore::get_all_by_category].
    pub async fn get_all_by_category(&self, category: Category) -> Result<Vec<Transaction>, Error> {
        self.run(move |store| store.get_all_by_category(category))
            .await
    }

    /// See [TransactionStore::get_all_by_type_and_category].
    pub async fn get_all_by_type_and_category(
        &self,
        transaction_type: TransactionType,
        category: Category,
    ) -> Result<Vec<Transaction>, Error> {
        self.run(move |store| store.get_all_by_type_and_category(transaction_type, category))
            .await
    }

    /// See [TransactionStore::get_filtered].
    pub async fn get_filtered(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, Error> {
        self.run(move |store| store.get_filtered(filter)).await
    }
}

fn background_task_failed(error: JoinError) -> Error {
    tracing::error!("A background store task did not finish: {error}");
    Error::BackgroundTaskFailed(error.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{
        Category, Error, Label, Transaction, TransactionType,
        database_id::TransactionId,
        db::open_in_memory,
        stores::{BackgroundStore, SQLiteTransactionStore, TransactionStore},
        transaction::{TransactionBuilder, TransactionFilter},
    };

    fn get_store() -> BackgroundStore<SQLiteTransactionStore> {
        let connection = open_in_memory().unwrap();
        BackgroundStore::new(SQLiteTransactionStore::new(Arc::new(Mutex::new(
            connection,
        ))))
    }

    #[tokio::test]
    async fn insert_update_delete() {
        let store = get_store();
        let created = store
            .insert(Transaction::build(Label::new_unchecked("Coffee"), 4.5))
            .await
            .unwrap();
        let mut edited = created.clone();
        edited.amount = 5.0;

        store.update(edited.clone()).await.unwrap();
        assert_eq!(store.get(created.id).await, Ok(edited));

        store.delete(created.id).await.unwrap();
        assert_eq!(store.get_all().await, Ok(vec![]));
    }

    #[tokio::test]
    async fn filtered_queries() {
        let store = get_store();
        let pay = store
            .insert(
                Transaction::build(Label::new_unchecked("Pay"), 100.0)
                    .transaction_type(TransactionType::Income)
                    .category(Category::Salary),
            )
            .await
            .unwrap();
        store
            .insert(Transaction::build(Label::new_unchecked("Lunch"), 10.0))
            .await
            .unwrap();

        assert_eq!(
            store.get_all_by_type(TransactionType::Income).await,
            Ok(vec![pay.clone()])
        );
        assert_eq!(
            store.get_all_by_category(Category::Salary).await,
            Ok(vec![pay.clone()])
        );
        assert_eq!(
            store
                .get_all_by_type_and_category(TransactionType::Income, Category::Food)
                .await,
            Ok(vec![])
        );
        assert_eq!(
            store.get_filtered(TransactionFilter::default()).await.map(|all| all.len()),
            Ok(2)
        );
    }

    /// A store whose operations always panic.
    #[derive(Clone)]
    struct PanickingStore;

    impl TransactionStore for PanickingStore {
        fn insert(&self, _: TransactionBuilder) -> Result<Transaction, Error> {
            panic!("disk on fire")
        }

        fn update(&self, _: &Transaction) -> Result<(), Error> {
            panic!("disk on fire")
        }

        fn delete(&self, _: TransactionId) -> Result<(), Error> {
            panic!("disk on fire")
        }

        fn get(&self, _: TransactionId) -> Result<Transaction, Error> {
            panic!("disk on fire")
        }

        fn get_query(&self, _: TransactionFilter) -> Result<Vec<Transaction>, Error> {
            panic!("disk on fire")
        }
    }

    #[tokio::test]
    async fn panicking_operation_becomes_error() {
        let store = BackgroundStore::new(PanickingStore);

        let result = store.get_all().await;

        assert!(matches!(result, Err(Error::BackgroundTaskFailed(_))));
    }
}
