use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Payment,
};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: Payment) -> AppResult<Payment>;
    async fn find_by_transaction_id(&self, transaction_id: &str) -> AppResult<Option<Payment>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoPaymentRepository {
    collection: Collection<Payment>,
}

impl MongoPaymentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("payments");
        Self { collection }
    }
}

#[async_trait]
impl PaymentRepository for MongoPaymentRepository {
    async fn create(&self, mut payment: Payment) -> AppResult<Payment> {
        let result = self.collection.insert_one(&payment).await.map_err(|e| {
            let transaction_id = payment.transaction_id.clone();
            AppError::from_mongo_write(e, || {
                AppError::AlreadyExists(format!(
                    "Payment with transaction id '{}' already exists",
                    transaction_id
                ))
            })
        })?;

        payment.id = result.inserted_id.as_object_id();
        Ok(payment)
    }

    async fn find_by_transaction_id(&self, transaction_id: &str) -> AppResult<Option<Payment>> {
        let payment = self
            .collection
            .find_one(doc! { "transaction_id": transaction_id })
            .await?;
        Ok(payment)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let txn_index = IndexModel::builder()
            .keys(doc! { "transaction_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("transaction_id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(txn_index).await?;
        log::info!("✓ Created unique index on payments.transaction_id");

        Ok(())
    }
}
