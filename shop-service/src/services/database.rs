use crate::models::{Address, Category, Product, ProductImage, Session, User, Wishlist};
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for shop-service");

        // Unique email (emails are stored lowercased, so this is
        // case-insensitive in practice)
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.users().create_index(email_index, None).await?;

        // Session lookups during rotation are always per user
        let session_user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("session_user_lookup".to_string())
                    .build(),
            )
            .build();
        self.sessions().create_index(session_user_index, None).await?;

        // TTL monitor evicts expired sessions in the background. Matching
        // still checks expiry itself; this is only housekeeping.
        let session_ttl_index = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("session_expiry_ttl".to_string())
                    .expire_after(Duration::from_secs(0))
                    .build(),
            )
            .build();
        self.sessions().create_index(session_ttl_index, None).await?;

        let product_slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .name("product_slug_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.products().create_index(product_slug_index, None).await?;

        let product_category_index = IndexModel::builder()
            .keys(doc! { "category_id": 1, "is_active": 1 })
            .options(
                IndexOptions::builder()
                    .name("product_category_lookup".to_string())
                    .build(),
            )
            .build();
        self.products()
            .create_index(product_category_index, None)
            .await?;

        let category_slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .name("category_slug_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.categories()
            .create_index(category_slug_index, None)
            .await?;

        let wishlist_user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("wishlist_user_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.wishlists()
            .create_index(wishlist_user_index, None)
            .await?;

        let address_user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("address_user_lookup".to_string())
                    .build(),
            )
            .build();
        self.addresses()
            .create_index(address_user_index, None)
            .await?;

        tracing::info!("MongoDB indexes ready");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn sessions(&self) -> Collection<Session> {
        self.db.collection("sessions")
    }

    pub fn products(&self) -> Collection<Product> {
        self.db.collection("products")
    }

    pub fn product_images(&self) -> Collection<ProductImage> {
        self.db.collection("product_images")
    }

    pub fn categories(&self) -> Collection<Category> {
        self.db.collection("categories")
    }

    pub fn addresses(&self) -> Collection<Address> {
        self.db.collection("addresses")
    }

    pub fn wishlists(&self) -> Collection<Wishlist> {
        self.db.collection("wishlists")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // ==================== User lookups ====================

    pub async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "_id": user_id }, None).await?)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users()
            .find_one(doc! { "email": email.to_lowercase() }, None)
            .await?)
    }

    // ==================== Session store ====================

    pub async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        self.sessions().insert_one(session, None).await?;
        Ok(())
    }

    /// All stored session records for a user. Expiry filtering is the
    /// matcher's responsibility, not the store's.
    pub async fn find_sessions_for_user(&self, user_id: &str) -> Result<Vec<Session>, AppError> {
        use futures::stream::TryStreamExt;

        let mut cursor = self
            .sessions()
            .find(doc! { "user_id": user_id }, None)
            .await?;

        let mut sessions = Vec::new();
        while let Some(session) = cursor.try_next().await? {
            sessions.push(session);
        }
        Ok(sessions)
    }

    /// Conditional single-document delete. Returns true only for the caller
    /// that actually removed the record, so concurrent rotations of the same
    /// credential cannot both win.
    pub async fn delete_session(&self, session_id: &str) -> Result<bool, AppError> {
        let result = self
            .sessions()
            .delete_one(doc! { "_id": session_id }, None)
            .await?;
        Ok(result.deleted_count == 1)
    }

    /// Idempotent: deleting for a user with no sessions is a no-op.
    pub async fn delete_sessions_for_user(&self, user_id: &str) -> Result<u64, AppError> {
        let result = self
            .sessions()
            .delete_many(doc! { "user_id": user_id }, None)
            .await?;
        Ok(result.deleted_count)
    }

    /// Login housekeeping: drop stale sessions previously opened from the
    /// same device (matched on user agent).
    pub async fn delete_sessions_for_device(
        &self,
        user_id: &str,
        user_agent: &str,
    ) -> Result<u64, AppError> {
        let result = self
            .sessions()
            .delete_many(doc! { "user_id": user_id, "user_agent": user_agent }, None)
            .await?;
        Ok(result.deleted_count)
    }
}
