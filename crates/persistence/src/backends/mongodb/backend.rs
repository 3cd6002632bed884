//! MongoDB backend implementation.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::core::ObservationRepository;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::search::{ObservationFilterBuilder, ObservationQuery};
use crate::types::{Observation, ObservationSearchParams};

use super::document::{
    OPTIONAL_FIELDS, document_to_observation, observation_to_document, to_bson_datetime,
};

const RESOURCE_TYPE: &str = "Observation";

/// Name of the collection holding observations.
pub const OBSERVATIONS_COLLECTION: &str = "observations";

/// Configuration for the MongoDB backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Connection string.
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Database name.
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "vitalink".to_string()
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
        }
    }
}

/// MongoDB backend for Observation storage.
pub struct MongoBackend {
    client: Client,
    collection: Collection<Document>,
    config: MongoConfig,
}

impl Debug for MongoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoBackend")
            .field("database", &self.config.database)
            .finish_non_exhaustive()
    }
}

impl MongoBackend {
    /// Connects and verifies the server answers a ping.
    pub async fn new(config: MongoConfig) -> StorageResult<Self> {
        let client = Client::with_uri_str(&config.uri).await.map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "mongodb".to_string(),
                message: e.to_string(),
            })
        })?;

        let backend = Self {
            collection: client
                .database(&config.database)
                .collection::<Document>(OBSERVATIONS_COLLECTION),
            client,
            config,
        };

        backend.ping().await.map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "mongodb".to_string(),
                message: e.to_string(),
            })
        })?;

        tracing::info!(database = %backend.config.database, "Connected to MongoDB");

        Ok(backend)
    }

    /// Sends `ping` to the configured database.
    async fn ping(&self) -> StorageResult<()> {
        self.client
            .database(&self.config.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    fn filter_builder(&self) -> ObservationFilterBuilder {
        ObservationFilterBuilder::new()
    }

    async fn find_one(&self, oid: ObjectId, id: &str) -> StorageResult<Observation> {
        match self.collection.find_one(doc! { "_id": oid }).await? {
            Some(doc) => document_to_observation(&doc),
            None => Err(StorageError::not_found(RESOURCE_TYPE, id)),
        }
    }

    async fn find_many(&self, query: ObservationQuery) -> StorageResult<Vec<Observation>> {
        let mut cursor = self
            .collection
            .find(query.filter)
            .sort(query.sort)
            .skip(query.skip)
            .limit(query.limit)
            .await?;

        let mut observations = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            observations.push(document_to_observation(&doc)?);
        }
        Ok(observations)
    }
}

/// Malformed ids are a query error, not a miss.
fn parse_object_id(id: &str) -> StorageResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| {
        StorageError::Backend(BackendError::QueryError {
            message: format!("invalid observation ID: {}", id),
        })
    })
}

#[async_trait]
impl ObservationRepository for MongoBackend {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn create(&self, observation: Observation) -> StorageResult<Observation> {
        let oid = ObjectId::new();
        // BSON datetimes carry milliseconds.
        let now = Utc::now().trunc_subsecs(3);

        let stored = Observation {
            id: Some(oid.to_hex()),
            created_at: Some(now),
            updated_at: Some(now),
            ..observation
        };

        let mut doc = observation_to_document(&stored);
        doc.insert("_id", oid);
        self.collection.insert_one(doc).await?;

        tracing::debug!(id = %oid, patient_id = %stored.patient_id, "Created observation");

        Ok(stored)
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Observation> {
        let oid = parse_object_id(id)?;
        self.find_one(oid, id).await
    }

    async fn get_by_patient_id(
        &self,
        patient_id: &str,
        limit: u32,
        offset: u64,
    ) -> StorageResult<Vec<Observation>> {
        self.find_many(self.filter_builder().build_for_patient(patient_id, limit, offset))
            .await
    }

    async fn get_all(&self, limit: u32, offset: u64) -> StorageResult<Vec<Observation>> {
        self.find_many(self.filter_builder().build_list(limit, offset))
            .await
    }

    async fn search(&self, params: &ObservationSearchParams) -> StorageResult<Vec<Observation>> {
        let query = self.filter_builder().build(params);
        tracing::debug!(filter = %query.filter, sort = %query.sort, "Executing observation search");
        self.find_many(query).await
    }

    async fn update(&self, observation: Observation) -> StorageResult<Observation> {
        let id = observation.id_str().to_string();
        let oid = parse_object_id(&id)?;

        let mut set = observation_to_document(&Observation {
            created_at: None,
            updated_at: None,
            ..observation
        });
        set.insert("updated_at", to_bson_datetime(Utc::now()));

        let unset: Document = OPTIONAL_FIELDS
            .iter()
            .filter(|field| !set.contains_key(**field))
            .map(|field| (field.to_string(), Bson::String(String::new())))
            .collect();
        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }

        let result = self
            .collection
            .update_one(doc! { "_id": oid }, update)
            .await?;

        if result.matched_count == 0 {
            return Err(StorageError::not_found(RESOURCE_TYPE, id));
        }

        self.find_one(oid, &id).await
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let oid = parse_object_id(id)?;

        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        if result.deleted_count == 0 {
            return Err(StorageError::not_found(RESOURCE_TYPE, id));
        }

        tracing::debug!(id = %id, "Deleted observation");
        Ok(())
    }
}
