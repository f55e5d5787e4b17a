//! Client Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Client, ClientCreate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "client";

#[derive(Debug, serde::Deserialize)]
struct ClientRecord {
    id: RecordId,
    store: RecordId,
    name: String,
    phone: String,
    email: Option<String>,
    created_at: i64,
}

#[derive(Debug, serde::Serialize)]
struct ClientInsert {
    store: RecordId,
    name: String,
    phone: String,
    email: Option<String>,
    created_at: i64,
}

impl From<ClientRecord> for Client {
    fn from(r: ClientRecord) -> Self {
        Client {
            id: r.id.to_string(),
            store_id: r.store.to_string(),
            name: r.name,
            phone: r.phone,
            email: r.email,
            created_at: r.created_at,
        }
    }
}

#[derive(Clone)]
pub struct ClientRepository {
    base: BaseRepository,
}

impl ClientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: ClientCreate) -> RepoResult<Client> {
        let store = parse_record_id("store", &data.store_id)?;
        let insert = ClientInsert {
            store,
            name: data.name,
            phone: data.phone,
            email: data.email,
            created_at: now_millis(),
        };
        let created: Option<ClientRecord> = self.base.db().create(TABLE).content(insert).await?;
        created
            .map(Into::into)
            .ok_or_else(|| RepoError::Database("Failed to create client".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Client>> {
        let rid = parse_record_id(TABLE, id)?;
        let record: Option<ClientRecord> = self.base.db().select(rid).await?;
        Ok(record.map(Into::into))
    }

    pub async fn list_by_store(&self, store_id: &str) -> RepoResult<Vec<Client>> {
        let store = parse_record_id("store", store_id)?;
        let records: Vec<ClientRecord> = self
            .base
            .db()
            .query("SELECT * FROM client WHERE store = $store ORDER BY name")
            .bind(("store", store))
            .await?
            .take(0)?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}
