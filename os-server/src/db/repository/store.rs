//! Store Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Store, StoreCreate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "store";

#[derive(Debug, serde::Deserialize)]
struct StoreRecord {
    id: RecordId,
    company: RecordId,
    name: String,
    phone: Option<String>,
    address: Option<String>,
    created_at: i64,
}

#[derive(Debug, serde::Serialize)]
struct StoreInsert {
    company: RecordId,
    name: String,
    phone: Option<String>,
    address: Option<String>,
    created_at: i64,
}

impl From<StoreRecord> for Store {
    fn from(r: StoreRecord) -> Self {
        Store {
            id: r.id.to_string(),
            company_id: r.company.to_string(),
            name: r.name,
            phone: r.phone,
            address: r.address,
            created_at: r.created_at,
        }
    }
}

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: StoreCreate) -> RepoResult<Store> {
        let company = parse_record_id("company", &data.company_id)?;
        let insert = StoreInsert {
            company,
            name: data.name,
            phone: data.phone,
            address: data.address,
            created_at: now_millis(),
        };
        let created: Option<StoreRecord> = self.base.db().create(TABLE).content(insert).await?;
        created
            .map(Into::into)
            .ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Store>> {
        let rid = parse_record_id(TABLE, id)?;
        let record: Option<StoreRecord> = self.base.db().select(rid).await?;
        Ok(record.map(Into::into))
    }

    pub async fn list_by_company(&self, company_id: &str) -> RepoResult<Vec<Store>> {
        let company = parse_record_id("company", company_id)?;
        let records: Vec<StoreRecord> = self
            .base
            .db()
            .query("SELECT * FROM store WHERE company = $company ORDER BY created_at")
            .bind(("company", company))
            .await?
            .take(0)?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}
