//! Company Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Company, CompanyCreate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "company";

#[derive(Debug, serde::Deserialize)]
struct CompanyRecord {
    id: RecordId,
    name: String,
    document: Option<String>,
    created_at: i64,
}

#[derive(Debug, serde::Serialize)]
struct CompanyInsert {
    name: String,
    document: Option<String>,
    created_at: i64,
}

impl From<CompanyRecord> for Company {
    fn from(r: CompanyRecord) -> Self {
        Company {
            id: r.id.to_string(),
            name: r.name,
            document: r.document,
            created_at: r.created_at,
        }
    }
}

#[derive(Clone)]
pub struct CompanyRepository {
    base: BaseRepository,
}

impl CompanyRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: CompanyCreate) -> RepoResult<Company> {
        let insert = CompanyInsert {
            name: data.name,
            document: data.document,
            created_at: now_millis(),
        };
        let created: Option<CompanyRecord> =
            self.base.db().create(TABLE).content(insert).await?;
        created
            .map(Into::into)
            .ok_or_else(|| RepoError::Database("Failed to create company".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Company>> {
        let rid = parse_record_id(TABLE, id)?;
        let record: Option<CompanyRecord> = self.base.db().select(rid).await?;
        Ok(record.map(Into::into))
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Company>> {
        let records: Vec<CompanyRecord> = self
            .base
            .db()
            .query("SELECT * FROM company ORDER BY created_at")
            .await?
            .take(0)?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}
