//! Channel Config Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{ChannelConfig, ChannelConfigCreate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "channel_config";

#[derive(Debug, serde::Deserialize)]
struct ChannelConfigRecord {
    id: RecordId,
    company: RecordId,
    instance_name: String,
    api_url: String,
    api_key: String,
    is_connected: bool,
    phone_number: Option<String>,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, serde::Serialize)]
struct ChannelConfigInsert {
    company: RecordId,
    instance_name: String,
    api_url: String,
    api_key: String,
    is_connected: bool,
    phone_number: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<ChannelConfigRecord> for ChannelConfig {
    fn from(r: ChannelConfigRecord) -> Self {
        ChannelConfig {
            id: r.id.to_string(),
            company_id: r.company.to_string(),
            instance_name: r.instance_name,
            api_url: r.api_url,
            api_key: r.api_key,
            is_connected: r.is_connected,
            phone_number: r.phone_number,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct ChannelConfigRepository {
    base: BaseRepository,
}

impl ChannelConfigRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create the company's channel config
    ///
    /// Exactly one per company: a second setup attempt is a duplicate.
    pub async fn create(&self, data: ChannelConfigCreate) -> RepoResult<ChannelConfig> {
        if self.find_by_company(&data.company_id).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Company {} already has a channel config",
                data.company_id
            )));
        }

        let now = now_millis();
        let insert = ChannelConfigInsert {
            company: parse_record_id("company", &data.company_id)?,
            instance_name: data.instance_name,
            api_url: data.api_url,
            api_key: data.api_key,
            is_connected: false,
            phone_number: None,
            created_at: now,
            updated_at: now,
        };
        let created: Option<ChannelConfigRecord> =
            self.base.db().create(TABLE).content(insert).await?;
        created
            .map(Into::into)
            .ok_or_else(|| RepoError::Database("Failed to create channel config".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ChannelConfig>> {
        let rid = parse_record_id(TABLE, id)?;
        let record: Option<ChannelConfigRecord> = self.base.db().select(rid).await?;
        Ok(record.map(Into::into))
    }

    pub async fn find_by_company(&self, company_id: &str) -> RepoResult<Option<ChannelConfig>> {
        let company = parse_record_id("company", company_id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM channel_config WHERE company = $company LIMIT 1")
            .bind(("company", company))
            .await?;
        let records: Vec<ChannelConfigRecord> = result.take(0)?;
        Ok(records.into_iter().next().map(Into::into))
    }

    /// Persist the observed connection state and paired address
    pub async fn set_connection(
        &self,
        id: &str,
        is_connected: bool,
        phone_number: Option<String>,
    ) -> RepoResult<ChannelConfig> {
        let rid = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET is_connected = $connected, phone_number = $phone, \
                 updated_at = $now RETURN AFTER",
            )
            .bind(("id", rid))
            .bind(("connected", is_connected))
            .bind(("phone", phone_number))
            .bind(("now", now_millis()))
            .await?;
        let records: Vec<ChannelConfigRecord> = result.take(0)?;
        records
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| RepoError::NotFound(format!("Channel config {} not found", id)))
    }
}
