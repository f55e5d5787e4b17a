//! Message Template Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{MessageTemplate, MessageTemplateUpdate};
use shared::models::OrderStatus;
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "message_template";

#[derive(Debug, serde::Deserialize)]
struct TemplateRecord {
    id: RecordId,
    channel_config: RecordId,
    trigger_status: OrderStatus,
    content: String,
    is_active: bool,
    is_default: bool,
    created_at: i64,
}

#[derive(Debug, serde::Serialize)]
struct TemplateInsert {
    channel_config: RecordId,
    trigger_status: OrderStatus,
    content: String,
    is_active: bool,
    is_default: bool,
    created_at: i64,
}

impl From<TemplateRecord> for MessageTemplate {
    fn from(r: TemplateRecord) -> Self {
        MessageTemplate {
            id: r.id.to_string(),
            channel_config_id: r.channel_config.to_string(),
            trigger_status: r.trigger_status,
            content: r.content,
            is_active: r.is_active,
            is_default: r.is_default,
            created_at: r.created_at,
        }
    }
}

#[derive(Clone)]
pub struct MessageTemplateRepository {
    base: BaseRepository,
}

impl MessageTemplateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(
        &self,
        channel_config_id: &str,
        trigger_status: OrderStatus,
        content: String,
        is_default: bool,
    ) -> RepoResult<MessageTemplate> {
        let insert = TemplateInsert {
            channel_config: parse_record_id("channel_config", channel_config_id)?,
            trigger_status,
            content,
            is_active: true,
            is_default,
            created_at: now_millis(),
        };
        let created: Option<TemplateRecord> =
            self.base.db().create(TABLE).content(insert).await?;
        created
            .map(Into::into)
            .ok_or_else(|| RepoError::Database("Failed to create template".to_string()))
    }

    /// Active template consulted at dispatch time
    ///
    /// Constraint: when several templates are active for the same
    /// (config, status) pair, the oldest one wins. The ordering makes
    /// the pick deterministic rather than ambiguous.
    pub async fn find_active(
        &self,
        channel_config_id: &str,
        trigger_status: OrderStatus,
    ) -> RepoResult<Option<MessageTemplate>> {
        let config = parse_record_id("channel_config", channel_config_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM message_template WHERE channel_config = $config \
                 AND trigger_status = $status AND is_active = true \
                 ORDER BY created_at ASC LIMIT 1",
            )
            .bind(("config", config))
            .bind(("status", trigger_status))
            .await?;
        let records: Vec<TemplateRecord> = result.take(0)?;
        Ok(records.into_iter().next().map(Into::into))
    }

    pub async fn list_by_config(&self, channel_config_id: &str) -> RepoResult<Vec<MessageTemplate>> {
        let config = parse_record_id("channel_config", channel_config_id)?;
        let records: Vec<TemplateRecord> = self
            .base
            .db()
            .query(
                "SELECT * FROM message_template WHERE channel_config = $config \
                 ORDER BY created_at",
            )
            .bind(("config", config))
            .await?
            .take(0)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MessageTemplate>> {
        let rid = parse_record_id(TABLE, id)?;
        let record: Option<TemplateRecord> = self.base.db().select(rid).await?;
        Ok(record.map(Into::into))
    }

    pub async fn update(&self, id: &str, data: MessageTemplateUpdate) -> RepoResult<MessageTemplate> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Template {} not found", id)))?;

        let content = data.content.unwrap_or(existing.content);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        let rid = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET content = $content, is_active = $active RETURN AFTER")
            .bind(("id", rid))
            .bind(("content", content))
            .bind(("active", is_active))
            .await?;
        let records: Vec<TemplateRecord> = result.take(0)?;
        records
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| RepoError::NotFound(format!("Template {} not found", id)))
    }

    /// Delete a custom template
    ///
    /// Default templates can only be deactivated, never deleted.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Template {} not found", id)))?;
        if existing.is_default {
            return Err(RepoError::Validation(
                "Default templates cannot be deleted, only deactivated".to_string(),
            ));
        }
        let rid = parse_record_id(TABLE, id)?;
        let _: Option<TemplateRecord> = self.base.db().delete(rid).await?;
        Ok(())
    }
}
