//! Notification worker
//!
//! Consumes NotificationJobs from the outbox channel and performs the
//! actual dispatch: policy decision, idempotency claim, template
//! rendering, document generation and delivery. Every failure in here
//! is traced and swallowed: by the time a job exists, the order
//! transition has already succeeded.

use std::sync::Arc;

use chrono_tz::Tz;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::context::{OrderContext, ServiceLine};
use super::email::EmailApi;
use super::policy::{self, DispatchIntent, IdempotencyKey};
use super::service::NotificationJob;
use super::template;
use crate::channel::ChannelApiFactory;
use crate::db::models::ChannelConfig;
use crate::db::repository::{
    ChannelConfigRepository, ClientRepository, CompanyRepository, MessageTemplateRepository,
    RepoResult, ServiceOrderRepository, StoreRepository,
};
use crate::notify::dispatcher::MessageDispatcher;
use crate::receipt::ReceiptRenderer;
use shared::models::{DispatchChannel, OrderStatus};

pub struct NotificationWorker {
    orders: ServiceOrderRepository,
    clients: ClientRepository,
    stores: StoreRepository,
    companies: CompanyRepository,
    channel_configs: ChannelConfigRepository,
    templates: MessageTemplateRepository,
    dispatcher: MessageDispatcher,
    renderer: ReceiptRenderer,
    email: Arc<dyn EmailApi>,
    channel_factory: Arc<dyn ChannelApiFactory>,
}

impl NotificationWorker {
    pub fn new(
        db: Surreal<Db>,
        country_code: String,
        timezone: Tz,
        email: Arc<dyn EmailApi>,
        channel_factory: Arc<dyn ChannelApiFactory>,
    ) -> Self {
        Self {
            orders: ServiceOrderRepository::new(db.clone()),
            clients: ClientRepository::new(db.clone()),
            stores: StoreRepository::new(db.clone()),
            companies: CompanyRepository::new(db.clone()),
            channel_configs: ChannelConfigRepository::new(db.clone()),
            templates: MessageTemplateRepository::new(db.clone()),
            dispatcher: MessageDispatcher::new(db, country_code),
            renderer: ReceiptRenderer::new(timezone),
            email,
            channel_factory,
        }
    }

    /// Run the worker until shutdown (drains pending jobs on cancel)
    pub async fn run(self, mut rx: mpsc::Receiver<NotificationJob>, shutdown: CancellationToken) {
        tracing::info!("📨 Notification worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    rx.close();
                    while let Some(job) = rx.recv().await {
                        self.handle_job(job).await;
                    }
                    break;
                }
                job = rx.recv() => match job {
                    Some(job) => self.handle_job(job).await,
                    None => break,
                },
            }
        }

        tracing::info!("Notification channel closed, worker stopping");
    }

    /// Execute one job; all errors end up in the trace/message log
    pub(crate) async fn handle_job(&self, job: NotificationJob) {
        let ctx = match self.load_context(&job).await {
            Ok(Some(ctx)) => ctx,
            Ok(None) => {
                tracing::warn!(order_id = %job.order_id, "Order vanished before notification");
                return;
            }
            Err(e) => {
                tracing::error!(order_id = %job.order_id, error = %e, "Failed to load notification context");
                return;
            }
        };

        let intents = policy::decide(job.previous, job.status, &ctx);
        if intents.is_empty() {
            tracing::debug!(order = %ctx.order_number, "Transition produced no dispatch intents");
            return;
        }

        let config = match self.channel_configs.find_by_company(&ctx.company_id).await {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Channel config lookup failed");
                None
            }
        };

        for intent in intents {
            self.execute_intent(&intent, &ctx, config.as_ref()).await;
        }
    }

    async fn execute_intent(
        &self,
        intent: &DispatchIntent,
        ctx: &OrderContext,
        config: Option<&ChannelConfig>,
    ) {
        // Claim the idempotency flag first; only the caller whose write
        // took effect dispatches, so retried transitions cannot double-send.
        if let Some(key) = intent.idempotency {
            let claim = match key {
                IdempotencyKey::WhatsappSent => {
                    self.orders.claim_whatsapp_sent(&ctx.order_id).await
                }
                IdempotencyKey::EmailSent => self.orders.claim_email_sent(&ctx.order_id).await,
            };
            match claim {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(
                        order = %ctx.order_number,
                        channel = %intent.channel,
                        "Notification already sent, skipping"
                    );
                    return;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Idempotency claim failed, skipping dispatch");
                    return;
                }
            }
        }

        let content = self.resolve_template(config, ctx.status).await;
        let message = template::render(&content, ctx);

        match intent.channel {
            DispatchChannel::Whatsapp => {
                let Some(phone) = ctx.client_phone.clone() else {
                    return;
                };
                let Some(config) = config else {
                    tracing::warn!(
                        order = %ctx.order_number,
                        "Company has no channel config, WhatsApp dispatch dropped"
                    );
                    return;
                };
                let api = self.channel_factory.for_config(config);
                if intent.needs_document {
                    let document = self.renderer.render(ctx);
                    self.dispatcher
                        .send_whatsapp_document(
                            api.as_ref(),
                            &phone,
                            &document,
                            &message,
                            Some(&ctx.order_number),
                        )
                        .await;
                } else {
                    self.dispatcher
                        .send_whatsapp_text(api.as_ref(), &phone, &message, Some(&ctx.order_number))
                        .await;
                }
            }
            DispatchChannel::Email => {
                let Some(email) = ctx.client_email.clone() else {
                    return;
                };
                let subject = format!("Sua ordem de serviço {} está pronta!", ctx.order_number);
                self.dispatcher
                    .send_email(
                        self.email.as_ref(),
                        &email,
                        &subject,
                        &message,
                        Some(&ctx.order_number),
                    )
                    .await;
            }
        }
    }

    /// Active tenant template, falling back to the built-in default
    async fn resolve_template(&self, config: Option<&ChannelConfig>, status: OrderStatus) -> String {
        if let Some(config) = config {
            match self.templates.find_active(&config.id, status).await {
                Ok(Some(t)) => return t.content,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Template lookup failed, using default");
                }
            }
        }
        template::default_template(status).to_string()
    }

    async fn load_context(&self, job: &NotificationJob) -> RepoResult<Option<OrderContext>> {
        let Some(order) = self.orders.find_by_id(&job.order_id).await? else {
            return Ok(None);
        };
        let Some(client) = self.clients.find_by_id(&order.client_id).await? else {
            return Ok(None);
        };
        let Some(store) = self.stores.find_by_id(&order.store_id).await? else {
            return Ok(None);
        };
        let Some(company) = self.companies.find_by_id(&store.company_id).await? else {
            return Ok(None);
        };

        let phone = Some(client.phone.trim().to_string()).filter(|p| !p.is_empty());
        let email = client
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Some(OrderContext {
            order_id: order.id,
            order_number: order.order_number,
            // The message describes the transition, even if the order
            // moved on again since the job was enqueued.
            status: job.status,
            client_name: client.name,
            client_phone: phone,
            client_email: email,
            company_id: company.id,
            company_name: company.name,
            store_name: store.name,
            items: order
                .items
                .into_iter()
                .map(|i| ServiceLine {
                    name: i.service_name,
                    description: i.description,
                    unit_price: i.unit_price,
                    quantity: i.quantity,
                })
                .collect(),
            total_amount: order.total_amount,
            paused_reason: order.paused_reason,
            created_at: order.created_at,
            finished_at: order.finished_at,
            paid_at: order.paid_at,
        }))
    }
}
