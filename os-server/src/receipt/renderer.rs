//! Receipt renderer
//!
//! Renders an order snapshot into a paginated PDF receipt: header
//! (company, store, number), client block, itemized services with line
//! and grand totals, and lifecycle timestamps. Deterministic: the only
//! dates on the page are the order's own.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono_tz::Tz;
use os_pdf::PdfBuilder;

use crate::money;
use crate::notify::context::OrderContext;
use shared::util::format_millis;

/// Rendered receipt, ready for media dispatch
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub base64: String,
    pub filename: String,
}

/// Receipt renderer
pub struct ReceiptRenderer {
    timezone: Tz,
}

impl ReceiptRenderer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Render an order receipt to PDF bytes (and base64 for inline media)
    pub fn render(&self, ctx: &OrderContext) -> RenderedDocument {
        let mut b = PdfBuilder::new();

        self.render_header(&mut b, ctx);
        self.render_client(&mut b, ctx);
        self.render_items(&mut b, ctx);
        self.render_footer(&mut b, ctx);

        let bytes = b.build();
        let base64 = BASE64.encode(&bytes);
        RenderedDocument {
            base64,
            filename: format!("recibo-{}.pdf", ctx.order_number),
            bytes,
        }
    }

    fn render_header(&self, b: &mut PdfBuilder, ctx: &OrderContext) {
        b.title(&ctx.company_name);
        b.line(&ctx.store_name);
        b.separator();
        b.heading(&format!("Ordem de Serviço {}", ctx.order_number));
        b.line(&format!("Situação: {}", ctx.status.label()));
        b.blank();
    }

    fn render_client(&self, b: &mut PdfBuilder, ctx: &OrderContext) {
        b.bold_line("Cliente");
        b.line(&ctx.client_name);
        if let Some(phone) = &ctx.client_phone {
            b.line(&format!("Telefone: {phone}"));
        }
        if let Some(email) = &ctx.client_email {
            b.line(&format!("Email: {email}"));
        }
        b.blank();
    }

    fn render_items(&self, b: &mut PdfBuilder, ctx: &OrderContext) {
        b.bold_line("Serviços");
        for item in &ctx.items {
            let line_total = money::line_total(item.unit_price, item.quantity);
            b.line(&format!(
                "{} ({}x R$ {}) - R$ {}",
                item.name,
                item.quantity,
                money::format_amount(item.unit_price),
                money::format_amount(line_total)
            ));
            if let Some(description) = &item.description {
                b.line(&format!("  {description}"));
            }
        }
        b.separator();
        b.bold_line(&format!(
            "Total: R$ {}",
            money::format_amount(ctx.total_amount)
        ));
        b.blank();
    }

    fn render_footer(&self, b: &mut PdfBuilder, ctx: &OrderContext) {
        b.line(&format!(
            "Recebida em: {}",
            format_millis(ctx.created_at, self.timezone)
        ));
        if let Some(finished_at) = ctx.finished_at {
            b.line(&format!(
                "Finalizada em: {}",
                format_millis(finished_at, self.timezone)
            ));
        }
        if let Some(paid_at) = ctx.paid_at {
            b.line(&format!(
                "Paga em: {}",
                format_millis(paid_at, self.timezone)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::context::ServiceLine;

    fn renderer() -> ReceiptRenderer {
        ReceiptRenderer::new(chrono_tz::America::Sao_Paulo)
    }

    #[test]
    fn output_is_deterministic() {
        let ctx = OrderContext::sample();
        let a = renderer().render(&ctx);
        let b = renderer().render(&ctx);
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.base64, b.base64);
        assert_eq!(a.filename, "recibo-OS2501-0007.pdf");
    }

    #[test]
    fn long_service_lists_paginate() {
        let mut ctx = OrderContext::sample();
        ctx.items = (0..120)
            .map(|i| ServiceLine {
                name: format!("Serviço {i}"),
                description: None,
                unit_price: 10.0,
                quantity: 1,
            })
            .collect();

        let doc = renderer().render(&ctx);
        let count_pages = doc
            .bytes
            .windows(b"/Type /Page ".len())
            .filter(|w| *w == b"/Type /Page ".as_slice())
            .count();
        assert!(count_pages >= 2, "expected pagination, got {count_pages} pages");
    }

    #[test]
    fn lifecycle_timestamps_render_only_when_present() {
        let mut ctx = OrderContext::sample();
        let without = renderer().render(&ctx);

        ctx.finished_at = Some(ctx.created_at + 3_600_000);
        ctx.paid_at = Some(ctx.created_at + 7_200_000);
        let with = renderer().render(&ctx);

        let contains = |bytes: &[u8], needle: &[u8]| {
            bytes.windows(needle.len()).any(|w| w == needle)
        };
        assert!(!contains(&without.bytes, b"Finalizada em"));
        assert!(!contains(&without.bytes, b"Paga em"));
        assert!(contains(&with.bytes, b"Finalizada em"));
        assert!(contains(&with.bytes, b"Paga em"));
    }
}
