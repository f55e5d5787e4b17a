//! Template engine
//!
//! Single-pass `{{placeholder}}` substitution. Each placeholder is
//! resolved against the order context exactly once; substituted text is
//! never re-scanned, so values containing placeholder-like fragments
//! cannot trigger a second expansion. Unknown placeholders are left
//! verbatim.
//!
//! Every status has a built-in default template, so notification
//! delivery never blocks on tenant configuration.

use super::context::OrderContext;
use crate::money;
use shared::models::OrderStatus;

/// Render a template against an order context
pub fn render(template: &str, ctx: &OrderContext) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match resolve(key, ctx) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated opener: emit as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve(key: &str, ctx: &OrderContext) -> Option<String> {
    match key {
        "clientName" => Some(ctx.client_name.clone()),
        "orderNumber" => Some(ctx.order_number.clone()),
        "storeName" => Some(ctx.store_name.clone()),
        "companyName" => Some(ctx.company_name.clone()),
        "services" => Some(services_block(ctx)),
        "totalAmount" => Some(money::format_amount(ctx.total_amount)),
        "status" => Some(ctx.status.label().to_string()),
        "pausedReason" => Some(
            ctx.paused_reason
                .as_deref()
                .map(|reason| format!("Motivo: {reason}"))
                .unwrap_or_default(),
        ),
        _ => None,
    }
}

/// One line per item: `name (qtyx) - line total`
fn services_block(ctx: &OrderContext) -> String {
    ctx.items
        .iter()
        .map(|item| {
            format!(
                "{} ({}x) - {}",
                item.name,
                item.quantity,
                money::format_amount(money::line_total(item.unit_price, item.quantity))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Built-in fallback template for a status
pub fn default_template(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Received => {
            "Olá {{clientName}}! 😊\n\
             Recebemos sua ordem de serviço *{{orderNumber}}* na {{storeName}}.\n\n\
             Serviços:\n{{services}}\n\n\
             Total: R$ {{totalAmount}}\n\n\
             Avisaremos por aqui a cada novidade!"
        }
        OrderStatus::InProgress => {
            "Boas notícias, {{clientName}}! 🔧\n\
             Sua ordem de serviço *{{orderNumber}}* já está em andamento."
        }
        OrderStatus::Paused => {
            "Olá {{clientName}}, sua ordem de serviço *{{orderNumber}}* está pausada.\n\
             {{pausedReason}}\n\
             Entraremos em contato assim que o serviço for retomado."
        }
        OrderStatus::Finished => {
            "{{clientName}}, sua ordem de serviço *{{orderNumber}}* está pronta! ✅\n\n\
             Serviços:\n{{services}}\n\n\
             Total: R$ {{totalAmount}}\n\n\
             Aguardamos sua retirada na {{storeName}}."
        }
        OrderStatus::Paid => {
            "Pagamento confirmado! 🎉\n\
             Obrigado, {{clientName}}. Segue em anexo o comprovante da ordem \
             de serviço *{{orderNumber}}*.\n\
             Total pago: R$ {{totalAmount}}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_placeholder() {
        let ctx = OrderContext::sample();
        let template = "{{clientName}}|{{orderNumber}}|{{storeName}}|{{companyName}}|\
                        {{services}}|{{totalAmount}}|{{status}}";
        let rendered = render(template, &ctx);
        assert_eq!(
            rendered,
            "Maria Silva|OS2501-0007|Loja Centro|Conserta Tudo|\
             Troca de tela (1x) - 100.00\nPelícula (2x) - 100.00|200.00|Recebido"
        );
    }

    #[test]
    fn unknown_placeholder_left_verbatim() {
        let ctx = OrderContext::sample();
        let rendered = render("Oi {{clientName}}, veja {{unknownVar}}.", &ctx);
        assert_eq!(rendered, "Oi Maria Silva, veja {{unknownVar}}.");
    }

    #[test]
    fn paused_reason_expands_conditionally() {
        let mut ctx = OrderContext::sample();
        assert_eq!(render("{{pausedReason}}", &ctx), "");

        ctx.paused_reason = Some("aguardando peça".to_string());
        assert_eq!(render("{{pausedReason}}", &ctx), "Motivo: aguardando peça");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let mut ctx = OrderContext::sample();
        ctx.client_name = "{{orderNumber}}".to_string();
        // The injected value must come out literally, not expanded
        assert_eq!(render("{{clientName}}", &ctx), "{{orderNumber}}");
    }

    #[test]
    fn unterminated_opener_is_preserved()  {
        let ctx = OrderContext::sample();
        assert_eq!(render("abc {{clientName", &ctx), "abc {{clientName");
    }

    #[test]
    fn services_scenario_totals() {
        // Two items: 100.00×1 and 50.00×2 → two lines of 100.00 each
        let ctx = OrderContext::sample();
        let services = render("{{services}}", &ctx);
        assert_eq!(
            services,
            "Troca de tela (1x) - 100.00\nPelícula (2x) - 100.00"
        );
        assert_eq!(render("{{totalAmount}}", &ctx), "200.00");
    }

    #[test]
    fn every_status_has_a_default_template() {
        for status in shared::models::OrderStatus::all() {
            let template = default_template(status);
            assert!(template.contains("{{"), "template for {status} has no placeholders");
            // Defaults must render without leftovers other than known text
            let rendered = render(template, &OrderContext::sample());
            assert!(!rendered.contains("{{"), "unresolved placeholder for {status}");
        }
    }
}
