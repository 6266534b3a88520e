// Rust guideline compliant 2026-10-16

//! Printable HTML documents: a customer's quote and the dashboard summary.
//!
//! Entry points: [`customer_quote`], [`dashboard_report`]. Both return a
//! complete, self-contained HTML5 page (inline CSS, no external assets) ready
//! to be opened in a browser and printed. Export only; nothing parses these
//! documents back.

mod format;

use std::fmt;

use chrono::{Datelike as _, NaiveDate};
use domain::{Catalog as _, Customer, PaymentMethod};
use revenue::{PeriodType, RevenueSummary};

pub use format::{format_brl, format_date_br};
use format::{Escaped, month_year, parse_date};

/// Business name printed on every document.
pub const BUSINESS_NAME: &str = "Exclusiva Proteções";

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#1f2937;\
-webkit-print-color-adjust:exact;print-color-adjust:exact}\
main,header,footer{max-width:56rem;margin:0 auto}\
header{border-bottom:1px solid #e5e7eb;padding-bottom:1rem}\
h1{font-size:1.875rem;margin:0}h2{font-size:1.25rem;border-bottom:1px solid #e5e7eb;padding-bottom:.5rem}\
table{width:100%;border-collapse:collapse;text-align:left}\
thead{background:#f3f4f6}th,td{padding:.5rem}tr{border-bottom:1px solid #e5e7eb}\
.right{text-align:right}.muted{color:#6b7280}.total{font-size:1.5rem;font-weight:bold}\
footer{border-top:1px solid #e5e7eb;margin-top:3rem;padding-top:1rem;text-align:center;\
font-size:.75rem;color:#9ca3af}";

/// Render the printable quote for one customer.
#[must_use]
pub fn customer_quote(customer: &Customer, generated_on: NaiveDate) -> String {
    CustomerQuote { customer, generated_on }.to_string()
}

/// Render the printable dashboard summary for one period.
#[must_use]
pub fn dashboard_report(
    summary: &RevenueSummary,
    period: PeriodType,
    reference_date: &str,
    generated_on: NaiveDate,
) -> String {
    DashboardReport { summary, period, reference_date, generated_on }.to_string()
}

// ---------------------------------------------------------------------------
// Shared page frame
// ---------------------------------------------------------------------------

fn open_page(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "<!DOCTYPE html>")?;
    writeln!(f, "<html lang=\"pt-BR\">")?;
    writeln!(f, "<head>")?;
    writeln!(f, "<meta charset=\"UTF-8\">")?;
    writeln!(f, "<title>{}</title>", Escaped(title))?;
    writeln!(f, "<style>{STYLE}</style>")?;
    writeln!(f, "</head>")?;
    writeln!(f, "<body>")
}

fn close_page(f: &mut fmt::Formatter<'_>, footer: &str) -> fmt::Result {
    writeln!(f, "<footer><p>{}</p></footer>", Escaped(footer))?;
    writeln!(f, "</body>")?;
    writeln!(f, "</html>")
}

/// `"-"` for blank cells.
fn or_dash(text: &str) -> &str {
    if text.is_empty() { "-" } else { text }
}

// ---------------------------------------------------------------------------
// Customer quote
// ---------------------------------------------------------------------------

struct CustomerQuote<'a> {
    customer: &'a Customer,
    generated_on: NaiveDate,
}

impl fmt::Display for CustomerQuote<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.customer.details;
        open_page(f, &format!("Orçamento - {}", d.name))?;

        writeln!(f, "<header>")?;
        writeln!(f, "<h1>{BUSINESS_NAME}</h1>")?;
        writeln!(f, "<p class=\"muted\">Orçamento de Serviços</p>")?;
        if !d.budget_date.is_empty() {
            writeln!(
                f,
                "<p><strong>Data do Orçamento:</strong> {}</p>",
                Escaped(&format_date_br(&d.budget_date))
            )?;
        }
        if !d.service_date.is_empty() {
            writeln!(
                f,
                "<p><strong>Data do Serviço:</strong> {}</p>",
                Escaped(&format_date_br(&d.service_date))
            )?;
        }
        writeln!(f, "</header>")?;

        writeln!(f, "<main>")?;
        writeln!(f, "<section id=\"customer-details\">")?;
        writeln!(f, "<h2>Dados do Cliente</h2>")?;
        writeln!(f, "<p><strong>Nome:</strong> {}</p>", Escaped(&d.name))?;
        writeln!(f, "<p><strong>CPF:</strong> {}</p>", Escaped(&d.tax_id))?;
        write!(f, "<p><strong>Endereço:</strong> {}, {}", Escaped(&d.address), Escaped(&d.house_number))?;
        if !d.address_complement.is_empty() {
            write!(f, " - {}", Escaped(&d.address_complement))?;
        }
        writeln!(f, "</p>")?;
        writeln!(f, "<p><strong>Condomínio:</strong> {}</p>", Escaped(&d.condominium_name))?;
        writeln!(
            f,
            "<p><strong>Cidade/Estado:</strong> {} - {}</p>",
            Escaped(&d.city),
            Escaped(&d.state)
        )?;
        writeln!(f, "<p><strong>CEP:</strong> {}</p>", Escaped(&d.postal_code))?;
        if let Some(attendant) = &d.attendant_name {
            writeln!(f, "<p><strong>Atendente:</strong> {}</p>", Escaped(attendant))?;
        }
        writeln!(f, "</section>")?;

        if !d.measurements.is_empty() {
            writeln!(f, "<section id=\"measurements\">")?;
            writeln!(f, "<h2>Detalhes dos Serviços e Medidas</h2>")?;
            writeln!(f, "<table>")?;
            writeln!(
                f,
                "<thead><tr><th>Serviço</th><th>Cor</th><th>Largura</th><th>Altura</th><th>Anotações</th></tr></thead>"
            )?;
            writeln!(f, "<tbody>")?;
            for m in &d.measurements {
                let width = if m.width.is_empty() { String::new() } else { format!("{}m", m.width) };
                let height = if m.height.is_empty() { String::new() } else { format!("{}m", m.height) };
                writeln!(
                    f,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    or_dash(m.service.map_or("", |s| s.label())),
                    or_dash(m.color.map_or("", |c| c.label())),
                    Escaped(or_dash(&width)),
                    Escaped(or_dash(&height)),
                    Escaped(or_dash(&m.notes)),
                )?;
            }
            writeln!(f, "</tbody>")?;
            writeln!(f, "</table>")?;
            writeln!(f, "</section>")?;
        }

        writeln!(f, "<section id=\"summary\">")?;
        if !d.services.is_empty() {
            writeln!(f, "<h3>Serviços Contratados:</h3>")?;
            writeln!(f, "<ul>")?;
            for s in &d.services {
                writeln!(f, "<li>{}</li>", s.label())?;
            }
            writeln!(f, "</ul>")?;
        }
        if let Some(method) = d.payment_method {
            write!(f, "<p class=\"muted\">Forma de Pagamento:</p><p><strong>{}", method.label())?;
            if method == PaymentMethod::CreditCard
                && let Some(n) = d.installment_count
            {
                write!(f, " - {n}x")?;
            }
            writeln!(f, "</strong></p>")?;
        }
        if !d.total_value.is_empty() {
            writeln!(
                f,
                "<p class=\"muted\">Valor Total:</p><p class=\"total\">R$ {}</p>",
                Escaped(&d.total_value)
            )?;
        }
        writeln!(f, "</section>")?;
        writeln!(f, "</main>")?;

        close_page(
            f,
            &format!("© {} {BUSINESS_NAME}. Todos os direitos reservados.", self.generated_on.year()),
        )
    }
}

// ---------------------------------------------------------------------------
// Dashboard report
// ---------------------------------------------------------------------------

struct DashboardReport<'a> {
    summary: &'a RevenueSummary,
    period: PeriodType,
    reference_date: &'a str,
    generated_on: NaiveDate,
}

impl DashboardReport<'_> {
    fn formatted_reference(&self) -> String {
        let Some(date) = parse_date(self.reference_date) else {
            return self.reference_date.to_owned();
        };
        match self.period {
            PeriodType::Day => date.format("%d/%m/%Y").to_string(),
            PeriodType::Month => month_year(date),
            PeriodType::Year => date.year().to_string(),
        }
    }
}

impl fmt::Display for DashboardReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        open_page(f, "Relatório do Dashboard")?;

        writeln!(f, "<header>")?;
        writeln!(f, "<h1>{BUSINESS_NAME}</h1>")?;
        writeln!(f, "<p class=\"muted\">Relatório de Desempenho</p>")?;
        writeln!(f, "</header>")?;

        writeln!(f, "<main>")?;
        writeln!(f, "<section>")?;
        writeln!(f, "<h2>Resumo do Período</h2>")?;
        writeln!(f, "<p><strong>Período:</strong> {}</p>", self.period.label())?;
        writeln!(f, "<p><strong>Data:</strong> {}</p>", Escaped(&self.formatted_reference()))?;
        writeln!(
            f,
            "<p class=\"total\"><strong>Entradas Totais:</strong> {}</p>",
            format_brl(self.summary.total_revenue)
        )?;
        writeln!(f, "</section>")?;

        writeln!(f, "<section>")?;
        writeln!(f, "<h2>Receita por Categoria de Serviço</h2>")?;
        if self.summary.top_services.is_empty() {
            writeln!(f, "<p class=\"muted\">Nenhum dado de serviço encontrado para este período.</p>")?;
        } else {
            writeln!(f, "<table>")?;
            writeln!(f, "<thead><tr><th>Serviço</th><th class=\"right\">Valor Total</th></tr></thead>")?;
            writeln!(f, "<tbody>")?;
            for entry in &self.summary.top_services {
                writeln!(
                    f,
                    "<tr><td>{}</td><td class=\"right\">{}</td></tr>",
                    entry.service.label(),
                    format_brl(entry.total)
                )?;
            }
            writeln!(f, "</tbody>")?;
            writeln!(f, "</table>")?;
        }
        writeln!(f, "</section>")?;
        writeln!(f, "</main>")?;

        close_page(f, &format!("Relatório gerado em {}", self.generated_on.format("%d/%m/%Y")))
    }
}
