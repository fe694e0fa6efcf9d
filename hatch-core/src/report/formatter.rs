use super::escape_html;
use crate::events::{Purchase, clip_label};
use chrono::DateTime;
use chrono_tz::Tz;
use compact_str::CompactString;
use hatch_sdk::objects::CounterSnapshot;
use itertools::Itertools;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt::{self, Write};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━";
const TOP_COUNTRIES: usize = 5;
const TOP_BUTTONS: usize = 10;
const TIME_FORMAT: &str = "%I:%M %p %Z";

/// Telegram rejects longer messages.
pub const MESSAGE_LIMIT: usize = 4096;
const TRUNCATED: &str = "…";

/// Everything a report is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub title: &'a str,
    pub period: &'a CounterSnapshot,
    pub all_time: &'a CounterSnapshot,
    /// When the report was generated, in the report timezone.
    pub generated_at: DateTime<Tz>,
}

/// Render the hourly report as Telegram HTML.
///
/// An empty period produces a short "no activity" report with the all-time
/// totals, never an empty message. The result never exceeds
/// [`MESSAGE_LIMIT`] characters.
pub fn format_report(ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, ctx);
    fit_to_limit(out, MESSAGE_LIMIT)
}

/// Drop whole lines from the end until `text` plus a trailing `…` fits in
/// `limit` characters. Tags and entities never span lines, so the HTML stays
/// well-formed.
fn fit_to_limit(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let budget = limit.saturating_sub(TRUNCATED.chars().count());
    let mut out = String::with_capacity(text.len().min(limit * 4));
    let mut used = 0;
    for line in text.split_inclusive('\n') {
        let len = line.chars().count();
        if used + len > budget {
            break;
        }
        out.push_str(line);
        used += len;
    }
    out.push_str(TRUNCATED);
    out
}

fn write_report(out: &mut String, ctx: &ReportContext<'_>) -> fmt::Result {
    writeln!(out, "📊 <b>{} · Hourly Report</b>", escape_html(ctx.title))?;
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out)?;

    if ctx.period.is_empty() {
        writeln!(out, "💤 No activity since the last report.")?;
        writeln!(out)?;
        write_totals(out, ctx.all_time)?;
    } else {
        write_scans(out, ctx.period, ctx.all_time)?;
        write_clicks(out, ctx.period, ctx.all_time)?;
        write_purchases(out, ctx.period, ctx.all_time)?;
        write_conversion(out, ctx.all_time)?;
    }

    write!(out, "🕐 {}", ctx.generated_at.format(TIME_FORMAT))
}

fn write_totals(out: &mut String, all_time: &CounterSnapshot) -> fmt::Result {
    writeln!(out, "📦 <b>Since start</b>")?;
    writeln!(out, "   • QR scans: {}", all_time.qr_scans_total)?;
    writeln!(out, "   • Clicks: {}", all_time.clicks_total)?;
    writeln!(
        out,
        "   • Purchases: {} ({})",
        all_time.purchases_total,
        format_revenue(&all_time.revenue_by_currency)
    )?;
    writeln!(out)
}

fn write_scans(out: &mut String, period: &CounterSnapshot, all_time: &CounterSnapshot) -> fmt::Result {
    writeln!(out, "🔲 <b>QR Code Scans</b>")?;
    writeln!(out, "   • Last hour: {}", period.qr_scans_total)?;
    writeln!(out, "   • Since start: {}", all_time.qr_scans_total)?;
    if !period.qr_scans_by_country.is_empty() {
        let top = by_count_desc(&period.qr_scans_by_country)
            .take(TOP_COUNTRIES)
            .map(|(country, n)| format!("{} {n}", label(country)))
            .join(", ");
        writeln!(out, "   • Top countries: {top}")?;
    }
    writeln!(out)
}

fn write_clicks(out: &mut String, period: &CounterSnapshot, all_time: &CounterSnapshot) -> fmt::Result {
    writeln!(out, "🖱️ <b>Pre-order Clicks</b>")?;
    writeln!(out, "   • Last hour: {}", period.clicks_total)?;
    writeln!(out, "   • Since start: {}", all_time.clicks_total)?;
    for (button, n) in by_count_desc(&period.clicks_by_button).take(TOP_BUTTONS) {
        writeln!(out, "   • {}: {n}", label(button))?;
    }
    let hidden = period.clicks_by_button.len().saturating_sub(TOP_BUTTONS);
    if hidden > 0 {
        writeln!(out, "   • …and {hidden} more")?;
    }
    writeln!(out)
}

fn write_purchases(
    out: &mut String,
    period: &CounterSnapshot,
    all_time: &CounterSnapshot,
) -> fmt::Result {
    writeln!(out, "💰 <b>Completed Purchases</b>")?;
    writeln!(
        out,
        "   • Last hour: {} ({})",
        period.purchases_total,
        format_revenue(&period.revenue_by_currency)
    )?;
    writeln!(
        out,
        "   • Since start: {} ({})",
        all_time.purchases_total,
        format_revenue(&all_time.revenue_by_currency)
    )?;
    writeln!(out)
}

fn write_conversion(out: &mut String, all_time: &CounterSnapshot) -> fmt::Result {
    writeln!(out, "📈 <b>Conversion Rate (Since start)</b>")?;
    writeln!(
        out,
        "   • Scan → Click: {}",
        rate(all_time.clicks_total, all_time.qr_scans_total)
    )?;
    writeln!(
        out,
        "   • Click → Purchase: {}",
        rate(all_time.purchases_total, all_time.clicks_total)
    )?;
    writeln!(out)
}

/// Render the immediate alert for a completed purchase.
pub fn format_purchase_alert(purchase: &Purchase, at: DateTime<Tz>) -> String {
    let customer = purchase.customer_email.as_deref().unwrap_or("Unknown");
    format!(
        "🎉 <b>New Pre-Order!</b>\n\n\
         💰 Amount: {} {}\n\
         📧 Customer: {}\n\
         🕐 Time: {}",
        purchase.amount.round_dp(2),
        escape_html(&purchase.currency),
        escape_html(customer),
        at.format(TIME_FORMAT)
    )
}

fn label(raw: &str) -> String {
    escape_html(clip_label(raw)).into_owned()
}

/// Entries ordered by count (highest first), then by key.
fn by_count_desc(map: &BTreeMap<CompactString, u64>) -> impl Iterator<Item = (&str, u64)> {
    map.iter()
        .map(|(k, v)| (k.as_str(), *v))
        .sorted_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)))
}

fn format_revenue(revenue: &BTreeMap<CompactString, Decimal>) -> String {
    if revenue.is_empty() {
        return "0".to_string();
    }
    revenue
        .iter()
        .map(|(currency, amount)| format!("{} {}", amount.round_dp(2), escape_html(currency)))
        .join(", ")
}

fn rate(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "n/a".to_string();
    }
    format!("{:.0}%", numerator as f64 / denominator as f64 * 100.0)
}
