//! # Text Rendering
//!
//! Turns command results into the text printed on stdout. Every function
//! returns a `String` so output can be checked in tests.

use till_core::{CollectionStats, Page, Product, Sale, Salesperson};

use crate::commands::sale::{salesperson_label, SaleDetail, SaleListing};
use crate::notice::{Notice, NoticeLevel};
use crate::state::TillConfig;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn footer<T>(page: &Page<T>) -> String {
    if page.is_empty() {
        return "No records found.".to_string();
    }
    let first = page.first_index();
    let last = first + page.items.len() - 1;
    format!(
        "Showing {}-{} of {} (page {} of {})",
        first, last, page.total_items, page.page, page.total_pages
    )
}

pub fn product_page(page: &Page<Product>, config: &TillConfig) -> String {
    let mut lines = vec![format!(
        "{:<4} {:<14} {:<28} {:>12} {:>12}  {}",
        "#", "Code", "Name", "Cost", "Retail", "Created"
    )];
    for (offset, p) in page.items.iter().enumerate() {
        lines.push(format!(
            "{:<4} {:<14} {:<28} {:>12} {:>12}  {}",
            page.first_index() + offset,
            truncate(&p.code, 14),
            truncate(&p.name, 28),
            config.format_currency(p.cost_price()),
            config.format_currency(p.retail_price()),
            config.format_timestamp(p.created_at),
        ));
    }
    lines.push(footer(page));
    lines.join("\n")
}

pub fn salesperson_page(page: &Page<Salesperson>, config: &TillConfig) -> String {
    let mut lines = vec![format!(
        "{:<4} {:<14} {:<30}  {}",
        "#", "Code", "Name", "Created"
    )];
    for (offset, s) in page.items.iter().enumerate() {
        lines.push(format!(
            "{:<4} {:<14} {:<30}  {}",
            page.first_index() + offset,
            truncate(&s.code, 14),
            truncate(&s.name, 30),
            config.format_timestamp(s.created_at),
        ));
    }
    lines.push(footer(page));
    lines.join("\n")
}

pub fn sale_page(listing: &SaleListing, config: &TillConfig) -> String {
    let page = &listing.page;
    let mut lines = vec![format!(
        "{:<38} {:<22} {:>5} {:>12}  {}",
        "ID", "Salesperson", "Items", "Total", "Created"
    )];
    for sale in &page.items {
        lines.push(format!(
            "{:<38} {:<22} {:>5} {:>12}  {}",
            truncate(&sale.id, 38),
            truncate(&salesperson_label(&listing.roster, &sale.salesperson_id), 22),
            sale.item_count(),
            config.format_currency(sale.total()),
            config.format_timestamp(sale.created_at),
        ));
    }
    lines.push(footer(page));
    lines.join("\n")
}

/// Header block and item table for one sale.
pub fn sale_detail(detail: &SaleDetail, config: &TillConfig) -> String {
    let sale = &detail.sale;
    let mut lines = vec![
        format!("Sale Details - ID: {}", sale.id),
        format!("  Created:      {}", config.format_timestamp(sale.created_at)),
        format!(
            "  Updated:      {}",
            sale.updated_at
                .map(|at| config.format_timestamp(at))
                .unwrap_or_else(|| "Never".to_string())
        ),
        format!("  Salesperson:  {}", detail.salesperson),
        format!("  Total:        {}", config.format_currency(sale.total())),
        format!("  Comments:     {}", sale.comments.as_deref().unwrap_or("-")),
        String::new(),
        format!(
            "  {:<4} {:<14} {:<24} {:>12} {:>5} {:>9} {:>12}",
            "#", "Code", "Product", "Price", "Qty", "Discount", "Amount"
        ),
    ];
    for (i, line) in sale.line_items.iter().enumerate() {
        lines.push(format!(
            "  {:<4} {:<14} {:<24} {:>12} {:>5} {:>9} {:>12}",
            i + 1,
            truncate(&line.code, 14),
            truncate(&line.name, 24),
            config.format_currency(line.unit_price()),
            line.quantity,
            line.discount().to_string(),
            config.format_currency(line.amount()),
        ));
    }
    lines.join("\n")
}

/// One-line summary used after add/edit/delete.
pub fn product_summary(p: &Product, config: &TillConfig) -> String {
    format!(
        "{} {} (cost {}, retail {})",
        p.code,
        p.name,
        config.format_currency(p.cost_price()),
        config.format_currency(p.retail_price())
    )
}

pub fn salesperson_summary(s: &Salesperson) -> String {
    format!("{} {}", s.code, s.name)
}

pub fn sale_summary(sale: &Sale, config: &TillConfig) -> String {
    format!(
        "Sale {}: {} line(s), total {}",
        sale.id,
        sale.line_items.len(),
        config.format_currency(sale.total())
    )
}

pub fn stats(entity: &str, stats: &CollectionStats) -> String {
    [
        format!("{} total:      {}", entity, stats.total),
        format!("Added (30 days):  {}", stats.recent),
        format!("Updated:          {}", stats.updated),
        format!("Weekly average:   {}", stats.weekly_average),
    ]
    .join("\n")
}

pub fn notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "[ok]",
        NoticeLevel::Info => "[info]",
        NoticeLevel::Warning => "[warn]",
        NoticeLevel::Error => "[error]",
    };
    if notice.text.contains('\n') {
        let body: Vec<String> = notice.text.lines().map(|l| format!("  {}", l)).collect();
        format!("{} {}\n{}", tag, notice.title, body.join("\n"))
    } else {
        format!("{} {} {}", tag, notice.title, notice.text)
    }
}
