//! Plain-text rendering of ledger contents and summaries.

use std::collections::BTreeMap;

use comfy_table::{Cell, CellAlignment, Table};
use rust_decimal::Decimal;
use taxtrack_core::{IncomeRecord, IncomeType, TaxSummary};

fn money(amount: Decimal) -> Cell {
    Cell::new(format!("{:.2}", amount)).set_alignment(CellAlignment::Right)
}

pub fn incomes_table(records: &[IncomeRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Job", "Amount", "Federal Withheld", "Date", "Type"]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(&record.job_name),
            money(record.amount),
            money(record.federal_amount),
            Cell::new(record.date),
            Cell::new(record.income_type),
        ]);
    }
    table
}

pub fn summary_table(summary: &TaxSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![Cell::new("Total income"), money(summary.total_income)]);
    table.add_row(vec![Cell::new("Estimated tax"), money(summary.estimated_tax)]);
    table.add_row(vec![Cell::new("Federal tax paid"), money(summary.paid_tax)]);
    table.add_row(vec![
        Cell::new("Effective rate"),
        Cell::new(format!("{:.2}%", summary.effective_rate)).set_alignment(CellAlignment::Right),
    ]);
    table
}

/// Gross income per income type, as computed by
/// [`income_by_type`](taxtrack_core::calculations::income_by_type).
pub fn breakdown_table(totals: &BTreeMap<IncomeType, Decimal>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Type", "Income"]);
    for (income_type, total) in totals {
        table.add_row(vec![Cell::new(income_type), money(*total)]);
    }
    table
}
