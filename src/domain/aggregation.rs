use std::collections::HashMap;

use chrono::NaiveDate;

use super::{Cents, Month, Transaction, TransactionKind};

/// An inclusive calendar date range used to filter transactions,
/// typically a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// The window spanning one whole calendar month.
    pub fn month(month: Month) -> Self {
        Self {
            from: month.first_day(),
            to: month.last_day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Reduce transactions of one kind within a window into per-category sums.
/// Categories are compared byte-for-byte; differently-cased labels are
/// distinct groups. The result map is unordered; callers sort for display.
pub fn aggregate_by_category(
    transactions: &[Transaction],
    kind: TransactionKind,
    window: DateWindow,
) -> HashMap<String, Cents> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        if transaction.kind != kind || !window.contains(transaction.date) {
            continue;
        }
        *totals.entry(transaction.category.clone()).or_insert(0) += transaction.amount_cents;
    }

    totals
}

/// Total amount for one kind within a window, across all categories.
pub fn sum_by_kind(transactions: &[Transaction], kind: TransactionKind, window: DateWindow) -> Cents {
    transactions
        .iter()
        .filter(|t| t.kind == kind && window.contains(t.date))
        .map(|t| t.amount_cents)
        .sum()
}

/// Income and expense totals for one month of a trends series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFlow {
    pub month: Month,
    pub income: Cents,
    pub expense: Cents,
}

/// Per-month income/expense totals over an inclusive month range.
/// Every month in the range appears in the output, zero-filled when no
/// transaction falls in it; transactions outside the range are ignored.
pub fn monthly_flows(transactions: &[Transaction], from: Month, to: Month) -> Vec<MonthFlow> {
    if from > to {
        return Vec::new();
    }

    let mut flows = Vec::new();
    let mut index: HashMap<Month, usize> = HashMap::new();
    let mut current = from;
    loop {
        index.insert(current, flows.len());
        flows.push(MonthFlow {
            month: current,
            income: 0,
            expense: 0,
        });
        if current == to {
            break;
        }
        current = current.succ();
    }

    for transaction in transactions {
        let Some(&i) = index.get(&Month::from_date(transaction.date)) else {
            continue;
        };
        match transaction.kind {
            TransactionKind::Income => flows[i].income += transaction.amount_cents,
            TransactionKind::Expense => flows[i].expense += transaction.amount_cents,
        }
    }

    flows
}
