use std::io::Write;

use anyhow::Result;

use crate::domain::{Transaction, format_cents};

/// Write transactions to CSV format. Amounts are rendered in currency
/// units ("40.00"), dates as YYYY-MM-DD. Returns the number of records
/// written, excluding the header.
pub fn write_transactions_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    // Write header
    csv_writer.write_record(["id", "date", "type", "category", "amount", "description"])?;

    let mut count = 0;
    for transaction in transactions {
        csv_writer.write_record([
            transaction.id.to_string(),
            transaction.date.format("%Y-%m-%d").to_string(),
            transaction.kind.to_string(),
            transaction.category.clone(),
            format_cents(transaction.amount_cents),
            transaction.description.clone().unwrap_or_default(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_export_transactions_csv() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let transactions = vec![
            Transaction::new(Uuid::nil(), TransactionKind::Expense, "Food", 4000, date)
                .with_description("groceries"),
        ];

        let mut buffer = Vec::new();
        let count = write_transactions_csv(&mut buffer, &transactions).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,date,type,category,amount,description"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("2024-03-05"));
        assert!(row.contains("expense"));
        assert!(row.contains("Food"));
        assert!(row.contains("40.00"));
        assert!(row.contains("groceries"));
    }

    #[test]
    fn test_export_empty_is_header_only() {
        let mut buffer = Vec::new();
        let count = write_transactions_csv(&mut buffer, &[]).unwrap();
        assert_eq!(count, 0);

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().count(), 1);
    }
}
