use crate::entities::{CategoryBreakdown, Summary, Transaction};

/// Totals over the given transactions. Recomputed from scratch on every call.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (income_total, expense_total) =
        transactions
            .into_iter()
            .fold((0.0, 0.0), |(income, expense), tx| {
                if tx.amount > 0.0 {
                    (income + tx.amount, expense)
                } else {
                    (income, expense + tx.amount.abs())
                }
            });
    Summary {
        income_total,
        expense_total,
        net_balance: income_total - expense_total,
    }
}

/// Absolute expense amount per category. Incomes are ignored.
pub fn breakdown_by_category<'a, I>(transactions: I) -> CategoryBreakdown
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| tx.amount < 0.0)
        .fold(CategoryBreakdown::new(), |mut map, tx| {
            *map.entry(tx.category.clone()).or_default() += tx.amount.abs();
            map
        })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;
    use crate::entities::StoreTag;

    fn tx(id: i64, amount: f64, category: &str) -> Transaction {
        Transaction {
            id,
            owner: String::new(),
            name: format!("tx {id}"),
            amount,
            category: category.to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            created_at: None,
            origin: if amount >= 0.0 {
                StoreTag::Incomes
            } else {
                StoreTag::Expenses
            },
        }
    }

    #[test]
    fn summarize_splits_income_and_expense() {
        let feed = vec![
            tx(1, 100.0, "Salário"),
            tx(2, -40.0, "Moradia"),
            tx(3, -10.0, "Lazer / Diversão"),
        ];
        assert_eq!(
            summarize(&feed),
            Summary {
                income_total: 100.0,
                expense_total: 50.0,
                net_balance: 50.0,
            }
        );
    }

    #[test]
    fn summarize_empty_feed_is_zero() {
        assert_eq!(summarize(&Vec::<Transaction>::new()), Summary::default());
    }

    #[test]
    fn breakdown_only_counts_expenses() {
        let feed = vec![
            tx(1, 100.0, "Salário"),
            tx(2, -40.0, "Moradia"),
            tx(3, -10.5, "Moradia"),
            tx(4, -5.0, "Transporte"),
        ];
        let breakdown = breakdown_by_category(&feed);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown["Moradia"], 50.5);
        assert_eq!(breakdown["Transporte"], 5.0);
        assert!(!breakdown.contains_key("Salário"));
    }
}
