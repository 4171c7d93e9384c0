use chrono::{DateTime, Utc};

use crate::entities::{
    CanonicalAddress, RawAmount, RawRecord, RecordPayload, StoreTag, Transaction, TransactionForm,
};

use super::utils::{lenient_float, non_blank, parse_timestamp};

pub const UNNAMED_TRANSACTION: &str = "Sem descrição";
pub const UNCATEGORIZED: &str = "Outros";

/// Applies the sign convention: incomes are stored and shown positive,
/// expenses negative, whatever sign the value had upstream.
pub fn signed_amount(store: StoreTag, value: f64) -> f64 {
    match store {
        StoreTag::Incomes => value.abs(),
        StoreTag::Expenses => -value.abs(),
    }
}

pub struct RecordMapper;

impl RecordMapper {
    pub fn to_transaction(raw: RawRecord) -> Transaction {
        let origin = raw.origin();
        let (fields, store_date) = match raw {
            RawRecord::Expense(r) => (r.fields, r.spent_on),
            RawRecord::Income(r) => (r.fields, r.earned_on),
        };

        let value = Self::amount_value(fields.id, origin, &fields.amount);
        let created_at = fields.created_at.as_deref().and_then(parse_timestamp);
        let date = Self::effective_date(fields.id, origin, store_date.as_deref(), created_at);
        let name = non_blank(fields.name.as_deref())
            .or(non_blank(fields.description.as_deref()))
            .unwrap_or(UNNAMED_TRANSACTION)
            .to_string();
        let category = non_blank(fields.category.as_deref())
            .unwrap_or(UNCATEGORIZED)
            .to_string();

        Transaction {
            id: fields.id,
            owner: fields.owner.unwrap_or_default(),
            name,
            amount: signed_amount(origin, value),
            category,
            date,
            created_at,
            origin,
        }
    }

    pub fn to_payload(form: &TransactionForm, owner: &CanonicalAddress) -> RecordPayload {
        let store = form.kind.store();
        RecordPayload {
            store,
            owner: owner.to_string(),
            name: form.description.trim().to_string(),
            amount: signed_amount(store, form.amount),
            category: form.category_id.clone(),
            date: form.date,
        }
    }

    fn amount_value(id: i64, origin: StoreTag, amount: &RawAmount) -> f64 {
        match amount {
            RawAmount::Missing => 0.0,
            RawAmount::Number(v) if v.is_finite() => *v,
            RawAmount::Number(v) => {
                log::warn!("{origin} row {id}: non-finite amount {v}, using 0");
                0.0
            }
            RawAmount::Text(s) => lenient_float(s).unwrap_or_else(|| {
                log::warn!("{origin} row {id}: unparsable amount '{s}', using 0");
                0.0
            }),
        }
    }

    fn effective_date(
        id: i64,
        origin: StoreTag,
        store_date: Option<&str>,
        created_at: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        let parsed = store_date.and_then(|s| {
            let parsed = parse_timestamp(s);
            if parsed.is_none() && !s.trim().is_empty() {
                log::warn!("{origin} row {id}: unparsable date '{s}'");
            }
            parsed
        });
        parsed.or(created_at).unwrap_or_else(|| {
            log::warn!("{origin} row {id}: no usable date, using current time");
            Utc::now()
        })
    }
}
