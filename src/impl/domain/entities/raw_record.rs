use super::transaction::StoreTag;

/// Amount as found in a stored row. Rows written by older clients may carry
/// the value as text, sometimes with a comma decimal mark.
#[derive(Debug, Clone, PartialEq)]
pub enum RawAmount {
    Missing,
    Number(f64),
    Text(String),
}

/// Fields shared by both stores.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecordFields {
    pub id: i64,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub amount: RawAmount,
    pub category: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub fields: RawRecordFields,
    pub spent_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRecord {
    pub fields: RawRecordFields,
    pub earned_on: Option<String>,
}

/// A row exactly as returned by one of the two stores.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Expense(ExpenseRecord),
    Income(IncomeRecord),
}

impl RawRecord {
    pub fn origin(&self) -> StoreTag {
        match self {
            RawRecord::Expense(_) => StoreTag::Expenses,
            RawRecord::Income(_) => StoreTag::Incomes,
        }
    }

    pub fn fields(&self) -> &RawRecordFields {
        match self {
            RawRecord::Expense(r) => &r.fields,
            RawRecord::Income(r) => &r.fields,
        }
    }
}
