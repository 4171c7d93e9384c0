use serde_derive::{Deserialize, Serialize};

use crate::entities::{
    ExpenseRecord, IncomeRecord, RawAmount, RawRecord, RawRecordFields, RecordPayload, StoreTag,
};

/// `valor` as written by the different clients: a number, a string (possibly
/// with a comma decimal mark), or something else entirely.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountModel {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<Option<AmountModel>> for RawAmount {
    fn from(model: Option<AmountModel>) -> Self {
        match model {
            Some(AmountModel::Number(v)) => RawAmount::Number(v),
            Some(AmountModel::Text(s)) => RawAmount::Text(s),
            Some(AmountModel::Other(v)) => {
                log::warn!("ignoring amount of unexpected type: {v}");
                RawAmount::Missing
            }
            None => RawAmount::Missing,
        }
    }
}

/// Row of either transaction table. Only one of the two date columns exists
/// in each table.
#[derive(Debug, Deserialize)]
pub struct TransactionRowModel {
    pub id: i64,
    #[serde(rename = "user_number", default)]
    pub owner: Option<String>,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "valor", default)]
    pub amount: Option<AmountModel>,
    #[serde(rename = "tipo", default)]
    pub category: Option<String>,
    #[serde(rename = "data_gasto", default)]
    pub spent_on: Option<String>,
    #[serde(rename = "data_receita", default)]
    pub earned_on: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TransactionRowModel {
    pub fn into_record(self, store: StoreTag) -> RawRecord {
        let fields = RawRecordFields {
            id: self.id,
            owner: self.owner,
            name: self.name,
            description: self.description,
            amount: self.amount.into(),
            category: self.category,
            created_at: self.created_at,
        };
        match store {
            StoreTag::Expenses => RawRecord::Expense(ExpenseRecord {
                fields,
                spent_on: self.spent_on,
            }),
            StoreTag::Incomes => RawRecord::Income(IncomeRecord {
                fields,
                earned_on: self.earned_on,
            }),
        }
    }
}

/// Insert body. The date goes to the column of the destination table.
#[derive(Debug, Serialize)]
pub struct TransactionPayloadModel {
    pub user_number: String,
    pub nome: String,
    pub valor: f64,
    pub tipo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_gasto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_receita: Option<String>,
}

impl From<&RecordPayload> for TransactionPayloadModel {
    fn from(payload: &RecordPayload) -> Self {
        let date = payload.date.format("%Y-%m-%d").to_string();
        let (data_gasto, data_receita) = match payload.store {
            StoreTag::Expenses => (Some(date), None),
            StoreTag::Incomes => (None, Some(date)),
        };
        Self {
            user_number: payload.owner.clone(),
            nome: payload.name.clone(),
            valor: payload.amount,
            tipo: payload.category.clone(),
            data_gasto,
            data_receita,
        }
    }
}
