use fractic_server_error::ServerError;

use crate::{
    entities::{Category, TransactionForm},
    errors::InvalidTransactionForm,
};

impl TransactionForm {
    /// Checks the form before anything is sent to a store. Categories unknown
    /// to the catalog are accepted as free labels.
    pub fn validate(&self, categories: &[Category]) -> Result<(), ServerError> {
        if self.description.trim().is_empty() {
            return Err(InvalidTransactionForm::new("description is required"));
        }
        if self.category_id.trim().is_empty() {
            return Err(InvalidTransactionForm::new("category is required"));
        }
        if !self.amount.is_finite() || self.amount == 0.0 {
            return Err(InvalidTransactionForm::with_debug(
                "amount must be a non-zero number",
                &self.amount,
            ));
        }
        match categories.iter().find(|c| c.id == self.category_id) {
            Some(category) if category.kind != self.kind => Err(InvalidTransactionForm::new(
                "category does not match the transaction type",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::entities::{default_categories, TransactionType};

    use super::*;

    fn form() -> TransactionForm {
        TransactionForm {
            description: "Mercado".to_string(),
            amount: 120.0,
            kind: TransactionType::Expense,
            category_id: "Alimentação".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        }
    }

    #[test]
    fn accepts_complete_form() {
        assert!(form().validate(&default_categories()).is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        let categories = default_categories();

        let mut f = form();
        f.description = "  ".to_string();
        assert!(f.validate(&categories).is_err());

        let mut f = form();
        f.category_id = String::new();
        assert!(f.validate(&categories).is_err());

        let mut f = form();
        f.amount = 0.0;
        assert!(f.validate(&categories).is_err());

        let mut f = form();
        f.amount = f64::NAN;
        assert!(f.validate(&categories).is_err());
    }

    #[test]
    fn rejects_category_of_other_type() {
        let mut f = form();
        f.category_id = "Salário".to_string();
        assert!(f.validate(&default_categories()).is_err());

        f.kind = TransactionType::Income;
        assert!(f.validate(&default_categories()).is_ok());
    }

    #[test]
    fn accepts_custom_category_labels() {
        let mut f = form();
        f.category_id = "Pets".to_string();
        assert!(f.validate(&default_categories()).is_ok());
    }
}
