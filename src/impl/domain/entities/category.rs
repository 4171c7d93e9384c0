use super::transaction::TransactionType;

/// Category labels are stored verbatim in the record's category column, so
/// `id` and `name` coincide for the built-in catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: TransactionType,
    pub color: String,
    pub icon: String,
}

fn category(name: &str, kind: TransactionType, color: &str, icon: &str) -> Category {
    Category {
        id: name.to_string(),
        name: name.to_string(),
        kind,
        color: color.to_string(),
        icon: icon.to_string(),
    }
}

pub fn default_categories() -> Vec<Category> {
    use TransactionType::{Expense, Income};
    vec![
        category("Alimentação", Expense, "#ef4444", "🍱"),
        category("Transporte", Expense, "#94a3b8", "🚗"),
        category("Moradia", Expense, "#f59e0b", "🏠"),
        category("Educação", Expense, "#3b82f6", "📚"),
        category("Assinaturas", Expense, "#6366f1", "📺"),
        category("Lazer / Diversão", Expense, "#ec4899", "🎉"),
        category("Saúde / Cuidados", Expense, "#10b981", "🏥"),
        category("Cartão de Crédito", Expense, "#8b5cf6", "💳"),
        category("Outros", Expense, "#64748b", "📦"),
        category("Salário", Income, "#22c55e", "💰"),
        category("Vendas", Income, "#10b981", "🏷️"),
        category("Dividendos", Income, "#3b82f6", "📈"),
        category("Freelance", Income, "#8b5cf6", "💻"),
        category("Renda Extra", Income, "#f59e0b", "🎁"),
    ]
}
