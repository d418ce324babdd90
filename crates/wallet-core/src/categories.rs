//! Category registry
//!
//! Static mapping from transaction category identifiers to display name and
//! icon. Lookups never fail: an identifier that is not in the registry (or
//! belongs to the other transaction type) renders as "Uncategorized".

use serde::Serialize;

use crate::models::TransactionType;

/// Display name used for unknown category identifiers
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Generic money glyph used for unknown category identifiers
pub const UNCATEGORIZED_ICON: &str = "💰";

/// Every category a transaction can be recorded under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionCategory {
    // Income
    Salary,
    Freelance,
    Investments,
    Gifts,
    OtherIncome,
    // Expense
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Health,
    Education,
    Travel,
    OtherExpense,
}

impl TransactionCategory {
    pub const INCOME: [TransactionCategory; 5] = [
        Self::Salary,
        Self::Freelance,
        Self::Investments,
        Self::Gifts,
        Self::OtherIncome,
    ];

    pub const EXPENSE: [TransactionCategory; 9] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Entertainment,
        Self::Bills,
        Self::Health,
        Self::Education,
        Self::Travel,
        Self::OtherExpense,
    ];

    /// Identifier as stored on transactions
    pub fn id(&self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Freelance => "freelance",
            Self::Investments => "investments",
            Self::Gifts => "gifts",
            Self::OtherIncome => "other_income",
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Bills => "bills",
            Self::Health => "health",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::OtherExpense => "other_expense",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Investments => "Investments",
            Self::Gifts => "Gifts",
            Self::OtherIncome => "Other",
            Self::Food => "Food & Dining",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Bills => "Bills & Utilities",
            Self::Health => "Health & Medical",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::OtherExpense => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Salary => "💰",
            Self::Freelance => "💼",
            Self::Investments => "📈",
            Self::Gifts => "🎁",
            Self::OtherIncome => "➕",
            Self::Food => "🍽️",
            Self::Transport => "🚗",
            Self::Shopping => "🛍️",
            Self::Entertainment => "🎬",
            Self::Bills => "📝",
            Self::Health => "⚕️",
            Self::Education => "📚",
            Self::Travel => "✈️",
            Self::OtherExpense => "➕",
        }
    }

    /// Which transaction type this category belongs to
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Salary | Self::Freelance | Self::Investments | Self::Gifts | Self::OtherIncome => {
                TransactionType::Income
            }
            _ => TransactionType::Expense,
        }
    }

    /// Categories registered for a transaction type, in display order
    pub fn for_type(transaction_type: TransactionType) -> &'static [TransactionCategory] {
        match transaction_type {
            TransactionType::Income => &Self::INCOME,
            TransactionType::Expense => &Self::EXPENSE,
        }
    }

    /// Resolve an identifier within one transaction type's registry
    pub fn from_id(transaction_type: TransactionType, id: &str) -> Option<Self> {
        Self::for_type(transaction_type)
            .iter()
            .copied()
            .find(|c| c.id() == id)
    }

    pub fn info(&self) -> CategoryInfo {
        CategoryInfo {
            id: self.id().to_string(),
            name: self.name(),
            icon: self.icon(),
        }
    }
}

/// Display information for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: &'static str,
    pub icon: &'static str,
}

impl CategoryInfo {
    pub fn is_known(&self) -> bool {
        self.name != UNCATEGORIZED_NAME
    }
}

/// Look up display info for a category identifier
pub fn lookup(transaction_type: TransactionType, id: &str) -> CategoryInfo {
    match TransactionCategory::from_id(transaction_type, id) {
        Some(category) => category.info(),
        None => CategoryInfo {
            id: id.to_string(),
            name: UNCATEGORIZED_NAME,
            icon: UNCATEGORIZED_ICON,
        },
    }
}

/// Registry entries for a transaction type
pub fn categories_for(transaction_type: TransactionType) -> Vec<CategoryInfo> {
    TransactionCategory::for_type(transaction_type)
        .iter()
        .map(TransactionCategory::info)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_category() {
        let info = lookup(TransactionType::Expense, "food");
        assert_eq!(info.name, "Food & Dining");
        assert_eq!(info.icon, "🍽️");
        assert!(info.is_known());
    }

    #[test]
    fn test_lookup_unknown_category_falls_back() {
        let info = lookup(TransactionType::Expense, "crypto");
        assert_eq!(info.name, UNCATEGORIZED_NAME);
        assert_eq!(info.icon, UNCATEGORIZED_ICON);
        assert_eq!(info.id, "crypto");
        assert!(!info.is_known());
    }

    #[test]
    fn test_lookup_is_scoped_to_type() {
        // salary is an income category, not an expense one
        assert!(lookup(TransactionType::Income, "salary").is_known());
        assert!(!lookup(TransactionType::Expense, "salary").is_known());
    }

    #[test]
    fn test_other_ids_are_distinct_per_type() {
        assert!(lookup(TransactionType::Income, "other_income").is_known());
        assert!(lookup(TransactionType::Expense, "other_expense").is_known());
        assert_eq!(lookup(TransactionType::Income, "other_income").name, "Other");
    }

    #[test]
    fn test_registry_sizes() {
        assert_eq!(categories_for(TransactionType::Income).len(), 5);
        assert_eq!(categories_for(TransactionType::Expense).len(), 9);
        for category in TransactionCategory::EXPENSE {
            assert_eq!(category.transaction_type(), TransactionType::Expense);
        }
        for category in TransactionCategory::INCOME {
            assert_eq!(category.transaction_type(), TransactionType::Income);
        }
    }
}
