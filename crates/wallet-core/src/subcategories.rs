//! Budget subcategories and the transaction-category remapping tables
//!
//! Budget allocation lines use their own labels ("Groceries", "Gym", ...)
//! which are distinct from transaction category identifiers. Two disjoint
//! tables bridge expense categories onto needs and wants. A category with no
//! entry in either table is simply not tracked against the budget.

use serde::Serialize;

use crate::categories::TransactionCategory;
use crate::models::BudgetBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NeedSubcategory {
    LaptopBill,
    Klarna,
    Food,
    Parental,
    Transport,
    Groceries,
}

impl NeedSubcategory {
    /// Reference list used to fill in budget lines missing from storage
    pub const ALL: [NeedSubcategory; 6] = [
        Self::LaptopBill,
        Self::Klarna,
        Self::Food,
        Self::Parental,
        Self::Transport,
        Self::Groceries,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::LaptopBill => "Laptop bill",
            Self::Klarna => "Klarna",
            Self::Food => "Food",
            Self::Parental => "Parental",
            Self::Transport => "Transport",
            Self::Groceries => "Groceries",
        }
    }

    /// Spelling used by lines saved before the names were tidied
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::LaptopBill => "Laptop bill",
            Self::Klarna => "klarna",
            Self::Food => "food",
            Self::Parental => "parental",
            Self::Transport => "transport",
            Self::Groceries => "groceries",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WantSubcategory {
    CodingSubscription,
    ClothingFashion,
    EatOutTakeaway,
    EntertainmentSubscription,
    Gym,
    Lessons,
    Disposable,
}

impl WantSubcategory {
    /// Reference list used to fill in budget lines missing from storage
    pub const ALL: [WantSubcategory; 7] = [
        Self::CodingSubscription,
        Self::ClothingFashion,
        Self::EatOutTakeaway,
        Self::EntertainmentSubscription,
        Self::Gym,
        Self::Lessons,
        Self::Disposable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CodingSubscription => "Coding subscription",
            Self::ClothingFashion => "Clothing/fashion",
            Self::EatOutTakeaway => "Eat-out/takeaway",
            Self::EntertainmentSubscription => "Entertainment subscription (streaming, music)",
            Self::Gym => "Gym",
            Self::Lessons => "Lessons",
            Self::Disposable => "Disposable",
        }
    }

    /// Spelling used by lines saved before the names were tidied
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::CodingSubscription => "coding - subcription",
            Self::ClothingFashion => "clothing/fashion",
            Self::EatOutTakeaway => "eat-out/takeaway",
            Self::EntertainmentSubscription => "entertatinment subcription(streaming,music)",
            Self::Gym => "gym",
            Self::Lessons => "Lessons",
            Self::Disposable => "dispoable",
        }
    }
}

/// A budget subcategory in either bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BudgetSubcategory {
    Need(NeedSubcategory),
    Want(WantSubcategory),
}

impl BudgetSubcategory {
    pub fn bucket(&self) -> BudgetBucket {
        match self {
            Self::Need(_) => BudgetBucket::Need,
            Self::Want(_) => BudgetBucket::Want,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Need(n) => n.name(),
            Self::Want(w) => w.name(),
        }
    }
}

/// Default subcategory names for a bucket, in display order
pub fn reference_names(bucket: BudgetBucket) -> Vec<&'static str> {
    match bucket {
        BudgetBucket::Need => NeedSubcategory::ALL.iter().map(|n| n.name()).collect(),
        BudgetBucket::Want => WantSubcategory::ALL.iter().map(|w| w.name()).collect(),
    }
}

/// Reference name a stored line belongs to: an exact or case-insensitive
/// match, or the legacy spelling of a reference line.
pub fn canonical_name(bucket: BudgetBucket, stored: &str) -> Option<&'static str> {
    let pairs: Vec<(&'static str, &'static str)> = match bucket {
        BudgetBucket::Need => NeedSubcategory::ALL
            .iter()
            .map(|n| (n.name(), n.legacy_name()))
            .collect(),
        BudgetBucket::Want => WantSubcategory::ALL
            .iter()
            .map(|w| (w.name(), w.legacy_name()))
            .collect(),
    };
    let stored = stored.trim();
    pairs
        .into_iter()
        .find(|(name, legacy)| name.eq_ignore_ascii_case(stored) || *legacy == stored)
        .map(|(name, _)| name)
}

/// Needs table: expense categories tracked against a need allocation
pub fn needs_mapping(category: TransactionCategory) -> Option<NeedSubcategory> {
    match category {
        TransactionCategory::Food => Some(NeedSubcategory::Food),
        TransactionCategory::Transport => Some(NeedSubcategory::Transport),
        TransactionCategory::Bills => Some(NeedSubcategory::LaptopBill),
        TransactionCategory::Shopping
        | TransactionCategory::Entertainment
        | TransactionCategory::Health
        | TransactionCategory::Education
        | TransactionCategory::Travel
        | TransactionCategory::OtherExpense
        | TransactionCategory::Salary
        | TransactionCategory::Freelance
        | TransactionCategory::Investments
        | TransactionCategory::Gifts
        | TransactionCategory::OtherIncome => None,
    }
}

/// Wants table: expense categories tracked against a want allocation
pub fn wants_mapping(category: TransactionCategory) -> Option<WantSubcategory> {
    match category {
        TransactionCategory::Shopping => Some(WantSubcategory::ClothingFashion),
        TransactionCategory::Entertainment => Some(WantSubcategory::EntertainmentSubscription),
        TransactionCategory::Education => Some(WantSubcategory::Lessons),
        TransactionCategory::Health => Some(WantSubcategory::Gym),
        TransactionCategory::Food
        | TransactionCategory::Transport
        | TransactionCategory::Bills
        | TransactionCategory::Travel
        | TransactionCategory::OtherExpense
        | TransactionCategory::Salary
        | TransactionCategory::Freelance
        | TransactionCategory::Investments
        | TransactionCategory::Gifts
        | TransactionCategory::OtherIncome => None,
    }
}

/// Budget subcategory an expense category is tracked against, if any
pub fn budget_subcategory(category: TransactionCategory) -> Option<BudgetSubcategory> {
    needs_mapping(category)
        .map(BudgetSubcategory::Need)
        .or_else(|| wants_mapping(category).map(BudgetSubcategory::Want))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_disjoint() {
        for category in TransactionCategory::EXPENSE {
            assert!(
                !(needs_mapping(category).is_some() && wants_mapping(category).is_some()),
                "{:?} is mapped in both tables",
                category
            );
        }
    }

    #[test]
    fn test_income_categories_are_never_tracked() {
        for category in TransactionCategory::INCOME {
            assert_eq!(budget_subcategory(category), None);
        }
    }

    #[test]
    fn test_unmapped_expense_is_none() {
        assert_eq!(budget_subcategory(TransactionCategory::Travel), None);
        assert_eq!(budget_subcategory(TransactionCategory::OtherExpense), None);
    }

    #[test]
    fn test_mapped_targets_are_reference_names() {
        for category in TransactionCategory::EXPENSE {
            if let Some(sub) = budget_subcategory(category) {
                assert!(reference_names(sub.bucket()).contains(&sub.name()));
            }
        }
    }

    #[test]
    fn test_every_category_is_listed_in_both_tables() {
        let all = TransactionCategory::EXPENSE
            .into_iter()
            .chain(TransactionCategory::INCOME);
        let mapped: Vec<_> = all.filter_map(budget_subcategory).collect();
        assert_eq!(mapped.len(), 7);
    }

    #[test]
    fn test_canonical_name_accepts_legacy_spellings() {
        assert_eq!(canonical_name(BudgetBucket::Need, "klarna"), Some("Klarna"));
        assert_eq!(canonical_name(BudgetBucket::Need, "GROCERIES"), Some("Groceries"));
        assert_eq!(
            canonical_name(BudgetBucket::Want, "entertatinment subcription(streaming,music)"),
            Some("Entertainment subscription (streaming, music)")
        );
        assert_eq!(canonical_name(BudgetBucket::Want, "dispoable"), Some("Disposable"));
        assert_eq!(canonical_name(BudgetBucket::Want, "food"), None);
        assert_eq!(canonical_name(BudgetBucket::Need, "Pet insurance"), None);
    }

    #[test]
    fn test_food_maps_to_need() {
        let sub = budget_subcategory(TransactionCategory::Food).unwrap();
        assert_eq!(sub.bucket(), BudgetBucket::Need);
        assert_eq!(sub.name(), "Food");
    }
}
