//! Budget planner command implementations

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use wallet_core::aggregation::{format_money, SavingsWarning};
use wallet_core::db::Database;
use wallet_core::models::BudgetBucket;
use wallet_core::planner::{init_budget, load_budget_plan, save_budget_plan, BudgetPlan};
use wallet_core::store::{BudgetStore, TransactionQuery, TransactionStore};

use crate::cli::Allocation;

fn period_label(plan: &BudgetPlan) -> String {
    match plan.period() {
        Some((start, end)) => format!("{} → {}", start, end),
        None => "N/A".to_string(),
    }
}

fn print_plan(plan: &BudgetPlan) {
    println!();
    println!("📋 Budget");
    println!("   ─────────────────────────────────────────────");
    println!("   Period:   {}", period_label(plan));
    println!("   Income:   {:>15}", format_money(plan.budget.income));
    println!("   Needs:    {:>15}", format_money(plan.needs_total()));
    println!("   Wants:    {:>15}", format_money(plan.wants_total()));
    println!("   Savings:  {:>15}  (20% of income)", format_money(plan.savings()));
    if plan.is_valid() {
        println!("   ✅ Balanced");
    } else {
        println!(
            "   ⚠️  Not balanced: allocated {} of {}",
            format_money(plan.allocated()),
            format_money(plan.budget.income)
        );
    }

    for bucket in [BudgetBucket::Need, BudgetBucket::Want] {
        println!();
        println!("   {}", if bucket == BudgetBucket::Need { "Needs" } else { "Wants" });
        for line in plan.lines(bucket) {
            println!("     {:<46} │ {:>12}", line.category, format_money(line.amount));
        }
    }
}

pub fn cmd_budget_show(db: &Database) -> Result<()> {
    let plan = load_budget_plan(db)?;
    print_plan(&plan);
    if !plan.budget.is_persisted() {
        println!();
        println!("   No budget yet. Create one with: wallet budget init --income 2000");
    }
    Ok(())
}

pub fn cmd_budget_init(
    db: &Database,
    income: Decimal,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    if db.active_budget()?.is_some() {
        bail!("A budget already exists. Edit it with: wallet budget set");
    }

    let plan = init_budget(db, income, start, end)?;
    println!("✅ Budget created");
    print_plan(&plan);
    Ok(())
}

pub fn cmd_budget_set(
    db: &Database,
    income: Option<Decimal>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    needs: &[Allocation],
    wants: &[Allocation],
) -> Result<()> {
    let mut plan = load_budget_plan(db)?;

    if let Some(income) = income {
        if income < Decimal::ZERO {
            bail!("Income must not be negative");
        }
        plan.budget.income = income;
    }
    if start.is_some() {
        plan.budget.start_date = start;
    }
    if end.is_some() {
        plan.budget.end_date = end;
    }
    for a in needs {
        plan.set_allocation(BudgetBucket::Need, &a.name, a.amount);
    }
    for a in wants {
        plan.set_allocation(BudgetBucket::Want, &a.name, a.amount);
    }

    let saved = save_budget_plan(db, &plan)?;
    println!("✅ Budget saved");
    print_plan(&saved);
    Ok(())
}

pub fn cmd_budget_warnings(db: &Database) -> Result<()> {
    let plan = load_budget_plan(db)?;
    if !plan.budget.is_persisted() {
        println!("No budget yet. Create one with: wallet budget init --income 2000");
        return Ok(());
    }

    let transactions = db.list_transactions(&TransactionQuery::period(plan.period()))?;
    let warnings = plan.warnings(&transactions);

    if warnings.is_empty() {
        println!("✅ No budget warnings for {}", period_label(&plan));
        return Ok(());
    }

    println!();
    println!("⚠️  Budget warnings ({})", period_label(&plan));
    println!("   ─────────────────────────────────────────────");
    for w in &warnings.categories {
        println!(
            "   {} {}: spent {} of {}",
            w.bucket,
            w.category,
            format_money(w.spent),
            format_money(w.allocated)
        );
    }
    match warnings.savings {
        Some(SavingsWarning::BelowGoal { goal, money_left }) => println!(
            "   Savings below goal: {} left, goal {}",
            format_money(money_left),
            format_money(goal)
        ),
        Some(SavingsWarning::CloseToGoal { goal, money_left }) => println!(
            "   Savings close to goal: {} left, goal {}",
            format_money(money_left),
            format_money(goal)
        ),
        None => {}
    }

    Ok(())
}
