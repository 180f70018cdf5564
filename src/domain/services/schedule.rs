use chrono::{NaiveDate, Utc};
use serde::Serialize;
use crate::domain::models::plan::InstallmentPlan;
use crate::error::AppError;

/// Where the plan discount lands. The default rewards full-plan commitment:
/// the deposit is never discounted, only the remainder that gets split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountScope {
    Remainder,
    Total,
}

impl DiscountScope {
    pub fn from_config(value: &str) -> Self {
        match value {
            "TOTAL" => DiscountScope::Total,
            _ => DiscountScope::Remainder,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleLine {
    pub kind: String,
    pub sequence_number: Option<i32>,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
}

fn apply_discount(amount_cents: i64, percentage: f64) -> i64 {
    let discount = (amount_cents as f64 * percentage / 100.0).round() as i64;
    amount_cents - discount
}

/// Derives the deposit-plus-installments schedule for a total price.
///
/// Without a plan the schedule is a single deposit line of the configured
/// default. With a plan, the post-deposit remainder (discounted per `scope`)
/// is split evenly across the installments; the integer-division remainder
/// lands on the last installment so the lines reconcile to the cent.
pub fn generate_schedule(
    total_cents: i64,
    plan: Option<&InstallmentPlan>,
    default_deposit_cents: i64,
    scope: DiscountScope,
) -> Result<Vec<ScheduleLine>, AppError> {
    let today = Utc::now().date_naive();

    let Some(plan) = plan else {
        return Ok(vec![ScheduleLine {
            kind: "DEPOSIT".to_string(),
            sequence_number: None,
            amount_cents: default_deposit_cents,
            due_date: today,
        }]);
    };

    if plan.number_of_installments < 1 {
        return Err(AppError::InvalidPlan("plan must have at least one installment".to_string()));
    }

    let due_dates = plan.due_dates();
    if due_dates.len() != plan.number_of_installments as usize {
        return Err(AppError::InvalidPlan(format!(
            "plan has {} due dates for {} installments",
            due_dates.len(),
            plan.number_of_installments
        )));
    }

    if total_cents <= plan.deposit_cents {
        return Err(AppError::InvalidPlan(
            "total does not exceed the deposit; book without a plan for a deposit-only schedule".to_string(),
        ));
    }

    let remaining = match scope {
        DiscountScope::Remainder => apply_discount(total_cents - plan.deposit_cents, plan.discount_percentage),
        DiscountScope::Total => apply_discount(total_cents, plan.discount_percentage) - plan.deposit_cents,
    };

    if remaining <= 0 {
        return Err(AppError::InvalidPlan(
            "discounted total does not exceed the deposit".to_string(),
        ));
    }

    let count = plan.number_of_installments as i64;
    let per_installment = remaining / count;
    let remainder = remaining - per_installment * count;

    let mut lines = Vec::with_capacity(due_dates.len() + 1);
    lines.push(ScheduleLine {
        kind: "DEPOSIT".to_string(),
        sequence_number: None,
        amount_cents: plan.deposit_cents,
        due_date: today,
    });

    for (idx, due_date) in due_dates.iter().enumerate() {
        let last = idx as i64 == count - 1;
        lines.push(ScheduleLine {
            kind: "INSTALLMENT".to_string(),
            sequence_number: Some(idx as i32 + 1),
            amount_cents: per_installment + if last { remainder } else { 0 },
            due_date: *due_date,
        });
    }

    Ok(lines)
}

/// Flat plus percentage late fee for an overdue schedule line. Display-only;
/// the ledger never adds this to the invoice amount on its own.
pub fn late_fee_cents(amount_cents: i64, plan: &InstallmentPlan) -> i64 {
    plan.late_fee_flat_cents + (amount_cents as f64 * plan.late_fee_percentage / 100.0).round() as i64
}
