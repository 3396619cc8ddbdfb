use super::types::{BudgetInput, ModelConfig, RatioSet, SalaryStructure};

fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 {
        fallback
    } else {
        numerator / denominator
    }
}

fn pct_of_income(amount: f64, income: f64) -> f64 {
    ratio_or(amount, income, 0.0) * 100.0
}

/// Derives the ratio set for one budget. `salary` must already be expressed
/// in the budget's period.
pub fn derive_ratios(
    budget: &BudgetInput,
    salary: &SalaryStructure,
    config: &ModelConfig,
) -> RatioSet {
    let income = budget.income;
    let total = budget.total_expenses();

    RatioSet {
        savings_rate: pct_of_income(income - total, income),
        expense_ratio: pct_of_income(total, income),
        needs_pct: pct_of_income(budget.needs(), income),
        wants_pct: pct_of_income(budget.wants(), income),
        variable_ratio: variable_ratio(salary, config),
        fixed_coverage_ratio: ratio_or(
            salary.fixed_pay(),
            budget.needs(),
            config.advisory_coverage_fallback,
        ),
    }
}

/// Variable pay over gross pay.
pub fn variable_ratio(salary: &SalaryStructure, config: &ModelConfig) -> f64 {
    ratio_or(
        salary.variable_pay,
        salary.gross(),
        config.variable_ratio_fallback,
    )
}

/// Fixed pay over essential needs as seen by the alignment score.
pub fn scoring_coverage(fixed_pay: f64, needs: f64, config: &ModelConfig) -> f64 {
    ratio_or(fixed_pay, needs, config.scoring_coverage_fallback)
}

/// Budget savings over gross pay; no gross pay means no measurable savings share.
pub fn savings_to_gross(savings: f64, gross: f64) -> f64 {
    ratio_or(savings, gross, 0.0)
}
