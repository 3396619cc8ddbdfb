use super::advisor::grade;
use super::scoring::stress_test_score;
use super::types::{
    BudgetInput, ResilienceOutcome, SalaryStructure, ShockModel, ShockOutcome, ShockScenario,
};

/// Applies `scenario` under `model`. `salary` must already be in the budget's
/// period; the approximate model ignores it.
pub fn simulate_shock(
    budget: &BudgetInput,
    salary: &SalaryStructure,
    scenario: ShockScenario,
    model: ShockModel,
) -> ShockOutcome {
    let (base_take_home, shocked_take_home) = match model {
        ShockModel::Detailed { tax_multiplier } => {
            let variable = if scenario.bonus_not_paid {
                0.0
            } else {
                salary.variable_pay
            };
            let tax = if scenario.tax_increased {
                salary.income_tax * tax_multiplier
            } else {
                salary.income_tax
            };
            let shocked = (salary.fixed_pay() + variable)
                - (salary.employee_pf + tax + salary.professional_tax);
            (salary.take_home(), shocked)
        }
        ShockModel::Approximate {
            bonus_share,
            tax_share,
        } => {
            let mut shocked = budget.income;
            if scenario.bonus_not_paid {
                shocked -= budget.income * bonus_share;
            }
            if scenario.tax_increased {
                shocked -= budget.income * tax_share;
            }
            (budget.income, shocked)
        }
    };

    let total = budget.total_expenses();
    ShockOutcome {
        base_take_home,
        shocked_take_home,
        normal_savings: base_take_home - total,
        shocked_savings: shocked_take_home - total,
    }
}

/// Scores the stress test before and after the shock and grades the shocked
/// result.
pub fn assess_resilience(total_expenses: f64, outcome: &ShockOutcome) -> ResilienceOutcome {
    let normal_score = stress_test_score(
        total_expenses,
        outcome.base_take_home,
        outcome.normal_savings,
        outcome.normal_savings,
    );
    let shocked_score = stress_test_score(
        total_expenses,
        outcome.shocked_take_home,
        outcome.normal_savings,
        outcome.shocked_savings,
    );

    ResilienceOutcome {
        normal_score,
        shocked_score,
        grade: grade(shocked_score),
        resilience_loss_pct: resilience_loss_pct(normal_score, shocked_score),
    }
}

pub fn resilience_loss_pct(normal_score: u32, shocked_score: u32) -> f64 {
    if normal_score == 0 {
        return 0.0;
    }
    let normal = f64::from(normal_score);
    (normal - f64::from(shocked_score)) / normal * 100.0
}
