use tracing::debug;

use super::advisor::{fastest_fix, recommendations};
use super::ratios::derive_ratios;
use super::scoring::{budget_health_score, overall_score, pay_alignment_score};
use super::shock::{assess_resilience, simulate_shock};
use super::types::{Evaluation, EvaluationRequest, ModelConfig, SalaryStructure, ScoreSet};

/// Runs the full pipeline for one request.
///
/// Salary figures are converted to the budget's period first. A request
/// without salary is evaluated as if every salary component were zero.
pub fn evaluate(request: &EvaluationRequest, config: &ModelConfig) -> Evaluation {
    let budget = &request.budget;
    let salary = request
        .salary
        .map(|s| s.normalized_to(budget.period))
        .unwrap_or_else(|| SalaryStructure::zero(budget.period));

    let ratios = derive_ratios(budget, &salary, config);
    debug!(
        savings_rate = ratios.savings_rate,
        expense_ratio = ratios.expense_ratio,
        variable_ratio = ratios.variable_ratio,
        "derived ratios"
    );

    let shock = simulate_shock(budget, &salary, request.scenario, config.shock_model);
    let resilience = assess_resilience(budget.total_expenses(), &shock);
    debug!(
        shock_active = request.scenario.is_active(),
        normal = resilience.normal_score,
        shocked = resilience.shocked_score,
        "stress tested"
    );

    let budget_score = budget_health_score(&ratios);
    let alignment_score = pay_alignment_score(budget, &salary, config);
    let scores = ScoreSet {
        budget_score,
        alignment_score,
        stress_score: resilience.shocked_score,
        overall_score: overall_score(budget_score, alignment_score),
    };

    Evaluation {
        period: budget.period,
        ratios,
        scores,
        shock,
        resilience,
        recommendations: recommendations(resilience.grade, &ratios),
        fastest_fix: fastest_fix(resilience.resilience_loss_pct, &ratios),
    }
}
