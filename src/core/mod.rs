mod advisor;
mod engine;
mod ratios;
mod report;
mod scoring;
mod shock;
mod types;

pub use advisor::{fastest_fix, grade, recommendations};
pub use engine::evaluate;
pub use ratios::derive_ratios;
pub use report::{
    REFLECTION_QUESTIONS, Report, ReportRow, ReportTable, ReportValue, assemble_report,
};
pub use scoring::{budget_health_score, overall_score, pay_alignment_score, stress_test_score};
pub use shock::{assess_resilience, resilience_loss_pct, simulate_shock};
pub use types::{
    BudgetInput, Evaluation, EvaluationRequest, ExpenseCategory, Expenses, Grade, ModelConfig,
    Period, RatioSet, ResilienceOutcome, SalaryStructure, ScoreSet, ShockModel, ShockOutcome,
    ShockScenario,
};
