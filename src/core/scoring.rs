use super::ratios::{savings_to_gross, scoring_coverage, variable_ratio};
use super::types::{BudgetInput, ModelConfig, RatioSet, SalaryStructure};

const EXPENSE_RATIO_BANDS: [(f64, f64); 2] = [(70.0, 30.0), (85.0, 15.0)];
const EXPENSE_RATIO_FLOOR: f64 = 5.0;

const COVERAGE_BANDS: [(f64, f64); 3] = [(1.2, 40.0), (1.0, 30.0), (0.8, 15.0)];
const VARIABLE_RATIO_BANDS: [(f64, f64); 3] = [(0.2, 30.0), (0.35, 20.0), (0.5, 10.0)];
const SAVINGS_TO_GROSS_BANDS: [(f64, f64); 3] = [(0.25, 30.0), (0.15, 20.0), (0.1, 10.0)];
const ABSORPTION_BANDS: [(f64, f64); 3] = [(0.75, 30.0), (0.5, 20.0), (0.25, 10.0)];
const BAND_FLOOR: f64 = 5.0;

const OVERALL_BUDGET_WEIGHT: f64 = 0.6;
const OVERALL_ALIGNMENT_WEIGHT: f64 = 0.4;

/// Points of the first band whose threshold `value` reaches, checking the
/// highest threshold first.
fn points_at_least(value: f64, bands: &[(f64, f64)], floor: f64) -> f64 {
    bands
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(floor, |&(_, points)| points)
}

/// Points of the first band whose ceiling `value` stays within, checking the
/// lowest ceiling first.
fn points_at_most(value: f64, bands: &[(f64, f64)], floor: f64) -> f64 {
    bands
        .iter()
        .find(|(ceiling, _)| value <= *ceiling)
        .map_or(floor, |&(_, points)| points)
}

fn round_score(raw: f64) -> u32 {
    debug_assert!((0.0..=100.0).contains(&raw), "score {raw} out of range");
    raw.round_ties_even() as u32
}

pub fn budget_health_score(ratios: &RatioSet) -> u32 {
    let mut score = (ratios.savings_rate / 20.0 * 40.0).clamp(0.0, 40.0);
    score += points_at_most(ratios.expense_ratio, &EXPENSE_RATIO_BANDS, EXPENSE_RATIO_FLOOR);
    if ratios.needs_pct <= 30.0 {
        score += 10.0;
    }
    if ratios.wants_pct <= 30.0 {
        score += 10.0;
    }
    if ratios.savings_rate >= 20.0 {
        score += 10.0;
    }
    round_score(score)
}

/// How well the salary structure carries the budget. `salary` must already be
/// in the budget's period.
pub fn pay_alignment_score(
    budget: &BudgetInput,
    salary: &SalaryStructure,
    config: &ModelConfig,
) -> u32 {
    let gross = salary.gross();
    let coverage = scoring_coverage(salary.fixed_pay(), budget.needs(), config);
    let variable_share = variable_ratio(salary, config);
    let savings_ratio = savings_to_gross(budget.savings(), gross);

    let score = points_at_least(coverage, &COVERAGE_BANDS, BAND_FLOOR)
        + points_at_most(variable_share, &VARIABLE_RATIO_BANDS, BAND_FLOOR)
        + points_at_least(savings_ratio, &SAVINGS_TO_GROSS_BANDS, BAND_FLOOR);
    round_score(score)
}

/// Scores how well a take-home figure carries the budget. Called with the
/// normal figures and again with the shocked ones.
pub fn stress_test_score(
    total_expenses: f64,
    take_home: f64,
    normal_savings: f64,
    shocked_savings: f64,
) -> u32 {
    let mut score = if take_home >= total_expenses {
        40.0
    } else if take_home >= 0.9 * total_expenses {
        25.0
    } else {
        10.0
    };

    score += if shocked_savings > 0.0 {
        30.0
    } else if shocked_savings == 0.0 {
        15.0
    } else {
        0.0
    };

    score += if normal_savings > 0.0 {
        points_at_least(shocked_savings / normal_savings, &ABSORPTION_BANDS, BAND_FLOOR)
    } else {
        BAND_FLOOR
    };
    round_score(score)
}

pub fn overall_score(budget_score: u32, alignment_score: u32) -> u32 {
    round_score(
        OVERALL_BUDGET_WEIGHT * f64::from(budget_score)
            + OVERALL_ALIGNMENT_WEIGHT * f64::from(alignment_score),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ratios::derive_ratios;
    use crate::core::types::{ExpenseCategory, Expenses, Period};
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};

    fn worked_budget() -> BudgetInput {
        BudgetInput {
            period: Period::Monthly,
            income: 50_000.0,
            expenses: Expenses::default()
                .with(ExpenseCategory::Housing, 15_000.0)
                .with(ExpenseCategory::Food, 8_000.0)
                .with(ExpenseCategory::Transport, 3_000.0)
                .with(ExpenseCategory::Utilities, 2_000.0)
                .with(ExpenseCategory::Lifestyle, 5_000.0)
                .with(ExpenseCategory::Others, 2_000.0),
        }
    }

    fn ratios(savings_rate: f64, expense_ratio: f64, needs_pct: f64, wants_pct: f64) -> RatioSet {
        RatioSet {
            savings_rate,
            expense_ratio,
            needs_pct,
            wants_pct,
            variable_ratio: 0.0,
            fixed_coverage_ratio: 0.0,
        }
    }

    #[test]
    fn worked_budget_scores_ninety() {
        let budget = worked_budget();
        let ratios = derive_ratios(
            &budget,
            &SalaryStructure::zero(Period::Monthly),
            &ModelConfig::default(),
        );
        // 40 savings + 30 expense band + 0 needs (50%) + 10 wants + 10 savings bonus
        assert_eq!(budget_health_score(&ratios), 90);
    }

    #[test]
    fn expense_ratio_bands_are_checked_lowest_ceiling_first() {
        assert_eq!(budget_health_score(&ratios(0.0, 70.0, 100.0, 100.0)), 30);
        assert_eq!(budget_health_score(&ratios(0.0, 70.01, 100.0, 100.0)), 15);
        assert_eq!(budget_health_score(&ratios(0.0, 85.0, 100.0, 100.0)), 15);
        assert_eq!(budget_health_score(&ratios(0.0, 85.01, 100.0, 100.0)), 5);
    }

    #[test]
    fn deficit_budget_does_not_go_below_zero() {
        // savings rate -150% would contribute -300 without the lower clamp
        assert_eq!(budget_health_score(&ratios(-150.0, 250.0, 200.0, 50.0)), 5);
    }

    #[test]
    fn partial_savings_component_is_rounded_once_at_the_end() {
        // 12.6% savings -> 25.2 points, + 15 expense band
        assert_eq!(budget_health_score(&ratios(12.6, 80.0, 100.0, 100.0)), 40);
        // 13.9% savings -> 27.8 points, + 15 expense band
        assert_eq!(budget_health_score(&ratios(13.9, 80.0, 100.0, 100.0)), 43);
    }

    #[test]
    fn alignment_with_zero_needs_awards_full_coverage_tier() {
        let budget = BudgetInput {
            period: Period::Monthly,
            income: 20_000.0,
            expenses: Expenses::default(),
        };
        let mut salary = SalaryStructure::zero(Period::Monthly);
        salary.basic = 20_000.0;
        // coverage fallback 1 -> 30, variable 0 -> 30, savings/gross 1.0 -> 30
        assert_eq!(
            pay_alignment_score(&budget, &salary, &ModelConfig::default()),
            90
        );
    }

    #[test]
    fn alignment_bands_for_worked_budget() {
        let budget = worked_budget();
        let salary = SalaryStructure {
            period: Period::Monthly,
            basic: 24_000.0,
            hra: 6_000.0,
            allowance: 0.0,
            variable_pay: 10_000.0,
            employee_pf: 0.0,
            income_tax: 0.0,
            professional_tax: 0.0,
        };
        // coverage 30k/25k = 1.2 -> 40, variable 10k/40k = 0.25 -> 20,
        // savings 15k/40k = 0.375 -> 30
        assert_eq!(
            pay_alignment_score(&budget, &salary, &ModelConfig::default()),
            90
        );
    }

    #[test]
    fn alignment_with_no_salary_is_minimal() {
        // coverage 0 -> 5, variable fallback 1 -> 5, savings/gross fallback 0 -> 5
        assert_eq!(
            pay_alignment_score(
                &worked_budget(),
                &SalaryStructure::zero(Period::Monthly),
                &ModelConfig::default()
            ),
            15
        );
    }

    #[test]
    fn alignment_uses_configured_variable_fallback_without_gross() {
        let config = ModelConfig {
            variable_ratio_fallback: 0.0,
            ..ModelConfig::default()
        };
        // coverage 0 -> 5, variable fallback 0 -> 30, savings/gross fallback 0 -> 5
        assert_eq!(
            pay_alignment_score(
                &worked_budget(),
                &SalaryStructure::zero(Period::Monthly),
                &config
            ),
            40
        );
    }

    #[test]
    fn stress_test_bands() {
        assert_eq!(stress_test_score(100.0, 200.0, 100.0, 100.0), 100);
        assert_eq!(stress_test_score(100.0, 95.0, 100.0, -5.0), 30);
        assert_eq!(stress_test_score(100.0, 100.0, 100.0, 0.0), 60);
        assert_eq!(stress_test_score(100.0, 80.0, 0.0, -20.0), 15);
        assert_eq!(stress_test_score(100.0, 150.0, 100.0, 50.0), 90);
    }

    #[test]
    fn all_zero_stress_inputs_still_score() {
        assert_eq!(stress_test_score(0.0, 0.0, 0.0, 0.0), 60);
    }

    #[test]
    fn overall_blends_budget_and_alignment() {
        assert_eq!(overall_score(90, 60), 78);
        assert_eq!(overall_score(100, 100), 100);
        assert_eq!(overall_score(0, 0), 0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_budget_and_alignment_scores_stay_in_range(
            income in 0u32..3_000_000,
            amounts in proptest::array::uniform6(0u32..900_000),
            basic in 0u32..2_000_000,
            variable in 0u32..1_000_000
        ) {
            let budget = BudgetInput {
                period: Period::Monthly,
                income: income as f64,
                expenses: Expenses::from_amounts(amounts.map(f64::from)),
            };
            let mut salary = SalaryStructure::zero(Period::Monthly);
            salary.basic = basic as f64;
            salary.variable_pay = variable as f64;
            let config = ModelConfig::default();

            let ratios = derive_ratios(&budget, &salary, &config);
            let budget_score = budget_health_score(&ratios);
            let alignment = pay_alignment_score(&budget, &salary, &config);
            prop_assert!(budget_score <= 100);
            prop_assert!((15..=100).contains(&alignment));
            prop_assert!(overall_score(budget_score, alignment) <= 100);

            prop_assert_eq!(budget_score, budget_health_score(&ratios));
            prop_assert_eq!(alignment, pay_alignment_score(&budget, &salary, &config));
        }

        #[test]
        fn prop_stress_score_stays_in_range(
            total in 0u32..1_000_000,
            take_home in any::<i32>(),
            normal in any::<i32>(),
            shocked in any::<i32>()
        ) {
            let score = stress_test_score(total as f64, take_home as f64, normal as f64, shocked as f64);
            prop_assert!((15..=100).contains(&score));
        }
    }
}
