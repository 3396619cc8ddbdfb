use super::types::{Grade, RatioSet};

/// A message that applies when its predicate holds.
struct Rule<C: ?Sized> {
    applies: fn(&C) -> bool,
    message: &'static str,
}

struct FixContext {
    resilience_loss_pct: f64,
    ratios: RatioSet,
}

const GRADE_A_BASE: [&str; 3] = [
    "Maintain your savings discipline and continue tracking expenses.",
    "Increase long-term investments (PF, NPS, mutual funds).",
    "Build a 6-month emergency fund.",
];

const GRADE_B_BASE: [&str; 3] = [
    "Increase savings slightly to improve shock resilience.",
    "Reduce discretionary spending.",
    "Avoid using variable pay for fixed expenses.",
];

const GRADE_C_BASE: [&str; 3] = [
    "Reduce lifestyle expenses immediately.",
    "Ensure fixed expenses are covered by fixed income.",
    "Avoid reliance on bonuses for regular spending.",
];

const GRADE_D_BASE: [&str; 3] = [
    "Urgently reduce fixed commitments (rent, EMIs, subscriptions).",
    "Stop relying on variable pay for essentials.",
    "Begin emergency savings, even with small amounts.",
];

pub const EXPENSE_RATIO_WARNING: &str = "Expense-to-income ratio is critically high.";
pub const LOW_SAVINGS_WARNING: &str = "Savings are very low. Target at least 10% initially.";
pub const VARIABLE_PAY_WARNING: &str = "High dependence on variable pay increases risk.";
pub const FIXED_COVERAGE_WARNING: &str = "Fixed income does not fully cover fixed needs.";

const WARNING_RULES: [Rule<RatioSet>; 4] = [
    Rule {
        applies: |r| r.expense_ratio > 85.0,
        message: EXPENSE_RATIO_WARNING,
    },
    Rule {
        applies: |r| r.savings_rate < 10.0,
        message: LOW_SAVINGS_WARNING,
    },
    Rule {
        applies: |r| r.variable_ratio > 0.35,
        message: VARIABLE_PAY_WARNING,
    },
    Rule {
        applies: |r| r.fixed_coverage_ratio < 1.0,
        message: FIXED_COVERAGE_WARNING,
    },
];

pub const FIX_MAINTAIN: &str =
    "Your budget absorbs the shock well; keep your current plan and review it quarterly.";
pub const FIX_RAISE_SAVINGS: &str =
    "Raise your savings rate to at least 10% before anything else.";
pub const FIX_REDUCE_VARIABLE: &str =
    "Reduce reliance on variable pay by funding regular spending from fixed pay only.";
pub const FIX_CUT_FIXED: &str =
    "Cut fixed expenses until fixed pay covers your essential needs.";
pub const FIX_REDUCE_DISCRETIONARY: &str =
    "Reduce discretionary spending to widen your safety margin.";

const FIX_RULES: [Rule<FixContext>; 4] = [
    Rule {
        applies: |c| c.resilience_loss_pct <= 10.0,
        message: FIX_MAINTAIN,
    },
    Rule {
        applies: |c| c.ratios.savings_rate < 10.0,
        message: FIX_RAISE_SAVINGS,
    },
    Rule {
        applies: |c| c.ratios.variable_ratio > 0.35,
        message: FIX_REDUCE_VARIABLE,
    },
    Rule {
        applies: |c| c.ratios.fixed_coverage_ratio < 1.0,
        message: FIX_CUT_FIXED,
    },
];

pub fn grade(score: u32) -> Grade {
    if score >= 80 {
        Grade::A
    } else if score >= 65 {
        Grade::B
    } else if score >= 50 {
        Grade::C
    } else {
        Grade::D
    }
}

fn base_recommendations(grade: Grade) -> &'static [&'static str; 3] {
    match grade {
        Grade::A => &GRADE_A_BASE,
        Grade::B => &GRADE_B_BASE,
        Grade::C => &GRADE_C_BASE,
        Grade::D => &GRADE_D_BASE,
    }
}

/// Base advice for `grade` followed by every warning whose condition holds,
/// in rule order.
pub fn recommendations(grade: Grade, ratios: &RatioSet) -> Vec<String> {
    base_recommendations(grade)
        .iter()
        .copied()
        .chain(
            WARNING_RULES
                .iter()
                .filter(|rule| (rule.applies)(ratios))
                .map(|rule| rule.message),
        )
        .map(str::to_string)
        .collect()
}

/// The single highest-priority fix; the first matching rule wins.
pub fn fastest_fix(resilience_loss_pct: f64, ratios: &RatioSet) -> &'static str {
    let ctx = FixContext {
        resilience_loss_pct,
        ratios: *ratios,
    };
    FIX_RULES
        .iter()
        .find(|rule| (rule.applies)(&ctx))
        .map_or(FIX_REDUCE_DISCRETIONARY, |rule| rule.message)
}
