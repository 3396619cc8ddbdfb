use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Monthly,
    Annual,
}

impl Period {
    /// Converts an amount expressed per `self` into an amount per `target`.
    pub fn convert(self, amount: f64, target: Period) -> f64 {
        match (self, target) {
            (Period::Annual, Period::Monthly) => amount / 12.0,
            (Period::Monthly, Period::Annual) => amount * 12.0,
            _ => amount,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExpenseCategory {
    Housing,
    Food,
    Transport,
    Utilities,
    Lifestyle,
    Others,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Housing,
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Utilities,
        ExpenseCategory::Lifestyle,
        ExpenseCategory::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "Housing (Rent / EMI)",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Lifestyle => "Lifestyle & Entertainment",
            ExpenseCategory::Others => "Others",
        }
    }

    pub fn is_need(self) -> bool {
        matches!(
            self,
            ExpenseCategory::Housing | ExpenseCategory::Food | ExpenseCategory::Utilities
        )
    }

    pub fn is_want(self) -> bool {
        self == ExpenseCategory::Lifestyle
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Spending per category, always held in `ExpenseCategory::ALL` order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Expenses {
    amounts: [f64; 6],
}

impl Expenses {
    pub fn from_amounts(amounts: [f64; 6]) -> Self {
        Self { amounts }
    }

    pub fn with(mut self, category: ExpenseCategory, amount: f64) -> Self {
        self.amounts[category.index()] = amount;
        self
    }

    pub fn get(&self, category: ExpenseCategory) -> f64 {
        self.amounts[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, f64)> + '_ {
        ExpenseCategory::ALL.iter().map(|&c| (c, self.get(c)))
    }

    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }

    pub fn needs(&self) -> f64 {
        self.iter()
            .filter(|(c, _)| c.is_need())
            .map(|(_, amount)| amount)
            .sum()
    }

    pub fn wants(&self) -> f64 {
        self.iter()
            .filter(|(c, _)| c.is_want())
            .map(|(_, amount)| amount)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetInput {
    pub period: Period,
    pub income: f64,
    pub expenses: Expenses,
}

impl BudgetInput {
    pub fn total_expenses(&self) -> f64 {
        self.expenses.total()
    }

    pub fn savings(&self) -> f64 {
        self.income - self.total_expenses()
    }

    pub fn needs(&self) -> f64 {
        self.expenses.needs()
    }

    pub fn wants(&self) -> f64 {
        self.expenses.wants()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryStructure {
    pub period: Period,
    pub basic: f64,
    pub hra: f64,
    pub allowance: f64,
    pub variable_pay: f64,
    pub employee_pf: f64,
    pub income_tax: f64,
    pub professional_tax: f64,
}

impl SalaryStructure {
    pub fn zero(period: Period) -> Self {
        Self {
            period,
            basic: 0.0,
            hra: 0.0,
            allowance: 0.0,
            variable_pay: 0.0,
            employee_pf: 0.0,
            income_tax: 0.0,
            professional_tax: 0.0,
        }
    }

    pub fn fixed_pay(&self) -> f64 {
        self.basic + self.hra + self.allowance
    }

    pub fn gross(&self) -> f64 {
        self.fixed_pay() + self.variable_pay
    }

    pub fn deductions(&self) -> f64 {
        self.employee_pf + self.income_tax + self.professional_tax
    }

    pub fn take_home(&self) -> f64 {
        self.gross() - self.deductions()
    }

    /// Rescales every component so the structure is expressed per `period`.
    pub fn normalized_to(&self, period: Period) -> Self {
        let f = |amount: f64| self.period.convert(amount, period);
        Self {
            period,
            basic: f(self.basic),
            hra: f(self.hra),
            allowance: f(self.allowance),
            variable_pay: f(self.variable_pay),
            employee_pf: f(self.employee_pf),
            income_tax: f(self.income_tax),
            professional_tax: f(self.professional_tax),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioSet {
    pub savings_rate: f64,
    pub expense_ratio: f64,
    pub needs_pct: f64,
    pub wants_pct: f64,
    pub variable_ratio: f64,
    pub fixed_coverage_ratio: f64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub budget_score: u32,
    pub alignment_score: u32,
    pub stress_score: u32,
    pub overall_score: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ShockScenario {
    pub bonus_not_paid: bool,
    pub tax_increased: bool,
}

impl ShockScenario {
    pub fn is_active(self) -> bool {
        self.bonus_not_paid || self.tax_increased
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShockModel {
    /// Payroll-based: withheld variable pay, income tax scaled by `tax_multiplier`.
    Detailed { tax_multiplier: f64 },
    /// Flat shares of income stand in for variable pay and the tax rise.
    Approximate { bonus_share: f64, tax_share: f64 },
}

impl ShockModel {
    pub const DEFAULT_TAX_MULTIPLIER: f64 = 1.2;
    pub const DEFAULT_BONUS_SHARE: f64 = 0.10;
    pub const DEFAULT_TAX_SHARE: f64 = 0.05;

    pub fn detailed() -> Self {
        ShockModel::Detailed {
            tax_multiplier: Self::DEFAULT_TAX_MULTIPLIER,
        }
    }

    pub fn approximate() -> Self {
        ShockModel::Approximate {
            bonus_share: Self::DEFAULT_BONUS_SHARE,
            tax_share: Self::DEFAULT_TAX_SHARE,
        }
    }
}

/// Fallbacks and shock model used by one evaluation.
///
/// With no essential needs the alignment score treats fixed pay as covering
/// them (`scoring_coverage_fallback`) while the advisor treats it as not
/// covering them (`advisory_coverage_fallback`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub shock_model: ShockModel,
    pub variable_ratio_fallback: f64,
    pub scoring_coverage_fallback: f64,
    pub advisory_coverage_fallback: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            shock_model: ShockModel::detailed(),
            variable_ratio_fallback: 1.0,
            scoring_coverage_fallback: 1.0,
            advisory_coverage_fallback: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShockOutcome {
    pub base_take_home: f64,
    pub shocked_take_home: f64,
    pub normal_savings: f64,
    pub shocked_savings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResilienceOutcome {
    pub normal_score: u32,
    pub shocked_score: u32,
    pub grade: Grade,
    pub resilience_loss_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub budget: BudgetInput,
    pub salary: Option<SalaryStructure>,
    pub scenario: ShockScenario,
    pub reflections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub period: Period,
    pub ratios: RatioSet,
    pub scores: ScoreSet,
    pub shock: ShockOutcome,
    pub resilience: ResilienceOutcome,
    pub recommendations: Vec<String>,
    pub fastest_fix: &'static str,
}
