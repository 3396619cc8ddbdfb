use serde::Serialize;

use super::types::{BudgetInput, Evaluation, EvaluationRequest};

pub const REFLECTION_QUESTIONS: [&str; 5] = [
    "What surprised you most about your spending?",
    "Which expense would you reduce and why?",
    "Did your budget follow the 30–30–20 rule?",
    "How did income structure affect your risk?",
    "What would you change after seeing the stress test?",
];

pub const SUMMARY_TABLE: &str = "Summary";
pub const EXPENSES_TABLE: &str = "Expenses";
pub const CTC_STRUCTURE_TABLE: &str = "CTC_Structure";
pub const BUDGET_ALLOCATION_TABLE: &str = "Budget_Allocation";
pub const RECOMMENDATIONS_TABLE: &str = "Recommendations";
pub const REFLECTION_TABLE: &str = "Reflection";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    Amount(f64),
    Percent(f64),
    Score(u32),
    Text(String),
}

impl ReportValue {
    /// Summary percentages are shown with two decimals.
    fn rounded_percent(value: f64) -> Self {
        ReportValue::Percent((value * 100.0).round() / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub key: String,
    pub value: ReportValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTable {
    pub name: &'static str,
    pub key_header: &'static str,
    pub value_header: &'static str,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    fn new(name: &'static str, key_header: &'static str, value_header: &'static str) -> Self {
        Self {
            name,
            key_header,
            value_header,
            rows: Vec::new(),
        }
    }

    fn row(mut self, key: impl Into<String>, value: ReportValue) -> Self {
        self.rows.push(ReportRow {
            key: key.into(),
            value,
        });
        self
    }

    pub fn value(&self, key: &str) -> Option<&ReportValue> {
        self.rows.iter().find(|r| r.key == key).map(|r| &r.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    pub tables: Vec<ReportTable>,
}

impl Report {
    pub fn table(&self, name: &str) -> Option<&ReportTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Packages an evaluation and its inputs into named export tables.
///
/// The CTC table is left out when the request carries no salary figures and
/// the allocation table when there is no income to allocate. Salary amounts
/// are reported in the budget's period.
pub fn assemble_report(request: &EvaluationRequest, evaluation: &Evaluation) -> Report {
    let budget = &request.budget;
    let mut tables = vec![
        summary_table(budget, evaluation),
        expenses_table(budget),
    ];
    if let Some(salary) = request.salary.map(|s| s.normalized_to(budget.period)) {
        tables.push(
            ReportTable::new(CTC_STRUCTURE_TABLE, "Component", "Amount")
                .row("Fixed Pay", ReportValue::Amount(salary.fixed_pay()))
                .row("Variable Pay", ReportValue::Amount(salary.variable_pay))
                .row("Deductions", ReportValue::Amount(salary.deductions())),
        );
    }
    if budget.income > 0.0 {
        let ratios = &evaluation.ratios;
        tables.push(
            ReportTable::new(BUDGET_ALLOCATION_TABLE, "Category", "Percentage")
                .row("Needs", ReportValue::Percent(ratios.needs_pct))
                .row("Wants", ReportValue::Percent(ratios.wants_pct))
                .row("Savings", ReportValue::Percent(ratios.savings_rate)),
        );
    }
    tables.push(recommendations_table(evaluation));
    tables.push(reflection_table(&request.reflections));

    Report { tables }
}

fn summary_table(budget: &BudgetInput, evaluation: &Evaluation) -> ReportTable {
    let scores = &evaluation.scores;
    let resilience = &evaluation.resilience;
    ReportTable::new(SUMMARY_TABLE, "Metric", "Value")
        .row("Income", ReportValue::Amount(budget.income))
        .row("Expenses", ReportValue::Amount(budget.total_expenses()))
        .row("Savings", ReportValue::Amount(budget.savings()))
        .row(
            "Savings Rate (%)",
            ReportValue::rounded_percent(evaluation.ratios.savings_rate),
        )
        .row(
            "Expense–Income Ratio (%)",
            ReportValue::rounded_percent(evaluation.ratios.expense_ratio),
        )
        .row("Budget Health Score", ReportValue::Score(scores.budget_score))
        .row(
            "CTC–Budget Alignment Score",
            ReportValue::Score(scores.alignment_score),
        )
        .row(
            "Overall Financial Health Score",
            ReportValue::Score(scores.overall_score),
        )
        .row(
            "Stress-Test Score (Normal)",
            ReportValue::Score(resilience.normal_score),
        )
        .row(
            "Stress-Test Score (Shocked)",
            ReportValue::Score(resilience.shocked_score),
        )
        .row(
            "Resilience Loss (%)",
            ReportValue::rounded_percent(resilience.resilience_loss_pct),
        )
        .row(
            "Resilience Grade",
            ReportValue::Text(resilience.grade.as_str().to_string()),
        )
}

fn expenses_table(budget: &BudgetInput) -> ReportTable {
    budget.expenses.iter().fold(
        ReportTable::new(EXPENSES_TABLE, "Category", "Amount"),
        |table, (category, amount)| table.row(category.label(), ReportValue::Amount(amount)),
    )
}

fn recommendations_table(evaluation: &Evaluation) -> ReportTable {
    let table = evaluation.recommendations.iter().enumerate().fold(
        ReportTable::new(RECOMMENDATIONS_TABLE, "#", "Recommendation"),
        |table, (i, rec)| table.row((i + 1).to_string(), ReportValue::Text(rec.clone())),
    );
    table.row(
        "Fastest Fix",
        ReportValue::Text(evaluation.fastest_fix.to_string()),
    )
}

fn reflection_table(reflections: &[String]) -> ReportTable {
    REFLECTION_QUESTIONS.iter().enumerate().fold(
        ReportTable::new(REFLECTION_TABLE, "Question", "Response"),
        |table, (i, question)| {
            let response = reflections.get(i).cloned().unwrap_or_default();
            table.row(*question, ReportValue::Text(response))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::evaluate;
    use crate::core::types::{
        ExpenseCategory, Expenses, ModelConfig, Period, SalaryStructure, ShockScenario,
    };

    fn sample_request() -> EvaluationRequest {
        EvaluationRequest {
            budget: BudgetInput {
                period: Period::Monthly,
                income: 50_000.0,
                expenses: Expenses::default()
                    .with(ExpenseCategory::Housing, 15_000.0)
                    .with(ExpenseCategory::Food, 8_000.0)
                    .with(ExpenseCategory::Transport, 3_000.0)
                    .with(ExpenseCategory::Utilities, 2_000.0)
                    .with(ExpenseCategory::Lifestyle, 5_000.0)
                    .with(ExpenseCategory::Others, 2_000.0),
            },
            salary: None,
            scenario: ShockScenario::default(),
            reflections: vec!["Food costs.".to_string()],
        }
    }

    fn report_for(request: &EvaluationRequest) -> Report {
        let evaluation = evaluate(request, &ModelConfig::default());
        assemble_report(request, &evaluation)
    }

    #[test]
    fn tables_appear_in_export_order() {
        let mut request = sample_request();
        request.salary = Some(SalaryStructure::zero(Period::Monthly));
        let names: Vec<_> = report_for(&request).tables.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                SUMMARY_TABLE,
                EXPENSES_TABLE,
                CTC_STRUCTURE_TABLE,
                BUDGET_ALLOCATION_TABLE,
                RECOMMENDATIONS_TABLE,
                REFLECTION_TABLE
            ]
        );
    }

    #[test]
    fn ctc_structure_is_reported_in_budget_period() {
        let mut request = sample_request();
        let mut salary = SalaryStructure::zero(Period::Annual);
        salary.basic = 480_000.0;
        salary.variable_pay = 120_000.0;
        salary.income_tax = 60_000.0;
        request.salary = Some(salary);
        let report = report_for(&request);
        let ctc = report.table(CTC_STRUCTURE_TABLE).expect("ctc table");
        assert_eq!(ctc.value("Fixed Pay"), Some(&ReportValue::Amount(40_000.0)));
        assert_eq!(ctc.value("Variable Pay"), Some(&ReportValue::Amount(10_000.0)));
        assert_eq!(ctc.value("Deductions"), Some(&ReportValue::Amount(5_000.0)));
    }

    #[test]
    fn optional_tables_are_omitted_without_salary_or_income() {
        let mut request = sample_request();
        request.budget.income = 0.0;
        let report = report_for(&request);
        assert!(report.table(CTC_STRUCTURE_TABLE).is_none());
        assert!(report.table(BUDGET_ALLOCATION_TABLE).is_none());
    }

    #[test]
    fn summary_carries_worked_figures() {
        let report = report_for(&sample_request());
        let summary = report.table(SUMMARY_TABLE).expect("summary table");
        assert_eq!(
            summary.value("Expenses"),
            Some(&ReportValue::Amount(35_000.0))
        );
        assert_eq!(summary.value("Savings"), Some(&ReportValue::Amount(15_000.0)));
        assert_eq!(
            summary.value("Savings Rate (%)"),
            Some(&ReportValue::Percent(30.0))
        );
        assert_eq!(
            summary.value("Budget Health Score"),
            Some(&ReportValue::Score(90))
        );
    }

    #[test]
    fn allocation_keeps_exact_percentages_while_summary_rounds() {
        let mut request = sample_request();
        request.budget.income = 30_000.0;
        let evaluation = evaluate(&request, &ModelConfig::default());
        let report = assemble_report(&request, &evaluation);

        let allocation = report
            .table(BUDGET_ALLOCATION_TABLE)
            .expect("allocation table");
        assert_eq!(
            allocation.value("Needs"),
            Some(&ReportValue::Percent(evaluation.ratios.needs_pct))
        );
        assert_eq!(
            allocation.value("Savings"),
            Some(&ReportValue::Percent(evaluation.ratios.savings_rate))
        );

        let summary = report.table(SUMMARY_TABLE).expect("summary table");
        // -5_000 / 30_000 = -16.666...%
        assert_eq!(
            summary.value("Savings Rate (%)"),
            Some(&ReportValue::Percent(-16.67))
        );
        assert_eq!(summary.value("Income"), Some(&ReportValue::Amount(30_000.0)));
    }

    #[test]
    fn expenses_follow_fixed_category_order() {
        let report = report_for(&sample_request());
        let keys: Vec<_> = report
            .table(EXPENSES_TABLE)
            .expect("expenses table")
            .rows
            .iter()
            .map(|r| r.key.as_str())
            .collect();
        let labels: Vec<_> = ExpenseCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(keys, labels);
    }

    #[test]
    fn reflections_pad_missing_responses() {
        let report = report_for(&sample_request());
        let reflection = report.table(REFLECTION_TABLE).expect("reflection table");
        assert_eq!(reflection.rows.len(), REFLECTION_QUESTIONS.len());
        assert_eq!(
            reflection.rows[0].value,
            ReportValue::Text("Food costs.".to_string())
        );
        assert_eq!(reflection.rows[4].value, ReportValue::Text(String::new()));
    }

    #[test]
    fn recommendations_end_with_fastest_fix() {
        let request = sample_request();
        let evaluation = evaluate(&request, &ModelConfig::default());
        let report = report_for(&request);
        let table = report.table(RECOMMENDATIONS_TABLE).expect("recommendations");
        assert_eq!(table.rows.len(), evaluation.recommendations.len() + 1);
        assert_eq!(table.rows[0].key, "1");
        assert_eq!(
            table.value("Fastest Fix"),
            Some(&ReportValue::Text(evaluation.fastest_fix.to_string()))
        );
    }

    #[test]
    fn report_serializes_as_named_table_list() {
        let json = serde_json::to_string(&report_for(&sample_request())).expect("serialize");
        assert!(json.starts_with('['));
        assert!(json.contains("\"name\":\"Summary\""));
        assert!(json.contains("\"keyHeader\":\"Metric\""));
        assert!(json.contains("\"value\":\"D\""));
    }
}
