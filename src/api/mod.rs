use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    BudgetInput, EvaluationRequest, ExpenseCategory, Expenses, ModelConfig, Period, RatioSet,
    Report, ResilienceOutcome, SalaryStructure, ScoreSet, ShockModel, ShockOutcome,
    ShockScenario, assemble_report, evaluate,
};
use crate::error::InputError;

const MAX_REFLECTIONS: usize = 5;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPeriod {
    Monthly,
    Annual,
}

impl From<CliPeriod> for Period {
    fn from(value: CliPeriod) -> Self {
        match value {
            CliPeriod::Monthly => Period::Monthly,
            CliPeriod::Annual => Period::Annual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliShockModel {
    Detailed,
    Approximate,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiPeriod {
    #[serde(alias = "Monthly", alias = "month")]
    Monthly,
    #[serde(alias = "Annual", alias = "yearly", alias = "Yearly", alias = "year")]
    Annual,
}

impl From<ApiPeriod> for CliPeriod {
    fn from(value: ApiPeriod) -> Self {
        match value {
            ApiPeriod::Monthly => CliPeriod::Monthly,
            ApiPeriod::Annual => CliPeriod::Annual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiShockModel {
    #[serde(alias = "payroll")]
    Detailed,
    #[serde(alias = "flat")]
    Approximate,
}

impl From<ApiShockModel> for CliShockModel {
    fn from(value: ApiShockModel) -> Self {
        match value {
            ApiShockModel::Detailed => CliShockModel::Detailed,
            ApiShockModel::Approximate => CliShockModel::Approximate,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EvaluatePayload {
    period: Option<ApiPeriod>,
    income: Option<f64>,

    housing: Option<f64>,
    food: Option<f64>,
    transport: Option<f64>,
    utilities: Option<f64>,
    lifestyle: Option<f64>,
    others: Option<f64>,

    salary_period: Option<ApiPeriod>,
    basic: Option<f64>,
    hra: Option<f64>,
    allowance: Option<f64>,
    variable_pay: Option<f64>,
    employee_pf: Option<f64>,
    income_tax: Option<f64>,
    professional_tax: Option<f64>,

    bonus_not_paid: Option<bool>,
    tax_increased: Option<bool>,
    shock_model: Option<ApiShockModel>,
    tax_shock_multiplier: Option<f64>,
    bonus_share: Option<f64>,
    tax_share: Option<f64>,

    reflections: Option<Reflections>,
    reflection1: Option<String>,
    reflection2: Option<String>,
    reflection3: Option<String>,
    reflection4: Option<String>,
    reflection5: Option<String>,
}

/// A JSON array of responses, or a single response from a query string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reflections {
    Many(Vec<String>),
    One(String),
}

/// Merges the list form with the indexed `reflectionN` keys. Indexed keys
/// win for their position and gaps are left empty.
fn reflection_responses(
    reflections: Option<Reflections>,
    indexed: [Option<String>; MAX_REFLECTIONS],
) -> Vec<String> {
    let mut responses = match reflections {
        Some(Reflections::Many(list)) => list,
        Some(Reflections::One(text)) => vec![text],
        None => Vec::new(),
    };
    for (i, slot) in indexed.into_iter().enumerate() {
        if let Some(text) = slot {
            if responses.len() <= i {
                responses.resize(i + 1, String::new());
            }
            responses[i] = text;
        }
    }
    responses
}

/// Inputs for one evaluation. Shares are entered in percent.
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(long, value_enum, default_value_t = CliPeriod::Monthly, help = "Budget period")]
    period: CliPeriod,
    #[arg(long, help = "Income for the budget period")]
    income: f64,
    #[arg(long, default_value_t = 0.0, help = "Housing (rent / EMI)")]
    housing: f64,
    #[arg(long, default_value_t = 0.0)]
    food: f64,
    #[arg(long, default_value_t = 0.0)]
    transport: f64,
    #[arg(long, default_value_t = 0.0)]
    utilities: f64,
    #[arg(long, default_value_t = 0.0, help = "Lifestyle and entertainment")]
    lifestyle: f64,
    #[arg(long, default_value_t = 0.0)]
    others: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliPeriod::Annual,
        help = "Period the salary figures are expressed in"
    )]
    salary_period: CliPeriod,
    #[arg(long)]
    basic: Option<f64>,
    #[arg(long, help = "House rent allowance")]
    hra: Option<f64>,
    #[arg(long, help = "Special allowance")]
    allowance: Option<f64>,
    #[arg(long, help = "Bonus / variable pay")]
    variable_pay: Option<f64>,
    #[arg(long, help = "Employee provident fund contribution")]
    employee_pf: Option<f64>,
    #[arg(long)]
    income_tax: Option<f64>,
    #[arg(long)]
    professional_tax: Option<f64>,
    #[arg(long, help = "Shock: bonus / variable pay is not paid")]
    bonus_not_paid: bool,
    #[arg(long, help = "Shock: income tax increases")]
    tax_increased: bool,
    #[arg(
        long,
        value_enum,
        default_value_t = CliShockModel::Detailed,
        help = "Shock model: payroll-based or flat share of income"
    )]
    shock_model: CliShockModel,
    #[arg(
        long,
        default_value_t = ShockModel::DEFAULT_TAX_MULTIPLIER,
        help = "Detailed model: income tax multiplier under the tax shock"
    )]
    tax_shock_multiplier: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Approximate model: percent of income lost under the bonus shock"
    )]
    bonus_share: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Approximate model: percent of income lost under the tax shock"
    )]
    tax_share: f64,
    #[arg(long = "reflection", help = "Reflection response, repeat in question order")]
    reflections: Vec<String>,
}

#[derive(Debug)]
struct ApiRequest {
    request: EvaluationRequest,
    config: ModelConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    period: Period,
    ratios: RatioSet,
    scores: ScoreSet,
    shock: ShockOutcome,
    resilience: ResilienceOutcome,
    recommendations: Vec<String>,
    fastest_fix: &'static str,
    tables: Report,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn amount(flag: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InputError::NegativeAmount { flag })
    }
}

fn share(flag: &'static str, percent: f64) -> Result<f64, InputError> {
    if (0.0..=100.0).contains(&percent) {
        Ok(percent / 100.0)
    } else {
        Err(InputError::ShareOutOfRange { flag })
    }
}

fn build_request(args: EvaluateArgs) -> Result<ApiRequest, InputError> {
    let period: Period = args.period.into();
    let income = amount("income", args.income)?;
    let expenses = Expenses::default()
        .with(ExpenseCategory::Housing, amount("housing", args.housing)?)
        .with(ExpenseCategory::Food, amount("food", args.food)?)
        .with(ExpenseCategory::Transport, amount("transport", args.transport)?)
        .with(ExpenseCategory::Utilities, amount("utilities", args.utilities)?)
        .with(ExpenseCategory::Lifestyle, amount("lifestyle", args.lifestyle)?)
        .with(ExpenseCategory::Others, amount("others", args.others)?);

    let salary_fields = [
        args.basic,
        args.hra,
        args.allowance,
        args.variable_pay,
        args.employee_pf,
        args.income_tax,
        args.professional_tax,
    ];
    let salary = if salary_fields.iter().any(Option::is_some) {
        let field = |flag, value: Option<f64>| amount(flag, value.unwrap_or(0.0));
        Some(SalaryStructure {
            period: args.salary_period.into(),
            basic: field("basic", args.basic)?,
            hra: field("hra", args.hra)?,
            allowance: field("allowance", args.allowance)?,
            variable_pay: field("variable-pay", args.variable_pay)?,
            employee_pf: field("employee-pf", args.employee_pf)?,
            income_tax: field("income-tax", args.income_tax)?,
            professional_tax: field("professional-tax", args.professional_tax)?,
        })
    } else {
        None
    };

    let shock_model = match args.shock_model {
        CliShockModel::Detailed => {
            if !args.tax_shock_multiplier.is_finite() || args.tax_shock_multiplier < 1.0 {
                return Err(InputError::TaxMultiplier);
            }
            ShockModel::Detailed {
                tax_multiplier: args.tax_shock_multiplier,
            }
        }
        CliShockModel::Approximate => ShockModel::Approximate {
            bonus_share: share("bonus-share", args.bonus_share)?,
            tax_share: share("tax-share", args.tax_share)?,
        },
    };

    if args.reflections.len() > MAX_REFLECTIONS {
        return Err(InputError::TooManyReflections {
            max: MAX_REFLECTIONS,
            got: args.reflections.len(),
        });
    }

    Ok(ApiRequest {
        request: EvaluationRequest {
            budget: BudgetInput {
                period,
                income,
                expenses,
            },
            salary,
            scenario: ShockScenario {
                bonus_not_paid: args.bonus_not_paid,
                tax_increased: args.tax_increased,
            },
            reflections: args.reflections,
        },
        config: ModelConfig {
            shock_model,
            ..ModelConfig::default()
        },
    })
}

/// Validates `args`, evaluates them and assembles the export tables.
pub fn evaluate_args(args: EvaluateArgs) -> Result<EvaluateResponse, InputError> {
    let api_request = build_request(args)?;
    Ok(build_evaluate_response(&api_request))
}

fn build_evaluate_response(api_request: &ApiRequest) -> EvaluateResponse {
    let request = &api_request.request;
    let evaluation = evaluate(request, &api_request.config);
    let tables = assemble_report(request, &evaluation);
    EvaluateResponse {
        period: evaluation.period,
        ratios: evaluation.ratios,
        scores: evaluation.scores,
        shock: evaluation.shock,
        resilience: evaluation.resilience,
        recommendations: evaluation.recommendations,
        fastest_fix: evaluation.fastest_fix,
        tables,
    }
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/evaluate",
            get(evaluate_get_handler).post(evaluate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "budget resilience API listening");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn evaluate_get_handler(
    query: Result<Query<EvaluatePayload>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(payload)) => evaluate_handler_impl(payload).await,
        Err(rejection) => malformed_payload(&rejection.body_text()),
    }
}

async fn evaluate_post_handler(
    body: Result<Json<EvaluatePayload>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(payload)) => evaluate_handler_impl(payload).await,
        Err(rejection) => malformed_payload(&rejection.body_text()),
    }
}

fn malformed_payload(detail: &str) -> Response {
    warn!(error = %detail, "malformed evaluation payload");
    error_response(StatusCode::BAD_REQUEST, detail)
}

async fn evaluate_handler_impl(payload: EvaluatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejected evaluation request");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    json_response(StatusCode::OK, build_evaluate_response(&request))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<EvaluatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: EvaluatePayload) -> Result<ApiRequest, InputError> {
    let mut args = default_args_for_api();

    if let Some(v) = payload.period {
        args.period = v.into();
    }
    if let Some(v) = payload.income {
        args.income = v;
    }

    if let Some(v) = payload.housing {
        args.housing = v;
    }
    if let Some(v) = payload.food {
        args.food = v;
    }
    if let Some(v) = payload.transport {
        args.transport = v;
    }
    if let Some(v) = payload.utilities {
        args.utilities = v;
    }
    if let Some(v) = payload.lifestyle {
        args.lifestyle = v;
    }
    if let Some(v) = payload.others {
        args.others = v;
    }

    if let Some(v) = payload.salary_period {
        args.salary_period = v.into();
    }
    args.basic = payload.basic;
    args.hra = payload.hra;
    args.allowance = payload.allowance;
    args.variable_pay = payload.variable_pay;
    args.employee_pf = payload.employee_pf;
    args.income_tax = payload.income_tax;
    args.professional_tax = payload.professional_tax;

    if let Some(v) = payload.bonus_not_paid {
        args.bonus_not_paid = v;
    }
    if let Some(v) = payload.tax_increased {
        args.tax_increased = v;
    }
    if let Some(v) = payload.shock_model {
        args.shock_model = v.into();
    }
    if let Some(v) = payload.tax_shock_multiplier {
        args.tax_shock_multiplier = v;
    }
    if let Some(v) = payload.bonus_share {
        args.bonus_share = v;
    }
    if let Some(v) = payload.tax_share {
        args.tax_share = v;
    }

    args.reflections = reflection_responses(
        payload.reflections,
        [
            payload.reflection1,
            payload.reflection2,
            payload.reflection3,
            payload.reflection4,
            payload.reflection5,
        ],
    );

    build_request(args)
}

fn default_args_for_api() -> EvaluateArgs {
    EvaluateArgs {
        period: CliPeriod::Monthly,
        income: 0.0,
        housing: 0.0,
        food: 0.0,
        transport: 0.0,
        utilities: 0.0,
        lifestyle: 0.0,
        others: 0.0,
        salary_period: CliPeriod::Annual,
        basic: None,
        hra: None,
        allowance: None,
        variable_pay: None,
        employee_pf: None,
        income_tax: None,
        professional_tax: None,
        bonus_not_paid: false,
        tax_increased: false,
        shock_model: CliShockModel::Detailed,
        tax_shock_multiplier: ShockModel::DEFAULT_TAX_MULTIPLIER,
        bonus_share: 10.0,
        tax_share: 5.0,
        reflections: Vec::new(),
    }
}
