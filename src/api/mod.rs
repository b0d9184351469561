use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    DEFAULT_MONTHLY_LIVING_COST, HouseholdProfile, Projection, StrategyLevers, StrategyMode,
    YearBreakdown, compare_modes, project, run_yearly_cashflow_trace,
};
use crate::report::{action_plan_steps, render_report};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

pub const DEFAULT_PORT: u16 = 8080;

const DEFAULT_CURRENT_AGE: u32 = 30;
const DEFAULT_MONTHLY_SALARY: f64 = 55_000.0;
const DEFAULT_CURRENT_SAVINGS: f64 = 100_000.0;
const DEFAULT_YEARS: u32 = 15;
const DEFAULT_MARKET_RENT: f64 = 15_000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliStrategyMode {
    #[value(alias = "a")]
    Comfort,
    #[value(alias = "b")]
    ShadowLandlord,
    #[value(alias = "c")]
    SkillBuilder,
    #[value(alias = "d")]
    Balanced,
}

impl From<CliStrategyMode> for StrategyMode {
    fn from(value: CliStrategyMode) -> Self {
        match value {
            CliStrategyMode::Comfort => StrategyMode::Comfort,
            CliStrategyMode::ShadowLandlord => StrategyMode::ShadowLandlord,
            CliStrategyMode::SkillBuilder => StrategyMode::SkillBuilder,
            CliStrategyMode::Balanced => StrategyMode::Balanced,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiStrategyMode {
    #[serde(alias = "a", alias = "A")]
    Comfort,
    #[serde(
        alias = "b",
        alias = "B",
        alias = "shadowLandlord",
        alias = "shadow_landlord"
    )]
    ShadowLandlord,
    #[serde(
        alias = "c",
        alias = "C",
        alias = "skillBuilder",
        alias = "skill_builder"
    )]
    SkillBuilder,
    #[serde(alias = "d", alias = "D")]
    Balanced,
}

impl From<ApiStrategyMode> for CliStrategyMode {
    fn from(value: ApiStrategyMode) -> Self {
        match value {
            ApiStrategyMode::Comfort => CliStrategyMode::Comfort,
            ApiStrategyMode::ShadowLandlord => CliStrategyMode::ShadowLandlord,
            ApiStrategyMode::SkillBuilder => CliStrategyMode::SkillBuilder,
            ApiStrategyMode::Balanced => CliStrategyMode::Balanced,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    current_age: Option<u32>,
    monthly_salary: Option<f64>,
    current_savings: Option<f64>,
    years: Option<u32>,
    market_rent: Option<f64>,
    living_cost: Option<f64>,
    mode: Option<ApiStrategyMode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ModesQuery {
    market_rent: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "lifeplan",
    about = "Compare long-run wealth under four lifestyle strategies (run `lifeplan serve [port]` for the web UI)"
)]
pub struct Cli {
    #[arg(long, default_value_t = DEFAULT_CURRENT_AGE, help = "Current age, 20-50")]
    current_age: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_MONTHLY_SALARY,
        help = "Monthly salary, 20000-150000"
    )]
    monthly_salary: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_CURRENT_SAVINGS,
        help = "Savings held today; added to every projected balance"
    )]
    current_savings: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS, help = "Years to project, 5-30")]
    years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_MARKET_RENT,
        help = "Market rent for comparable housing, used as shadow rent (5000-30000)"
    )]
    market_rent: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_MONTHLY_LIVING_COST,
        help = "Monthly living cost shared by every mode"
    )]
    living_cost: f64,
    #[arg(long, value_enum, default_value_t = CliStrategyMode::Balanced)]
    mode: CliStrategyMode,
    #[arg(long, help = "Print the JSON response body instead of the text report")]
    json: bool,
}

#[derive(Debug)]
struct ApiRequest {
    profile: HouseholdProfile,
    mode: StrategyMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonSeries {
    mode: StrategyMode,
    label: &'static str,
    total_wealth_path: Vec<f64>,
    final_total_wealth: f64,
    final_monthly_passive_income: f64,
    final_monthly_salary: f64,
}

impl From<&Projection> for ComparisonSeries {
    fn from(projection: &Projection) -> Self {
        Self {
            mode: projection.mode,
            label: projection.mode.label(),
            total_wealth_path: projection.total_wealth_path.clone(),
            final_total_wealth: projection.final_total_wealth,
            final_monthly_passive_income: projection.final_monthly_passive_income,
            final_monthly_salary: projection.final_monthly_salary,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionPlan {
    monthly_transfer: f64,
    steps: [String; 3],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    mode: StrategyMode,
    label: &'static str,
    description: &'static str,
    profile: HouseholdProfile,
    selected: Projection,
    cashflow_years: Vec<YearBreakdown>,
    comparison: Vec<ComparisonSeries>,
    action_plan: ActionPlan,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModeInfo {
    mode: StrategyMode,
    letter: char,
    label: &'static str,
    description: &'static str,
    levers: StrategyLevers,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_profile(cli: &Cli) -> Result<HouseholdProfile, String> {
    if !(20..=50).contains(&cli.current_age) {
        return Err("--current-age must be between 20 and 50".to_string());
    }

    if !(20_000.0..=150_000.0).contains(&cli.monthly_salary) {
        return Err("--monthly-salary must be between 20000 and 150000".to_string());
    }

    if !(0.0..=5_000_000.0).contains(&cli.current_savings) {
        return Err("--current-savings must be between 0 and 5000000".to_string());
    }

    if !(5..=30).contains(&cli.years) {
        return Err("--years must be between 5 and 30".to_string());
    }

    if !(5_000.0..=30_000.0).contains(&cli.market_rent) {
        return Err("--market-rent must be between 5000 and 30000".to_string());
    }

    if !cli.living_cost.is_finite() || cli.living_cost < 0.0 {
        return Err("--living-cost must be >= 0".to_string());
    }

    Ok(HouseholdProfile {
        current_age: cli.current_age,
        monthly_salary: cli.monthly_salary,
        current_savings: cli.current_savings,
        horizon_years: cli.years,
        market_rent: cli.market_rent,
        monthly_living_cost: cli.living_cost,
    })
}

fn build_simulate_response(
    profile: &HouseholdProfile,
    mode: StrategyMode,
) -> Result<SimulateResponse, String> {
    let selected = project(profile, mode).map_err(|e| e.to_string())?;
    let cashflow_years = run_yearly_cashflow_trace(&selected.parameters);
    let comparison = compare_modes(profile).map_err(|e| e.to_string())?;

    Ok(SimulateResponse {
        mode,
        label: mode.label(),
        description: mode.description(),
        profile: *profile,
        selected,
        cashflow_years,
        comparison: comparison.iter().map(ComparisonSeries::from).collect(),
        action_plan: ActionPlan {
            monthly_transfer: profile.market_rent,
            steps: action_plan_steps(profile.market_rent),
        },
    })
}

fn mode_table_for_query(query: &ModesQuery) -> Result<Vec<ModeInfo>, String> {
    let market_rent = query.market_rent.unwrap_or(DEFAULT_MARKET_RENT);
    if !(5_000.0..=30_000.0).contains(&market_rent) {
        return Err("marketRent must be between 5000 and 30000".to_string());
    }
    Ok(mode_table(market_rent))
}

fn mode_table(market_rent: f64) -> Vec<ModeInfo> {
    StrategyMode::ALL
        .iter()
        .map(|mode| ModeInfo {
            mode: *mode,
            letter: mode.letter(),
            label: mode.label(),
            description: mode.description(),
            levers: mode.levers(market_rent),
        })
        .collect()
}

/// Runs the command-line report and returns the text to print.
pub fn run_cli(cli: Cli) -> Result<String, String> {
    let profile = build_profile(&cli)?;
    let mode = StrategyMode::from(cli.mode);
    debug!(
        mode = mode.key(),
        years = profile.horizon_years,
        "projecting from cli"
    );

    if cli.json {
        let response = build_simulate_response(&profile, mode)?;
        return serde_json::to_string_pretty(&response)
            .map_err(|e| format!("Failed to serialize response: {e}"));
    }

    let selected = project(&profile, mode).map_err(|e| e.to_string())?;
    let trace = run_yearly_cashflow_trace(&selected.parameters);
    let comparison = compare_modes(&profile).map_err(|e| e.to_string())?;
    Ok(render_report(&profile, &selected, &trace, &comparison))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/modes", get(modes_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("lifeplan HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn modes_handler(Query(query): Query<ModesQuery>) -> Response {
    match mode_table_for_query(&query) {
        Ok(table) => json_response(StatusCode::OK, table),
        Err(msg) => {
            warn!(error = %msg, "rejected modes request");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            warn!(error = %msg, "rejected simulate request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    debug!(
        mode = request.mode.key(),
        years = request.profile.horizon_years,
        "projecting from api"
    );
    match build_simulate_response(&request.profile, request.mode) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
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
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.monthly_salary {
        cli.monthly_salary = v;
    }
    if let Some(v) = payload.current_savings {
        cli.current_savings = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.market_rent {
        cli.market_rent = v;
    }
    if let Some(v) = payload.living_cost {
        cli.living_cost = v;
    }
    if let Some(v) = payload.mode {
        cli.mode = v.into();
    }

    let profile = build_profile(&cli)?;
    Ok(ApiRequest {
        profile,
        mode: cli.mode.into(),
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        current_age: DEFAULT_CURRENT_AGE,
        monthly_salary: DEFAULT_MONTHLY_SALARY,
        current_savings: DEFAULT_CURRENT_SAVINGS,
        years: DEFAULT_YEARS,
        market_rent: DEFAULT_MARKET_RENT,
        living_cost: DEFAULT_MONTHLY_LIVING_COST,
        mode: CliStrategyMode::Balanced,
        json: false,
    }
}
