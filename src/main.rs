use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use speech_eval::config::{AppConfig, EngineResources};
use speech_eval::engine::analyzers::Analyzers;
use speech_eval::error::AppError;
use speech_eval::rubric::{self, RubricConfig};
use speech_eval::telemetry;
use speech_eval::{EvaluationEngine, EvaluationReport, EvaluationRequest};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    engine: Arc<EvaluationEngine>,
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Speech Evaluation Service",
    about = "Score self-introduction speech transcripts from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a transcript file and print the report
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Path to a plain-text transcript file
    transcript: PathBuf,
    /// Spoken duration in minutes; omitted duration zeroes the pace criterion
    #[arg(long)]
    duration_minutes: Option<f64>,
    /// Rubric CSV overriding the built-in defaults
    #[arg(long)]
    rubric: Option<PathBuf>,
    /// Grammar rule file enabling the precise grammar engine
    #[arg(long)]
    grammar_rules: Option<PathBuf>,
    /// Polarity lexicon enabling the precise sentiment engine
    #[arg(long)]
    sentiment_lexicon: Option<PathBuf>,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Evaluate(args) => run_evaluate(args),
    }
}

fn load_rubric(path: Option<&Path>) -> Result<RubricConfig, AppError> {
    match path {
        Some(path) => {
            let config = rubric::loader::from_path(path)?;
            info!(path = %path.display(), "rubric loaded");
            Ok(config)
        }
        None => Ok(RubricConfig::default()),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let rubric = load_rubric(config.rubric_path.as_deref())?;
    let analyzers = Analyzers::probe(&config.engines);
    let engine = Arc::new(EvaluationEngine::new(rubric, analyzers)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        engine,
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/evaluate", post(evaluate_endpoint))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "speech evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        transcript,
        duration_minutes,
        rubric,
        grammar_rules,
        sentiment_lexicon,
        json,
    } = args;

    let text = fs::read_to_string(&transcript)?;
    let rubric = load_rubric(rubric.as_deref())?;
    let analyzers = Analyzers::probe(&EngineResources {
        grammar_rules,
        sentiment_lexicon,
    });
    let engine = EvaluationEngine::new(rubric, analyzers)?;
    let report = engine.evaluate(&text, duration_minutes)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        render_report(&transcript, &report);
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn evaluate_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<EvaluationRequest>,
) -> Result<Json<EvaluationReport>, AppError> {
    let report = state
        .engine
        .evaluate(&payload.transcript, payload.duration_minutes)?;
    Ok(Json(report))
}

fn render_report(source: &Path, report: &EvaluationReport) {
    println!("Speech evaluation report");
    println!(
        "Source: {} (evaluated {})",
        source.display(),
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!(
        "Transcript: {} words, {} sentences",
        report.word_count, report.sentence_count
    );

    println!("\nCriteria");
    for result in &report.criteria {
        println!("- {}: {:.1}/{}", result.label, result.score, result.weight);
    }

    if !report.warnings.is_empty() {
        println!("\nWarnings");
        for warning in &report.warnings {
            println!("- {warning}");
        }
    }

    println!("\nOverall score: {:.1}/100", report.overall_score);
}
