use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use verdant_core::app::{App, AppBuilder, ErrorResponse, MoistureScale};
use verdant_core::domain::LocationId;

/// Decision service for the irrigation / climate controller.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pump classifier artifact (JSON). Rules-only when absent or unreadable.
    #[arg(long, env = "VERDANT_MODEL_PATH", global = true)]
    model: Option<PathBuf>,

    /// Refuse to start without a loaded classifier
    #[arg(long, global = true)]
    require_model: bool,

    /// Divide soil moisture by this before the rule-tier threshold check
    #[arg(long, env = "VERDANT_MOISTURE_DIVISOR", global = true)]
    rule_moisture_divisor: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer newline-delimited JSON decision requests (default)
    Serve {
        /// Read requests from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print readiness as JSON
    Health,
}

/// In-flight requests buffered between the reader and the writer.
const PIPELINE_DEPTH: usize = 64;

fn build_app(cli: &Cli) -> Result<App> {
    let scale = match cli.rule_moisture_divisor {
        None => MoistureScale::Raw,
        Some(divisor) => match MoistureScale::divided_by(divisor) {
            Some(scale) => scale,
            None => bail!("--rule-moisture-divisor must be a positive number, got {divisor}"),
        },
    };

    let mut builder = AppBuilder::new().moisture_scale(scale);
    if let Some(path) = &cli.model {
        builder = builder.model_path(path);
    }
    if cli.require_model {
        builder = builder.require_classifier();
    }
    Ok(builder.build()?)
}

/// Encode one response line. Errors become an `ErrorResponse` body, never a
/// dropped line.
fn respond(app: &App, line: &[u8]) -> Result<String> {
    let body = match app.service().decide_json(line) {
        Ok(decision) => serde_json::to_string(&decision)?,
        Err(e) => serde_json::to_string(&ErrorResponse::from(&e))?,
    };
    Ok(body)
}

/// 500 body for a request whose decision task failed outside the service.
fn internal_error(detail: String) -> Result<String> {
    let body = ErrorResponse {
        status: 500,
        location_id: LocationId::unknown().to_string(),
        detail,
    };
    Ok(serde_json::to_string(&body)?)
}

async fn open_input(input: Option<PathBuf>) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match input {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("cannot open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

fn trim_line(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

/// reader → (spawn_blocking で判定) → writer
///
/// 判定は並列に走るが、出力は入力順を保つ。1 行の失敗はその行のエラー応答になり、
/// ストリーム全体は止めない。読み込みエラーでも、それまでの応答は書き切ってから返す。
async fn serve<R, W>(app: App, mut reader: R, output: W) -> Result<(W, usize)>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<JoinHandle<Result<String>>>(PIPELINE_DEPTH);

    let writer = tokio::spawn(async move {
        let mut output = output;
        let mut answered = 0usize;
        while let Some(handle) = rx.recv().await {
            let line = match handle.await {
                Ok(Ok(line)) => line,
                Ok(Err(e)) => {
                    warn!("cannot encode response: {e}");
                    internal_error(e.to_string())?
                }
                Err(e) => {
                    warn!("decision task failed: {e}");
                    internal_error(format!("decision task failed: {e}"))?
                }
            };
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
            answered += 1;
        }
        Ok::<(W, usize), anyhow::Error>((output, answered))
    });

    let mut read_error = None;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                read_error = Some(e);
                break;
            }
        }
        let line = trim_line(&buf);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let line = line.to_vec();
        let app = app.clone();
        let handle = tokio::task::spawn_blocking(move || respond(&app, &line));
        if tx.send(handle).await.is_err() {
            warn!("response writer stopped; no longer reading requests");
            break;
        }
    }
    drop(tx);

    let (output, answered) = writer.await.context("response writer panicked")??;
    if let Some(e) = read_error {
        return Err(anyhow::Error::new(e).context(format!("input failed after {answered} decisions")));
    }
    info!("input closed after {answered} decisions");
    Ok((output, answered))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let app = build_app(&cli)?;

    match cli.command {
        Some(Commands::Health) => {
            println!("{}", serde_json::to_string(&app.health())?);
            Ok(())
        }
        Some(Commands::Serve { input }) => {
            serve(app, open_input(input).await?, tokio::io::stdout()).await?;
            Ok(())
        }
        None => {
            serve(app, open_input(None).await?, tokio::io::stdout()).await?;
            Ok(())
        }
    }
}
