use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use criba::cli::{Cli, OutputFormat};
use criba::csv_output::{CsvOutput, CsvStatsOutput};
use criba::json_output::JsonOutput;
use criba::pages::Page;
use criba::policy::{BindingSpec, TriggerPolicy, DEFAULT_DEBOUNCE_MS};
use criba::script::Script;
use criba::session::{self, SessionReport, Submission};
use criba::live;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print the built-in page bindings (--list-pages)
fn print_page_bindings() {
    for page in Page::all() {
        let spec = page.binding_spec(DEFAULT_DEBOUNCE_MS);
        println!("{} (GET {}):", page, page.action());
        for rule in &spec.rules {
            match rule.policy {
                TriggerPolicy::DebouncedInput { delay_ms } => {
                    println!("  {:<8} debounce {}ms", rule.field, delay_ms);
                }
                TriggerPolicy::Change => println!("  {:<8} change", rule.field),
                TriggerPolicy::EnterKey => println!("  {:<8} enter", rule.field),
            }
        }
        println!();
    }
}

/// Load the trace from a file path or stdin
fn load_script(trace: Option<&str>) -> Result<Script> {
    match trace {
        Some("-") => Script::from_stdin(),
        Some(path) => Script::from_file(std::path::Path::new(path)),
        None => anyhow::bail!(
            "No trace given. Usage: criba TRACE [OPTIONS] or criba - < trace.json"
        ),
    }
}

/// One text line per submission, in firing order
fn print_submission(submission: &Submission) {
    let trigger = format!("{}({})", submission.cause.label(), submission.cause.field());
    match submission.latency_ms {
        Some(latency) => println!(
            "{:>6}ms  {:<16} GET {} <+{}ms>",
            submission.at_ms,
            trigger,
            submission.url(),
            latency
        ),
        None => println!(
            "{:>6}ms  {:<16} GET {}",
            submission.at_ms,
            trigger,
            submission.url()
        ),
    }
}

/// Render the finished report in the requested format
fn render_report(report: &SessionReport, args: &Cli, already_streamed: bool) -> Result<()> {
    match args.format {
        OutputFormat::Text => {
            if args.statistics {
                report.stats.print_summary();
            } else if !already_streamed {
                for submission in &report.submissions {
                    print_submission(submission);
                }
            }
        }
        OutputFormat::Json => {
            let output = JsonOutput::from_report(report, args.statistics);
            println!("{}", output.to_json()?);
        }
        OutputFormat::Csv => {
            if args.statistics {
                print!("{}", CsvStatsOutput::from_tracker(&report.stats).to_csv());
            } else {
                let mut output = CsvOutput::new(args.timing);
                for submission in &report.submissions {
                    output.add_submission(submission);
                }
                print!("{}", output.to_csv());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    if args.list_pages {
        print_page_bindings();
        return Ok(());
    }

    let script = load_script(args.trace.as_deref())?;

    // Flag beats the trace's own override; both beat the built-in default
    let default_delay = args
        .delay_ms
        .or(script.delay_ms)
        .unwrap_or(DEFAULT_DEBOUNCE_MS);

    let spec = if let Some(expr) = &args.expr {
        BindingSpec::from_expr(expr, default_delay)?
    } else if let Some(page) = args.page.or(script.page) {
        page.binding_spec(default_delay)
    } else {
        anyhow::bail!(
            "Trace names no page; specify --page PAGE or a binding expression with -e bind=..."
        );
    };

    let form = script.form_candidate(args.page);

    // In live text mode, submissions print as they fire
    let streaming = args.live && matches!(args.format, OutputFormat::Text) && !args.statistics;

    let report = if args.live {
        let runtime =
            tokio::runtime::Runtime::new().context("Failed to start the live replay runtime")?;
        runtime.block_on(live::replay_live(
            script,
            form,
            &spec,
            args.timing,
            |submission| {
                if streaming {
                    print_submission(submission);
                }
            },
        ))
    } else {
        session::replay(&script, form, &spec, args.timing)
    };

    render_report(&report, &args, streaming)
}
