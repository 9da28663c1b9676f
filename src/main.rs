use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use riona::config::{AlgorithmKind, ExperimentConfig};
use riona::evaluation::Snapshot;
use riona::tasks::{Experiment, ExperimentReport, RunReport};
use riona::ui::cli::args::{Cli, Command};
use riona::ui::cli::{drivers::InquireDriver, wizard::prompt_config};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config: ExperimentConfig = match cli.command {
        Some(Command::Run(args)) => args.into_config()?,
        None => {
            let driver = InquireDriver;
            prompt_config(&driver).context("failed while prompting for the experiment")?
        }
    };

    if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    let experiment = Experiment::new(config).context("failed to set up the experiment")?;
    let header = header_lines(experiment.config());

    let (tx, rx) = std::sync::mpsc::channel();
    let render: JoinHandle<()> = std::thread::spawn(move || render_status_with_header(rx, header, 150));

    let experiment = experiment.with_progress(tx);
    let outcome = experiment.run();

    drop(experiment);
    let _ = render.join();

    let report = outcome.context("experiment failed")?;
    print_summary(&report);

    Ok(())
}

fn header_lines(cfg: &ExperimentConfig) -> Vec<String> {
    let title = if cfg.all {
        "▶ Leave-one-out batch".to_string()
    } else {
        format!("▶ Leave-one-out {}", cfg.algorithm)
    };
    let threads = if cfg.threads == 0 {
        "auto".to_string()
    } else {
        cfg.threads.to_string()
    };
    vec![
        format!("{BOLD}{FG_CYAN}{title}{RESET}"),
        format!(
            "{DIM}data={}{RESET}  {DIM}mode={} nominal={} missing={}{RESET}  {DIM}k={}{RESET}  {DIM}threads={}{RESET}  {}",
            cfg.data.display(),
            cfg.distance.mode,
            cfg.distance.nominal_metric,
            cfg.distance.missing_mode,
            cfg.k,
            threads,
            timestamp_now()
        ),
        format!(
            "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
        ),
    ]
}

/// Print header once, then refresh a single status line per run. The final
/// snapshot of a run closes its line, as does a snapshot from another
/// algorithm or one that starts counting again.
pub fn render_status_with_header(rx: Receiver<Snapshot>, header_lines: Vec<String>, repaint_every_ms: u64) {
    for line in &header_lines {
        println!("{line}");
    }

    println!();
    let _ = io::stdout().flush();

    let tick = Duration::from_millis(repaint_every_ms);
    let mut last_draw = Instant::now();
    let mut last_snap: Option<Snapshot> = None;

    loop {
        match rx.recv_timeout(tick) {
            Ok(s) => {
                if let Some(prev) = last_snap.as_ref()
                    && (prev.algorithm != s.algorithm || s.instances_seen < prev.instances_seen)
                {
                    print!("\r{}\x1B[K\n", format_status(prev));
                    let _ = io::stdout().flush();
                }
                if s.is_final() {
                    print!("\r{}\x1B[K\n", format_status(&s));
                    let _ = io::stdout().flush();
                    last_snap = None;
                } else {
                    last_snap = Some(s);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(s) = last_snap.take() {
                    print!("\r{}\x1B[K\n", format_status(&s));
                    let _ = io::stdout().flush();
                }
                break;
            }
        }

        if last_draw.elapsed() >= tick {
            if let Some(s) = last_snap.as_ref() {
                print!("\r{}\x1B[K", format_status(s));
                let _ = io::stdout().flush();
            }
            last_draw = Instant::now();
        }
    }
}

fn format_status(s: &Snapshot) -> String {
    let acc = fmtf(s.accuracy * 100.0, 4);

    let mut nc = String::new();
    if let Some(v) = s.extras.get("accuracy_nc") {
        nc = format!("  {FG_MAGENTA}{BOLD}nc{RESET} {:>7}%", fmtf(*v * 100.0, 4));
    }

    let mut line = format!(
        "{BOLD}{:<14}{RESET}\
         {FG_GREEN}{BOLD}seen{RESET} {:>9}/{:<9}  \
         {FG_CYAN}{BOLD}acc{RESET} {:>7}%\
         {}  \
         {DIM}t{RESET} {:>7.3}s",
        s.algorithm, s.instances_seen, s.total, acc, nc, s.seconds
    );

    let bar = progress_bar(s.instances_seen as f64, s.total as f64, 20);
    if !bar.is_empty() {
        line.push_str(&format!("  {bar}"));
    }
    line
}

fn progress_bar(current: f64, total: f64, width: usize) -> String {
    if total.is_finite() && total > 0.0 {
        let ratio = (current / total).clamp(0.0, 1.0);
        let filled = (ratio * width as f64).round() as usize;
        let empty = width.saturating_sub(filled);
        return format!(
            "[{}{}] {:>3.0}%",
            "█".repeat(filled),
            "░".repeat(empty),
            ratio * 100.0
        );
    }

    String::new()
}

fn fmtf(x: f64, prec: usize) -> String {
    if x.is_nan() {
        format!("{DIM}NaN{RESET}")
    } else {
        format!("{:>1$.prec$}", x, 6, prec = prec)
    }
}

fn ms(d: Duration) -> String {
    format!("{:.0} ms", d.as_secs_f64() * 1000.0)
}

fn print_summary(report: &ExperimentReport) {
    println!(
        "{BOLD}Loaded{RESET} {}: n={}, features={}  {DIM}load {}, impute {}{RESET}",
        report.dataset,
        report.records,
        report.features,
        ms(report.load_time),
        ms(report.impute_time)
    );
    for run in &report.runs {
        print_run(run);
    }
}

fn print_run(run: &RunReport) {
    let name = match run.algorithm {
        AlgorithmKind::Knn => "kNN",
        AlgorithmKind::Ria => "RIA",
        AlgorithmKind::Riona => "RIONA",
    };
    let k = match run.algorithm {
        AlgorithmKind::Ria => String::new(),
        _ => format!(" k={} ({})", run.k_tag, run.k),
    };
    let accuracy = match run.nc_accuracy {
        Some(nc) => format!("accC={:.4}, accNC={:.4}", run.accuracy, nc),
        None => format!("acc={:.4}", run.accuracy),
    };
    println!(
        "{BOLD}{name}{RESET}{k}: {accuracy}  {DIM}classify {}, cpu {}, total {}{RESET}",
        ms(run.timings.classify),
        ms(run.cpu_time),
        ms(run.timings.total())
    );
    for path in &run.written {
        println!("  {FG_GREY}saved{RESET} {}", path.display());
    }
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
