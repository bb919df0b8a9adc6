//! Terminal rendering of run status and results.
//!
//! The renderer is a passive subscriber of the pipeline's progress channel;
//! it derives everything it shows from the published snapshots and holds no
//! state of its own.

use tokio::sync::watch;
use tracing::{error, info};

use crate::workflow::lesson_pipeline::RunReport;
use crate::workflow::run_state::{RunProgress, RunStatus};

pub fn log_startup(source: &str, total_lessons: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 HVscribe - AI lesson scribing");
    info!("📄 source: {}", source);
    info!("📚 lessons to process: {}", total_lessons);
    info!("{}", "=".repeat(60));
}

/// Render progress snapshots until the run leaves its active states.
pub async fn render_progress(mut rx: watch::Receiver<RunProgress>) {
    let mut last_status = RunStatus::Idle;

    loop {
        if rx.changed().await.is_err() {
            break;
        }
        let progress = rx.borrow_and_update().clone();

        if progress.status != last_status {
            match progress.status {
                RunStatus::Estimating => info!("⏱️ estimating processing time..."),
                RunStatus::Generating => info!("✍️ scribing lessons..."),
                RunStatus::Summarizing => info!("📋 summarizing content..."),
                RunStatus::Completed => info!("✅ generation complete"),
                RunStatus::Failed => error!("❌ run failed"),
                RunStatus::Idle => {}
            }
            last_status = progress.status;
        }

        if progress.status.is_active() && progress.total_steps > 0 {
            let remaining = progress.estimated_time_seconds * (1.0 - progress.percent() / 100.0);
            info!(
                "   {:.0}% complete ({} of {} steps, ~{:.0}s remaining)",
                progress.percent(),
                progress.steps_done,
                progress.total_steps,
                remaining.max(0.0)
            );
        }

        if matches!(progress.status, RunStatus::Completed | RunStatus::Failed) {
            break;
        }
    }
}

pub fn print_final_stats(report: &RunReport, output_file: &str) {
    info!("{}", "=".repeat(60));
    info!(
        "finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ lessons completed: {}", report.lessons.len());

    let placeholders = report.retry_placeholder_count();
    if placeholders > 0 {
        info!(
            "⚠️ {} lesson(s) exhausted summary retries and carry the placeholder",
            placeholders
        );
    }

    match &report.failure {
        Some(e) => error!("❌ run aborted: {}", e),
        None => info!("📁 results written to: {}", output_file),
    }
    info!("{}", "=".repeat(60));
}

/// Truncate long text for log previews.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
