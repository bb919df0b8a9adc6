//! End-to-end pipeline tests over stub flows and in-memory workbooks.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;

use hvscribe::error::{AppError, AppResult, ServiceError, SpreadsheetError};
use hvscribe::flows::{LessonFlows, SummarizeInput};
use hvscribe::models::{LessonInput, SUMMARY_RETRY_PLACEHOLDER};
use hvscribe::spreadsheet;
use hvscribe::workflow::{LessonPipeline, RunProgress, RunStatus};

/// Scriptable stand-in for the model service.
#[derive(Default)]
struct ScriptedFlows {
    generate_calls: AtomicUsize,
    summarize_calls: AtomicUsize,
    fail_generate_at: usize,
    summaries_pass: bool,
}

impl LessonFlows for ScriptedFlows {
    async fn generate(&self, input: &LessonInput) -> AppResult<String> {
        let call = self.generate_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_generate_at == call {
            return Err(ServiceError::Api {
                model: "scripted".to_string(),
                message: "quota exceeded".to_string(),
            }
            .into());
        }
        Ok(format!("# {}\n\nLesson body.", input.lesson_name))
    }

    async fn summarize(&self, input: &SummarizeInput) -> AppResult<String> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        if self.summaries_pass {
            Ok(format!("<<Unstop>>\n\nHere is the current lesson:\n{}", input.lesson_name))
        } else {
            Ok("free-form answer without the marker".to_string())
        }
    }

    async fn estimate(&self, number_of_calls: usize) -> AppResult<f64> {
        Ok((number_of_calls * 10) as f64)
    }
}

fn lessons_workbook() -> Vec<u8> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "lesson_name").unwrap();
    worksheet.write_string(0, 1, "Slides").unwrap();
    for (i, (name, slides)) in [
        ("Photosynthesis", "Slide 1: light reactions, Slide 2: dark reactions"),
        ("Supply and Demand", "Slide 1: markets, Slide 2: equilibrium"),
    ]
    .iter()
    .enumerate()
    {
        worksheet.write_string((i + 1) as u32, 0, *name).unwrap();
        worksheet.write_string((i + 1) as u32, 1, *slides).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn workbook_to_workbook_round_trip() {
    let inputs = spreadsheet::parse_reader(Cursor::new(lessons_workbook())).unwrap();
    assert_eq!(inputs.len(), 2);

    let flows = ScriptedFlows {
        summaries_pass: true,
        ..ScriptedFlows::default()
    };
    let (tx, rx) = watch::channel(RunProgress::idle());
    let pipeline = LessonPipeline::new(flows, tx, 10);

    let report = pipeline.run(&inputs).await;
    assert!(report.is_completed());
    assert_eq!(rx.borrow().status, RunStatus::Completed);

    // Export and parse back: name/slides pairs survive the trip
    let bytes = spreadsheet::serialize(&report.lessons).unwrap();
    let reparsed = spreadsheet::parse_reader(Cursor::new(bytes)).unwrap();
    assert_eq!(reparsed, inputs);
}

#[tokio::test]
async fn malformed_workbook_fails_before_any_model_call() {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Title").unwrap();
    worksheet.write_string(1, 0, "Photosynthesis").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let err = spreadsheet::parse_reader(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(
        err,
        AppError::Spreadsheet(SpreadsheetError::MissingColumn { .. })
    ));
}

#[tokio::test]
async fn exhausted_retries_surface_in_the_export() {
    let inputs = spreadsheet::parse_reader(Cursor::new(lessons_workbook())).unwrap();

    let flows = ScriptedFlows {
        summaries_pass: false,
        ..ScriptedFlows::default()
    };
    let (tx, _rx) = watch::channel(RunProgress::idle());
    let pipeline = LessonPipeline::new(flows, tx, 10);

    let report = pipeline.run(&inputs).await;
    assert!(report.is_completed());
    assert_eq!(report.retry_placeholder_count(), 2);
    // 3 attempts per lesson
    assert_eq!(pipeline_summarize_calls(&pipeline), 6);

    for lesson in &report.lessons {
        assert_eq!(lesson.summarized_content, SUMMARY_RETRY_PLACEHOLDER);
    }
}

#[tokio::test]
async fn mid_batch_generation_failure_keeps_completed_prefix() {
    let inputs = spreadsheet::parse_reader(Cursor::new(lessons_workbook())).unwrap();

    let flows = ScriptedFlows {
        fail_generate_at: 2,
        summaries_pass: true,
        ..ScriptedFlows::default()
    };
    let (tx, rx) = watch::channel(RunProgress::idle());
    let pipeline = LessonPipeline::new(flows, tx, 10);

    let report = pipeline.run(&inputs).await;
    assert!(!report.is_completed());
    assert_eq!(rx.borrow().status, RunStatus::Failed);
    assert_eq!(report.lessons.len(), 1);
    assert_eq!(report.lessons[0].lesson_name, "Photosynthesis");

    // The completed prefix still exports cleanly
    let bytes = spreadsheet::serialize(&report.lessons).unwrap();
    let reparsed = spreadsheet::parse_reader(Cursor::new(bytes)).unwrap();
    assert_eq!(reparsed.len(), 1);
}

fn pipeline_summarize_calls(pipeline: &LessonPipeline<ScriptedFlows>) -> usize {
    pipeline.flows().summarize_calls.load(Ordering::SeqCst)
}
