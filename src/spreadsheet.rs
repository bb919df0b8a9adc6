//! Workbook adapter: lesson input parsing and result export.
//!
//! Input: the first sheet of a `.xlsx` workbook, one lesson per data row,
//! headers matched case/format-insensitively against the accepted aliases.
//! Output: a single-sheet workbook with the four fixed result columns.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use tracing::debug;

use crate::error::{AppResult, SpreadsheetError};
use crate::models::{GeneratedLesson, LessonInput};

/// Sheet name used for exported workbooks.
pub const OUTPUT_SHEET_NAME: &str = "Lessons";

/// Canonical output column headers, in order.
pub const OUTPUT_HEADERS: [&str; 4] = [
    "Lesson Name",
    "Slides",
    "Textual Content",
    "Summarized Content",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LessonColumn {
    Name,
    Slides,
}

/// Accepted header spellings, keyed by their normalized form.
static LESSON_COLUMNS: phf::Map<&'static str, LessonColumn> = phf::phf_map! {
    "lessonname" => LessonColumn::Name,
    "slides" => LessonColumn::Slides,
};

/// Collapse a header cell to its normalized form: lowercase, alphanumeric only.
///
/// "Lesson Name", "lessonName" and "lesson_name" all normalize to "lessonname".
fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Parse lesson inputs from a workbook file.
///
/// Rejects non-`.xlsx` extensions before touching the file contents.
pub fn parse(path: &str) -> AppResult<Vec<LessonInput>> {
    let is_xlsx = Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    if !is_xlsx {
        return Err(SpreadsheetError::UnsupportedExtension {
            path: path.to_string(),
        }
        .into());
    }

    let file = File::open(path).map_err(|source| SpreadsheetError::Io {
        path: path.to_string(),
        source,
    })?;

    parse_reader(BufReader::new(file))
}

/// Parse lesson inputs from any seekable workbook source.
pub fn parse_reader<RS: Read + Seek>(reader: RS) -> AppResult<Vec<LessonInput>> {
    let mut workbook = Xlsx::new(reader).map_err(SpreadsheetError::Read)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SpreadsheetError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(SpreadsheetError::Read)?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or_else(|| SpreadsheetError::MissingColumn {
        sheet: sheet_name.clone(),
        column: OUTPUT_HEADERS[0],
    })?;

    let mut name_col = None;
    let mut slides_col = None;
    for (idx, cell) in header_row.iter().enumerate() {
        match LESSON_COLUMNS.get(normalize_header(&cell_text(cell)).as_str()) {
            Some(LessonColumn::Name) => name_col = Some(idx),
            Some(LessonColumn::Slides) => slides_col = Some(idx),
            None => {}
        }
    }

    let name_col = name_col.ok_or_else(|| SpreadsheetError::MissingColumn {
        sheet: sheet_name.clone(),
        column: OUTPUT_HEADERS[0],
    })?;
    let slides_col = slides_col.ok_or_else(|| SpreadsheetError::MissingColumn {
        sheet: sheet_name.clone(),
        column: OUTPUT_HEADERS[1],
    })?;

    let mut lessons = Vec::new();
    for row in rows {
        let name = row.get(name_col).map(cell_text).unwrap_or_default();
        let slides = row.get(slides_col).map(cell_text).unwrap_or_default();

        // Fully blank rows are padding, not data
        if name.is_empty() && slides.is_empty() {
            continue;
        }

        if name.is_empty() {
            return Err(SpreadsheetError::MissingColumn {
                sheet: sheet_name.clone(),
                column: OUTPUT_HEADERS[0],
            }
            .into());
        }
        if slides.is_empty() {
            return Err(SpreadsheetError::MissingColumn {
                sheet: sheet_name.clone(),
                column: OUTPUT_HEADERS[1],
            }
            .into());
        }

        lessons.push(LessonInput::new(name, slides));
    }

    debug!("parsed {} lessons from sheet '{}'", lessons.len(), sheet_name);
    Ok(lessons)
}

fn build_workbook(lessons: &[GeneratedLesson]) -> Result<Workbook, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(OUTPUT_SHEET_NAME)?;

    for (col, header) in OUTPUT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (idx, lesson) in lessons.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, lesson.lesson_name.as_str())?;
        worksheet.write_string(row, 1, lesson.slides_content.as_str())?;
        worksheet.write_string(row, 2, lesson.markdown_content.as_str())?;
        worksheet.write_string(row, 3, lesson.summarized_content.as_str())?;
    }

    Ok(workbook)
}

/// Serialize results into workbook bytes.
pub fn serialize(lessons: &[GeneratedLesson]) -> AppResult<Vec<u8>> {
    let mut workbook = build_workbook(lessons).map_err(SpreadsheetError::Write)?;
    let bytes = workbook.save_to_buffer().map_err(SpreadsheetError::Write)?;
    Ok(bytes)
}

/// Write results to a workbook file.
pub fn write(lessons: &[GeneratedLesson], path: &str) -> AppResult<()> {
    let mut workbook = build_workbook(lessons).map_err(SpreadsheetError::Write)?;
    workbook.save(path).map_err(SpreadsheetError::Write)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::AppError;

    fn sample_lessons() -> Vec<GeneratedLesson> {
        vec![
            GeneratedLesson {
                lesson_name: "Photosynthesis".to_string(),
                slides_content: "Slide 1: light reactions".to_string(),
                markdown_content: "# Photosynthesis\nContent.".to_string(),
                summarized_content: "<<Unstop>>\nSummary.".to_string(),
            },
            GeneratedLesson {
                lesson_name: "Supply and Demand".to_string(),
                slides_content: "Slide 1: market basics".to_string(),
                markdown_content: "# Markets".to_string(),
                summarized_content: "Need to Retry".to_string(),
            },
        ]
    }

    fn workbook_bytes(headers: &[&str], rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet.write_string((r + 1) as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn normalization_covers_all_accepted_aliases() {
        for alias in ["Lesson Name", "lessonName", "lesson_name"] {
            assert_eq!(
                LESSON_COLUMNS.get(normalize_header(alias).as_str()),
                Some(&LessonColumn::Name),
                "alias {alias:?} should resolve to the name column"
            );
        }
        for alias in ["Slides", "slides", "SLIDES"] {
            assert_eq!(
                LESSON_COLUMNS.get(normalize_header(alias).as_str()),
                Some(&LessonColumn::Slides)
            );
        }
    }

    #[test]
    fn alias_spellings_parse_identically() {
        let canonical = workbook_bytes(
            &["Lesson Name", "Slides"],
            &[&["Photosynthesis", "light reactions"]],
        );
        let snake = workbook_bytes(
            &["lesson_name", "slides"],
            &[&["Photosynthesis", "light reactions"]],
        );

        let from_canonical = parse_reader(Cursor::new(canonical)).unwrap();
        let from_snake = parse_reader(Cursor::new(snake)).unwrap();
        assert_eq!(from_canonical, from_snake);
        assert_eq!(from_canonical[0].lesson_name, "Photosynthesis");
    }

    #[test]
    fn missing_both_columns_is_rejected() {
        let bytes = workbook_bytes(&["Title", "Body"], &[&["a", "b"]]);
        let err = parse_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Spreadsheet(SpreadsheetError::MissingColumn { .. })
        ));
    }

    #[test]
    fn row_with_empty_slides_is_rejected() {
        let bytes = workbook_bytes(&["Lesson Name", "Slides"], &[&["Photosynthesis", ""]]);
        let err = parse_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Spreadsheet(SpreadsheetError::MissingColumn { column: "Slides", .. })
        ));
    }

    #[test]
    fn blank_rows_are_skipped() {
        let bytes = workbook_bytes(
            &["Lesson Name", "Slides"],
            &[&["", ""], &["Photosynthesis", "light reactions"]],
        );
        let lessons = parse_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(lessons.len(), 1);
    }

    #[test]
    fn round_trip_recovers_name_and_slides() {
        let lessons = sample_lessons();
        let bytes = serialize(&lessons).unwrap();
        let parsed = parse_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(parsed.len(), lessons.len());
        for (input, original) in parsed.iter().zip(&lessons) {
            assert_eq!(input.lesson_name, original.lesson_name);
            assert_eq!(input.slides_content, original.slides_content);
        }
    }

    #[test]
    fn non_xlsx_extension_is_rejected_before_reading() {
        let err = parse("lessons.csv").unwrap_err();
        assert!(matches!(
            err,
            AppError::Spreadsheet(SpreadsheetError::UnsupportedExtension { .. })
        ));
    }
}
