//! Single-page PDF export of one record.
//!
//! The layout is fixed: a title line, then one line per field in the order
//! the confirmation screen shows them. Optional fields only get a line when
//! they hold something. Coordinates are A4 millimetres measured from the top
//! of the page, converted for the bottom-origin renderer.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{error::AppError, submission::Submission, utils::format_local};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

const MARGIN_LEFT_MM: f32 = 20.0;
const TITLE_TOP_MM: f32 = 20.0;
const BODY_TOP_MM: f32 = 40.0;
const LINE_STEP_MM: f32 = 10.0;

const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 12.0;

const TITLE: &str = "Exam Registration Form";

/// Body lines in their fixed order. The alternate phone and the formatted
/// submission time only appear when present.
pub fn field_lines(submission: &Submission) -> Vec<String> {
    let mut lines = vec![
        format!("ID: {}", submission.id),
        format!("Full name: {}", submission.draft.full_name),
        format!("Birth date: {}", submission.draft.birth_date),
        format!("Nationality: {}", submission.draft.nationality),
        format!("Sex: {}", submission.draft.sex),
        format!("Primary phone: {}", submission.draft.primary_phone),
    ];

    if !submission.draft.alternate_phone.is_empty() {
        lines.push(format!(
            "Alternate phone: {}",
            submission.draft.alternate_phone
        ));
    }

    lines.push(format!("E-mail: {}", submission.draft.email));

    if let Some(submitted_at) = submission.timestamp.and_then(format_local) {
        lines.push(format!("Submitted at: {submitted_at}"));
    }

    lines
}

pub fn render(submission: &Submission) -> Result<Vec<u8>, AppError> {
    let (document, page, layer) = PdfDocument::new(
        TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let font = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Pdf(e.to_string()))?;

    let content = document.get_page(page).get_layer(layer);

    content.use_text(TITLE, TITLE_SIZE, Mm(MARGIN_LEFT_MM), from_top(TITLE_TOP_MM), &font);

    let mut y = BODY_TOP_MM;
    for line in field_lines(submission) {
        content.use_text(line, BODY_SIZE, Mm(MARGIN_LEFT_MM), from_top(y), &font);
        y += LINE_STEP_MM;
    }

    document
        .save_to_bytes()
        .map_err(|e| AppError::Pdf(e.to_string()))
}

/// Download name derived from the record's share id.
pub fn filename(submission: &Submission) -> String {
    format!("form_{}.pdf", submission.id)
}

fn from_top(mm: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - mm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{Draft, Sex};

    fn submission(alternate_phone: &str, timestamp: Option<i64>) -> Submission {
        Submission {
            id: "K7M2P9QA".to_string(),
            draft: Draft {
                full_name: "Ana Lima".to_string(),
                birth_date: "1995-06-30".to_string(),
                nationality: "Brasileira".to_string(),
                sex: Sex::Female,
                primary_phone: "+55 11 91234 5678".to_string(),
                alternate_phone: alternate_phone.to_string(),
                email: "ana@example.com".to_string(),
            },
            timestamp,
        }
    }

    #[test]
    fn lines_follow_the_fixed_order() {
        let lines = field_lines(&submission("+55 11 99876 5432", Some(0)));

        assert_eq!(lines[0], "ID: K7M2P9QA");
        assert_eq!(lines[1], "Full name: Ana Lima");
        assert_eq!(lines[2], "Birth date: 1995-06-30");
        assert_eq!(lines[3], "Nationality: Brasileira");
        assert_eq!(lines[4], "Sex: Female");
        assert_eq!(lines[5], "Primary phone: +55 11 91234 5678");
        assert_eq!(lines[6], "Alternate phone: +55 11 99876 5432");
        assert_eq!(lines[7], "E-mail: ana@example.com");
        assert!(lines[8].starts_with("Submitted at: "));
    }

    #[test]
    fn empty_alternate_phone_is_omitted() {
        let lines = field_lines(&submission("", Some(0)));

        assert!(!lines.iter().any(|l| l.starts_with("Alternate phone:")));
        assert_eq!(lines[6], "E-mail: ana@example.com");
    }

    #[test]
    fn missing_timestamp_is_omitted() {
        let lines = field_lines(&submission("", None));

        assert!(!lines.iter().any(|l| l.starts_with("Submitted at:")));
        assert_eq!(lines.last().unwrap(), "E-mail: ana@example.com");
    }

    #[test]
    fn render_produces_a_pdf() {
        let bytes = render(&submission("+55 11 99876 5432", Some(0))).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn filename_carries_the_id() {
        assert_eq!(filename(&submission("", None)), "form_K7M2P9QA.pdf");
    }
}
