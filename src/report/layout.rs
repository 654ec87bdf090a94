//! Page layout for the health report, independent of the PDF backend.
//!
//! Coordinates are millimetres on an A4 page with the origin at the top-left
//! corner and y growing downwards. The PDF renderer flips y.

use crate::models::{SymptomQuery, UserProfile};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// A line is never placed with its baseline below this.
pub const PAGE_BREAK_Y: f32 = 270.0;
/// Cursor position at the top of a continuation page.
pub const PAGE_TOP_Y: f32 = 20.0;

/// Characters per wrapped line; ~180 mm of 12pt Helvetica.
pub const WRAP_COLUMNS: usize = 85;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const LINE_STEP: f32 = 7.0;
const QUERY_GAP: f32 = 10.0;

const DETAILS_TOP: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `x` is the horizontal centre of the text.
    Center,
}

/// One positioned primitive on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        page: usize,
        x: f32,
        y: f32,
        size: f32,
        align: Align,
        text: String,
    },
    Line {
        page: usize,
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
    },
}

impl DrawOp {
    pub fn page(&self) -> usize {
        match self {
            DrawOp::Text { page, .. } | DrawOp::Line { page, .. } => *page,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            DrawOp::Line { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportLayout {
    pub ops: Vec<DrawOp>,
    pub page_count: usize,
}

impl ReportLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(DrawOp::text)
    }
}

/// True when the cursor has run past the usable page height.
pub fn needs_page_break(y: f32) -> bool {
    y > PAGE_BREAK_Y
}

/// Body mass index with two decimals, or `N/A`.
pub fn format_bmi(profile: &UserProfile) -> String {
    profile
        .bmi()
        .map(|bmi| format!("{bmi:.2}"))
        .unwrap_or_else(|| "N/A".to_string())
}

/// The eight "Personal Details" lines.
pub fn personal_details(profile: &UserProfile) -> Vec<String> {
    let or_na = |value: Option<&str>| -> String {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("N/A")
            .to_string()
    };
    let number = |value: Option<f64>| -> String {
        value
            .filter(|v| *v > 0.0)
            .map(format_number)
            .unwrap_or_else(|| "N/A".to_string())
    };

    vec![
        format!("Name: {}", or_na(profile.full_name.as_deref())),
        format!(
            "Age: {}",
            profile
                .age
                .filter(|a| *a > 0)
                .map(|a| a.to_string())
                .unwrap_or_else(|| "N/A".to_string())
        ),
        format!("Gender: {}", or_na(profile.gender.as_deref())),
        format!("Height: {} cm", number(profile.height_cm)),
        format!("Weight: {} kg", number(profile.weight_kg)),
        format!("BMI: {}", format_bmi(profile)),
        format!("Smoking: {}", or_na(profile.smoking.as_deref())),
        format!(
            "Alcohol Consumption: {}",
            or_na(profile.alcohol_consumption.as_deref())
        ),
    ]
}

/// Lay out the full report.
pub fn build(profile: &UserProfile, queries: &[SymptomQuery]) -> ReportLayout {
    let mut ops = Vec::new();

    ops.push(DrawOp::Text {
        page: 0,
        x: PAGE_WIDTH_MM / 2.0,
        y: 20.0,
        size: TITLE_SIZE,
        align: Align::Center,
        text: "GoHealthy".to_string(),
    });
    ops.push(DrawOp::Line {
        page: 0,
        from: (20.0, 25.0),
        to: (190.0, 25.0),
        thickness: 0.8,
    });
    ops.push(text_op(0, 10.0, 40.0, HEADING_SIZE, "Personal Details"));
    ops.push(DrawOp::Line {
        page: 0,
        from: (10.0, 43.0),
        to: (190.0, 43.0),
        thickness: 0.3,
    });

    let details = personal_details(profile);
    for (i, line) in details.iter().enumerate() {
        ops.push(text_op(0, 10.0, DETAILS_TOP + i as f32 * LINE_STEP, BODY_SIZE, line));
    }

    let section_y = DETAILS_TOP + details.len() as f32 * LINE_STEP + 10.0;
    ops.push(text_op(0, 10.0, section_y, HEADING_SIZE, "Symptoms and Predictions"));

    let mut cursor = Cursor {
        ops,
        page: 0,
        y: section_y + 10.0,
    };

    if queries.is_empty() {
        cursor.line(10.0, "No queries found.", 0.0);
    }

    for (idx, query) in queries.iter().enumerate() {
        cursor.line(10.0, &format!("Query {}:", idx + 1), LINE_STEP);
        let symptoms = format!("Symptoms: {}", query.symptoms.present_joined());
        for wrapped in wrap_text(&symptoms, WRAP_COLUMNS) {
            cursor.line(20.0, &wrapped, LINE_STEP);
        }
        cursor.line(20.0, &format!("Prediction: {}", query.prediction), QUERY_GAP);
    }

    ReportLayout {
        page_count: cursor.page + 1,
        ops: cursor.ops,
    }
}

fn text_op(page: usize, x: f32, y: f32, size: f32, text: &str) -> DrawOp {
    DrawOp::Text {
        page,
        x,
        y,
        size,
        align: Align::Left,
        text: text.to_string(),
    }
}

/// Flowing text cursor for the query section.
struct Cursor {
    ops: Vec<DrawOp>,
    page: usize,
    y: f32,
}

impl Cursor {
    /// Place one body line at the cursor, breaking the page first if needed,
    /// then advance by `step`.
    fn line(&mut self, x: f32, text: &str, step: f32) {
        if needs_page_break(self.y) {
            self.page += 1;
            self.y = PAGE_TOP_Y;
        }
        self.ops.push(text_op(self.page, x, self.y, BODY_SIZE, text));
        self.y += step;
    }
}

/// 170.0 → "170", 72.5 → "72.5".
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Word-wrap to `max_chars` columns. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();

        let current_len = current.chars().count();
        if current_len + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
