// src/pdf/layout.rs

use lopdf::content::Operation;
use lopdf::Object;

/// Average glyph advance, in ems, used to estimate where a run ends.
const GLYPH_WIDTH_EM: f32 = 0.5;
/// Horizontal gap, in ems, that starts a new cell.
const CELL_GAP_EM: f32 = 1.0;
/// TJ adjustments (thousandths of an em) below this read as a word space.
const TJ_SPACE: f32 = -250.0;

/// A piece of text shown at one point of the page, in user-space units.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub text: String,
}

impl TextRun {
    fn end_x(&self) -> f32 {
        self.x + self.text.chars().count() as f32 * self.size * GLYPH_WIDTH_EM
    }
}

#[derive(Debug)]
struct TextState {
    line_x: f32,
    line_y: f32,
    x: f32,
    y: f32,
    scale_x: f32,
    scale_y: f32,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            line_x: 0.0,
            line_y: 0.0,
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            font_size: 1.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn begin(&mut self) {
        self.line_x = 0.0;
        self.line_y = 0.0;
        self.scale_x = 1.0;
        self.scale_y = 1.0;
        self.x = 0.0;
        self.y = 0.0;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_x += tx * self.scale_x;
        self.line_y += ty * self.scale_y;
        self.x = self.line_x;
        self.y = self.line_y;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn set_matrix(&mut self, m: &[f32]) {
        self.scale_x = m[0].abs().max(f32::EPSILON);
        self.scale_y = m[3].abs().max(f32::EPSILON);
        self.line_x = m[4];
        self.line_y = m[5];
        self.x = m[4];
        self.y = m[5];
    }

    fn show(&mut self, text: String, runs: &mut Vec<TextRun>) {
        if text.trim().is_empty() {
            return;
        }
        let run = TextRun {
            x: self.x,
            y: self.y,
            size: (self.font_size * self.scale_y).max(1.0),
            text,
        };
        self.x = run.end_x();
        runs.push(run);
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn numbers(operands: &[Object]) -> Vec<f32> {
    operands.iter().filter_map(number).collect()
}

/// Decode a PDF string: UTF-16BE when it carries a BOM, Latin-1 otherwise.
fn decode_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

fn shown_text(obj: &Object) -> String {
    match obj {
        Object::String(bytes, _) => decode_string(bytes),
        Object::Array(items) => {
            let mut out = String::new();
            for item in items {
                match item {
                    Object::String(bytes, _) => out.push_str(&decode_string(bytes)),
                    other => {
                        if number(other).is_some_and(|n| n < TJ_SPACE) {
                            out.push(' ');
                        }
                    }
                }
            }
            out
        }
        _ => String::new(),
    }
}

/// Walk a page's content stream and collect every shown string with the
/// position it starts at.
///
/// Only the text matrix is tracked (`BT`, `Td`, `TD`, `T*`, `Tm`, `TL`,
/// `Tf`); graphics-state transforms are ignored.
pub fn text_runs(operations: &[Operation]) -> Vec<TextRun> {
    let mut state = TextState::default();
    let mut runs = Vec::new();

    for op in operations {
        let args = &op.operands;
        match op.operator.as_str() {
            "BT" => state.begin(),
            "Tf" => {
                if let Some(size) = args.get(1).and_then(number) {
                    state.font_size = size.abs();
                }
            }
            "TL" => {
                if let Some(l) = args.first().and_then(number) {
                    state.leading = l;
                }
            }
            "Td" | "TD" => {
                if let &[tx, ty] = numbers(args).as_slice() {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                let m = numbers(args);
                if m.len() == 6 {
                    state.set_matrix(&m);
                }
            }
            "T*" => state.next_line(),
            "Tj" | "TJ" => {
                if let Some(obj) = args.first() {
                    state.show(shown_text(obj), &mut runs);
                }
            }
            "'" => {
                state.next_line();
                if let Some(obj) = args.first() {
                    state.show(shown_text(obj), &mut runs);
                }
            }
            "\"" => {
                state.next_line();
                if let Some(obj) = args.get(2) {
                    state.show(shown_text(obj), &mut runs);
                }
            }
            _ => {}
        }
    }
    runs
}

/// Group runs into rows (top of the page first) and cells (left to right).
///
/// Runs whose baselines sit within half a font size share a row. Inside a
/// row, a gap wider than one em past the estimated end of the previous run
/// starts a new cell; closer runs are joined with a space.
pub fn group_rows(mut runs: Vec<TextRun>) -> Vec<Vec<String>> {
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    for run in runs {
        let same_line = lines
            .last()
            .is_some_and(|line| (line[0].y - run.y).abs() <= line[0].size.min(run.size) * 0.5);
        match lines.last_mut() {
            Some(line) if same_line => line.push(run),
            _ => lines.push(vec![run]),
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.x.total_cmp(&b.x));
            let mut cells: Vec<String> = Vec::new();
            let mut prev_end: Option<f32> = None;
            for run in line {
                let joins = prev_end.is_some_and(|end| run.x - end <= run.size * CELL_GAP_EM);
                let end = run.end_x();
                match cells.last_mut() {
                    Some(cell) if joins => {
                        cell.push(' ');
                        cell.push_str(&run.text);
                    }
                    _ => cells.push(run.text),
                }
                prev_end = Some(end);
            }
            cells
        })
        .collect()
}
