//! Test fixtures for generating valid XLSX files in memory.
//!
//! Provides a small builder for creating workbooks programmatically, plus
//! shorthand constructors for hand-built grids. Text cells go through a
//! real shared string table so tests exercise the same decode path Excel
//! files take.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use strainmerge::cell_ref::{col_to_letter, parse_cell_ref};
use strainmerge::{Cell, Grid};

// ============================================================================
// Grid shorthand
// ============================================================================

pub fn num(v: f64) -> Cell {
    Cell::Number(v)
}

pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

pub fn empty() -> Cell {
    Cell::Empty
}

pub fn grid_of(rows: Vec<Vec<Cell>>) -> Grid {
    Grid::from_rows(rows)
}

// ============================================================================
// XLSX builder
// ============================================================================

/// A cell value for the builder.
#[derive(Debug, Clone)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Number(f64::from(v))
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

/// Builder for creating single-sheet XLSX files in memory.
///
/// # Example
///
/// ```ignore
/// let xlsx = XlsxBuilder::new("Sheet1")
///     .cell("A2", "S1")
///     .cell("D3", 5.0)
///     .build();
/// let sheet = strainmerge::reader::read_first_sheet(&xlsx).unwrap();
/// ```
pub struct XlsxBuilder {
    sheet_name: String,
    cells: Vec<(usize, usize, CellValue)>,
}

impl XlsxBuilder {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            cells: Vec::new(),
        }
    }

    /// Set a cell by A1-style reference.
    pub fn cell(self, cell_ref: &str, value: impl Into<CellValue>) -> Self {
        let (col, row) = parse_cell_ref(cell_ref).expect("invalid cell ref in fixture");
        self.cell_at(row, col, value)
    }

    /// Set a cell by 0-based (row, col).
    pub fn cell_at(mut self, row: usize, col: usize, value: impl Into<CellValue>) -> Self {
        self.cells.push((row, col, value.into()));
        self
    }

    /// Place a whole grid's non-empty cells, starting at A1.
    pub fn grid(mut self, grid: &Grid) -> Self {
        for (r, row) in grid.rows().iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Number(n) => self.cells.push((r, c, CellValue::Number(*n))),
                    Cell::Text(s) => self.cells.push((r, c, CellValue::Text(s.clone()))),
                    Cell::Empty => {}
                }
            }
        }
        self
    }

    /// Produce the finished XLSX bytes.
    pub fn build(mut self) -> Vec<u8> {
        self.cells.sort_by_key(|&(r, c, _)| (r, c));

        // Collect shared strings in first-seen order
        let mut shared: Vec<String> = Vec::new();
        let mut sst_index = |s: &str, shared: &mut Vec<String>| -> usize {
            if let Some(i) = shared.iter().position(|x| x == s) {
                i
            } else {
                shared.push(s.to_string());
                shared.len() - 1
            }
        };

        let mut sheet_xml = String::new();
        sheet_xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        sheet_xml.push('\n');
        sheet_xml.push_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        sheet_xml.push_str("<sheetData>");

        let mut i = 0;
        while i < self.cells.len() {
            let row = self.cells[i].0;
            sheet_xml.push_str(&format!("<row r=\"{}\">", row + 1));
            while i < self.cells.len() && self.cells[i].0 == row {
                let (_, col, ref value) = self.cells[i];
                let cell_ref = format!("{}{}", col_to_letter(col), row + 1);
                match value {
                    CellValue::Number(n) => {
                        sheet_xml.push_str(&format!("<c r=\"{cell_ref}\"><v>{n}</v></c>"));
                    }
                    CellValue::Text(s) => {
                        let idx = sst_index(s, &mut shared);
                        sheet_xml
                            .push_str(&format!("<c r=\"{cell_ref}\" t=\"s\"><v>{idx}</v></c>"));
                    }
                    CellValue::Bool(b) => {
                        let v = if *b { 1 } else { 0 };
                        sheet_xml.push_str(&format!("<c r=\"{cell_ref}\" t=\"b\"><v>{v}</v></c>"));
                    }
                }
                i += 1;
            }
            sheet_xml.push_str("</row>");
        }

        sheet_xml.push_str("</sheetData></worksheet>");

        let mut sst_xml = String::new();
        sst_xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        sst_xml.push('\n');
        sst_xml.push_str(&format!(
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            shared.len()
        ));
        for s in &shared {
            sst_xml.push_str(&format!("<si><t>{}</t></si>", escape(s)));
        }
        sst_xml.push_str("</sst>");

        let workbook_xml = format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
            ),
            escape(&self.sheet_name)
        );

        let workbook_rels = concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            r#"</Relationships>"#
        );

        let package_rels = concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
            r#"</Relationships>"#
        );

        let content_types = concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
            r#"</Types>"#
        );

        let buf: Vec<u8> = Vec::new();
        let mut writer = ZipWriter::new(Cursor::new(buf));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let parts: [(&str, &str); 6] = [
            ("[Content_Types].xml", content_types),
            ("_rels/.rels", package_rels),
            ("xl/workbook.xml", &workbook_xml),
            ("xl/_rels/workbook.xml.rels", workbook_rels),
            ("xl/sharedStrings.xml", &sst_xml),
            ("xl/worksheets/sheet1.xml", &sheet_xml),
        ];

        for (name, content) in parts {
            writer.start_file(name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A minimal source workbook holding one valid sample block at column 0.
///
/// Name "S1" at A2, thickness 2.5 at A3, strain in column D, stress in
/// column E, rows 3-6 (0-based rows 2-5).
pub fn one_sample_workbook() -> Vec<u8> {
    XlsxBuilder::new("Sheet1")
        .cell("A2", "S1")
        .cell("A3", 2.5)
        .cell("D3", 1.0)
        .cell("E3", 10.0)
        .cell("D4", 6.0)
        .cell("E4", 20.0)
        .cell("D5", 11.0)
        .cell("E5", 30.0)
        .cell("D6", 21.0)
        .cell("E6", 40.0)
        .build()
}
