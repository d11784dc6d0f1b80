//! XLSX encoding — serializes a [`Grid`] into a fresh single-sheet workbook.
//!
//! Text cells use inline strings (`t="inlineStr"`), so no shared string
//! table is emitted. Empty cells are skipped entirely; they decode back to
//! `Cell::Empty` on the next read.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::cell_ref::col_to_letter;
use crate::error::{MergeError, Result};
use crate::grid::{Cell, Grid};

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Serialize `grid` as an XLSX workbook holding exactly one sheet named
/// `sheet_name`.
pub fn write_workbook(grid: &Grid, sheet_name: &str) -> Result<Vec<u8>> {
    let buf: Vec<u8> = Vec::with_capacity(4096);
    let mut writer = ZipWriter::new(Cursor::new(buf));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(content_types_xml().as_bytes())?;

    writer.start_file("_rels/.rels", options)?;
    writer.write_all(package_rels_xml().as_bytes())?;

    writer.start_file("xl/workbook.xml", options)?;
    writer.write_all(workbook_xml(sheet_name).as_bytes())?;

    writer.start_file("xl/_rels/workbook.xml.rels", options)?;
    writer.write_all(workbook_rels_xml().as_bytes())?;

    writer.start_file("xl/worksheets/sheet1.xml", options)?;
    writer.write_all(write_sheet_xml(grid).as_bytes())?;

    let cursor = writer
        .finish()
        .map_err(|e| MergeError::Write(format!("closing archive: {e}")))?;
    Ok(cursor.into_inner())
}

fn content_types_xml() -> String {
    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    out.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    out.push_str(r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#);
    out.push_str("</Types>");
    out
}

fn package_rels_xml() -> String {
    let mut out = String::with_capacity(320);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    out.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    out.push_str("</Relationships>");
    out
}

fn workbook_xml(sheet_name: &str) -> String {
    let mut out = String::with_capacity(320);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">"#));
    out.push_str("<sheets>");
    out.push_str(&format!(
        r#"<sheet name="{}" sheetId="1" r:id="rId1"/>"#,
        xml_escape(sheet_name)
    ));
    out.push_str("</sheets></workbook>");
    out
}

fn workbook_rels_xml() -> String {
    let mut out = String::with_capacity(320);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    out.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#);
    out.push_str("</Relationships>");
    out
}

/// Write a complete worksheet XML string from a `Grid`.
fn write_sheet_xml(grid: &Grid) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">"#));
    out.push('\n');

    // <dimension> spans the full grid including trailing empty cells
    // implied by the longest row
    let height = grid.height();
    let width = grid.width();
    if height > 0 && width > 0 {
        let end_col = col_to_letter(width - 1);
        out.push_str(&format!("<dimension ref=\"A1:{end_col}{height}\"/>"));
        out.push('\n');
    }

    out.push_str("<sheetData>\n");
    for (row_idx, row) in grid.rows().iter().enumerate() {
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        out.push_str(&format!("<row r=\"{}\">", row_idx + 1));
        for (col_idx, cell) in row.iter().enumerate() {
            write_cell(&mut out, row_idx, col_idx, cell);
        }
        out.push_str("</row>\n");
    }
    out.push_str("</sheetData>\n");

    out.push_str("</worksheet>");
    out
}

/// Write a single `<c>` element; empty cells produce nothing.
fn write_cell(out: &mut String, row: usize, col: usize, cell: &Cell) {
    let cell_ref = format!("{}{}", col_to_letter(col), row + 1);

    match cell {
        Cell::Number(n) => {
            out.push_str(&format!("<c r=\"{cell_ref}\"><v>{n}</v></c>"));
        }
        Cell::Text(s) => {
            out.push_str(&format!(
                "<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                xml_escape(s)
            ));
        }
        Cell::Empty => {}
    }
}

/// Minimal XML escaping for attribute/text content.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
