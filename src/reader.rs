//! XLSX decoding — reads the first sheet of a workbook into a [`Grid`].
//!
//! Only the pieces of the package the grid model needs are touched:
//! workbook relationships (worksheet paths + shared strings), the sheet
//! list in `xl/workbook.xml`, the shared string table, and the first
//! sheet's cell data. Styles, themes and everything else are ignored.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::{MergeError, Result};
use crate::grid::{Cell, Grid, SheetGrid};

/// Decode the first sheet of an XLSX workbook.
///
/// Cells with no value decode to `Cell::Empty`, never to zero or blank
/// text. A workbook without any sheet is a decode failure, not an empty
/// grid.
pub fn read_first_sheet(data: &[u8]) -> Result<SheetGrid> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)
        .map_err(|e| MergeError::Decode(format!("not a readable workbook: {e}")))?;

    let rels = parse_workbook_relationships(&mut archive);
    let (name, path) = first_sheet_info(&mut archive, &rels.worksheets)?;
    let shared_strings = parse_shared_strings(&mut archive, rels.shared_strings.as_deref());
    let grid = parse_sheet_grid(&mut archive, &path, &shared_strings)?;

    Ok(SheetGrid { name, grid })
}

/// Workbook relationships parsed from xl/_rels/workbook.xml.rels.
#[derive(Default, Debug)]
struct WorkbookRelationships {
    /// Map of rId -> full path for worksheet parts,
    /// e.g. "rId1" -> "xl/worksheets/sheet1.xml".
    worksheets: HashMap<String, String>,
    /// Path to the shared strings part, if any.
    shared_strings: Option<String>,
}

fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> WorkbookRelationships {
    let mut rels = WorkbookRelationships::default();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return rels; // Relationships file is optional
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = String::new();
                    let mut target = String::new();
                    let mut rel_type = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            b"Target" => {
                                target = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            b"Type" => {
                                rel_type =
                                    std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            _ => {}
                        }
                    }

                    // Resolve target path relative to xl/
                    let full_path = if let Some(stripped) = target.strip_prefix('/') {
                        stripped.to_string()
                    } else {
                        format!("xl/{target}")
                    };

                    if rel_type.contains("worksheet") && !id.is_empty() && !target.is_empty() {
                        rels.worksheets.insert(id, full_path);
                    } else if rel_type.contains("sharedStrings") {
                        rels.shared_strings = Some(full_path);
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Name and part path of the first sheet listed in xl/workbook.xml.
fn first_sheet_info<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    worksheets: &HashMap<String, String>,
) -> Result<(String, String)> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|e| MergeError::Decode(format!("missing xl/workbook.xml: {e}")))?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"sheet" {
                    let mut name = String::new();
                    let mut r_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            key if key.ends_with(b":id") || key == b"id" => {
                                r_id = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        let path = worksheets
                            .get(&r_id)
                            .cloned()
                            .unwrap_or_else(|| "xl/worksheets/sheet1.xml".to_string());
                        return Ok((name, path));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Err(MergeError::Decode(
        "workbook contains no sheets".to_string(),
    ))
}

fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Vec<String> {
    let sst_path = path.unwrap_or("xl/sharedStrings.xml");
    let Ok(file) = archive.by_name(sst_path) else {
        return Vec::new(); // SharedStrings is optional
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current_string = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current_string.clear();
                }
                b"t" if in_si => {
                    in_t = true;
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current_string.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(current_string.clone());
                    in_si = false;
                }
                b"t" => {
                    in_t = false;
                }
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    strings
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

/// Resolve a raw `<v>`/`<is>` value into a grid cell.
///
/// Numeric cells (the default tag) become `Cell::Number`; everything
/// string-like becomes `Cell::Text`. Booleans and error literals decode
/// as text so they never participate in numeric strain matching.
fn resolve_cell(value: Option<String>, tag: CellTypeTag, shared_strings: &[String]) -> Cell {
    let Some(v) = value else {
        return Cell::Empty;
    };
    match tag {
        CellTypeTag::Shared => {
            let idx = v.trim().parse::<usize>().ok();
            match idx.and_then(|i| shared_strings.get(i)) {
                Some(s) => Cell::Text(s.clone()),
                None => Cell::Empty,
            }
        }
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Error => Cell::Text(v),
        CellTypeTag::Bool => Cell::Text(if v.trim() == "1" || v.trim().eq_ignore_ascii_case("true")
        {
            "TRUE".to_string()
        } else {
            "FALSE".to_string()
        }),
        CellTypeTag::Default => match v.trim().parse::<f64>() {
            Ok(n) => Cell::Number(n),
            Err(_) => Cell::Text(v),
        },
    }
}

/// Stream one worksheet part into a grid.
fn parse_sheet_grid<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
) -> Result<Grid> {
    let file = archive
        .by_name(path)
        .map_err(|e| MergeError::Decode(format!("missing worksheet part {path}: {e}")))?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut grid = Grid::new();
    let mut buf = Vec::new();
    let mut cell_buf = Vec::new();
    let mut text_buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_start_event = matches!(event, Event::Start(_));

                if e.local_name().as_ref() != b"c" {
                    continue;
                }

                let mut pos: Option<(usize, usize)> = None;
                let mut tag = CellTypeTag::Default;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"r" => {
                            pos = parse_cell_ref_bytes(&attr.value);
                        }
                        b"t" => {
                            tag = parse_cell_type_tag(&attr.value);
                        }
                        _ => {}
                    }
                }

                // Self-closing cells like <c r="A1"/> carry no value
                let mut value: Option<String> = None;
                if is_start_event {
                    loop {
                        cell_buf.clear();
                        match xml.read_event_into(&mut cell_buf) {
                            Ok(Event::Start(ref inner)) => {
                                let inner_name = inner.local_name();
                                let inner_name = inner_name.as_ref();

                                if inner_name == b"v" || inner_name == b"t" {
                                    text_buf.clear();
                                    if let Ok(Event::Text(text)) =
                                        xml.read_event_into(&mut text_buf)
                                    {
                                        value = text.unescape().ok().map(|s| s.to_string());
                                    }
                                }
                            }
                            Ok(Event::End(ref inner)) => {
                                if inner.local_name().as_ref() == b"c" {
                                    break;
                                }
                            }
                            Ok(Event::Eof) | Err(_) => break,
                            _ => {}
                        }
                    }
                }

                if let Some((col, row)) = pos {
                    let cell = resolve_cell(value, tag, shared_strings);
                    if !cell.is_empty() {
                        grid.set(row, col, cell);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(grid)
}
