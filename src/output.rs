//! Output formatting for search results, methods and check reports

use crate::charset::{display_title, matched_prefix_len, truncate_title};
use crate::check::{CheckReport, Problem};
use crate::index::{FileHeader, RecordSummary};
use crate::ringing::{bell_char, Method, Row, MAX_TITLE_LENGTH};
use crate::utils::stage_name;
use serde::Serialize;
use std::io;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Standard output, coloured unless `color` is false
pub fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn stage_label(stage: u8) -> String {
    match stage_name(stage) {
        Some(name) => format!("{stage} ({name})"),
        None => stage.to_string(),
    }
}

/// Print one page of search results with the matched prefix highlighted
pub fn print_search_page<W: WriteColor>(
    out: &mut W,
    key: &[u8],
    page: usize,
    entries: &[RecordSummary],
    title_width: usize,
    more: bool,
) -> io::Result<()> {
    if entries.is_empty() {
        if page == 0 {
            writeln!(out, "No methods match '{}'", display_title(key))?;
        } else {
            writeln!(out, "No page {}", page + 1)?;
        }
        return Ok(());
    }

    for entry in entries {
        print_result_line(out, key, entry, title_width)?;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    if more {
        writeln!(out, "-- page {} (more: --page {}) --", page + 1, page + 2)?;
    } else {
        writeln!(out, "-- page {} (last) --", page + 1)?;
    }
    out.reset()?;
    Ok(())
}

fn print_result_line<W: WriteColor>(
    out: &mut W,
    key: &[u8],
    entry: &RecordSummary,
    title_width: usize,
) -> io::Result<()> {
    // Offset, used by `ccml show`
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{:>8}", entry.offset)?;
    out.reset()?;
    write!(out, "  ")?;

    let (shown, count) = truncate_title(&entry.title, title_width, MAX_TITLE_LENGTH);
    let matched = matched_prefix_len(key, shown);

    if matched > 0 {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "{}", display_title(&shown[..matched]))?;
        out.reset()?;
    }
    write!(out, "{}", display_title(&shown[matched..]))?;
    if count.bytes < entry.title.len() {
        write!(out, "…")?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print the decoded fields of a method
pub fn print_method<W: WriteColor>(out: &mut W, method: &Method, offset: u64) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(out, "{}", method.display_title())?;
    out.reset()?;

    let hunt_bells: String = (0..method.stage)
        .filter(|&b| method.is_hunt_bell(b))
        .map(bell_char)
        .collect();

    print_field(out, "Offset", &offset.to_string())?;
    print_field(out, "Stage", &stage_label(method.stage))?;
    print_field(out, "Notation", &method.place_notation())?;
    print_field(out, "Lead length", &method.lead_length().to_string())?;
    print_field(out, "Lead head", &method.lead_head().to_string())?;
    print_field(out, "Leads", &method.lead_count.to_string())?;
    print_field(out, "Course", &format!("{} changes", method.plain_course_length()))?;
    let hunt_bells = if hunt_bells.is_empty() {
        "none"
    } else {
        hunt_bells.as_str()
    };
    print_field(out, "Hunt bells", hunt_bells)?;

    match method.verify() {
        Ok(()) => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            writeln!(out, "{:>12}  ok", "Check")?;
        }
        Err(fault) => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            writeln!(out, "{:>12}  {}", "Check", fault)?;
        }
    }
    out.reset()?;
    Ok(())
}

fn print_field<W: WriteColor>(out: &mut W, name: &str, value: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    write!(out, "{:>12}", name)?;
    out.reset()?;
    writeln!(out, "  {}", value)
}

/// Print the plain course row by row, hunt bells highlighted and lead
/// heads underlined
pub fn print_rows<W: WriteColor>(out: &mut W, method: &Method) -> io::Result<()> {
    let lead_length = method.lead_length().max(1);
    for (i, row) in method.plain_course().enumerate() {
        let lead_end = i % lead_length == 0;
        print_row(out, method, &row, lead_end)?;
    }
    Ok(())
}

fn print_row<W: WriteColor>(
    out: &mut W,
    method: &Method,
    row: &Row,
    lead_end: bool,
) -> io::Result<()> {
    for &bell in row.bells() {
        let mut spec = ColorSpec::new();
        if method.is_hunt_bell(bell) {
            spec.set_fg(Some(Color::Red)).set_bold(true);
        }
        spec.set_underline(lead_end);
        out.set_color(&spec)?;
        write!(out, "{}", bell_char(bell))?;
    }
    out.reset()?;
    writeln!(out)
}

/// JSON view of a decoded method
#[derive(Serialize)]
struct MethodView<'a> {
    offset: u64,
    title: String,
    stage: u8,
    stage_name: Option<&'static str>,
    place_notation: String,
    notation: &'a [u16],
    lead_length: usize,
    lead_count: u16,
    plain_course_length: usize,
    hunt_bells: u16,
    lead_head: String,
    fault: Option<String>,
}

/// Render a method as pretty JSON
pub fn method_json(method: &Method, offset: u64) -> serde_json::Result<String> {
    let view = MethodView {
        offset,
        title: method.display_title(),
        stage: method.stage,
        stage_name: stage_name(method.stage),
        place_notation: method.place_notation(),
        notation: &method.notation,
        lead_length: method.lead_length(),
        lead_count: method.lead_count,
        plain_course_length: method.plain_course_length(),
        hunt_bells: method.hunt_bells,
        lead_head: method.lead_head().to_string(),
        fault: method.verify().err().map(|f| f.to_string()),
    };
    serde_json::to_string_pretty(&view)
}

/// Print header details of a database file
pub fn print_file_info<W: WriteColor>(
    out: &mut W,
    path: &Path,
    header: &FileHeader,
    size: u64,
    records: usize,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(out, "{}", path.display())?;
    out.reset()?;
    print_field(out, "Stage", &stage_label(header.stage))?;
    print_field(out, "Depth", &header.pointer_depth.to_string())?;
    print_field(out, "Pointers", &header.pointer_slots().to_string())?;
    print_field(out, "Records at", &header.records_start().to_string())?;
    print_field(out, "Records", &records.to_string())?;
    print_field(out, "Size", &format!("{size} bytes"))?;
    Ok(())
}

/// Print check reports, one block per file
pub fn print_check_reports<W: WriteColor>(out: &mut W, reports: &[CheckReport]) -> io::Result<()> {
    for report in reports {
        let (color, status) = if report.is_clean() {
            (Color::Green, "ok")
        } else {
            (Color::Red, "FAILED")
        };
        out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(out, "{:<6}", status)?;
        out.reset()?;
        writeln!(
            out,
            " {} ({}, {} records)",
            report.path.display(),
            stage_label(report.stage),
            report.records
        )?;

        for problem in &report.problems {
            let what = match &problem.problem {
                Problem::Fault(fault) => fault.as_str(),
                Problem::OutOfOrder => "out of canonical order",
            };
            writeln!(out, "  {:>8}  {}: {}", problem.offset, problem.title, what)?;
        }
        if let Some(error) = &report.error {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            writeln!(out, "  {}", error)?;
            out.reset()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    fn text(buffer: Buffer) -> String {
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    fn summary(offset: u64, title: &str) -> RecordSummary {
        RecordSummary {
            offset,
            stage: 8,
            title: title.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_search_page() {
        let mut out = Buffer::no_color();
        let entries = [summary(124, "Cambridge"), summary(160, "Cambridge Surprise Major")];
        print_search_page(&mut out, b"camb", 0, &entries, 12, true).unwrap();
        let text = text(out);
        assert!(text.contains("     124  Cambridge\n"));
        assert!(text.contains("     160  Cambridge Su…\n"));
        assert!(text.contains("-- page 1 (more: --page 2) --"));
    }

    #[test]
    fn test_empty_page() {
        let mut out = Buffer::no_color();
        print_search_page(&mut out, b"zz", 0, &[], 22, false).unwrap();
        assert_eq!(text(out), "No methods match 'zz'\n");
    }

    #[test]
    fn test_method_json() {
        let method = Method {
            title: b"Plain Bob".to_vec(),
            stage: 4,
            notation: vec![0, 0b1001, 0, 0b1001, 0, 0b1001, 0, 0b11],
            lead_count: 3,
            hunt_bells: 0b1,
        };
        let json = method_json(&method, 200).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Plain Bob");
        assert_eq!(value["stage_name"], "Minimus");
        assert_eq!(value["place_notation"], "x14x14x14x12");
        assert_eq!(value["plain_course_length"], 24);
        assert_eq!(value["lead_head"], "1342");
        assert!(value["fault"].is_null());
    }

    #[test]
    fn test_rows() {
        let method = Method {
            title: b"Original".to_vec(),
            stage: 4,
            notation: vec![0, 0b1001],
            lead_count: 4,
            hunt_bells: 0,
        };
        let mut out = Buffer::no_color();
        print_rows(&mut out, &method).unwrap();
        let text = text(out);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0], "1234");
        assert_eq!(rows[1], "2143");
        assert_eq!(rows[2], "2413");
        assert_eq!(rows[8], "1234");
    }

    #[test]
    fn test_check_report() {
        let report = CheckReport {
            path: "methods-8.ccml".into(),
            stage: 8,
            records: 3,
            problems: vec![crate::check::RecordProblem {
                offset: 40,
                title: "Bad".to_string(),
                problem: Problem::OutOfOrder,
            }],
            error: None,
        };
        let mut out = Buffer::no_color();
        print_check_reports(&mut out, &[report]).unwrap();
        let text = text(out);
        assert!(text.starts_with("FAILED methods-8.ccml (8 (Major), 3 records)"));
        assert!(text.contains("      40  Bad: out of canonical order"));
    }
}
