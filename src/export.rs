use chrono::FixedOffset;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, XlsxError};

use crate::model::attendance::AttendanceRecord;
use crate::utils::time::{format_duration, to_display};

pub const HEADERS: [&str; 5] = ["name", "status", "in_time", "out_time", "duration"];

/// One spreadsheet row per record. Duration is filled only for a completed shift.
pub fn timesheet_row(rec: &AttendanceRecord, offset: FixedOffset) -> [String; 5] {
    [
        rec.name().to_string(),
        rec.status().to_string(),
        to_display(&rec.in_time(), offset),
        rec.out_time()
            .map(|t| to_display(&t, offset))
            .unwrap_or_default(),
        rec.shift_duration()
            .map(format_duration)
            .unwrap_or_default(),
    ]
}

/// Timesheet workbook, serialized in memory.
pub fn timesheet_xlsx(
    records: &[AttendanceRecord],
    offset: FixedOffset,
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Timesheet")?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new().set_border(FormatBorder::Thin);

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (i, rec) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in timesheet_row(rec, offset).iter().enumerate() {
            worksheet.write_with_format(row, col as u16, value.as_str(), &cell_format)?;
            widths[col] = widths[col].max(value.chars().count());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64 + 2.0)?;
    }

    workbook.save_to_buffer()
}
