use chrono::FixedOffset;
use std::fmt::Write;

use crate::model::attendance::AttendanceRecord;
use crate::utils::time::to_display;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

pub fn render_inactive(window: &str) -> String {
    page(
        "Attendance unavailable",
        &format!(
            "<h1>Service inactive</h1>\n<p>Clock in/out is available from {}.</p>",
            escape(window)
        ),
    )
}

/// Clock form and attendance table. Timestamps are shown in `offset`.
pub fn render_index(
    records: &[AttendanceRecord],
    flash: Option<&str>,
    offset: FixedOffset,
) -> String {
    let mut body = String::from("<h1>Attendance</h1>\n");

    if let Some(msg) = flash {
        let _ = writeln!(body, "<p class=\"flash\">{}</p>", escape(msg));
    }

    body.push_str(
        r#"<form method="post" action="/clock">
<input type="text" name="name" placeholder="Your name" required>
<input type="submit" name="action" value="Clock In">
<input type="submit" name="action" value="Clock Out">
</form>
<p><a href="/downloadTimeSheet">Download time sheet</a></p>
"#,
    );

    body.push_str(
        "<table>\n<tr><th>Name</th><th>Status</th><th>In Time</th><th>Out Time</th></tr>\n",
    );
    for rec in records {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(rec.name()),
            rec.status(),
            to_display(&rec.in_time(), offset),
            rec.out_time()
                .map(|t| to_display(&t, offset))
                .unwrap_or_default(),
        );
    }
    body.push_str("</table>");

    page("Attendance", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn escapes_names() {
        assert_eq!(escape("<b>Tom & \"Jerry\"</b>"), "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
    }

    #[test]
    fn index_lists_records_and_flash() {
        let ist = FixedOffset::east_opt(19_800).unwrap();
        let rec = AttendanceRecord::first_clock_in(
            "<Zed>",
            ist.with_ymd_and_hms(2024, 7, 1, 10, 5, 0).unwrap(),
        );
        let html = render_index(&[rec], Some("Zed has clocked in."), ist);
        assert!(html.contains("&lt;Zed&gt;"));
        assert!(html.contains("clocked_in"));
        assert!(html.contains("2024-07-01 10:05:00"));
        assert!(html.contains("Zed has clocked in."));
    }
}
