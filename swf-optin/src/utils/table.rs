//! Table formatting utilities

use prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE;
use prettytable::{Cell, Row, Table};
use swf_tags::inspect::RecordSummary;
use swf_tags::{LengthForm, TagCode};

use super::format::{format_bytes, format_offset};

const RECORD_HEADERS: [&str; 6] = ["#", "Offset", "Code", "Tag", "Length", "Header"];

/// Build the record listing shown by `info`
pub fn record_table(records: &[RecordSummary]) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        RECORD_HEADERS
            .iter()
            .map(|h| Cell::new(h).style_spec("b"))
            .collect(),
    ));

    for record in records {
        let name = match record.code {
            TagCode::Other(_) => Cell::new("-"),
            TagCode::EnableTelemetry | TagCode::SignedSwf => {
                Cell::new(record.code.name()).style_spec("Fy")
            }
            known => Cell::new(known.name()),
        };
        let form = match record.form {
            LengthForm::Short => "short",
            LengthForm::Long => "long",
        };

        table.add_row(Row::new(vec![
            Cell::new(&record.index.to_string()),
            Cell::new(&format_offset(record.offset)),
            Cell::new(&record.code.raw().to_string()),
            name,
            Cell::new(&format_bytes(u64::from(record.length))),
            Cell::new(form),
        ]));
    }

    table
}
