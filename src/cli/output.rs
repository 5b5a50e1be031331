use cidrcheck::CheckReport;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::*;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Coverage Table
--------------------------------------------------------------------------------------*/

pub fn coverage_table(report: &CheckReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Required CIDR")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
        Cell::new("Covered By")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
    ]);

    for coverage in &report.coverage {
        let covered_by = match coverage.covered_by {
            Some(network) => Cell::new(network),
            None => Cell::new("MISSING")
                .add_attribute(Attribute::Bold)
                .fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(coverage.required).add_attribute(Attribute::Bold),
            covered_by,
        ]);
    }

    // Right-align the Required CIDR column
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    println!("{table}");

    // Print coverage summary
    let mut summary_table = Table::new();
    summary_table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);

    summary_table.add_row(vec![
        Cell::new(report.required.len()),
        Cell::new("Required CIDRs"),
    ]);
    summary_table.add_row(vec![
        Cell::new(report.allowlist.len()),
        Cell::new("Allowlisted CIDRs"),
    ]);
    summary_table.add_row(vec![
        Cell::new(report.missing.len()),
        Cell::new("Missing CIDRs"),
    ]);

    if let Some(column) = summary_table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    println!("{summary_table}");
}

/*--------------------------------------------------------------------------------------
  Missing Prefixes In CIDR Format
--------------------------------------------------------------------------------------*/

pub fn missing_in_cidr_format(report: &CheckReport) {
    for cidr in &report.missing {
        println!("{cidr}");
    }
}
