use cidrcheck::{CheckReport, Result};
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Save Coverage Report to CSV File
-------------------------------------------------------------------------------------------------*/

pub fn save(report: &CheckReport, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    // Write header
    writer.serialize(["Required CIDR", "Covered", "Covered By"])?;

    // Write coverage records
    for coverage in &report.coverage {
        let record = (
            coverage.required.to_string(),
            coverage.is_covered(),
            coverage
                .covered_by
                .map(|network| network.to_string())
                .unwrap_or_default(),
        );
        writer.serialize(record)?;
    }

    writer.flush()?;

    Ok(())
}
