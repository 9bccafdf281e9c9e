//! Plain-text rendering of a summary, used by the headless report.

use super::calculator::{DashboardSummary, GroupTotal};
use crate::data::normalize::format_number;
use std::fmt::{self, Display, Formatter};

const NO_DATA: &str = "  (no data for the selected filters)";

fn write_section<K: Display>(
    f: &mut Formatter<'_>,
    title: &str,
    groups: &[GroupTotal<K>],
) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}", title)?;
    if groups.is_empty() {
        return writeln!(f, "{}", NO_DATA);
    }
    for group in groups {
        writeln!(f, "  {:<32} {:>10}", group.key.to_string(), format_number(group.total))?;
    }
    Ok(())
}

impl Display for DashboardSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let m = &self.metrics;
        writeln!(f, "Fatality Records:        {}", m.record_count)?;
        writeln!(f, "Sum of Years:            {}", m.year_sum)?;
        writeln!(f, "Total Fatalities (Air):  {}", m.fatalities_sum)?;
        writeln!(f, "Unique Aircraft:         {}", m.unique_aircraft)?;

        let years: Vec<GroupTotal<String>> = self
            .top_years
            .iter()
            .map(|g| GroupTotal::new(format_number(g.key), g.total))
            .collect();
        write_section(f, "Top Years With Highest Fatalities", &years)?;
        write_section(f, "Top Countries by Fatalities", &self.top_countries)?;
        write_section(f, "Monthly Distribution of Fatalities", &self.monthly)?;
        write_section(
            f,
            "Top Aircraft Manufacturers by Fatalities",
            &self.top_manufacturers,
        )?;
        write_section(f, "Air Crashes by Decade/Period", &self.decades)
    }
}
