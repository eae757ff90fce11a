use chrono::NaiveDate;

/// Append the round-2 enhancement section to an existing README.
///
/// The previous text is kept byte for byte; the section follows it.
pub fn append_enhancement(previous: &str, brief: &str, date: NaiveDate) -> String {
    format!(
        "{previous}
---
## Round 2 Enhancement
**Updated:** {date}
### New Feature
{brief}
### Implementation
- Updated with new functionality
- All Round 1 features remain intact
",
        date = date.format("%Y-%m-%d"),
    )
}
