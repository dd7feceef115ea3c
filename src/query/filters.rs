//! Year filter options for the filter selector.

use chrono::Datelike;

use crate::models::FilterOption;

/// Build the filter options for `current_year`
///
/// Produces "All years", "This year" and one "Last N years" entry per value
/// in `recent_years` (values below 2 are skipped, "This year" covers them).
/// Expressions use the backend's filter syntax and are never interpreted
/// client-side.
pub fn filter_options(current_year: i32, recent_years: &[u32]) -> Vec<FilterOption> {
    let mut options = vec![
        FilterOption::new("All years", ""),
        FilterOption::new("This year", format!("year == {}", current_year)),
    ];

    for &n in recent_years.iter().filter(|&&n| n >= 2) {
        let since = current_year - (n as i32 - 1);
        options.push(FilterOption::new(
            format!("Last {} years", n),
            format!("year >= {}", since),
        ));
    }

    options
}

/// Build the filter options for the current calendar year
pub fn current_filter_options(recent_years: &[u32]) -> Vec<FilterOption> {
    filter_options(chrono::Local::now().year(), recent_years)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_options() {
        let options = filter_options(2025, &[2, 5]);
        let pairs: Vec<(&str, &str)> = options
            .iter()
            .map(|o| (o.label.as_str(), o.expression.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("All years", ""),
                ("This year", "year == 2025"),
                ("Last 2 years", "year >= 2024"),
                ("Last 5 years", "year >= 2021"),
            ]
        );
    }

    #[test]
    fn test_degenerate_windows_skipped() {
        let options = filter_options(2025, &[0, 1]);
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_current_year_used() {
        let options = current_filter_options(&[]);
        let year = chrono::Local::now().year();
        assert_eq!(options[1].expression, format!("year == {}", year));
    }
}
