//! Roster aggregation.
//!
//! This module provides the two pure aggregation functions that turn the
//! loaded member records into the activity-frequency distribution and the
//! ranked city distribution, plus the shared percentage formatting.

use crate::models::{CityEntry, FrequencyBucket, FrequencyEntry, Record, FIELD_CITY, FIELD_VISITS};
use indexmap::IndexMap;

/// Aggregate members into the four fixed activity-frequency buckets.
///
/// Every bucket appears in the output in catalog order, even with zero
/// occupants. An empty roster yields an empty distribution.
pub fn aggregate_frequency(records: &[Record]) -> Vec<FrequencyEntry> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut counts: IndexMap<FrequencyBucket, usize> = FrequencyBucket::CATALOG
        .iter()
        .map(|bucket| (*bucket, 0))
        .collect();

    for record in records {
        let bucket = FrequencyBucket::classify(parse_visits(record));
        *counts.entry(bucket).or_insert(0) += 1;
    }

    let total = records.len();
    FrequencyBucket::CATALOG
        .iter()
        .map(|bucket| {
            let count = counts[bucket];
            FrequencyEntry {
                label: bucket.label().to_string(),
                count,
                percentage: format_percentage(count, total),
            }
        })
        .collect()
}

/// Aggregate members by normalized city, ranked descending by count.
///
/// Records whose normalized city is empty are excluded from the output
/// but still count toward the percentage denominator, so the listed
/// percentages may sum to less than 100. Ties keep first-seen order.
pub fn aggregate_city(records: &[Record]) -> Vec<CityEntry> {
    if records.is_empty() {
        return Vec::new();
    }

    let total = records.len();
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for record in records {
        let city = normalize_city(record.get(FIELD_CITY));
        if city.is_empty() {
            continue;
        }
        *counts.entry(city.to_string()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable sort: equal counts keep their insertion order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .map(|(city, count)| CityEntry {
            city,
            count,
            percentage: format_percentage(count, total),
        })
        .collect()
}

/// Normalize a raw city value.
///
/// Keeps the portion before the first `(`, trims, then keeps the portion
/// before the first `/`. The slash split deliberately comes after the
/// trim with no second trim; changing that order changes behavior for
/// names with a space before the slash.
pub fn normalize_city(raw: &str) -> &str {
    raw.split('(')
        .next()
        .unwrap_or("")
        .trim()
        .split('/')
        .next()
        .unwrap_or("")
}

/// Format a count as a share of the total, to exactly one decimal.
///
/// Callers guarantee `total > 0`; both distributions use the full record
/// count as the denominator. Ties round toward the larger value, so
/// 6.25 renders as "6.3" rather than the "6.2" that `{:.1}` alone
/// would produce.
pub fn format_percentage(count: usize, total: usize) -> String {
    let share = count as f64 / total as f64 * 100.0;
    format!("{:.1}", (share * 10.0).round() / 10.0)
}

/// Read the monthly-visit count from a record.
///
/// Missing or unparseable values default to 0; malformed input is never
/// an error here.
fn parse_visits(record: &Record) -> f64 {
    record.get(FIELD_VISITS).trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(city: &str, visits: &str) -> Record {
        [
            ("Name", "Test Member"),
            ("City", city),
            ("Visits per month", visits),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_frequency_counts_sum_to_total() {
        let records = vec![
            member("Springfield", "12"),
            member("Shelbyville", "5"),
            member("Ogdenville", "3"),
            member("Springfield", "1"),
            member("", ""),
        ];

        let distribution = aggregate_frequency(&records);
        let sum: usize = distribution.iter().map(|e| e.count).sum();
        assert_eq!(sum, records.len());
    }

    #[test]
    fn test_frequency_always_four_entries_in_catalog_order() {
        let records = vec![member("Springfield", "10")];
        let distribution = aggregate_frequency(&records);

        assert_eq!(distribution.len(), 4);
        assert_eq!(distribution[0].label, "Very Active (>8x/month)");
        assert_eq!(distribution[1].label, "Active (4-8x/month)");
        assert_eq!(distribution[2].label, "Regular (2-4x/month)");
        assert_eq!(distribution[3].label, "Occasional (1-2x/month)");

        assert_eq!(distribution[0].count, 1);
        assert_eq!(distribution[1].count, 0);
        assert_eq!(distribution[2].count, 0);
        assert_eq!(distribution[3].count, 0);
    }

    #[test]
    fn test_frequency_bucket_boundaries() {
        let records = vec![
            member("", "8"),   // Active, not VeryActive
            member("", "4"),   // Active
            member("", "2"),   // Regular
            member("", "1.9"), // Occasional
        ];

        let distribution = aggregate_frequency(&records);
        assert_eq!(distribution[0].count, 0); // VeryActive
        assert_eq!(distribution[1].count, 2); // Active
        assert_eq!(distribution[2].count, 1); // Regular
        assert_eq!(distribution[3].count, 1); // Occasional
    }

    #[test]
    fn test_frequency_malformed_visits_default_to_occasional() {
        let records = vec![member("Springfield", "lots"), member("Springfield", "")];
        let distribution = aggregate_frequency(&records);
        assert_eq!(distribution[3].count, 2);
    }

    #[test]
    fn test_frequency_missing_visits_column() {
        let record: Record = [("Name", "Lisa"), ("City", "Springfield")]
            .into_iter()
            .collect();
        let distribution = aggregate_frequency(&[record]);
        assert_eq!(distribution[3].count, 1);
    }

    #[test]
    fn test_frequency_even_split_percentages() {
        let records = vec![
            member("", "9"),
            member("", "5"),
            member("", "3"),
            member("", "1"),
        ];

        let distribution = aggregate_frequency(&records);
        for entry in &distribution {
            assert_eq!(entry.percentage, "25.0");
        }
    }

    #[test]
    fn test_frequency_empty_roster() {
        assert!(aggregate_frequency(&[]).is_empty());
    }

    #[test]
    fn test_normalize_city_rules() {
        assert_eq!(normalize_city("Springfield (North Side)"), "Springfield");
        assert_eq!(normalize_city("Springfield/Shelbyville"), "Springfield");
        assert_eq!(normalize_city("  Capital City  "), "Capital City");
        assert_eq!(normalize_city(""), "");
    }

    #[test]
    fn test_normalize_city_step_order_is_literal() {
        // Trim happens between the paren split and the slash split, so a
        // space before the slash survives.
        assert_eq!(normalize_city("Springfield /Shelbyville"), "Springfield ");
        // The paren split runs first, so a slash inside the annotation is
        // cut away with it.
        assert_eq!(normalize_city(" Springfield (west/north) "), "Springfield");
    }

    #[test]
    fn test_city_ranking_descending_with_stable_ties() {
        let records = vec![
            member("Ogdenville", "1"),
            member("Springfield", "1"),
            member("Shelbyville", "1"),
            member("Springfield", "1"),
            member("Shelbyville", "1"),
        ];

        let cities = aggregate_city(&records);
        let names: Vec<_> = cities.iter().map(|c| c.city.as_str()).collect();
        // Springfield and Shelbyville tie at 2; they keep first-seen order.
        assert_eq!(names, vec!["Springfield", "Shelbyville", "Ogdenville"]);
        assert_eq!(cities[0].count, 2);
        assert_eq!(cities[1].count, 2);
        assert_eq!(cities[2].count, 1);
    }

    #[test]
    fn test_city_empty_values_excluded_but_counted_in_denominator() {
        let records = vec![
            member("Springfield", "1"),
            member("", "1"),
            member("   ", "1"),
            member("(annotation only)", "1"),
        ];

        let cities = aggregate_city(&records);
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].city, "Springfield");
        assert_eq!(cities[0].count, 1);
        // 1 of 4 total records, not 1 of 1 listed.
        assert_eq!(cities[0].percentage, "25.0");
    }

    #[test]
    fn test_city_missing_column() {
        let record: Record = [("Name", "Lisa")].into_iter().collect();
        assert!(aggregate_city(&[record]).is_empty());
    }

    #[test]
    fn test_city_empty_roster() {
        assert!(aggregate_city(&[]).is_empty());
    }

    #[test]
    fn test_aggregators_are_idempotent() {
        let records = vec![
            member("Springfield (east)", "9"),
            member("Shelbyville/Ogdenville", "2"),
            member("", "bad"),
        ];

        assert_eq!(aggregate_frequency(&records), aggregate_frequency(&records));
        assert_eq!(aggregate_city(&records), aggregate_city(&records));
    }

    #[test]
    fn test_format_percentage_one_decimal() {
        assert_eq!(format_percentage(1, 4), "25.0");
        assert_eq!(format_percentage(1, 3), "33.3");
        assert_eq!(format_percentage(2, 3), "66.7");
        assert_eq!(format_percentage(4, 17), "23.5");
        assert_eq!(format_percentage(0, 5), "0.0");
        assert_eq!(format_percentage(5, 5), "100.0");
    }

    #[test]
    fn test_format_percentage_rounds_ties_up() {
        // Power-of-two totals produce exact .x5 shares; those round to
        // the larger value, not to even.
        assert_eq!(format_percentage(1, 16), "6.3");
        assert_eq!(format_percentage(5, 16), "31.3");
        assert_eq!(format_percentage(1, 8), "12.5");
        assert_eq!(format_percentage(3, 16), "18.8");
    }
}
