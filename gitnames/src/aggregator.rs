use crate::api::{Error, LanguageBytes, LanguageProportion, RepositorySummary, UserProfile, YearBuckets, OTHERS};
use chrono::{DateTime, Datelike};

/// Everything reported for one user, derived from a single aggregation pass.
#[derive(Debug)]
pub struct UserStats {
    pub profile: UserProfile,
    pub repo_count: usize,
    pub total_forks: u64,
    pub languages: LanguageProportion,
    pub created: YearBuckets,
    pub updated: YearBuckets,
    pub activity: YearBuckets,
    /// Timestamps excluded from the year distributions.
    pub warnings: Vec<Error>,
}

/// Aggregates a user's repositories and their per-repository language maps.
///
/// # Arguments
/// * `profile` - Profile of the user owning `repositories`
/// * `repositories` - Repositories of the user
/// * `languages` - Language maps of `repositories`, merged before ranking
/// * `top_n` - Maximal number of individually named languages
pub fn aggregate(
    profile: UserProfile,
    repositories: &[RepositorySummary],
    languages: &[LanguageBytes],
    top_n: usize,
) -> UserStats {
    let (created, mut warnings) = year_distribution(repositories.iter().map(|repo| repo.created_at.as_str()));
    let (updated, update_warnings) = year_distribution(repositories.iter().map(|repo| repo.updated_at.as_str()));
    warnings.extend(update_warnings);
    let activity = activity_distribution(&created, &updated);
    UserStats {
        profile,
        repo_count: repositories.len(),
        total_forks: total_forks(repositories),
        languages: language_proportion(&merge_language_bytes(languages), top_n),
        created,
        updated,
        activity,
        warnings,
    }
}

/// Ranks languages by byte count (desc, ties by name asc) and returns percentages of the
/// first `top_n` of them, with the remaining bytes reported as [`OTHERS`].
///
/// [`OTHERS`] is always present, so percentages sum up to 100. When no bytes are reported at
/// all the result is a single [`OTHERS`] entry of 0%.
pub fn language_proportion(bytes: &LanguageBytes, top_n: usize) -> LanguageProportion {
    let mut proportion = LanguageProportion::new();
    let total = saturating_total(bytes.values());
    if total == 0 {
        proportion.insert(OTHERS.to_string(), 0.0);
        return proportion;
    }

    let mut ranked: Vec<(&String, u64)> = bytes.iter().map(|(lang, bytes)| (lang, *bytes)).collect();
    ranked.sort_by(|(a_lang, a_bytes), (b_lang, b_bytes)| b_bytes.cmp(a_bytes).then_with(|| a_lang.cmp(b_lang)));
    let top = &ranked[..top_n.min(ranked.len())];

    let top_total = saturating_total(top.iter().map(|(_, bytes)| bytes));
    // `entry` keeps the sum intact if a language is literally called "Others"
    for (lang, bytes) in top {
        *proportion.entry(lang.to_string()).or_insert(0.0) += percentage(*bytes, total);
    }
    *proportion.entry(OTHERS.to_string()).or_insert(0.0) += percentage(total.saturating_sub(top_total), total);
    proportion
}

fn saturating_total<'a>(bytes: impl Iterator<Item = &'a u64>) -> u64 {
    bytes.fold(0, |total, bytes| total.saturating_add(*bytes))
}

fn percentage(bytes: u64, total: u64) -> f64 {
    bytes as f64 / total as f64 * 100.0
}

pub fn merge_language_bytes<'a, I>(maps: I) -> LanguageBytes
where
    I: IntoIterator<Item = &'a LanguageBytes>,
{
    maps.into_iter().flatten().fold(LanguageBytes::new(), |mut merged, (lang, bytes)| {
        let merged_bytes = merged.entry(lang.clone()).or_insert(0);
        *merged_bytes = merged_bytes.saturating_add(*bytes);
        merged
    })
}

/// Repositories whose language map reports no bytes, as [`Error::DegenerateInput`].
pub fn degenerate_repositories(repositories: &[RepositorySummary], languages: &[LanguageBytes]) -> Vec<Error> {
    repositories
        .iter()
        .zip(languages)
        .filter(|(_, bytes)| bytes.values().all(|count| *count == 0))
        .map(|(repo, _)| Error::DegenerateInput(repo.name.clone()))
        .collect()
}

/// Counts RFC 3339 timestamps per calendar year.
///
/// Malformed timestamps are skipped and returned as [`Error::MalformedTimestamp`].
pub fn year_distribution<'a, I>(timestamps: I) -> (YearBuckets, Vec<Error>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut buckets = YearBuckets::new();
    let mut malformed = Vec::new();
    for timestamp in timestamps {
        match DateTime::parse_from_rfc3339(timestamp) {
            Ok(date) => *buckets.entry(date.year()).or_insert(0) += 1,
            Err(err) => malformed.push(Error::MalformedTimestamp {
                timestamp: timestamp.to_string(),
                reason: err.to_string(),
            }),
        }
    }
    (buckets, malformed)
}

/// Sums creation and update buckets over the union of their years.
pub fn activity_distribution(created: &YearBuckets, updated: &YearBuckets) -> YearBuckets {
    created.iter().chain(updated).fold(YearBuckets::new(), |mut activity, (year, count)| {
        *activity.entry(*year).or_insert(0) += count;
        activity
    })
}

pub fn total_forks(repositories: &[RepositorySummary]) -> u64 {
    repositories.iter().map(|repo| repo.forks as u64).sum()
}

/// Tests

#[cfg(test)]
use rand::seq::SliceRandom;

#[cfg(test)]
fn language_bytes(entries: &[(&str, u64)]) -> LanguageBytes {
    entries.iter().map(|(lang, bytes)| (lang.to_string(), *bytes)).collect()
}

#[cfg(test)]
fn assert_close(actual: Option<&f64>, expected: f64) {
    let actual = actual.copied().unwrap_or(f64::NAN);
    assert!((actual - expected).abs() < 1e-6, "expected {} but got {}", expected, actual);
}

#[test]
fn language_proportion_top_two_test() {
    let bytes = language_bytes(&[("Go", 300), ("Python", 100), ("C", 100)]);
    let proportion = language_proportion(&bytes, 2);
    assert_eq!(proportion.len(), 3);
    assert_close(proportion.get("Go"), 60.0);
    // "C" and "Python" tie, name order picks "C"
    assert_close(proportion.get("C"), 20.0);
    assert_close(proportion.get(OTHERS), 20.0);
}

#[test]
fn language_proportion_tie_break_test() {
    let bytes = language_bytes(&[("B", 50), ("A", 50)]);
    for _ in 0..20 {
        let proportion = language_proportion(&bytes, 1);
        assert_eq!(proportion.keys().collect::<Vec<_>>(), vec!["A", OTHERS]);
        assert_close(proportion.get("A"), 50.0);
    }
}

#[test]
fn language_proportion_sums_to_hundred_test() {
    let bytes = language_bytes(&[
        ("Rust", 7_331),
        ("Shell", 13),
        ("Dockerfile", 977),
        ("Makefile", 1),
        ("HTML", 12_345_678),
        ("Python", 3),
    ]);
    for top_n in 0..8 {
        let proportion = language_proportion(&bytes, top_n);
        let sum: f64 = proportion.values().sum();
        assert!((sum - 100.0).abs() < 1e-6, "top {} sums to {}", top_n, sum);
        assert_eq!(proportion.len(), top_n.min(bytes.len()) + 1);
    }
}

#[test]
fn language_proportion_order_independent_test() {
    let mut entries = vec![("Go", 10), ("Rust", 10), ("C", 30), ("Zig", 5), ("Java", 10)];
    let expected = language_proportion(&language_bytes(&entries), 3);
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        entries.shuffle(&mut rng);
        assert_eq!(language_proportion(&language_bytes(&entries), 3), expected);
    }
    assert_eq!(expected.keys().collect::<Vec<_>>(), vec!["C", "Go", "Java", OTHERS]);
}

#[test]
fn language_proportion_zero_total_test() {
    let empty = LanguageBytes::new();
    let proportion = language_proportion(&empty, 4);
    assert_eq!(proportion.len(), 1);
    assert_eq!(proportion.get(OTHERS), Some(&0.0));

    let zeros = language_bytes(&[("Rust", 0), ("C", 0)]);
    let proportion = language_proportion(&zeros, 4);
    assert!(proportion.values().all(|percentage| *percentage == 0.0));
}

#[test]
fn language_proportion_literal_others_test() {
    let bytes = language_bytes(&[("Others", 10), ("Rust", 60), ("C", 30)]);
    let proportion = language_proportion(&bytes, 2);
    assert_close(proportion.get(OTHERS), 10.0);
    let sum: f64 = proportion.values().sum();
    assert!((sum - 100.0).abs() < 1e-6);
}

#[test]
fn language_proportion_huge_counts_test() {
    let bytes = language_bytes(&[("A", u64::MAX), ("B", u64::MAX), ("C", 10)]);
    let proportion = language_proportion(&bytes, 1);
    assert_close(proportion.get("A"), 100.0);
    assert_close(proportion.get(OTHERS), 0.0);

    let merged = merge_language_bytes(&[language_bytes(&[("A", u64::MAX)]), language_bytes(&[("A", 1)])]);
    assert_eq!(merged.get("A"), Some(&u64::MAX));
}

#[test]
fn degenerate_repositories_test() {
    let repositories = vec![
        RepositorySummary::new("full".to_string(), None, 0, String::new(), String::new()),
        RepositorySummary::new("empty".to_string(), None, 0, String::new(), String::new()),
        RepositorySummary::new("zeros".to_string(), None, 0, String::new(), String::new()),
    ];
    let languages = vec![
        language_bytes(&[("Rust", 10)]),
        LanguageBytes::new(),
        language_bytes(&[("C", 0)]),
    ];
    let degenerate = degenerate_repositories(&repositories, &languages);
    let names: Vec<_> = degenerate
        .iter()
        .map(|err| match err {
            Error::DegenerateInput(name) => name.as_str(),
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(names, vec!["empty", "zeros"]);
}

#[test]
fn merge_language_bytes_test() {
    let maps = vec![
        language_bytes(&[("Rust", 10), ("C", 1)]),
        LanguageBytes::new(),
        language_bytes(&[("Rust", 5), ("Go", 2)]),
    ];
    let merged = merge_language_bytes(&maps);
    assert_eq!(merged, language_bytes(&[("Rust", 15), ("C", 1), ("Go", 2)]));
}

#[test]
fn year_distribution_test() {
    let (buckets, malformed) =
        year_distribution(vec!["2020-01-01T00:00:00Z", "2020-06-01T00:00:00Z", "2021-01-01T00:00:00Z"]);
    assert_eq!(buckets, YearBuckets::from([(2020, 2), (2021, 1)]));
    assert!(malformed.is_empty());
}

#[test]
fn year_distribution_skips_malformed_test() {
    let (buckets, malformed) = year_distribution(vec!["2019-03-04T05:06:07Z", "yesterday", "", "2019-12-31T23:59:59+01:00"]);
    assert_eq!(buckets, YearBuckets::from([(2019, 2)]));
    assert_eq!(malformed.len(), 2);
    assert!(matches!(&malformed[0], Error::MalformedTimestamp { timestamp, .. } if timestamp == "yesterday"));
}

#[test]
fn activity_distribution_test() {
    let created = YearBuckets::from([(2018, 1), (2020, 2)]);
    let updated = YearBuckets::from([(2020, 1), (2022, 4)]);
    let activity = activity_distribution(&created, &updated);
    assert_eq!(activity, YearBuckets::from([(2018, 1), (2020, 3), (2022, 4)]));
    assert_eq!(activity_distribution(&updated, &created), activity);
    assert_eq!(activity_distribution(&YearBuckets::new(), &YearBuckets::new()), YearBuckets::new());
}

#[test]
fn aggregate_test() {
    let repositories = vec![
        RepositorySummary::new(
            "a".to_string(),
            Some("Rust".to_string()),
            3,
            "2019-01-01T00:00:00Z".to_string(),
            "2021-01-01T00:00:00Z".to_string(),
        ),
        RepositorySummary::new(
            "b".to_string(),
            None,
            4,
            "2021-05-05T00:00:00Z".to_string(),
            "not a date".to_string(),
        ),
    ];
    let languages = vec![language_bytes(&[("Rust", 75)]), language_bytes(&[("C", 25)])];
    let stats = aggregate(UserProfile::default(), &repositories, &languages, 4);

    assert_eq!(stats.repo_count, 2);
    assert_eq!(stats.total_forks, 7);
    assert_close(stats.languages.get("Rust"), 75.0);
    assert_close(stats.languages.get("C"), 25.0);
    assert_close(stats.languages.get(OTHERS), 0.0);
    assert_eq!(stats.created, YearBuckets::from([(2019, 1), (2021, 1)]));
    assert_eq!(stats.updated, YearBuckets::from([(2021, 1)]));
    assert_eq!(stats.activity, YearBuckets::from([(2019, 1), (2021, 2)]));
    assert_eq!(stats.warnings.len(), 1);
}
