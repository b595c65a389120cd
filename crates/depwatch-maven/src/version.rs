//! Maven version ordering.
//!
//! Maven versions are not semver: `1.0` equals `1`, `1.0-SNAPSHOT` sorts
//! below `1.0`, `1.0-sp1` above it, and a number always beats a qualifier
//! in the same position.
//!
//! A version is split into items on `.` and on every digit/letter
//! transition. A `-`, or a transition between digits and letters, opens a
//! nested list holding the rest of the version, so `1-1` sorts below
//! `1.1`. Every list drops its trailing zero and release items, skipping
//! over nested lists, which makes `1.0.0-alpha` equal to `1-alpha`.
//!
//! Qualifier order:
//! `alpha` (`a1`) < `beta` (`b1`) < `milestone` (`m1`) < `rc` = `cr` < `snapshot`
//! < release (`""`, `ga`, `final`, `release`) < `sp` < anything else
//! (compared lexically).

use depwatch_core::VersionRanker;
use std::cmp::Ordering;
use std::fmt;

/// Qualifiers that mark a version as not yet released.
const UNSTABLE_QUALIFIERS: &[&str] = &["ea", "preview", "dev"];

const RELEASE_RANK: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Decimal digits without leading zeros (`"0"` for zero).
    Number(String),
    Qualifier(String),
    List(Vec<Item>),
}

impl Item {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Self::Number(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    }

    /// `a`, `b` and `m` are only shorthand when a number follows (`a1`).
    fn qualifier(text: &str, followed_by_digit: bool) -> Self {
        let canonical = match text {
            "a" if followed_by_digit => "alpha",
            "b" if followed_by_digit => "beta",
            "m" if followed_by_digit => "milestone",
            "cr" => "rc",
            "ga" | "final" | "release" => "",
            other => other,
        };
        Self::Qualifier(canonical.to_string())
    }

    fn is_null(&self) -> bool {
        match self {
            Self::Number(n) => n == "0",
            Self::Qualifier(q) => q.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

fn qualifier_rank(qualifier: &str) -> u8 {
    match qualifier {
        "alpha" => 0,
        "beta" => 1,
        "milestone" => 2,
        "rc" => 3,
        "snapshot" => 4,
        "" => RELEASE_RANK,
        "sp" => 6,
        _ => 7,
    }
}

fn compare_qualifiers(a: &str, b: &str) -> Ordering {
    qualifier_rank(a)
        .cmp(&qualifier_rank(b))
        .then_with(|| a.cmp(b))
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compares two items; `None` is a missing item past the end of a list.
fn compare_items(a: Option<&Item>, b: Option<&Item>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => compare_items(b, a).reverse(),
        (Some(Item::Number(x)), None) => compare_numbers(x, "0"),
        (Some(Item::Qualifier(x)), None) => compare_qualifiers(x, ""),
        (Some(Item::List(items)), None) => items
            .iter()
            .map(|item| compare_items(Some(item), None))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal),
        (Some(Item::Number(x)), Some(Item::Number(y))) => compare_numbers(x, y),
        (Some(Item::Qualifier(x)), Some(Item::Qualifier(y))) => compare_qualifiers(x, y),
        (Some(Item::List(x)), Some(Item::List(y))) => compare_lists(x, y),
        // number > list > qualifier
        (Some(Item::Number(_)), Some(_)) | (Some(Item::List(_)), Some(Item::Qualifier(_))) => {
            Ordering::Greater
        }
        (Some(Item::Qualifier(_)), Some(_)) | (Some(Item::List(_)), Some(Item::Number(_))) => {
            Ordering::Less
        }
    }
}

fn compare_lists(a: &[Item], b: &[Item]) -> Ordering {
    (0..a.len().max(b.len()))
        .map(|i| compare_items(a.get(i), b.get(i)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Drops trailing null items, looking past nested lists.
fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

/// A parsed Maven version string.
///
/// Equality follows Maven ordering, so `1.0` and `1` are equal even though
/// [`as_str`](Self::as_str) differs.
///
/// # Examples
///
/// ```
/// use depwatch_maven::MavenVersion;
///
/// let snapshot = MavenVersion::parse("2.0-SNAPSHOT");
/// let release = MavenVersion::parse("2.0");
///
/// assert!(snapshot < release);
/// assert!(!snapshot.is_stable());
/// assert_eq!(MavenVersion::parse("1.0"), MavenVersion::parse("1"));
/// assert!(MavenVersion::parse("1-1") < MavenVersion::parse("1.1"));
/// ```
#[derive(Debug, Clone)]
pub struct MavenVersion {
    raw: String,
    items: Vec<Item>,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        let raw = version.trim().to_string();
        let items = parse_items(&raw.to_lowercase());
        Self { raw, items }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `false` for pre-releases and snapshots.
    pub fn is_stable(&self) -> bool {
        released(&self.items)
    }
}

fn released(items: &[Item]) -> bool {
    items.iter().all(|item| match item {
        Item::Number(_) => true,
        Item::Qualifier(q) => {
            qualifier_rank(q) >= RELEASE_RANK && !UNSTABLE_QUALIFIERS.contains(&q.as_str())
        }
        Item::List(inner) => released(inner),
    })
}

fn parse_items(version: &str) -> Vec<Item> {
    // `current` is the innermost open list; `parents` hold the lists around it
    let mut parents: Vec<Vec<Item>> = Vec::new();
    let mut current: Vec<Item> = Vec::new();
    let mut start = 0;
    let mut digits = false;

    let item = |text: &str, digits: bool, followed_by_digit: bool| {
        if digits {
            Item::number(text)
        } else {
            Item::qualifier(text, followed_by_digit)
        }
    };

    for (i, c) in version.char_indices() {
        match c {
            '.' | '-' => {
                if i == start {
                    // "1..2" or a leading separator count as zero
                    current.push(Item::number("0"));
                } else {
                    current.push(item(&version[start..i], digits, false));
                }
                start = i + 1;
                if c == '-' {
                    parents.push(std::mem::take(&mut current));
                }
            }
            c if c.is_ascii_digit() => {
                if !digits && i > start {
                    current.push(item(&version[start..i], false, true));
                    parents.push(std::mem::take(&mut current));
                    start = i;
                }
                digits = true;
            }
            _ => {
                if digits && i > start {
                    current.push(item(&version[start..i], true, false));
                    parents.push(std::mem::take(&mut current));
                    start = i;
                }
                digits = false;
            }
        }
    }
    if version.len() > start {
        current.push(item(&version[start..], digits, false));
    }

    normalize(&mut current);
    while let Some(mut parent) = parents.pop() {
        parent.push(Item::List(current));
        normalize(&mut parent);
        current = parent;
    }
    current
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Ranks version lists with Maven ordering.
///
/// # Examples
///
/// ```
/// use depwatch_core::VersionRanker;
/// use depwatch_maven::MavenVersionRanker;
///
/// let versions = vec!["1.0".to_string(), "1.1".to_string(), "2.0-SNAPSHOT".to_string()];
///
/// assert_eq!(MavenVersionRanker.latest(&versions).as_deref(), Some("2.0-SNAPSHOT"));
/// assert_eq!(MavenVersionRanker.stable(&versions).as_deref(), Some("1.1"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MavenVersionRanker;

impl MavenVersionRanker {
    fn max_by<F>(versions: &[String], keep: F) -> Option<String>
    where
        F: Fn(&MavenVersion) -> bool,
    {
        versions
            .iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| MavenVersion::parse(v))
            .filter(|v| keep(v))
            .max()
            .map(|v| v.raw)
    }
}

impl VersionRanker for MavenVersionRanker {
    fn latest(&self, versions: &[String]) -> Option<String> {
        Self::max_by(versions, |_| true)
    }

    fn stable(&self, versions: &[String]) -> Option<String> {
        Self::max_by(versions, MavenVersion::is_stable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> MavenVersion {
        MavenVersion::parse(s)
    }

    fn strings(versions: &[&str]) -> Vec<String> {
        versions.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_trailing_zeros_are_equal() {
        assert_eq!(v("1"), v("1.0"));
        assert_eq!(v("1.0.0"), v("1"));
        assert_eq!(v("1.0-ga"), v("1"));
        assert_eq!(v("1.0.FINAL"), v("1.0"));
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(v("1.10") > v("1.9"));
        assert!(v("2") > v("1.99.99"));
        assert!(v("1.0.1") > v("1"));
        assert!(v("12345678901234567890.1") > v("9.9"));
    }

    #[test]
    fn test_qualifier_ordering() {
        let ordered = [
            "1.0-alpha1",
            "1.0-beta1",
            "1.0-M1",
            "1.0-RC1",
            "1.0-SNAPSHOT",
            "1.0",
            "1.0-sp1",
            "1.0-xyz",
            "1.0.1",
        ];
        for pair in ordered.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_qualifier_aliases() {
        assert_eq!(v("1.0-a1"), v("1.0-alpha-1"));
        assert_eq!(v("1.0-b2"), v("1.0-beta2"));
        assert_eq!(v("1.0-cr1"), v("1.0-rc1"));
        assert!(v("1.0-alpha2") > v("1.0-alpha1"));
        assert!(v("1.0-alpha10") > v("1.0-alpha9"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(v("1.0-SNAPSHOT"), v("1.0-snapshot"));
        assert_eq!(v("2.0.0-Beta1"), v("2.0.0-beta-1"));
    }

    #[test]
    fn test_zeros_before_qualifier_are_dropped() {
        assert_eq!(v("1.0.0-SNAPSHOT"), v("1.0-SNAPSHOT"));
        assert_eq!(v("1.0.0-alpha"), v("1-alpha"));
        assert_eq!(v("1.0alpha1"), v("1-alpha-1"));
        assert!(v("2.0.0-beta1") < v("2.0-rc1"));
    }

    #[test]
    fn test_dash_opens_sublist() {
        assert!(v("1-1") < v("1.1"));
        assert!(v("1-1") > v("1"));
        assert!(v("1.0-1") < v("1.0.1"));
        assert_eq!(v("1-0"), v("1"));
    }

    #[test]
    fn test_single_letter_alias_needs_number() {
        assert_eq!(v("1.0-m2"), v("1.0-milestone-2"));
        // a bare "m" is an unknown qualifier, which sorts after a release
        assert!(v("1.0-m") > v("1.0"));
    }

    #[test]
    fn test_is_stable() {
        for stable in ["1.0", "2.3.4", "1.0.Final", "31.1-jre", "1.0-sp1", "5.2.3.RELEASE"] {
            assert!(v(stable).is_stable(), "{stable} should be stable");
        }
        for unstable in [
            "1.0-SNAPSHOT",
            "1.0-alpha",
            "1.0-b1",
            "1.0-M3",
            "1.0-RC2",
            "1.0-cr1",
            "21-ea",
            "1.0-preview",
            "1.0.dev4",
        ] {
            assert!(!v(unstable).is_stable(), "{unstable} should be unstable");
        }
    }

    #[test]
    fn test_display_keeps_original() {
        assert_eq!(v(" 1.0-SNAPSHOT ").to_string(), "1.0-SNAPSHOT");
        assert_eq!(v("1.0").as_str(), "1.0");
    }

    #[test]
    fn test_ranker_latest_and_stable() {
        let versions = strings(&["1.0", "1.1", "2.0-SNAPSHOT"]);
        assert_eq!(MavenVersionRanker.latest(&versions).as_deref(), Some("2.0-SNAPSHOT"));
        assert_eq!(MavenVersionRanker.stable(&versions).as_deref(), Some("1.1"));
    }

    #[test]
    fn test_ranker_trailing_zeros_do_not_win() {
        let versions = strings(&["2.0.0-beta1", "2.0-rc1", "1.9"]);
        assert_eq!(MavenVersionRanker.latest(&versions).as_deref(), Some("2.0-rc1"));
        assert_eq!(MavenVersionRanker.stable(&versions).as_deref(), Some("1.9"));
    }

    #[test]
    fn test_ranker_ignores_document_order() {
        let versions = strings(&["3.0.0-M1", "2.10.0", "2.9.1"]);
        assert_eq!(MavenVersionRanker.latest(&versions).as_deref(), Some("3.0.0-M1"));
        assert_eq!(MavenVersionRanker.stable(&versions).as_deref(), Some("2.10.0"));
    }

    #[test]
    fn test_ranker_empty_and_unstable_only() {
        assert_eq!(MavenVersionRanker.latest(&[]), None);
        assert_eq!(MavenVersionRanker.stable(&strings(&["1.0-SNAPSHOT"])), None);
        assert_eq!(MavenVersionRanker.latest(&strings(&["", "  "])), None);
    }
}
