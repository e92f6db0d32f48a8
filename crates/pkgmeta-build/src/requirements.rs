//! Splitting `Requires-Dist` entries into base and per-extra requirements
//!
//! A requirement belongs to an extras group when its environment marker has an
//! `extra == "<group>"` clause joined to the rest of the marker by `and`. The
//! clause is removed and any remaining marker is kept on the requirement.

use pkgmeta_record::ExtrasRequire;

const EXTRA_MARKER: &str = "extra";

/// Base requirements and extras groups, both in input order
pub fn partition_requirements<S: AsRef<str>>(records: &[S]) -> (Vec<String>, ExtrasRequire) {
    let mut base = Vec::new();
    let mut extras = ExtrasRequire::new();

    for record in records {
        match split_requirement(record.as_ref()) {
            (requirement, Some(group)) => extras.entry(group).or_default().push(requirement),
            (requirement, None) => base.push(requirement),
        }
    }

    (base, extras)
}

/// Normalised requirement and the extras group it belongs to, if any
pub fn split_requirement(record: &str) -> (String, Option<String>) {
    let (requirement, marker) = match record.split_once(';') {
        Some((requirement, marker)) => (requirement, Some(marker)),
        None => (record, None),
    };
    let requirement = normalize_requirement(requirement);

    let Some(marker) = marker else {
        return (requirement, None);
    };
    let marker = marker.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut clauses: Vec<&str> = marker.split(" and ").collect();

    let extra = clauses
        .iter()
        .enumerate()
        .find_map(|(idx, clause)| extra_group(clause).map(|group| (idx, group)));

    match extra {
        Some((idx, group)) => {
            clauses.remove(idx);
            let rest = clauses.join(" and ");
            if rest.trim().is_empty() {
                (requirement, Some(group))
            } else {
                (format!("{}; {}", requirement, rest.trim()), Some(group))
            }
        }
        None => (format!("{}; {}", requirement, marker.trim()), None),
    }
}

/// `foo (>=1.0)` -> `foo>=1.0`
fn normalize_requirement(requirement: &str) -> String {
    requirement
        .chars()
        .filter(|c| !matches!(c, '(' | ')') && !c.is_whitespace())
        .collect()
}

/// Group name of an `extra == "<group>"` clause
fn extra_group(clause: &str) -> Option<String> {
    let clause = clause
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim();
    let (lhs, rhs) = clause.split_once("==")?;
    if lhs.trim() != EXTRA_MARKER {
        return None;
    }
    let group = quoted_literal(rhs.trim())?;
    (!group.is_empty()).then(|| group.to_string())
}

/// Contents of a value that is exactly one quoted string
fn quoted_literal(value: &str) -> Option<&str> {
    let quote = value.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let inner = value.strip_prefix(quote)?.strip_suffix(quote)?;
    (!inner.contains(quote)).then_some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_requirement_is_base() {
        assert_eq!(
            split_requirement("requests (>=2.0,<3)"),
            ("requests>=2.0,<3".to_string(), None)
        );
    }

    #[test]
    fn test_extra_marker_moves_to_group() {
        assert_eq!(
            split_requirement("pytest ; extra == 'test'"),
            ("pytest".to_string(), Some("test".to_string()))
        );
        assert_eq!(
            split_requirement("sphinx>=5; extra == \"docs\""),
            ("sphinx>=5".to_string(), Some("docs".to_string()))
        );
    }

    #[test]
    fn test_compound_marker_keeps_other_clauses() {
        assert_eq!(
            split_requirement("mock; python_version < \"3.8\" and extra == \"test\""),
            (
                "mock; python_version < \"3.8\"".to_string(),
                Some("test".to_string())
            )
        );
        assert_eq!(
            split_requirement("typing-extensions; python_version < \"3.8\""),
            (
                "typing-extensions; python_version < \"3.8\"".to_string(),
                None
            )
        );
    }

    #[test]
    fn test_extra_inside_or_stays_base() {
        let (requirement, group) =
            split_requirement("foo; python_version < \"3\" or extra == \"x\"");
        assert!(group.is_none());
        assert_eq!(requirement, "foo; python_version < \"3\" or extra == \"x\"");
    }

    #[test]
    fn test_leading_extra_joined_by_or_stays_base() {
        assert_eq!(
            split_requirement("foo; extra == \"a\" or python_version < \"3\""),
            (
                "foo; extra == \"a\" or python_version < \"3\"".to_string(),
                None
            )
        );
        let (_, group) = split_requirement("bar; extra == \"a\" or extra == \"b\"");
        assert!(group.is_none());
    }

    #[test]
    fn test_partition_requirements() {
        let records = [
            "click>=8",
            "pytest; extra == 'test'",
            "coverage[toml]; extra == 'test'",
            "sphinx; extra == 'docs'",
        ];
        let (base, extras) = partition_requirements(&records);
        assert_eq!(base, vec!["click>=8"]);
        assert_eq!(extras["test"], vec!["pytest", "coverage[toml]"]);
        assert_eq!(extras["docs"], vec!["sphinx"]);
    }
}
