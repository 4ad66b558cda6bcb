//! Enum case-list diffing
//!
//! PostgreSQL can append values to an existing enum type cheaply
//! (`ALTER TYPE ... ADD VALUE IF NOT EXISTS`), but it cannot reorder or
//! remove values without rewriting every dependent column. The diff therefore
//! only recognizes two safe relationships between the catalog's case list and
//! the declared one: identical, or the catalog list being a strict prefix of
//! the declared list. Everything else is reported as incompatible and must
//! fail loudly before any DDL is generated.

/// Relationship between an enum type's actual and declared case lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasesDiff {
	/// The declared cases match the catalog exactly.
	Unchanged,
	/// The declared cases extend the catalog list; the payload is the suffix
	/// of new values, in declared order.
	Appended(Vec<String>),
	/// The declared cases remove, reorder, or insert before the end.
	Incompatible {
		/// Human-readable description of what changed unsafely.
		reason: String,
	},
}

/// Compare the catalog's case list against the declared one.
///
/// `actual` is the ordered value list as stored by PostgreSQL
/// (`pg_enum.enumsortorder`); `desired` is the application-declared order.
pub fn diff_cases(actual: &[String], desired: &[String]) -> CasesDiff {
	if actual == desired {
		return CasesDiff::Unchanged;
	}

	if actual.len() < desired.len() && desired[..actual.len()] == *actual {
		return CasesDiff::Appended(desired[actual.len()..].to_vec());
	}

	let removed: Vec<&str> = actual
		.iter()
		.filter(|value| !desired.contains(value))
		.map(String::as_str)
		.collect();

	let reason = if removed.is_empty() {
		"existing values were reordered or new values inserted before the end".to_string()
	} else {
		format!("values removed: {}", removed.join(", "))
	};

	CasesDiff::Incompatible { reason }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cases(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	#[test]
	fn identical_lists_are_unchanged() {
		let list = cases(&["started", "processing", "finished"]);
		assert_eq!(diff_cases(&list, &list), CasesDiff::Unchanged);
	}

	#[test]
	fn strict_prefix_yields_appended_suffix_in_order() {
		let actual = cases(&["started", "processing", "finished"]);
		let desired = cases(&["started", "processing", "finished", "accepted", "rejected"]);
		assert_eq!(
			diff_cases(&actual, &desired),
			CasesDiff::Appended(cases(&["accepted", "rejected"]))
		);
	}

	#[test]
	fn empty_actual_is_a_strict_prefix() {
		let desired = cases(&["a", "b"]);
		assert_eq!(
			diff_cases(&[], &desired),
			CasesDiff::Appended(cases(&["a", "b"]))
		);
	}

	#[test]
	fn reordering_is_incompatible() {
		let actual = cases(&["started", "processing", "finished"]);
		let desired = cases(&["processing", "started", "finished"]);
		assert!(matches!(
			diff_cases(&actual, &desired),
			CasesDiff::Incompatible { .. }
		));
	}

	#[test]
	fn removal_is_incompatible_and_names_the_value() {
		let actual = cases(&["started", "processing", "finished"]);
		let desired = cases(&["started", "finished"]);
		match diff_cases(&actual, &desired) {
			CasesDiff::Incompatible { reason } => {
				assert!(reason.contains("processing"), "reason was: {reason}");
			}
			other => panic!("expected Incompatible, got {other:?}"),
		}
	}

	#[test]
	fn mid_insert_is_incompatible() {
		let actual = cases(&["started", "finished"]);
		let desired = cases(&["started", "processing", "finished"]);
		assert!(matches!(
			diff_cases(&actual, &desired),
			CasesDiff::Incompatible { .. }
		));
	}

	#[test]
	fn shrinking_to_a_prefix_is_incompatible() {
		let actual = cases(&["started", "processing", "finished"]);
		let desired = cases(&["started", "processing"]);
		match diff_cases(&actual, &desired) {
			CasesDiff::Incompatible { reason } => {
				assert!(reason.contains("finished"), "reason was: {reason}");
			}
			other => panic!("expected Incompatible, got {other:?}"),
		}
	}
}
