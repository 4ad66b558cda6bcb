//! Comment-marker protocol
//!
//! Enum value changes do not show up as a column-level difference, so the
//! generic schema diff engine would never revisit an enum-backed column whose
//! value set drifted. To manufacture a detectable difference, a marker string
//! is appended to the column comment reported from catalog introspection.
//! The marker is stripped again before any final comparison, so it never
//! reaches a user-visible comment.

/// Sentinel appended to a column comment while an enum value change is pending.
pub const MARKER: &str = "(pgenum:pending)";

/// Append the pending-change marker to a comment.
///
/// A missing or empty comment yields the bare marker.
pub fn mark(comment: Option<&str>) -> String {
	match comment {
		Some(text) if !text.is_empty() => format!("{text} {MARKER}"),
		_ => MARKER.to_string(),
	}
}

/// Strip the pending-change marker from a comment.
///
/// Returns `None` when nothing but the marker (or nothing at all) remains.
/// Unmarked comments pass through unchanged, so the call is idempotent.
pub fn unmark(comment: Option<&str>) -> Option<String> {
	let text = comment?;
	let stripped = match text.strip_suffix(MARKER) {
		Some(rest) => rest.trim_end(),
		None => text,
	};
	if stripped.is_empty() {
		None
	} else {
		Some(stripped.to_string())
	}
}

/// Whether a comment currently carries the pending-change marker.
pub fn is_marked(comment: Option<&str>) -> bool {
	comment.is_some_and(|text| text.ends_with(MARKER))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mark_appends_to_existing_comment() {
		assert_eq!(mark(Some("order state")), format!("order state {MARKER}"));
	}

	#[test]
	fn mark_without_comment_yields_bare_marker() {
		assert_eq!(mark(None), MARKER);
		assert_eq!(mark(Some("")), MARKER);
	}

	#[test]
	fn unmark_round_trips_user_comment() {
		let marked = mark(Some("order state"));
		assert_eq!(unmark(Some(&marked)), Some("order state".to_string()));
	}

	#[test]
	fn unmark_of_bare_marker_is_none() {
		assert_eq!(unmark(Some(MARKER)), None);
		assert_eq!(unmark(None), None);
	}

	#[test]
	fn unmark_is_idempotent_on_clean_comments() {
		assert_eq!(
			unmark(Some("no marker here")),
			Some("no marker here".to_string())
		);
	}

	#[test]
	fn is_marked_detects_marker() {
		assert!(is_marked(Some(&mark(Some("c")))));
		assert!(!is_marked(Some("plain comment")));
		assert!(!is_marked(None));
	}
}
