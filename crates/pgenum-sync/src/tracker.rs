//! Per-run DDL deduplication
//!
//! Several columns across several tables can reference the same enum type
//! within one schema-sync pass, each independently requesting the same
//! `CREATE TYPE` / `ALTER TYPE` statement. The tracker records every
//! statement queued for a type during the current run so each is emitted at
//! most once, and so the removal decision can tell whether a `DROP TYPE`
//! would conflict with statements already queued for the same type.
//!
//! The tracker is session state owned by the orchestrator, never global; it
//! must be reset at every session boundary or statements from a prior run
//! would be suppressed incorrectly.

use indexmap::IndexMap;

/// Tracks the DDL statements queued per enum type during one sync run.
#[derive(Debug, Default)]
pub struct TypeQueryTracker {
	persistence: IndexMap<String, Vec<String>>,
	usage: IndexMap<String, Vec<String>>,
	removal: IndexMap<String, Vec<String>>,
}

impl TypeQueryTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether this exact CREATE/ALTER TYPE statement is already queued for
	/// the type.
	pub fn has_persistence_query(&self, sql: &str, type_name: &str) -> bool {
		Self::has(&self.persistence, sql, type_name)
	}

	pub fn add_persistence_query(&mut self, sql: impl Into<String>, type_name: &str) {
		Self::add(&mut self.persistence, sql.into(), type_name);
	}

	/// Whether this exact column-level ALTER statement is already queued for
	/// the type.
	pub fn has_usage_query(&self, sql: &str, type_name: &str) -> bool {
		Self::has(&self.usage, sql, type_name)
	}

	pub fn add_usage_query(&mut self, sql: impl Into<String>, type_name: &str) {
		Self::add(&mut self.usage, sql.into(), type_name);
	}

	/// Whether a DROP TYPE statement is already queued for the type.
	pub fn has_removal_query(&self, sql: &str, type_name: &str) -> bool {
		Self::has(&self.removal, sql, type_name)
	}

	pub fn add_removal_query(&mut self, sql: impl Into<String>, type_name: &str) {
		Self::add(&mut self.removal, sql.into(), type_name);
	}

	/// No CREATE/ALTER TYPE statement queued for the type in this run.
	/// A type being created or extended right now must never be dropped in
	/// the same run.
	pub fn is_persistence_stack_empty(&self, type_name: &str) -> bool {
		Self::is_empty(&self.persistence, type_name)
	}

	/// No column-level statement queued for the type in this run.
	pub fn is_usage_stack_empty(&self, type_name: &str) -> bool {
		Self::is_empty(&self.usage, type_name)
	}

	/// Clear all stacks. Must be called at every session boundary.
	pub fn reset(&mut self) {
		self.persistence.clear();
		self.usage.clear();
		self.removal.clear();
	}

	fn has(stack: &IndexMap<String, Vec<String>>, sql: &str, type_name: &str) -> bool {
		stack
			.get(type_name)
			.is_some_and(|queries| queries.iter().any(|q| q == sql))
	}

	fn add(stack: &mut IndexMap<String, Vec<String>>, sql: String, type_name: &str) {
		stack.entry(type_name.to_string()).or_default().push(sql);
	}

	fn is_empty(stack: &IndexMap<String, Vec<String>>, type_name: &str) -> bool {
		stack.get(type_name).is_none_or(Vec::is_empty)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn queued_statement_is_found_per_type() {
		let mut tracker = TypeQueryTracker::new();
		tracker.add_persistence_query("CREATE TYPE a AS ENUM ('x')", "a");

		assert!(tracker.has_persistence_query("CREATE TYPE a AS ENUM ('x')", "a"));
		assert!(!tracker.has_persistence_query("CREATE TYPE a AS ENUM ('x')", "b"));
		assert!(!tracker.has_persistence_query("CREATE TYPE a AS ENUM ('y')", "a"));
	}

	#[test]
	fn stacks_are_independent() {
		let mut tracker = TypeQueryTracker::new();
		tracker.add_usage_query("ALTER TABLE t ALTER c TYPE a", "a");

		assert!(!tracker.has_persistence_query("ALTER TABLE t ALTER c TYPE a", "a"));
		assert!(!tracker.has_removal_query("ALTER TABLE t ALTER c TYPE a", "a"));
		assert!(tracker.has_usage_query("ALTER TABLE t ALTER c TYPE a", "a"));
	}

	#[test]
	fn emptiness_reflects_queued_statements() {
		let mut tracker = TypeQueryTracker::new();
		assert!(tracker.is_persistence_stack_empty("a"));
		assert!(tracker.is_usage_stack_empty("a"));

		tracker.add_persistence_query("CREATE TYPE a AS ENUM ('x')", "a");
		tracker.add_usage_query("ALTER TABLE t ALTER c TYPE a", "a");

		assert!(!tracker.is_persistence_stack_empty("a"));
		assert!(!tracker.is_usage_stack_empty("a"));
		assert!(tracker.is_persistence_stack_empty("other"));
	}

	#[test]
	fn reset_clears_every_stack() {
		let mut tracker = TypeQueryTracker::new();
		tracker.add_persistence_query("CREATE TYPE a AS ENUM ('x')", "a");
		tracker.add_usage_query("ALTER TABLE t ALTER c TYPE a", "a");
		tracker.add_removal_query("DROP TYPE a", "a");

		tracker.reset();

		assert!(!tracker.has_persistence_query("CREATE TYPE a AS ENUM ('x')", "a"));
		assert!(!tracker.has_usage_query("ALTER TABLE t ALTER c TYPE a", "a"));
		assert!(!tracker.has_removal_query("DROP TYPE a", "a"));
		assert!(tracker.is_persistence_stack_empty("a"));
	}
}
