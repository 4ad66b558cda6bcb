//! Cached view of enum column usage
//!
//! The removal decision needs to know whether any column other than the one
//! being dropped still uses an enum type, and the read-back path needs to
//! resolve a column's type name. Both are served from a single catalog read
//! cached for the duration of a sync run.

use std::sync::Arc;

use super::Result;
use super::introspection::EnumIntrospector;

/// One table column whose type is a native enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnUsage {
	pub table: String,
	pub column: String,
	pub type_name: String,
}

/// Lazily loaded registry of enum-typed columns.
pub struct UsageRegistry {
	introspector: Arc<dyn EnumIntrospector>,
	cache: Option<Vec<ColumnUsage>>,
}

impl UsageRegistry {
	pub fn new(introspector: Arc<dyn EnumIntrospector>) -> Self {
		Self {
			introspector,
			cache: None,
		}
	}

	/// Whether any column other than `table.column` uses the type.
	pub async fn is_used_elsewhere(
		&mut self,
		type_name: &str,
		table: &str,
		column: &str,
	) -> Result<bool> {
		Ok(self.load().await?.iter().any(|usage| {
			usage.type_name == type_name && !(usage.table == table && usage.column == column)
		}))
	}

	/// The enum type name of `table.column`, if the column is enum-typed.
	pub async fn column_type(&mut self, table: &str, column: &str) -> Result<Option<String>> {
		Ok(self
			.load()
			.await?
			.iter()
			.find(|usage| usage.table == table && usage.column == column)
			.map(|usage| usage.type_name.clone()))
	}

	/// Drop the cache. Must be called at every session boundary.
	pub fn reset(&mut self) {
		self.cache = None;
	}

	async fn load(&mut self) -> Result<&[ColumnUsage]> {
		if self.cache.is_none() {
			let usage = self.introspector.enum_usage().await?;
			tracing::debug!(columns = usage.len(), "loaded enum column usage from database");
			self.cache = Some(usage);
		}

		// Just populated above when absent.
		Ok(self.cache.as_deref().unwrap())
	}
}
