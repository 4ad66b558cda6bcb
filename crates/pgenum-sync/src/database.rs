//! Cached view of the enum types present in the database
//!
//! The registry loads the full set of enum types once per sync run, on the
//! first lookup, and serves every later lookup from the cache. `reset` drops
//! the cache so the next run observes the database afresh.

use std::sync::Arc;

use indexmap::IndexMap;

use super::Result;
use super::introspection::EnumIntrospector;

/// An enum type as it currently exists in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDefinition {
	/// Type name.
	pub name: String,
	/// Labels in declared order.
	pub cases: Vec<String>,
}

/// Lazily loaded registry of the database's enum types.
pub struct DatabaseDefinitionRegistry {
	introspector: Arc<dyn EnumIntrospector>,
	cache: Option<IndexMap<String, DatabaseDefinition>>,
}

impl DatabaseDefinitionRegistry {
	pub fn new(introspector: Arc<dyn EnumIntrospector>) -> Self {
		Self {
			introspector,
			cache: None,
		}
	}

	/// Look up a type by name, loading the catalog on first use.
	pub async fn get(&mut self, type_name: &str) -> Result<Option<&DatabaseDefinition>> {
		Ok(self.load().await?.get(type_name))
	}

	/// Drop the cache. Must be called at every session boundary.
	pub fn reset(&mut self) {
		self.cache = None;
	}

	async fn load(&mut self) -> Result<&IndexMap<String, DatabaseDefinition>> {
		if self.cache.is_none() {
			let definitions = self.introspector.enum_types().await?;
			tracing::debug!(types = definitions.len(), "loaded enum types from database");
			self.cache = Some(
				definitions
					.into_iter()
					.map(|def| (def.name.clone(), def))
					.collect(),
			);
		}

		// Just populated above when absent.
		Ok(self.cache.as_ref().unwrap())
	}
}
