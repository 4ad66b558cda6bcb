//! Declared enum definitions
//!
//! The definition registry holds the desired shape of every enum type the
//! application declares: the database type name, the ordered case list, and
//! the identifier of the owning application type. It is a pure in-memory
//! lookup structure loaded once per schema-comparison session.

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

use crate::{Result, SyncError};

/// Application-declared shape of a PostgreSQL enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
	/// Database type name, globally unique.
	pub name: String,
	/// Declared enum values, in declared order.
	pub cases: Vec<String>,
	/// Identifier of the application-level type this definition came from
	/// (e.g. a fully qualified Rust type path).
	pub owner: String,
}

impl EnumDefinition {
	/// Build a definition, validating its invariants: the case list must be
	/// non-empty and free of duplicates.
	pub fn new(
		name: impl Into<String>,
		owner: impl Into<String>,
		cases: impl IntoIterator<Item = impl Into<String>>,
	) -> Result<Self> {
		let name = name.into();
		let cases: Vec<String> = cases.into_iter().map(Into::into).collect();

		if cases.is_empty() {
			return Err(SyncError::InvalidDefinition {
				name,
				reason: "case list is empty".to_string(),
			});
		}

		let mut seen = HashSet::new();
		for case in &cases {
			if !seen.insert(case.as_str()) {
				return Err(SyncError::InvalidDefinition {
					name,
					reason: format!("duplicate case '{case}'"),
				});
			}
		}

		Ok(Self {
			name,
			cases,
			owner: owner.into(),
		})
	}
}

/// Registry of declared enum definitions, indexed by database type name and
/// by owning application type.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
	by_name: IndexMap<String, EnumDefinition>,
	owner_index: HashMap<String, String>,
}

impl DefinitionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a definition. Both the type name and the owner identifier
	/// must be unique within the registry.
	pub fn register(&mut self, definition: EnumDefinition) -> Result<()> {
		if self.by_name.contains_key(&definition.name) {
			return Err(SyncError::InvalidDefinition {
				name: definition.name,
				reason: "a definition with this type name is already registered".to_string(),
			});
		}
		if self.owner_index.contains_key(&definition.owner) {
			return Err(SyncError::InvalidDefinition {
				name: definition.name,
				reason: format!(
					"owner '{}' already maps to another enum type",
					definition.owner
				),
			});
		}

		self.owner_index
			.insert(definition.owner.clone(), definition.name.clone());
		self.by_name.insert(definition.name.clone(), definition);
		Ok(())
	}

	/// Look up a definition by its database type name.
	pub fn by_type_name(&self, name: &str) -> Option<&EnumDefinition> {
		self.by_name.get(name)
	}

	/// Look up a definition by its owning application type identifier.
	pub fn by_owner(&self, owner: &str) -> Option<&EnumDefinition> {
		let name = self.owner_index.get(owner)?;
		self.by_name.get(name)
	}

	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}

	/// Iterate over registered definitions in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &EnumDefinition> {
		self.by_name.values()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn status_type() -> EnumDefinition {
		EnumDefinition::new(
			"status_type",
			"app::StatusType",
			["started", "processing", "finished"],
		)
		.expect("valid definition")
	}

	#[test]
	fn empty_case_list_is_rejected() {
		let result = EnumDefinition::new("status_type", "app::StatusType", Vec::<String>::new());
		assert!(matches!(
			result,
			Err(SyncError::InvalidDefinition { .. })
		));
	}

	#[test]
	fn duplicate_case_is_rejected() {
		let result =
			EnumDefinition::new("status_type", "app::StatusType", ["started", "started"]);
		match result {
			Err(SyncError::InvalidDefinition { reason, .. }) => {
				assert!(reason.contains("started"), "reason was: {reason}");
			}
			other => panic!("expected InvalidDefinition, got {other:?}"),
		}
	}

	#[test]
	fn lookup_by_name_and_owner() {
		let mut registry = DefinitionRegistry::new();
		registry.register(status_type()).expect("register");

		assert_eq!(
			registry.by_type_name("status_type").map(|d| d.owner.as_str()),
			Some("app::StatusType")
		);
		assert_eq!(
			registry.by_owner("app::StatusType").map(|d| d.name.as_str()),
			Some("status_type")
		);
		assert!(registry.by_type_name("missing_type").is_none());
		assert!(registry.by_owner("app::Missing").is_none());
	}

	#[test]
	fn iteration_follows_registration_order() {
		let mut registry = DefinitionRegistry::new();
		assert!(registry.is_empty());

		registry.register(status_type()).expect("register");
		registry
			.register(
				EnumDefinition::new("priority_type", "app::PriorityType", ["low", "high"])
					.expect("valid definition"),
			)
			.expect("register");

		assert_eq!(registry.len(), 2);
		let names: Vec<&str> = registry.iter().map(|d| d.name.as_str()).collect();
		assert_eq!(names, ["status_type", "priority_type"]);
	}

	#[test]
	fn duplicate_registration_is_rejected() {
		let mut registry = DefinitionRegistry::new();
		registry.register(status_type()).expect("first register");
		assert!(registry.register(status_type()).is_err());
	}

	#[test]
	fn duplicate_owner_is_rejected() {
		let mut registry = DefinitionRegistry::new();
		registry.register(status_type()).expect("first register");
		let clashing =
			EnumDefinition::new("other_type", "app::StatusType", ["a"]).expect("valid definition");
		assert!(registry.register(clashing).is_err());
	}
}
