//! Schema-sync orchestration
//!
//! [`SchemaSync`] is the session-scoped coordinator sitting between an
//! external table/column diff engine and the enum-specific machinery. The
//! engine reports every column-level change it detects; the orchestrator
//! decides which changes concern managed enum types, replaces the engine's
//! default DDL where needed, and keeps the per-run deduplication tracker
//! consistent so each type-level statement is emitted exactly once.
//!
//! One instance serves one comparison session. `reset` must be called
//! between sessions; the cached catalog state and the deduplication stacks
//! are only valid for a single run.

use std::sync::Arc;

use super::Result;
use super::SyncError;
use super::column::{ChangeOutcome, ColumnChange, ColumnDescriptor, ENUM_TYPE, RawColumn};
use super::comment;
use super::database::DatabaseDefinitionRegistry;
use super::ddl;
use super::definition::{DefinitionRegistry, EnumDefinition};
use super::diff::{self, CasesDiff};
use super::introspection::EnumIntrospector;
use super::tracker::TypeQueryTracker;
use super::usage::UsageRegistry;

/// Session-scoped enum schema-sync coordinator.
pub struct SchemaSync {
	definitions: DefinitionRegistry,
	database: DatabaseDefinitionRegistry,
	usage: UsageRegistry,
	tracker: TypeQueryTracker,
}

impl SchemaSync {
	pub fn new(definitions: DefinitionRegistry, introspector: Arc<dyn EnumIntrospector>) -> Self {
		Self {
			definitions,
			database: DatabaseDefinitionRegistry::new(Arc::clone(&introspector)),
			usage: UsageRegistry::new(introspector),
			tracker: TypeQueryTracker::new(),
		}
	}

	pub fn definitions(&self) -> &DefinitionRegistry {
		&self.definitions
	}

	/// Start a new comparison session: drop cached catalog state and clear
	/// the deduplication stacks.
	pub fn reset(&mut self) {
		self.database.reset();
		self.usage.reset();
		self.tracker.reset();
	}

	/// Handle one column-level change reported by the diff engine.
	///
	/// Changes that do not involve a managed enum type pass through
	/// untouched. An incompatible value-set mutation aborts with
	/// [`SyncError::UnsafeEnumMutation`] before any DDL is produced.
	pub async fn apply(&mut self, change: ColumnChange) -> Result<ChangeOutcome> {
		match change {
			ColumnChange::TableColumnCreated { table, column } => {
				self.on_table_column_created(&table, column).await
			}
			ColumnChange::ColumnAdded { table, column } => {
				self.on_column_added(&table, column).await
			}
			ColumnChange::ColumnChanged {
				table,
				from,
				to,
				default_sql,
			} => self.on_column_changed(&table, from, to, default_sql).await,
			ColumnChange::ColumnRemoved { table, column } => {
				self.on_column_removed(&table, column).await
			}
		}
	}

	/// Interpret a column read back from the catalog.
	///
	/// Returns `None` when the column's type is not a managed enum type,
	/// leaving interpretation to the caller. For managed columns the
	/// descriptor is rewritten to the generic enum storage type with the
	/// owner annotation set, and when the declared value set differs from
	/// the catalog's the pending-change marker is planted so the diff engine
	/// revisits the column.
	pub async fn read_column(&mut self, raw: &RawColumn) -> Result<Option<ColumnDescriptor>> {
		let Some(definition) = self.definitions.by_type_name(&raw.type_name).cloned() else {
			return Ok(None);
		};

		// A type registered here but absent from the catalog counts as
		// changed; its creation is still pending.
		let changed = match self.database.get(&definition.name).await? {
			Some(db) => db.cases != definition.cases,
			None => true,
		};

		let mut column = ColumnDescriptor::new(&raw.name, ENUM_TYPE)
			.nullable(raw.nullable)
			.enum_owner(&definition.owner);
		column.default = raw.default.clone();
		column.comment = if changed {
			Some(comment::mark(raw.comment.as_deref()))
		} else {
			raw.comment.clone()
		};
		column.pending_enum_change = changed;

		Ok(Some(column))
	}

	async fn on_table_column_created(
		&mut self,
		table: &str,
		column: ColumnDescriptor,
	) -> Result<ChangeOutcome> {
		let Some(definition) = self.resolve(&column) else {
			return Ok(ChangeOutcome::pass_through());
		};
		tracing::debug!(table, column = %column.name, type_name = %definition.name, "column created with enum type");

		// A freshly created table cannot have queued statements for its
		// types yet, so nothing is deduplicated here.
		let mut statements = self.persistence_sql(&definition).await?;

		let mut column = column;
		column.storage_type = definition.name.clone();
		statements.push(ddl::add_column(table, &column));

		// Comments are always altered in a separate statement; clearing the
		// descriptor keeps the marker out of the created schema.
		column.comment = None;
		column.pending_enum_change = false;

		Ok(ChangeOutcome {
			suppress_default: true,
			statements,
			column: Some(column),
		})
	}

	async fn on_column_added(
		&mut self,
		table: &str,
		column: ColumnDescriptor,
	) -> Result<ChangeOutcome> {
		let Some(definition) = self.resolve(&column) else {
			return Ok(ChangeOutcome::pass_through());
		};
		tracing::debug!(table, column = %column.name, type_name = %definition.name, "column added with enum type");

		let mut statements = Vec::new();
		self.queue_persistence(&definition, &mut statements).await?;

		let mut column = column;
		column.storage_type = definition.name.clone();
		let sql = ddl::add_column(table, &column);
		self.tracker.add_usage_query(sql.clone(), &definition.name);
		statements.push(sql);

		Ok(ChangeOutcome {
			suppress_default: true,
			statements,
			column: Some(column),
		})
	}

	async fn on_column_changed(
		&mut self,
		table: &str,
		from: ColumnDescriptor,
		to: ColumnDescriptor,
		default_sql: Vec<String>,
	) -> Result<ChangeOutcome> {
		let to_definition = self.resolve(&to);
		let from_definition = self.resolve(&from);

		if to_definition.is_none() && from_definition.is_none() {
			return Ok(ChangeOutcome::pass_through());
		}

		match (to_definition, from_definition) {
			// Same application type on both sides: the value set changed
			// (or only the marker did). The column keeps its type.
			(Some(definition), Some(from_definition))
				if definition.owner == from_definition.owner =>
			{
				tracing::debug!(table, column = %to.name, type_name = %definition.name, "enum value set changed");

				let mut statements = Vec::new();
				self.queue_persistence(&definition, &mut statements).await?;

				let mut to = to;
				to.storage_type = definition.name.clone();
				let sql = ddl::alter_column_type(table, &to.name, &definition.name);
				self.tracker.add_usage_query(sql.clone(), &definition.name);
				statements.push(sql);

				// The marker must never survive into a stored comment.
				to.comment = comment::unmark(to.comment.as_deref());
				to.pending_enum_change = false;

				Ok(ChangeOutcome {
					suppress_default: true,
					statements,
					column: Some(to),
				})
			}
			(to_definition, from_definition) => {
				let mut statements = Vec::new();
				let mut column = None;

				if let Some(definition) = &to_definition {
					tracing::debug!(table, column = %to.name, type_name = %definition.name, "column changed to enum type");

					self.queue_persistence(definition, &mut statements).await?;

					let mut to = to;
					to.storage_type = definition.name.clone();
					// Changing a column's type needs an explicit cast.
					let sql = ddl::append_using_cast(&ddl::alter_column_type(
						table,
						&to.name,
						&definition.name,
					));
					self.tracker.add_usage_query(sql.clone(), &definition.name);
					statements.push(sql);

					to.comment = comment::unmark(to.comment.as_deref());
					to.pending_enum_change = false;
					column = Some(to);
				} else {
					// Changed away from an enum entirely: the engine's own
					// statements still apply, followed by the type removal
					// decision.
					statements.extend(default_sql);
				}

				if let Some(definition) = &from_definition {
					tracing::debug!(table, column = %from.name, type_name = %definition.name, "column changed away from enum type");
					let removal = self.removal_sql(table, definition, &from.name).await?;
					statements.extend(removal);
				}

				Ok(ChangeOutcome {
					suppress_default: true,
					statements,
					column,
				})
			}
		}
	}

	async fn on_column_removed(
		&mut self,
		table: &str,
		column: ColumnDescriptor,
	) -> Result<ChangeOutcome> {
		let Some(definition) = self.resolve(&column) else {
			return Ok(ChangeOutcome::pass_through());
		};
		tracing::debug!(table, column = %column.name, type_name = %definition.name, "enum column removed");

		let mut statements = vec![ddl::drop_column(table, &column.name)];
		let removal = self.removal_sql(table, &definition, &column.name).await?;
		statements.extend(removal);

		Ok(ChangeOutcome {
			suppress_default: true,
			statements,
			column: None,
		})
	}

	/// CREATE TYPE when the type is absent from the catalog, ALTER TYPE ADD
	/// VALUE per appended case when it drifted, nothing when it matches.
	async fn persistence_sql(&mut self, definition: &EnumDefinition) -> Result<Vec<String>> {
		let database_definition = self.database.get(&definition.name).await?.cloned();
		match database_definition {
			None => Ok(vec![ddl::create_type(definition)]),
			Some(db) => match diff::diff_cases(&db.cases, &definition.cases) {
				CasesDiff::Unchanged => Ok(Vec::new()),
				CasesDiff::Appended(values) => Ok(values
					.iter()
					.map(|value| ddl::add_value(&definition.name, value))
					.collect()),
				CasesDiff::Incompatible { reason } => Err(SyncError::UnsafeEnumMutation {
					type_name: definition.name.clone(),
					reason,
				}),
			},
		}
	}

	/// Emit the persistence statements not yet queued for the type in this
	/// run, recording them as queued.
	async fn queue_persistence(
		&mut self,
		definition: &EnumDefinition,
		statements: &mut Vec<String>,
	) -> Result<()> {
		for sql in self.persistence_sql(definition).await? {
			if !self.tracker.has_persistence_query(&sql, &definition.name) {
				self.tracker.add_persistence_query(sql.clone(), &definition.name);
				statements.push(sql);
			}
		}
		Ok(())
	}

	/// Decide what happens to a type when a column stops using it.
	///
	/// A type still used by other columns gets its pending persistence
	/// statements (the remaining columns still need them); an orphaned type
	/// is dropped, unless a statement queued earlier in this run keeps it
	/// alive.
	async fn removal_sql(
		&mut self,
		table: &str,
		definition: &EnumDefinition,
		column_name: &str,
	) -> Result<Vec<String>> {
		if self
			.usage
			.is_used_elsewhere(&definition.name, table, column_name)
			.await?
		{
			let mut statements = Vec::new();
			self.queue_persistence(definition, &mut statements).await?;
			return Ok(statements);
		}

		let sql = ddl::drop_type(&definition.name);
		if !self.tracker.has_removal_query(&sql, &definition.name)
			&& self.tracker.is_persistence_stack_empty(&definition.name)
			&& self.tracker.is_usage_stack_empty(&definition.name)
		{
			self.tracker.add_removal_query(sql.clone(), &definition.name);
			Ok(vec![sql])
		} else {
			tracing::warn!(type_name = %definition.name, "drop withheld, statements already queued for this type");
			Ok(Vec::new())
		}
	}

	fn resolve(&self, column: &ColumnDescriptor) -> Option<EnumDefinition> {
		let owner = column.enum_owner.as_deref()?;
		self.definitions.by_owner(owner).cloned()
	}
}
