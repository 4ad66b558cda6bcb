//! Database enum introspection
//!
//! This module reads the native enum types visible in the connected
//! database's search path, together with the table columns whose type is one
//! of those enums. The catalog is read in two queries so the orchestrator
//! can cache the results for the duration of a sync run.

use async_trait::async_trait;

use super::Result;
use super::SyncError;
use super::database::DatabaseDefinition;
use super::usage::ColumnUsage;

/// Reads enum types and enum-typed columns from a live database.
#[async_trait]
pub trait EnumIntrospector: Send + Sync {
	/// All enum types in the current search path, with their labels in
	/// declared order.
	async fn enum_types(&self) -> Result<Vec<DatabaseDefinition>>;

	/// All table columns whose type is an enum in the current search path.
	async fn enum_usage(&self) -> Result<Vec<ColumnUsage>>;
}

/// PostgreSQL implementation backed by the system catalogs.
pub struct PgEnumIntrospector {
	pool: sqlx::PgPool,
}

impl PgEnumIntrospector {
	pub fn new(pool: sqlx::PgPool) -> Self {
		Self { pool }
	}
}

#[derive(sqlx::FromRow)]
struct EnumValueRow {
	type_name: String,
	label: String,
}

#[derive(sqlx::FromRow)]
struct UsageRow {
	table_name: String,
	column_name: String,
	type_name: String,
}

#[async_trait]
impl EnumIntrospector for PgEnumIntrospector {
	async fn enum_types(&self) -> Result<Vec<DatabaseDefinition>> {
		// enumsortorder, not enumlabel: labels must come back in declared
		// order for prefix comparison against the desired value sets.
		let query = r#"
			SELECT t.typname AS type_name, e.enumlabel AS label
			FROM pg_type t
				JOIN pg_enum e ON e.enumtypid = t.oid
				JOIN pg_namespace n ON n.oid = t.typnamespace
			WHERE n.nspname = ANY(current_schemas(false))
			ORDER BY t.typname, e.enumsortorder
		"#;

		let rows: Vec<EnumValueRow> = sqlx::query_as(query)
			.fetch_all(&self.pool)
			.await
			.map_err(|e| {
				SyncError::Introspection(format!("Failed to fetch enum types: {}", e))
			})?;

		let mut definitions: Vec<DatabaseDefinition> = Vec::new();
		for row in rows {
			match definitions.last_mut() {
				Some(def) if def.name == row.type_name => def.cases.push(row.label),
				_ => definitions.push(DatabaseDefinition {
					name: row.type_name,
					cases: vec![row.label],
				}),
			}
		}

		Ok(definitions)
	}

	async fn enum_usage(&self) -> Result<Vec<ColumnUsage>> {
		// Ordinary tables only; dropped columns and system columns are
		// excluded.
		let query = r#"
			SELECT c.relname AS table_name, a.attname AS column_name, t.typname AS type_name
			FROM pg_attribute a
				JOIN pg_class c ON c.oid = a.attrelid
				JOIN pg_type t ON t.oid = a.atttypid
				JOIN pg_namespace n ON n.oid = t.typnamespace
			WHERE n.nspname = ANY(current_schemas(false))
				AND t.typtype = 'e'
				AND c.relkind = 'r'
				AND a.attnum > 0
				AND NOT a.attisdropped
			ORDER BY c.relname, a.attnum
		"#;

		let rows: Vec<UsageRow> = sqlx::query_as(query)
			.fetch_all(&self.pool)
			.await
			.map_err(|e| {
				SyncError::Introspection(format!("Failed to fetch enum column usage: {}", e))
			})?;

		Ok(rows
			.into_iter()
			.map(|row| ColumnUsage {
				table: row.table_name,
				column: row.column_name,
				type_name: row.type_name,
			})
			.collect())
	}
}
