//! # pgenum-sync
//!
//! Schema synchronization for native PostgreSQL enum types.
//!
//! PostgreSQL enums are standalone database objects, so a generic table
//! diffing engine never sees them: a value added to an application enum
//! produces no column-level difference at all. This crate closes that gap.
//! It compares application-declared enum definitions against the types
//! actually present in the database and turns the difference into the exact
//! DDL PostgreSQL supports:
//!
//! - **Creation**: `CREATE TYPE ... AS ENUM (...)` for declared types the
//!   database does not have yet.
//! - **Extension**: `ALTER TYPE ... ADD VALUE IF NOT EXISTS ...` per
//!   appended value, when the database's value list is a strict prefix of
//!   the declared list.
//! - **Removal**: `DROP TYPE ...` once no column uses the type any more.
//! - **Refusal**: removing, reordering, or inserting values before the end
//!   cannot be expressed as safe DDL and fails before any statement is
//!   produced.
//!
//! [`SchemaSync`] coordinates one comparison session: the surrounding diff
//! engine reports column-level changes, and the orchestrator answers with
//! replacement DDL, deduplicated per type across the whole run. Columns
//! read back from the catalog pass through [`SchemaSync::read_column`],
//! which plants a comment marker whenever the declared value set drifted so
//! the engine revisits a column that otherwise looks unchanged.

pub mod column;
pub mod comment;
pub mod database;
pub mod ddl;
pub mod definition;
pub mod diff;
pub mod introspection;
pub mod sync;
pub mod tracker;
pub mod usage;

pub use column::{ChangeOutcome, ColumnChange, ColumnDescriptor, ENUM_TYPE, RawColumn};
pub use database::{DatabaseDefinition, DatabaseDefinitionRegistry};
pub use definition::{DefinitionRegistry, EnumDefinition};
pub use diff::{CasesDiff, diff_cases};
pub use introspection::{EnumIntrospector, PgEnumIntrospector};
pub use sync::SchemaSync;
pub use tracker::TypeQueryTracker;
pub use usage::{ColumnUsage, UsageRegistry};

use thiserror::Error;

/// Errors surfaced by enum schema synchronization.
#[derive(Error, Debug)]
pub enum SyncError {
	#[error("Unsafe mutation of enum type '{type_name}': {reason}")]
	UnsafeEnumMutation { type_name: String, reason: String },

	#[error("Invalid enum definition '{name}': {reason}")]
	InvalidDefinition { name: String, reason: String },

	#[error("Introspection error: {0}")]
	Introspection(String),

	#[error("SQL error: {0}")]
	Sql(#[from] sqlx::Error),
}

/// Result type for enum schema synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;
