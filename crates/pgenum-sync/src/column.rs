//! Column descriptors and change notifications
//!
//! The surrounding table/column diff engine is an external collaborator: it
//! detects per-column changes and hands them to the orchestrator as plain
//! values. The orchestrator answers with a [`ChangeOutcome`] telling the
//! engine whether to suppress its own DDL, which extra statements to run, and
//! the mutated column descriptor to use for any further processing.

/// Logical storage type reported for enum-backed columns read back from the
/// catalog. The concrete PostgreSQL type name is carried separately on the
/// descriptor's owner annotation.
pub const ENUM_TYPE: &str = "enum";

/// A column as the schema diff engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
	/// Column name.
	pub name: String,
	/// Storage type the column is declared with (a PostgreSQL type name, or
	/// [`ENUM_TYPE`] for the generic enum marker).
	pub storage_type: String,
	/// Whether the column accepts NULL.
	pub nullable: bool,
	/// Raw default expression, if any.
	pub default: Option<String>,
	/// Identifier of the application enum type backing this column, if any.
	pub enum_owner: Option<String>,
	/// Column comment as persisted (possibly carrying the pending marker).
	pub comment: Option<String>,
	/// Explicit pending-change signal, set when the declared value set
	/// differs from the catalog's.
	pub pending_enum_change: bool,
}

impl ColumnDescriptor {
	pub fn new(name: impl Into<String>, storage_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			storage_type: storage_type.into(),
			nullable: false,
			default: None,
			enum_owner: None,
			comment: None,
			pending_enum_change: false,
		}
	}

	pub fn nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	pub fn default_expr(mut self, default: impl Into<String>) -> Self {
		self.default = Some(default.into());
		self
	}

	pub fn enum_owner(mut self, owner: impl Into<String>) -> Self {
		self.enum_owner = Some(owner.into());
		self
	}

	pub fn comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = Some(comment.into());
		self
	}
}

/// A column definition as read back from the database catalog, before any
/// enum-specific interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
	/// Column name.
	pub name: String,
	/// Raw catalog type name (`pg_type.typname`).
	pub type_name: String,
	/// Whether the column accepts NULL.
	pub nullable: bool,
	/// Raw default expression, if any.
	pub default: Option<String>,
	/// Stored column comment, if any.
	pub comment: Option<String>,
}

/// Per-column change notification from the external diff engine.
#[derive(Debug, Clone)]
pub enum ColumnChange {
	/// Column belonging to a table that is being created from scratch.
	TableColumnCreated {
		table: String,
		column: ColumnDescriptor,
	},
	/// Column added to an existing table.
	ColumnAdded {
		table: String,
		column: ColumnDescriptor,
	},
	/// Existing column altered. `default_sql` carries the statements the
	/// engine would run on its own for this change; the orchestrator may
	/// re-emit them when it suppresses the default handling.
	ColumnChanged {
		table: String,
		from: ColumnDescriptor,
		to: ColumnDescriptor,
		default_sql: Vec<String>,
	},
	/// Column dropped from an existing table.
	ColumnRemoved {
		table: String,
		column: ColumnDescriptor,
	},
}

/// Orchestrator answer to a [`ColumnChange`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeOutcome {
	/// When true, the engine must not run its own DDL for this column.
	pub suppress_default: bool,
	/// Extra statements to execute, in order.
	pub statements: Vec<String>,
	/// Mutated column descriptor the engine should carry forward, if the
	/// change was handled here.
	pub column: Option<ColumnDescriptor>,
}

impl ChangeOutcome {
	/// Outcome that leaves the change entirely to the engine's default
	/// handling.
	pub fn pass_through() -> Self {
		Self::default()
	}
}
