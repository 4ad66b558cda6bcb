//! PostgreSQL DDL text generation
//!
//! Statement builders for enum type maintenance and the column-level ALTERs
//! the orchestrator emits in place of the suppressed engine defaults.
//! Identifiers are quoted only when PostgreSQL requires it; enum values are
//! always quoted as string literals.

use once_cell::sync::Lazy;
use pg_escape::quote_identifier;
use regex::Regex;

use crate::column::ColumnDescriptor;
use crate::definition::EnumDefinition;

/// `ALTER TABLE t ALTER col TYPE type` with nothing after the type name.
/// Statements that already carry a `USING` clause (or any other suffix) do
/// not match and are left untouched.
static ALTER_COLUMN_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^ALTER TABLE \S+ ALTER (\S+) TYPE (\S+)$").expect("valid regex")
});

/// `CREATE TYPE <name> AS ENUM ('v1', 'v2', ...)` with cases in declared order.
pub fn create_type(definition: &EnumDefinition) -> String {
	let values: Vec<String> = definition.cases.iter().map(|c| quote_literal(c)).collect();
	format!(
		"CREATE TYPE {} AS ENUM ({})",
		quote_identifier(&definition.name),
		values.join(", ")
	)
}

/// `ALTER TYPE <name> ADD VALUE IF NOT EXISTS '<value>'`.
pub fn add_value(type_name: &str, value: &str) -> String {
	format!(
		"ALTER TYPE {} ADD VALUE IF NOT EXISTS {}",
		quote_identifier(type_name),
		quote_literal(value)
	)
}

/// `DROP TYPE <name>`.
pub fn drop_type(type_name: &str) -> String {
	format!("DROP TYPE {}", quote_identifier(type_name))
}

/// `ALTER TABLE <table> ADD <column> <type>` with NOT NULL / DEFAULT clauses
/// from the descriptor.
pub fn add_column(table: &str, column: &ColumnDescriptor) -> String {
	let mut sql = format!(
		"ALTER TABLE {} ADD {} {}",
		quote_identifier(table),
		quote_identifier(&column.name),
		quote_identifier(&column.storage_type)
	);
	if let Some(default) = &column.default {
		sql.push_str(&format!(" DEFAULT {default}"));
	}
	if !column.nullable {
		sql.push_str(" NOT NULL");
	}
	sql
}

/// `ALTER TABLE <table> ALTER <column> TYPE <type>`.
pub fn alter_column_type(table: &str, column: &str, type_name: &str) -> String {
	format!(
		"ALTER TABLE {} ALTER {} TYPE {}",
		quote_identifier(table),
		quote_identifier(column),
		quote_identifier(type_name)
	)
}

/// `ALTER TABLE <table> DROP <column>`.
pub fn drop_column(table: &str, column: &str) -> String {
	format!(
		"ALTER TABLE {} DROP {}",
		quote_identifier(table),
		quote_identifier(column)
	)
}

/// Append the explicit cast PostgreSQL requires when a column's type changes:
/// `ALTER TABLE t ALTER col TYPE ty` becomes
/// `ALTER TABLE t ALTER col TYPE ty USING col::ty`.
///
/// Statements of any other shape are returned unchanged.
pub fn append_using_cast(sql: &str) -> String {
	match ALTER_COLUMN_TYPE_RE.captures(sql) {
		Some(caps) => format!("{sql} USING {}::{}", &caps[1], &caps[2]),
		None => sql.to_string(),
	}
}

/// Quote a value as a PostgreSQL string literal.
fn quote_literal(value: &str) -> String {
	format!("'{}'", value.replace('\'', "''"))
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
	fn create_type_lists_cases_in_declared_order() {
		assert_eq!(
			create_type(&status_type()),
			"CREATE TYPE status_type AS ENUM ('started', 'processing', 'finished')"
		);
	}

	#[test]
	fn add_value_uses_if_not_exists() {
		assert_eq!(
			add_value("status_type", "accepted"),
			"ALTER TYPE status_type ADD VALUE IF NOT EXISTS 'accepted'"
		);
	}

	#[test]
	fn drop_type_statement() {
		assert_eq!(drop_type("status_type"), "DROP TYPE status_type");
	}

	#[test]
	fn mixed_case_identifiers_are_quoted() {
		let definition = EnumDefinition::new("OrderState", "app::OrderState", ["open"])
			.expect("valid definition");
		assert_eq!(
			create_type(&definition),
			"CREATE TYPE \"OrderState\" AS ENUM ('open')"
		);
	}

	#[test]
	fn literals_escape_embedded_quotes() {
		assert_eq!(
			add_value("status_type", "o'clock"),
			"ALTER TYPE status_type ADD VALUE IF NOT EXISTS 'o''clock'"
		);
	}

	#[test]
	fn add_column_with_constraints() {
		let column = crate::column::ColumnDescriptor::new("status", "status_type")
			.default_expr("'started'::status_type");
		assert_eq!(
			add_column("orders", &column),
			"ALTER TABLE orders ADD status status_type DEFAULT 'started'::status_type NOT NULL"
		);
	}

	#[test]
	fn add_nullable_column_omits_not_null() {
		let column = crate::column::ColumnDescriptor::new("status", "status_type").nullable(true);
		assert_eq!(
			add_column("orders", &column),
			"ALTER TABLE orders ADD status status_type"
		);
	}

	#[test]
	fn alter_and_drop_column_statements() {
		assert_eq!(
			alter_column_type("orders", "status", "status_type"),
			"ALTER TABLE orders ALTER status TYPE status_type"
		);
		assert_eq!(drop_column("orders", "status"), "ALTER TABLE orders DROP status");
	}

	#[test]
	fn using_cast_is_appended_to_bare_type_change() {
		let sql = alter_column_type("orders", "status", "other_status_type");
		assert_eq!(
			append_using_cast(&sql),
			"ALTER TABLE orders ALTER status TYPE other_status_type \
			 USING status::other_status_type"
		);
	}

	#[test]
	fn using_cast_leaves_non_matching_statements_alone() {
		let already = "ALTER TABLE orders ALTER status TYPE t USING status::t";
		assert_eq!(append_using_cast(already), already);
		let unrelated = "ALTER TABLE orders DROP status";
		assert_eq!(append_using_cast(unrelated), unrelated);
	}
}
