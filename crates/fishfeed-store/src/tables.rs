//! redb table definitions for the bracket store.

use redb::TableDefinition;

/// Feed brackets keyed by `{weight_range}/{t_range}`.
pub const BRACKETS: TableDefinition<&str, &[u8]> = TableDefinition::new("brackets");
