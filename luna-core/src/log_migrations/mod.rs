//! Log database migrations - embedded SQL files
//!
//! Each entry is (file name, sql). Entries are applied in order, and the
//! names recorded in `sys_migrations` are skipped on later runs.

/// Add new files here in order: NNN_description.sql
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
