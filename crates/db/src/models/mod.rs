//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and the `Deserialize` DTOs that write to it.

pub mod bug_report;
