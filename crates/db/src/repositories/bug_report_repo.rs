//! Repository for the `bug_reports` table.

use bugtracker_core::filter::AdminFilter;
use bugtracker_core::triage::TriageState;
use bugtracker_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::models::bug_report::{BugReport, CreateBugReport};

/// Column list for `bug_reports` queries.
const COLUMNS: &str = "\
    id, name, email, role, browser, issue_type, description, \
    event_time, created_at, screenshot_path, \
    resolved, resolved_by, resolution_description, resolved_at, \
    COALESCE(deleted, false) AS deleted, deleted_at";

/// Admin ordering: unresolved first, then newest first.
const ADMIN_ORDER: &str = "ORDER BY resolved ASC, created_at DESC, id DESC";

/// Provides CRUD and filtered queries for bug reports.
pub struct BugReportRepo;

impl BugReportRepo {
    /// Insert a new bug report, returning the full row with its generated id.
    pub async fn create(pool: &PgPool, input: &CreateBugReport) -> Result<BugReport, sqlx::Error> {
        let query = format!(
            "INSERT INTO bug_reports \
                (name, email, role, browser, issue_type, description, \
                 event_time, created_at, screenshot_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BugReport>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.browser)
            .bind(&input.issue_type)
            .bind(&input.description)
            .bind(input.event_time)
            .bind(input.created_at)
            .bind(&input.screenshot_path)
            .fetch_one(pool)
            .await
    }

    /// Find a bug report by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BugReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bug_reports WHERE id = $1");
        sqlx::query_as::<_, BugReport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of reports matching `filter`, in admin order.
    pub async fn search(
        pool: &PgPool,
        filter: &AdminFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BugReport>, sqlx::Error> {
        let (where_clause, next_idx) = filter_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM bug_reports {where_clause} {ADMIN_ORDER} \
             LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );
        bind_filter(sqlx::query_as::<_, BugReport>(&query), filter)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of reports matching `filter`.
    pub async fn count(pool: &PgPool, filter: &AdminFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM bug_reports {where_clause}");
        let row: (i64,) = bind_filter(sqlx::query_as::<_, (i64,)>(&query), filter)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Every report matching `filter`, in admin order (used by CSV export).
    pub async fn list_all(
        pool: &PgPool,
        filter: &AdminFilter,
    ) -> Result<Vec<BugReport>, sqlx::Error> {
        let (where_clause, _) = filter_clause(filter);
        let query = format!("SELECT {COLUMNS} FROM bug_reports {where_clause} {ADMIN_ORDER}");
        bind_filter(sqlx::query_as::<_, BugReport>(&query), filter)
            .fetch_all(pool)
            .await
    }

    /// Read a report and lock its row for the rest of the transaction.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<BugReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bug_reports WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, BugReport>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite the triage columns of a report. Returns the updated row.
    pub async fn update_triage(
        conn: &mut PgConnection,
        id: DbId,
        state: &TriageState,
    ) -> Result<Option<BugReport>, sqlx::Error> {
        let query = format!(
            "UPDATE bug_reports SET \
                resolved = $1, resolved_by = $2, resolution_description = $3, \
                resolved_at = $4, deleted = $5, deleted_at = $6 \
             WHERE id = $7 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BugReport>(&query)
            .bind(state.resolved)
            .bind(&state.resolved_by)
            .bind(&state.resolution_description)
            .bind(state.resolved_at)
            .bind(state.deleted)
            .bind(state.deleted_at)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}

/// Build the `WHERE` clause for `filter`.
///
/// Returns the clause (empty when nothing is filtered) and the next free
/// positional parameter index. Parameters must be bound with
/// [`bind_filter`], which follows the same order.
fn filter_clause(filter: &AdminFilter) -> (String, usize) {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_idx: usize = 1;

    if filter.issue_type.is_some() {
        conditions.push(format!("issue_type = ${param_idx}"));
        param_idx += 1;
    }
    if filter.resolved.is_some() {
        conditions.push(format!("resolved = ${param_idx}"));
        param_idx += 1;
    }
    if filter.created_from.is_some() {
        conditions.push(format!("created_at >= ${param_idx}"));
        param_idx += 1;
    }
    if filter.created_to.is_some() {
        conditions.push(format!("created_at <= ${param_idx}"));
        param_idx += 1;
    }
    if !filter.include_deleted {
        conditions.push("COALESCE(deleted, false) = false".to_string());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, param_idx)
}

/// Bind the parameters referenced by [`filter_clause`], in order.
fn bind_filter<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &AdminFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    if let Some(issue_type) = filter.issue_type {
        query = query.bind(issue_type);
    }
    if let Some(resolved) = filter.resolved {
        query = query.bind(resolved);
    }
    if let Some(from) = filter.created_from {
        query = query.bind(from);
    }
    if let Some(to) = filter.created_to {
        query = query.bind(to);
    }
    query
}
