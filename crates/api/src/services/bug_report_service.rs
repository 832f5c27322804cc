//! Admin search, export and bulk triage over bug reports.

use bugtracker_core::error::CoreError;
use bugtracker_core::pagination::{clamp_page, clamp_page_size, page_offset, total_pages};
use bugtracker_core::triage::apply_change;
use bugtracker_core::types::Timestamp;
use bugtracker_db::models::bug_report::{
    BugReport, BugReportPage, BulkUpdateItem, BulkUpdateSummary,
};
use bugtracker_db::repositories::BugReportRepo;
use bugtracker_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::query::AdminIssueParams;

pub struct BugReportService;

impl BugReportService {
    /// One page of the admin listing for `params`.
    pub async fn search(pool: &DbPool, params: &AdminIssueParams) -> AppResult<BugReportPage> {
        let filter = params.filter();
        let page = clamp_page(params.page);
        let size = clamp_page_size(params.size);

        let items = BugReportRepo::search(pool, &filter, size, page_offset(page, size)).await?;
        let total = BugReportRepo::count(pool, &filter).await?;

        Ok(BugReportPage {
            items,
            total,
            page,
            size,
            total_pages: total_pages(total, size),
        })
    }

    /// Every report matching `params`, ignoring pagination.
    pub async fn export(pool: &DbPool, params: &AdminIssueParams) -> AppResult<Vec<BugReport>> {
        Ok(BugReportRepo::list_all(pool, &params.filter()).await?)
    }

    /// Apply `items` in a single transaction.
    ///
    /// Entries without an id, or naming a report that does not exist, are
    /// skipped. Any rule violation aborts the whole batch; the transaction
    /// is rolled back when it is dropped uncommitted.
    pub async fn bulk_update(
        pool: &DbPool,
        items: &[BulkUpdateItem],
        now: Timestamp,
    ) -> AppResult<BulkUpdateSummary> {
        if items.is_empty() {
            return Err(AppError::BadRequest("No updates provided".to_string()));
        }

        let mut tx = pool.begin().await?;
        let mut summary = BulkUpdateSummary::default();

        for item in items {
            let Some(id) = item.id else {
                summary.skipped += 1;
                continue;
            };
            let Some(current) = BugReportRepo::find_by_id_for_update(&mut *tx, id).await? else {
                tracing::debug!(bug_report_id = id, "Bulk update skipped unknown report");
                summary.skipped += 1;
                continue;
            };

            let next = apply_change(id, &current.triage_state(), &item.to_change(), now)?;
            BugReportRepo::update_triage(&mut *tx, id, &next)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "BugReport",
                    id,
                }))?;
            summary.updated += 1;
        }

        tx.commit().await?;

        tracing::info!(
            updated = summary.updated,
            skipped = summary.skipped,
            "Bulk update committed",
        );

        Ok(summary)
    }
}
