//! The upload-then-merge flow.
//!
//! [`plan_merge`] checks a selection locally; [`run_merge`] then uploads
//! the planned files, asks the backend to merge them, waits for an
//! asynchronous task when one is returned, and optionally downloads the
//! result.

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::api::{
    ApiClient, ApiEnvelope, MergeOptions, MergeResponse, StatusPoller, StatusResponse,
    UploadedFile,
};
use crate::config::{Config, MAX_UPLOAD_SIZE};
use crate::error::{MergerError, Result};
use crate::output::progress::{DEFAULT_TICK, ProgressBar, animate};
use crate::selection::{FileSelection, SelectedFile};
use crate::summary::{MergeListItem, MergeSummary, merge_list};

/// Files that will be uploaded, in upload order.
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// PDF files to upload.
    pub files: Vec<SelectedFile>,
    /// Sum of their sizes in bytes.
    pub total_size: u64,
}

/// Everything a completed merge produced.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Upload batch identifier.
    pub session_id: String,
    /// Files the backend accepted.
    pub uploaded: Vec<UploadedFile>,
    /// Rendered merge list.
    pub items: Vec<MergeListItem>,
    /// Totals of the merge list.
    pub summary: MergeSummary,
    /// Response of the merge call.
    pub merge: MergeResponse,
    /// Last status of the merge task, if the merge ran asynchronously.
    pub task_status: Option<StatusResponse>,
    /// Where the merged file was saved, if it was downloaded.
    pub downloaded: Option<PathBuf>,
}

/// Order the selection and check it can be uploaded.
///
/// # Errors
///
/// - [`MergerError::NoFilesSelected`] if the selection has no PDF
/// - [`MergerError::PayloadTooLarge`] if the PDFs exceed [`MAX_UPLOAD_SIZE`]
pub fn plan_merge(selection: &mut FileSelection, config: &Config) -> Result<MergePlan> {
    config.order.apply(selection);

    let files: Vec<SelectedFile> = selection.pdf_files().cloned().collect();
    if files.is_empty() {
        return Err(MergerError::NoFilesSelected);
    }

    let total_size = selection.total_size();
    if total_size > MAX_UPLOAD_SIZE {
        return Err(MergerError::PayloadTooLarge {
            size: total_size,
            limit: MAX_UPLOAD_SIZE,
        });
    }

    debug!(files = files.len(), total_size, order = config.order.as_str(), "Planned merge");
    Ok(MergePlan { files, total_size })
}

/// Upload, merge, wait and download.
///
/// When `progress` is given and progress display is enabled, the bar is
/// animated while the upload is in flight. `on_status` sees every status
/// update of an asynchronous merge task.
pub async fn run_merge<F>(
    client: &ApiClient,
    selection: &mut FileSelection,
    config: &Config,
    progress: Option<&mut ProgressBar>,
    on_status: F,
) -> Result<MergeOutcome>
where
    F: FnMut(&StatusResponse),
{
    let plan = plan_merge(selection, config)?;

    info!(files = plan.files.len(), "Uploading files");
    let upload = match progress {
        Some(bar) if config.show_progress => {
            let (upload, _) = tokio::join!(
                client.upload_files(&plan.files),
                animate(&mut *bar, StdRng::from_entropy(), DEFAULT_TICK)
            );
            bar.finish();
            bar.hide();
            upload
        }
        _ => client.upload_files(&plan.files).await,
    }?
    .into_result()?;

    let session_id = upload
        .session_id
        .clone()
        .ok_or_else(|| MergerError::invalid_response("upload response has no session_id"))?;

    let items = merge_list(&upload.files);
    let summary = MergeSummary::from_items(&items);
    info!(
        %session_id,
        accepted = upload.files.len(),
        total_pages = summary.total_pages,
        "Upload complete"
    );

    let options = MergeOptions::new(session_id.clone(), config.output_filename.clone());
    let merge = client.merge_pdfs(&options).await?.into_result()?;

    let task_status = match merge.task_id.as_deref() {
        Some(task_id) => {
            let poller = StatusPoller::new(config.poll_interval, config.max_polls);
            Some(poller.wait_for_completion(client, task_id, on_status).await?)
        }
        None => None,
    };

    let downloaded = match (&config.download_dir, merge.download_url.as_deref()) {
        (Some(dir), Some(url)) => Some(client.download(url, dir).await?),
        (Some(_), None) => {
            return Err(MergerError::invalid_response(
                "merge response has no download_url",
            ));
        }
        _ => None,
    };

    Ok(MergeOutcome {
        session_id,
        uploaded: upload.files,
        items,
        summary,
        merge,
        task_status,
        downloaded,
    })
}
