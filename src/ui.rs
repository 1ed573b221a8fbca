// UI layer: runs the attach flow phase by phase, showing a spinner for each
// one and delegating every request to `api`.

use crate::api::GiteaClient;
use crate::config::Config;
use crate::schema::Attachment;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Run the whole flow: create or find the release, optionally clear its
/// assets, then upload every attachment.
pub fn run(config: &Config) -> Result<()> {
    let client = GiteaClient::new(config)?;

    let pb = spinner(format!("Resolving release {}...", config.tag));
    if let Err(e) = client.create_release(&config.tag) {
        // The lookup below still finds a release that already existed.
        warn!("Could not create release {}: {}", config.tag, e);
    }
    let release_id = match client.get_release(&config.tag) {
        Ok(id) => id,
        Err(e) => {
            pb.abandon_with_message(format!("Release {} not resolved", config.tag));
            return Err(e).with_context(|| format!("Failed to resolve release {}", config.tag));
        }
    };
    pb.finish_with_message(format!("Release {} is #{}", config.tag, release_id));

    if config.delete {
        match clean_attachments(&client, release_id) {
            Ok(report) if report.failed > 0 => {
                warn!("{} attachment(s) could not be deleted", report.failed)
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping cleanup: {:#}", e),
        }
    }

    let reported = upload_attachments(&client, release_id, &config.attachments)?;
    info!(
        "Uploaded {} attachment(s), {} reported back by the server",
        config.attachments.len(),
        reported.len()
    );
    Ok(())
}

/// Delete every asset of a release.
///
/// Listing failures are returned. Individual deletes are best effort: a
/// failure is logged and the remaining assets are still deleted.
pub fn clean_attachments(client: &GiteaClient, release_id: u64) -> Result<CleanupReport> {
    info!("Cleaning attachments for Release #{}", release_id);
    let assets = client
        .list_assets(release_id)
        .with_context(|| format!("Failed to list attachments of release #{}", release_id))?;

    let pb = spinner(format!("Deleting {} attachment(s)...", assets.len()));
    let mut report = CleanupReport::default();
    for asset in &assets {
        debug!("Deleting asset #{}", asset.id);
        pb.set_message(format!("Deleting {}...", asset.name));
        match client.delete_asset(release_id, asset.id) {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                error!("Failed to delete asset #{} ({}): {}", asset.id, asset.name, e);
                report.failed += 1;
            }
        }
    }
    pb.finish_with_message(format!(
        "Deleted {} attachment(s), {} failed",
        report.deleted, report.failed
    ));
    Ok(report)
}

/// Upload `files` in order. The first failure stops the batch.
pub fn upload_attachments(
    client: &GiteaClient,
    release_id: u64,
    files: &[PathBuf],
) -> Result<Vec<Attachment>> {
    info!("Uploading attachments for Release #{}", release_id);
    let pb = spinner(format!("Uploading {} attachment(s)...", files.len()));

    let mut uploaded = Vec::with_capacity(files.len());
    for path in files {
        pb.set_message(format!("Uploading {}...", path.display()));
        match client.upload_asset(release_id, path) {
            Ok(asset) => uploaded.extend(asset),
            Err(e) => {
                pb.abandon_with_message(format!("Upload of {} failed", path.display()));
                return Err(e).with_context(|| format!("Failed to upload {}", path.display()));
            }
        }
    }
    pb.finish_with_message(format!("Uploaded {} file(s)", files.len()));
    Ok(uploaded)
}
