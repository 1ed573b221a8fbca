// API client module: a small blocking HTTP client for the Gitea releases API.
// Every request carries basic auth, every response status is checked against
// the set the endpoint is allowed to return.

use crate::config::{Config, Credentials};
use crate::error::{AttachError, Result};
use crate::schema::{Attachment, CreateReleaseRequest, Release};
use log::{debug, info, trace};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

/// Statuses accepted when creating a release. 409 means it already exists.
const CREATE_OK: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED, StatusCode::CONFLICT];
/// Statuses accepted when listing releases or assets.
const LIST_OK: &[StatusCode] = &[StatusCode::OK, StatusCode::CONFLICT];
/// Statuses accepted when deleting an asset.
const DELETE_OK: &[StatusCode] = &[StatusCode::OK, StatusCode::NO_CONTENT, StatusCode::CONFLICT];
/// Statuses accepted when uploading an asset.
const UPLOAD_OK: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED, StatusCode::CONFLICT];

/// Client bound to one repository and one set of credentials.
#[derive(Clone)]
pub struct GiteaClient {
    client: Client,
    api_root: String,
    credentials: Credentials,
}

impl GiteaClient {
    /// Build a client for the repository and credentials in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AttachError::Client)?;
        Ok(GiteaClient {
            client,
            api_root: config.repo.api_root(),
            credentials: config.credentials.clone(),
        })
    }

    /// Full URL of a path below the repository API root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    /// Create a release named and tagged `tag`. An existing release is not an error.
    pub fn create_release(&self, tag: &str) -> Result<()> {
        info!("Creating Release");
        let url = self.endpoint("releases");
        debug!("POST: {}", url);

        let res = self
            .authed(self.client.post(&url))
            .json(&CreateReleaseRequest::for_tag(tag))
            .send()?;
        let res = expect_status(res, CREATE_OK)?;
        if res.status() == StatusCode::CONFLICT {
            debug!("Release {} already exists", tag);
        } else {
            debug!("Release created successfully!");
        }
        Ok(())
    }

    /// Fetch every release of the repository.
    pub fn list_releases(&self) -> Result<Vec<Release>> {
        info!("Fetching Releases");
        let url = self.endpoint("releases");
        debug!("GET: {}", url);

        let res = self.authed(self.client.get(&url)).send()?;
        let releases: Vec<Release> = decode(expect_status(res, LIST_OK)?)?;
        debug!("Releases parsed successfully! ({} found)", releases.len());
        Ok(releases)
    }

    /// Id of the release whose name and tag both equal `tag`.
    pub fn get_release(&self, tag: &str) -> Result<u64> {
        let releases = self.list_releases()?;
        let release = find_release(&releases, tag).ok_or_else(|| AttachError::NoRelease {
            tag: tag.to_string(),
        })?;
        debug!("Target Release found: {}", release.id);
        Ok(release.id)
    }

    /// Fetch the assets attached to a release.
    pub fn list_assets(&self, release_id: u64) -> Result<Vec<Attachment>> {
        let url = self.endpoint(&format!("releases/{}/assets", release_id));
        debug!("GET: {}", url);

        let res = self.authed(self.client.get(&url)).send()?;
        let assets: Vec<Attachment> = decode(expect_status(res, LIST_OK)?)?;
        debug!("Attachments parsed successfully! ({} found)", assets.len());
        Ok(assets)
    }

    /// Delete a single asset from a release.
    pub fn delete_asset(&self, release_id: u64, asset_id: u64) -> Result<()> {
        let url = self.endpoint(&format!("releases/{}/assets/{}", release_id, asset_id));
        debug!("DELETE: {}", url);

        let res = self.authed(self.client.delete(&url)).send()?;
        expect_status(res, DELETE_OK)?;
        Ok(())
    }

    /// Upload one file as a release asset, named after the file's base name.
    ///
    /// The file is opened here and closed once the request has been sent.
    /// Returns the asset the server reports, or `None` when the response body
    /// is empty (Gitea answers 409 without one).
    pub fn upload_asset(&self, release_id: u64, path: &Path) -> Result<Option<Attachment>> {
        let url = self.endpoint(&format!("releases/{}/assets", release_id));
        debug!("POST: {} ({})", url, path.display());

        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| AttachError::MissingAttachment(path.to_path_buf()))?;

        let part = multipart::Part::reader_with_length(file, len)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part("attachment", part);

        let res = self.authed(self.client.post(&url)).multipart(form).send()?;
        let body = expect_status(res, UPLOAD_OK)?.text()?;
        trace!("Body: {}", body);

        if body.trim().is_empty() {
            return Ok(None);
        }
        // A 409 body is an error message, not an attachment.
        Ok(serde_json::from_str(&body).ok())
    }
}

/// First release in `releases` whose name and tag both equal `tag`.
pub fn find_release<'a>(releases: &'a [Release], tag: &str) -> Option<&'a Release> {
    releases.iter().find(|release| release.matches_tag(tag))
}

/// Pass the response through when its status is in `accepted`.
fn expect_status(res: Response, accepted: &[StatusCode]) -> Result<Response> {
    let status = res.status();
    if accepted.contains(&status) {
        return Ok(res);
    }
    let body = res.text().unwrap_or_default();
    debug!("Unexpected response HTTP {}: {}", status, body);
    Err(AttachError::Response { status, body })
}

fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
    let body = res.text()?;
    trace!("Body: {}", body);
    Ok(serde_json::from_str(&body)?)
}
