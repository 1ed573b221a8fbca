// Library root
// -----------
// This crate exposes the pieces the `gitea-release-attach` binary is built
// from, so they can be driven from tests without spawning the process.
//
// Module responsibilities:
// - `config`: command line arguments, credential resolution and repository
//   URL decomposition.
// - `api`: blocking HTTP client for the Gitea releases endpoints.
// - `schema`: JSON payloads exchanged with Gitea.
// - `ui`: the attach flow (create/resolve, cleanup, upload) with progress
//   spinners.
// - `error`: the error type shared by all of the above.
pub mod api;
pub mod config;
pub mod error;
pub mod schema;
pub mod ui;

pub use error::{AttachError, Result};
