#![allow(dead_code)]

use gitea_release_attach::config::{Config, Credentials, RepoUrl};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

pub const API: &str = "/api/v1/repos/owner/project";

/// `alice:pw` as sent in the Authorization header.
pub const ALICE_AUTH: &str = "Basic YWxpY2U6cHc=";

/// A mock Gitea server driven from its own runtime, so the blocking client
/// can run on the test thread.
pub struct TestServer {
    // Dropped before the runtime that serves it.
    pub server: MockServer,
    rt: Runtime,
}

impl TestServer {
    pub fn start() -> Self {
        let rt = Runtime::new().expect("failed to start runtime");
        let server = rt.block_on(MockServer::start());
        TestServer { server, rt }
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    pub fn requests_with(&self, method: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.as_str() == method)
            .collect()
    }

    pub fn repo(&self) -> String {
        format!("{}/owner/project", self.server.uri())
    }

    pub fn config(&self, attachments: Vec<PathBuf>) -> Config {
        Config {
            repo: RepoUrl::parse(&self.repo()).expect("mock server URL should decompose"),
            credentials: Credentials {
                username: "alice".into(),
                password: "pw".into(),
            },
            tag: "v1.0".into(),
            delete: false,
            attachments,
            timeout: None,
        }
    }
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write attachment");
    path
}
