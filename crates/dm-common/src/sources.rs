use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::MatchError;
use crate::PlatformProfile;

/// Platforms a profile can be sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    Linkedin,
    Leetcode,
    Codeforces,
    Generic,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Linkedin => "linkedin",
            Platform::Leetcode => "leetcode",
            Platform::Codeforces => "codeforces",
            Platform::Generic => "generic",
        }
    }

    /// Parse a platform tag. Unknown tags are an `UnsupportedPlatform`
    /// error, surfaced to the immediate caller.
    pub fn parse(tag: &str) -> Result<Self, MatchError> {
        match tag.trim().to_lowercase().as_str() {
            "github" => Ok(Platform::Github),
            "linkedin" => Ok(Platform::Linkedin),
            "leetcode" => Ok(Platform::Leetcode),
            "codeforces" => Ok(Platform::Codeforces),
            "generic" => Ok(Platform::Generic),
            other => Err(MatchError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yields raw profile records for one platform. Implementations (scrapers,
/// API clients) live outside the core; the core only sees this contract.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Fetch the raw record for a username. `Ok(None)` means not found.
    async fn fetch_profile(&self, username: &str) -> Result<Option<Value>, MatchError>;
}

/// Yields raw job records (fetched or built from a spec).
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_or_build_job(&self, spec: &Value) -> Result<Value, MatchError>;
}

/// Registry of profile sources, keyed by platform.
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<Platform, Arc<dyn ProfileSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Arc<dyn ProfileSource>) -> &mut Self {
        self.sources.insert(source.platform(), source);
        self
    }

    pub fn get(&self, platform: Platform) -> Result<&Arc<dyn ProfileSource>, MatchError> {
        self.sources
            .get(&platform)
            .ok_or_else(|| MatchError::UnsupportedPlatform(platform.to_string()))
    }

    /// Fetch one profile per (platform tag, username) pair. Unsupported
    /// platforms and individual fetch failures are logged and skipped so a
    /// single bad platform never sinks the whole fan-out.
    pub async fn fetch_profiles(&self, requests: &[(String, String)]) -> Vec<PlatformProfile> {
        let mut profiles = Vec::new();

        for (tag, username) in requests {
            let platform = match Platform::parse(tag) {
                Ok(platform) => platform,
                Err(err) => {
                    warn!(platform = tag.as_str(), error = %err, "skipping platform");
                    continue;
                }
            };

            let source = match self.get(platform) {
                Ok(source) => source,
                Err(err) => {
                    warn!(platform = %platform, error = %err, "no source registered; skipping");
                    continue;
                }
            };

            match source.fetch_profile(username).await {
                Ok(Some(record)) if !record.is_object() => {
                    let err = MatchError::MalformedRecord(format!(
                        "{platform} profile for {username} is not an object"
                    ));
                    warn!(platform = %platform, username = username.as_str(), error = %err, "skipping malformed record");
                }
                Ok(Some(record)) => profiles.push(PlatformProfile::new(platform, record)),
                Ok(None) => {
                    warn!(platform = %platform, username = username.as_str(), "profile not found");
                }
                Err(err) => {
                    warn!(platform = %platform, username = username.as_str(), error = %err, "fetch failed; skipping");
                }
            }
        }

        profiles
    }
}
