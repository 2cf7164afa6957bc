//! Build metadata injected at link time.
//!
//! Release pipelines usually pass the release tag, commit and build number
//! as environment variables to the compiler and read them back with
//! `option_env!`. [`BuildInfo::parse`] turns those strings into an
//! immutable value that is then handed to the loaders as a dependency:
//!
//! ```rust
//! use tagconf::{BuildInfo, Dependencies};
//!
//! // Typically option_env!("BUILD_NUMBER") and friends.
//! let build = BuildInfo::parse(
//!     "v1.4.0",
//!     "4c3452b0f00d4c3452b0f00d4c3452b0f00d4c34",
//!     "4c3452b0",
//!     "812",
//!     "1700000000",
//! )?;
//!
//! let deps = Dependencies::new().with(build);
//! assert_eq!(deps.get::<BuildInfo>().map(BuildInfo::build_number), Some(812));
//! # Ok::<(), tagconf::Error>(())
//! ```

use chrono::{DateTime, Utc};

use crate::error::Error;

const DEFAULT_RELEASE_TAG: &str = "v0.0.2-4c3452b-100500";
const DEFAULT_COMMIT_ID: &str = "0000000000000000000000000000000000000000";
const DEFAULT_SHORT_COMMIT_ID: &str = "00000000";
const DEFAULT_BUILD_NUMBER: u64 = 100_500;

/// Release tag, commit and build number of the running binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInfo {
    release_tag: String,
    commit_id: String,
    short_commit_id: String,
    build_number: u64,
    build_date: DateTime<Utc>,
}

impl BuildInfo {
    /// Builds metadata from its string forms.
    ///
    /// `build_number` and `build_date_ts` (Unix seconds) must be unsigned
    /// decimal integers.
    pub fn parse(
        release_tag: &str,
        commit_id: &str,
        short_commit_id: &str,
        build_number: &str,
        build_date_ts: &str,
    ) -> Result<Self, Error> {
        let invalid = |field: &'static str, value: &str, reason: String| Error::BuildInfo {
            field,
            value: value.to_owned(),
            reason,
        };

        let timestamp: u64 = build_date_ts
            .parse()
            .map_err(|e: std::num::ParseIntError| invalid("build_date_ts", build_date_ts, e.to_string()))?;

        let build_number: u64 = build_number
            .parse()
            .map_err(|e: std::num::ParseIntError| invalid("build_number", build_number, e.to_string()))?;

        let build_date = i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| invalid("build_date_ts", build_date_ts, "timestamp out of range".to_owned()))?;

        Ok(Self {
            release_tag: release_tag.to_owned(),
            commit_id: commit_id.to_owned(),
            short_commit_id: short_commit_id.to_owned(),
            build_number,
            build_date,
        })
    }

    /// The release tag, e.g. `v1.4.0`.
    #[must_use]
    pub fn release_tag(&self) -> &str {
        &self.release_tag
    }

    /// The full commit id.
    #[must_use]
    pub fn commit_id(&self) -> &str {
        &self.commit_id
    }

    /// The abbreviated commit id.
    #[must_use]
    pub fn short_commit_id(&self) -> &str {
        &self.short_commit_id
    }

    /// The CI build number.
    #[must_use]
    pub const fn build_number(&self) -> u64 {
        self.build_number
    }

    /// The build time.
    #[must_use]
    pub const fn build_date(&self) -> DateTime<Utc> {
        self.build_date
    }

    /// The build time in Unix seconds.
    #[must_use]
    pub fn build_date_ts(&self) -> i64 {
        self.build_date.timestamp()
    }
}

/// Development placeholders, dated now.
impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            release_tag: DEFAULT_RELEASE_TAG.to_owned(),
            commit_id: DEFAULT_COMMIT_ID.to_owned(),
            short_commit_id: DEFAULT_SHORT_COMMIT_ID.to_owned(),
            build_number: DEFAULT_BUILD_NUMBER,
            build_date: Utc::now(),
        }
    }
}
