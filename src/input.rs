//! Input preparation: URL normalization and parallelism clamping

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Fallback when the requested parallelism is below 1
pub const DEFAULT_PARALLEL: usize = 1;

const DEFAULT_SCHEME_PREFIX: &str = "http://";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("No urls")]
    NoUrls,

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL '{0}' has no host")]
    MissingHost(String),
}

/// Turn raw arguments into a duplicate-free list of fetchable URLs.
///
/// Entries without a scheme get `http://` prepended. The first occurrence of
/// each URL keeps its position. Returned strings are the prefixed inputs as
/// given, not re-serialized.
pub fn normalize_urls(raw: &[String]) -> Result<Vec<String>, InputError> {
    if raw.is_empty() {
        return Err(InputError::NoUrls);
    }

    let mut seen = HashSet::with_capacity(raw.len());
    let mut urls = Vec::with_capacity(raw.len());

    for entry in raw {
        let entry = entry.trim();
        let candidate = if entry.contains("://") {
            entry.to_string()
        } else {
            format!("{}{}", DEFAULT_SCHEME_PREFIX, entry)
        };

        let parsed = Url::parse(&candidate).map_err(|source| InputError::InvalidUrl {
            url: candidate.clone(),
            source,
        })?;
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(InputError::MissingHost(candidate));
        }

        if seen.insert(candidate.clone()) {
            urls.push(candidate);
        }
    }

    Ok(urls)
}

/// A correction applied by [`parallel_count`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParallelAdjustment {
    BelowMinimum { requested: i64 },
    AboveLimit { requested: usize, limit: usize },
    AboveUrlCount { requested: usize, url_count: usize },
}

impl fmt::Display for ParallelAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParallelAdjustment::BelowMinimum { requested } => write!(
                f,
                "ignoring parallel request count {} because it is less than 1",
                requested
            ),
            ParallelAdjustment::AboveLimit { requested, limit } => write!(
                f,
                "ignoring parallel request count {} because it is more than the limit {}",
                requested, limit
            ),
            ParallelAdjustment::AboveUrlCount {
                requested,
                url_count,
            } => write!(
                f,
                "ignoring parallel request count {} because it is more than the url count {}",
                requested, url_count
            ),
        }
    }
}

/// Clamp the requested parallelism to `[1, limit]` and to `url_count`.
///
/// Every correction is reported through `on_adjust`; none is an error.
pub fn parallel_count(
    requested: i64,
    url_count: usize,
    limit: usize,
    mut on_adjust: impl FnMut(ParallelAdjustment),
) -> usize {
    let mut count = if requested < 1 {
        on_adjust(ParallelAdjustment::BelowMinimum { requested });
        DEFAULT_PARALLEL
    } else {
        usize::try_from(requested).unwrap_or(usize::MAX)
    };

    if count > limit {
        on_adjust(ParallelAdjustment::AboveLimit {
            requested: count,
            limit,
        });
        count = limit;
    }

    if count > url_count {
        on_adjust(ParallelAdjustment::AboveUrlCount {
            requested: count,
            url_count,
        });
        count = url_count;
    }

    count
}
