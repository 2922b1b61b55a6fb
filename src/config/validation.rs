use super::models::Config;
use crate::humanize::ByteSize;
use thiserror::Error;

/// Largest read buffer a worker may allocate
pub const MAX_CHUNK_SIZE: ByteSize = ByteSize::kib(16 * 1024);

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Timeout must be positive: {field} = 0")]
    ZeroTimeout { field: &'static str },

    #[error("fetch.chunk_size must be positive")]
    ZeroChunkSize,

    #[error("fetch.chunk_size ({actual}) exceeds limit of {limit}")]
    ChunkSizeTooLarge { actual: ByteSize, limit: ByteSize },

    #[error("dispatch.max_parallel must be at least 1")]
    ZeroMaxParallel,

    #[error("dispatch.default_parallel ({value}) must be between 1 and max_parallel ({max})")]
    DefaultParallelOutOfRange { value: i64, max: usize },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_timeouts(config)?;
    validate_fetch(config)?;
    validate_dispatch(config)?;
    Ok(())
}

fn validate_timeouts(config: &Config) -> Result<(), ValidationError> {
    let http = &config.http;
    let timeouts = [
        ("http.tcp_connect_timeout_ms", http.tcp_connect_timeout_ms),
        ("http.tls_handshake_timeout_ms", http.tls_handshake_timeout_ms),
        ("http.response_header_timeout_ms", http.response_header_timeout_ms),
        ("http.request_timeout_ms", http.request_timeout_ms),
    ];

    match timeouts.iter().find(|(_, value)| *value == 0) {
        Some((field, _)) => Err(ValidationError::ZeroTimeout { field: *field }),
        None => Ok(()),
    }
}

fn validate_fetch(config: &Config) -> Result<(), ValidationError> {
    let chunk_size = config.fetch.chunk_size;

    if chunk_size.as_u64() == 0 {
        return Err(ValidationError::ZeroChunkSize);
    }

    if chunk_size > MAX_CHUNK_SIZE {
        return Err(ValidationError::ChunkSizeTooLarge {
            actual: chunk_size,
            limit: MAX_CHUNK_SIZE,
        });
    }

    Ok(())
}

/// `default_parallel` is checked here even though `--parallel` values are
/// clamped at runtime: a bad default is a config mistake
fn validate_dispatch(config: &Config) -> Result<(), ValidationError> {
    let dispatch = &config.dispatch;

    if dispatch.max_parallel == 0 {
        return Err(ValidationError::ZeroMaxParallel);
    }

    let within_max = usize::try_from(dispatch.default_parallel)
        .is_ok_and(|value| value <= dispatch.max_parallel);
    if dispatch.default_parallel < 1 || !within_max {
        return Err(ValidationError::DefaultParallelOutOfRange {
            value: dispatch.default_parallel,
            max: dispatch.max_parallel,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.http.response_header_timeout_ms = 0;

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::ZeroTimeout {
                field: "http.response_header_timeout_ms"
            })
        ));
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut config = Config::default();
        config.fetch.chunk_size = ByteSize(0);

        assert!(matches!(validate(&config), Err(ValidationError::ZeroChunkSize)));
    }

    #[test]
    fn test_chunk_size_upper_bound() {
        let mut config = Config::default();

        config.fetch.chunk_size = MAX_CHUNK_SIZE;
        assert!(validate(&config).is_ok());

        config.fetch.chunk_size = "4GB".parse().unwrap();
        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::ChunkSizeTooLarge { limit, .. }) if limit == ByteSize::kib(16 * 1024)
        ));
        assert_eq!(
            result.unwrap_err().to_string(),
            "fetch.chunk_size (4GB) exceeds limit of 16MB"
        );
    }

    #[test]
    fn test_zero_max_parallel() {
        let mut config = Config::default();
        config.dispatch.max_parallel = 0;

        assert!(matches!(validate(&config), Err(ValidationError::ZeroMaxParallel)));
    }

    #[test]
    fn test_default_parallel_out_of_range() {
        let mut config = Config::default();

        config.dispatch.default_parallel = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::DefaultParallelOutOfRange { value: 0, max: 10 })
        ));

        config.dispatch.default_parallel = 11;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::DefaultParallelOutOfRange { value: 11, max: 10 })
        ));
    }
}
