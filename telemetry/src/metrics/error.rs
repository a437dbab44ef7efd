use std::fmt;

/// Error returned when the request metrics cannot be created or registered.
#[derive(Debug)]
pub enum MetricsError {
    /// Underlying Prometheus failure, e.g. a duplicate registration.
    Prometheus(prometheus::Error),
}

impl From<prometheus::Error> for MetricsError {
    fn from(e: prometheus::Error) -> Self {
        MetricsError::Prometheus(e)
    }
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::Prometheus(e) => write!(f, "prometheus error: {e}"),
        }
    }
}

impl std::error::Error for MetricsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricsError::Prometheus(e) => Some(e),
        }
    }
}
