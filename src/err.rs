use std::fmt::{self, Debug, Display};
use std::io;
use std::path::PathBuf;

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

pub struct DisplayError(Error);

impl Debug for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T: Into<Error>> From<T> for DisplayError {
    fn from(display: T) -> Self {
        DisplayError(display.into())
    }
}

/// Fatal problems with the startup configuration; none of these can occur once the listener is bound.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no scheme is associated with port {0} (only 80 and 443 are known), pass --scheme")]
    UnsupportedPort(u16),
    #[error("https requires both --cert and --key")]
    MissingTlsMaterial,
    #[error("failed to read {}: {}", path.display(), source)]
    Read { path: PathBuf, source: io::Error },
    #[error("no PEM certificates found in {}", .0.display())]
    NoCertificates(PathBuf),
    #[error("no PEM private key found in {}", .0.display())]
    NoPrivateKey(PathBuf),
    #[error("invalid TLS configuration: {0}")]
    Tls(#[from] rustls::Error),
    #[error("got {from} --from patterns but {to} --to templates")]
    RuleCount { from: usize, to: usize },
}

pub trait IoErrorExt {
    fn applies_to(&self) -> AppliesTo;
}

impl IoErrorExt for io::Error {
    fn applies_to(&self) -> AppliesTo {
        match self.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset => AppliesTo::Connection,
            _ => AppliesTo::Listener,
        }
    }
}

pub enum AppliesTo {
    Connection,
    Listener,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_connections_do_not_stop_the_listener() {
        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(matches!(reset.applies_to(), AppliesTo::Connection));

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(denied.applies_to(), AppliesTo::Listener));
    }

    #[test]
    fn display_error_debug_prints_message() {
        let e = DisplayError::from(ConfigError::RuleCount { from: 2, to: 1 });
        assert_eq!(
            format!("{:?}", e),
            "got 2 --from patterns but 1 --to templates"
        );
    }
}
