use crate::err::ConfigError;
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn from_port(port: u16) -> Option<Self> {
        [Scheme::Http, Scheme::Https]
            .into_iter()
            .find(|s| s.default_port() == port)
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scheme `{0}`, expected `http` or `https`")]
pub struct UnknownScheme(String);

impl FromStr for Scheme {
    type Err = UnknownScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            _ => Err(UnknownScheme(s.to_string())),
        }
    }
}

/// Fill in whichever of scheme and port was not given, using the fixed default port table.
pub fn resolve(scheme: Option<Scheme>, port: Option<u16>) -> Result<(Scheme, u16), ConfigError> {
    match (scheme, port) {
        (Some(scheme), Some(port)) => Ok((scheme, port)),
        (Some(scheme), None) => Ok((scheme, scheme.default_port())),
        (None, Some(port)) => match Scheme::from_port(port) {
            Some(scheme) => Ok((scheme, port)),
            None => Err(ConfigError::UnsupportedPort(port)),
        },
        (None, None) => Ok((Scheme::Http, Scheme::Http.default_port())),
    }
}
