use crate::config::{DEFAULT_HOST, DEFAULT_STATUS};
use crate::rules::Pattern;
use crate::scheme::Scheme;
use crate::template::Template;
use clap::{ArgAction, Parser};
use hyper::StatusCode;
use std::path::PathBuf;
use std::str::FromStr;

/// Intercept HTTP(S) requests for a hostname and redirect them elsewhere
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Hostname or address to listen on
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(
        help = "Port to listen on (--help for more)",
        long_help = r"Port to listen on:
    - defaults to 80 for http and 443 for https
    - without --scheme, must be 80 or 443 so the scheme can be inferred"
    )]
    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(
        help = "Scheme of incoming connections: http or https (--help for more)",
        long_help = r"Scheme of incoming connections:
    - http: plain connections
    - https: TLS connections, requires --cert and --key
    - inferred from --port when omitted, http if neither is given
    - also the scheme used when reconstructing request URLs for matching"
    )]
    #[arg(long, value_parser = Scheme::from_str)]
    pub scheme: Option<Scheme>,

    /// Status code of redirect responses (must be 3xx)
    #[arg(long, default_value = DEFAULT_STATUS, value_parser = redirect_status)]
    pub status: StatusCode,

    /// PEM certificate chain, valid for every redirected domain (https only)
    #[arg(long, requires = "key")]
    pub cert: Option<PathBuf>,

    /// PEM private key matching --cert (https only)
    #[arg(long, requires = "cert")]
    pub key: Option<PathBuf>,

    #[arg(
        help = "URL patterns to redirect from (--help for more)",
        long_help = r"URL patterns to redirect from:
    - regular expressions matched against the whole reconstructed URL (scheme://host/path?query)
    - each pattern is checked in order, and the first match is chosen
    - 404s if no patterns match
Examples:
    - ^https?://example.com/(.+)$
    - ^(https?)://(fake.host)/([^/]+)/([^/]+.git/?)(.+)?$"
    )]
    #[arg(short, long, display_order = 0, value_parser = Pattern::from_str)]
    pub from: Vec<Pattern>,

    #[arg(
        help = "Redirect targets, one per pattern (--help for more)",
        long_help = r"Redirect targets, one per pattern:
    - $N or ${N} is replaced by the pattern's Nth capture group (starting at 1)
    - groups that did not participate in the match are replaced by nothing
    - $$ is a literal $
Examples:
    - https://real.com/$1
    - $1://github.com/$3/$4$5"
    )]
    #[arg(short, long, display_order = 0, value_parser = Template::from_str)]
    pub to: Vec<Template>,
}

fn redirect_status(arg: &str) -> Result<StatusCode, String> {
    let status = StatusCode::from_str(arg).map_err(|e| e.to_string())?;
    if status.is_redirection() {
        Ok(status)
    } else {
        Err(format!("{} is not a redirection status", status))
    }
}
