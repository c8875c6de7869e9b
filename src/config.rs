pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Preserves the request method (and body) across the redirect.
pub const DEFAULT_STATUS: &str = "307";

pub const ALPN_PROTOCOLS: [&[u8]; 2] = [b"h2", b"http/1.1"];
