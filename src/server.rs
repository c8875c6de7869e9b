use crate::err::{ConfigError, Error};
use crate::http::run_simple_server;
use crate::routes::{respond_to_request, State};
use crate::scheme::Scheme;
use crate::tls;
use hyper::body::Incoming;
use std::path::PathBuf;
use tokio::net::TcpListener;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
}

/// Load TLS material (for https), bind, and serve until the listener fails.
/// Nothing is bound if the TLS material can't be loaded.
pub async fn run(config: Config, state: State) -> Result<(), Error> {
    let Config {
        host,
        port,
        cert,
        key,
    } = config;

    let tls = match state.scheme {
        Scheme::Https => match (cert, key) {
            (Some(cert), Some(key)) => Some(tls::load(&cert, &key)?),
            _ => return Err(ConfigError::MissingTlsMaterial.into()),
        },
        Scheme::Http => {
            if cert.is_some() || key.is_some() {
                log::warn!("Ignoring --cert and --key, since the scheme is http");
            }
            None
        }
    };

    let listener = TcpListener::bind((host.as_str(), port)).await?;

    log::info!(
        "Listening for {} requests on {}:{} ({})",
        state.scheme,
        host,
        port,
        listener.local_addr()?
    );
    log::info!("(Don't forget to point the redirected domains here, e.g. via /etc/hosts)");
    if state.rules.is_empty() {
        log::warn!("No patterns configured, every request will get a 404");
    } else {
        log::info!("URL patterns being redirected:");
        for (i, pattern) in state.rules.patterns().enumerate() {
            log::info!("    {}. '{}'", i + 1, pattern);
        }
    }

    run_simple_server(listener, tls, state, respond_to_request::<Incoming>).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, Rules};
    use hyper::StatusCode;
    use rustls::crypto::ring;
    use rustls::pki_types::ServerName;
    use rustls::{ClientConfig, RootCertStore};
    use std::fs::File;
    use std::io::BufReader;
    use std::net::SocketAddr;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio_rustls::TlsConnector;

    fn repo_state(scheme: Scheme) -> State {
        State {
            scheme,
            status: StatusCode::TEMPORARY_REDIRECT,
            rules: Rules::new(vec![
                Rule::from_template(
                    r"^https?://example.com/(.+)/(.+).git/?$".parse().unwrap(),
                    "https://real.com/$1/$2".parse().unwrap(),
                ),
                Rule::from_template(
                    r"^https?://example.com/(.+)$".parse().unwrap(),
                    "https://real.com/$1".parse().unwrap(),
                ),
            ]),
        }
    }

    async fn unused_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    /// Send a bodyless GET and return the lowercased response head.
    async fn exchange<S>(mut stream: S, host: &str, path: &str) -> String
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let req = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, host
        );
        stream.write_all(req.as_bytes()).await.unwrap();
        let mut resp = Vec::new();
        let mut buf = [0; 1024];
        while !resp.ends_with(b"\r\n\r\n") {
            match stream.read(&mut buf).await.unwrap() {
                0 => break,
                n => resp.extend_from_slice(&buf[..n]),
            }
        }
        String::from_utf8(resp).unwrap().to_ascii_lowercase()
    }

    async fn raw_request(addr: SocketAddr, host: &str, path: &str) -> String {
        exchange(TcpStream::connect(addr).await.unwrap(), host, path).await
    }

    fn testdata(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
    }

    fn localhost_connector() -> TlsConnector {
        let mut roots = RootCertStore::empty();
        let pem = File::open(testdata("localhost.crt")).unwrap();
        for cert in rustls_pemfile::certs(&mut BufReader::new(pem)) {
            roots.add(cert.unwrap()).unwrap();
        }
        let config = ClientConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_root_certificates(roots)
            .with_no_client_auth();
        TlsConnector::from(Arc::new(config))
    }

    async fn tls_request(addr: SocketAddr, host: &str, path: &str) -> String {
        let tcp = TcpStream::connect(addr).await.unwrap();
        let name = ServerName::try_from("localhost").unwrap();
        let stream = localhost_connector().connect(name, tcp).await.unwrap();
        exchange(stream, host, path).await
    }

    async fn spawn_https() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let acceptor = tls::load(&testdata("localhost.crt"), &testdata("localhost.key")).unwrap();
        tokio::spawn(run_simple_server(
            listener,
            Some(acceptor),
            repo_state(Scheme::Https),
            respond_to_request::<Incoming>,
        ));
        addr
    }

    #[tokio::test]
    async fn serves_redirects_over_http() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(run_simple_server(
            listener,
            None,
            repo_state(Scheme::Http),
            respond_to_request::<Incoming>,
        ));

        let resp = raw_request(addr, "example.com", "/foo/bar.git").await;
        assert!(resp.starts_with("http/1.1 307"), "{}", resp);
        assert!(resp.contains("location: https://real.com/foo/bar\r\n"), "{}", resp);

        let resp = raw_request(addr, "other.com", "/foo/bar.git").await;
        assert!(resp.starts_with("http/1.1 404"), "{}", resp);
        assert!(!resp.contains("location:"), "{}", resp);
        assert!(resp.ends_with("\r\n\r\n"), "{}", resp);
    }

    #[tokio::test]
    async fn serves_redirects_over_https() {
        let addr = spawn_https().await;

        let resp = tls_request(addr, "example.com", "/foo/bar.git").await;
        assert!(resp.starts_with("http/1.1 307"), "{}", resp);
        assert!(resp.contains("location: https://real.com/foo/bar\r\n"), "{}", resp);

        let resp = tls_request(addr, "other.com", "/x").await;
        assert!(resp.starts_with("http/1.1 404"), "{}", resp);
    }

    #[tokio::test]
    async fn failed_handshake_does_not_stop_listener() {
        let addr = spawn_https().await;

        let mut plain = TcpStream::connect(addr).await.unwrap();
        plain
            .write_all(b"GET /x HTTP/1.1\r\nHost: example.com\r\n\r\n")
            .await
            .unwrap();
        let mut rest = Vec::new();
        // the server drops the connection (possibly after a TLS alert); either way it never answers in plain text
        let _ = plain.read_to_end(&mut rest).await;
        assert!(!rest.starts_with(b"HTTP/"));

        let resp = tls_request(addr, "example.com", "/x").await;
        assert!(resp.starts_with("http/1.1 307"), "{}", resp);
        assert!(resp.contains("location: https://real.com/x\r\n"), "{}", resp);
    }

    #[tokio::test]
    async fn missing_certificate_aborts_before_binding() {
        let port = unused_port().await;
        let config = Config {
            host: "127.0.0.1".to_string(),
            port,
            cert: Some(testdata("does-not-exist.crt")),
            key: Some(testdata("localhost.key")),
        };

        let e = run(config, repo_state(Scheme::Https)).await.unwrap_err();
        assert!(
            matches!(e.downcast_ref::<ConfigError>(), Some(ConfigError::Read { .. })),
            "{}",
            e
        );
        TcpListener::bind(("127.0.0.1", port)).await.unwrap();
    }

    #[tokio::test]
    async fn https_requires_tls_material() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: unused_port().await,
            cert: None,
            key: None,
        };
        let e = run(config, repo_state(Scheme::Https)).await.unwrap_err();
        assert!(
            matches!(e.downcast_ref::<ConfigError>(), Some(ConfigError::MissingTlsMaterial)),
            "{}",
            e
        );
    }
}
