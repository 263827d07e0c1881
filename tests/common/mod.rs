//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{ClientConfig, RootCertStore, ServerConfig};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

/// A mock backend bound to an ephemeral loopback port.
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Number of requests the backend has answered.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A TLS mock backend serving a self-signed `localhost` certificate.
pub struct TlsBackend {
    pub backend: MockBackend,
    /// Client configuration trusting only the backend's certificate.
    pub client_tls: ClientConfig,
}

impl TlsBackend {
    /// `localhost:<port>`, the name the certificate is issued for.
    pub fn host(&self) -> String {
        format!("localhost:{}", self.backend.addr.port())
    }
}

/// Start a backend answering every request with 200 and the given extra header lines.
pub async fn start_mock_backend(extra_headers: &'static str) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(answer(socket, counter.clone(), extra_headers));
        }
    });

    MockBackend { addr, hits }
}

/// Same as [`start_mock_backend`], behind TLS.
pub async fn start_tls_backend(extra_headers: &'static str) -> TlsBackend {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_der = cert.der().clone();
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let server_config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert_der.clone()], key_der)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(server_config));

    let mut roots = RootCertStore::empty();
    roots.add(cert_der).unwrap();
    let client_tls = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let counter = counter.clone();
            tokio::spawn(async move {
                if let Ok(stream) = acceptor.accept(socket).await {
                    answer(stream, counter, extra_headers).await;
                }
            });
        }
    });

    TlsBackend {
        backend: MockBackend { addr, hits },
        client_tls,
    }
}

async fn answer<S>(mut socket: S, counter: Arc<AtomicUsize>, extra_headers: &'static str)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // requests in these tests are bodiless GETs; one read gets the head
    let mut buf = [0u8; 4096];
    let _ = socket.read(&mut buf).await;
    counter.fetch_add(1, Ordering::SeqCst);

    let body = "ok";
    let response = format!(
        "HTTP/1.1 200 OK\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        extra_headers,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// A loopback address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
