// Certificate inspector - leaf certificate expiry over a TLS handshake

use crate::error::CertificateFetchError;
use chrono::{DateTime, Utc};
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::ServerName;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tracing::warn;
use x509_parser::prelude::*;

/// Fetches the expiry timestamp of a host's leaf certificate.
///
/// The handshake exists purely for expiry introspection: the chain is
/// not validated beyond what the handshake itself enforces, and when a
/// verified handshake fails, one fallback attempt runs with
/// verification disabled to tolerate servers with nonstandard
/// negotiation quirks.
pub struct CertificateInspector {
    connect_timeout: Duration,
    handshake_timeout: Duration,
}

impl Default for CertificateInspector {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

impl CertificateInspector {
    pub fn new(connect_timeout: Duration, handshake_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            handshake_timeout,
        }
    }

    /// Fetch the "not valid after" timestamp of `host`'s leaf
    /// certificate, using `host` as the SNI server name.
    pub async fn inspect(&self, host: &str) -> Result<DateTime<Utc>, CertificateFetchError> {
        match self.fetch_not_after(host, false).await {
            Ok(not_after) => Ok(not_after),
            Err(CertificateFetchError::Handshake { source, .. }) => {
                warn!(
                    "verified handshake with {} failed ({}), retrying without verification",
                    host, source
                );
                self.fetch_not_after(host, true).await
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_not_after(
        &self,
        host: &str,
        skip_verification: bool,
    ) -> Result<DateTime<Utc>, CertificateFetchError> {
        let tcp = timeout(
            self.connect_timeout,
            TcpStream::connect((host.to_string(), 443u16)),
        )
        .await
        .map_err(|_| CertificateFetchError::Timeout {
            host: host.to_string(),
        })?
        .map_err(|source| CertificateFetchError::Connect {
            host: host.to_string(),
            source,
        })?;

        let config = if skip_verification {
            ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerification))
                .with_no_client_auth()
        } else {
            let mut root_store = RootCertStore::empty();
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth()
        };

        let connector = TlsConnector::from(Arc::new(config));
        let server_name = ServerName::try_from(host.to_string()).map_err(|_| {
            CertificateFetchError::InvalidServerName {
                host: host.to_string(),
            }
        })?;

        let tls = timeout(self.handshake_timeout, connector.connect(server_name, tcp))
            .await
            .map_err(|_| CertificateFetchError::Timeout {
                host: host.to_string(),
            })?
            .map_err(|source| CertificateFetchError::Handshake {
                host: host.to_string(),
                source,
            })?;

        let (_, connection) = tls.get_ref();
        let leaf = connection
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or_else(|| CertificateFetchError::NoCertificate {
                host: host.to_string(),
            })?;

        parse_not_after(leaf.as_ref()).map_err(|message| CertificateFetchError::Parse {
            host: host.to_string(),
            message,
        })
    }
}

/// Parse the "not valid after" field of a DER-encoded certificate
fn parse_not_after(der: &[u8]) -> Result<DateTime<Utc>, String> {
    let (_, cert) = X509Certificate::from_der(der).map_err(|e| e.to_string())?;
    let seconds = cert.validity().not_after.timestamp();
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or_else(|| format!("expiry timestamp out of range: {}", seconds))
}

/// Verifier for the fallback path: accepts any certificate.
///
/// Only reachable after a verified handshake has already failed, and
/// only to read the expiry field from whatever the server presents.
#[derive(Debug)]
struct NoVerification;

impl rustls::client::danger::ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls_pki_types::CertificateDer<'_>,
        _intermediates: &[rustls_pki_types::CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls_pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls_pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls_pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
