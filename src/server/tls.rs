//! Self-signed certificate for the HTTPS listener.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use anyhow::Context;

pub const CERT_FILE: &str = "cert.pem";
pub const KEY_FILE: &str = "key.pem";

/// PEM certificate and private key.
pub struct CertificatePair {
    pub cert_pem: Vec<u8>,
    pub key_pem: Vec<u8>,
    /// True when the pair was created by this call.
    pub generated: bool,
}

/// Load `cert.pem`/`key.pem` from `cert_dir`, or generate and store a fresh
/// self-signed pair when either is missing.
pub async fn get_or_create_certificate(
    cert_dir: &Path,
    bind: &str,
) -> anyhow::Result<CertificatePair> {
    let cert_path = cert_dir.join(CERT_FILE);
    let key_path = cert_dir.join(KEY_FILE);

    if cert_path.exists() && key_path.exists() {
        crate::debug_event!("tls", "loading", "{}", cert_dir.display());
        let cert_pem = tokio::fs::read(&cert_path)
            .await
            .with_context(|| format!("Failed to read {}", cert_path.display()))?;
        let key_pem = tokio::fs::read(&key_path)
            .await
            .with_context(|| format!("Failed to read {}", key_path.display()))?;
        return Ok(CertificatePair {
            cert_pem,
            key_pem,
            generated: false,
        });
    }

    tokio::fs::create_dir_all(cert_dir)
        .await
        .with_context(|| format!("Failed to create {}", cert_dir.display()))?;

    let subject_alt_names = subject_alt_names(bind);
    let cert = rcgen::generate_simple_self_signed(subject_alt_names.clone())
        .context("Failed to generate self-signed certificate")?;

    let cert_pem = cert.cert.pem().into_bytes();
    let key_pem = cert.signing_key.serialize_pem().into_bytes();

    tokio::fs::write(&cert_path, &cert_pem)
        .await
        .context("Failed to write certificate")?;
    write_private(&key_path, &key_pem).await?;

    crate::log_event!(
        "tls",
        "generated",
        "{} valid for {}",
        cert_path.display(),
        subject_alt_names.join(", ")
    );

    Ok(CertificatePair {
        cert_pem,
        key_pem,
        generated: true,
    })
}

async fn write_private(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(path, contents)
        .await
        .context("Failed to write private key")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .context("Failed to restrict private key permissions")?;
    }

    Ok(())
}

/// Loopback names, the bound address when it is a specific one, and the
/// machine's outbound address when it can be found.
fn subject_alt_names(bind: &str) -> Vec<String> {
    let mut names = vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
        "::1".to_string(),
    ];

    let mut push = |ip: IpAddr| {
        let ip = ip.to_string();
        if !names.contains(&ip) {
            names.push(ip);
        }
    };

    if let Ok(addr) = bind.parse::<SocketAddr>() {
        if !addr.ip().is_unspecified() {
            push(addr.ip());
        }
    }
    if let Ok(ip) = outbound_ip() {
        push(ip);
    }

    names
}

/// Address of the interface used for external traffic. Nothing is sent.
fn outbound_ip() -> std::io::Result<IpAddr> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_subject_alt_names_include_loopback_and_bind() {
        let names = subject_alt_names("192.0.2.7:8443");
        assert_eq!(&names[..3], &["localhost", "127.0.0.1", "::1"]);
        assert!(names.contains(&"192.0.2.7".to_string()));

        let names = subject_alt_names("0.0.0.0:8443");
        assert!(!names.contains(&"0.0.0.0".to_string()));
    }

    #[tokio::test]
    async fn test_certificate_is_generated_once() {
        let dir = TempDir::new().unwrap();
        let cert_dir = dir.path().join("certs");

        let first = get_or_create_certificate(&cert_dir, "127.0.0.1:8443")
            .await
            .unwrap();
        assert!(first.generated);
        assert!(cert_dir.join(CERT_FILE).exists());
        assert!(cert_dir.join(KEY_FILE).exists());
        assert!(String::from_utf8_lossy(&first.cert_pem).contains("BEGIN CERTIFICATE"));

        let second = get_or_create_certificate(&cert_dir, "127.0.0.1:8443")
            .await
            .unwrap();
        assert!(!second.generated);
        assert_eq!(first.cert_pem, second.cert_pem);
        assert_eq!(first.key_pem, second.key_pem);
    }
}
