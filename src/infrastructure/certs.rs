//! Offline generation of a private CA plus server and client certificates
//! for putting the HTTP endpoint behind TLS.

use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    ExtendedKeyUsagePurpose, IsCa, KeyPair, KeyUsagePurpose,
};
use std::path::{Path, PathBuf};
use time::{Duration, OffsetDateTime};

#[derive(Debug, thiserror::Error)]
pub enum CertError {
    #[error("certificate generation failed: {0}")]
    Generation(#[from] rcgen::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub const SERVER_SUBJECT_ALT_NAMES: [&str; 2] = ["localhost", "127.0.0.1"];

/// A certificate and its private key, both PEM encoded.
pub struct IssuedPair {
    pub cert_pem: String,
    pub key_pem: String,
}

pub struct CertificateBundle {
    pub ca: IssuedPair,
    pub server: IssuedPair,
    pub client: IssuedPair,
}

impl CertificateBundle {
    pub fn generate(validity_days: i64) -> Result<Self, CertError> {
        let not_before = OffsetDateTime::now_utc();
        let not_after = not_before + Duration::days(validity_days);

        let ca_key = KeyPair::generate()?;
        let mut ca_params = CertificateParams::default();
        ca_params.distinguished_name = subject("My Custom CA", "MyRootCA");
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        ca_params.not_before = not_before;
        ca_params.not_after = not_after;
        let ca_cert = ca_params.self_signed(&ca_key)?;
        tracing::info!("generated root CA");

        let server_names: Vec<String> = SERVER_SUBJECT_ALT_NAMES
            .iter()
            .map(|s| s.to_string())
            .collect();
        let server = issue(
            &ca_cert,
            &ca_key,
            CertificateParams::new(server_names)?,
            "localhost",
            ExtendedKeyUsagePurpose::ServerAuth,
            (not_before, not_after),
        )?;
        tracing::info!("generated server certificate");

        let client = issue(
            &ca_cert,
            &ca_key,
            CertificateParams::new(Vec::<String>::new())?,
            "MyClientUser",
            ExtendedKeyUsagePurpose::ClientAuth,
            (not_before, not_after),
        )?;
        tracing::info!("generated client certificate");

        Ok(Self {
            ca: IssuedPair {
                cert_pem: ca_cert.pem(),
                key_pem: ca_key.serialize_pem(),
            },
            server,
            client,
        })
    }

    /// Writes `ca`, `server` and `client` `.pem`/`.key` files into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, CertError> {
        std::fs::create_dir_all(dir).map_err(|source| CertError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(6);
        for (name, pair) in [("ca", &self.ca), ("server", &self.server), ("client", &self.client)] {
            for (ext, pem) in [("key", &pair.key_pem), ("pem", &pair.cert_pem)] {
                let path = dir.join(format!("{name}.{ext}"));
                std::fs::write(&path, pem).map_err(|source| CertError::Write {
                    path: path.clone(),
                    source,
                })?;
                written.push(path);
            }
        }
        Ok(written)
    }
}

fn subject(organization: &str, common_name: &str) -> DistinguishedName {
    let mut name = DistinguishedName::new();
    name.push(DnType::CountryName, "US");
    name.push(DnType::StateOrProvinceName, "California");
    name.push(DnType::OrganizationName, organization);
    name.push(DnType::CommonName, common_name);
    name
}

fn issue(
    ca_cert: &Certificate,
    ca_key: &KeyPair,
    mut params: CertificateParams,
    common_name: &str,
    usage: ExtendedKeyUsagePurpose,
    (not_before, not_after): (OffsetDateTime, OffsetDateTime),
) -> Result<IssuedPair, CertError> {
    let key = KeyPair::generate()?;
    params.distinguished_name = subject("My Company", common_name);
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    params.extended_key_usages = vec![usage];
    params.not_before = not_before;
    params.not_after = not_after;

    let cert = params.signed_by(&key, ca_cert, ca_key)?;
    Ok(IssuedPair {
        cert_pem: cert.pem(),
        key_pem: key.serialize_pem(),
    })
}
