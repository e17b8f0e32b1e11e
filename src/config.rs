/// Client TLS material for drivers that support it.
///
/// Only the file paths live here; certificate and key provisioning belongs
/// to the caller's SSL context collaborator.
#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

/// Options for opening a native connection.
///
/// Host, user, password, and port arrive pre-parsed; URI parsing is a
/// caller-side collaborator, not something this crate does. The database
/// name is always explicit. Setters are fluent:
///
/// ```rust
/// use sql_rowstream::prelude::*;
///
/// let cfg = ConnectConfig::new("appdb")
///     .host("db.internal")
///     .user("svc")
///     .password("hunter2")
///     .port(5432);
/// # let _ = cfg;
/// ```
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub port: u16,
    pub dbname: String,
    pub tls: Option<TlsPaths>,
}

impl ConnectConfig {
    #[must_use]
    pub fn new(dbname: impl Into<String>) -> Self {
        Self {
            host: "localhost".to_string(),
            user: String::new(),
            password: String::new(),
            port: 5432,
            dbname: dbname.into(),
            tls: None,
        }
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Attach client certificate and key file paths.
    #[must_use]
    pub fn tls(mut self, cert_path: impl Into<String>, key_path: impl Into<String>) -> Self {
        self.tls = Some(TlsPaths {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        });
        self
    }

    /// Render the libpq-style keyword/value connection string.
    ///
    /// `sslcert`/`sslkey` are appended only when TLS paths are present.
    #[must_use]
    pub fn connection_string(&self) -> String {
        let mut out = format!(
            "dbname={} host={} user={} password={} port={}",
            self.dbname, self.host, self.user, self.password, self.port
        );
        if let Some(tls) = &self.tls {
            out.push_str(&format!(" sslcert={} sslkey={}", tls.cert_path, tls.key_path));
        }
        out
    }
}
