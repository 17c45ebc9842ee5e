use std::path::PathBuf;

/// Default cap on a single attachment, matching the original deployment limit.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// File extensions the ledger accepts as attachments.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "png", "jpg", "jpeg", "gif", "json", "csv", "zip",
];

/// Runtime configuration for the metadata ledger.
///
/// There is deliberately no process-global configuration: a `LedgerConfig` is
/// constructed once and handed to the services that need it.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Server-held signing secret. Absent in the default/dev configuration,
    /// in which case entries are recorded unsigned.
    pub signing_key: Option<String>,

    /// Directory attachments are persisted under.
    pub upload_dir: PathBuf,

    /// Maximum accepted size for a single attachment, in bytes.
    pub max_attachment_bytes: usize,

    /// Lower-case file extensions accepted as attachments.
    pub allowed_extensions: Vec<String>,
}

impl LedgerConfig {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            signing_key: None,
            upload_dir: upload_dir.into(),
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    /// Build a configuration from the environment.
    ///
    /// Reads `LEDGER_SIGNING_KEY` (optional) and `LEDGER_UPLOAD_DIR`
    /// (defaults to `uploads`).
    pub fn from_env() -> Self {
        let upload_dir =
            std::env::var("LEDGER_UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        Self {
            signing_key: std::env::var("LEDGER_SIGNING_KEY").ok().filter(|k| !k.is_empty()),
            ..Self::new(upload_dir)
        }
    }

    pub fn with_signing_key(mut self, signing_key: impl Into<String>) -> Self {
        self.signing_key = Some(signing_key.into());
        self
    }

    /// Whether a filename carries an extension from the allowlist.
    /// Names without any extension are rejected.
    pub fn allows_extension(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((base, ext)) if !base.is_empty() => {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            }
            _ => false,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new("uploads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_extension() {
        let config = LedgerConfig::default();
        assert!(config.allows_extension("paper.pdf"));
        assert!(config.allows_extension("scan.JPEG"));
        assert!(config.allows_extension("notes.2024.csv"));
        assert!(!config.allows_extension("script.sh"));
        assert!(!config.allows_extension("no_extension"));
        assert!(!config.allows_extension(".hidden"));
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert!(config.signing_key.is_none());
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_attachment_bytes, DEFAULT_MAX_ATTACHMENT_BYTES);
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("LEDGER_SIGNING_KEY", "test-secret");
        std::env::set_var("LEDGER_UPLOAD_DIR", "/tmp/ledger-uploads");

        let config = LedgerConfig::from_env();
        assert_eq!(config.signing_key.as_deref(), Some("test-secret"));
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/ledger-uploads"));

        std::env::remove_var("LEDGER_SIGNING_KEY");
        std::env::remove_var("LEDGER_UPLOAD_DIR");
    }
}
