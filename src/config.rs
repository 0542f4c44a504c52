//! Run settings and per-network credentials.
//!
//! Secrets live in seven plaintext files (one secret per file) inside a secrets
//! directory. They are read once at startup into [`Credentials`], which is then
//! passed by reference to each fetcher.

use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::error::AppError;

/// Value shipped in the template secret files; a run must never use it.
pub const PLACEHOLDER_SECRET: &str = "add_key_here";

const SECRETS_DIR_VAR: &str = "REVDASH_SECRETS_DIR";
const OUTPUT_DIR_VAR: &str = "REVDASH_OUTPUT_DIR";

const MOPUB_REPORT_KEY_FILE: &str = "mopub_inventory_report_id.txt";
const MOPUB_API_KEY_FILE: &str = "mopub_api_key.txt";
const FYBER_VIDEO_USERNAME_FILE: &str = "fyber_video_username.txt";
const FYBER_VIDEO_PASSWORD_FILE: &str = "fyber_video_password.txt";
const FYBER_DISPLAY_PUBLISHER_ID_FILE: &str = "fyber_display_publisher_id.txt";
const FYBER_DISPLAY_CONSUMER_KEY_FILE: &str = "fyber_display_consumer_key.txt";
const FYBER_DISPLAY_CONSUMER_SECRET_FILE: &str = "fyber_display_consumer_secret.txt";

/// Where to read secrets from and where to write run artifacts.
#[derive(Debug, Clone)]
pub struct Settings {
    pub secrets_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from the environment (a `.env` file is honoured when present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            secrets_dir: dir_from_env(SECRETS_DIR_VAR),
            output_dir: dir_from_env(OUTPUT_DIR_VAR),
        }
    }
}

fn dir_from_env(var: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// MoPub inventory-report credentials.
#[derive(Debug)]
pub struct MoPubCredentials {
    pub report_key: SecretString,
    pub api_key: SecretString,
}

/// Fyber Video (basic auth) credentials.
#[derive(Debug)]
pub struct FyberVideoCredentials {
    pub username: SecretString,
    pub password: SecretString,
}

/// Fyber Display (OAuth 1.0a consumer) credentials.
#[derive(Debug)]
pub struct FyberDisplayCredentials {
    pub publisher_id: SecretString,
    pub consumer_key: SecretString,
    pub consumer_secret: SecretString,
}

/// All seven secrets needed for one run.
#[derive(Debug)]
pub struct Credentials {
    pub mopub: MoPubCredentials,
    pub fyber_video: FyberVideoCredentials,
    pub fyber_display: FyberDisplayCredentials,
}

impl Credentials {
    /// Read every secret file from `dir`.
    ///
    /// A missing or unreadable file is a configuration error naming that file.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        Ok(Self {
            mopub: MoPubCredentials {
                report_key: read_secret(dir, MOPUB_REPORT_KEY_FILE)?,
                api_key: read_secret(dir, MOPUB_API_KEY_FILE)?,
            },
            fyber_video: FyberVideoCredentials {
                username: read_secret(dir, FYBER_VIDEO_USERNAME_FILE)?,
                password: read_secret(dir, FYBER_VIDEO_PASSWORD_FILE)?,
            },
            fyber_display: FyberDisplayCredentials {
                publisher_id: read_secret(dir, FYBER_DISPLAY_PUBLISHER_ID_FILE)?,
                consumer_key: read_secret(dir, FYBER_DISPLAY_CONSUMER_KEY_FILE)?,
                consumer_secret: read_secret(dir, FYBER_DISPLAY_CONSUMER_SECRET_FILE)?,
            },
        })
    }

    /// Fail if any secret is still the template placeholder.
    pub fn ensure_configured(&self) -> Result<(), AppError> {
        let unset: Vec<&str> = self
            .named_secrets()
            .into_iter()
            .filter(|(_, secret)| secret.expose_secret() == PLACEHOLDER_SECRET)
            .map(|(name, _)| name)
            .collect();

        if unset.is_empty() {
            return Ok(());
        }

        Err(AppError::Configuration(format!(
            "you need all valid API keys to use this program; still set to `{PLACEHOLDER_SECRET}`: {}.",
            unset.join(", ")
        )))
    }

    fn named_secrets(&self) -> [(&'static str, &SecretString); 7] {
        [
            (MOPUB_REPORT_KEY_FILE, &self.mopub.report_key),
            (MOPUB_API_KEY_FILE, &self.mopub.api_key),
            (FYBER_VIDEO_USERNAME_FILE, &self.fyber_video.username),
            (FYBER_VIDEO_PASSWORD_FILE, &self.fyber_video.password),
            (FYBER_DISPLAY_PUBLISHER_ID_FILE, &self.fyber_display.publisher_id),
            (FYBER_DISPLAY_CONSUMER_KEY_FILE, &self.fyber_display.consumer_key),
            (FYBER_DISPLAY_CONSUMER_SECRET_FILE, &self.fyber_display.consumer_secret),
        ]
    }
}

fn read_secret(dir: &Path, file_name: &str) -> Result<SecretString, AppError> {
    let path = dir.join(file_name);
    let raw = fs::read_to_string(&path).map_err(|e| {
        AppError::Configuration(format!("failed to read secret file '{}': {e}", path.display()))
    })?;
    Ok(SecretString::from(raw.trim().to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SECRET_FILES: [&str; 7] = [
        MOPUB_REPORT_KEY_FILE,
        MOPUB_API_KEY_FILE,
        FYBER_VIDEO_USERNAME_FILE,
        FYBER_VIDEO_PASSWORD_FILE,
        FYBER_DISPLAY_PUBLISHER_ID_FILE,
        FYBER_DISPLAY_CONSUMER_KEY_FILE,
        FYBER_DISPLAY_CONSUMER_SECRET_FILE,
    ];

    /// In-memory credentials with every secret set to `value`.
    pub(crate) fn credentials_with(value: &str) -> Credentials {
        let s = || SecretString::from(value.to_string());
        Credentials {
            mopub: MoPubCredentials {
                report_key: s(),
                api_key: s(),
            },
            fyber_video: FyberVideoCredentials {
                username: s(),
                password: s(),
            },
            fyber_display: FyberDisplayCredentials {
                publisher_id: s(),
                consumer_key: s(),
                consumer_secret: s(),
            },
        }
    }

    fn write_all(dir: &Path, value: &str) {
        for name in SECRET_FILES {
            fs::write(dir.join(name), format!("{value}\n")).unwrap();
        }
    }

    #[test]
    fn load_reads_and_trims_every_file() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), "secret-value");
        fs::write(dir.path().join(FYBER_VIDEO_USERNAME_FILE), "  video-user \n").unwrap();

        let creds = Credentials::load(dir.path()).unwrap();
        assert_eq!(creds.fyber_video.username.expose_secret(), "video-user");
        assert_eq!(creds.mopub.api_key.expose_secret(), "secret-value");
        assert!(creds.ensure_configured().is_ok());
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), "secret-value");
        fs::remove_file(dir.path().join(FYBER_DISPLAY_CONSUMER_SECRET_FILE)).unwrap();

        let err = Credentials::load(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains(FYBER_DISPLAY_CONSUMER_SECRET_FILE));
    }

    #[test]
    fn placeholder_secret_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), "secret-value");
        fs::write(dir.path().join(MOPUB_API_KEY_FILE), PLACEHOLDER_SECRET).unwrap();

        let creds = Credentials::load(dir.path()).unwrap();
        let err = creds.ensure_configured().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains(MOPUB_API_KEY_FILE));
    }

    #[test]
    fn debug_output_does_not_leak_secrets() {
        let creds = credentials_with("hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
