//! Process configuration, read once from the environment at startup.
//!
//! Everything external lives here: where the workbook and media directories
//! are, what base URL locators are minted under, and the SMTP account. The
//! loaded config is owned by `AppState` and passed down; nothing reads the
//! environment after startup.

use std::env;
use std::path::PathBuf;

const ENV_PREFIX: &str = "AMS";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding one CSV table per report kind.
    pub data_dir: PathBuf,
    /// Directory holding uploaded media objects.
    pub media_dir: PathBuf,
    /// Base URL under which media locators are minted.
    pub public_base_url: String,
    /// SMTP account; `None` disables the notification endpoints.
    pub mail: Option<MailConfig>,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

fn var(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok().filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("{ENV_PREFIX}_PORT: {e}"))?,
            None => 8080,
        };
        let data_dir = PathBuf::from(var("DATA_DIR").unwrap_or_else(|| "./data".to_string()));
        let media_dir = PathBuf::from(var("MEDIA_DIR").unwrap_or_else(|| "./media".to_string()));
        let public_base_url =
            var("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));

        let mail = match (var("SMTP_HOST"), var("SMTP_USER"), var("SMTP_PASSWORD")) {
            (Some(smtp_host), Some(username), Some(password)) => Some(MailConfig {
                from: var("MAIL_FROM").unwrap_or_else(|| username.clone()),
                smtp_host,
                username,
                password,
            }),
            (None, _, _) => None,
            _ => {
                return Err(format!(
                    "{ENV_PREFIX}_SMTP_HOST is set but {ENV_PREFIX}_SMTP_USER/{ENV_PREFIX}_SMTP_PASSWORD are not"
                ));
            }
        };

        Ok(Config {
            host,
            port,
            data_dir,
            media_dir,
            public_base_url,
            mail,
        })
    }
}
