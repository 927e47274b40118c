//! Shared application state: the explicitly constructed context object built
//! once at startup and passed down through Actix as `web::Data`, replacing any
//! notion of process-wide singletons.

use std::sync::{Arc, Mutex, MutexGuard};

use log::warn;

use crate::config::Config;
use crate::mail::{MailRelay, SmtpRelay};
use crate::media::{DiskStore, ObjectStore};
use crate::store::CsvWorkbook;

pub struct AppState {
    pub config: Config,
    /// In-process writes are serialized here; the backing files carry no
    /// cross-process coordination.
    pub workbook: Mutex<CsvWorkbook>,
    pub media: Arc<dyn ObjectStore>,
    /// `None` when no SMTP account is configured; notification endpoints
    /// answer 503 in that case.
    pub mailer: Option<Arc<dyn MailRelay>>,
}

impl AppState {
    pub fn initialize(config: Config) -> Result<Self, String> {
        let workbook = CsvWorkbook::open(&config.data_dir)
            .map_err(|e| format!("workbook at {}: {e}", config.data_dir.display()))?;
        let media = DiskStore::open(&config.media_dir, &config.public_base_url)
            .map_err(|e| format!("media store at {}: {e}", config.media_dir.display()))?;
        let mailer: Option<Arc<dyn MailRelay>> = match &config.mail {
            Some(mail) => Some(Arc::new(
                SmtpRelay::connect(mail).map_err(|e| format!("mail relay: {e}"))?,
            )),
            None => {
                warn!("no SMTP account configured; notification endpoints are disabled");
                None
            }
        };
        Ok(AppState {
            config,
            workbook: Mutex::new(workbook),
            media: Arc::new(media),
            mailer,
        })
    }

    /// A poisoned lock only means another request died mid-write; the
    /// workbook itself rewrites tables atomically, so we keep serving.
    pub fn workbook(&self) -> MutexGuard<'_, CsvWorkbook> {
        self.workbook.lock().unwrap_or_else(|e| e.into_inner())
    }
}
