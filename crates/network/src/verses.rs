//! Verse lists from the alquran.cloud API
//!
//! Only verse identity is read from the answer. Texts and translations
//! stay with the reading view.

use crate::client::Client;
use crate::error::{NetworkError, NetworkResult};
use serde::Deserialize;
use tilawah_core::{AppError, ChapterId, Selection, Verse, VerseProvider, VerseSequence};
use tokio::runtime::Handle;

/// Public endpoint used when no other base URL is given
pub const DEFAULT_VERSE_API: &str = "https://api.alquran.cloud/v1";

const EDITION: &str = "quran-uthmani";

#[derive(Debug, Deserialize)]
struct Envelope {
    code: u16,
    data: Option<EditionData>,
}

#[derive(Debug, Deserialize)]
struct EditionData {
    ayahs: Vec<Ayah>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ayah {
    number: u32,
    number_in_surah: u16,
    /// Present on juz answers, absent on chapter answers
    surah: Option<SurahRef>,
}

#[derive(Debug, Deserialize)]
struct SurahRef {
    number: u16,
}

/// Loads verse sequences over HTTP
///
/// `load` blocks on the given runtime, so call it from a plain thread or
/// `spawn_blocking`, never from inside async code.
#[derive(Clone)]
pub struct ApiVerseProvider {
    client: Client,
    runtime: Handle,
    base_url: String,
}

impl ApiVerseProvider {
    pub fn new(client: Client, runtime: Handle) -> Self {
        Self {
            client,
            runtime,
            base_url: DEFAULT_VERSE_API.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Endpoint for a chapter or juz
    pub fn url_for(&self, selection: &Selection) -> String {
        let (kind, number) = match selection {
            Selection::Chapter(chapter) => ("surah", u16::from(chapter.number())),
            Selection::Juz(juz) => ("juz", u16::from(juz.number())),
        };
        format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            kind,
            number,
            EDITION
        )
    }

    /// Fetches and validates the sequence for a selection
    pub async fn fetch(&self, selection: &Selection) -> tilawah_core::Result<VerseSequence> {
        let ayahs = self
            .fetch_ayahs(selection)
            .await
            .map_err(|e| AppError::provider(self.name(), e.to_string()))?;

        let verses = ayahs
            .into_iter()
            .map(|ayah| {
                let chapter = match (ayah.surah, selection) {
                    (Some(surah), _) => ChapterId::new(surah.number)?,
                    (None, Selection::Chapter(chapter)) => *chapter,
                    (None, Selection::Juz(_)) => {
                        return Err(AppError::provider(
                            self.name(),
                            format!("verse {} has no chapter", ayah.number),
                        ))
                    }
                };
                Ok(Verse::new(ayah.number, ayah.number_in_surah, chapter))
            })
            .collect::<tilawah_core::Result<Vec<_>>>()?;

        VerseSequence::new(verses)
    }

    async fn fetch_ayahs(&self, selection: &Selection) -> NetworkResult<Vec<Ayah>> {
        let url = self.url_for(selection);
        let envelope: Envelope = self.client.get(&url).await?.json().await?;

        if envelope.code != 200 {
            return Err(NetworkError::Status {
                url,
                status: envelope.code,
            });
        }
        let ayahs = envelope.data.map(|data| data.ayahs).unwrap_or_default();
        log::debug!("{} answered {} verses", url, ayahs.len());
        Ok(ayahs)
    }
}

impl VerseProvider for ApiVerseProvider {
    fn name(&self) -> &str {
        "alquran.cloud"
    }

    fn load(&self, selection: &Selection) -> tilawah_core::Result<VerseSequence> {
        self.runtime.block_on(self.fetch(selection))
    }
}
