//! Interface languages.
//!
//! At most one language is the default; whenever a language is made the
//! default, every other language loses the flag in the same update.

use crate::error::Result;
use crate::store::{Audit, Patch, Record, RecordId, Store};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: RecordId,
    /// Short code such as `en`.
    pub code: String,
    pub name: String,
    pub is_default: bool,
    pub enabled: bool,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDraft {
    pub code: String,
    pub name: String,
    pub is_default: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub is_default: Option<bool>,
    pub enabled: Option<bool>,
}

impl Patch<Language> for LanguagePatch {
    fn apply(self, target: &mut Language) {
        if let Some(v) = self.code {
            target.code = v;
        }
        if let Some(v) = self.name {
            target.name = v;
        }
        if let Some(v) = self.is_default {
            target.is_default = v;
        }
        if let Some(v) = self.enabled {
            target.enabled = v;
        }
    }
}

impl Record for Language {
    type Key = RecordId;
    const KIND: &'static str = "Language";

    fn key(&self) -> RecordId {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl Store<Language> {
    /// Adds a language; if it is the default, all others stop being one.
    pub fn create_language(&mut self, draft: LanguageDraft, audit: Audit) -> RecordId {
        let id = self
            .create_with(|id| Language {
                id,
                code: draft.code,
                name: draft.name,
                is_default: draft.is_default,
                enabled: draft.enabled,
                audit,
                is_deleted: false,
            })
            .id;
        if self.get(&id).map(|l| l.is_default).unwrap_or(false) {
            self.clear_default_except(id);
        }
        id
    }

    /// Applies `patch` to a language, keeping a single default.
    pub fn update_language(
        &mut self,
        id: RecordId,
        patch: LanguagePatch,
        actor: &str,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<&Language> {
        let makes_default = patch.is_default == Some(true);
        self.update(&id, |lang| {
            patch.apply(lang);
            lang.audit.touch(actor, at);
            Ok(())
        })?;
        if makes_default {
            self.clear_default_except(id);
        }
        // Safety: the update above succeeded, so the language exists
        Ok(self.get(&id).expect("language exists after update"))
    }

    /// Makes `id` the only default language.
    pub fn set_default(&mut self, id: RecordId) -> Result<()> {
        self.update(&id, |lang| {
            lang.is_default = true;
            Ok(())
        })?;
        self.clear_default_except(id);
        info!("Language {} is now the default", id);
        Ok(())
    }

    /// The current default language, if any.
    pub fn default_language(&self) -> Option<&Language> {
        self.list().find(|l| l.is_default)
    }

    fn clear_default_except(&mut self, id: RecordId) {
        self.update_all(|lang| lang.is_default = lang.id == id);
    }
}
