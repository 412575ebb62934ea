//! Internationalization (i18n) support
//!
//! The blog is published in two languages. [`Language`] is the closed set of
//! supported languages and [`LanguagePreference`] is the single adapter that
//! reads and writes the persisted choice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::store::PreferenceStore;

/// Storage key holding the current language preference
pub const PREFERENCE_KEY: &str = "blog-language";

/// A supported content language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-tw")]
    ZhTw,
}

impl Language {
    /// Every supported language, English first
    pub const ALL: [Language; 2] = [Language::En, Language::ZhTw];

    /// The language every other language falls back to
    pub const FALLBACK: Language = Language::En;

    /// Identifier used in paths, configuration and storage
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::ZhTw => "zh-tw",
        }
    }

    /// BCP 47 tag used for locale-aware formatting
    pub fn locale_tag(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::ZhTw => "zh-TW",
        }
    }

    /// Label shown on the language toggle
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::ZhTw => "中文",
        }
    }

    /// Map a browser or system locale tag to a supported language
    ///
    /// Any tag starting with `zh` selects Traditional Chinese, everything
    /// else selects English. Accepts `zh-TW`, `zh_TW.UTF-8`, `zh`, ...
    pub fn from_browser_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("zh") {
            Language::ZhTw
        } else {
            Language::En
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::FALLBACK
    }

    /// Fixed interface strings for this language
    pub fn messages(&self) -> &'static Messages {
        match self {
            Language::En => &EN_MESSAGES,
            Language::ZhTw => &ZH_TW_MESSAGES,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" => Ok(Language::En),
            "zh-tw" => Ok(Language::ZhTw),
            _ => Err(ConfigError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Interface strings rendered around the content
#[derive(Debug)]
pub struct Messages {
    pub read_more: &'static str,
    pub no_posts: &'static str,
    pub post_not_found: &'static str,
    pub fallback_notice: &'static str,
}

static EN_MESSAGES: Messages = Messages {
    read_more: "Read more",
    no_posts: "No blog posts found.",
    post_not_found: "Post not found",
    fallback_notice: "This post is not available in your language. Showing the English version.",
};

static ZH_TW_MESSAGES: Messages = Messages {
    read_more: "閱讀更多",
    no_posts: "找不到文章。",
    post_not_found: "找不到文章",
    fallback_notice: "此文章尚無中文版本，以下顯示英文版本。",
};

/// Adapter between the durable key/value store and the language value
pub struct LanguagePreference<'a, S: PreferenceStore + ?Sized> {
    store: &'a S,
    key: String,
}

impl<'a, S: PreferenceStore + ?Sized> LanguagePreference<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_key(store, PREFERENCE_KEY)
    }

    pub fn with_key(store: &'a S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Initial language: stored preference, else the browser tag, else English
    pub fn current(&self, browser_tag: Option<&str>) -> Language {
        if let Some(stored) = self.store.get(&self.key) {
            match stored.parse::<Language>() {
                Ok(lang) => return lang,
                Err(e) => tracing::warn!("Ignoring stored language preference: {}", e),
            }
        }

        browser_tag
            .map(Language::from_browser_tag)
            .unwrap_or(Language::FALLBACK)
    }

    /// Resolve the language for a request, persisting an explicit choice
    pub fn select(&self, requested: Option<Language>, browser_tag: Option<&str>) -> Language {
        match requested {
            Some(lang) => {
                self.set(lang);
                lang
            }
            None => self.current(browser_tag),
        }
    }

    /// Persist a language choice; storage failures are logged, not raised
    pub fn set(&self, lang: Language) {
        if let Err(e) = self.store.set(&self.key, lang.code()) {
            tracing::warn!("Failed to persist language preference: {}", e);
        }
    }
}
