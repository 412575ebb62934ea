//! Read or set the language preference

use anyhow::Result;

use crate::i18n::{Language, LanguagePreference};
use crate::store::PreferenceStore;
use crate::Blog;

/// Print the current language, or persist `code` as the new one
pub fn run(blog: &Blog, code: Option<&str>) -> Result<()> {
    let store = blog.preference_store();
    let locale = crate::locale_tag();
    let language = apply(
        &store,
        &blog.config.preference_key,
        code,
        locale.as_deref(),
    )?;

    match code {
        Some(_) => println!("Language set to {} ({})", language.display_name(), language),
        None => println!("{}", language),
    }
    Ok(())
}

/// Parse and persist `code`, or read the current preference when `None`
pub fn apply<S: PreferenceStore + ?Sized>(
    store: &S,
    key: &str,
    code: Option<&str>,
    locale: Option<&str>,
) -> Result<Language> {
    let preference = LanguagePreference::with_key(store, key);
    let requested = code.map(str::parse::<Language>).transpose()?;
    let language = preference.select(requested, locale);
    tracing::debug!("Language preference: {}", language);
    Ok(language)
}
