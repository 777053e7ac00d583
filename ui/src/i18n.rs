//! Internationalization (i18n) support for `demetra-ui`.
//!
//! This module wires together:
//! - `i18n-embed` (language selection + asset loading)
//! - `fluent` (message formatting)
//! - `rust-embed` (compile-time embedding of `.ftl` files)
//! - `i18n-embed-fl` (`fl!` macro for compile‑time checked lookups)
//!
//! Folder layout (relative to this crate root):
//! ```text
//! i18n.toml
//! i18n/
//!   en-US/demetra-ui.ftl   (fallback/reference)
//!   cnr-ME/demetra-ui.ftl
//!   uk-UA/demetra-ui.ftl
//!   tr-TR/demetra-ui.ftl
//!   ru-RU/demetra-ui.ftl
//! ```
//!
//! The active locale follows the persisted [`Language`] preference; the
//! requester-based detection in [`init`] only matters until the stored
//! preference has been loaded.
//!
//! Public API surface:
//! - `init()` – load localization bundles (safe to call multiple times).
//! - `set_language(language)` – switch to the locale of a [`Language`].
//! - `set_language_tag(tag)` – switch by raw locale tag.
//! - `available_languages()` – discover embedded language tags.
//! - `fl` macro re-export and the `t!` shorthand.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

use crate::core::preferences::Language;

pub use i18n_embed_fl::fl; // Re-export for convenience.

/// Ergonomic translation macro.
/// Examples:
///     t!("header-contact")
///     t!("contact-captcha-question", a = 3, b = 4)
///
/// This expands to `fl!(&*LOADER, ...)` keeping callsites short while
/// ensuring all lookups route through the shared loader.
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fluent "domain" (matches the crate / the fallback FTL filename).
///
/// Fallback file path must be: `i18n/en-US/{DOMAIN}.ftl`
const DOMAIN: &str = "demetra-ui"; // pinned explicitly (avoid relying on env! during macro domain resolution)

/// Embed all locale folders under `i18n/`.
#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

/// Global language loader used with the `fl!` macro.
pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = Language::default()
        .locale()
        .parse()
        .expect("valid fallback language identifier");
    FluentLanguageLoader::new(DOMAIN, fallback)
});

static INIT: Once = Once::new();

/// Initialize i18n (idempotent).
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        if let Err(err) = i18n_embed::select(&*LOADER, &Localizations, &requested) {
            tracing::warn!("[i18n] failed selecting languages ({err}); continuing with fallback");
        }
    });
}

/// Switch the active catalog to the locale backing `language`.
pub fn set_language(language: Language) -> Result<(), i18n_embed::I18nEmbedError> {
    set_language_tag(language.locale())
}

/// Switch language at runtime. If `tag` cannot be parsed it is ignored (Ok returned).
pub fn set_language_tag(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let lang: LanguageIdentifier = match tag.parse() {
        Ok(l) => l,
        Err(_) => return Ok(()), // Silently ignore invalid tags.
    };
    i18n_embed::select(&*LOADER, &Localizations, &[lang]).map(|_| ())
}

/// List available (embedded) language identifiers.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(|s| s.to_string()))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::fl;

    #[test]
    fn every_language_has_an_embedded_catalog() {
        let available = available_languages();
        for language in Language::ALL {
            assert!(
                available.iter().any(|l| l == language.locale()),
                "missing catalog for {}",
                language.locale()
            );
        }
    }

    #[test]
    fn fallback_lookup_works() {
        init();
        set_language(Language::En).unwrap();
        let s = fl!(&*LOADER, "language-english");
        assert_eq!(s, "English");
    }

    #[test]
    fn dynamic_language_switch_ignores_garbage_tags() {
        init();
        set_language(Language::En).unwrap();
        let before = fl!(&*LOADER, "language-english");
        let _ = set_language_tag("not a tag");
        let after = fl!(&*LOADER, "language-english");
        assert_eq!(before, after);
    }
}
