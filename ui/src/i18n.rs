//! Internationalization (i18n) support for `qcboard-ui`.
//!
//! Fluent bundles are embedded at compile time with `rust-embed` and looked
//! up through the `t!` macro, which wraps `i18n_embed_fl::fl!` so keys and
//! their arguments are checked against the fallback bundle at build time.
//!
//! Folder layout (relative to this crate root):
//! ```text
//! i18n.toml
//! i18n/
//!   en-US/qcboard-ui.ftl   (fallback/reference)
//!   it-IT/qcboard-ui.ftl
//! ```
//!
//! Usage:
//! ```ignore
//! crate::i18n::init(); // idempotent
//! let label = t!("chart-refresh");
//! let range = t!("table-range", start = 1, end = 25, total = 60);
//! ```
//!
//! To add a locale, copy `en-US/qcboard-ui.ftl` into `i18n/<lang-id>/`,
//! translate the values (keep IDs and placeholders) and run the tests.
//!
//! Desktop builds pick the OS locale list, web builds `navigator.languages`.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use i18n_embed::LanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// Translation macro routed through the shared [`LOADER`].
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fluent domain; the fallback bundle lives at `i18n/en-US/{DOMAIN}.ftl`.
const DOMAIN: &str = "qcboard-ui";

const FALLBACK: &str = "en-US";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

/// Global language loader used by `t!`.
pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = FALLBACK.parse().unwrap_or_default();
    FluentLanguageLoader::new(DOMAIN, fallback)
});

/// Load the bundles for `languages` into `loader`.
///
/// Isolation is a per-bundle flag, so it is switched off after every load:
/// placeables are interpolated as plain text, without U+2068/U+2069 marks.
fn load(
    loader: &FluentLanguageLoader,
    languages: &[LanguageIdentifier],
) -> Result<Vec<LanguageIdentifier>, i18n_embed::I18nEmbedError> {
    let selected = i18n_embed::select(loader, &Localizations, languages)?;
    loader.set_use_isolating(false);
    Ok(selected)
}

static INIT: Once = Once::new();

/// Load the bundles matching the user's languages (idempotent).
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        if let Err(err) = load(&LOADER, &requested) {
            tracing::warn!("i18n language selection failed ({err}); using fallback");
        }
    });
}

/// Switch language at runtime. Unparseable tags are ignored.
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let Ok(lang) = tag.parse::<LanguageIdentifier>() else {
        tracing::debug!(tag, "ignoring invalid language tag");
        return Ok(());
    };
    load(&LOADER, &[lang]).map(|_| ())
}

/// Embedded language identifiers, sorted.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(str::to_string))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

/// The language currently in use.
pub fn current_language() -> String {
    LOADER.current_language().to_string()
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

    #[test]
    fn bundled_languages_are_listed() {
        assert_eq!(available_languages(), vec!["en-US", "it-IT"]);
    }

    #[test]
    fn fallback_lookup_with_arguments() {
        let fallback: LanguageIdentifier = FALLBACK.parse().unwrap();
        let loader = FluentLanguageLoader::new(DOMAIN, fallback.clone());
        load(&loader, &[fallback]).unwrap();
        assert_eq!(
            fl!(loader, "table-range", start = 1, end = 25, total = 60),
            "Showing 1-25 of 60 results"
        );
        assert_eq!(fl!(loader, "chart-title-cycles", count = 1), "1 cycle");
    }

    #[test]
    fn switched_bundles_interpolate_without_isolation_marks() {
        let fallback: LanguageIdentifier = FALLBACK.parse().unwrap();
        let italian: LanguageIdentifier = "it-IT".parse().unwrap();
        let loader = FluentLanguageLoader::new(DOMAIN, fallback.clone());
        load(&loader, &[fallback]).unwrap();
        load(&loader, &[italian]).unwrap();

        let caption = fl!(loader, "table-range", start = 26, end = 50, total = 60);
        assert!(caption.contains("26"), "{caption}");
        assert!(
            !caption.contains(|c: char| c == '\u{2068}' || c == '\u{2069}'),
            "isolation marks leaked into {caption:?}"
        );
    }

    #[test]
    fn invalid_language_switch_keeps_current_bundle() {
        init();
        let before = t!("chart-refresh");
        let _ = set_language("zz-ZZ-invalid!!");
        assert_eq!(t!("chart-refresh"), before);
    }
}
