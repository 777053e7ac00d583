use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Translation completeness checks.
///
/// 1. Every non‑fallback locale provides *at least* the keys present in the
///    fallback (en-US) `demetra-ui.ftl`.
/// 2. Every `t!("…")` literal used under `src/` exists in the fallback.
///
/// The FTL parser is deliberately simple:
/// - Ignores comment lines starting with `#`
/// - Treats any line of the form `key =` or `key=` as a message definition
/// - Skips blank / attribute / continuation lines
///
/// If you add a new locale:
/// 1. Create `ui/i18n/<locale>/demetra-ui.ftl`
/// 2. Copy all keys from `en-US/demetra-ui.ftl`
/// 3. Register it in `LOCALES` below and in `Language::locale`.
const EN_US: &str = include_str!("../i18n/en-US/demetra-ui.ftl");

const LOCALES: &[(&str, &str)] = &[
    ("cnr-ME", include_str!("../i18n/cnr-ME/demetra-ui.ftl")),
    ("uk-UA", include_str!("../i18n/uk-UA/demetra-ui.ftl")),
    ("tr-TR", include_str!("../i18n/tr-TR/demetra-ui.ftl")),
    ("ru-RU", include_str!("../i18n/ru-RU/demetra-ui.ftl")),
];

#[test]
fn all_locales_have_all_fallback_keys() {
    let fallback_keys = extract_keys(EN_US);

    assert!(
        !fallback_keys.is_empty(),
        "Fallback (en-US) contains no keys."
    );
    assert_no_dup_keys(EN_US, "en-US");

    let mut failures = Vec::new();

    for (locale, src) in LOCALES {
        assert_no_dup_keys(src, locale);

        let keys = extract_keys(src);
        let missing: BTreeSet<String> = fallback_keys
            .iter()
            .filter(|k| !keys.contains(*k))
            .cloned()
            .collect();

        if !missing.is_empty() {
            failures.push(format!(
                "Locale {locale} is missing {} key(s):\n  {}",
                missing.len(),
                missing.into_iter().collect::<Vec<_>>().join("\n  ")
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Translation completeness check failed:\n\n{}\n\nHint: copy the missing keys from en-US, then translate.",
            failures.join("\n\n")
        );
    }
}

#[test]
fn captcha_question_keeps_both_operands_everywhere() {
    for (locale, src) in std::iter::once(&("en-US", EN_US)).chain(LOCALES.iter()) {
        let line = src
            .lines()
            .find(|l| l.trim_start().starts_with("contact-captcha-question"))
            .unwrap_or_else(|| panic!("{locale}: contact-captcha-question missing"));
        assert!(
            line.contains("{ $a }") && line.contains("{ $b }"),
            "{locale}: captcha question must reference both $a and $b"
        );
    }
}

#[test]
fn source_keys_exist_in_fallback() {
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    let referenced = extract_translation_keys_from_source(&src_root);
    assert!(!referenced.is_empty(), "no t!(…) usages found under src/");

    let fallback_keys = extract_keys(EN_US);
    let mut missing: Vec<_> = referenced
        .iter()
        .filter(|k| !fallback_keys.contains(*k))
        .cloned()
        .collect();
    missing.sort();

    assert!(
        missing.is_empty(),
        "Referenced translation keys missing in fallback ({}):\n{}",
        missing.len(),
        missing.join("\n")
    );
}

/// Extract message keys from a Fluent file (simple heuristic).
fn extract_keys(src: &str) -> HashSet<String> {
    let mut keys = HashSet::new();

    for line in src.lines() {
        if let Some(key) = message_key(line) {
            keys.insert(key.to_string());
        }
    }

    keys
}

fn message_key(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('.') {
        return None;
    }
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let valid = !key.is_empty()
        && !key.contains(' ')
        && !key.contains('\t')
        && !key.starts_with('[')
        && !key.starts_with('@')
        && !key.starts_with('-');
    valid.then_some(key)
}

/// Assert no duplicate key definitions in a single FTL file (rudimentary).
fn assert_no_dup_keys(src: &str, locale: &str) {
    let mut seen = HashSet::new();
    let mut dups = BTreeSet::new();

    for raw in src.lines() {
        if let Some(key) = message_key(raw) {
            if !seen.insert(key.to_string()) {
                dups.insert(format!("{key}  (line: \"{raw}\")"));
            }
        }
    }

    if !dups.is_empty() {
        panic!(
            "Duplicate key definitions in {locale}:\n  {}",
            dups.into_iter().collect::<Vec<_>>().join("\n  ")
        );
    }
}

/// Collect all `t!("...")` literal keys from `.rs` files under `src_root`.
/// Only direct literal first arguments are matched.
fn extract_translation_keys_from_source(src_root: &Path) -> HashSet<String> {
    let mut found = HashSet::new();
    let mut stack = vec![src_root.to_path_buf()];
    let needle = "t!(\"";

    while let Some(path) = stack.pop() {
        if path.is_dir() {
            if let Ok(read_dir) = fs::read_dir(&path) {
                stack.extend(read_dir.flatten().map(|entry| entry.path()));
            }
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };

        let mut rest = content.as_str();
        while let Some(pos) = rest.find(needle) {
            rest = &rest[pos + needle.len()..];
            if let Some(end) = rest.find('"') {
                let key = &rest[..end];
                if key
                    .chars()
                    .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-'))
                {
                    found.insert(key.to_string());
                }
                rest = &rest[end..];
            }
        }
    }

    found
}
