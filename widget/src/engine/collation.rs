use std::cmp::Ordering;
use std::sync::LazyLock;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use regex::Regex;
use tracing::warn;

/// Orders channel names in alphabetical mode.
pub trait NameCollator: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Decides which usernames are hidden from the member list.
pub trait UsernameFilter: Send + Sync {
    fn excludes(&self, username: &str) -> bool;
}

static ROOT_COLLATION: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    match Collator::try_new(CollatorPreferences::default(), CollatorOptions::default()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!(error = %e, "no root collation data, ordering names case-insensitively");
            None
        }
    }
});

/// Unicode root-locale collation (UCA/CLDR root). Symbols and emoji sort
/// before letters and accented letters sit next to their base letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleCollator;

impl NameCollator for LocaleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match ROOT_COLLATION.as_ref() {
            Some(collator) => collator.compare(a, b).then_with(|| a.cmp(b)),
            None => CaseInsensitiveCollator.compare(a, b),
        }
    }
}

/// Case-insensitive code point ordering with a case-sensitive tiebreak.
/// Ignores accents and scripts; only a fallback for [`LocaleCollator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveCollator;

impl NameCollator for CaseInsensitiveCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let folded_a = a.chars().flat_map(char::to_lowercase);
        let folded_b = b.chars().flat_map(char::to_lowercase);
        folded_a.cmp(folded_b).then_with(|| b.cmp(a))
    }
}

impl UsernameFilter for Regex {
    fn excludes(&self, username: &str) -> bool {
        self.is_match(username)
    }
}

/// Keeps everyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl UsernameFilter for NoFilter {
    fn excludes(&self, _username: &str) -> bool {
        false
    }
}
