//! URL-safe public identifiers for forms.
//!
//! A friendly id is derived from the form title once, at creation, and never
//! changes afterwards. Collisions are resolved by appending a short random suffix.

use rand::{distributions::Alphanumeric, Rng};

/// Maximum length of the slug part (before any suffix)
pub const MAX_SLUG_LENGTH: usize = 64;

/// Length of the random suffix appended on collision
pub const SUFFIX_LENGTH: usize = 6;

/// Number of candidates offered before giving up
pub const MAX_ATTEMPTS: usize = 8;

/// Lowercase the input, keep ASCII alphanumerics, and collapse every other run
/// of characters into a single `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }

        if slug.len() >= MAX_SLUG_LENGTH {
            break;
        }
    }

    slug.truncate(MAX_SLUG_LENGTH);
    slug.trim_end_matches('-').to_string()
}

/// Produces candidate friendly ids for a title.
#[derive(Debug, Clone, Default)]
pub struct FriendlyIdGenerator;

impl FriendlyIdGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Candidate for the given attempt (0-based). Attempt 0 is the bare slug
    /// when the title yields one; later attempts carry a random suffix.
    pub fn candidate(&self, title: &str, attempt: usize) -> String {
        let base = slugify(title);
        if base.is_empty() {
            return random_token(SUFFIX_LENGTH * 2);
        }
        if attempt == 0 {
            base
        } else {
            format!("{}-{}", base, random_token(SUFFIX_LENGTH))
        }
    }
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// True when `value` could have been produced by [`FriendlyIdGenerator`].
pub fn is_well_formed(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && value.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
