//! Narrow interfaces to collaborators this engine does not own: the contact
//! directory (user resolution) and the URL structural validator. Real
//! implementations live outside this crate; callers inject their own.

pub type UserId = i64;

/// Canonicalizes or rejects a raw URL string found inside markup or an
/// autolink. Returns the canonical form to store as a `TextUrl`'s argument.
pub trait UrlChecker {
    fn check_url(&self, raw: &str) -> std::result::Result<String, String>;
}

/// Resolves an in-app link such as `tg:user?id=NNN` to a user id, or `None`
/// if the link isn't a recognized user reference.
pub trait UserResolver {
    fn resolve_user(&self, link: &str) -> Option<UserId>;
}

/// A no-op pair of collaborators useful for tests and for callers that only
/// want scanner/sanitizer behavior without link resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCollaborators;

impl UrlChecker for NullCollaborators {
    fn check_url(&self, raw: &str) -> std::result::Result<String, String> {
        Ok(raw.to_string())
    }
}

impl UserResolver for NullCollaborators {
    fn resolve_user(&self, _link: &str) -> Option<UserId> {
        None
    }
}

/// Recognizes the one `tg:user?id=NNN` link shape the core cares about,
/// without needing a real contact directory. Useful as a drop-in resolver
/// wherever the surrounding application hasn't wired up its own yet.
pub fn resolve_tg_user_link(link: &str) -> Option<UserId> {
    let rest = link.strip_prefix("tg:user?id=")?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse::<UserId>().ok()
}
