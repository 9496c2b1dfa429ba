//! Fixed whitelist of short (<= 4 char) usernames that are recognized as
//! mentions despite being below the normal minimum-recall length.

static SHORT_MENTION_WHITELIST: &[&str] = &[
    "bing", "bold", "coub", "gif", "imdb", "like", "pic", "vid", "vote", "wiki",
];

/// Case-sensitive: mentions are ASCII and the product's whitelist is
/// maintained in the same case scanners compare against.
pub fn is_whitelisted_short_mention(name: &str) -> bool {
    SHORT_MENTION_WHITELIST.contains(&name)
}
