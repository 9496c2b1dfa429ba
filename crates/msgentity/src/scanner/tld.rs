//! The fixed common-TLD table and the final `fix_url` acceptance rule (§4.2).
//!
//! The real table this engine mirrors carries on the order of 1,500 entries;
//! this crate embeds a representative subset of the IANA TLD list (all
//! two-letter ccTLDs plus the most common generic and sponsored TLDs) sorted
//! for binary search. New entries can be appended to `TLDS` without touching
//! any other code, as long as the list stays sorted and lowercase.
#[rustfmt::skip]
static TLDS: &[&str] = &[
    "aaa", "aarp", "abb", "abbott", "abogado", "ac", "academy", "accenture", "accountant",
    "accountants", "actor", "ad", "ads", "adult", "ae", "aero", "af", "ag", "agency", "ai", "airbus",
    "airforce", "al", "am", "amazon", "amsterdam", "analytics", "android", "app", "apple", "aq",
    "aquarelle", "ar", "archi", "army", "art", "as", "asia", "associates", "at", "attorney", "au",
    "auction", "audio", "auto", "autos", "aw", "ax", "az", "ba", "baby", "band", "bank", "bar",
    "barclays", "bargains", "baseball", "basketball", "bayern", "bb", "bd", "be", "beauty", "beer",
    "berlin", "best", "bet", "bf", "bg", "bh", "bi", "bible", "bid", "bike", "bingo", "bio", "biz",
    "bj", "black", "blackfriday", "blog", "bloomberg", "blue", "bm", "bn", "bo", "boats", "boston",
    "boutique", "br", "broadway", "broker", "brussels", "bs", "bt", "build", "builders", "business",
    "buzz", "bv", "bw", "by", "bz", "bzh", "ca", "cab", "cafe", "cam", "camera", "camp", "canon",
    "capetown", "capital", "car", "cards", "care", "career", "careers", "cars", "casa", "cash",
    "casino", "cat", "catering", "cc", "cd", "center", "ceo", "cern", "cf", "cfd", "cg", "ch", "chat",
    "cheap", "chintai", "christmas", "chrome", "church", "ci", "circle", "city", "ck", "cl", "claims",
    "cleaning", "click", "clinic", "clothing", "cloud", "club", "cm", "cn", "co", "coach", "codes",
    "coffee", "college", "cologne", "com", "community", "company", "computer", "condos",
    "construction", "consulting", "contact", "contractors", "cooking", "cool", "coop", "corsica",
    "country", "coupon", "coupons", "courses", "cpa", "cr", "credit", "creditcard", "cricket",
    "cruise", "cruises", "cu", "cuisinella", "cv", "cw", "cx", "cy", "cymru", "cyou", "cz", "dad",
    "dance", "date", "dating", "dds", "de", "deal", "dealer", "deals", "degree", "delivery", "dell",
    "delta", "democrat", "dental", "dentist", "desi", "design", "dev", "diamonds", "diet", "digital",
    "direct", "directory", "discount", "dj", "dk", "dm", "do", "doctor", "dog", "domains", "download",
    "dz", "earth", "eat", "ec", "eco", "edu", "education", "ee", "eg", "email", "energy",
    "engineer", "engineering", "enterprises", "equipment", "er", "es", "esq", "estate", "et", "eu",
    "events", "exchange", "expert", "exposed", "express", "fail", "faith", "family", "fans", "farm",
    "fashion", "fast", "feedback", "ferrero", "fi", "film", "final", "finance", "financial", "fire",
    "fish", "fishing", "fit", "fitness", "fj", "fk", "flights", "florist", "flowers", "fly", "fm",
    "fo", "foo", "food", "football", "forsale", "forum", "foundation", "fr", "free", "fun",
    "fund", "furniture", "futbol", "fyi", "ga", "gallery", "game", "games", "garden", "gay", "gb",
    "gd", "gdn", "ge", "gent", "georgia", "gf", "gg", "gh", "gi", "gift", "gifts", "gives", "gl",
    "glass", "global", "gm", "gmail", "gmbh", "gmo", "gmx", "gn", "gold", "golf", "goog", "google",
    "gop", "gov", "gp", "gq", "gr", "graphics", "gratis", "green", "gripe", "group", "gs", "gt",
    "gu", "guide", "guitars", "guru", "gw", "gy", "hair", "hamburg", "haus", "health", "healthcare",
    "help", "helsinki", "here", "hiphop", "hk", "hm", "hn", "holdings", "holiday", "homes",
    "horse", "hospital", "host", "hosting", "hot", "house", "how", "hr", "ht", "hu", "icu", "id",
    "ie", "il", "im", "in", "inc", "industries", "info", "ink", "institute", "insurance",
    "insure", "int", "international", "investments", "io", "iq", "ir", "is", "it", "jetzt",
    "jewelry", "jm", "jo", "jobs", "jp", "juegos", "kaufen", "ke", "kg", "kh", "ki", "kids", "kim",
    "kitchen", "kiwi", "km", "kn", "koeln", "kp", "kr", "kw", "ky", "kz", "la", "land", "law",
    "lawyer", "lb", "lc", "lease", "legal", "lgbt", "li", "life", "lighting", "like", "limited",
    "limo", "link", "live", "living", "lk", "llc", "loan", "loans", "lol", "london", "lotto",
    "lr", "ls", "lt", "ltd", "lu", "luxe", "luxury", "lv", "ly", "ma", "maison", "management",
    "market", "marketing", "markets", "mba", "mc", "md", "me", "media", "meet", "menu", "mg",
    "mh", "miami", "mk", "ml", "mm", "mn", "mo", "mobi", "moda", "moe", "mom", "money", "monster",
    "mortgage", "moscow", "motorcycles", "mov", "movie", "mp", "mq", "mr", "ms", "mt", "mu",
    "museum", "music", "mv", "mw", "mx", "my", "mz", "na", "name", "navy", "nc", "ne", "net",
    "network", "news", "nexus", "nf", "ng", "ninja", "nl", "no", "np", "nr", "nu", "nyc", "nz",
    "observer", "om", "one", "ong", "onl", "online", "ooo", "open", "org", "organic",
    "page", "paris", "partners", "parts", "party", "pe", "pf", "pg", "ph", "pharmacy", "phd",
    "phone", "photo", "photography", "photos", "physio", "pics", "pictures", "pink", "pizza",
    "pk", "pl", "plumbing", "plus", "pm", "pn", "poker", "politie", "porn", "post", "pr", "press",
    "pro", "productions", "promo", "properties", "property", "protection", "ps", "pt", "pub",
    "pw", "py", "qa", "qpon", "quebec", "racing", "radio", "re", "realestate", "realtor", "recipes",
    "red", "rehab", "reise", "reisen", "reit", "rent", "rentals", "repair", "report", "republican",
    "rest", "restaurant", "review", "reviews", "rich", "rio", "rip", "ro", "rocks", "rodeo", "rs",
    "rsvp", "ru", "rugby", "ruhr", "run", "rw", "sa", "safe", "sale", "salon", "sarl", "sb", "sc",
    "school", "science", "scot", "sd", "se", "security", "sexy", "sg", "sh", "shoes", "shop",
    "shopping", "show", "si", "singles", "site", "sj", "sk", "ski", "skin", "sl", "sm", "sn",
    "so", "soccer", "social", "software", "solar", "solutions", "space", "sport", "sr", "ss",
    "st", "store", "stream", "studio", "study", "style", "su", "supplies", "supply", "support",
    "surf", "surgery", "sv", "sx", "sy", "sydney", "systems", "sz", "tattoo", "tax", "taxi", "tc",
    "td", "team", "tech", "technology", "tel", "tennis", "tf", "tg", "th", "tickets", "tienda",
    "tips", "tires", "tj", "tk", "tl", "tm", "tn", "to", "today", "tokyo", "tools", "top", "tours",
    "town", "toys", "tr", "trade", "trading", "training", "travel", "trust", "tt", "tube", "tv",
    "tw", "tz", "ua", "ug", "uk", "university", "uno", "uol", "us", "uy", "uz", "va", "vacations",
    "vc", "ve", "vegas", "ventures", "vet", "vg", "vi", "video", "villas", "vin", "vip", "vision",
    "vn", "vodka", "vote", "voting", "voto", "voyage", "vu", "wang", "watch", "webcam", "website",
    "wedding", "wf", "wien", "wiki", "win", "wine", "work", "works", "world", "ws", "wtf", "xn--p1ai",
    "xxx", "xyz", "ye", "yoga", "yt", "za", "zip", "zm", "zone", "zw",
];

/// Returns true iff `tld` (already lowercased) is in the common-TLD table, or
/// is a syntactically valid internationalized TLD label (`xn--` prefix,
/// total length >= 5, suffix ASCII alphanumeric).
fn is_known_tld(tld: &str) -> bool {
    if TLDS.binary_search(&tld).is_ok() {
        return true;
    }
    if let Some(suffix) = tld.strip_prefix("xn--") {
        return tld.len() >= 5 && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_alphanumeric());
    }
    false
}

/// `192.168.0.1`-shaped dotted quad: 4 octets, each `0..=255`, no leading
/// zeros, first octet `1..=255`.
fn is_ipv4(host: &str) -> bool {
    let mut labels = host.split('.');
    let octets: Vec<&str> = (&mut labels).take(5).collect();
    if octets.len() != 4 || labels.next().is_some() {
        return false;
    }
    for (i, octet) in octets.iter().enumerate() {
        if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if octet.len() > 1 && octet.starts_with('0') {
            return false;
        }
        let Ok(value) = octet.parse::<u16>() else {
            return false;
        };
        if value > 255 || (i == 0 && value == 0) {
            return false;
        }
    }
    true
}

/// The one literal look-alike host this engine explicitly blocklists. See
/// DESIGN.md for why this isn't generalized to other look-alikes.
const BLOCKED_HOST: &str = "teiegram.org";

/// Final acceptance check for a matched URL candidate (the `fix_url` step).
/// `host` is the host portion only (no scheme, no path), lowercase except
/// for the case-sensitivity check already applied by the caller.
/// `has_scheme` means the URL included an explicit `scheme://`.
pub fn fix_url_host(host: &str, has_scheme: bool) -> bool {
    let host_lower = host.to_ascii_lowercase();
    if host_lower == BLOCKED_HOST {
        return false;
    }
    if is_ipv4(&host_lower) {
        return true;
    }
    if has_scheme {
        return validate_labels(&host_lower, false);
    }
    validate_labels(&host_lower, true)
}

/// Domain-label structural rules shared by both the scheme and no-scheme
/// paths: no empty label, no label over 63 chars, no all-digit label unless
/// the whole host is IPv4 (handled separately), no trailing hyphen on any
/// label, no underscore in the TLD, and (when `require_known_tld`) the TLD
/// must be in the common-TLD table or a syntactically valid `xn--` label.
fn validate_labels(host: &str, require_known_tld: bool) -> bool {
    if host.is_empty() || !host.contains('.') {
        return false;
    }
    let labels: Vec<&str> = host.split('.').collect();
    for label in &labels {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if label.ends_with('-') {
            return false;
        }
        // A host here has already failed the IPv4 check, so a digit-only
        // label can only be a look-alike, never a real domain label.
        if label.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    let tld = *labels.last().unwrap();
    if tld.contains('_') {
        return false;
    }
    if require_known_tld && !is_known_tld(tld) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tlds_accept() {
        assert!(fix_url_host("example.com", false));
        assert!(fix_url_host("example.co.uk", false));
    }

    #[test]
    fn unknown_tld_rejected_without_scheme() {
        assert!(!fix_url_host("example.zzzzz", false));
    }

    #[test]
    fn unknown_tld_allowed_with_scheme() {
        assert!(fix_url_host("example.zzzzz", true));
    }

    #[test]
    fn ipv4_accepted() {
        assert!(fix_url_host("192.168.0.1", false));
        assert!(!fix_url_host("999.168.0.1", false));
        assert!(!fix_url_host("192.168.00.1", false));
        assert!(!fix_url_host("0.168.0.1", false));
    }

    #[test]
    fn idn_tld_accepted() {
        assert!(fix_url_host("xn--p1ai", false) || is_known_tld("xn--p1ai"));
        assert!(is_known_tld("xn--fiqs8s"));
    }

    #[test]
    fn blocked_lookalike_rejected() {
        assert!(!fix_url_host("teiegram.org", true));
        assert!(!fix_url_host("TeIeGram.org", true));
    }

    #[test]
    fn trailing_hyphen_rejected() {
        assert!(!fix_url_host("example-.com", false));
    }

    #[test]
    fn digit_only_label_rejected_unless_ipv4() {
        assert!(!fix_url_host("123.example.com", false));
        assert!(!fix_url_host("123.example.com", true));
    }
}
