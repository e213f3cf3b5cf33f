use std::sync::OnceLock;

use regex::Regex;

const MASK: &str = "[REDACTED]";

fn builtin_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let mut patterns = Vec::new();
        // userinfo in remote urls, keep the scheme so messages stay readable
        if let Ok(re) = Regex::new(r"(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*://)[^/@\s:]+:[^/@\s]+@") {
            patterns.push(("url_userinfo", re));
        }
        if let Ok(re) = Regex::new(r"gh[pousr]_[A-Za-z0-9]{20,}") {
            patterns.push(("github_token", re));
        }
        if let Ok(re) = Regex::new(r"github_pat_[A-Za-z0-9_]{20,}") {
            patterns.push(("github_fine_grained_pat", re));
        }
        patterns
    })
}

/// Scrub credentials out of text that came back from git before it is logged
/// or surfaced in an error.
pub fn redact(text: &str, secrets: &[&str]) -> String {
    let mut redacted = text.to_string();
    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        redacted = redacted.replace(secret, MASK);
    }
    for (name, re) in builtin_patterns() {
        redacted = if *name == "url_userinfo" {
            re.replace_all(&redacted, format!("${{scheme}}{MASK}@").as_str())
                .into_owned()
        } else {
            re.replace_all(&redacted, MASK).into_owned()
        };
    }
    redacted
}
