//! Crawler detection by user-agent substring.

const BOT_PATTERNS: [&str; 4] = ["bot", "crawler", "spider", "scraper"];

/// True when the user agent looks automated. Case-insensitive.
pub fn is_bot(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    BOT_PATTERNS.iter().any(|p| ua.contains(p))
}
