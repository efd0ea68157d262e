//! User agent generation

use rand::seq::SliceRandom;
use rand::Rng;

const CHROME_VERSIONS: [&str; 6] = [
    "120.0.0.0",
    "121.0.0.0",
    "122.0.0.0",
    "123.0.0.0",
    "124.0.0.0",
    "125.0.0.0",
];

const FIREFOX_VERSIONS: [&str; 5] = ["121.0", "122.0", "123.0", "124.0", "125.0"];

const OS_STRINGS: [&str; 5] = [
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 14_2_1",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

/// Generate a random but realistic desktop browser user agent
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();

    let os = OS_STRINGS.choose(&mut rng).copied().unwrap_or(OS_STRINGS[0]);

    // Chrome two times out of three
    if rng.gen_range(0..3) < 2 {
        let chrome = CHROME_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(CHROME_VERSIONS[0]);
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            os, chrome
        )
    } else {
        let firefox = FIREFOX_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(FIREFOX_VERSIONS[0]);
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            os, firefox, firefox
        )
    }
}

/// Standard accept headers for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
}

/// Standard accept headers for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}
