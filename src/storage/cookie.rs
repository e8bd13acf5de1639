use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::common::{trace, ErrorKind, Result, Time};
use crate::storage::Storage;

// Seven days.
pub const MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

#[derive(Debug, Clone, PartialEq)]
struct Cookie {
    // Still URL encoded, as sent on the wire.
    value: String,
    expires_at: Option<Time>,
}

/// Minimal user agent cookie jar for a single origin.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: Mutex<BTreeMap<String, Cookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `Set-Cookie` line as a user agent would at `now`.
    pub fn apply_set_cookie(&self, line: &str, now: Time) -> Result<()> {
        let mut parts = line.split(';').map(str::trim);
        let (name, value) = parts
            .next()
            .and_then(|pair| pair.split_once('='))
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| ErrorKind::Decode {
                description: format!("malformed set-cookie line: {}", line),
            })?;

        let mut expires_at = None;
        let mut max_age = None;
        for attr in parts {
            let (attr_name, attr_value) = attr.split_once('=').unwrap_or((attr, ""));
            if attr_name.eq_ignore_ascii_case("max-age") {
                max_age = attr_value.parse::<i64>().ok();
            } else if attr_name.eq_ignore_ascii_case("expires") {
                expires_at = DateTime::parse_from_rfc2822(attr_value)
                    .ok()
                    .map(|t| t.with_timezone(&Utc));
            }
        }
        // Max-Age wins over Expires.
        if let Some(seconds) = max_age {
            expires_at = expiry_after(now, seconds);
        }

        let mut cookies = self.lock();
        if expires_at.map_or(false, |t| t <= now) {
            trace!(name, "Expire cookie");
            cookies.remove(name);
        } else {
            cookies.insert(
                name.to_owned(),
                Cookie {
                    value: value.to_owned(),
                    expires_at,
                },
            );
        }
        Ok(())
    }

    /// Raw (encoded) value of an unexpired cookie.
    pub fn get(&self, name: &str, now: Time) -> Option<String> {
        self.lock()
            .get(name)
            .filter(|c| c.expires_at.map_or(true, |t| t > now))
            .map(|c| c.value.clone())
    }

    /// Render the `Cookie` request header for every unexpired cookie.
    pub fn cookie_header(&self, now: Time) -> String {
        self.lock()
            .iter()
            .filter(|(_, c)| c.expires_at.map_or(true, |t| t > now))
            .map(|(name, c)| format!("{}={}", name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Cookie>> {
        self.cookies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// Expiry for a Max-Age attribute. Values past the representable range
// never expire when positive and expire immediately otherwise.
fn expiry_after(now: Time, seconds: i64) -> Option<Time> {
    match Duration::try_seconds(seconds).and_then(|age| now.checked_add_signed(age)) {
        Some(expires_at) => Some(expires_at),
        None if seconds <= 0 => Some(now),
        None => None,
    }
}

/// Medium storing each item as a URL encoded cookie scoped to the site root.
#[derive(Debug)]
pub struct CookieStorage {
    jar: CookieJar,
    secure: bool,
}

impl CookieStorage {
    /// `Secure` is added to every cookie when the origin is served over https.
    pub fn new(origin: &str) -> Self {
        Self {
            jar: CookieJar::new(),
            secure: origin.starts_with("https:"),
        }
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    pub fn cookie_header(&self) -> String {
        self.jar.cookie_header(Utc::now())
    }

    pub(crate) fn set_cookie_line(&self, key: &str, value: &str) -> String {
        let mut attrs = vec![
            format!("{}={}", key, urlencoding::encode(value)),
            "path=/".to_owned(),
            format!("max-age={}", MAX_AGE_SECONDS),
            "SameSite=Lax".to_owned(),
        ];
        if self.secure {
            attrs.push("Secure".to_owned());
        }
        attrs.join("; ")
    }

    pub(crate) fn remove_cookie_line(&self, key: &str) -> String {
        let mut attrs = vec![
            format!("{}=", key),
            format!("expires={}", EPOCH_EXPIRES),
            "path=/".to_owned(),
            "SameSite=Lax".to_owned(),
        ];
        if self.secure {
            attrs.push("Secure".to_owned());
        }
        attrs.join("; ")
    }
}

impl Storage for CookieStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self.jar.get(key, Utc::now()) {
            Some(raw) if !raw.is_empty() => match urlencoding::decode(&raw) {
                Ok(decoded) => Ok(Some(decoded.into_owned())),
                // Hand the raw value over so the record decoder rejects it.
                Err(err) => {
                    trace!(key, %err, "Cookie value is not valid percent encoding");
                    Ok(Some(raw))
                }
            },
            _ => Ok(None),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.jar
            .apply_set_cookie(&self.set_cookie_line(key, value), Utc::now())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.jar
            .apply_set_cookie(&self.remove_cookie_line(key), Utc::now())
    }
}
