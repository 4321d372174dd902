//! Expiry detection for presigned object-storage URLs.
//!
//! A terminal cannot try to load an image, so an expired link is detected from
//! the signature parameters in its query string instead:
//!
//! - SigV4 style: `X-Amz-Date=20240131T120000Z&X-Amz-Expires=3600`
//!   (and the `X-Goog-*` equivalents)
//! - SigV2 style: `Expires=<epoch seconds>`

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use reqwest::Url;

const SIGNED_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Instant at which a presigned URL stops working, if the URL says.
pub fn presigned_url_expiry(url: &str) -> Option<DateTime<Utc>> {
    let url = Url::parse(url).ok()?;

    let mut signed_at = None;
    let mut lifetime_secs = None;
    let mut expires_epoch = None;

    for (key, value) in url.query_pairs() {
        match key.to_ascii_lowercase().as_str() {
            "x-amz-date" | "x-goog-date" => signed_at = Some(value.into_owned()),
            "x-amz-expires" | "x-goog-expires" => lifetime_secs = Some(value.into_owned()),
            "expires" => expires_epoch = Some(value.into_owned()),
            _ => {}
        }
    }

    if let (Some(date), Some(secs)) = (signed_at, lifetime_secs) {
        let signed = NaiveDateTime::parse_from_str(&date, SIGNED_DATE_FORMAT).ok()?.and_utc();
        let secs: i64 = secs.parse().ok()?;
        return signed.checked_add_signed(Duration::try_seconds(secs)?);
    }

    expires_epoch
        .and_then(|e| e.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// True only when the URL carries an expiry and it has passed.
/// URLs without signature parameters are assumed live.
pub fn is_presigned_url_expired(url: &str, now: DateTime<Utc>) -> bool {
    presigned_url_expiry(url).is_some_and(|expiry| now >= expiry)
}
