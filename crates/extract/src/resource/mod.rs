// ABOUTME: HTTP retrieval of article pages for the batch client.
// ABOUTME: Guards against private-network targets, caps body size, and decodes charsets to UTF-8.

use std::collections::HashMap;
use std::net::IpAddr;

use bytes::{Bytes, BytesMut};
use ipnet::{Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;
use tracing::debug;
use url::Url;

use crate::error::ExtractError;

/// Largest response body accepted (10 MB).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const OP: &str = "Fetch";

static PRIVATE_V4: Lazy<Vec<Ipv4Net>> = Lazy::new(|| {
    [
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "0.0.0.0/8",
        "100.64.0.0/10",
    ]
    .iter()
    .filter_map(|n| n.parse().ok())
    .collect()
});

static PRIVATE_V6: Lazy<Vec<Ipv6Net>> = Lazy::new(|| {
    ["fc00::/7", "fe80::/10"]
        .iter()
        .filter_map(|n| n.parse().ok())
        .collect()
});

/// Per-call fetch settings.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
}

/// A fetched page body and what the server said about it.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Body as text, honoring the Content-Type charset or sniffing one.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Returns true for loopback, RFC1918, link-local, CGNAT and unique-local addresses.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => PRIVATE_V4.iter().any(|net| net.contains(ip)),
        IpAddr::V6(ip) => {
            if ip.is_loopback() || ip.is_unspecified() {
                return true;
            }
            if let Some(v4) = ip.to_ipv4_mapped() {
                return is_private_ip(&IpAddr::V4(v4));
            }
            PRIVATE_V6.iter().any(|net| net.contains(ip))
        }
    }
}

/// Reject `target` if its host is, or resolves to, a private address.
async fn guard_host(url: &str, target: &Url, what: &str) -> Result<(), ExtractError> {
    let Some(host) = target.host_str() else {
        return Ok(());
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');

    let blocked = || {
        ExtractError::ssrf(
            url,
            OP,
            Some(anyhow::anyhow!("{} resolves to a private address", what)),
        )
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        return if is_private_ip(&ip) { Err(blocked()) } else { Ok(()) };
    }

    let port = target.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        ExtractError::fetch(url, OP, Some(anyhow::anyhow!("DNS lookup failed: {}", e)))
    })?;
    for addr in addrs {
        if is_private_ip(&addr.ip()) {
            return Err(blocked());
        }
    }
    Ok(())
}

fn map_request_error(url: &str, err: reqwest::Error, what: &str) -> ExtractError {
    if err.is_timeout() {
        ExtractError::timeout(url, OP, Some(anyhow::anyhow!("{}: {}", what, err)))
    } else {
        ExtractError::fetch(url, OP, Some(anyhow::anyhow!("{}: {}", what, err)))
    }
}

fn too_large(url: &str) -> ExtractError {
    ExtractError::fetch(
        url,
        OP,
        Some(anyhow::anyhow!("body exceeds {} bytes", MAX_BODY_BYTES)),
    )
}

/// Fetch one page.
///
/// Only http(s) URLs are accepted. Any 2xx status is a success; everything
/// else, and any transport failure, is a fetch error. A request that runs past
/// the client's timeout is a timeout error.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ExtractError> {
    let parsed = Url::parse(url).map_err(|e| {
        ExtractError::invalid_url(url, OP, Some(anyhow::anyhow!("malformed URL: {}", e)))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractError::invalid_url(
            url,
            OP,
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        guard_host(url, &parsed, "host").await?;
    }

    let mut request = client.get(parsed.clone());
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let mut response = request
        .send()
        .await
        .map_err(|e| map_request_error(url, e, "request failed"))?;

    if !opts.allow_private_networks && response.url() != &parsed {
        let final_url = response.url().clone();
        guard_host(url, &final_url, "redirect target").await?;
    }

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::fetch(
            url,
            OP,
            Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
        ));
    }

    if let Some(len) = response.content_length() {
        if len > MAX_BODY_BYTES as u64 {
            return Err(too_large(url));
        }
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase);

    let mut body = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| map_request_error(url, e, "failed to read body"))?
    {
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(too_large(url));
        }
        body.extend_from_slice(&chunk);
    }

    debug!(url, status = status.as_u16(), bytes = body.len(), "fetched");

    Ok(FetchResult {
        status: status.as_u16(),
        final_url,
        content_type,
        body: body.freeze(),
    })
}

/// Decode bytes using the declared charset when known, else a sniffed one.
pub(crate) fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_label)
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()));

    let encoding = declared.unwrap_or_else(|| {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(body, true);
        detector.guess(None, true)
    });
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches(|c| c == '"' || c == '\'').to_ascii_lowercase())
        } else {
            None
        }
    })
}
