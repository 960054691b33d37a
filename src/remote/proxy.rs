//! Admission rules for the forwarding proxy
//!
//! Some platform hosts refuse cross-origin requests, so the editor asks a
//! same-origin endpoint to fetch on its behalf. The endpoint only forwards
//! HTTPS targets, and only for pages served from its own origin.

use thiserror::Error;
use url::Url;

/// Why a proxy request was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyRejection {
    #[error("Bad request: {reason}")]
    BadRequest { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },
}

impl ProxyRejection {
    /// HTTP status to answer with
    pub fn status(&self) -> u16 {
        match self {
            ProxyRejection::BadRequest { .. } => 400,
            ProxyRejection::Forbidden { .. } => 403,
        }
    }

    fn bad_request(reason: impl Into<String>) -> Self {
        ProxyRejection::BadRequest {
            reason: reason.into(),
        }
    }

    fn forbidden(reason: impl Into<String>) -> Self {
        ProxyRejection::Forbidden {
            reason: reason.into(),
        }
    }
}

/// Origin triple compared between `Host` and `Referer`
#[derive(Debug, PartialEq, Eq)]
struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    fn of(url: &Url) -> Option<Self> {
        Some(Self {
            scheme: url.scheme().to_string(),
            host: url.host_str()?.to_ascii_lowercase(),
            port: url.port_or_known_default(),
        })
    }
}

/// Admission check for the forwarding proxy
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyGuard;

impl ProxyGuard {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether to forward a request.
    ///
    /// - `target`: the `url` parameter; must be an absolute `https` URL (400)
    /// - `host`: the request's `Host` header, `name[:port]`
    /// - `referer`: the request's `Referer` header
    /// - `https`: whether the request itself arrived over TLS
    ///
    /// Host and referer must agree on scheme, host and port, with missing
    /// ports defaulting to 443/80 (403).
    pub fn admit(
        &self,
        target: Option<&str>,
        host: Option<&str>,
        referer: Option<&str>,
        https: bool,
    ) -> Result<Url, ProxyRejection> {
        let target = target
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProxyRejection::bad_request("missing url"))?;
        let target =
            Url::parse(target).map_err(|e| ProxyRejection::bad_request(format!("{}: {}", target, e)))?;
        if target.scheme() != "https" {
            return Err(ProxyRejection::bad_request(format!(
                "only https targets are forwarded, got {}",
                target.scheme()
            )));
        }

        let scheme = if https { "https" } else { "http" };
        let host = host
            .filter(|h| !h.is_empty())
            .and_then(|h| Url::parse(&format!("{}://{}", scheme, h)).ok())
            .and_then(|u| Origin::of(&u))
            .ok_or_else(|| ProxyRejection::forbidden("missing or invalid host"))?;
        let referer = referer
            .and_then(|r| Url::parse(r).ok())
            .and_then(|u| Origin::of(&u))
            .ok_or_else(|| ProxyRejection::forbidden("missing or invalid referer"))?;

        if host != referer {
            return Err(ProxyRejection::forbidden(format!(
                "referer {}://{} does not match host {}://{}",
                referer.scheme, referer.host, host.scheme, host.host
            )));
        }

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const TARGET: &str = "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

    #[test]
    fn test_same_origin_is_admitted() {
        let url = ProxyGuard::new()
            .admit(Some(TARGET), Some("editor.test"), Some("https://editor.test/index.html"), true)
            .unwrap();
        assert_eq!(url.host_str(), Some("piston-meta.mojang.com"));
    }

    #[test]
    fn test_default_ports_match_explicit() {
        let guard = ProxyGuard::new();
        assert!(guard
            .admit(Some(TARGET), Some("editor.test:443"), Some("https://editor.test/"), true)
            .is_ok());
        assert!(guard
            .admit(Some(TARGET), Some("editor.test"), Some("http://editor.test:80/page"), false)
            .is_ok());
    }

    #[test_case(None ; "missing target")]
    #[test_case(Some("") ; "empty target")]
    #[test_case(Some("http://example.net/file.json") ; "plain http")]
    #[test_case(Some("not a url") ; "unparseable")]
    fn test_bad_targets(target: Option<&str>) {
        let err = ProxyGuard::new()
            .admit(target, Some("editor.test"), Some("https://editor.test/"), true)
            .unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test_case(Some("editor.test"), None, true ; "missing referer")]
    #[test_case(Some("editor.test"), Some("https://elsewhere.test/"), true ; "other host")]
    #[test_case(Some("editor.test:8443"), Some("https://editor.test/"), true ; "other port")]
    #[test_case(Some("editor.test"), Some("http://editor.test/"), true ; "other scheme")]
    #[test_case(None, Some("https://editor.test/"), true ; "missing host")]
    fn test_foreign_origins(host: Option<&str>, referer: Option<&str>, https: bool) {
        let err = ProxyGuard::new().admit(Some(TARGET), host, referer, https).unwrap_err();
        assert_eq!(err.status(), 403);
    }
}
