//! Custom-protocol deep links such as `rocketchat://chat.acme.com`.

use url::Url;

/// Find the first `<scheme>://` argument and resolve it to a host url.
///
/// Deep links use encrypted transport unless their query carries
/// `insecure=true`.
pub fn extract_deep_link<I, S>(args: I, scheme: &str) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let prefix = format!("{}://", scheme);
    args.into_iter()
        .find(|arg| arg.as_ref().starts_with(&prefix))
        .and_then(|arg| resolve_deep_link(arg.as_ref()))
}

/// Resolve a single deep link to `https://host[:port]` or `http://...`.
pub fn resolve_deep_link(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    let host = parsed.host_str().filter(|host| !host.is_empty())?;

    let insecure = parsed
        .query_pairs()
        .any(|(key, value)| key == "insecure" && value == "true");
    let transport = if insecure { "http" } else { "https" };

    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}", transport, host, port),
        None => format!("{}://{}", transport, host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_https() {
        let args = ["/usr/bin/app", "--flag", "rocketchat://chat.acme.com/"];
        assert_eq!(
            extract_deep_link(args, "rocketchat").as_deref(),
            Some("https://chat.acme.com")
        );
    }

    #[test]
    fn test_insecure_marker_selects_http() {
        let args = vec!["rocketchat://localhost:3000/?insecure=true".to_string()];
        assert_eq!(
            extract_deep_link(args, "rocketchat").as_deref(),
            Some("http://localhost:3000")
        );
    }

    #[test]
    fn test_insecure_false_stays_https() {
        assert_eq!(
            resolve_deep_link("rocketchat://chat.acme.com?insecure=false").as_deref(),
            Some("https://chat.acme.com")
        );
    }

    #[test]
    fn test_no_matching_argument() {
        let args = ["app", "https://chat.acme.com", "otherapp://chat.acme.com"];
        assert!(extract_deep_link(args, "rocketchat").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let args = ["rocketchat://one.com", "rocketchat://two.com"];
        assert_eq!(
            extract_deep_link(args, "rocketchat").as_deref(),
            Some("https://one.com")
        );
    }
}
