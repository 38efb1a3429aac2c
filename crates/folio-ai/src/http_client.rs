use reqwest::Client;

const DISABLE_SYSTEM_PROXY_ENV: &str = "FOLIO_DISABLE_SYSTEM_PROXY";
const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client for every outbound provider call.
///
/// Source-hosting APIs reject requests without a user agent, so one is always set.
pub fn build_http_client() -> Client {
    let builder = Client::builder().user_agent(USER_AGENT);
    let builder = if should_disable_system_proxy() {
        builder.no_proxy()
    } else {
        builder
    };

    builder.build().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Falling back to default HTTP client");
        Client::new()
    })
}

fn should_disable_system_proxy() -> bool {
    if std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() {
        return true;
    }

    cfg!(test)
}
