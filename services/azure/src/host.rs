use azure_speech::Auth;

/// Credentials for the regional endpoints.
#[derive(Debug, Clone)]
pub struct Host {
    pub(crate) auth: Auth,
}

impl Host {
    pub fn from_subscription(
        region: impl Into<String>,
        subscription_key: impl Into<String>,
    ) -> Self {
        let auth = Auth::from_subscription(region, subscription_key);
        Self { auth }
    }
}
