use crate::config::NotifierBackend;
use crate::error::SecretError;
use crate::traits::SecretProvider;

/// Logical secret names resolved from the secret store.
///
/// All names for the active notifier backend are required; see
/// [`CredentialBundle::resolve`].
pub mod secret_names {
    pub const SALESFORCE_USERNAME: &str = "salesforce-username";
    pub const SALESFORCE_PASSWORD: &str = "salesforce-password";
    pub const SALESFORCE_TOKEN: &str = "salesforce-token";
    pub const SALESFORCE_INSTANCE_URL: &str = "salesforce-instance-url";
    pub const SENDGRID_API_KEY: &str = "sendgrid-api-key";
    pub const GMAIL_CLIENT_ID: &str = "gmail-client-id";
    pub const GMAIL_CLIENT_SECRET: &str = "gmail-client-secret";
    pub const GMAIL_REFRESH_TOKEN: &str = "gmail-refresh-token";
}

#[derive(Debug, Clone)]
pub struct CrmCredentials {
    pub username: String,
    pub password: String,
    pub security_token: String,
    pub instance_url: String,
}

/// Variant-specific notifier credentials.
#[derive(Debug, Clone)]
pub enum NotifierCredentials {
    SendGrid {
        api_key: String,
    },
    Gmail {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
}

/// The full set of resolved secrets for one invocation. Immutable once
/// resolved.
#[derive(Debug, Clone)]
pub struct CredentialBundle {
    pub crm: CrmCredentials,
    pub notifier: NotifierCredentials,
}

impl CredentialBundle {
    /// Resolve every secret required for `backend`.
    ///
    /// All-or-nothing: the first unresolvable name fails the whole bundle;
    /// a partially-resolved bundle is never returned.
    #[tracing::instrument(level = "debug", skip(provider))]
    pub async fn resolve(
        provider: &dyn SecretProvider,
        backend: NotifierBackend,
    ) -> Result<Self, SecretError> {
        let crm = CrmCredentials {
            username: provider.access(secret_names::SALESFORCE_USERNAME).await?,
            password: provider.access(secret_names::SALESFORCE_PASSWORD).await?,
            security_token: provider.access(secret_names::SALESFORCE_TOKEN).await?,
            instance_url: provider
                .access(secret_names::SALESFORCE_INSTANCE_URL)
                .await?,
        };
        let notifier = match backend {
            NotifierBackend::SendGrid => NotifierCredentials::SendGrid {
                api_key: provider.access(secret_names::SENDGRID_API_KEY).await?,
            },
            NotifierBackend::Gmail => NotifierCredentials::Gmail {
                client_id: provider.access(secret_names::GMAIL_CLIENT_ID).await?,
                client_secret: provider.access(secret_names::GMAIL_CLIENT_SECRET).await?,
                refresh_token: provider.access(secret_names::GMAIL_REFRESH_TOKEN).await?,
            },
        };
        tracing::debug!("resolved credential bundle");
        Ok(Self { crm, notifier })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapProvider {
        secrets: HashMap<&'static str, &'static str>,
    }

    impl MapProvider {
        fn with_all() -> Self {
            let mut secrets = HashMap::new();
            secrets.insert(secret_names::SALESFORCE_USERNAME, "ops@example.com");
            secrets.insert(secret_names::SALESFORCE_PASSWORD, "hunter2");
            secrets.insert(secret_names::SALESFORCE_TOKEN, "tok");
            secrets.insert(
                secret_names::SALESFORCE_INSTANCE_URL,
                "https://example.my.salesforce.com",
            );
            secrets.insert(secret_names::SENDGRID_API_KEY, "SG.key");
            secrets.insert(secret_names::GMAIL_CLIENT_ID, "cid");
            secrets.insert(secret_names::GMAIL_CLIENT_SECRET, "csecret");
            secrets.insert(secret_names::GMAIL_REFRESH_TOKEN, "rtok");
            Self { secrets }
        }

        fn without(mut self, name: &'static str) -> Self {
            self.secrets.remove(name);
            self
        }
    }

    #[async_trait]
    impl SecretProvider for MapProvider {
        async fn access(&self, name: &str) -> Result<String, SecretError> {
            self.secrets
                .get(name)
                .map(|s| s.to_string())
                .ok_or_else(|| SecretError::Missing(name.to_string()))
        }
    }

    #[tokio::test]
    async fn resolves_sendgrid_bundle() {
        let provider = MapProvider::with_all();
        let bundle = CredentialBundle::resolve(&provider, NotifierBackend::SendGrid)
            .await
            .unwrap();
        assert_eq!(bundle.crm.username, "ops@example.com");
        assert!(matches!(
            bundle.notifier,
            NotifierCredentials::SendGrid { ref api_key } if api_key == "SG.key"
        ));
    }

    #[tokio::test]
    async fn resolves_gmail_bundle() {
        let provider = MapProvider::with_all();
        let bundle = CredentialBundle::resolve(&provider, NotifierBackend::Gmail)
            .await
            .unwrap();
        assert!(matches!(
            bundle.notifier,
            NotifierCredentials::Gmail { ref refresh_token, .. } if refresh_token == "rtok"
        ));
    }

    #[tokio::test]
    async fn one_missing_secret_fails_the_whole_bundle() {
        let provider = MapProvider::with_all().without(secret_names::SALESFORCE_TOKEN);
        let err = CredentialBundle::resolve(&provider, NotifierBackend::SendGrid)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SecretError::Missing(ref name) if name == secret_names::SALESFORCE_TOKEN
        ));
    }

    #[tokio::test]
    async fn notifier_secrets_are_required_for_the_active_backend() {
        let provider = MapProvider::with_all().without(secret_names::GMAIL_REFRESH_TOKEN);
        // SendGrid bundle does not need gmail secrets.
        assert!(
            CredentialBundle::resolve(&provider, NotifierBackend::SendGrid)
                .await
                .is_ok()
        );
        // Gmail bundle does.
        assert!(CredentialBundle::resolve(&provider, NotifierBackend::Gmail)
            .await
            .is_err());
    }
}
