use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ApiClient, ClientError, ClientResult, Credential};
use crate::dto::auth_dto::{AuthResponse, SignupPayload, UserResponse};

/// Where a signed-in credential is kept between calls.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> ClientResult<Option<Credential>>;
    async fn save(&self, credential: &Credential) -> ClientResult<()>;
    async fn clear(&self) -> ClientResult<()>;
}

#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<RwLock<Option<Credential>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ClientResult<Option<Credential>> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, credential: &Credential) -> ClientResult<()> {
        *self.inner.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.inner.write().await = None;
        Ok(())
    }
}

/// Keeps the token in a single file; an absent or empty file means signed out.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ClientResult<Option<Credential>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| Credential::bearer(token)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, credential: &Credential) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, credential.token()).await?;
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Pairs an [`ApiClient`] with a [`TokenStore`] for the sign-in lifecycle.
pub struct AuthSession<S: TokenStore> {
    client: ApiClient,
    store: S,
}

impl<S: TokenStore> AuthSession<S> {
    pub fn new(client: ApiClient, store: S) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn credential(&self) -> ClientResult<Credential> {
        self.store.load().await?.ok_or(ClientError::MissingCredential)
    }

    pub async fn signup(&self, payload: &SignupPayload) -> ClientResult<AuthResponse> {
        let auth = self.client.signup(payload).await?;
        self.store.save(&Credential::from(&auth)).await?;
        Ok(auth)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let auth = self.client.login(email, password).await?;
        self.store.save(&Credential::from(&auth)).await?;
        Ok(auth)
    }

    pub async fn current_user(&self) -> ClientResult<UserResponse> {
        let credential = self.credential().await?;
        self.client.current_user(&credential).await
    }

    /// Clears the stored token even when the server call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        if let Some(credential) = self.store.load().await? {
            if let Err(e) = self.client.logout(&credential).await {
                tracing::warn!(error = %e, "Logout request failed; clearing local token anyway");
            }
        }
        self.store.clear().await
    }
}
