//! REST client core.
//!
//! [`ApiClient`] owns the HTTP connection pool, the base URL and the shared
//! [`AuthSession`]. Every request carries the session's bearer token. Any
//! `401` answer clears the session before the error reaches the caller, so
//! a rejected token is never sent twice.

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use ovolab_core::types::{LoginResponse, Usuario};
use ovolab_core::{FormGuards, FormId};

use crate::auth::{AuthSession, CredentialStore, StoredSession};
use crate::autosave::{AutosaveHandle, Autosaver};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::resources::{
    ChequeosGfe, Crud, DonadoraApi, DraftApi, Fecundaciones, FotoApi, HealthApi, OpuSessions,
    Resource, SesionesTransferencia, Transferencias,
};
use crate::submit::GuardedForm;

/// Async client for the Ovolab backend.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base: Url,
    health_url: Url,
    autosave_delay: Duration,
    forms: FormGuards,
    session: AuthSession,
}

impl ApiClient {
    /// Creates a client, restoring any session stored at the configured
    /// credentials path.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let store = CredentialStore::new(config.credentials_path()?);
        Self::with_session(config, AuthSession::open(store)?)
    }

    /// Creates a client over an existing session.
    pub fn with_session(config: &ClientConfig, session: AuthSession) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        let base = parse_base(&config.api_url)?;
        let health = config.health_url();
        let health_url = Url::parse(&health).map_err(|e| Error::url(health.as_str(), e))?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base,
                health_url,
                autosave_delay: config.autosave_delay(),
                forms: FormGuards::new(),
                session,
            }),
        })
    }

    /// The shared session.
    pub fn session(&self) -> &AuthSession {
        &self.inner.session
    }

    /// Base URL of the versioned API, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    /// Logs in with form-encoded credentials and stores the token.
    pub async fn login(&self, usuario: &str, password: &str) -> Result<Usuario> {
        let req = self
            .request(Method::POST, "auth/login")?
            .form(&[("username", usuario), ("password", password)]);
        let login: LoginResponse = self.send_json(req).await?;
        tracing::info!(usuario = %login.user.usuario, "logged in");
        self.inner.session.set(StoredSession {
            token: login.access_token,
            user: Some(login.user.clone()),
        })?;
        Ok(login.user)
    }

    /// The current user's profile, refreshing the cached copy.
    pub async fn me(&self) -> Result<Usuario> {
        let user: Usuario = self.get_json("auth/me").await?;
        self.inner.session.set_user(user.clone())?;
        Ok(user)
    }

    /// Forgets the session locally. The backend keeps no session state.
    pub fn logout(&self) {
        self.inner.session.logout();
        tracing::info!("logged out");
    }

    // ------------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------------

    /// Donor registry.
    pub fn donadoras(&self) -> DonadoraApi {
        DonadoraApi::new(self.clone())
    }

    /// OPU sessions with their extractions.
    pub fn opu(&self) -> Crud<OpuSessions> {
        Crud::new(self.clone())
    }

    /// Fertilization records.
    pub fn fecundaciones(&self) -> Crud<Fecundaciones> {
        Crud::new(self.clone())
    }

    /// Transfer sessions with their transfers.
    pub fn sesiones_transferencia(&self) -> Crud<SesionesTransferencia> {
        Crud::new(self.clone())
    }

    /// Individual transfers.
    pub fn transferencias(&self) -> Crud<Transferencias> {
        Crud::new(self.clone())
    }

    /// Pregnancy checks.
    pub fn gfe(&self) -> Crud<ChequeosGfe> {
        Crud::new(self.clone())
    }

    /// Photo attachments.
    pub fn fotos(&self) -> FotoApi {
        FotoApi::new(self.clone())
    }

    /// Autosaved drafts.
    pub fn drafts(&self) -> DraftApi {
        DraftApi::new(self.clone())
    }

    /// Backend health.
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    /// The form `form` writing to resource `R`.
    ///
    /// Forms with the same id share one submission guard across every clone
    /// of this client.
    pub fn form<R: Resource>(&self, form: impl Into<FormId>) -> GuardedForm<R> {
        GuardedForm::new(Crud::new(self.clone()), self.inner.forms.guard(form))
    }

    /// Starts autosaving drafts of form `modulo`/`tipo_registro` with the
    /// configured delay. Must be called inside a Tokio runtime.
    pub fn autosave(
        &self,
        modulo: impl Into<String>,
        tipo_registro: impl Into<String>,
    ) -> AutosaveHandle {
        Autosaver::spawn(
            Arc::new(self.drafts()),
            modulo,
            tipo_registro,
            self.inner.autosave_delay,
        )
    }

    // ------------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------------

    /// Resolves `path` against the API base.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        self.inner
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::url(path, e))
    }

    pub(crate) fn health_url(&self) -> &Url {
        &self.inner.health_url
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.request_url(method, self.url(path)?))
    }

    pub(crate) fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.inner.http.request(method, url);
        match self.inner.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends `req` and maps non-success answers to errors.
    pub(crate) async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let response = req.send().await?;
        self.check(response).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = self.send(req).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn send_empty(&self, req: RequestBuilder) -> Result<()> {
        self.send(req).await?;
        Ok(())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(self.request(Method::GET, path)?).await
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::GET, path)?.query(query))
            .await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path)?.json(body))
            .await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::PUT, path)?.json(body))
            .await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<()> {
        self.send_empty(self.request(Method::POST, path)?).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, path)?).await
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%message, "backend rejected the session, logging out");
            self.inner.session.logout();
            return Err(Error::Unauthorized { message });
        }
        tracing::debug!(status = status.as_u16(), %message, "request failed");
        Err(Error::api(status.as_u16(), message))
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| Error::url(raw, e))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Extracts a readable message from an error body.
///
/// FastAPI-style bodies carry `detail` as a string or as a list of
/// `{ "msg": .. }` entries, which are joined with `; `. Anything else falls
/// back to the raw text, then to the status reason.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct Body {
        detail: Detail,
    }

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Detail {
        Text(String),
        Items(Vec<Item>),
        Other(serde_json::Value),
    }

    #[derive(serde::Deserialize)]
    struct Item {
        msg: String,
    }

    match serde_json::from_str::<Body>(body) {
        Ok(Body {
            detail: Detail::Text(text),
        }) => text,
        Ok(Body {
            detail: Detail::Items(items),
        }) => items
            .into_iter()
            .map(|i| i.msg)
            .collect::<Vec<_>>()
            .join("; "),
        Ok(Body {
            detail: Detail::Other(value),
        }) => value.to_string(),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("error")
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"detail": "Número de registro duplicado"}"#);
        assert_eq!(msg, "Número de registro duplicado");
    }

    #[test]
    fn test_detail_list_joined() {
        let body = r#"{"detail": [
            {"loc": ["body", "nombre"], "msg": "field required", "type": "missing"},
            {"loc": ["body", "raza"], "msg": "field required", "type": "missing"}
        ]}"#;
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "field required; field required"
        );
    }

    #[test]
    fn test_raw_text_fallback() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "HTTP 500 Internal Server Error"
        );
    }

    #[test]
    fn test_base_gets_trailing_slash() {
        let base = parse_base("http://localhost:8000/api/v1").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8000/api/v1/");
        assert_eq!(
            base.join("donadoras/").unwrap().as_str(),
            "http://localhost:8000/api/v1/donadoras/"
        );
    }

    #[test]
    fn test_invalid_base() {
        let err = parse_base("not a url").unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn test_url_strips_leading_slash() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            credentials_path: Some(dir.path().join("s.json")),
            ..Default::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.url("/opu/3").unwrap().as_str(),
            "http://localhost:8000/api/v1/opu/3"
        );
        assert_eq!(client.health_url().as_str(), "http://localhost:8000/health");
    }
}
