//! Session guard around [`RawGraphQlClient`].
//!
//! Every backend call runs under the read side of a fair `RwLock` holding the
//! current tokens; logging in takes the write side. `tokio::sync::RwLock`
//! queues waiters in arrival order, so a pending re-login is not starved by a
//! stream of later readers, and no call ever runs with a half-replaced token
//! pair.
//!
//! A call rejected with [`GraphQlError::Forbidden`] triggers one re-login and
//! one retry. A call made before the first login is treated as forbidden, so
//! the session is established lazily when [`SessionGuard::connect`] was not
//! called.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use forms_sdk::Device;
use secrecy::SecretString;
use tokio::sync::RwLock;
use tracing::instrument;

use super::error::GraphQlError;
use super::models::{FormDto, ListFormsVariables, PagerDto, SubmissionDto};
use super::raw_client::{RawGraphQlClient, Tokens};
use crate::domain::ports::FormsBackend;

pub struct SessionGuard {
    raw: RawGraphQlClient,
    username: String,
    password: SecretString,
    session: RwLock<Option<Arc<Tokens>>>,
}

impl SessionGuard {
    #[must_use]
    pub fn new(raw: RawGraphQlClient, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            raw,
            username: username.into(),
            password,
            session: RwLock::new(None),
        }
    }

    /// Log in, replacing any current session.
    ///
    /// # Errors
    ///
    /// Returns the login failure; the previous session is kept in that case.
    #[instrument(skip_all, fields(username = %self.username))]
    pub async fn connect(&self) -> Result<(), GraphQlError> {
        let mut session = self.session.write().await;
        self.login_into(&mut session).await
    }

    /// Drop the current session. The next call logs in again.
    #[instrument(skip_all)]
    pub async fn close(&self) {
        let mut session = self.session.write().await;
        if session.take().is_some() {
            tracing::info!("GraphQL session closed");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn login_into(&self, session: &mut Option<Arc<Tokens>>) -> Result<(), GraphQlError> {
        let tokens = self.raw.login(&self.username, &self.password).await?;
        *session = Some(Arc::new(tokens));
        tracing::info!("logged in to GraphQL backend");
        Ok(())
    }

    /// Run `call` with the current tokens, renewing the session once on
    /// `Forbidden`.
    async fn with_session<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T, GraphQlError>
    where
        F: Fn(Arc<Tokens>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, GraphQlError>> + Send,
        T: Send,
    {
        let (used, result) = self.attempt(&call).await;
        match result {
            Err(err) if err.is_forbidden() => {
                tracing::warn!(operation, error = %err, "session rejected, logging in again");
                self.renew(used.as_ref()).await?;
                self.attempt(&call).await.1
            }
            other => other,
        }
    }

    /// One call under the read lock. Also returns the tokens it ran with.
    async fn attempt<T, F, Fut>(&self, call: &F) -> (Option<Arc<Tokens>>, Result<T, GraphQlError>)
    where
        F: Fn(Arc<Tokens>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, GraphQlError>> + Send,
        T: Send,
    {
        let session = self.session.read().await;
        let Some(tokens) = session.as_ref().map(Arc::clone) else {
            return (
                None,
                Err(GraphQlError::Forbidden(Some("no active session".to_owned()))),
            );
        };

        let result = call(Arc::clone(&tokens)).await;
        drop(session);
        (Some(tokens), result)
    }

    /// Log in again unless another caller already replaced the `stale` tokens
    /// while this one was waiting for the write lock.
    async fn renew(&self, stale: Option<&Arc<Tokens>>) -> Result<(), GraphQlError> {
        let mut session = self.session.write().await;
        let already_renewed = match (session.as_ref(), stale) {
            (Some(current), Some(stale)) => !Arc::ptr_eq(current, stale),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if already_renewed {
            tracing::debug!("session already renewed by a concurrent call");
            return Ok(());
        }
        self.login_into(&mut session).await
    }
}

#[async_trait]
impl FormsBackend for SessionGuard {
    #[instrument(skip_all)]
    async fn list_forms(&self, variables: ListFormsVariables) -> Result<PagerDto, GraphQlError> {
        self.with_session("list_forms", move |tokens| async move {
            self.raw.list_forms(&tokens.access, variables).await
        })
        .await
    }

    #[instrument(skip_all, fields(form_id = %id))]
    async fn get_form(&self, id: &str) -> Result<FormDto, GraphQlError> {
        self.with_session("get_form", move |tokens| async move {
            self.raw.get_form(&tokens.access, id).await
        })
        .await
    }

    #[instrument(skip_all, fields(form_id = %form_id))]
    async fn start_submission(
        &self,
        form_id: &str,
        token: &str,
        device: &Device,
    ) -> Result<SubmissionDto, GraphQlError> {
        self.with_session("start_submission", move |tokens| async move {
            self.raw
                .start_submission(&tokens.access, form_id, token, device)
                .await
        })
        .await
    }

    #[instrument(skip_all, fields(submission_id = %submission_id, field_id = %field_id))]
    async fn submit_field(
        &self,
        submission_id: &str,
        token: &str,
        field_id: &str,
        data: &str,
    ) -> Result<SubmissionDto, GraphQlError> {
        self.with_session("submit_field", move |tokens| async move {
            self.raw
                .submit_field(&tokens.access, submission_id, token, field_id, data)
                .await
        })
        .await
    }

    #[instrument(skip_all, fields(submission_id = %submission_id))]
    async fn finish_submission(&self, submission_id: &str) -> Result<SubmissionDto, GraphQlError> {
        self.with_session("finish_submission", move |tokens| async move {
            self.raw.finish_submission(&tokens.access, submission_id).await
        })
        .await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::infra::graphql::models::{GraphQlErrorEntry, GraphQlErrorExtensions, GraphQlRequest};
    use crate::infra::graphql::transport::{GraphQlTransport, TransportError};
    use secrecy::ExposeSecret;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{Notify, Semaphore};

    /// Hands out `access-N` on the N-th login and replays scripted results
    /// for every other operation.
    #[derive(Default)]
    struct ScriptedTransport {
        logins: AtomicUsize,
        script: Mutex<VecDeque<Result<Value, TransportError>>>,
        bearers: Mutex<Vec<String>>,
        gate: Option<Arc<Semaphore>>,
        entered: Notify,
    }

    impl ScriptedTransport {
        fn with_script(script: Vec<Result<Value, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                ..Default::default()
            }
        }

        fn bearers(&self) -> Vec<String> {
            self.bearers.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GraphQlTransport for ScriptedTransport {
        async fn execute(
            &self,
            request: GraphQlRequest,
            bearer: Option<&SecretString>,
        ) -> Result<Value, TransportError> {
            if request.operation_name == "authLogin" {
                let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
                return Ok(json!({
                    "tokens": {"access": format!("access-{n}"), "refresh": format!("refresh-{n}")}
                }));
            }

            let bearer = bearer.map(|b| b.expose_secret().to_owned()).unwrap_or_default();
            self.bearers.lock().unwrap().push(bearer);
            self.entered.notify_one();
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }

            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(pager_data()))
        }
    }

    fn pager_data() -> Value {
        json!({"pager": {"entries": [], "total": 0, "limit": 10, "start": 0}})
    }

    fn forbidden() -> Result<Value, TransportError> {
        Err(TransportError::Query(vec![GraphQlErrorEntry {
            message: Some("token expired".to_owned()),
            extensions: Some(GraphQlErrorExtensions {
                code: Some("FORBIDDEN".to_owned()),
            }),
        }]))
    }

    fn guard(transport: &Arc<ScriptedTransport>) -> SessionGuard {
        let raw = RawGraphQlClient::new(Arc::clone(transport) as Arc<dyn GraphQlTransport>);
        SessionGuard::new(raw, "admin", SecretString::from("password"))
    }

    #[tokio::test]
    async fn first_call_logs_in_lazily() {
        let transport = Arc::new(ScriptedTransport::default());
        let guard = guard(&transport);
        assert!(!guard.is_connected().await);

        guard.list_forms(ListFormsVariables::default()).await.unwrap();

        assert_eq!(transport.logins.load(Ordering::SeqCst), 1);
        assert_eq!(transport.bearers(), vec!["access-1"]);
        assert!(guard.is_connected().await);
    }

    #[tokio::test]
    async fn forbidden_then_success_logs_in_once_and_retries_once() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![
            forbidden(),
            Ok(json!({"pager": {
                "entries": [{"id": "f1", "title": "One"}],
                "total": 1, "limit": 10, "start": 0
            }})),
        ]));
        let guard = guard(&transport);
        guard.connect().await.unwrap();

        let pager = guard.list_forms(ListFormsVariables::default()).await.unwrap();

        assert_eq!(pager.entries[0].id, "f1");
        // connect + exactly one re-login
        assert_eq!(transport.logins.load(Ordering::SeqCst), 2);
        assert_eq!(transport.bearers(), vec!["access-1", "access-2"]);
    }

    #[tokio::test]
    async fn second_forbidden_propagates() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![forbidden(), forbidden()]));
        let guard = guard(&transport);
        guard.connect().await.unwrap();

        let err = guard.get_form("f1").await.unwrap_err();

        assert!(err.is_forbidden());
        assert_eq!(transport.logins.load(Ordering::SeqCst), 2);
        assert_eq!(transport.bearers().len(), 2);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![Err(
            TransportError::Connect("refused".to_owned()),
        )]));
        let guard = guard(&transport);
        guard.connect().await.unwrap();

        let err = guard.finish_submission("s1").await.unwrap_err();

        assert_eq!(err, GraphQlError::Connect("refused".to_owned()));
        assert_eq!(transport.logins.load(Ordering::SeqCst), 1);
        assert_eq!(transport.bearers().len(), 1);
    }

    #[tokio::test]
    async fn close_clears_session() {
        let transport = Arc::new(ScriptedTransport::default());
        let guard = guard(&transport);
        guard.connect().await.unwrap();
        guard.close().await;
        assert!(!guard.is_connected().await);

        guard.list_forms(ListFormsVariables::default()).await.unwrap();
        assert_eq!(transport.bearers(), vec!["access-2"]);
    }

    #[tokio::test]
    async fn concurrent_forbidden_calls_share_one_relogin() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(ScriptedTransport {
            script: Mutex::new(vec![forbidden(), forbidden()].into()),
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let guard = Arc::new(guard(&transport));
        guard.connect().await.unwrap();

        let calls: Vec<_> = (0..2)
            .map(|_| {
                let guard = Arc::clone(&guard);
                tokio::spawn(async move { guard.list_forms(ListFormsVariables::default()).await })
            })
            .collect();
        // Both reads are in flight with the same tokens before either is rejected.
        while transport.bearers().len() < 2 {
            tokio::task::yield_now().await;
        }

        gate.add_permits(4);
        for call in calls {
            call.await.unwrap().unwrap();
        }

        // connect + exactly one re-login
        assert_eq!(transport.logins.load(Ordering::SeqCst), 2);
        assert_eq!(
            transport.bearers(),
            vec!["access-1", "access-1", "access-2", "access-2"]
        );
    }

    #[tokio::test]
    async fn queued_login_is_not_overtaken_by_later_reads() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(ScriptedTransport {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let guard = Arc::new(guard(&transport));
        guard.connect().await.unwrap();

        // First read parks inside the backend call while holding the read lock.
        let first = tokio::spawn({
            let guard = Arc::clone(&guard);
            async move { guard.list_forms(ListFormsVariables::default()).await }
        });
        transport.entered.notified().await;

        // A re-login queues behind it.
        let relogin = tokio::spawn({
            let guard = Arc::clone(&guard);
            async move { guard.connect().await }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        // A later read must wait for the queued login.
        let second = tokio::spawn({
            let guard = Arc::clone(&guard);
            async move { guard.list_forms(ListFormsVariables::default()).await }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(transport.bearers(), vec!["access-1"]);

        gate.add_permits(2);
        first.await.unwrap().unwrap();
        relogin.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(transport.bearers(), vec!["access-1", "access-2"]);
    }
}
