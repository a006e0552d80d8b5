use super::*;
use std::cell::RefCell;
use std::collections::VecDeque;

use propcrm_shared::protocol::{DeleteTaskRequest, ListTasksRequest, ListUsersRequest};
use propcrm_shared::TaskStatus;

// =========================================================
// Shared Mock Components
// =========================================================

struct TestContext {
    /// Operation log to verify outgoing requests
    log: RefCell<Vec<String>>,
    /// Queued responses, popped in order; defaults to 200 "null"
    responses: RefCell<VecDeque<ApiResult<HttpResponse>>>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            log: RefCell::new(Vec::new()),
            responses: RefCell::new(VecDeque::new()),
        }
    }

    fn queue(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }
}

struct TestTransport {
    ctx: Rc<TestContext>,
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for TestTransport {
    async fn send(
        &self,
        req: HttpRequest,
        _cancel: Option<&CancelHandle>,
    ) -> ApiResult<HttpResponse> {
        let has_auth = req.headers.iter().any(|(k, _)| k == "Authorization");
        self.ctx
            .log
            .borrow_mut()
            .push(format!("{:?} {} auth={}", req.method, req.url, has_auth));

        self.ctx
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(HttpResponse {
                status: 200,
                body: "null".to_string(),
            }))
    }
}

struct TestSession {
    token: RefCell<Option<String>>,
    path: RefCell<String>,
    /// Recorded `from` paths of every expire_session call
    expired: RefCell<Vec<String>>,
}

impl TestSession {
    fn new(token: Option<&str>, path: &str) -> Rc<Self> {
        Rc::new(Self {
            token: RefCell::new(token.map(|t| t.to_string())),
            path: RefCell::new(path.to_string()),
            expired: RefCell::new(Vec::new()),
        })
    }
}

impl SessionBridge for TestSession {
    fn bearer_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn expire_session(&self, from: &str) {
        self.token.borrow_mut().take();
        self.expired.borrow_mut().push(from.to_string());
    }
}

fn setup(
    token: Option<&str>,
    path: &str,
) -> (Rc<TestContext>, Rc<TestSession>, ApiClient<TestTransport>) {
    let ctx = Rc::new(TestContext::new());
    let session = TestSession::new(token, path);
    let client = ApiClient::new(
        "http://api.test/".to_string(),
        TestTransport { ctx: ctx.clone() },
        session.clone(),
    );
    (ctx, session, client)
}

// =========================================================
// Header & URL construction
// =========================================================

#[tokio::test]
async fn injects_bearer_header_when_token_present() {
    let (ctx, _session, client) = setup(Some("tok-1"), "/dashboard");
    ctx.queue(200, "[]");

    client.send(&ListUsersRequest).await.unwrap();

    let log = ctx.log.borrow();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("http://api.test/api/v1/users"));
    assert!(log[0].ends_with("auth=true"));
}

#[tokio::test]
async fn omits_bearer_header_without_token() {
    let (ctx, _session, client) = setup(None, "/login");
    ctx.queue(200, "[]");

    client.send(&ListUsersRequest).await.unwrap();

    assert!(ctx.log.borrow()[0].ends_with("auth=false"));
}

#[tokio::test]
async fn builds_query_string_from_filters() {
    let (ctx, _session, client) = setup(Some("tok"), "/tasks");
    ctx.queue(200, "[]");

    let req = ListTasksRequest {
        status: Some(TaskStatus::Open),
        assignee_id: Some("u1".to_string()),
    };
    client.send(&req).await.unwrap();

    let log = ctx.log.borrow();
    assert!(log[0].contains("/api/v1/tasks?status=open&assignee_id=u1"));
}

#[tokio::test]
async fn percent_encodes_query_values() {
    let (ctx, _session, client) = setup(Some("tok"), "/tasks");
    ctx.queue(200, "[]");

    // Free-form filter values must not be able to break the URL apart
    let req = ListTasksRequest {
        status: None,
        assignee_id: Some("a b&c=d".to_string()),
    };
    client.send(&req).await.unwrap();

    let log = ctx.log.borrow();
    assert!(log[0].contains("assignee_id=a%20b%26c%3Dd"));
}

#[tokio::test]
async fn decodes_unit_response_from_empty_body() {
    let (ctx, _session, client) = setup(Some("tok"), "/tasks");
    ctx.queue(204, "");

    let req = DeleteTaskRequest {
        id: "t1".to_string(),
    };
    client.send(&req).await.unwrap();

    assert!(ctx.log.borrow()[0].contains("/api/v1/tasks/t1"));
}

// =========================================================
// Context integration
// =========================================================

#[test]
fn client_context_wrapper_meets_the_context_bounds() {
    // provide_context demands Send + Sync payloads; the Rc-held client
    // is provided wrapped in SendWrapper
    fn assert_context_payload<T: Clone + Send + Sync + 'static>() {}
    assert_context_payload::<SendWrapper<Rc<AppApiClient>>>();
}

// =========================================================
// 401 handling
// =========================================================

#[tokio::test]
async fn unauthorized_off_auth_entry_expires_session_with_origin() {
    // Scenario: user on /properties/42, session expires, next call returns 401
    let (ctx, session, client) = setup(Some("stale"), "/properties/42");
    ctx.queue(401, r#"{"message":"token expired"}"#);

    let err = client.send(&ListUsersRequest).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(session.token.borrow().is_none(), "token must be cleared");
    assert_eq!(*session.expired.borrow(), vec!["/properties/42".to_string()]);
}

#[tokio::test]
async fn unauthorized_on_login_path_never_redirects() {
    let (ctx, session, client) = setup(None, "/login");
    ctx.queue(401, r#"{"message":"bad credentials"}"#);

    let err = client.send(&ListUsersRequest).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "bad credentials");
    assert!(session.expired.borrow().is_empty(), "no redirect from login");
}

#[tokio::test]
async fn unauthorized_on_register_path_never_redirects() {
    let (ctx, session, client) = setup(None, "/register");
    ctx.queue(401, "{}");

    let _ = client.send(&ListUsersRequest).await.unwrap_err();

    assert!(session.expired.borrow().is_empty());
}

#[tokio::test]
async fn send_silent_bypasses_global_unauthorized_handling() {
    let (ctx, session, client) = setup(Some("stale"), "/dashboard");
    ctx.queue(401, "{}");

    let err = client.send_silent(&ListUsersRequest).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(session.expired.borrow().is_empty());
    assert!(session.token.borrow().is_some(), "tokens untouched");
}

// =========================================================
// Error taxonomy & retry
// =========================================================

#[tokio::test]
async fn validation_error_carries_server_detail() {
    let (ctx, _session, client) = setup(Some("tok"), "/tasks");
    ctx.queue(422, r#"{"message":"title is required","detail":"title"}"#);

    let err = client.send(&ListUsersRequest).await.unwrap_err();

    assert_eq!(err.status, Some(422));
    assert_eq!(err.user_message(), "title is required");
    assert_eq!(err.detail.as_deref(), Some("title"));
}

#[tokio::test]
async fn retry_once_recovers_from_transient_failure() {
    let (ctx, _session, client) = setup(Some("tok"), "/users");
    ctx.queue(500, "");
    ctx.queue(200, "[]");

    client.send_retry_once(&ListUsersRequest).await.unwrap();

    assert_eq!(ctx.log.borrow().len(), 2);
}

#[tokio::test]
async fn retry_once_gives_up_after_second_failure() {
    let (ctx, _session, client) = setup(Some("tok"), "/users");
    ctx.queue(500, "");
    ctx.queue(502, "");

    let err = client.send_retry_once(&ListUsersRequest).await.unwrap_err();

    assert_eq!(err.status, Some(502));
    assert_eq!(ctx.log.borrow().len(), 2);
}

#[tokio::test]
async fn retry_once_does_not_replay_unauthorized() {
    let (ctx, session, client) = setup(Some("stale"), "/users");
    ctx.queue(401, "{}");

    let err = client.send_retry_once(&ListUsersRequest).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(ctx.log.borrow().len(), 1, "401 is not retried");
    assert_eq!(session.expired.borrow().len(), 1);
}
