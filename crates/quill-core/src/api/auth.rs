use serde_json::json;

use super::client::ApiRequest;
use super::{ApiClient, ApiResult};
use crate::models::{AuthPayload, Credentials, RegisterRequest, TokenRefresh, User};

const AUTH_PATH: &str = "/api/v1/auth";

/// Account endpoints under `/api/v1/auth`.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthPayload> {
        let req = ApiRequest::post(format!("{AUTH_PATH}/register")).json(request)?;
        self.client
            .call(req, None)
            .await
            .map_err(|e| e.or_message("Registration failed"))
    }

    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthPayload> {
        let req = ApiRequest::post(format!("{AUTH_PATH}/login")).json(credentials)?;
        self.client
            .call(req, None)
            .await
            .map_err(|e| e.or_message("Login failed"))
    }

    /// Exchanges `refresh_token` for a new token pair.
    pub async fn refresh_token(&self, refresh_token: &str) -> ApiResult<TokenRefresh> {
        self.client
            .refresh(refresh_token)
            .await
            .map_err(|e| e.or_message("Token refresh failed"))
    }

    pub async fn logout(&self) -> ApiResult<()> {
        let req = ApiRequest::post(format!("{AUTH_PATH}/logout")).json(&json!({}))?;
        self.client
            .call_unit(req)
            .await
            .map_err(|e| e.or_message("Logout failed"))
    }

    /// The logged-in user's profile.
    pub async fn me(&self) -> ApiResult<User> {
        self.client
            .call(ApiRequest::get(format!("{AUTH_PATH}/me")), Some("user"))
            .await
            .map_err(|e| e.or_message("Failed to fetch user profile"))
    }

    /// Every user except the caller.
    pub async fn all_users(&self) -> ApiResult<Vec<User>> {
        self.client
            .call(ApiRequest::get(format!("{AUTH_PATH}/all")), Some("users"))
            .await
            .map_err(|e| e.or_message("Failed to fetch users"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::{ApiClient, ApiErrorKind};
    use crate::config::Config;
    use crate::models::{Credentials, RegisterRequest};
    use crate::session::{Session, SessionHandle};

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(server: &MockServer, session: Session) -> ApiClient {
        ApiClient::with_base_url(
            server.uri(),
            &Config::default(),
            SessionHandle::in_memory(session),
        )
        .unwrap()
    }

    fn auth_body() -> serde_json::Value {
        json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "user": {"_id": "u1", "name": "Ada Lovelace", "email": "ada@example.com"},
                "tokens": {
                    "access": {"token": "a1", "expires": "2030-01-01T00:00:00Z"},
                    "refresh": {"token": "r1", "expires": "2030-02-01T00:00:00Z"}
                }
            }
        })
    }

    #[tokio::test]
    async fn test_login_returns_user_and_tokens() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_json(json!({"email": "ada@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, Session::default());
        let payload = client
            .auth()
            .login(&Credentials {
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        assert_eq!(payload.user.name, "Ada Lovelace");
        assert_eq!(payload.tokens.access.token, "a1");
        assert_eq!(payload.tokens.refresh.token, "r1");
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_backend_message() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let client = client(&server, Session::default());
        let err = client
            .auth()
            .login(&Credentials {
                email: "x@y.z".into(),
                password: "bad".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_register_falls_back_to_default_message() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client(&server, Session::default());
        let err = client
            .auth()
            .register(&RegisterRequest {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.message, "Registration failed");
    }

    #[tokio::test]
    async fn test_me_and_all_users_read_nested_data() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .and(header("authorization", "Bearer a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"data": {"user": {"_id": "u1", "name": "Ada", "email": "ada@example.com"}}}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"users": [
                    {"_id": "u2", "name": "Grace"},
                    {"_id": "u3", "name": "Emmy"}
                ]}
            })))
            .mount(&server)
            .await;

        let session = Session {
            access_token: Some("a1".into()),
            ..Session::default()
        };
        let client = client(&server, session);
        let me = client.auth().me().await.unwrap();
        assert_eq!(me.id, "u1");

        let users = client.auth().all_users().await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Grace", "Emmy"]);
    }

    #[tokio::test]
    async fn test_logout_sends_bearer() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .and(header("authorization", "Bearer a1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Logged out"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = Session {
            access_token: Some("a1".into()),
            refresh_token: Some("r1".into()),
            user: None,
        };
        client(&server, session).auth().logout().await.unwrap();
    }
}
