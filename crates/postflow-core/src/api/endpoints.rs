//! Endpoint wrappers. Each one is a single `request` call with a fixed
//! path, method and body shape; none of them touch session storage.

use serde_json::json;

use crate::models::content::GenerateRequest;
use crate::models::dashboard::OverviewEnvelope;
use crate::models::plan::{PlansEnvelope, SubscribeRequest, SubscriptionEnvelope};
use crate::models::post::{PostEnvelope, PostsEnvelope};
use crate::models::schedule::{ScheduleEnvelope, SchedulesEnvelope};
use crate::models::social::AccountsEnvelope;
use crate::models::topic::{TopicEnvelope, TopicsEnvelope};
use crate::models::user::UserEnvelope;
use crate::models::{
    AuthResponse, ConnectResponse, DashboardOverview, EntityId, GeneratedContent,
    MessageResponse, PaymentGateway, Plan, Platform, ProfileUpdate, RegisterRequest, Schedule,
    ScheduleInput, ScheduledPost, ScheduledPostInput, SocialAccount, SubscribeResponse,
    Subscription, Topic, TopicInput, User,
};

use super::client::{json_body, RequestOptions};
use super::{ApiClient, ApiError};

/// Acknowledgements may come back as `{ message }` or with an empty body.
fn acknowledgement(body: serde_json::Value) -> MessageResponse {
    MessageResponse {
        message: body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
    }
}

/// Escape a record id for use as a single path segment.
fn id_segment(id: &EntityId) -> Result<String, ApiError> {
    let raw = id.to_string();
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(ApiError::InvalidRequest(format!("invalid id '{}'", raw)));
    }
    Ok(urlencoding::encode(&raw).into_owned())
}

impl ApiClient {
    // ===== Auth =====

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.request(
            "/auth/register",
            RequestOptions::post(json_body(request)?).skip_auth(),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.request(
            "/auth/login",
            RequestOptions::post(json!({ "email": email, "password": password })).skip_auth(),
        )
        .await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthResponse, ApiError> {
        self.request(
            "/auth/verify-otp",
            RequestOptions::post(json!({ "email": email, "otp": otp })).skip_auth(),
        )
        .await
    }

    pub async fn resend_otp(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let body: serde_json::Value = self
            .request(
                "/auth/resend-otp",
                RequestOptions::post(json!({ "email": email })).skip_auth(),
            )
            .await?;
        Ok(acknowledgement(body))
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let body: serde_json::Value = self
            .request(
                "/auth/forgot-password",
                RequestOptions::post(json!({ "email": email })).skip_auth(),
            )
            .await?;
        Ok(acknowledgement(body))
    }

    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body: serde_json::Value = self
            .request(
                "/auth/reset-password",
                RequestOptions::post(json!({ "token": token, "password": password })).skip_auth(),
            )
            .await?;
        Ok(acknowledgement(body))
    }

    pub async fn get_profile(&self) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.request("/auth/profile", RequestOptions::get()).await?;
        Ok(envelope.user)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self
            .request("/auth/profile", RequestOptions::put(json_body(update)?))
            .await?;
        Ok(envelope.user)
    }

    // ===== Social accounts =====

    pub async fn get_social_accounts(&self) -> Result<Vec<SocialAccount>, ApiError> {
        let envelope: AccountsEnvelope =
            self.request("/social/accounts", RequestOptions::get()).await?;
        Ok(envelope.accounts)
    }

    /// Start the provider OAuth flow; the returned URL is opened by the user.
    pub async fn connect_social(&self, platform: Platform) -> Result<ConnectResponse, ApiError> {
        let endpoint = format!("/social/{}/connect", platform.as_str());
        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn disconnect_social(&self, platform: Platform) -> Result<MessageResponse, ApiError> {
        let endpoint = format!("/social/{}/disconnect", platform.as_str());
        let body: serde_json::Value = self.request(&endpoint, RequestOptions::delete()).await?;
        Ok(acknowledgement(body))
    }

    // ===== Schedules =====

    pub async fn get_schedules(&self) -> Result<Vec<Schedule>, ApiError> {
        let envelope: SchedulesEnvelope = self.request("/schedules", RequestOptions::get()).await?;
        Ok(envelope.schedules)
    }

    pub async fn create_schedule(&self, input: &ScheduleInput) -> Result<Schedule, ApiError> {
        let envelope: ScheduleEnvelope = self
            .request("/schedules", RequestOptions::post(json_body(input)?))
            .await?;
        Ok(envelope.schedule)
    }

    pub async fn update_schedule(
        &self,
        id: &EntityId,
        input: &ScheduleInput,
    ) -> Result<Schedule, ApiError> {
        let endpoint = format!("/schedules/{}", id_segment(id)?);
        let envelope: ScheduleEnvelope = self
            .request(&endpoint, RequestOptions::put(json_body(input)?))
            .await?;
        Ok(envelope.schedule)
    }

    pub async fn delete_schedule(&self, id: &EntityId) -> Result<MessageResponse, ApiError> {
        let endpoint = format!("/schedules/{}", id_segment(id)?);
        let body: serde_json::Value = self.request(&endpoint, RequestOptions::delete()).await?;
        Ok(acknowledgement(body))
    }

    // ===== Topics =====

    pub async fn get_topics(&self) -> Result<Vec<Topic>, ApiError> {
        let envelope: TopicsEnvelope = self.request("/topics", RequestOptions::get()).await?;
        Ok(envelope.topics)
    }

    pub async fn create_topic(&self, input: &TopicInput) -> Result<Topic, ApiError> {
        let envelope: TopicEnvelope = self
            .request("/topics", RequestOptions::post(json_body(input)?))
            .await?;
        Ok(envelope.topic)
    }

    pub async fn update_topic(&self, id: &EntityId, input: &TopicInput) -> Result<Topic, ApiError> {
        let endpoint = format!("/topics/{}", id_segment(id)?);
        let envelope: TopicEnvelope = self
            .request(&endpoint, RequestOptions::put(json_body(input)?))
            .await?;
        Ok(envelope.topic)
    }

    pub async fn delete_topic(&self, id: &EntityId) -> Result<MessageResponse, ApiError> {
        let endpoint = format!("/topics/{}", id_segment(id)?);
        let body: serde_json::Value = self.request(&endpoint, RequestOptions::delete()).await?;
        Ok(acknowledgement(body))
    }

    // ===== Content =====

    pub async fn generate_content(
        &self,
        request: &GenerateRequest,
    ) -> Result<GeneratedContent, ApiError> {
        self.request("/content/generate", RequestOptions::post(json_body(request)?))
            .await
    }

    // ===== Plans =====

    /// Public pricing list; no credential needed.
    pub async fn get_plans(&self) -> Result<Vec<Plan>, ApiError> {
        let envelope: PlansEnvelope = self
            .request("/plans", RequestOptions::get().skip_auth())
            .await?;
        Ok(envelope.plans)
    }

    pub async fn subscribe(
        &self,
        plan_id: &EntityId,
        gateway: PaymentGateway,
    ) -> Result<SubscribeResponse, ApiError> {
        let body = json_body(&SubscribeRequest { plan_id, gateway })?;
        self.request("/plans/subscribe", RequestOptions::post(body)).await
    }

    /// Current subscription, or `None` on the free tier.
    pub async fn get_subscription(&self) -> Result<Option<Subscription>, ApiError> {
        let envelope: SubscriptionEnvelope = self
            .request("/plans/subscription", RequestOptions::get())
            .await?;
        Ok(envelope.subscription)
    }

    // ===== Scheduled posts =====

    pub async fn get_scheduled_posts(&self) -> Result<Vec<ScheduledPost>, ApiError> {
        let envelope: PostsEnvelope = self
            .request("/posts/scheduled", RequestOptions::get())
            .await?;
        Ok(envelope.posts)
    }

    pub async fn create_scheduled_post(
        &self,
        input: &ScheduledPostInput,
    ) -> Result<ScheduledPost, ApiError> {
        let envelope: PostEnvelope = self
            .request("/posts/scheduled", RequestOptions::post(json_body(input)?))
            .await?;
        Ok(envelope.post)
    }

    pub async fn update_scheduled_post(
        &self,
        id: &EntityId,
        input: &ScheduledPostInput,
    ) -> Result<ScheduledPost, ApiError> {
        let endpoint = format!("/posts/scheduled/{}", id_segment(id)?);
        let envelope: PostEnvelope = self
            .request(&endpoint, RequestOptions::put(json_body(input)?))
            .await?;
        Ok(envelope.post)
    }

    pub async fn delete_scheduled_post(&self, id: &EntityId) -> Result<MessageResponse, ApiError> {
        let endpoint = format!("/posts/scheduled/{}", id_segment(id)?);
        let body: serde_json::Value = self.request(&endpoint, RequestOptions::delete()).await?;
        Ok(acknowledgement(body))
    }

    // ===== Dashboard =====

    /// Activity overview. Served to the open admin dashboard, so it never
    /// carries the stored credential.
    pub async fn dashboard_overview(&self) -> Result<DashboardOverview, ApiError> {
        let envelope: OverviewEnvelope = self
            .request("/dashboard/overview", RequestOptions::get().skip_auth())
            .await?;
        Ok(envelope.overview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStore, SessionStore, TOKEN_KEY};
    use crate::routing::MemoryLocation;
    use std::net::TcpListener;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(server: &MockServer, store: Arc<MemoryStore>) -> ApiClient {
        ApiClient::builder(server.uri())
            .store(store)
            .location(Arc::new(MemoryLocation::new("/dashboard")))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_auth_response() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"email": "a@b.com", "password": "x"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "T1", "user": {"id": 1}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let api = client(&server, store.clone());
        let auth = api.login("a@b.com", "x").await.unwrap();

        assert_eq!(auth.token.as_deref(), Some("T1"));
        assert_eq!(auth.user.and_then(|u| u.id), Some(EntityId::Num(1)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get_plans_unwraps_envelope() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/plans"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "plans": [{"id": "starter", "name": "Starter", "price": 900}]
            })))
            .mount(&server)
            .await;

        let api = client(&server, Arc::new(MemoryStore::new()));
        let plans = api.get_plans().await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "Starter");
    }

    #[tokio::test]
    async fn test_subscribe_sends_plan_and_gateway() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/plans/subscribe"))
            .and(header("authorization", "Bearer T9"))
            .and(body_json(json!({"planId": "pro", "gateway": "paystack"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "authorizationUrl": "https://checkout.paystack.com/abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "T9").unwrap();
        let api = client(&server, store);
        let resp = api
            .subscribe(&EntityId::from("pro"), PaymentGateway::Paystack)
            .await
            .unwrap();
        assert_eq!(resp.checkout_url, "https://checkout.paystack.com/abc");
    }

    #[tokio::test]
    async fn test_crud_paths() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/topics/7"))
            .and(body_json(json!({"name": "Rust tips"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "topic": {"id": 7, "name": "Rust tips"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/schedules/abc"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/posts/scheduled/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Post cancelled"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/social/twitter/connect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authUrl": "https://x.com/oauth"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, Arc::new(MemoryStore::new()));

        let input = TopicInput {
            name: "Rust tips".to_string(),
            ..Default::default()
        };
        let topic = api.update_topic(&EntityId::Num(7), &input).await.unwrap();
        assert_eq!(topic.name, "Rust tips");

        let ack = api.delete_schedule(&EntityId::from("abc")).await.unwrap();
        assert_eq!(ack.message, None);

        let ack = api.delete_scheduled_post(&EntityId::Num(5)).await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("Post cancelled"));

        let connect = api.connect_social(Platform::Twitter).await.unwrap();
        assert_eq!(connect.auth_url, "https://x.com/oauth");
    }

    #[tokio::test]
    async fn test_string_id_stays_in_one_segment() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/topics/..%2Fauth%2Fprofile"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/auth/profile"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let api = client(&server, Arc::new(MemoryStore::new()));
        api.delete_topic(&EntityId::from("../auth/profile")).await.unwrap();
    }

    #[test]
    fn test_id_segment_rejects_dot_segments() {
        assert_eq!(id_segment(&EntityId::Num(42)).unwrap(), "42");
        assert_eq!(id_segment(&EntityId::from("a b?c#d")).unwrap(), "a%20b%3Fc%23d");
        for bad in ["", ".", ".."] {
            let err = id_segment(&EntityId::Str(bad.to_string())).unwrap_err();
            assert!(matches!(err, ApiError::InvalidRequest(_)));
        }
    }

    #[tokio::test]
    async fn test_dashboard_overview_skips_auth() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard/overview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "overview": {"totalPosts": 3, "publishedPosts": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "T1").unwrap();
        let api = client(&server, store);
        let overview = api.dashboard_overview().await.unwrap();
        assert_eq!(overview.total_posts, 3);

        let received = server.received_requests().await.unwrap();
        assert!(received[0]
            .headers
            .keys()
            .all(|k| !k.as_str().eq_ignore_ascii_case("authorization")));
    }

    #[tokio::test]
    async fn test_get_profile_expired_session() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "jwt expired"})))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "old").unwrap();
        let api = client(&server, store.clone());

        let err = api.get_profile().await.unwrap_err();
        assert!(err.is_session_expired());
        assert!(store.is_empty());
        // No navigator injected: the location itself was redirected
        assert_eq!(api.location().current_path(), "/auth");
    }
}
