use chrono::Duration;
use tubely_api::auth::make_jwt;
use uuid::Uuid;

/// Secret shared by the test config and the tokens issued here.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// A caller with a valid bearer token.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn new() -> Self {
        let user_id = Uuid::new_v4();
        let token = make_jwt(user_id, TEST_JWT_SECRET, Duration::hours(1))
            .expect("Failed to issue test token");
        TestUser { user_id, token }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
