use auth_core::{AuthorityKind, DirectoryUser};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use once_cell::sync::Lazy;
use secrecy::Secret;
use serde_json::json;
use uuid::Uuid;
use web::{
    client::ApiClient,
    configuration::get_configuration,
    domain::TokenResponse,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to install tracing subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to install tracing subscriber");
    }
});

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub api_client: ApiClient,
    pub test_user: TestUser,
    pub admin_user: TestUser,
}

pub struct TestUser {
    pub user_id: Uuid,
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub is_admin: bool,
}

impl TestUser {
    pub fn generate(is_admin: bool) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            username: SafeEmail().fake(),
            password: Uuid::new_v4().to_string(),
            display_name: "Jane".into(),
            is_admin,
        }
    }

    fn as_directory_user(&self) -> DirectoryUser {
        DirectoryUser {
            username: self.username.clone(),
            password: Secret::new(self.password.clone()),
            user_id: self.user_id.to_string(),
            display_name: self.display_name.clone(),
            is_admin: self.is_admin,
        }
    }
}

impl TestApp {
    pub async fn get_health_check(&self) -> reqwest::Response {
        self.http_client
            .get(&format!("{}/health_check", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, body: &serde_json::Value) -> reqwest::Response {
        self.http_client
            .post(&format!("{}/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Log in as `user` and hand back the issued credential.
    pub async fn login_as(&self, user: &TestUser) -> TokenResponse {
        self.api_client
            .login(&user.username, &user.password)
            .await
            .expect("Failed to log in")
    }

    pub async fn get_with_authorization(&self, path: &str, authorization: &str) -> reqwest::Response {
        self.http_client
            .get(&format!("{}{}", &self.address, path))
            .header("Authorization", authorization)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app(kind: AuthorityKind) -> TestApp {
    // Singleton Pattern
    Lazy::force(&TRACING);

    let test_user = TestUser::generate(false);
    let admin_user = TestUser::generate(true);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration");
        // Wildcard port, the system will find available port
        c.application.port = 0;
        c.authority.kind = kind;
        c.directory.users = vec![test_user.as_directory_user(), admin_user.as_directory_user()];
        c
    };
    let app = Application::build(configuration.clone())
        .await
        .expect("Failed to build application");
    let port = app.port();
    let address = format!("http://127.0.0.1:{}", port);

    // Run the application
    let _ = tokio::spawn(app.run_until_stopped());

    let http_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let api_client = ApiClient::new(address.clone()).unwrap();

    TestApp {
        address,
        http_client,
        api_client,
        test_user,
        admin_user,
    }
}

pub fn login_body(user: &TestUser) -> serde_json::Value {
    json!({ "username": user.username, "password": user.password })
}

pub fn assert_json_message(body: &serde_json::Value, expected: &str) {
    assert_eq!(body["message"], expected, "unexpected error body: {body}");
}
