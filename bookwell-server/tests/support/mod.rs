use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use bookwell_core::application::AppUnitOfWorkBuilder;
use bookwell_core::domain::{Notification, UserId};
use bookwell_core::error::{BookingError, Result as CoreResult};
use bookwell_core::i18n::MessageCatalog;
use bookwell_core::infrastructure::memory::InMemoryStore;
use bookwell_core::ports::NotificationTransport;
use bookwell_server::infra::app_state::RuntimeSettings;
use bookwell_server::{AppState, cors_layer, create_app};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const SUPERADMIN_TOKEN: &str = "superadmin-token";
pub const CUSTOMER_TOKEN: &str = "customer-token";
pub const TRANSLATOR_TOKEN: &str = "translator-token";

pub const ADMIN_ID: UserId = UserId(1);
pub const SUPERADMIN_ID: UserId = UserId(2);
pub const CUSTOMER_ID: UserId = UserId(10);
pub const TRANSLATOR_ID: UserId = UserId(20);

/// Records every notification it accepts; can be switched to fail.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Notification>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, notification: &Notification) -> CoreResult<()> {
        if self.fail {
            return Err(BookingError::Transport("provider unavailable".into()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[allow(unused)]
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub transport: Arc<RecordingTransport>,
}

#[allow(unused)]
pub async fn build_test_app() -> TestApp {
    build_test_app_with(RuntimeSettings::default(), RecordingTransport::default()).await
}

pub async fn build_test_app_with(
    settings: RuntimeSettings,
    transport: RecordingTransport,
) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    store.register_token(ADMIN_TOKEN, ADMIN_ID, 2).await;
    store.register_token(SUPERADMIN_TOKEN, SUPERADMIN_ID, 3).await;
    store.register_token(CUSTOMER_TOKEN, CUSTOMER_ID, 1).await;
    store.register_token(TRANSLATOR_TOKEN, TRANSLATOR_ID, 1).await;

    let transport = Arc::new(transport);
    let unit_of_work = AppUnitOfWorkBuilder::new()
        .with_memory(store.clone())
        .with_notifications(transport.clone())
        .build()
        .expect("unit of work");

    let state = AppState::new(unit_of_work, settings, MessageCatalog::new());
    let app = create_app(state, cors_layer(&[]));
    let server = TestServer::builder()
        .build(app)
        .expect("test server");

    TestApp {
        server,
        store,
        transport,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
