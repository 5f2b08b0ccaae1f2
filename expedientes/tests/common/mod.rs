use expedientes::config::{BoardConfig, Config};
use expedientes::connectors::auth::AuthProvider;
use expedientes::connectors::auth::memory::MemoryAuth;
use expedientes::connectors::store::memory::MemoryStore;

pub const PASSWORD: &str = "secreto";

pub struct TestContext {
    pub auth: MemoryAuth,
    pub store: MemoryStore,
    pub config: BoardConfig,
}

pub fn setup() -> TestContext {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    TestContext {
        auth: MemoryAuth::new(),
        store: MemoryStore::new(),
        config: Config::default().board,
    }
}

/// Registers `email` and leaves nobody signed in. Returns the new user id.
pub async fn register(auth: &MemoryAuth, email: &str) -> anyhow::Result<String> {
    let user = auth.sign_up(email, PASSWORD).await?;
    auth.sign_out().await;
    Ok(user.uid)
}
