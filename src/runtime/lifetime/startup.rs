use crate::blob::{ObjectStore, create_object_store};
use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::services::ai::LlmClient;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub object_store: Arc<dyn ObjectStore>,
    pub llm_client: Option<Arc<LlmClient>>,
}

/// 按名称构造缓存插件
async fn build_cache_plugin(
    name: &str,
) -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let constructor = get_object_cache_plugin(name)
        .ok_or_else(|| format!("Cache backend '{name}' not found in registry"))?;
    let cache = constructor().await?;
    Ok(Arc::from(cache))
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache_plugin(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            return Ok(cache);
        }
        Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        match build_cache_plugin("moka").await {
            Ok(cache) => {
                warn!("Successfully created fallback Moka (in-memory) cache backend");
                return Ok(cache);
            }
            Err(e) => warn!("Failed to create fallback Moka cache: {}", e),
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 创建 LLM 客户端，未启用或缺少 API key 时返回 None，批改走演示数据
fn create_llm_client(config: &AppConfig) -> Option<Arc<LlmClient>> {
    if !config.llm_available() {
        warn!("LLM is disabled or has no API key, AI grading will return mock results");
        return None;
    }

    match LlmClient::new(config.llm.clone()) {
        Ok(client) => {
            warn!("LLM client ready (model: {})", client.model());
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("Failed to create LLM client: {}, falling back to mock results", e);
            None
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、对象存储和 LLM 客户端
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let object_store = create_object_store(config);
    warn!("Object store rooted at {}", config.upload.dir);

    let llm_client = create_llm_client(config);

    StartupContext {
        storage,
        cache,
        object_store,
        llm_client,
    }
}
