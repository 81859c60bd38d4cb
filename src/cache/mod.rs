//! 对象缓存
//!
//! 缓存后端以插件形式注册，启动时按 `cache.type` 选择，目前用于缓存已认证的用户。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明缓存插件，程序加载时自动注册到插件表
///
/// 目标类型需要提供 `async fn create() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::create()
                            .await
                            .map_err($crate::errors::TutorHubError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
