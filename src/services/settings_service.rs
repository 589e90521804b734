use crate::error::AppResult;
use crate::infrastructure::{keys, JsonStoreExt, KeyValueStore};
use crate::models::{EducationSettings, UserProfile};
use std::sync::Arc;
use tracing::info;

/// 个人资料与教学设置
pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 未保存过或内容损坏时返回默认资料
    pub fn profile(&self) -> UserProfile {
        self.store.load_json(keys::USER_PROFILE).unwrap_or_default()
    }

    pub fn save_profile(&self, profile: &UserProfile) -> AppResult<()> {
        info!("💾 保存个人资料: {}", profile.display_name());
        self.store.save_json(keys::USER_PROFILE, profile)
    }

    /// 退出登录时清除本地资料
    pub fn clear_profile(&self) -> AppResult<()> {
        self.store.remove(keys::USER_PROFILE)
    }

    pub fn education(&self) -> EducationSettings {
        self.store
            .load_json(keys::EDUCATION_SETTINGS)
            .unwrap_or_default()
    }

    pub fn save_education(&self, settings: &EducationSettings) -> AppResult<()> {
        self.store.save_json(keys::EDUCATION_SETTINGS, settings)
    }
}
