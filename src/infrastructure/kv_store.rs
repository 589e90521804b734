//! 本地键值存储 - 基础设施层
//!
//! 持有唯一的持久化资源，只暴露"按键读写整段 JSON 文本"的能力

use crate::error::{AppResult, StorageError};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 固定的存储键
pub mod keys {
    /// 历史评分记录，最新的在最前
    pub const GRADING_HISTORY: &str = "gradingHistory";
    /// 导入的评分标准，下次打开评分页面时覆盖当前评分标准
    pub const IMPORTED_RUBRIC: &str = "importedRubric";
    /// 已导入的课程材料文件名
    pub const COURSE_MATERIALS: &str = "courseMaterials";
    pub const USER_PROFILE: &str = "userProfile";
    pub const EDUCATION_SETTINGS: &str = "educationSettings";
}

/// 键值存储端口
///
/// 职责：
/// - 按键整体读写 JSON 文本
/// - 不认识评分记录 / 评分标准
/// - 不做合并，调用方必须先读后写
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> AppResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// 内存存储，用于测试和嵌入场景
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// 文件存储：目录下每个键对应一个 `<key>.json` 文件
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// 创建文件存储，目录不存在时自动创建
    pub fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StorageError::WriteFailed {
            key: root.display().to_string(),
            source,
        })?;
        debug!("本地存储目录: {}", root.display());
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                source,
            }
            .into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        // 先写临时文件再改名，避免中途失败留下半截 JSON
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|source| StorageError::WriteFailed {
                key: key.to_string(),
                source,
            })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::WriteFailed {
                key: key.to_string(),
                source,
            }
            .into()),
        }
    }
}

/// 在任意键值存储上按类型读写 JSON
pub trait JsonStoreExt {
    /// 读取并解析
    ///
    /// 键不存在返回 None；读取失败或内容无法解析时记录警告并同样返回 None，
    /// 调用方按"空"处理，不会向上抛错。
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()>;
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("⚠️ 读取本地存储 {} 失败，按空值处理: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("⚠️ 本地存储 {} 内容无法解析，按空值处理: {}", key, e);
                None
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::SerializeFailed {
            key: key.to_string(),
            source,
        })?;
        debug!("写入本地存储 {} ({} 字节)", key, raw.len());
        self.write(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip_and_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.read("k").unwrap(), None);
        store.write("k", "[1]").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("[1]"));
        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn corrupted_value_loads_as_none() {
        let store = MemoryStore::new();
        store.write(keys::GRADING_HISTORY, "{not json").unwrap();
        let loaded: Option<Vec<u32>> = store.load_json(keys::GRADING_HISTORY);
        assert_eq!(loaded, None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path().join("data")).unwrap();
            store.save_json(keys::COURSE_MATERIALS, &["week1.pdf"]).unwrap();
        }
        let store = FileStore::open(dir.path().join("data")).unwrap();
        let loaded: Option<Vec<String>> = store.load_json(keys::COURSE_MATERIALS);
        assert_eq!(loaded, Some(vec!["week1.pdf".to_string()]));

        store.remove(keys::COURSE_MATERIALS).unwrap();
        store.remove(keys::COURSE_MATERIALS).unwrap();
        assert_eq!(store.read(keys::COURSE_MATERIALS).unwrap(), None);
    }
}
