//! JSON 序列化器（工具与测试用）

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::RecordSerializer;
use crate::utils::EditorError;

/// 紧凑 JSON 序列化器
#[derive(Debug)]
pub struct JsonSerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> RecordSerializer<T> for JsonSerializer<T> {
    fn deserialize(&self, bytes: &[u8]) -> Result<T, EditorError> {
        serde_json::from_slice(bytes).map_err(|e| EditorError::Deserialization(e.to_string()))
    }

    fn serialize(&self, value: &T) -> Result<Vec<u8>, EditorError> {
        serde_json::to_vec(value).map_err(|e| EditorError::Serialization(e.to_string()))
    }
}
