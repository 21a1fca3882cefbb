// src/api.rs

//! HTTP 接口的请求 / 响应体（JSON）

use serde::{Deserialize, Serialize};

use crate::types::FieldValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStringRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueResponse {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetValueByFieldRequest {
    pub key: String,
    pub field: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFieldAndValueRequest {
    pub key: String,
    pub pairs: Vec<FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFieldAndValueResponse {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFromListRequest {
    pub key: String,
    pub index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushToListRequest {
    pub key: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushToListResponse {
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetValueInListRequest {
    pub key: String,
    pub index: i64,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpireKeyRequest {
    pub key: String,
    pub ttl: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysRequest {
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// 所有失败响应统一的 body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
