// src/server.rs
//! 这是 crab-cache 服务的网络层：
//! - 基于 warp 的 HTTP 路由
//! - 解码 JSON 请求体
//! - 调度到 types 命令层执行
//! - 把命令结果 / 错误映射成 HTTP 状态码 + JSON
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::api::*;
use crate::config::Config;
use crate::engine::Keyspace;
use crate::error::CacheError;
use crate::expire::{self, Reaper};
use crate::types::{hash, keys, list, string};

/// 请求体上限 64 KiB
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// 启动 HTTP 服务
/// 创建 keyspace 和后台清理任务，直到收到 Ctrl-C 才返回
pub async fn serve(cfg: Config) -> Result<()> {
    cfg.validate()?;
    let addr = cfg.addr()?;

    let ks = Arc::new(Keyspace::new());
    let reaper = Reaper::start(Arc::clone(&ks), cfg.sweep_interval());

    let (bound, server) = warp::serve(routes(ks))
        .try_bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %bound, "crab-cache listening");

    server.await;
    info!("shutting down");
    reaper.stop().await;
    Ok(())
}

/// 全部路由，外层统一处理拒绝并记录访问日志
pub fn routes(
    ks: Arc<Keyspace>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    // --- String ---
    let string_get = warp::path!("cache" / "string" / String)
        .and(warp::get())
        .and_then(decode_key)
        .and(with_keyspace(ks.clone()))
        .map(get_string);
    let string_set = warp::path!("cache" / "string")
        .and(warp::put())
        .and(json_body::<SetStringRequest>())
        .and(with_keyspace(ks.clone()))
        .map(set_string);

    // --- Hash ---
    let map_get = warp::path!("cache" / "map")
        .and(warp::get())
        .and(json_body::<GetValueByFieldRequest>())
        .and(with_keyspace(ks.clone()))
        .map(get_value_by_field);
    let map_set = warp::path!("cache" / "map")
        .and(warp::put())
        .and(json_body::<SetFieldAndValueRequest>())
        .and(with_keyspace(ks.clone()))
        .map(set_field_and_value);

    // --- List ---
    let list_get = warp::path!("cache" / "list")
        .and(warp::get())
        .and(json_body::<GetFromListRequest>())
        .and(with_keyspace(ks.clone()))
        .map(get_from_list);
    let list_push = warp::path!("cache" / "list")
        .and(warp::post())
        .and(json_body::<PushToListRequest>())
        .and(with_keyspace(ks.clone()))
        .map(push_to_list);
    let list_set = warp::path!("cache" / "list")
        .and(warp::patch())
        .and(json_body::<SetValueInListRequest>())
        .and(with_keyspace(ks.clone()))
        .map(set_value_in_list);

    // --- Keys ---
    let key_del = warp::path!("cache" / "keys" / String)
        .and(warp::delete())
        .and_then(decode_key)
        .and(with_keyspace(ks.clone()))
        .map(delete_key);
    let key_expire = warp::path!("cache" / "keys" / "expire")
        .and(warp::patch())
        .and(json_body::<ExpireKeyRequest>())
        .and(with_keyspace(ks.clone()))
        .map(expire_key);
    let key_list = warp::path!("cache" / "keys")
        .and(warp::get())
        .and(json_body::<KeysRequest>())
        .and(with_keyspace(ks))
        .map(get_keys);

    string_get
        .or(string_set)
        .unify()
        .or(map_get)
        .unify()
        .or(map_set)
        .unify()
        .or(list_get)
        .unify()
        .or(list_push)
        .unify()
        .or(list_set)
        .unify()
        .or(key_del)
        .unify()
        .or(key_expire)
        .unify()
        .or(key_list)
        .unify()
        .recover(handle_rejection)
        .with(warp::log("crab_cache::access"))
}

fn with_keyspace(
    ks: Arc<Keyspace>,
) -> impl Filter<Extract = (Arc<Keyspace>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&ks))
}

/// 路径里的 key 是百分号编码的原始片段，解码失败（非 UTF-8）拒绝为 400
#[derive(Debug)]
struct InvalidKey;

impl warp::reject::Reject for InvalidKey {}

/// 声明的 Content-Length 超过上限
#[derive(Debug)]
struct BodyTooLarge;

impl warp::reject::Reject for BodyTooLarge {}

async fn decode_key(raw: String) -> Result<String, Rejection> {
    urlencoding::decode(&raw)
        .map(|key| key.into_owned())
        .map_err(|_| warp::reject::custom(InvalidKey))
}

/// 解码 JSON 请求体
///
/// 不要求 Content-Length：缺失或为空的 body 交给反序列化报 400，
/// 只有声明的长度超过上限时才提前拒绝。
fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(|len: Option<u64>| async move {
            match len {
                Some(n) if n > MAX_BODY_BYTES => Err(warp::reject::custom(BodyTooLarge)),
                _ => Ok(()),
            }
        })
        .untuple_one()
        .and(warp::body::json())
}

fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

fn error_reply(message: impl Into<String>, status: StatusCode) -> Response {
    json_reply(&ErrorResponse { message: message.into() }, status)
}

fn empty_reply(status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply(), status).into_response()
}

/// 命令层错误一律 422
fn command_error(err: CacheError) -> Response {
    error_reply(err.to_string(), StatusCode::UNPROCESSABLE_ENTITY)
}

fn get_string(key: String, ks: Arc<Keyspace>) -> Response {
    match string::get(&ks, &key) {
        Ok(Some(value)) => json_reply(&ValueResponse { value }, StatusCode::OK),
        Ok(None) => error_reply("key is not found", StatusCode::NOT_FOUND),
        Err(e) => command_error(e),
    }
}

fn set_string(req: SetStringRequest, ks: Arc<Keyspace>) -> Response {
    string::set(&ks, &req.key, &req.value);
    empty_reply(StatusCode::CREATED)
}

fn get_value_by_field(req: GetValueByFieldRequest, ks: Arc<Keyspace>) -> Response {
    match hash::hget(&ks, &req.key, &req.field) {
        Ok(Some(value)) => json_reply(&ValueResponse { value }, StatusCode::OK),
        Ok(None) => error_reply("key or field is not found", StatusCode::NOT_FOUND),
        Err(e) => command_error(e),
    }
}

fn set_field_and_value(req: SetFieldAndValueRequest, ks: Arc<Keyspace>) -> Response {
    match hash::hset(&ks, &req.key, &req.pairs) {
        Ok(count) => json_reply(&SetFieldAndValueResponse { count }, StatusCode::OK),
        Err(e) => command_error(e),
    }
}

fn get_from_list(req: GetFromListRequest, ks: Arc<Keyspace>) -> Response {
    match list::lget(&ks, &req.key, req.index) {
        Ok(value) => json_reply(&ValueResponse { value }, StatusCode::OK),
        Err(e) => command_error(e),
    }
}

fn push_to_list(req: PushToListRequest, ks: Arc<Keyspace>) -> Response {
    match list::lpush(&ks, &req.key, &req.values) {
        Ok(size) => json_reply(&PushToListResponse { size }, StatusCode::OK),
        Err(e) => command_error(e),
    }
}

fn set_value_in_list(req: SetValueInListRequest, ks: Arc<Keyspace>) -> Response {
    match list::lset(&ks, &req.key, req.index, &req.value) {
        Ok(()) => empty_reply(StatusCode::NO_CONTENT),
        Err(e) => command_error(e),
    }
}

fn delete_key(key: String, ks: Arc<Keyspace>) -> Response {
    // 不存在也返回 204
    keys::del(&ks, &key);
    empty_reply(StatusCode::NO_CONTENT)
}

fn expire_key(req: ExpireKeyRequest, ks: Arc<Keyspace>) -> Response {
    if expire::expire(&ks, &req.key, req.ttl) {
        empty_reply(StatusCode::NO_CONTENT)
    } else {
        error_reply("key is not found", StatusCode::NOT_FOUND)
    }
}

fn get_keys(req: KeysRequest, ks: Arc<Keyspace>) -> Response {
    match keys::keys(&ks, &req.pattern) {
        Ok(keys) => json_reply(&KeysResponse { keys }, StatusCode::OK),
        Err(e) => command_error(e),
    }
}

/// 把 warp 的拒绝统一转成 `{message}` 响应
async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<InvalidKey>().is_some() {
        (StatusCode::BAD_REQUEST, "key is not valid UTF-8".to_string())
    } else if err.find::<warp::reject::InvalidHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid request header".to_string())
    } else if err.find::<BodyTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "request body too large".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "content type must be application/json".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "route not found".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("unhandled rejection: {:?}", err))
    };
    debug!(%status, %message, "request rejected");
    Ok(error_reply(message, status))
}
