// src/types/mod.rs

//! 命令层：每个命令一个函数，全部基于 `Keyspace` 的原语实现
pub mod hash;
pub mod keys;
pub mod list;
pub mod string;

pub use hash::FieldValue;
