//! 商品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// 商品 ID 的字节长度（十六进制表示为 24 个字符）
pub const PRODUCT_ID_LEN: usize = 12;

/// 商品 ID
///
/// 布局：4 字节秒级时间戳（大端）+ 5 字节进程随机数 + 3 字节自增计数器（大端）。
/// 同一进程内生成的 ID 按创建顺序递增（计数器回绕除外）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId([u8; PRODUCT_ID_LEN]);

/// ID 格式错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无效的商品 ID: {0:?}")]
pub struct InvalidProductId(pub String);

fn process_unique() -> &'static [u8; 5] {
    static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS_UNIQUE.get_or_init(|| {
        let random = Uuid::new_v4();
        let mut bytes = [0u8; 5];
        bytes.copy_from_slice(&random.as_bytes()[..5]);
        bytes
    })
}

fn next_count() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| {
        let random = Uuid::new_v4();
        let seed = u32::from_be_bytes([0, random.as_bytes()[0], random.as_bytes()[1], 0]);
        AtomicU32::new(seed)
    });
    counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff
}

impl ProductId {
    /// 生成新的商品 ID
    pub fn new() -> Self {
        let mut bytes = [0u8; PRODUCT_ID_LEN];
        let secs = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..].copy_from_slice(&next_count().to_be_bytes()[1..]);
        Self(bytes)
    }

    /// 解析 24 位十六进制字符串，大小写均可
    pub fn parse(raw: &str) -> Result<Self, InvalidProductId> {
        let mut bytes = [0u8; PRODUCT_ID_LEN];
        hex::decode_to_slice(raw, &mut bytes).map_err(|_| InvalidProductId(raw.to_string()))?;
        Ok(Self(bytes))
    }

    /// 只检查格式，不关心记录是否存在
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ProductId {
    type Err = InvalidProductId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// 商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// 由校验过的草稿构造新记录，ID 和时间戳由存储层分配
    pub fn from_draft(id: ProductId, draft: ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            image: draft.image,
            created_at: now,
            updated_at: now,
        }
    }
}

fn non_zero_price(price: f64) -> Result<(), ValidationError> {
    if price == 0.0 || !price.is_finite() {
        return Err(ValidationError::new("non_zero_price"));
    }
    Ok(())
}

/// 创建商品请求体
///
/// 字段都是 `Option`，以便区分"缺失"和"为空"，两者都视为校验失败。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(required, length(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(required, custom(function = "non_zero_price"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[validate(required, length(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            image: Some(image.into()),
        }
    }

    /// 校验并转换为可写入的草稿
    pub fn validated(self) -> Result<ProductDraft, ValidationErrors> {
        self.validate()?;
        match (self.name, self.price, self.image) {
            (Some(name), Some(price), Some(image)) => Ok(ProductDraft { name, price, image }),
            _ => Err(ValidationErrors::new()),
        }
    }
}

/// 通过校验的新商品
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub image: String,
}

/// 更新商品请求体，未提供的字段保持不变
///
/// 未知字段（包括 `_id`、`createdAt`）被忽略，ID 不可修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(custom(function = "non_zero_price"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[validate(length(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductUpdate {
    /// 将提供的字段写入记录并刷新 `updated_at`
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        product.updated_at = now;
    }
}
