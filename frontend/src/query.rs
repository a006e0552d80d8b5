//! 客户端查询缓存
//!
//! 资源 hooks 共享的进程级缓存。设计要点：
//! - key = 资源名 + 过滤参数的规范化序列（BTreeMap 保证同一组参数
//!   无论插入顺序如何都映射到同一个 key）
//! - 失效按"资源族"进行：对资源 R 的变更使 R 名下所有 key 过期，
//!   下一次读取必然重新拉取
//! - 乱序完成：每次拉取持有递增序号，旧请求的结果不会覆盖更新的结果；
//!   在失效之前发起的拉取即使成功也不能把条目标记为新鲜
//!
//! 核心逻辑（`QueryCore`）不含任何信号或 DOM 依赖，可在本地直接测试；
//! `QueryClient` 只是套上 `Rc<RefCell>` 与版本信号的薄壳。

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;

#[cfg(test)]
mod tests;

// =========================================================
// 缓存 Key
// =========================================================

/// 结构化缓存 key：资源名 + 规范化过滤参数
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: &'static str,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            params: BTreeMap::new(),
        }
    }

    /// 追加一个过滤参数
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// 从参数序列构造（顺序无关）
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in params {
            self.params.insert(k.into(), v.into());
        }
        self
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }
}

// =========================================================
// 缓存条目
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Fetching,
    Success,
    Error,
}

/// 单次拉取的凭据：记录发起时的序号与失效纪元
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    seq: u64,
    epoch: u64,
}

#[derive(Debug)]
struct CacheEntry {
    /// 最近一次成功拉取的值（JSON 形式，各 hook 自行还原类型）
    data: Option<serde_json::Value>,
    status: FetchStatus,
    /// 失效纪元：族失效时递增
    epoch: u64,
    /// 数据对应的纪元；小于 `epoch` 即为过期
    fetched_epoch: u64,
    /// 已应用结果的最大发起序号
    applied_seq: u64,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            data: None,
            status: FetchStatus::Idle,
            epoch: 1,
            fetched_epoch: 0,
            applied_seq: 0,
        }
    }

    fn is_fresh(&self) -> bool {
        self.data.is_some() && self.fetched_epoch == self.epoch
    }
}

// =========================================================
// 纯逻辑核心
// =========================================================

#[derive(Debug)]
pub struct QueryCore {
    entries: HashMap<QueryKey, CacheEntry>,
    /// 全局拉取序号（单调递增）
    seq: u64,
}

impl QueryCore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            seq: 0,
        }
    }

    /// 登记一次拉取；首次订阅时创建条目
    pub fn begin_fetch(&mut self, key: &QueryKey) -> FetchTicket {
        self.seq += 1;
        let seq = self.seq;
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::new);
        entry.status = FetchStatus::Fetching;
        FetchTicket {
            seq,
            epoch: entry.epoch,
        }
    }

    /// 应用拉取结果
    ///
    /// 返回是否实际写入。只有"最近发起且后完成"的请求会写入；
    /// 发起于失效之前的结果即使写入也不会让条目变为新鲜。
    pub fn complete_fetch(
        &mut self,
        key: &QueryKey,
        ticket: FetchTicket,
        value: serde_json::Value,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        if ticket.seq < entry.applied_seq {
            // 已有更新的请求完成过，丢弃旧结果
            return false;
        }
        entry.data = Some(value);
        entry.status = FetchStatus::Success;
        entry.applied_seq = ticket.seq;
        entry.fetched_epoch = ticket.epoch;
        true
    }

    /// 记录拉取失败；不触碰已有数据
    pub fn fail_fetch(&mut self, key: &QueryKey, ticket: FetchTicket) {
        if let Some(entry) = self.entries.get_mut(key) {
            if ticket.seq >= entry.applied_seq {
                entry.status = FetchStatus::Error;
            }
        }
    }

    /// 读取缓存值（只读订阅，不产生写入）
    pub fn cached(&self, key: &QueryKey) -> Option<serde_json::Value> {
        self.entries.get(key).and_then(|e| e.data.clone())
    }

    /// 该 key 的数据是否仍然新鲜
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.is_fresh())
    }

    pub fn status(&self, key: &QueryKey) -> FetchStatus {
        self.entries
            .get(key)
            .map(|e| e.status)
            .unwrap_or(FetchStatus::Idle)
    }

    /// 该 key 是否需要发起拉取
    ///
    /// 新鲜数据、在途请求都不需要；失败是静止态——不会自动重试，
    /// 直到一次失效、轮询到点或显式 refetch 把它重新唤醒。
    pub fn wants_fetch(&self, key: &QueryKey) -> bool {
        match self.entries.get(key) {
            None => true,
            Some(entry) => {
                !entry.is_fresh()
                    && entry.status != FetchStatus::Fetching
                    && entry.status != FetchStatus::Error
            }
        }
    }

    /// 使资源族下的全部条目过期，返回受影响条目数
    ///
    /// 失效同时把失败条目拉回 Idle，下一次读取会重新拉取。
    pub fn invalidate_family(&mut self, resource: &str) -> usize {
        let mut count = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.resource == resource {
                entry.epoch += 1;
                if entry.status == FetchStatus::Error {
                    entry.status = FetchStatus::Idle;
                }
                count += 1;
            }
        }
        count
    }
}

impl Default for QueryCore {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================
// 信号壳 (QueryClient)
// =========================================================

/// 进程级查询缓存句柄
///
/// `version` 信号在每次写入后递增，订阅它的 hook 会重新读取缓存。
/// 写入只发生在拉取完成与变更失效两条路径上。
#[derive(Clone)]
pub struct QueryClient {
    core: Rc<RefCell<QueryCore>>,
    version: RwSignal<u64>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self {
            core: Rc::new(RefCell::new(QueryCore::new())),
            version: RwSignal::new(0),
        }
    }

    /// 缓存写入版本信号（hook 在响应式闭包中读取以建立订阅）
    pub fn version(&self) -> RwSignal<u64> {
        self.version
    }

    fn bump(&self) {
        self.version.update(|v| *v += 1);
    }

    pub fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        self.core.borrow_mut().begin_fetch(key)
    }

    pub fn complete_fetch(
        &self,
        key: &QueryKey,
        ticket: FetchTicket,
        value: serde_json::Value,
    ) -> bool {
        let applied = self.core.borrow_mut().complete_fetch(key, ticket, value);
        if applied {
            self.bump();
        }
        applied
    }

    pub fn fail_fetch(&self, key: &QueryKey, ticket: FetchTicket) {
        self.core.borrow_mut().fail_fetch(key, ticket);
        self.bump();
    }

    pub fn cached(&self, key: &QueryKey) -> Option<serde_json::Value> {
        self.core.borrow().cached(key)
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.core.borrow().is_fresh(key)
    }

    pub fn status(&self, key: &QueryKey) -> FetchStatus {
        self.core.borrow().status(key)
    }

    pub fn wants_fetch(&self, key: &QueryKey) -> bool {
        self.core.borrow().wants_fetch(key)
    }

    /// 变更成功后按资源族失效
    pub fn invalidate_family(&self, resource: &str) {
        let count = self.core.borrow_mut().invalidate_family(resource);
        if count > 0 {
            self.bump();
        }
    }

    /// 一次失效多个资源族（如日历同步同时影响带看与日历事件）
    pub fn invalidate_families(&self, resources: &[&str]) {
        let mut total = 0;
        {
            let mut core = self.core.borrow_mut();
            for resource in resources {
                total += core.invalidate_family(resource);
            }
        }
        if total > 0 {
            self.bump();
        }
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// 注入进程级缓存
///
/// `Rc<RefCell<..>>` 经 `SendWrapper` 满足 Context 的线程约束；
/// CSR 是单线程环境，wrapper 不会被跨线程访问。
pub fn provide_query_client() -> QueryClient {
    let client = QueryClient::new();
    provide_context(SendWrapper::new(client.clone()));
    client
}

/// 获取进程级缓存
pub fn use_query_client() -> QueryClient {
    use_context::<SendWrapper<QueryClient>>()
        .expect("QueryClient should be provided at the app root")
        .take()
}
