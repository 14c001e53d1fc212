//! # 交互会话
//!
//! 持有当前输入快照和最近一次成功计算的结果。
//!
//! 每次更新都提交一个新的 `SessionState`：计算成功才替换当前状态，
//! 失败时保留上一次的有效结果并把错误交给调用方。
//!
//! ## 依赖关系
//! - 被 `commands/shell.rs` 使用
//! - 使用 `geometry/engine.rs`, `geometry/table.rs`

use crate::error::Result;
use crate::geometry::engine::{GeometryEngine, PeakSet, SessionState};
use crate::geometry::table::{filter_and_format, FilterOptions, PeakTable};

/// 交互会话
#[derive(Debug, Clone)]
pub struct Session {
    engine: GeometryEngine,
    filter: FilterOptions,
    current: Option<PeakSet>,
}

impl Session {
    pub fn new(engine: GeometryEngine, filter: FilterOptions) -> Self {
        Self {
            engine,
            filter,
            current: None,
        }
    }

    /// 当前有效的输入快照
    pub fn state(&self) -> Option<&SessionState> {
        self.current.as_ref().map(|set| &set.state)
    }

    /// 最近一次成功的计算结果
    pub fn peak_set(&self) -> Option<&PeakSet> {
        self.current.as_ref()
    }

    pub fn filter(&self) -> &FilterOptions {
        &self.filter
    }

    /// 提交新快照并重新计算
    pub fn apply(&mut self, state: SessionState) -> Result<&PeakSet> {
        let set = self.engine.compute(&state)?;
        let set = self.current.insert(set);
        Ok(&*set)
    }

    /// 更新显示策略（不需要重新计算）
    pub fn set_filter(&mut self, filter: FilterOptions) {
        self.filter = filter;
    }

    /// 当前结果按显示策略生成的表格
    pub fn table(&self) -> Option<PeakTable> {
        self.current
            .as_ref()
            .map(|set| filter_and_format(&set.peaks, &self.filter))
    }
}
