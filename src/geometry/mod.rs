//! # 倒空间几何模块
//!
//! 从晶格参数计算 GIWAXS 衍射峰位置。
//!
//! ## 子模块
//! - `vector`: 三维向量运算
//! - `basis`: 实空间 / 倒空间基矢构造
//! - `rotation`: 样品取向转动
//! - `enumerator`: hkl 枚举与 q 分量分解
//! - `table`: 筛选、排序与表格格式化
//! - `engine`: 完整计算流程
//! - `session`: 交互会话状态
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`

pub mod basis;
pub mod engine;
pub mod enumerator;
pub mod export;
pub mod plot;
pub mod rotation;
pub mod session;
pub mod table;
pub mod vector;

pub use basis::VolumePolicy;
pub use engine::{EngineConfig, GeometryEngine, PeakSet, SessionState};
pub use session::Session;
pub use table::{filter_and_format, FilterOptions, PeakTable, SortKey, Viewport};
