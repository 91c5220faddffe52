//! # skilltrace-algo - 技能掌握度估计与练习推荐算法库
//!
//! 本 crate 提供纯 Rust 实现的知识追踪与推荐算法:
//!
//! - **Mastery Tracking** - 按技能的指数滑动平均掌握度
//! - **1PL IRT** - 能力 (theta) 与题目难度 (b) 的 Rasch 模型
//! - **Band Recommendation** - 目标成功率区间过滤，区间不足时自动放宽
//!
//! ## 模块结构
//!
//! - [`mastery`] - 掌握度追踪 (EMA, Laplace 平滑的整体正确率)
//! - [`irt`] - 能力估计与成功概率预测
//! - [`recommend`] - 推荐引擎 (题目级 / 技能级回退)
//! - [`catalog`] - 预计算的技能与题目统计
//! - [`artifacts`] - 惰性加载、进程级缓存的只读工件
//! - [`history`] - 请求历史的规范化
//! - [`sanitize`] - 数值稳定性 (概率裁剪、logit/sigmoid)
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use skilltrace_algo::{
//!     Catalog, CatalogMeta, InMemoryArtifactStore, InteractionEvent, RecommendOptions,
//!     RecommendationEngine,
//! };
//!
//! let catalog = Catalog::new(HashMap::new(), HashMap::new(), HashMap::new(), CatalogMeta::default());
//! let engine = RecommendationEngine::new(Arc::new(InMemoryArtifactStore::new(catalog)));
//!
//! let history = vec![
//!     InteractionEvent::new("Algebra", true),
//!     InteractionEvent::new("Algebra", false),
//!     InteractionEvent::new("Fractions", true),
//! ];
//! let recs = engine.recommend(&history, &RecommendOptions::default()).unwrap();
//! assert_eq!(recs[0].skill(), "Fractions");
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod artifacts;
pub mod catalog;
pub mod error;
pub mod history;
pub mod irt;
pub mod mastery;
pub mod recommend;
pub mod sanitize;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

pub use artifacts::{
    ArtifactPaths, ArtifactStore, FileArtifactStore, InMemoryArtifactStore, Preprocessor,
};
pub use catalog::Catalog;
pub use error::{EngineError, Result};
pub use history::{normalize_history, RawHistoryEntry};
pub use mastery::{MasteryEstimate, MasteryMap, MasteryTracker, SkillMastery};
pub use recommend::RecommendationEngine;
