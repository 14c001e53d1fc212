//! # 几何引擎
//!
//! 串联完整流程：晶格参数 → 实空间基矢 → 取向变换 → 倒空间基矢 → 衍射峰。
//!
//! 引擎没有可变字段，`compute` 是输入快照的纯函数，每次调用都从头重新计算。
//!
//! ## 依赖关系
//! - 被 `geometry/session.rs` 和 `commands/` 调用
//! - 使用 `geometry/basis.rs`, `geometry/rotation.rs`, `geometry/enumerator.rs`

use crate::error::Result;
use crate::geometry::basis::{compute_real_basis, compute_reciprocal_basis, VolumePolicy};
use crate::geometry::enumerator::enumerate;
use crate::geometry::rotation::apply_orientation;
use crate::models::{
    HklRange, LatticeParameters, Orientation, Peak, QWindow, RealBasis, ReciprocalBasis,
    RotationMode,
};

/// 引擎配置
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    pub volume_policy: VolumePolicy,
}

/// 一次计算所需的全部输入（不可变快照）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionState {
    pub lattice: LatticeParameters,
    pub orientation: Orientation,
    pub range: HklRange,
    pub window: Option<QWindow>,
    pub mode: RotationMode,
}

impl SessionState {
    pub fn new(lattice: LatticeParameters) -> Self {
        SessionState {
            lattice,
            orientation: Orientation::default(),
            range: HklRange::default(),
            window: None,
            mode: RotationMode::default(),
        }
    }

    pub fn with_lattice(self, lattice: LatticeParameters) -> Self {
        SessionState { lattice, ..self }
    }

    pub fn with_orientation(self, orientation: Orientation) -> Self {
        SessionState {
            orientation,
            ..self
        }
    }

    pub fn with_range(self, range: HklRange) -> Self {
        SessionState { range, ..self }
    }

    pub fn with_window(self, window: Option<QWindow>) -> Self {
        SessionState { window, ..self }
    }

    pub fn with_mode(self, mode: RotationMode) -> Self {
        SessionState { mode, ..self }
    }
}

/// 一次计算的完整结果
#[derive(Debug, Clone)]
pub struct PeakSet {
    /// 产生该结果的输入
    pub state: SessionState,
    /// 未转动的实空间基矢
    pub real: RealBasis,
    /// 转动后的实空间基矢
    pub rotated: RealBasis,
    /// 转动后的倒空间基矢
    pub reciprocal: ReciprocalBasis,
    /// 按枚举顺序排列的衍射峰
    pub peaks: Vec<Peak>,
}

/// 几何引擎
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryEngine {
    config: EngineConfig,
}

impl GeometryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 计算转动后的实空间与倒空间基矢
    pub fn bases(&self, state: &SessionState) -> Result<(RealBasis, RealBasis, ReciprocalBasis)> {
        let real = compute_real_basis(&state.lattice, self.config.volume_policy)?;
        let rotated = apply_orientation(&real, &state.orientation, state.mode)?;
        let reciprocal = compute_reciprocal_basis(&rotated)?;
        Ok((real, rotated, reciprocal))
    }

    /// 完整计算衍射峰
    pub fn compute(&self, state: &SessionState) -> Result<PeakSet> {
        let (real, rotated, reciprocal) = self.bases(state)?;
        let peaks = enumerate(&reciprocal, &state.range, state.window.as_ref());

        Ok(PeakSet {
            state: *state,
            real,
            rotated,
            reciprocal,
            peaks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EwaldError;
    use crate::models::MillerIndex;

    use std::f64::consts::PI;

    fn cubic_state() -> SessionState {
        SessionState::new(LatticeParameters::new(5.0, 5.0, 5.0, 90.0, 90.0, 90.0).unwrap())
    }

    #[test]
    fn test_compute_cubic() {
        let set = GeometryEngine::default().compute(&cubic_state()).unwrap();
        assert_eq!(set.peaks.len(), 26);

        let p001 = set
            .peaks
            .iter()
            .find(|p| p.hkl == MillerIndex::new(0, 0, 1))
            .unwrap();
        assert!((p001.q_z - 2.0 * PI / 5.0).abs() < 1e-12);
        assert!(p001.q_xy.abs() < 1e-12);
    }

    #[test]
    fn test_rotation_moves_peaks() {
        // 绕 X 转 90°：c* 转到 -y 方向，(001) 变为面内峰
        let state = cubic_state().with_orientation(Orientation::new(90.0, 0.0, 0.0).unwrap());
        let set = GeometryEngine::default().compute(&state).unwrap();
        let p001 = set
            .peaks
            .iter()
            .find(|p| p.hkl == MillerIndex::new(0, 0, 1))
            .unwrap();
        assert!((p001.q_xy - 2.0 * PI / 5.0).abs() < 1e-12);
        assert!(p001.q_z.abs() < 1e-12);
    }

    #[test]
    fn test_compute_is_pure() {
        let engine = GeometryEngine::default();
        let state = cubic_state().with_range(HklRange::uniform(2).unwrap());
        let first = engine.compute(&state).unwrap();
        let second = engine.compute(&state).unwrap();
        assert_eq!(first.peaks, second.peaks);
    }

    #[test]
    fn test_degenerate_lattice_propagates() {
        let mut state = cubic_state();
        state.lattice.gamma = 180.0;
        let err = GeometryEngine::default().compute(&state).unwrap_err();
        assert!(matches!(err, EwaldError::DegenerateLattice { .. }));
    }

    #[test]
    fn test_strict_policy_rejects_impossible_cell() {
        let engine = GeometryEngine::new(EngineConfig {
            volume_policy: VolumePolicy::Strict,
        });
        let state = SessionState::new(
            LatticeParameters::new(1.0, 1.0, 1.0, 30.0, 30.0, 120.0).unwrap(),
        );
        assert!(engine.compute(&state).is_err());
    }
}
