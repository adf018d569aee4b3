//! Fitted feature scalers.
//!
//! Both scalers are fitted offline and only applied here. Parameters use the
//! same conventions as the fitting library, so exported attributes
//! (`data_min_`, `mean_`, `scale_`, ...) can be dropped into a JSON artifact
//! unchanged.

use crate::error::PredictionError;
use serde::{Deserialize, Serialize};

/// A fitted, read-only transformation of one feature row.
///
/// Implementations must be safe to call concurrently from many requests.
pub trait FittedTransformer: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Number of features the transformer was fitted on, if known.
    fn n_features(&self) -> Option<usize>;

    /// Transform a single row, returning a row of the same width.
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError>;
}

/// Rejects rows whose width does not match the fitted width.
pub(crate) fn check_width(stage: &str, expected: usize, row: &[f64]) -> Result<(), PredictionError> {
    if row.len() != expected {
        return Err(PredictionError::ShapeMismatch {
            stage: stage.to_string(),
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

/// Replace zero scale entries with 1 so constant features pass through.
fn handle_zeros_in_scale(scale: f64) -> f64 {
    if scale.abs() < f64::EPSILON {
        1.0
    } else {
        scale
    }
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Min-max scaler: maps each feature's fitted `[data_min, data_max]` onto `feature_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    #[serde(alias = "data_min_")]
    data_min: Vec<f64>,
    #[serde(alias = "data_max_")]
    data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    feature_range: (f64, f64),
}

impl MinMaxScaler {
    /// Create from fitted per-feature bounds with the default `[0, 1]` range.
    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>) -> Result<Self, String> {
        Self::with_range(data_min, data_max, default_feature_range())
    }

    pub fn with_range(
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        feature_range: (f64, f64),
    ) -> Result<Self, String> {
        let scaler = Self {
            data_min,
            data_max,
            feature_range,
        };
        scaler.check()?;
        Ok(scaler)
    }

    /// Verify parameters after deserialization.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.data_min.is_empty() {
            return Err("min-max scaler has no features".to_string());
        }
        if self.data_min.len() != self.data_max.len() {
            return Err(format!(
                "data_min has {} entries but data_max has {}",
                self.data_min.len(),
                self.data_max.len()
            ));
        }
        let (lo, hi) = self.feature_range;
        if !(lo < hi) {
            return Err(format!("feature_range ({}, {}) is not increasing", lo, hi));
        }
        if self
            .data_min
            .iter()
            .chain(&self.data_max)
            .any(|v| !v.is_finite())
        {
            return Err("min-max scaler parameters must be finite".to_string());
        }
        Ok(())
    }
}

impl FittedTransformer for MinMaxScaler {
    fn name(&self) -> &str {
        "min-max scaler"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.data_min.len())
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        check_width(self.name(), self.data_min.len(), row)?;

        let (lo, hi) = self.feature_range;
        Ok(row
            .iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(&x, (&min, &max))| {
                let scale = (hi - lo) / handle_zeros_in_scale(max - min);
                x * scale + (lo - min * scale)
            })
            .collect())
    }
}

/// Standard scaler: `(x - mean) / scale` per feature.
///
/// A missing `mean` disables centering, a missing `scale` disables scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default, alias = "mean_")]
    mean: Option<Vec<f64>>,
    #[serde(default, alias = "scale_")]
    scale: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        let scaler = Self {
            mean: Some(mean),
            scale: Some(scale),
        };
        scaler.check()?;
        Ok(scaler)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        let width = match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) if mean.len() != scale.len() => {
                return Err(format!(
                    "mean has {} entries but scale has {}",
                    mean.len(),
                    scale.len()
                ))
            }
            (Some(v), _) | (None, Some(v)) => v.len(),
            (None, None) => return Err("standard scaler needs mean or scale".to_string()),
        };
        if width == 0 {
            return Err("standard scaler has no features".to_string());
        }
        let all_finite = self
            .mean
            .iter()
            .chain(self.scale.iter())
            .flatten()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("standard scaler parameters must be finite".to_string());
        }
        Ok(())
    }

    fn width(&self) -> usize {
        self.mean
            .as_ref()
            .or(self.scale.as_ref())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl FittedTransformer for StandardScaler {
    fn name(&self) -> &str {
        "standard scaler"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.width())
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        check_width(self.name(), self.width(), row)?;

        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &x)| {
                let centered = match &self.mean {
                    Some(mean) => x - mean[j],
                    None => x,
                };
                match &self.scale {
                    Some(scale) => centered / handle_zeros_in_scale(scale[j]),
                    None => centered,
                }
            })
            .collect())
    }
}

/// Which scaling step an artifact slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalerKind {
    MinMax,
    Standard,
}

impl std::fmt::Display for ScalerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalerKind::MinMax => write!(f, "min_max"),
            ScalerKind::Standard => write!(f, "standard"),
        }
    }
}

/// On-disk JSON encoding of a scaler artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    MinMax(MinMaxScaler),
    Standard(StandardScaler),
}

impl ScalerArtifact {
    pub fn kind(&self) -> ScalerKind {
        match self {
            ScalerArtifact::MinMax(_) => ScalerKind::MinMax,
            ScalerArtifact::Standard(_) => ScalerKind::Standard,
        }
    }

    pub fn check(&self) -> Result<(), String> {
        match self {
            ScalerArtifact::MinMax(s) => s.check(),
            ScalerArtifact::Standard(s) => s.check(),
        }
    }

    pub fn into_transformer(self) -> Box<dyn FittedTransformer> {
        match self {
            ScalerArtifact::MinMax(s) => Box::new(s),
            ScalerArtifact::Standard(s) => Box::new(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_min_max_maps_bounds_to_unit_range() {
        let scaler = MinMaxScaler::new(vec![0.0, 10.0], vec![100.0, 20.0]).unwrap();
        assert_close(&scaler.transform(&[0.0, 10.0]).unwrap(), &[0.0, 0.0]);
        assert_close(&scaler.transform(&[100.0, 20.0]).unwrap(), &[1.0, 1.0]);
        assert_close(&scaler.transform(&[50.0, 25.0]).unwrap(), &[0.5, 1.5]);
    }

    #[test]
    fn test_min_max_custom_range_and_constant_feature() {
        let scaler =
            MinMaxScaler::with_range(vec![0.0, 5.0], vec![10.0, 5.0], (-1.0, 1.0)).unwrap();
        // constant feature: scale falls back to 1, offset keeps data_min at lo
        assert_close(&scaler.transform(&[5.0, 5.0]).unwrap(), &[0.0, -1.0]);
        assert_close(&scaler.transform(&[10.0, 6.0]).unwrap(), &[1.0, 1.0]);
    }

    #[test]
    fn test_standard_scaler() {
        let scaler = StandardScaler::new(vec![1.0, 2.0], vec![2.0, 0.0]).unwrap();
        assert_close(&scaler.transform(&[3.0, 5.0]).unwrap(), &[1.0, 3.0]);
    }

    #[test]
    fn test_standard_scaler_without_mean() {
        let scaler: StandardScaler =
            serde_json::from_str(r#"{"scale_": [2.0, 4.0]}"#).unwrap();
        scaler.check().unwrap();
        assert_close(&scaler.transform(&[4.0, 4.0]).unwrap(), &[2.0, 1.0]);
    }

    #[test]
    fn test_width_mismatch() {
        let scaler = StandardScaler::new(vec![0.0; 7], vec![1.0; 7]).unwrap();
        let err = scaler.transform(&[1.0; 6]).unwrap_err();
        assert_eq!(
            err,
            PredictionError::ShapeMismatch {
                stage: "standard scaler".to_string(),
                expected: 7,
                actual: 6
            }
        );
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(MinMaxScaler::new(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(MinMaxScaler::with_range(vec![0.0], vec![1.0], (1.0, 0.0)).is_err());
        assert!(StandardScaler::new(vec![f64::NAN], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_artifact_tagged_json() {
        let artifact: ScalerArtifact = serde_json::from_str(
            r#"{"kind": "min_max", "data_min_": [0.0], "data_max_": [4.0]}"#,
        )
        .unwrap();
        artifact.check().unwrap();
        let scaler = artifact.into_transformer();
        assert_eq!(scaler.n_features(), Some(1));
        assert_close(&scaler.transform(&[1.0]).unwrap(), &[0.25]);
    }
}
