//! Fitted classifiers.

use crate::error::PredictionError;
use crate::models::scaler::check_width;
use serde::{Deserialize, Serialize};

/// A fitted, read-only decision function from a transformed row to a class code.
///
/// The raw output is returned as a float; the pipeline truncates it to an
/// integer class code.
pub trait FittedClassifier: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Number of features the classifier was fitted on, if known.
    fn n_features(&self) -> Option<usize>;

    /// Predict the class of a single row.
    fn predict(&self, row: &[f64]) -> Result<f64, PredictionError>;
}

/// Linear one-vs-rest classifier: `argmax(coef · x + intercept)`.
///
/// With a single coefficient row the model is binary and picks `classes[1]`
/// when the decision value is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    #[serde(alias = "classes_")]
    classes: Vec<i64>,
    #[serde(alias = "coef_")]
    coef: Vec<Vec<f64>>,
    #[serde(alias = "intercept_")]
    intercept: Vec<f64>,
}

impl LinearClassifier {
    pub fn new(classes: Vec<i64>, coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> Result<Self, String> {
        let model = Self {
            classes,
            coef,
            intercept,
        };
        model.check()?;
        Ok(model)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err(format!(
                "linear classifier needs at least 2 classes, got {}",
                self.classes.len()
            ));
        }

        let expected_rows = if self.classes.len() == 2 {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != expected_rows || self.intercept.len() != expected_rows {
            return Err(format!(
                "expected {} coefficient rows and intercepts for {} classes, got {} and {}",
                expected_rows,
                self.classes.len(),
                self.coef.len(),
                self.intercept.len()
            ));
        }

        let width = self.coef[0].len();
        if width == 0 || self.coef.iter().any(|row| row.len() != width) {
            return Err("coefficient rows must share a non-zero width".to_string());
        }

        let all_finite = self
            .coef
            .iter()
            .flatten()
            .chain(&self.intercept)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("linear classifier parameters must be finite".to_string());
        }
        Ok(())
    }

    fn decision(&self, row: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, b)| weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }
}

impl FittedClassifier for LinearClassifier {
    fn name(&self) -> &str {
        "linear classifier"
    }

    fn n_features(&self) -> Option<usize> {
        self.coef.first().map(Vec::len)
    }

    fn predict(&self, row: &[f64]) -> Result<f64, PredictionError> {
        check_width(self.name(), self.n_features().unwrap_or(0), row)?;

        let scores = self.decision(row);
        let class = if scores.len() == 1 {
            if scores[0] > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            }
        } else {
            // first maximum wins on ties
            let (best, _) = scores
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(bi, bs), (i, &s)| {
                    if s > bs {
                        (i, s)
                    } else {
                        (bi, bs)
                    }
                });
            self.classes[best]
        };

        Ok(class as f64)
    }
}

/// On-disk JSON encoding of a classifier artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Linear(LinearClassifier),
}

impl ClassifierArtifact {
    pub fn check(&self) -> Result<(), String> {
        match self {
            ClassifierArtifact::Linear(m) => m.check(),
        }
    }

    pub fn into_classifier(self) -> Box<dyn FittedClassifier> {
        match self {
            ClassifierArtifact::Linear(m) => Box::new(m),
        }
    }
}
