//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 方針
//! - モデルは起動時に一度だけ読み込む（リクエスト中の再読み込みはしない）
//! - 読み込み失敗は警告ログのみ。分類器なしでルール層だけで動作する
//! - `require_classifier()` を指定した場合のみ Fail-fast

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use crate::impls::load_scaled_classifier;
use crate::ports::ClassifierHandle;

use super::arbiter::Arbiter;
use super::pump::MoistureScale;
use super::service::DecisionService;
use super::status::HealthStatus;

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .model_path("models/pump_classifier.json")
///     .moisture_scale(MoistureScale::Raw)
///     .build()?;
/// let decision = app.service().decide(&request)?;
/// ```
#[derive(Debug, Default)]
pub struct AppBuilder {
    model_path: Option<PathBuf>,
    classifier: Option<ClassifierHandle>,
    moisture_scale: MoistureScale,
    require_classifier: bool,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("a pump classifier is required but none could be loaded{}", describe_path(.0))]
    ClassifierRequired(Option<PathBuf>),
}

fn describe_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" from {}", p.display()),
        None => String::new(),
    }
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model artifact to load at `build()`.
    pub fn model_path(mut self, path: impl AsRef<Path>) -> Self {
        self.model_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Inject a classifier directly. Takes precedence over `model_path`.
    pub fn classifier(mut self, classifier: ClassifierHandle) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn moisture_scale(mut self, scale: MoistureScale) -> Self {
        self.moisture_scale = scale;
        self
    }

    /// Fail `build()` instead of running rules-only when no classifier is
    /// available.
    pub fn require_classifier(mut self) -> Self {
        self.require_classifier = true;
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        let classifier = match (self.classifier, &self.model_path) {
            (Some(handle), _) => handle,
            (None, Some(path)) => match load_scaled_classifier(path) {
                Ok(classifier) => {
                    info!("pump classifier loaded from {}", path.display());
                    ClassifierHandle::present(classifier)
                }
                Err(e) => {
                    warn!("pump classifier unavailable, running rules only: {e}");
                    ClassifierHandle::Absent
                }
            },
            (None, None) => {
                info!("no pump classifier configured, running rules only");
                ClassifierHandle::Absent
            }
        };

        if self.require_classifier && !classifier.is_available() {
            return Err(BuildError::ClassifierRequired(self.model_path));
        }

        let arbiter = Arbiter::new(classifier.clone(), self.moisture_scale);
        Ok(App {
            service: DecisionService::new(Arc::new(arbiter)),
            classifier,
        })
    }
}

/// App は起動済みのサービス
///
/// Clone しても分類器は共有される（Arc）。
#[derive(Clone)]
pub struct App {
    service: DecisionService,
    classifier: ClassifierHandle,
}

impl App {
    pub fn service(&self) -> &DecisionService {
        &self.service
    }

    pub fn classifier(&self) -> &ClassifierHandle {
        &self.classifier
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus::from_handle(&self.classifier, Utc::now())
    }
}
