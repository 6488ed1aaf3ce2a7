//! In-memory community report store.

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{InvalidLocationError, ReportError};
use crate::models::{GeoPoint, ReportStatus, ReportType, SafetyReport, Severity};

/// A report as submitted by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReport {
    pub location: GeoPoint,
    #[serde(default)]
    pub address: Option<String>,
    pub report_type: ReportType,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time_of_day: Option<String>,
}

impl NewReport {
    /// Turns a submission into an active report with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLocationError`] if the location is out of range.
    pub fn into_report(self) -> Result<SafetyReport, InvalidLocationError> {
        self.location.validate()?;

        Ok(SafetyReport {
            id: Uuid::new_v4(),
            location: self.location,
            address: self.address,
            report_type: self.report_type,
            severity: self.severity,
            description: self.description,
            time_of_day: self.time_of_day,
            upvotes: 0,
            status: ReportStatus::Active,
            created_at: Utc::now(),
        })
    }
}

/// Fields that may change after a report is filed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportPatch {
    pub report_type: Option<ReportType>,
    pub severity: Option<Severity>,
    pub description: Option<String>,
    pub status: Option<ReportStatus>,
}

#[derive(Default)]
pub struct ReportStore {
    reports: RwLock<Vec<SafetyReport>>,
}

impl ReportStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reports(reports: Vec<SafetyReport>) -> Self {
        Self {
            reports: RwLock::new(reports),
        }
    }

    /// Active reports as of now. One snapshot feeds one planning call.
    pub async fn active_snapshot(&self) -> Vec<SafetyReport> {
        self.reports
            .read()
            .await
            .iter()
            .filter(|r| r.is_active())
            .cloned()
            .collect()
    }

    /// All reports, newest first, optionally restricted to one type.
    pub async fn list(&self, report_type: Option<ReportType>) -> Vec<SafetyReport> {
        let mut reports: Vec<SafetyReport> = self
            .reports
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| report_type.is_none_or(|t| r.report_type == t))
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports
    }

    pub async fn get(&self, id: Uuid) -> Option<SafetyReport> {
        self.reports.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Files a new active report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidLocation`] if the location is out of range.
    pub async fn create(&self, new: NewReport) -> Result<SafetyReport, ReportError> {
        let report = new.into_report()?;

        log::info!(
            "New {} report {} ({})",
            report.report_type,
            report.id,
            report.severity
        );
        self.reports.write().await.push(report.clone());
        Ok(report)
    }

    /// # Errors
    ///
    /// Returns [`ReportError::NotFound`] for an unknown id.
    pub async fn update(&self, id: Uuid, patch: ReportPatch) -> Result<SafetyReport, ReportError> {
        let mut reports = self.reports.write().await;
        let report = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ReportError::NotFound(id))?;

        if let Some(report_type) = patch.report_type {
            report.report_type = report_type;
        }
        if let Some(severity) = patch.severity {
            report.severity = severity;
        }
        if let Some(description) = patch.description {
            report.description = Some(description);
        }
        if let Some(status) = patch.status {
            report.status = status;
        }

        Ok(report.clone())
    }

    /// # Errors
    ///
    /// Returns [`ReportError::NotFound`] for an unknown id.
    pub async fn upvote(&self, id: Uuid) -> Result<SafetyReport, ReportError> {
        let mut reports = self.reports.write().await;
        let report = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ReportError::NotFound(id))?;
        report.upvotes = report.upvotes.saturating_add(1);
        Ok(report.clone())
    }

    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reports.read().await.is_empty()
    }
}
