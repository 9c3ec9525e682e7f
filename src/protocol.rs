//! Value types exchanged with the hub collaborators.
//!
//! Everything here is a plain serde value type: the hub recomputes fit
//! assessments server-side on every exploration, so the client never
//! mutates these in place — a fresh exploration replaces the cached one.

use serde::{Deserialize, Serialize};

pub type ModelId = String;
pub type VariantId = String;

/// One downloadable model as listed by the catalog endpoint.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CatalogEntry {
    pub id: ModelId,
    pub display_name: String,
    pub license: String,
    pub variants: Vec<VariantDescriptor>,
}

/// A specific quantization/format build of a model, independently sized
/// and fit-assessed.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct VariantDescriptor {
    pub id: VariantId,
    pub fit: FitAssessment,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum FitStatus {
    #[serde(rename = "FITS")]
    Fits,
    #[serde(rename = "DOES_NOT_FIT")]
    DoesNotFit,
    /// Not yet assessed. The hub never reports this for an explored
    /// variant; it is the resting value before any exploration.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Capacity-fit verdict for one variant.
///
/// `alternatives` is only meaningful when the status is `DoesNotFit`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FitAssessment {
    pub status: FitStatus,
    #[serde(default)]
    pub alternatives: Vec<VariantId>,
    pub breakdown: FitBreakdown,
}

/// The hub reports a wider breakdown (weights, kv-cache, runtime
/// overhead); only the totals matter to this client.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct FitBreakdown {
    pub estimated_total_gb: f64,
    pub budget_gb: f64,
}

/// Remote availability probe. `error` being set implies `!available`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RepoProbe {
    pub available: bool,
    pub auth_required: bool,
    pub total_gb: f64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct DiskSnapshot {
    pub free_gb: f64,
    pub enough_for_download: bool,
}

/// Outcome of one probe+assess cycle for a (model, variant) pair.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ExplorationResult {
    pub probe: RepoProbe,
    pub fit: FitAssessment,
    pub disk: DiskSnapshot,
    pub ready_to_download: bool,
    pub ready_to_load: bool,
}

/// Response of a completed download request.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DownloadReceipt {
    pub repo_id: String,
    pub total_bytes: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(rename = "model_cache_dir")]
    pub cache_dir: String,
    pub reserve_gb: f64,
}

/// Where the hub ended up storing a saved access token.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TokenReceipt {
    pub storage: String,
}

/// Asynchronous notification pushed over the live channel.
///
/// The channel carries no correlation key back to any request, so these
/// are only ever rendered into the event log. Tags we don't recognize
/// map to `Unknown` and are dropped, keeping the feed forward-compatible.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LiveEvent {
    #[serde(rename = "download_progress")]
    Progress { status: String, file: String },
    #[serde(rename = "download_complete")]
    Complete { repo_id: String, total_gb: f64 },
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_event_tags() {
        let event: LiveEvent = serde_json::from_str(
            r#"{"type":"download_progress","repo_id":"org/repo","file":"model.gguf","status":"starting","index":1}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            LiveEvent::Progress {
                status: "starting".into(),
                file: "model.gguf".into()
            }
        );

        let event: LiveEvent = serde_json::from_str(
            r#"{"type":"download_complete","repo_id":"org/repo","total_bytes":4509715660,"total_gb":4.2}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            LiveEvent::Complete {
                repo_id: "org/repo".into(),
                total_gb: 4.2
            }
        );

        // Unrecognized tags are not an error.
        let event: LiveEvent =
            serde_json::from_str(r#"{"type":"worker_heartbeat","worker":"a"}"#).unwrap();
        assert_eq!(event, LiveEvent::Unknown);
    }

    #[test]
    fn test_fit_status_wire_names() {
        assert_eq!(
            serde_json::from_str::<FitStatus>(r#""FITS""#).unwrap(),
            FitStatus::Fits
        );
        assert_eq!(
            serde_json::from_str::<FitStatus>(r#""DOES_NOT_FIT""#).unwrap(),
            FitStatus::DoesNotFit
        );
        assert_eq!(
            serde_json::from_str::<FitStatus>(r#""UNKNOWN""#).unwrap(),
            FitStatus::Unknown
        );
    }

    #[test]
    fn test_settings_wire_name() {
        let settings: Settings =
            serde_json::from_str(r#"{"model_cache_dir":"/tmp/models","reserve_gb":10.0}"#).unwrap();
        assert_eq!(settings.cache_dir, "/tmp/models");
    }
}
