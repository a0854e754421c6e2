//! Read-only incident fixture used by the local responder.
//!
//! The bundled fixture is compiled into the binary; `data.incidents_path`
//! swaps it for a JSON file with the same shape.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{OpsBuddyError, OpsBuddyResult};
use crate::models::{Incident, StatusSummary};

const BUNDLED_INCIDENTS: &str = include_str!("../data/incidents.json");

#[derive(Debug, Clone, Default)]
pub struct IncidentDataset {
    incidents: Vec<Incident>,
}

impl IncidentDataset {
    pub fn new(incidents: Vec<Incident>) -> Self {
        Self { incidents }
    }

    pub fn bundled() -> OpsBuddyResult<Self> {
        Self::from_json(BUNDLED_INCIDENTS)
    }

    pub fn from_json(json: &str) -> OpsBuddyResult<Self> {
        let incidents: Vec<Incident> = serde_json::from_str(json)?;
        debug!("Parsed {} incidents", incidents.len());
        Ok(Self { incidents })
    }

    pub fn from_path(path: &Path) -> OpsBuddyResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| OpsBuddyError::DatasetLoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let dataset = Self::from_json(&raw).map_err(|e| OpsBuddyError::DatasetLoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(
            "Loaded {} incidents from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Loads from `path` when given, otherwise the bundled fixture.
    pub fn load(path: Option<&Path>) -> OpsBuddyResult<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::bundled(),
        }
    }

    pub fn all(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Incident> {
        self.incidents
            .iter()
            .find(|incident| incident.id.eq_ignore_ascii_case(id.trim()))
    }

    /// Union of the records matching any term, in dataset order, without duplicates.
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Vec<&Incident> {
        self.incidents
            .iter()
            .filter(|incident| terms.iter().any(|term| incident.matches(term.as_ref())))
            .collect()
    }

    pub fn open_incidents(&self) -> Vec<&Incident> {
        self.incidents.iter().filter(|i| i.is_open()).collect()
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_incidents(&self.incidents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_dataset_parses() {
        let dataset = IncidentDataset::bundled().unwrap();
        assert_eq!(dataset.len(), 10);
        assert!(!dataset.is_empty());
    }

    #[test]
    fn test_find_by_id_every_record() {
        let dataset = IncidentDataset::bundled().unwrap();
        for incident in dataset.all() {
            let found = dataset.find_by_id(&incident.id).unwrap();
            assert_eq!(found, incident);
        }
        assert!(dataset.find_by_id("inc0010002").is_some());
        assert!(dataset.find_by_id("INC9999999").is_none());
    }

    #[test]
    fn test_search_is_union_without_duplicates() {
        let dataset = IncidentDataset::bundled().unwrap();
        let both = dataset.search(&["network", "vpn"]);
        let ids: Vec<&str> = both.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["INC0010003", "INC0010007"]);
    }

    #[test]
    fn test_search_no_match() {
        let dataset = IncidentDataset::bundled().unwrap();
        assert!(dataset.search(&["kubernetes-ingress-zeta"]).is_empty());
        assert!(dataset.search::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_summary_matches_manual_counts() {
        let dataset = IncidentDataset::bundled().unwrap();
        let summary = dataset.summary();
        assert_eq!(summary.total, dataset.all().len());
        assert_eq!(
            summary.open,
            dataset.all().iter().filter(|i| i.status != "Resolved").count()
        );
        assert_eq!(
            summary.critical,
            dataset.all().iter().filter(|i| i.priority == "1-Critical").count()
        );
        assert_eq!(summary.open, dataset.open_incidents().len());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = IncidentDataset::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.error_code(), "E3002");
    }

    #[test]
    fn test_from_path_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.json");
        std::fs::write(&path, "[{\"id\": 1}]").unwrap();
        let err = IncidentDataset::from_path(&path).unwrap_err();
        assert!(matches!(err, OpsBuddyError::DatasetLoadFailed { .. }));
    }
}
