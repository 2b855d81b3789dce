//! Bundle aggregate: structural authoring operations and derived counts.
//!
//! Structural changes are only legal while the bundle is a draft; activation
//! and completion freeze the structure so submitted assessments keep pointing
//! at a stable set of indicators.

use super::domain::{
    Bundle, BundleId, BundleStatus, Cluster, ClusterId, Indicator, IndicatorAction, IndicatorId,
    IndicatorKind, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BundleError {
    #[error("bundle {id:?} is {status}, structural changes require a draft bundle")]
    NotEditable { id: BundleId, status: &'static str },
    #[error("cluster {0:?} not found in bundle")]
    ClusterNotFound(ClusterId),
    #[error("indicator {0:?} not found in bundle")]
    IndicatorNotFound(IndicatorId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Bundle {
    pub fn new(id: BundleId, year: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            year,
            title: title.into(),
            description: String::new(),
            status: BundleStatus::Draft,
            clusters: Vec::new(),
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn indicator_count(&self) -> usize {
        self.clusters
            .iter()
            .map(|cluster| cluster.indicators.len())
            .sum()
    }

    pub fn indicator_ids(&self) -> impl Iterator<Item = IndicatorId> + '_ {
        self.clusters
            .iter()
            .flat_map(|cluster| cluster.indicators.iter().map(|indicator| indicator.id))
    }

    pub fn find_indicator(&self, id: IndicatorId) -> Option<&Indicator> {
        self.clusters
            .iter()
            .flat_map(|cluster| cluster.indicators.iter())
            .find(|indicator| indicator.id == id)
    }

    pub fn add_cluster(
        &mut self,
        id: ClusterId,
        name: impl Into<String>,
    ) -> Result<&Cluster, BundleError> {
        self.ensure_editable()?;
        let order = self.clusters.len() as u32 + 1;
        self.clusters.push(Cluster {
            id,
            name: name.into(),
            order,
            indicators: Vec::new(),
        });
        Ok(self.clusters.last().expect("cluster just pushed"))
    }

    pub fn remove_cluster(&mut self, id: ClusterId) -> Result<(), BundleError> {
        self.ensure_editable()?;
        let before = self.clusters.len();
        self.clusters.retain(|cluster| cluster.id != id);
        if self.clusters.len() == before {
            return Err(BundleError::ClusterNotFound(id));
        }
        resequence_clusters(&mut self.clusters);
        Ok(())
    }

    pub fn rename_cluster(
        &mut self,
        id: ClusterId,
        name: impl Into<String>,
    ) -> Result<(), BundleError> {
        self.ensure_editable()?;
        let cluster = self
            .clusters
            .iter_mut()
            .find(|cluster| cluster.id == id)
            .ok_or(BundleError::ClusterNotFound(id))?;
        cluster.name = name.into();
        Ok(())
    }

    pub fn add_indicator(
        &mut self,
        cluster_id: ClusterId,
        id: IndicatorId,
        name: impl Into<String>,
        kind: IndicatorKind,
    ) -> Result<&Indicator, BundleError> {
        self.ensure_editable()?;
        let cluster = self
            .clusters
            .iter_mut()
            .find(|cluster| cluster.id == cluster_id)
            .ok_or(BundleError::ClusterNotFound(cluster_id))?;
        let mut indicator = Indicator::new(id, name, kind);
        indicator.order = cluster.indicators.len() as u32 + 1;
        indicator.validate()?;
        cluster.indicators.push(indicator);
        Ok(cluster.indicators.last().expect("indicator just pushed"))
    }

    pub fn remove_indicator(
        &mut self,
        cluster_id: ClusterId,
        indicator_id: IndicatorId,
    ) -> Result<(), BundleError> {
        self.ensure_editable()?;
        let cluster = self
            .clusters
            .iter_mut()
            .find(|cluster| cluster.id == cluster_id)
            .ok_or(BundleError::ClusterNotFound(cluster_id))?;
        let before = cluster.indicators.len();
        cluster.indicators.retain(|ind| ind.id != indicator_id);
        if cluster.indicators.len() == before {
            return Err(BundleError::IndicatorNotFound(indicator_id));
        }
        resequence_indicators(&mut cluster.indicators);
        Ok(())
    }

    /// Apply an authoring action to an indicator.
    ///
    /// Actions aimed at the wrong variant fail; shape checks are deferred to
    /// [`Bundle::validate`] at save so authoring can pass through invalid
    /// intermediate states.
    pub fn update_indicator(
        &mut self,
        indicator_id: IndicatorId,
        action: IndicatorAction,
    ) -> Result<&Indicator, BundleError> {
        self.ensure_editable()?;
        let indicator = self
            .clusters
            .iter_mut()
            .flat_map(|cluster| cluster.indicators.iter_mut())
            .find(|indicator| indicator.id == indicator_id)
            .ok_or(BundleError::IndicatorNotFound(indicator_id))?;
        indicator.apply(action)?;
        Ok(indicator)
    }

    /// Validate every indicator, surfacing the first shape error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for cluster in &self.clusters {
            for indicator in &cluster.indicators {
                indicator.validate()?;
            }
        }
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), BundleError> {
        if self.status == BundleStatus::Draft {
            Ok(())
        } else {
            Err(BundleError::NotEditable {
                id: self.id,
                status: self.status.label(),
            })
        }
    }
}

fn resequence_clusters(clusters: &mut [Cluster]) {
    for (index, cluster) in clusters.iter_mut().enumerate() {
        cluster.order = index as u32 + 1;
    }
}

fn resequence_indicators(indicators: &mut [Indicator]) {
    for (index, indicator) in indicators.iter_mut().enumerate() {
        indicator.order = index as u32 + 1;
    }
}
