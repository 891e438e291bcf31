use serde::{Deserialize, Serialize};

/// One project evaluation read from the ratings CSV.
///
/// Every rating and grouping field is optional: a blank cell and an absent
/// column both load as `None`. Stored values are trimmed at load time so
/// downstream classification can compare them directly. Records carry no
/// identity beyond their position in the loaded sequence and are immutable
/// once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Outcome rating on the six-point scale.
    pub outcome: Option<String>,
    /// Quality at Entry rating.
    pub quality_at_entry: Option<String>,
    /// Quality of Supervision rating.
    pub quality_of_supervision: Option<String>,
    /// M&E Quality rating on the four-point scale.
    pub me_quality: Option<String>,
    /// Kind of evaluation that produced the ratings.
    pub evaluation_type: Option<String>,
    /// Country or economy name as stored in the dataset.
    pub country: Option<String>,
    /// Global Practice sector label.
    pub global_practice: Option<String>,
    /// Practice Group sector label (older records).
    pub practice_group: Option<String>,
    /// World Bank region.
    pub wb_region: Option<String>,
    /// Approval fiscal year; `None` when blank or unparseable.
    pub approval_fy: Option<i32>,
    /// Country lending group.
    pub lending_group: Option<String>,
    /// Fragile and conflict-affected situations status.
    pub fcs_status: Option<String>,
}

impl ProjectRecord {
    /// Sector key: the Global Practice label, falling back to the Practice
    /// Group label for records predating the Global Practice taxonomy.
    pub fn sector(&self) -> Option<&str> {
        self.global_practice
            .as_deref()
            .or(self.practice_group.as_deref())
    }
}
