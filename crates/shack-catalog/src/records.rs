//! Hardware model records

/// One hardware model supported by a daemon, parsed from its capability
/// listing. Immutable once parsed; a catalog refresh replaces the whole
/// set rather than merging into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareRecord {
    /// Numeric model id, unique within one catalog snapshot
    pub id: u32,
    /// Manufacturer name
    pub manufacturer: String,
    /// Model name/number
    pub model: String,
    /// Display label, `"<manufacturer> - <model>"`
    pub label: String,
}

impl HardwareRecord {
    pub fn new(id: u32, manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        let manufacturer = manufacturer.into();
        let model = model.into();
        let label = format!("{manufacturer} - {model}");
        Self {
            id,
            manufacturer,
            model,
            label,
        }
    }

    /// Whether this model belongs to the Icom family, the one manufacturer
    /// whose daemons take a CI-V bus address argument.
    pub fn is_icom(&self) -> bool {
        self.manufacturer.to_lowercase().contains("icom")
    }
}

/// Look up a stored selection in a freshly rebuilt catalog.
///
/// Returns `None` when the id is absent so a stale selection stays unset
/// instead of silently becoming a different model.
pub fn find_by_id(records: &[HardwareRecord], id: u32) -> Option<&HardwareRecord> {
    records.iter().find(|r| r.id == id)
}
