use serde::{Deserialize, Serialize};

/// One merchant row as listed on the search screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantSummary {
    /// Opaque identifier assigned by the directory.
    pub id: String,
    pub name: String,
    /// Logo image URL. May be empty.
    #[serde(default)]
    pub logo: String,
}
