use serde::{Deserialize, Serialize};

/// The one shape booking logic needs from an occupant, whether the profile
/// behind it is a student or a tourist. Served by the external directory
/// and used for display and receipts only, never for allocation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OccupantProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}
