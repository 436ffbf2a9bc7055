// 🏙️ City Entity - one per accepted row, no identity map
// (name, state) duplicates are left for the database's UNIQUE constraint.

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    pub name: String,
    pub state_id: Uuid,

    /// External code (IBGE municipality code for Brazil)
    pub code: Option<String>,

    /// Textual numeric literals, emitted as-is
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}
