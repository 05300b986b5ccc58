use serde::{Deserialize, Serialize};

/// The student taking the assessment, as resolved from the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentIdentity {
    pub id: String,
    pub first_name: String,
}
