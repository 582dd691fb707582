use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// The structure whose hash an authenticator signs instead of the raw server challenge.
///
/// The JSON keys are serialized in declaration order, `AppID`, `Challenge`, `FacetID`, and that
/// order is part of the signed bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[typeshare]
pub struct FinalChallengeParams {
    /// Application identifier taken from the request header.
    #[serde(rename = "AppID")]
    pub app_id: String,

    /// The server challenge taken from the request entry.
    #[serde(rename = "Challenge")]
    pub challenge: String,

    /// The trusted facet identifier of the calling application.
    #[serde(rename = "FacetID")]
    pub facet_id: String,
}
