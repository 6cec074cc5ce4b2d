use serde::{Deserialize, Serialize};

use crate::domain::{ApplianceName, BrandName, IssueName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRequest {
    pub brand: BrandName,
    pub appliance: ApplianceName,
    pub issue: IssueName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionResponse {
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_page: Option<String>,
}
