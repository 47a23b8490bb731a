use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};
use crate::render::RenderSpec;

use super::PriceMapSnapshot;

pub const PRICE_MAP_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;
pub const RENDER_SPEC_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMapSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: PriceMapSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSpecJsonContractV1 {
    pub schema_version: u32,
    pub spec: RenderSpec,
}

impl PriceMapSnapshot {
    pub fn to_json_pretty(&self) -> DashResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DashError::InvalidData(format!("failed to serialize snapshot json: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> DashResult<String> {
        let payload = PriceMapSnapshotJsonContractV1 {
            schema_version: PRICE_MAP_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            DashError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts both the bare snapshot and the versioned contract.
    pub fn from_json_compat_str(input: &str) -> DashResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<PriceMapSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: PriceMapSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            DashError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != PRICE_MAP_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(DashError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl RenderSpec {
    pub fn to_json_pretty(&self) -> DashResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DashError::InvalidData(format!("failed to serialize render spec: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> DashResult<String> {
        let payload = RenderSpecJsonContractV1 {
            schema_version: RENDER_SPEC_JSON_SCHEMA_V1,
            spec: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            DashError::InvalidData(format!("failed to serialize render spec contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> DashResult<Self> {
        if let Ok(spec) = serde_json::from_str::<RenderSpec>(input) {
            return Ok(spec);
        }
        let payload: RenderSpecJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            DashError::InvalidData(format!("failed to parse render spec json payload: {e}"))
        })?;
        if payload.schema_version != RENDER_SPEC_JSON_SCHEMA_V1 {
            return Err(DashError::InvalidData(format!(
                "unsupported render spec schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.spec)
    }
}
