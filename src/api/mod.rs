mod chat;
mod config;
mod json_contract;
mod price_map;
mod validation;

pub use chat::{AgentReply, ChartBlock, ChatPresenter, ChatTurn};
pub use config::DashConfig;
pub use json_contract::{
    PRICE_MAP_SNAPSHOT_JSON_SCHEMA_V1, PriceMapSnapshotJsonContractV1, RENDER_SPEC_JSON_SCHEMA_V1,
    RenderSpecJsonContractV1,
};
pub use price_map::{
    Legend, PriceMapSnapshot, PriceMapView, RecomputeTopic, RegionShade, RequestTicket,
    StaleTopics,
};
