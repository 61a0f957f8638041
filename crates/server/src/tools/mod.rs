//! Tool dispatch: maps tool names and JSON arguments onto query-engine
//! calls.

pub mod contracts;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use trackside::models::{Category, DetailLevel, QueryError};
use trackside::query::{QueryEngine, DEFAULT_REGION_LIMIT};
use trackside::spatial::BoundingBox;

use crate::config::CoordinateRange;
use crate::validate::{self, ValidationError};
use contracts::{region_tool_name, TOOL_CLEAR_CACHE, TOOL_DATA_STATUS, TOOL_TRACK_CONTEXT};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub struct ToolHandler {
    engine: QueryEngine,
    bounds: CoordinateRange,
}

impl ToolHandler {
    pub fn new(engine: QueryEngine, bounds: CoordinateRange) -> Self {
        Self { engine, bounds }
    }

    pub fn dispatch(&self, name: &str, args: &Value) -> Result<Value, ToolError> {
        match name {
            TOOL_TRACK_CONTEXT => {
                let id = required_str(args, "trackId")?;
                let detail = parse_detail(args)?;
                to_json(self.engine.track_context(id, detail)?)
            }
            TOOL_DATA_STATUS => Ok(json!({"lastSync": self.engine.sync_status()})),
            TOOL_CLEAR_CACHE => {
                self.engine.clear_cache();
                info!("query cache cleared by tool call");
                Ok(json!({"cleared": true}))
            }
            other => match Category::ALL
                .into_iter()
                .find(|c| region_tool_name(*c) == other)
            {
                Some(category) => self.region_query(category, args),
                None => Err(ToolError::UnknownTool(other.to_owned())),
            },
        }
    }

    fn region_query(&self, category: Category, args: &Value) -> Result<Value, ToolError> {
        let detail = parse_detail(args)?;
        let limit = match args.get("limit") {
            None | Some(Value::Null) => DEFAULT_REGION_LIMIT,
            Some(value) => value
                .as_u64()
                .ok_or_else(|| ToolError::InvalidParams("limit must be a positive integer".into()))?
                as usize,
        };

        let bbox = match args.get("bbox").and_then(Value::as_str) {
            Some(raw) => validate::parse_bbox(raw, &self.bounds)?,
            None => {
                let lon = required_f64(args, "lon")?;
                let lat = required_f64(args, "lat")?;
                let radius_km = required_f64(args, "radiusKm")?;
                let center = validate::validate_center(lon, lat, radius_km, &self.bounds)?;
                BoundingBox::from_center(center, radius_km)
            }
        };

        to_json(self.engine.records_in_region(category, bbox, limit, detail)?)
    }
}

fn parse_detail(args: &Value) -> Result<DetailLevel, ToolError> {
    match args.get("detail") {
        None | Some(Value::Null) => Ok(DetailLevel::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|_| {
            ToolError::InvalidParams("detail must be one of metadata, corridor, precise".into())
        }),
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidParams(format!("missing string parameter '{key}'")))
}

fn required_f64(args: &Value, key: &str) -> Result<f64, ToolError> {
    args.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::InvalidParams(format!("missing numeric parameter '{key}'")))
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Internal(e.to_string()))
}
