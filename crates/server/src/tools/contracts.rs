//! Tool names and input schemas exposed to the agent.

use serde_json::{json, Value};
use trackside::models::Category;

pub const TOOL_TRACK_CONTEXT: &str = "get_track_context";
pub const TOOL_DATA_STATUS: &str = "get_data_status";
pub const TOOL_CLEAR_CACHE: &str = "clear_query_cache";

pub fn region_tool_name(category: Category) -> String {
    format!("find_{}_in_area", plural(category))
}

fn plural(category: Category) -> &'static str {
    match category {
        Category::Track => "tracks",
        Category::Tunnel => "tunnels",
        Category::Bridge => "bridges",
        Category::Switch => "switches",
        Category::Electrification => "electrification",
        Category::Station => "stations",
        Category::Yard => "yards",
        Category::AccessRestriction => "access_restrictions",
    }
}

pub fn tool_definitions() -> Vec<Value> {
    let mut tools = vec![json!({
        "name": TOOL_TRACK_CONTEXT,
        "description": "Look up a track segment by id or designation and return it together \
                        with all associated infrastructure (tunnels, bridges, switches, \
                        electrification, stations, yards, access restrictions).",
        "inputSchema": track_context_schema(),
    })];

    for category in Category::ALL {
        tools.push(json!({
            "name": region_tool_name(category),
            "description": format!(
                "Find {} records intersecting a region, given either a bounding box or a \
                 center point with radius.",
                plural(category).replace('_', " ")
            ),
            "inputSchema": region_schema(),
        }));
    }

    tools.push(json!({
        "name": TOOL_DATA_STATUS,
        "description": "Report when the infrastructure dataset was last synchronized.",
        "inputSchema": json!({"type": "object", "properties": {}}),
    }));
    tools.push(json!({
        "name": TOOL_CLEAR_CACHE,
        "description": "Evict all cached query results.",
        "inputSchema": json!({"type": "object", "properties": {}}),
    }));

    tools
}

fn detail_property() -> Value {
    json!({
        "type": "string",
        "enum": ["metadata", "corridor", "precise"],
        "description": "Geometry detail: metadata omits geometry, corridor returns a \
                        simplified path (default), precise returns full coordinates.",
    })
}

fn track_context_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "trackId": {
                "type": "string",
                "description": "Track id or designation, e.g. \"182\".",
            },
            "detail": detail_property(),
        },
        "required": ["trackId"],
    })
}

fn region_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "bbox": {
                "type": "string",
                "description": "Bounding box as \"minLon,minLat,maxLon,maxLat\".",
            },
            "lon": {"type": "number", "description": "Center longitude (with lat + radiusKm)."},
            "lat": {"type": "number", "description": "Center latitude (with lon + radiusKm)."},
            "radiusKm": {"type": "number", "description": "Radius around the center, km."},
            "limit": {
                "type": "integer",
                "description": "Maximum records returned (default 100).",
            },
            "detail": detail_property(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_region_tool_per_category_plus_extras() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), Category::ALL.len() + 3);

        let names: Vec<&str> =
            tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert!(names.contains(&TOOL_TRACK_CONTEXT));
        assert!(names.contains(&"find_tracks_in_area"));
        assert!(names.contains(&"find_access_restrictions_in_area"));
        assert!(names.contains(&TOOL_CLEAR_CACHE));
    }

    #[test]
    fn test_schemas_are_objects() {
        for tool in tool_definitions() {
            assert_eq!(tool["inputSchema"]["type"], "object", "tool {}", tool["name"]);
        }
    }
}
