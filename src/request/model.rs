use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    render::settings::RenderSettings,
    routing::{ItineraryItem, RoutingSettings},
};

/// The top-level JSON request document. Every section is optional at the
/// parse layer; each phase checks for the sections it actually needs.
#[derive(Debug, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,
    pub render_settings: Option<RenderSettings>,
    pub routing_settings: Option<RoutingSettings>,
    pub serialization_settings: Option<SerializationSettings>,
    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop(StopRequest),
    Bus(BusRequest),
}

#[derive(Debug, Deserialize)]
pub struct StopRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Neighbour name to directed road meters. A `BTreeMap` so placeholder
    /// interning happens in a reproducible order.
    #[serde(default)]
    pub road_distances: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
pub struct BusRequest {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerializationSettings {
    /// Snapshot path.
    pub file: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    Bus { id: i64, name: String },
    Stop { id: i64, name: String },
    Map { id: i64 },
    Route { id: i64, from: String, to: String },
}

/// One element of the response array. Untagged: each variant carries the
/// exact field set the wire format asks for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Bus {
        curvature: f64,
        route_length: f64,
        stop_count: usize,
        unique_stop_count: usize,
        request_id: i64,
    },
    Stop {
        buses: Vec<String>,
        request_id: i64,
    },
    Map {
        map: String,
        request_id: i64,
    },
    Route {
        total_time: f64,
        items: Vec<RouteResponseItem>,
        request_id: i64,
    },
    NotFound {
        error_message: String,
        request_id: i64,
    },
}

impl Answer {
    pub fn not_found(request_id: i64) -> Self {
        Answer::NotFound {
            error_message: "not found".to_owned(),
            request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RouteResponseItem {
    Wait { stop_name: String, time: f64 },
    Bus { bus: String, span_count: u32, time: f64 },
}

impl From<ItineraryItem> for RouteResponseItem {
    fn from(item: ItineraryItem) -> Self {
        match item {
            ItineraryItem::Wait { stop_name, time } => RouteResponseItem::Wait {
                stop_name: stop_name.to_string(),
                time,
            },
            ItineraryItem::Ride {
                bus,
                span_count,
                time,
            } => RouteResponseItem::Bus {
                bus: bus.to_string(),
                span_count,
                time,
            },
        }
    }
}
