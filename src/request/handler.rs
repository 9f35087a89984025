use std::path::Path;

use tracing::info;

use crate::{
    catalogue::Catalogue,
    render::MapRenderer,
    request::{
        Error,
        model::{Answer, BaseRequest, Document, StatRequest},
    },
    routing::TransportRouter,
    shared::geo::Coordinate,
    snapshot::Snapshot,
};

/// Ingests the base requests and builds the three engines of the model.
///
/// Requests apply in document order; stops referenced before their own
/// declaration exist as placeholders until it arrives.
pub fn build_model(document: &Document) -> Result<(Catalogue, MapRenderer, TransportRouter), Error> {
    let render_settings = document
        .render_settings
        .clone()
        .ok_or(Error::MissingSection("render_settings"))?;
    render_settings.validate().map_err(Error::Invalid)?;

    let routing_settings = document
        .routing_settings
        .ok_or(Error::MissingSection("routing_settings"))?;
    if routing_settings.bus_velocity <= 0.0 {
        return Err(Error::Invalid(format!(
            "bus_velocity must be positive, got {}",
            routing_settings.bus_velocity
        )));
    }

    let mut catalogue = Catalogue::new();
    for request in &document.base_requests {
        match request {
            BaseRequest::Stop(stop) => {
                let coordinate = Coordinate {
                    latitude: stop.latitude,
                    longitude: stop.longitude,
                };
                if stop.name.is_empty() {
                    return Err(Error::Invalid("stop name must not be empty".into()));
                }
                if !coordinate.is_valid() {
                    return Err(Error::Invalid(format!(
                        "stop {:?} has coordinates outside the lat/lon domain: {coordinate}",
                        stop.name
                    )));
                }
                if let Some((neighbour, _)) =
                    stop.road_distances.iter().find(|&(_, &meters)| meters == 0)
                {
                    return Err(Error::Invalid(format!(
                        "road distance {:?} -> {neighbour:?} must be positive",
                        stop.name
                    )));
                }
                catalogue.add_stop(
                    &stop.name,
                    coordinate,
                    stop.road_distances
                        .iter()
                        .map(|(neighbour, &meters)| (neighbour.as_str(), meters)),
                );
            }
            BaseRequest::Bus(bus) => {
                if bus.name.is_empty() {
                    return Err(Error::Invalid("bus name must not be empty".into()));
                }
                catalogue.add_bus(
                    &bus.name,
                    bus.stops.iter().map(String::as_str),
                    bus.is_roundtrip,
                );
            }
        }
    }
    info!(
        stops = catalogue.stop_count(),
        buses = catalogue.bus_count(),
        "base requests ingested"
    );

    let mut renderer = MapRenderer::new(render_settings);
    renderer.compute_stop_points(&catalogue.stops_used());

    let router = TransportRouter::build(&catalogue, routing_settings);

    Ok((catalogue, renderer, router))
}

/// The `make_base` phase: build the model, precompute, write the snapshot.
pub fn make_base(document: &Document) -> Result<(), Error> {
    let serialization = document
        .serialization_settings
        .clone()
        .ok_or(Error::MissingSection("serialization_settings"))?;

    let (catalogue, renderer, router) = build_model(document)?;
    let snapshot = Snapshot::capture(&catalogue, &renderer, &router);
    snapshot.write(Path::new(&serialization.file))?;
    Ok(())
}

/// The `process_requests` phase: load the snapshot and answer every stat
/// request in document order.
pub fn process_requests(document: &Document) -> Result<Vec<Answer>, Error> {
    let serialization = document
        .serialization_settings
        .clone()
        .ok_or(Error::MissingSection("serialization_settings"))?;

    let snapshot = Snapshot::read(Path::new(&serialization.file))?;
    let (catalogue, renderer, router) = snapshot.restore();
    Ok(answer_all(
        &document.stat_requests,
        &catalogue,
        &renderer,
        &router,
    ))
}

/// Dispatches stat requests against an already-built model. Both the live
/// engines of `make_base` and the lazy ones of `process_requests` answer
/// through this single path, which is what the round-trip tests lean on.
pub fn answer_all(
    requests: &[StatRequest],
    catalogue: &Catalogue,
    renderer: &MapRenderer,
    router: &TransportRouter,
) -> Vec<Answer> {
    requests
        .iter()
        .map(|request| answer_one(request, catalogue, renderer, router))
        .collect()
}

fn answer_one(
    request: &StatRequest,
    catalogue: &Catalogue,
    renderer: &MapRenderer,
    router: &TransportRouter,
) -> Answer {
    match request {
        StatRequest::Bus { id, name } => match catalogue.bus_info(name) {
            Some(info) => Answer::Bus {
                curvature: info.curvature,
                route_length: info.real_length,
                stop_count: info.stop_count,
                unique_stop_count: info.unique_stops,
                request_id: *id,
            },
            None => Answer::not_found(*id),
        },
        StatRequest::Stop { id, name } => match catalogue.stop_info(name) {
            Some(buses) => Answer::Stop {
                buses: buses.iter().map(|bus| bus.to_string()).collect(),
                request_id: *id,
            },
            None => Answer::not_found(*id),
        },
        StatRequest::Map { id } => Answer::Map {
            map: renderer.render(&catalogue.buses_for_render()),
            request_id: *id,
        },
        StatRequest::Route { id, from, to } => match router.find_route(from, to) {
            Some(itinerary) => Answer::Route {
                total_time: itinerary.total_time,
                items: itinerary.items.into_iter().map(Into::into).collect(),
                request_id: *id,
            },
            None => Answer::not_found(*id),
        },
    }
}
