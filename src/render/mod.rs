pub mod projector;
pub mod settings;
pub mod svg;

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    catalogue::BusForRender,
    render::{
        projector::ScreenProjector,
        settings::RenderSettings,
        svg::{Circle, Color, Document, Point, Polyline, StrokeLineCap, StrokeLineJoin, Text},
    },
    shared::geo::Coordinate,
};

/// Deterministic SVG composition of the network map.
///
/// Holds the projected position of every used stop, keyed by stop name. In
/// the build phase the positions come from the projector; after a snapshot
/// decode they are installed verbatim so the map stays pixel-identical.
#[derive(Debug, Clone)]
pub struct MapRenderer {
    settings: RenderSettings,
    stop_points: BTreeMap<Arc<str>, Point>,
}

impl MapRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            stop_points: BTreeMap::new(),
        }
    }

    /// Projects the used stops onto the canvas described by the settings.
    pub fn compute_stop_points(&mut self, stops: &[(Arc<str>, Coordinate)]) {
        let coordinates: Vec<Coordinate> = stops.iter().map(|(_, coordinate)| *coordinate).collect();
        let projector = ScreenProjector::new(
            &coordinates,
            self.settings.width,
            self.settings.height,
            self.settings.padding,
        );
        self.stop_points = stops
            .iter()
            .map(|(name, coordinate)| (name.clone(), projector.project(*coordinate)))
            .collect();
    }

    /// Installs already-projected positions, bypassing the projector.
    pub fn set_stop_points(&mut self, stop_points: BTreeMap<Arc<str>, Point>) {
        self.stop_points = stop_points;
    }

    pub fn stop_points(&self) -> &BTreeMap<Arc<str>, Point> {
        &self.stop_points
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Renders the four layers in fixed order: route polylines, bus labels,
    /// stop circles, stop labels. `buses` must be the name-sorted non-empty
    /// set from the catalogue; the k-th bus takes palette color k mod len.
    pub fn render(&self, buses: &[BusForRender]) -> String {
        let mut doc = Document::new();
        self.render_buses(&mut doc, buses);
        self.render_stops(&mut doc);
        doc.render()
    }

    fn render_buses(&self, doc: &mut Document, buses: &[BusForRender]) {
        let palette = &self.settings.color_palette;

        let underlayer_template = self
            .bus_label_template()
            .fill(self.settings.underlayer_color.clone())
            .stroke(self.settings.underlayer_color.clone())
            .stroke_width(self.settings.underlayer_width)
            .line_cap(StrokeLineCap::Round)
            .line_join(StrokeLineJoin::Round);
        let label_template = self.bus_label_template();

        let mut labels: Vec<Text> = Vec::new();

        for (ordinal, bus) in buses.iter().enumerate() {
            let color = palette[ordinal % palette.len()].clone();

            let mut line = Polyline::new()
                .fill(Color::from("none"))
                .stroke(color.clone())
                .line_cap(StrokeLineCap::Round)
                .line_join(StrokeLineJoin::Round)
                .stroke_width(self.settings.line_width);
            for stop in &bus.stops {
                line = line.point(self.stop_point(stop));
            }
            doc.push(line);

            let foreground = label_template.clone().fill(color).data(&bus.name);
            let first = self.stop_point(&bus.stops[0]);
            labels.push(underlayer_template.clone().position(first).data(&bus.name));
            labels.push(foreground.clone().position(first));

            if !bus.is_roundtrip {
                let terminus = (bus.stops.len() - 1) / 2;
                if bus.stops[0] != bus.stops[terminus] {
                    let point = self.stop_point(&bus.stops[terminus]);
                    labels.push(underlayer_template.clone().position(point).data(&bus.name));
                    labels.push(foreground.position(point));
                }
            }
        }

        for label in labels {
            doc.push(label);
        }
    }

    fn render_stops(&self, doc: &mut Document) {
        let circle_template = Circle::new()
            .radius(self.settings.stop_radius)
            .fill(Color::from("white"));

        let underlayer_template = self
            .stop_label_template()
            .fill(self.settings.underlayer_color.clone())
            .stroke(self.settings.underlayer_color.clone())
            .stroke_width(self.settings.underlayer_width)
            .line_cap(StrokeLineCap::Round)
            .line_join(StrokeLineJoin::Round);
        let label_template = self.stop_label_template().fill(Color::from("black"));

        let mut labels: Vec<Text> = Vec::new();

        for (name, &point) in &self.stop_points {
            doc.push(circle_template.clone().center(point));
            labels.push(underlayer_template.clone().position(point).data(name));
            labels.push(label_template.clone().position(point).data(name));
        }

        for label in labels {
            doc.push(label);
        }
    }

    fn bus_label_template(&self) -> Text {
        Text::new()
            .offset(self.settings.bus_label_offset)
            .font_size(self.settings.bus_label_font_size)
            .font_family("Verdana")
            .font_weight("bold")
    }

    fn stop_label_template(&self) -> Text {
        Text::new()
            .offset(self.settings.stop_label_offset)
            .font_size(self.settings.stop_label_font_size)
            .font_family("Verdana")
    }

    fn stop_point(&self, name: &str) -> Point {
        self.stop_points.get(name).copied().unwrap_or_else(|| {
            panic!("stop {name:?} has no projected point; the used-stop set is inconsistent")
        })
    }
}
