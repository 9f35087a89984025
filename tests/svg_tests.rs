use omnibus::render::svg::{
    Circle, Color, Document, Point, Polyline, StrokeLineCap, StrokeLineJoin, Text,
};

#[test]
fn empty_document_is_just_the_envelope() {
    let doc = Document::new();
    assert_eq!(
        doc.render(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n\
         </svg>"
    );
}

#[test]
fn circle_renders_geometry_then_paint() {
    let mut doc = Document::new();
    doc.push(
        Circle::new()
            .center(Point::new(20.0, 21.5))
            .radius(5.0)
            .fill(Color::from("white")),
    );
    let svg = doc.render();
    assert!(svg.contains("  <circle cx=\"20\" cy=\"21.5\" r=\"5\" fill=\"white\"/>\n"));
}

#[test]
fn polyline_joins_points_with_spaces() {
    let mut doc = Document::new();
    doc.push(
        Polyline::new()
            .point(Point::new(50.0, 50.0))
            .point(Point::new(99.25, 350.0))
            .point(Point::new(50.0, 50.0))
            .fill(Color::from("none"))
            .stroke(Color::from("green"))
            .stroke_width(14.0)
            .line_cap(StrokeLineCap::Round)
            .line_join(StrokeLineJoin::Round),
    );
    let svg = doc.render();
    assert!(svg.contains(
        "<polyline points=\"50,50 99.25,350 50,50\" fill=\"none\" stroke=\"green\" \
         stroke-width=\"14\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>"
    ));
}

#[test]
fn text_attribute_order_is_fixed() {
    let mut doc = Document::new();
    doc.push(
        Text::new()
            .position(Point::new(100.0, 200.0))
            .offset(Point::new(7.0, -3.0))
            .font_size(18)
            .font_family("Verdana")
            .font_weight("bold")
            .fill(Color::from("black"))
            .data("114"),
    );
    let svg = doc.render();
    assert!(svg.contains(
        "<text x=\"100\" y=\"200\" dx=\"7\" dy=\"-3\" font-size=\"18\" \
         font-family=\"Verdana\" font-weight=\"bold\" fill=\"black\">114</text>"
    ));
}

#[test]
fn unset_attributes_are_omitted() {
    let mut doc = Document::new();
    doc.push(Text::new().position(Point::new(1.0, 2.0)).font_size(10).data("x"));
    let svg = doc.render();
    assert!(svg.contains("<text x=\"1\" y=\"2\" dx=\"0\" dy=\"0\" font-size=\"10\">x</text>"));
    assert!(!svg.contains("font-family"));
    assert!(!svg.contains("fill"));
}

#[test]
fn text_content_is_escaped_once_per_character() {
    let mut doc = Document::new();
    doc.push(Text::new().font_size(10).data("<&'\">"));
    let svg = doc.render();
    assert!(svg.contains(">&lt;&amp;&apos;&quot;&gt;</text>"));
}

#[test]
fn objects_render_in_push_order() {
    let mut doc = Document::new();
    doc.push(Circle::new().radius(1.0));
    doc.push(Polyline::new().point(Point::new(0.0, 0.0)));
    doc.push(Text::new().font_size(1).data("last"));
    let svg = doc.render();
    let circle = svg.find("<circle").unwrap();
    let polyline = svg.find("<polyline").unwrap();
    let text = svg.find("<text").unwrap();
    assert!(circle < polyline);
    assert!(polyline < text);
}

#[test]
fn rgb_and_rgba_paint_forms() {
    let mut doc = Document::new();
    doc.push(
        Circle::new()
            .radius(1.0)
            .fill(Color::Rgb(100, 200, 250))
            .stroke(Color::Rgba(255, 160, 0, 0.3)),
    );
    let svg = doc.render();
    assert!(svg.contains("fill=\"rgb(100,200,250)\" stroke=\"rgba(255,160,0,0.3)\""));
}

#[test]
fn rendering_twice_is_byte_identical() {
    let mut doc = Document::new();
    doc.push(
        Polyline::new()
            .point(Point::new(50.000000000001, 49.999999999999))
            .stroke(Color::from("red")),
    );
    assert_eq!(doc.render(), doc.render());
}
