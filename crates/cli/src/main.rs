use omnibus::request::{Document, handler};
use std::{
    env,
    io::{self, Read},
    process,
};
use tracing::error;

const USAGE: &str = "usage: omnibus [make_base|process_requests]";

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let mode = match env::args().nth(1) {
        Some(mode) if mode == "make_base" || mode == "process_requests" => mode,
        _ => {
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        error!("failed to read the request document: {err}");
        process::exit(1);
    }

    let document = match Document::from_json(&input) {
        Ok(document) => document,
        Err(err) => {
            error!("malformed request document: {err}");
            process::exit(1);
        }
    };

    match mode.as_str() {
        "make_base" => {
            if let Err(err) = handler::make_base(&document) {
                error!("make_base failed: {err}");
                process::exit(1);
            }
        }
        "process_requests" => match handler::process_requests(&document) {
            Ok(answers) => {
                let json = serde_json::to_string(&answers)
                    .expect("response serialization cannot fail");
                println!("{json}");
            }
            Err(err) => {
                error!("process_requests failed: {err}");
                process::exit(1);
            }
        },
        _ => unreachable!(),
    }
}
