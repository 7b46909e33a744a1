// src/presenter/mod.rs
use log::{error, info};
use serde::Serialize;

use crate::ai::dish::{Dish, DishList};
use crate::capture::ImageRef;

pub mod tag_colors;

use tag_colors::paint_tag;

/// Handoff from the loading screen to the results screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPayload {
    pub results: DishList,
    pub image_uri: ImageRef,
}

/// Where a finished run goes. Exactly one of these is called per run.
pub trait Navigator: Send + Sync {
    /// Replace the loading screen with the results.
    fn show_results(&self, payload: ResultsPayload);

    /// Return to whatever screen started the run.
    fn go_back(&self);
}

/// Renders results on stdout.
pub struct TerminalPresenter {
    json: bool,
}

impl TerminalPresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Navigator for TerminalPresenter {
    fn show_results(&self, payload: ResultsPayload) {
        info!("Showing {} dish(es) for {}", payload.results.len(), payload.image_uri.uri());
        if self.json {
            match serde_json::to_string_pretty(&payload) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize results: {}", e),
            }
        } else {
            print!("{}", render_results(&payload));
        }
    }

    fn go_back(&self) {
        println!("\nSomething went wrong while reading the menu.");
        println!("Returning to the previous screen.");
    }
}

/// Plain-text results screen.
pub fn render_results(payload: &ResultsPayload) -> String {
    let mut out = String::from("\n=== Menu Results ===\n");
    out.push_str(&format!("Photo: {}\n", payload.image_uri.uri()));

    if payload.results.is_empty() {
        out.push_str("\nNo dishes detected. Try another photo with the menu text in focus.\n");
        out.push_str("====================\n");
        return out;
    }

    out.push_str("\nDetected Dishes\n");
    for (idx, dish) in payload.results.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", idx + 1, dish.name()));
        if let Dish::Detailed {
            description,
            tags,
            image_url,
            ..
        } = dish
        {
            if let Some(tags) = tags.as_ref().filter(|t| !t.is_empty()) {
                let chips: Vec<String> = tags.iter().map(|t| paint_tag(t)).collect();
                out.push_str(&format!("     {}\n", chips.join(" ")));
            }
            if let Some(url) = image_url {
                out.push_str(&format!("     image: {}\n", url));
            }
            if let Some(description) = description {
                out.push_str(&format!("     {}\n", description));
            }
        }
    }
    out.push_str("====================\n");
    out
}
