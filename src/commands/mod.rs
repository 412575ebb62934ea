//! Command implementations behind the CLI

pub mod convert;
pub mod lang;
pub mod list;
pub mod show;

use std::io;

use crate::config::SiteConfig;
use crate::render::{JsonSink, RenderSink, TextSink};

/// Sink printing to stdout, as JSON when `json` is set
pub fn stdout_sink(config: &SiteConfig, json: bool) -> Box<dyn RenderSink> {
    if json {
        Box::new(JsonSink::new(io::stdout(), config))
    } else {
        Box::new(TextSink::new(io::stdout(), config))
    }
}
