//! `header` and `styles` commands.
//!
//! `header` drives a [`HeaderController`] through a mount, the requested
//! transitions, and an unmount, then prints the resulting layout as JSON.

use anyhow::Result;
use serde::Serialize;
use std::cell::Cell;

use vanilla_search_core::header::{
    layout, stylesheet, Device, HeaderController, HeaderLayout, HeaderProps, HeaderState,
    Pages, PreloadablePage, ScrollOffset, UserSession,
};

use crate::config::Config;

/// Options for rendering a header layout from the command line.
#[derive(Debug, Clone, Default)]
pub struct HeaderOptions {
    pub mobile: bool,
    pub guest: bool,
    pub search_open: bool,
    pub suggestions_open: bool,
    pub title: Option<String>,
    pub hide_search_icon: bool,
    pub path: Option<String>,
}

impl HeaderOptions {
    pub fn props(&self) -> HeaderProps {
        HeaderProps {
            device: if self.mobile {
                Device::Mobile
            } else {
                Device::Desktop
            },
            user: if self.guest {
                UserSession::guest()
            } else {
                UserSession {
                    user_id: 1,
                    name: "member".to_string(),
                }
            },
            title: self.title.clone(),
            show_search_icon: !self.hide_search_icon,
            is_fixed: true,
            current_path: self.path.clone().unwrap_or_else(|| "/".to_string()),
        }
    }
}

/// Scroll offset that logs what the header registers.
#[derive(Default)]
struct TracedScrollOffset {
    offset: Cell<Option<u32>>,
}

impl ScrollOffset for TracedScrollOffset {
    fn set_scroll_offset(&self, offset: u32) {
        tracing::debug!(offset, "scroll offset set");
        self.offset.set(Some(offset));
    }

    fn reset_scroll_offset(&self) {
        tracing::debug!("scroll offset reset");
        self.offset.set(None);
    }
}

struct SearchPage;

impl PreloadablePage for SearchPage {
    fn preload(&self) {
        tracing::debug!("search page preload requested");
    }
}

struct CliPages;

impl Pages for CliPages {
    fn search(&self) -> Option<&dyn PreloadablePage> {
        Some(&SearchPage)
    }
}

#[derive(Debug, Serialize)]
pub struct HeaderReport {
    pub scroll_offset: Option<u32>,
    pub state: HeaderState,
    pub layout: HeaderLayout,
}

pub fn render_header(options: &HeaderOptions) -> HeaderReport {
    let scroll = TracedScrollOffset::default();
    let pages = CliPages;
    let props = options.props();

    let mut controller = HeaderController::new(&scroll, Some(&pages));
    controller.mount();
    if options.search_open {
        controller.open_search();
    }
    if options.suggestions_open {
        controller.open_suggestions();
    }
    let state = controller.state();
    let scroll_offset = scroll.offset.get();
    drop(controller);

    HeaderReport {
        scroll_offset,
        state,
        layout: layout(&props, &state),
    }
}

pub fn cmd_header(options: &HeaderOptions) -> Result<()> {
    let report = render_header(options);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn cmd_styles(config: &Config, variables: bool) -> Result<()> {
    let globals = config.theme.global_variables();
    if variables {
        let vars = vanilla_search_core::header::HeaderVariables::new(&globals)?;
        println!("{}", serde_json::to_string_pretty(&vars)?);
    } else {
        print!("{}", stylesheet(&globals)?);
    }
    Ok(())
}
