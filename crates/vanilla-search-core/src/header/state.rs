//! Header state machine and mount lifecycle.
//!
//! Two independent flags, four transitions, no terminal state. The
//! controller owns the flags for as long as the header is mounted and
//! registers the header height with the page's scroll-offset collaborator.

use serde::Serialize;

/// Height registered with the scroll-offset collaborator on mount.
pub const HEADER_HEIGHT: u32 = 48;

/// Page-level scroll offset shared by fixed elements.
pub trait ScrollOffset {
    fn set_scroll_offset(&self, offset: u32);
    fn reset_scroll_offset(&self);
}

/// A lazily loaded page that can be warmed up ahead of navigation.
pub trait PreloadablePage {
    fn preload(&self);
}

/// Registry of preloadable pages.
pub trait Pages {
    fn search(&self) -> Option<&dyn PreloadablePage>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeaderState {
    pub search_open: bool,
    pub suggestions_open: bool,
    pub scrolled_off: bool,
}

impl HeaderState {
    pub fn open_search(&mut self) {
        self.search_open = true;
    }

    pub fn close_search(&mut self) {
        self.search_open = false;
    }

    pub fn open_suggestions(&mut self) {
        self.suggestions_open = true;
    }

    pub fn close_suggestions(&mut self) {
        self.suggestions_open = false;
    }
}

/// Owns a header's state between mount and unmount.
///
/// Dropping a mounted controller unmounts it.
pub struct HeaderController<'a> {
    state: HeaderState,
    scroll: &'a dyn ScrollOffset,
    pages: Option<&'a dyn Pages>,
    mounted: bool,
}

impl<'a> HeaderController<'a> {
    pub fn new(scroll: &'a dyn ScrollOffset, pages: Option<&'a dyn Pages>) -> Self {
        Self {
            state: HeaderState::default(),
            scroll,
            pages,
            mounted: false,
        }
    }

    /// Start from an existing state instead of all-closed.
    pub fn with_state(mut self, state: HeaderState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.scroll.set_scroll_offset(HEADER_HEIGHT);
        self.mounted = true;
    }

    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.scroll.reset_scroll_offset();
        self.mounted = false;
    }

    /// Open the search box, preloading the search page if one is registered.
    pub fn open_search(&mut self) {
        if let Some(page) = self.pages.and_then(|p| p.search()) {
            page.preload();
        }
        self.state.open_search();
    }

    pub fn close_search(&mut self) {
        self.state.close_search();
    }

    pub fn open_suggestions(&mut self) {
        self.state.open_suggestions();
    }

    pub fn close_suggestions(&mut self) {
        self.state.close_suggestions();
    }
}

impl Drop for HeaderController<'_> {
    fn drop(&mut self) {
        self.unmount();
    }
}
