//! Which header widgets to show, as a pure function of device, session,
//! props, and state.

use serde::{Deserialize, Serialize};

use super::state::HeaderState;

/// User id the session store assigns to signed-out visitors.
pub const GUEST_ID: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: i64,
    pub name: String,
}

impl UserSession {
    pub fn guest() -> Self {
        Self {
            user_id: GUEST_ID,
            name: "Guest".to_string(),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.user_id == GUEST_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderProps {
    pub device: Device,
    pub user: UserSession,
    /// Page title; enables the mobile drop-down.
    pub title: Option<String>,
    pub show_search_icon: bool,
    pub is_fixed: bool,
    /// Path the guest sign-in and register links return to.
    pub current_path: String,
}

impl Default for HeaderProps {
    fn default() -> Self {
        Self {
            device: Device::Desktop,
            user: UserSession::guest(),
            title: None,
            show_search_icon: true,
            is_fixed: true,
            current_path: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    BackLink,
    Logo,
    Nav,
    MobileDropDown {
        title: String,
    },
    CompactSearch {
        open: bool,
        centered: bool,
        showing_suggestions: bool,
    },
    /// Keeps the bar's spacing when the search icon is hidden.
    SearchSpacer,
    GuestNav {
        sign_in: String,
        register: String,
    },
    MeBox {
        user: String,
    },
    CompactMeBox,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderLayout {
    /// A spacer sits under a fixed header to reserve its height.
    pub spacer: bool,
    pub left: Vec<Widget>,
    pub right: Vec<Widget>,
    /// The right-hand group is wrapped in its own flex container.
    pub right_wrapped: bool,
}

impl HeaderLayout {
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn contains(&self, pred: impl Fn(&Widget) -> bool) -> bool {
        self.widgets().any(pred)
    }
}

pub fn layout(props: &HeaderProps, state: &HeaderState) -> HeaderLayout {
    let is_mobile = props.device == Device::Mobile;
    let search_open = state.search_open;
    let mobile_title = props
        .title
        .as_ref()
        .filter(|t| is_mobile && !search_open && !t.is_empty());

    let mut left = Vec::new();
    if is_mobile && !search_open {
        left.push(Widget::BackLink);
    }
    if !is_mobile {
        left.push(Widget::Logo);
        if !search_open {
            left.push(Widget::Nav);
        }
    }
    if let Some(title) = mobile_title {
        left.push(Widget::MobileDropDown {
            title: title.clone(),
        });
    }

    let mut right = Vec::new();
    if props.show_search_icon {
        right.push(Widget::CompactSearch {
            open: search_open,
            centered: search_open,
            showing_suggestions: state.suggestions_open,
        });
    } else {
        right.push(Widget::SearchSpacer);
    }

    if props.user.is_guest() {
        if !search_open || !is_mobile {
            right.push(Widget::GuestNav {
                sign_in: format!("/entry/signin?target={}", props.current_path),
                register: format!("/entry/register?target={}", props.current_path),
            });
        }
    } else if !is_mobile {
        right.push(Widget::MeBox {
            user: props.user.name.clone(),
        });
    } else if !search_open {
        right.push(Widget::CompactMeBox);
    }

    HeaderLayout {
        spacer: props.is_fixed,
        left,
        right,
        right_wrapped: mobile_title.is_some(),
    }
}
