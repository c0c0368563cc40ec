//! Header style variables and CSS classes derived from global design tokens.
//!
//! [`HeaderVariables`] holds the derived sizes and colors;
//! [`HeaderClasses`] turns them into named CSS rules with one-column
//! (narrow viewport) overrides and renders a stylesheet.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::color::{color_dependant_on_lightness, Color};
use super::state::HEADER_HEIGHT;
use crate::error::StyleError;

/// Prefix shared by every header class name.
pub const CLASS_PREFIX: &str = "vanillaHeader";
pub const LOGO_CLASS_PREFIX: &str = "vanillaHeaderLogo";
pub const HOME_CLASS_PREFIX: &str = "vanillaHeaderHome";

/// Pointer states that get the me-box and tab button highlight.
const BUTTON_STATE_NESTS: [&str; 6] = [
    ":active .meBox-contentHover",
    ":active .meBox-buttonContent",
    ":hover .meBox-contentHover",
    ":hover .meBox-buttonContent",
    ".focus-visible .meBox-contentHover",
    ".focus-visible .meBox-buttonContent",
];
const TAB_STATES: [(&str, &str); 3] = [
    (":active", ":active .vanillaHeader-tabButtonContent"),
    (":hover", ":hover .vanillaHeader-tabButtonContent"),
    (":focus", ":focus .vanillaHeader-tabButtonContent"),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MainColors {
    pub fg: Color,
    pub bg: Color,
    pub primary: Color,
}

/// Site-wide design tokens the header depends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalVariables {
    pub main_colors: MainColors,
    pub form_element_height: f64,
    pub form_element_border_width: f64,
    pub user_photo_small: f64,
    /// Viewport width at or below which the layout collapses to one column.
    pub one_column_breakpoint: u32,
}

impl Default for GlobalVariables {
    fn default() -> Self {
        Self {
            main_colors: MainColors {
                fg: Color::rgb(0x55, 0x5a, 0x62),
                bg: Color::WHITE,
                primary: Color::rgb(0x02, 0x91, 0xdb),
            },
            form_element_height: 36.0,
            form_element_border_width: 1.0,
            user_photo_small: 28.0,
            one_column_breakpoint: 1200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sizing {
    pub height: f64,
    pub spacer: f64,
    pub mobile_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ButtonVars {
    pub border_radius: f64,
    pub size: f64,
    pub mobile_font_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountVars {
    pub size: f64,
    pub font_size: f64,
    pub fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatefulColor {
    pub bg: Color,
    pub hover_bg: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeaderVariables {
    pub sizing: Sizing,
    pub colors: Palette,
    pub guest_spacer: f64,
    pub button: ButtonVars,
    pub count: CountVars,
    pub drop_down_min_width: f64,
    pub end_elements_flex_basis: f64,
    pub end_elements_mobile_flex_basis: f64,
    pub compact_search_max_width: f64,
    /// Vertical offset centring the search results under the bar.
    pub compact_search_results_top: f64,
    pub compact_search_results_mobile_top: f64,
    pub button_hover_bg: Color,
    pub button_active_bg: Color,
    pub sign_in: StatefulColor,
    pub register: StatefulColor,
}

impl HeaderVariables {
    pub fn new(globals: &GlobalVariables) -> Result<Self, StyleError> {
        let main = globals.main_colors;
        let sizing = Sizing {
            height: f64::from(HEADER_HEIGHT),
            spacer: 12.0,
            mobile_height: 44.0,
        };
        let button_size = 40.0;
        let results_top = |bar: f64| {
            (bar - globals.form_element_height + globals.form_element_border_width) / 2.0
        };

        Ok(Self {
            sizing,
            colors: Palette {
                fg: main.bg,
                bg: main.primary,
            },
            guest_spacer: 8.0,
            button: ButtonVars {
                border_radius: 3.0,
                size: button_size,
                mobile_font_size: 16.0,
            },
            count: CountVars {
                size: 18.0,
                font_size: 10.0,
                fg: main.bg,
                bg: main.primary,
            },
            drop_down_min_width: 350.0,
            end_elements_flex_basis: button_size * 4.0,
            end_elements_mobile_flex_basis: button_size * 2.0,
            compact_search_max_width: 672.0,
            compact_search_results_top: results_top(sizing.height),
            compact_search_results_mobile_top: results_top(sizing.mobile_height),
            button_hover_bg: color_dependant_on_lightness(main.fg, main.primary, 10.0, false)?,
            button_active_bg: color_dependant_on_lightness(main.fg, main.primary, 10.0, true)?,
            sign_in: StatefulColor {
                bg: color_dependant_on_lightness(main.fg, main.primary, 10.0, false)?,
                hover_bg: color_dependant_on_lightness(main.fg, main.primary, 20.0, false)?,
            },
            register: StatefulColor {
                bg: main.bg,
                hover_bg: main.bg.fade(0.9),
            },
        })
    }
}

type Declarations = Vec<(&'static str, String)>;

/// One class with its base, nested, and one-column declarations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    pub name: &'static str,
    pub class_name: String,
    pub declarations: Declarations,
    /// `(selector suffix, declarations)`, e.g. `(".isFixed", ...)`.
    pub nested: Vec<(&'static str, Declarations)>,
    pub one_column: Declarations,
}

impl StyleRule {
    fn new(name: &'static str, declarations: Declarations) -> Self {
        Self::prefixed(CLASS_PREFIX, name, declarations)
    }

    fn prefixed(prefix: &str, name: &'static str, declarations: Declarations) -> Self {
        Self {
            name,
            class_name: format!("{}-{}", prefix, name),
            declarations,
            nested: Vec::new(),
            one_column: Vec::new(),
        }
    }

    fn nest(mut self, suffix: &'static str, declarations: Declarations) -> Self {
        self.nested.push((suffix, declarations));
        self
    }

    fn one_column(mut self, declarations: Declarations) -> Self {
        self.one_column = declarations;
        self
    }

    /// Value of a base declaration.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }
}

fn px(v: f64) -> String {
    format!("{}px", v)
}

fn write_block(out: &mut String, selector: &str, decls: &Declarations, indent: &str) {
    let _ = writeln!(out, "{indent}{selector} {{");
    for (property, value) in decls {
        let _ = writeln!(out, "{indent}  {property}: {value};");
    }
    let _ = writeln!(out, "{indent}}}");
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderClasses {
    pub breakpoint: u32,
    pub rules: Vec<StyleRule>,
}

impl HeaderClasses {
    pub fn new(globals: &GlobalVariables) -> Result<Self, StyleError> {
        let vars = HeaderVariables::new(globals)?;
        let fg = vars.colors.fg.to_string();
        let height = px(vars.sizing.height);
        let mobile_height = px(vars.sizing.mobile_height);
        let radius = px(vars.button.border_radius);

        let mut button = StyleRule::new(
            "button",
            vec![
                ("display", "flex".into()),
                ("align-items", "center".into()),
                ("justify-content", "center".into()),
                ("flex-wrap", "nowrap".into()),
                ("color", fg.clone()),
                ("height", height.clone()),
                ("min-width", px(vars.button.size)),
                ("padding", "0".into()),
            ],
        )
        .one_column(vec![("height", mobile_height.clone())]);
        for suffix in BUTTON_STATE_NESTS {
            button = button.nest(suffix, vec![("border-radius", radius.clone())]);
        }
        for suffix in [".isOpen .meBox-contentHover", ".isOpen .meBox-buttonContent"] {
            button = button.nest(
                suffix,
                vec![("background-color", vars.button_active_bg.to_string())],
            );
        }

        let tab_content_bg =
            color_dependant_on_lightness(vars.colors.fg, vars.colors.bg, 1.0, false)?;
        let mut tab_button = StyleRule::new(
            "tabButton",
            vec![
                ("display", "block".into()),
                ("height", "100%".into()),
                ("padding", "0".into()),
            ],
        );
        for (state, content) in TAB_STATES {
            tab_button = tab_button
                .nest(state, vec![("color", globals.main_colors.primary.to_string())])
                .nest(
                    content,
                    vec![
                        ("color", fg.clone()),
                        ("background-color", tab_content_bg.to_string()),
                        ("border-radius", radius.clone()),
                    ],
                );
        }

        let rules = vec![
            StyleRule::new(
                "root",
                vec![
                    ("background-color", vars.colors.bg.to_string()),
                    ("color", fg.clone()),
                ],
            )
            .nest(
                ".isFixed",
                vec![
                    ("position", "fixed".into()),
                    ("top", "0".into()),
                    ("left", "0".into()),
                    ("right", "0".into()),
                    ("z-index", "1".into()),
                ],
            )
            .one_column(vec![("height", height.clone())]),
            StyleRule::new("spacer", vec![("height", height.clone())]),
            StyleRule::new(
                "bar",
                vec![
                    ("display", "flex".into()),
                    ("justify-content", "space-between".into()),
                    ("flex-wrap", "nowrap".into()),
                    ("align-items", "center".into()),
                    ("height", height.clone()),
                    ("width", "100%".into()),
                ],
            )
            .one_column(vec![("height", mobile_height.clone())]),
            StyleRule::new(
                "logoContainer",
                vec![
                    ("display", "inline-flex".into()),
                    ("align-self", "center".into()),
                    ("flex-basis", px(vars.end_elements_flex_basis)),
                    ("color", fg.clone()),
                ],
            )
            .nest(
                ".focus-visible",
                vec![
                    ("outline", format!("5px solid {}", vars.button_hover_bg)),
                    ("background", vars.button_hover_bg.to_string()),
                    ("border-radius", radius.clone()),
                ],
            )
            .one_column(vec![("height", mobile_height.clone())]),
            StyleRule::new("meBox", vec![("justify-content", "flex-end".into())]),
            StyleRule::new(
                "nav",
                vec![
                    ("display", "flex".into()),
                    ("flex-wrap", "wrap".into()),
                    ("height", "100%".into()),
                    ("color", "inherit".into()),
                ],
            ),
            StyleRule::new("locales", vec![("height", height.clone())])
                .nest(".buttonAsText:hover", vec![("color", "inherit".into())])
                .nest(".buttonAsText:focus", vec![("color", "inherit".into())])
                .one_column(vec![("height", mobile_height.clone())]),
            StyleRule::new("messages", vec![("color", vars.colors.bg.to_string())]),
            StyleRule::new("notifications", vec![("color", "inherit".into())]),
            StyleRule::new("compactSearch", vec![("margin-left", "auto".into())]),
            StyleRule::new(
                "compactSearchResults",
                vec![
                    ("top", px(vars.compact_search_results_top)),
                    ("display", "block".into()),
                    ("position", "relative".into()),
                    ("margin", "auto".into()),
                    ("max-width", px(vars.compact_search_max_width)),
                ],
            )
            .one_column(vec![("top", px(vars.compact_search_results_mobile_top))]),
            StyleRule::new(
                "topElement",
                vec![
                    ("color", fg.clone()),
                    ("padding", format!("0 {}", px(vars.sizing.spacer / 2.0))),
                    ("margin", format!("0 {}", px(vars.sizing.spacer / 2.0))),
                    ("border-radius", radius.clone()),
                ],
            )
            .one_column(vec![
                ("font-size", px(vars.button.mobile_font_size)),
                ("white-space", "nowrap".into()),
            ]),
            StyleRule::new("localeToggle", vec![("height", height.clone())])
                .one_column(vec![("height", mobile_height.clone())]),
            StyleRule::new("languages", vec![("margin-left", "auto".into())]),
            button,
            StyleRule::new(
                "searchCancel",
                vec![
                    ("height", px(globals.form_element_height)),
                    ("user-select", "none".into()),
                ],
            )
            .nest(
                ".focus-visible.meBox-contentHover",
                vec![
                    ("border-radius", radius.clone()),
                    ("background-color", vars.button_hover_bg.to_string()),
                ],
            ),
            tab_button,
            StyleRule::new(
                "dropDownContents",
                vec![("min-width", px(vars.drop_down_min_width))],
            ),
            StyleRule::new(
                "count",
                vec![
                    ("height", px(vars.count.size)),
                    ("font-size", px(vars.count.font_size)),
                    ("background-color", vars.count.bg.to_string()),
                    ("color", vars.count.fg.to_string()),
                ],
            ),
            StyleRule::new(
                "signIn",
                vec![("background-color", vars.sign_in.bg.to_string())],
            )
            .nest(
                ":hover",
                vec![("background-color", vars.sign_in.hover_bg.to_string())],
            ),
            StyleRule::new(
                "register",
                vec![
                    ("background-color", vars.register.bg.to_string()),
                    ("margin-left", px(vars.guest_spacer)),
                ],
            )
            .nest(
                ":hover",
                vec![("background-color", vars.register.hover_bg.to_string())],
            ),
            StyleRule::new("horizontalScroll", vec![("overflow-x", "auto".into())]),
            StyleRule::new(
                "rightFlexBasis",
                vec![
                    ("display", "flex".into()),
                    ("height", height.clone()),
                    ("flex-wrap", "nowrap".into()),
                    ("justify-content", "flex-end".into()),
                    ("align-items", "center".into()),
                    ("flex-basis", px(vars.end_elements_flex_basis)),
                ],
            )
            .one_column(vec![
                ("flex-shrink", "1".into()),
                ("flex-basis", px(vars.end_elements_mobile_flex_basis)),
                ("height", mobile_height.clone()),
                (
                    "transform",
                    format!(
                        "translateX({})",
                        px(vars.button.size - globals.user_photo_small / 2.0)
                    ),
                ),
            ]),
            StyleRule::new("mobileDropDown", vec![("height", mobile_height)]),
        ];

        Ok(Self {
            breakpoint: globals.one_column_breakpoint,
            rules,
        })
    }

    /// Site logo classes (`vanillaHeaderLogo-*`).
    pub fn logo(globals: &GlobalVariables) -> Result<Self, StyleError> {
        let vars = HeaderVariables::new(globals)?;
        let rules = vec![
            StyleRule::prefixed(
                LOGO_CLASS_PREFIX,
                "logoFrame",
                vec![("display", "inline-flex".into())],
            ),
            StyleRule::prefixed(
                LOGO_CLASS_PREFIX,
                "logo",
                vec![
                    ("display", "block".into()),
                    ("height", px(vars.sizing.height - 18.0)),
                    ("width", "auto".into()),
                ],
            )
            .nest(".isCentred", vec![("margin", "auto".into())]),
        ];
        Ok(Self {
            breakpoint: globals.one_column_breakpoint,
            rules,
        })
    }

    /// Home page header classes (`vanillaHeaderHome-*`).
    pub fn home(globals: &GlobalVariables) -> Result<Self, StyleError> {
        let vars = HeaderVariables::new(globals)?;
        let rules = vec![
            StyleRule::prefixed(
                HOME_CLASS_PREFIX,
                "root",
                vec![("min-height", px(vars.sizing.mobile_height * 2.0))],
            ),
            StyleRule::prefixed(
                HOME_CLASS_PREFIX,
                "bottom",
                vec![(
                    "background-color",
                    globals.main_colors.fg.fade(1.0).to_string(),
                )],
            ),
            StyleRule::prefixed(
                HOME_CLASS_PREFIX,
                "left",
                vec![
                    ("height", px(1.0)),
                    ("width", px(vars.button.size)),
                    ("flex-basis", px(vars.button.size)),
                ],
            ),
        ];
        Ok(Self {
            breakpoint: globals.one_column_breakpoint,
            rules,
        })
    }

    pub fn rule(&self, name: &str) -> Option<&StyleRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Class name for `name`, e.g. `"vanillaHeader-button"`.
    pub fn class(&self, name: &str) -> Option<&str> {
        self.rule(name).map(|r| r.class_name.as_str())
    }

    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            let selector = format!(".{}", rule.class_name);
            write_block(&mut out, &selector, &rule.declarations, "");
            for (suffix, decls) in &rule.nested {
                write_block(&mut out, &format!("{selector}{suffix}"), decls, "");
            }
        }

        let narrow: Vec<&StyleRule> = self
            .rules
            .iter()
            .filter(|r| !r.one_column.is_empty())
            .collect();
        if !narrow.is_empty() {
            let _ = writeln!(out, "@media (max-width: {}px) {{", self.breakpoint);
            for rule in narrow {
                write_block(
                    &mut out,
                    &format!(".{}", rule.class_name),
                    &rule.one_column,
                    "  ",
                );
            }
            out.push_str("}\n");
        }
        out
    }
}

/// Header, logo, and home classes rendered as one stylesheet.
pub fn stylesheet(globals: &GlobalVariables) -> Result<String, StyleError> {
    let mut css = HeaderClasses::new(globals)?.to_css();
    css.push_str(&HeaderClasses::logo(globals)?.to_css());
    css.push_str(&HeaderClasses::home(globals)?.to_css());
    Ok(css)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variables() {
        let vars = HeaderVariables::new(&GlobalVariables::default()).unwrap();
        assert_eq!(vars.sizing.height, 48.0);
        assert_eq!(vars.sizing.mobile_height, 44.0);
        assert_eq!(vars.end_elements_flex_basis, 160.0);
        assert_eq!(vars.end_elements_mobile_flex_basis, 80.0);
        assert_eq!(vars.compact_search_results_top, 6.5);
        assert_eq!(vars.compact_search_results_mobile_top, 4.5);
        assert_eq!(vars.colors.fg, Color::WHITE);
        assert_eq!(vars.colors.bg.to_string(), "#0291db");
        assert_eq!(vars.register.hover_bg.to_string(), "rgba(255, 255, 255, 0.9)");
    }

    #[test]
    fn hover_is_lighter_and_active_darker_on_dark_foreground() {
        let globals = GlobalVariables::default();
        let vars = HeaderVariables::new(&globals).unwrap();
        let primary = globals.main_colors.primary.lightness();
        assert!(vars.button_hover_bg.lightness() > primary);
        assert!(vars.button_active_bg.lightness() < primary);
        assert!(vars.sign_in.hover_bg.lightness() > vars.sign_in.bg.lightness());
    }

    #[test]
    fn light_foreground_flips_direction() {
        let mut globals = GlobalVariables::default();
        globals.main_colors.fg = Color::WHITE;
        let vars = HeaderVariables::new(&globals).unwrap();
        assert!(vars.button_hover_bg.lightness() < globals.main_colors.primary.lightness());
    }

    #[test]
    fn classes_use_variables() {
        let classes = HeaderClasses::new(&GlobalVariables::default()).unwrap();
        assert_eq!(classes.class("button"), Some("vanillaHeader-button"));
        let spacer = classes.rule("spacer").unwrap();
        assert_eq!(spacer.get("height"), Some("48px"));
        let right = classes.rule("rightFlexBasis").unwrap();
        assert!(right
            .one_column
            .iter()
            .any(|(p, v)| *p == "transform" && v == "translateX(26px)"));
        assert!(classes.rule("unknown").is_none());
    }

    #[test]
    fn stylesheet_has_media_block() {
        let classes = HeaderClasses::new(&GlobalVariables::default()).unwrap();
        let css = classes.to_css();
        assert!(css.contains(".vanillaHeader-root {\n  background-color: #0291db;"));
        assert!(css.contains(".vanillaHeader-root.isFixed {"));
        assert!(css.contains("@media (max-width: 1200px) {"));
        assert!(css.contains("  .vanillaHeader-bar {\n    height: 44px;\n  }"));
        assert!(css.trim_end().ends_with('}'));
    }

    #[test]
    fn button_states_cover_both_me_box_parts() {
        let classes = HeaderClasses::new(&GlobalVariables::default()).unwrap();
        let button = classes.rule("button").unwrap();
        let suffixes: Vec<&str> = button.nested.iter().map(|(s, _)| *s).collect();
        for state in [":active", ":hover", ".focus-visible", ".isOpen"] {
            for part in [".meBox-contentHover", ".meBox-buttonContent"] {
                let suffix = format!("{state} {part}");
                assert!(suffixes.contains(&suffix.as_str()), "missing {suffix}");
            }
        }
        let css = classes.to_css();
        assert!(css.contains(".vanillaHeader-button.focus-visible .meBox-contentHover {\n  border-radius: 3px;"));
    }

    #[test]
    fn tab_button_focus_uses_primary() {
        let classes = HeaderClasses::new(&GlobalVariables::default()).unwrap();
        let tab = classes.rule("tabButton").unwrap();
        let focus = tab
            .nested
            .iter()
            .find(|(s, _)| *s == ":focus")
            .map(|(_, d)| d)
            .unwrap();
        assert_eq!(focus, &vec![("color", "#0291db".to_string())]);
        assert!(tab
            .nested
            .iter()
            .any(|(s, _)| *s == ":active .vanillaHeader-tabButtonContent"));
    }

    #[test]
    fn locale_and_scroll_classes() {
        let classes = HeaderClasses::new(&GlobalVariables::default()).unwrap();
        assert_eq!(classes.rule("locales").unwrap().get("height"), Some("48px"));
        assert_eq!(
            classes.rule("localeToggle").unwrap().one_column,
            vec![("height", "44px".to_string())]
        );
        assert_eq!(classes.rule("languages").unwrap().get("margin-left"), Some("auto"));
        assert_eq!(
            classes.rule("horizontalScroll").unwrap().get("overflow-x"),
            Some("auto")
        );
    }

    #[test]
    fn logo_and_home_classes() {
        let globals = GlobalVariables::default();
        let logo = HeaderClasses::logo(&globals).unwrap();
        assert_eq!(logo.class("logo"), Some("vanillaHeaderLogo-logo"));
        assert_eq!(logo.rule("logo").unwrap().get("height"), Some("30px"));
        assert!(logo.to_css().contains(".vanillaHeaderLogo-logo.isCentred {\n  margin: auto;"));

        let home = HeaderClasses::home(&globals).unwrap();
        assert_eq!(home.rule("root").unwrap().get("min-height"), Some("88px"));
        assert_eq!(home.rule("bottom").unwrap().get("background-color"), Some("#555a62"));
        assert_eq!(home.rule("left").unwrap().get("flex-basis"), Some("40px"));

        let css = stylesheet(&globals).unwrap();
        assert!(css.contains(".vanillaHeader-spacer {"));
        assert!(css.contains(".vanillaHeaderHome-left {"));
    }
}
