//! HTML rendering of snapshot items
//!
//! Each item becomes a card tagged with its `ItemType` and `Css` category:
//!
//! ```text
//! <div class='EntityType card text-white mb-3 bg-primary'>
//! <div class='TypeName card-header'>
//! user : directoryObject</div>
//! <div class='Properties card-body'>
//! <div class='Property'>
//! <span class='prop-name'>id</span> <span class='prop-type'>Edm.String</span>
//! </div>
//! </div>
//! </div>
//! ```
//!
//! Type labels that are not primitives link to `#type:<Name>`.

use std::fmt::Write;

use metaexplorer_core::{
    is_primitive, unwrap_collection, InterchangeItem, InterchangeProperty, DEFAULT_PRIMITIVE_PREFIX,
};

use crate::navigation::NavigationState;

/// Renders items as HTML fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    primitive_prefix: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMITIVE_PREFIX)
    }
}

impl Renderer {
    pub fn new(primitive_prefix: impl Into<String>) -> Self {
        Self {
            primitive_prefix: primitive_prefix.into(),
        }
    }

    pub fn primitive_prefix(&self) -> &str {
        &self.primitive_prefix
    }

    /// Render a sequence of items in order.
    pub fn render_items<'a, I>(&self, items: I) -> String
    where
        I: IntoIterator<Item = &'a InterchangeItem>,
    {
        let mut out = String::new();
        for item in items {
            self.write_item(&mut out, item);
        }
        out
    }

    pub fn render_item(&self, item: &InterchangeItem) -> String {
        let mut out = String::new();
        self.write_item(&mut out, item);
        out
    }

    fn write_item(&self, out: &mut String, item: &InterchangeItem) {
        let _ = writeln!(
            out,
            "<div class='{} card text-white mb-3 {}'>",
            item.item_type.as_str(),
            escape_html(&item.css)
        );
        out.push_str("<div class='TypeName card-header'>\n");
        out.push_str(&escape_html(&header(item)));
        out.push_str("</div>\n");

        if let Some(properties) = &item.properties {
            out.push_str("<div class='Properties card-body'>\n");
            for property in properties {
                self.write_property(out, property);
            }
            out.push_str("</div>\n");
        } else if let Some(members) = &item.members {
            out.push_str("<div class='Members card-body'>\n");
            for member in members {
                let _ = write!(out, "<div class='Member'>\n{}\n</div>\n", escape_html(member));
            }
            out.push_str("</div>\n");
        }

        out.push_str("</div>\n");
    }

    fn write_property(&self, out: &mut String, property: &InterchangeProperty) {
        let class = if property.is_navigation() {
            "NavigationProperty"
        } else {
            "Property"
        };
        let _ = write!(
            out,
            "<div class='{}'>\n<span class='prop-name'>{}</span> <span class='prop-type'>{}</span>",
            class,
            escape_html(&property.name),
            self.type_label(&property.type_name)
        );
        if let Some(contains_target) = &property.contains_target {
            let _ = write!(
                out,
                " <span class='prop-contains-target'> CT={}</span>",
                escape_html(contains_target)
            );
        }
        out.push_str("\n</div>\n");
    }

    /// The type name, link-wrapped unless it is a primitive.
    pub fn type_label(&self, type_name: &str) -> String {
        if is_primitive(type_name, &self.primitive_prefix) {
            return escape_html(type_name);
        }
        let target = NavigationState::ExactLookup(unwrap_collection(type_name).to_string());
        format!(
            "<a href='{}'>{}</a>",
            escape_html(&target.to_fragment()),
            escape_html(type_name)
        )
    }
}

/// `Name`, followed by `: Type` for sets and singletons or `: BaseType` when
/// one is present.
pub fn header(item: &InterchangeItem) -> String {
    if item.item_type.is_top_level() {
        match &item.type_name {
            Some(type_name) => format!("{} : {}", item.name, type_name),
            None => item.name.clone(),
        }
    } else {
        match &item.base_type {
            Some(base) => format!("{} : {}", item.name, base),
            None => item.name.clone(),
        }
    }
}

/// Escape text for HTML element content and single- or double-quoted
/// attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
