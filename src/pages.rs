//! Built-in bindings for the three admin list pages
//!
//! Each page wires the same form id but its own trigger table:
//! - areas: q debounced, order immediate
//! - departamentos: q debounced, area and order immediate
//! - trabajadores: q debounced, four selects immediate, rut on Enter

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::form::{FilterForm, FormField};
use crate::policy::{BindingSpec, TriggerPolicy, FILTERS_FORM_ID};

/// Ordering every list view starts from
pub const DEFAULT_ORDER: &str = "name_asc";

/// The admin list pages that carry a filter form
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Areas,
    Departamentos,
    Trabajadores,
}

impl Page {
    /// All pages, in navigation order
    pub fn all() -> [Page; 3] {
        [Page::Areas, Page::Departamentos, Page::Trabajadores]
    }

    /// Page name as used in traces and flags
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Areas => "areas",
            Page::Departamentos => "departamentos",
            Page::Trabajadores => "trabajadores",
        }
    }

    /// GET path the page's form submits to
    pub fn action(&self) -> &'static str {
        match self {
            Page::Areas => "/areas/",
            Page::Departamentos => "/departamentos/",
            Page::Trabajadores => "/trabajadores/",
        }
    }

    /// The page's trigger table. Debounced rules use `delay_ms`.
    pub fn binding_spec(&self, delay_ms: u64) -> BindingSpec {
        let debounced = TriggerPolicy::DebouncedInput { delay_ms };
        match self {
            Page::Areas => BindingSpec::new(FILTERS_FORM_ID)
                .rule("q", debounced)
                .rule("order", TriggerPolicy::Change),
            Page::Departamentos => BindingSpec::new(FILTERS_FORM_ID)
                .rule("q", debounced)
                .rule("area", TriggerPolicy::Change)
                .rule("order", TriggerPolicy::Change),
            Page::Trabajadores => BindingSpec::new(FILTERS_FORM_ID)
                .rule("q", debounced)
                .rule("rut", TriggerPolicy::EnterKey)
                .rule("area", TriggerPolicy::Change)
                .rule("depto", TriggerPolicy::Change)
                .rule("cargo", TriggerPolicy::Change)
                .rule("order", TriggerPolicy::Change),
        }
    }

    /// The page's form as rendered on first load: all filters empty,
    /// ordering at its default. Used when a trace names a page but carries
    /// no form snapshot.
    pub fn default_form(&self) -> FilterForm {
        match self {
            Page::Areas => FilterForm::new(FILTERS_FORM_ID, self.action())
                .with_field(FormField::text("q"))
                .with_field(FormField::select("order").with_value(DEFAULT_ORDER)),
            Page::Departamentos => FilterForm::new(FILTERS_FORM_ID, self.action())
                .with_field(FormField::text("q"))
                .with_field(FormField::select("area"))
                .with_field(FormField::select("order").with_value(DEFAULT_ORDER)),
            Page::Trabajadores => FilterForm::new(FILTERS_FORM_ID, self.action())
                .with_field(FormField::text("q"))
                .with_field(FormField::text("rut"))
                .with_field(FormField::select("area"))
                .with_field(FormField::select("depto"))
                .with_field(FormField::select("cargo"))
                .with_field(FormField::select("order").with_value(DEFAULT_ORDER)),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
