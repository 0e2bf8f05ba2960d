use super::*;

mod dom;
mod form_controls;
mod html;

pub(crate) use form_controls::*;
pub(crate) use html::{is_void_tag, parse_html, parse_html_into};
