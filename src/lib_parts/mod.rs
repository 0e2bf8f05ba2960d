use super::*;

mod event_dispatch;
mod frame_clock;
pub(crate) mod page_api;
pub(crate) mod runtime_state;

pub(crate) use runtime_state::*;
