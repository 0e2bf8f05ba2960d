use super::*;

mod class_style;
mod connectivity;
mod core_nodes;
mod select_option_sync;
mod selector_matching;
mod text_content;
mod tree_mutation;
