pub mod footer;
pub mod issue_list;
pub mod label_picker;
pub mod summary_bar;
