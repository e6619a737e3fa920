pub mod docs;
pub mod status;
pub mod test_project;
