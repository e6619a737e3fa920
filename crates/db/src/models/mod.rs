pub mod test_project;
