pub mod test_project_repo;

pub use test_project_repo::TestProjectRepo;
