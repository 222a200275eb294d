pub mod carousel;
pub mod config;
pub mod crm;
pub mod error;
pub mod events;
pub mod projects;
pub mod tasks {
    pub mod carousel;
    #[cfg(unix)]
    pub mod control;
    pub mod loader;
}
