pub mod api;
pub mod avatar;
pub mod carousel;
pub mod config;
pub mod events;
pub mod grid;
pub mod search;
pub mod tasks {
    pub mod directory;
    pub mod gallery;
}
pub mod views {
    pub mod directory;
    pub mod gallery;
}
