pub mod assets;
pub mod config;
pub mod icons;
pub mod install;
pub mod manifest;
pub mod packager;
pub mod paths;
