pub mod auth;
pub mod catalog;
pub mod media;
pub mod movies;
pub mod profile;
