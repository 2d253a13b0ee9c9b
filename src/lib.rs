pub mod app;
pub mod config;
pub mod controller;
pub mod draft;
pub mod gateway;
pub mod input;
pub mod models;
pub mod ui;
