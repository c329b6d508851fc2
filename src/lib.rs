//MIT License
#![allow(non_snake_case)]
pub mod Utils;
pub mod models;
pub mod settings;
pub mod symbolic;
